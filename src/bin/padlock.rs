use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use polars::prelude::*;

use padlock::config::{default_config, ConfigOverrides, ScreeningConfig};
use padlock::design::{design_target, prepare_run, DesignTarget, Execution};
use padlock::export::{write_padlocks_csv, write_padlocks_csv_path};
use padlock::probe::{ProbeHit, Strand};
use padlock::scaffold::{Chemistry, ScaffoldTemplates};
use padlock::screen::ArmScreen;
use padlock::thermo::{reverse_complement, NearestNeighbor};

/// Padlock CLI
#[derive(Parser)]
#[command(name = "padlock")]
#[command(version)]
#[command(about = "Padlock / MIP probe design", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in scaffold chemistries
    ListChemistries,

    /// Print the scaffold for a barcode
    Scaffold {
        /// Barcode to place in the scaffold
        barcode: String,
        /// Chemistry (solid, illumina, hybrid)
        #[arg(long, default_value = "hybrid")]
        chemistry: String,
    },

    /// Screen one arm pair and print the full report
    Screen {
        /// Left arm, 5'->3'
        left: String,
        /// Right arm, 5'->3'
        right: String,
        /// Barcode used to build the scaffold loop
        #[arg(long, default_value = "ACGTAC")]
        barcode: String,
        /// Chemistry; overrides the YAML config
        #[arg(long)]
        chemistry: Option<String>,
        /// YAML configuration overrides
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Design probes for every record of the input files
    Design {
        /// Input files (FASTA/FASTQ, optionally gzipped)
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Comma-separated barcodes, tried in order
        #[arg(long, value_delimiter = ',')]
        barcodes: Vec<String>,
        /// File with one barcode per line ('#' starts a comment)
        #[arg(long)]
        barcodes_file: Option<PathBuf>,
        /// YAML configuration overrides
        #[arg(long)]
        config: Option<PathBuf>,
        /// YAML scaffold templates (keys: solid, illumina, hybrid)
        #[arg(long)]
        templates: Option<PathBuf>,
        #[arg(long)]
        chemistry: Option<String>,
        #[arg(long)]
        arm_length: Option<usize>,
        #[arg(long)]
        gap_size: Option<usize>,
        #[arg(long)]
        spacing: Option<usize>,
        /// Keep at most this many probes per target
        #[arg(long)]
        keep: Option<usize>,
        /// Also design against the reverse complement
        #[arg(long)]
        both_strands: bool,
        /// Genomic start of the targets, if known
        #[arg(long)]
        genome_idx: Option<i64>,
        /// Threads (None = all)
        #[arg(long)]
        threads: Option<usize>,
        /// Output CSV (stdout if omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::ListChemistries => cmd_list_chemistries()?,

        Commands::Scaffold { barcode, chemistry } => {
            let chem: Chemistry = chemistry.parse()?;
            println!("{}", padlock::create_scaffold(&barcode, chem)?);
        }

        Commands::Screen { left, right, barcode, chemistry, config } => {
            let cfg = load_config(config.as_ref(), chemistry.as_deref())?;
            cmd_screen(&left, &right, &barcode, &cfg)?;
        }

        Commands::Design {
            files, barcodes, barcodes_file, config, templates, chemistry, arm_length, gap_size,
            spacing, keep, both_strands, genome_idx, threads, output,
        } => {
            let mut cfg = load_config(config.as_ref(), chemistry.as_deref())?;
            if let Some(v) = arm_length { cfg.arm_length = v; }
            if let Some(v) = gap_size { cfg.gap_size = v; }
            if let Some(v) = spacing { cfg.spacing = v; }
            if keep.is_some() { cfg.keep_random_n = keep; }

            let mut all_barcodes = barcodes;
            if let Some(p) = barcodes_file {
                all_barcodes.extend(read_barcodes(&p)?);
            }
            if all_barcodes.is_empty() {
                bail!("no barcodes given; use --barcodes or --barcodes-file");
            }
            let templates = match templates {
                Some(p) => ScaffoldTemplates::from_yaml_file(p)?,
                None => ScaffoldTemplates::default(),
            };
            let opts = DesignOpts { both_strands, genome_idx, threads };
            cmd_design(&files, &all_barcodes, &cfg, &templates, &opts, output.as_ref())?;
        }
    }
    Ok(())
}

/// Defaults, then YAML, then `--chemistry`.
fn load_config(path: Option<&PathBuf>, chemistry: Option<&str>) -> Result<ScreeningConfig> {
    let mut cfg = match path {
        Some(p) => ConfigOverrides::from_yaml_file(p)?.apply(default_config())?,
        None => default_config(),
    };
    if let Some(c) = chemistry {
        cfg.chemistry = c.parse()?;
    }
    Ok(cfg)
}

fn read_barcodes(path: &PathBuf) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(|l| l.to_ascii_uppercase())
        .collect())
}

fn cmd_list_chemistries() -> Result<()> {
    let rows = padlock::chemistry_rows();
    let df = df!(
        "chemistry" => rows.iter().map(|r| r.0.clone()).collect::<Vec<_>>(),
        "length" => rows.iter().map(|r| r.1 as u64).collect::<Vec<_>>(),
        "fragments" => rows.iter().map(|r| r.2.clone()).collect::<Vec<_>>(),
    )?;

    std::env::set_var("POLARS_FMT_TABLE_FORMATTING", "UTF8_FULL");
    std::env::set_var("POLARS_FMT_MAX_ROWS", "1000");
    std::env::set_var("POLARS_FMT_STR_LEN", "1000");
    println!("{}", df);
    Ok(())
}

fn cmd_screen(left: &str, right: &str, barcode: &str, cfg: &ScreeningConfig) -> Result<()> {
    let scaffold = padlock::create_scaffold(barcode, cfg.chemistry)?;
    let (ok, r) = padlock::screen_arms(&left.to_ascii_uppercase(), &right.to_ascii_uppercase(), &scaffold, cfg)?;
    println!("accepted: {}", ok);
    println!("gc_l: {:.3}", r.gc_l);
    println!("gc_r: {:.3}", r.gc_r);
    println!("clamp_l: {}", r.clamp_l);
    println!("clamp_r: {}", r.clamp_r);
    println!("tm_arm_l: {:.3}", r.tm_arm_l);
    println!("tm_arm_r: {:.3}", r.tm_arm_r);
    println!("tm_hetero_lr: {:.3}", r.tm_hetero_lr);
    println!("tm_hetero_l_loop: {:.3}", r.tm_hetero_l_loop);
    println!("tm_hetero_r_loop: {:.3}", r.tm_hetero_r_loop);
    println!("excluded: {:?}", r.excluded);
    println!("failures: {:?}", r.failures);
    println!("score: {:.3}", r.rank_score());
    Ok(())
}

struct DesignOpts {
    both_strands: bool,
    genome_idx: Option<i64>,
    threads: Option<usize>,
}

fn cmd_design(
    files: &[PathBuf],
    barcodes: &[String],
    cfg: &ScreeningConfig,
    templates: &ScaffoldTemplates,
    opts: &DesignOpts,
    output: Option<&PathBuf>,
) -> Result<()> {
    let choice = prepare_run(barcodes, cfg, templates)?;
    let screen = ArmScreen::new(cfg)?;
    let exec = Execution::Parallel(opts.threads);

    let mut results: Vec<(String, Vec<ProbeHit>)> = Vec::new();
    let mut n_targets = 0usize;
    for f in files {
        for rec in padlock::seqio::read_targets(f)? {
            n_targets += 1;
            let name1 = if rec.description.is_empty() { rec.id.clone() } else { rec.description.clone() };
            let fwd = DesignTarget::new(rec.seq.clone(), rec.id.clone(), name1.clone()).with_genome_idx(opts.genome_idx);
            let mut hits = design_target(&fwd, &choice, &screen, exec)?;
            if opts.both_strands {
                let rev = DesignTarget::new(reverse_complement(&rec.seq), rec.id.clone(), name1)
                    .with_strand(Strand::Reverse)
                    .with_genome_idx(opts.genome_idx);
                hits.extend(design_target(&rev, &choice, &screen, exec)?);
            }
            results.push((rec.id, hits));
        }
    }
    let n_probes: usize = results.iter().map(|(_, h)| h.len()).sum();
    eprintln!(
        "design: targets={} | probes={} | barcode={} | threads={}",
        n_targets,
        n_probes,
        choice.barcode,
        opts.threads.map(|t| t.to_string()).unwrap_or_else(|| "all".into())
    );

    let tp = &cfg.thermo_params;
    match output {
        Some(p) => { write_padlocks_csv_path(p, &results, tp, &NearestNeighbor)?; }
        None => { write_padlocks_csv(std::io::stdout().lock(), &results, tp, &NearestNeighbor)?; }
    }
    Ok(())
}

//! End-to-end probe design for one target sequence.
//!
//! `validate -> select scaffold -> enumerate -> cluster -> rank -> assemble`.
//! Every configuration problem surfaces before the first window is screened;
//! after that a run either returns its full probe list or a worker-pool error.
//!
//! # Examples
//! ```
//! use padlock::config::default_config;
//! use padlock::design::{generate_padlocks, DesignTarget};
//!
//! let target = DesignTarget::new("ACGT".repeat(5), "tx1", "exon1");
//! // Too short for a 40 nt window: no probes, but the run itself succeeds.
//! let hits = generate_padlocks(&target, &["ACGTAC"], &default_config()).unwrap();
//! assert!(hits.is_empty());
//! ```
use crate::cluster::{cluster, select_representatives};
use crate::config::ScreeningConfig;
use crate::enumerate::{screen_windows_par, Candidates};
use crate::error::{Error, Result};
use crate::probe::{assemble, ProbeHit, ProbeNames, Strand};
use crate::scaffold::{ScaffoldChoice, ScaffoldTemplates};
use crate::screen::ArmScreen;
use crate::thermo::ThermoCalculator;

/// One target region to design against.
#[derive(Clone, Debug, PartialEq)]
pub struct DesignTarget {
    pub sequence: String,
    pub name0: String,
    pub name1: String,
    pub strand: Strand,
    /// Genomic start of `sequence`; `None` when unknown.
    pub genome_idx: Option<i64>,
}

impl DesignTarget {
    /// Forward-strand target with unknown genomic position.
    pub fn new(sequence: impl Into<String>, name0: impl Into<String>, name1: impl Into<String>) -> Self {
        DesignTarget {
            sequence: sequence.into(),
            name0: name0.into(),
            name1: name1.into(),
            strand: Strand::Forward,
            genome_idx: None,
        }
    }

    pub fn with_strand(mut self, strand: Strand) -> Self {
        self.strand = strand;
        self
    }

    pub fn with_genome_idx(mut self, genome_idx: Option<i64>) -> Self {
        self.genome_idx = genome_idx;
        self
    }
}

/// How candidate windows are screened.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Execution {
    #[default]
    Sequential,
    /// Local rayon pool; `None` uses every logical core.
    Parallel(Option<usize>),
}

/// Validate `config` and fix the run's scaffold from `barcodes`.
pub fn prepare_run<S: AsRef<str>>(
    barcodes: &[S],
    config: &ScreeningConfig,
    templates: &ScaffoldTemplates,
) -> Result<ScaffoldChoice> {
    config.validate()?;
    if barcodes.is_empty() {
        return Err(Error::config("barcodes length must be non-zero"));
    }
    templates.select_scaffold(barcodes, config.chemistry)
}

/// Design probes for `target` with an already prepared scaffold and screen.
///
/// Use this when many targets share one scaffold; [`generate_padlocks`]
/// wraps it for the single-target case.
pub fn design_target<T: ThermoCalculator>(
    target: &DesignTarget,
    choice: &ScaffoldChoice,
    screen: &ArmScreen<'_, T>,
    execution: Execution,
) -> Result<Vec<ProbeHit>> {
    let config = screen.config();
    let sequence = target.sequence.to_ascii_uppercase();
    let candidates = match execution {
        Execution::Sequential => Candidates::new(&sequence, screen, &choice.scaffold).collect(),
        Execution::Parallel(threads) => screen_windows_par(&sequence, screen, &choice.scaffold, threads)?,
    };
    let n_candidates = candidates.len();
    let clusters = cluster(candidates, config.arm_length, config.spacing);
    for (i, cl) in clusters.iter().enumerate() {
        log::debug!("cluster {} at {:?}: {} candidates", i, cl.leader_index(), cl.len());
    }
    let selected = select_representatives(clusters);
    let names = ProbeNames { name0: &target.name0, name1: &target.name1 };
    let hits = assemble(&sequence, &selected, names, target.strand, target.genome_idx, config, choice)?;
    log::info!(
        "{}|{} ({}): {} candidates, {} probes",
        target.name0, target.name1, target.strand, n_candidates, hits.len()
    );
    Ok(hits)
}

fn run(target: &DesignTarget, barcodes: &[impl AsRef<str>], config: &ScreeningConfig, execution: Execution) -> Result<Vec<ProbeHit>> {
    let choice = prepare_run(barcodes, config, &ScaffoldTemplates::default())?;
    let screen = ArmScreen::new(config)?;
    design_target(target, &choice, &screen, execution)
}

/// Design padlock probes for one target with the built-in scaffolds and
/// nearest-neighbour thermodynamics.
///
/// Returns one [`ProbeHit`] per spacing cluster, in window order, truncated
/// to `config.keep_random_n` when set. Probes carry the barcode whose scaffold
/// was selected.
pub fn generate_padlocks<S: AsRef<str>>(target: &DesignTarget, barcodes: &[S], config: &ScreeningConfig) -> Result<Vec<ProbeHit>> {
    run(target, barcodes, config, Execution::Sequential)
}

/// [`generate_padlocks`] with windows screened on `threads` workers; the
/// result is identical to the sequential run.
pub fn generate_padlocks_par<S: AsRef<str>>(
    target: &DesignTarget,
    barcodes: &[S],
    config: &ScreeningConfig,
    threads: Option<usize>,
) -> Result<Vec<ProbeHit>> {
    run(target, barcodes, config, Execution::Parallel(threads))
}

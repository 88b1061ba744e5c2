//! Target sequence input for **FASTA / FASTQ** (plain or gzipped).
//!
//! Records are parsed with `needletail`; multi-line FASTA is joined and every
//! sequence is upper-cased so the screen sees the `{A,C,G,T}` alphabet it
//! expects. The header is split at the first whitespace into `id` and
//! `description`.
//!
//! ### Errors
//! Parsing/IO errors are bubbled via `anyhow::Result` to the caller.
//!
//! ### Example
//! ```no_run
//! use padlock::seqio;
//! let targets = seqio::read_targets("exons.fa").unwrap();
//! println!("loaded {} targets", targets.len());
//! ```
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use needletail::{parse_fastx_file, parse_fastx_reader, FastxReader};

/// One input record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRecord {
    pub id: String,
    pub description: String,
    pub seq: String,
}

fn drain(mut reader: Box<dyn FastxReader + '_>) -> Result<Vec<TargetRecord>> {
    let mut out = Vec::new();
    while let Some(record) = reader.next() {
        let rec = record?;
        let header = String::from_utf8_lossy(rec.id()).to_string();
        let (id, description) = match header.split_once(char::is_whitespace) {
            Some((id, rest)) => (id.to_string(), rest.trim().to_string()),
            None => (header.clone(), String::new()),
        };
        let seq = String::from_utf8_lossy(&rec.seq()).to_ascii_uppercase();
        out.push(TargetRecord { id, description, seq });
    }
    Ok(out)
}

/// Read every record of a FASTA/FASTQ file.
pub fn read_targets<P: AsRef<Path>>(path: P) -> Result<Vec<TargetRecord>> {
    let p = path.as_ref();
    let reader = parse_fastx_file(p).with_context(|| format!("opening {}", p.display()))?;
    let targets = drain(reader).with_context(|| format!("parsing {}", p.display()))?;
    log::info!("read {} targets from {}", targets.len(), p.display());
    Ok(targets)
}

/// Read every record from an already open stream.
pub fn read_targets_from<R: Read + Send + 'static>(reader: R) -> Result<Vec<TargetRecord>> {
    drain(parse_fastx_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fasta_records_are_split_and_upper_cased() {
        let fa: &'static [u8] = b">tx1 exon 3 of BRCA2\nacgtAC\nGTTT\n>tx2\nGGCC\n";
        let t = read_targets_from(fa).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t[0].id, "tx1");
        assert_eq!(t[0].description, "exon 3 of BRCA2");
        assert_eq!(t[0].seq, "ACGTACGTTT");
        assert_eq!(t[1].id, "tx2");
        assert_eq!(t[1].description, "");
        assert_eq!(t[1].seq, "GGCC");
    }

    #[test]
    fn fastq_is_accepted() {
        let fq: &'static [u8] = b"@r1\nacgt\n+\nIIII\n";
        let t = read_targets_from(fq).unwrap();
        assert_eq!(t, vec![TargetRecord { id: "r1".into(), description: String::new(), seq: "ACGT".into() }]);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(read_targets("/nonexistent/targets.fa").is_err());
    }
}

//! Probe records and the assembler that turns selected windows into them.
//!
//! A probe is read `right_arm + scaffold + left_arm`: once both arms anneal to
//! the target the two ends meet across the scaffold loop and can be ligated.
use std::fmt;
use std::str::FromStr;

use crate::config::ScreeningConfig;
use crate::enumerate::{arm_windows, Candidate};
use crate::error::{Error, Result};
use crate::scaffold::ScaffoldChoice;

/// Orientation of the target sequence the probe was designed on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Strand {
    #[default]
    Forward,
    Reverse,
}

impl Strand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strand::Forward => "fwd",
            Strand::Reverse => "rev",
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Strand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fwd" | "forward" | "+" => Ok(Strand::Forward),
            "rev" | "reverse" | "-" => Ok(Strand::Reverse),
            other => Err(Error::config(format!("Unknown strand direction, {}", other))),
        }
    }
}

/// One designed probe.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeHit {
    pub name0: String,
    pub name1: String,
    pub strand: Strand,
    /// Genomic start of the target, when known.
    pub genome_idx: Option<i64>,
    /// Window start within the target sequence.
    pub index: usize,
    pub gap_size: usize,
    /// `right_arm + scaffold + left_arm`.
    pub sequence: String,
    pub barcode: String,
    pub right_arm: String,
    pub scaffold: String,
    pub left_arm: String,
}

impl ProbeHit {
    /// Arm length shared by both arms.
    pub fn arm_length(&self) -> usize { self.left_arm.len() }
}

/// Source labels carried onto every probe of a target.
#[derive(Clone, Copy, Debug)]
pub struct ProbeNames<'a> {
    pub name0: &'a str,
    pub name1: &'a str,
}

/// Build a [`ProbeHit`] for each selected candidate, in input order, then
/// truncate to `config.keep_random_n` when set.
///
/// Arms are re-cut from `sequence` with [`arm_windows`], the same arithmetic
/// the enumerator used. A candidate whose window no longer fits the sequence
/// is reported as a configuration error.
pub fn assemble(
    sequence: &str,
    selected: &[Candidate],
    names: ProbeNames<'_>,
    strand: Strand,
    genome_idx: Option<i64>,
    config: &ScreeningConfig,
    choice: &ScaffoldChoice,
) -> Result<Vec<ProbeHit>> {
    let mut hits = Vec::with_capacity(selected.len());
    for c in selected {
        let (left, right) = arm_windows(sequence, c.index, config.arm_length, config.gap_size)
            .ok_or_else(|| Error::config(format!("window {} runs past the end of the target", c.index)))?;
        let mut full = String::with_capacity(2 * left.len() + choice.scaffold.len());
        full.push_str(right);
        full.push_str(&choice.scaffold);
        full.push_str(left);
        log::debug!("probe at {}: {}", c.index, full);
        hits.push(ProbeHit {
            name0: names.name0.to_string(),
            name1: names.name1.to_string(),
            strand,
            genome_idx,
            index: c.index,
            gap_size: config.gap_size,
            sequence: full,
            barcode: choice.barcode.clone(),
            right_arm: right.to_string(),
            scaffold: choice.scaffold.clone(),
            left_arm: left.to_string(),
        });
    }
    if let Some(n) = config.keep_random_n {
        hits.truncate(n);
    }
    Ok(hits)
}

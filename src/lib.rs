#![forbid(unsafe_code)]
//! # padlock
//!
//! Design engine for **padlock** and **molecular inversion** (MIP) probes.
//!
//! Given a target nucleotide sequence and a list of candidate barcodes, the
//! engine fixes one synthesizable scaffold, slides a two-arm window along the
//! target, screens each window for GC content, GC clamp, arm Tm, excluded
//! motifs and arm/loop cross-hybridisation, keeps the best window of every
//! spacing cluster and assembles `right_arm + scaffold + left_arm` probes.
//!
//! ## Highlights
//! - 🧪 **Three scaffold chemistries** (`solid`, `illumina`, `hybrid`) with YAML-overridable templates.
//! - 🌡️ **Built-in nearest-neighbour thermodynamics** behind the [`thermo::ThermoCalculator`] trait.
//! - 🧵 **Parallel screening** of windows on a local rayon pool with results identical to the sequential path.
//! - 🧾 **Complete reports**: every criterion is evaluated and recorded even after a failure.
//!
//! ## Examples
//! ```rust
//! use padlock::{default_config, generate_padlocks, DesignTarget};
//!
//! let seq = "ATTATAATTAGGGATCACTGCCTAGCATCACATCGTACAGTCACTCAGGGTAATTATATT";
//! let target = DesignTarget::new(seq, "ENST0001", "ENSE0001");
//! let hits = generate_padlocks(&target, &["ACGTAC"], &default_config()).unwrap();
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].index, 10);
//! assert_eq!(hits[0].sequence, format!("{}{}{}", hits[0].right_arm, hits[0].scaffold, hits[0].left_arm));
//! ```

pub mod error;
pub mod config;
pub mod scaffold;
pub mod thermo;
pub mod screen;
pub mod enumerate;
pub mod cluster;
pub mod probe;
pub mod design;
pub mod export;
pub mod seqio;
pub mod data { pub mod scaffolds; }

pub use config::{default_config, ConfigOverrides, ScreeningConfig, ThermoParams};
pub use design::{generate_padlocks, generate_padlocks_par, DesignTarget};
pub use error::{Error, Result};
pub use probe::{ProbeHit, Strand};
pub use scaffold::{create_scaffold, select_scaffold, Chemistry, ScaffoldChoice, ScaffoldTemplates};
pub use screen::{screen_arms, ArmScreen, ScreeningReport};

/// Crate version string (from `CARGO_PKG_VERSION`).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Rows describing each chemistry for CLI listings: `(name, template length without barcode, fragment names)`.
///
/// # Examples
/// ```
/// let rows = padlock::chemistry_rows();
/// assert_eq!(rows.len(), 3);
/// assert_eq!(rows[2].0, "hybrid");
/// ```
pub fn chemistry_rows() -> Vec<(String, usize, String)> {
    use data::scaffolds::FRAGMENTS;
    Chemistry::ALL
        .iter()
        .map(|c| {
            let template = c.template();
            let len = scaffold::instantiate(template, "").map(|s| s.len()).unwrap_or(0);
            let parts: Vec<&str> = FRAGMENTS.iter().filter(|f| template.contains(f.sequence)).map(|f| f.name).collect();
            (c.as_str().to_string(), len, parts.join("+"))
        })
        .collect()
}

//! Screening configuration.
//!
//! A [`ScreeningConfig`] is an immutable value threaded through every call;
//! there is no process-wide default object. Start from [`default_config`]
//! (or `ScreeningConfig::default()`) and layer caller overrides on top with
//! [`ConfigOverrides::apply`]. Keys supplied by the caller win; everything
//! else keeps its default.
//!
//! # Examples
//! ```
//! use padlock::config::{default_config, ConfigOverrides};
//! let o = ConfigOverrides::from_yaml_str("spacing: 40\nthermo_params:\n  mv_conc: 100\n").unwrap();
//! let cfg = o.apply(default_config()).unwrap();
//! assert_eq!(cfg.spacing, 40);
//! assert_eq!(cfg.thermo_params.mv_conc, 100.0);
//! assert_eq!(cfg.thermo_params.dntp_conc, 0.8);
//! ```
use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};
use crate::scaffold::Chemistry;

/// Ionic and oligo concentrations handed to the thermodynamic calculators.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThermoParams {
    /// Monovalent cation concentration (mM).
    pub mv_conc: f64,
    /// Divalent cation concentration (mM).
    pub dv_conc: f64,
    /// dNTP concentration (mM).
    pub dntp_conc: f64,
    /// Oligo concentration (nM).
    pub dna_conc: f64,
}

impl Default for ThermoParams {
    fn default() -> Self {
        ThermoParams { mv_conc: 50.0, dv_conc: 0.0, dntp_conc: 0.8, dna_conc: 50.0 }
    }
}

/// Everything the screen, enumerator and clusterer need to know for one run.
#[derive(Clone, Debug, PartialEq)]
pub struct ScreeningConfig {
    /// Target species label (informational).
    pub species: String,
    /// Padding from the 3' end of the gene (nt). Carried for callers, not used by the engine.
    pub padding: usize,
    /// Spacing between probe starts (nt).
    pub spacing: usize,
    /// Arm length (nt) of each of the two arms.
    pub arm_length: usize,
    /// Bases skipped between the two arms (MIP gap).
    pub gap_size: usize,
    /// Minimum arm GC fraction (inclusive).
    pub arm_gc_min: f64,
    /// Maximum arm GC fraction (inclusive).
    pub arm_gc_max: f64,
    /// Scaffold chemistry used to build the loop.
    pub chemistry: Chemistry,
    /// Exact substrings that must not occur in the assembled probe.
    pub exclude_seqs: Vec<String>,
    /// Maximum heterodimer Tm (°C) between arms and loop.
    pub structure_tm_max: f64,
    /// If set, keep only this many probes per target.
    pub keep_random_n: Option<usize>,
    pub thermo_params: ThermoParams,
    /// Minimum arm Tm (°C).
    pub arm_tm_min: f64,
}

/// The default configuration.
pub fn default_config() -> ScreeningConfig {
    ScreeningConfig {
        species: "human".to_string(),
        padding: 25,
        spacing: 20,
        arm_length: 20,
        gap_size: 0,
        arm_gc_min: 0.4,
        arm_gc_max: 0.6,
        chemistry: Chemistry::Hybrid,
        exclude_seqs: vec!["GGGGG".to_string()],
        structure_tm_max: 30.0,
        keep_random_n: None,
        thermo_params: ThermoParams::default(),
        arm_tm_min: 50.0,
    }
}

impl Default for ScreeningConfig {
    fn default() -> Self { default_config() }
}

impl ScreeningConfig {
    /// Window length spanned by both arms plus the gap.
    pub fn span(&self) -> usize {
        2 * self.arm_length + self.gap_size
    }

    /// Reject values that would make screening meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.arm_length == 0 {
            return Err(Error::config("arm_length must be at least 1"));
        }
        let in_unit = |x: f64| (0.0..=1.0).contains(&x);
        if !in_unit(self.arm_gc_min) || !in_unit(self.arm_gc_max) {
            return Err(Error::config(format!(
                "arm GC bounds must lie in [0, 1], got [{}, {}]",
                self.arm_gc_min, self.arm_gc_max
            )));
        }
        if self.arm_gc_min > self.arm_gc_max {
            return Err(Error::config(format!(
                "arm_gc_min ({}) exceeds arm_gc_max ({})",
                self.arm_gc_min, self.arm_gc_max
            )));
        }
        if self.exclude_seqs.iter().any(|s| s.is_empty()) {
            return Err(Error::config("exclude_seqs must not contain empty strings"));
        }
        let tp = &self.thermo_params;
        if tp.mv_conc <= 0.0 || tp.dna_conc <= 0.0 || tp.dv_conc < 0.0 || tp.dntp_conc < 0.0 {
            return Err(Error::config(format!("invalid thermo params: {:?}", tp)));
        }
        Ok(())
    }
}

/// Partial thermo overrides; unset fields keep their current value.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThermoOverrides {
    pub mv_conc: Option<f64>,
    pub dv_conc: Option<f64>,
    pub dntp_conc: Option<f64>,
    pub dna_conc: Option<f64>,
}

/// Caller-supplied configuration keys, usually read from YAML.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    pub species: Option<String>,
    pub padding: Option<usize>,
    pub spacing: Option<usize>,
    pub arm_length: Option<usize>,
    pub gap_size: Option<usize>,
    pub arm_gc_min: Option<f64>,
    pub arm_gc_max: Option<f64>,
    /// One of `solid`, `illumina`, `hybrid`.
    pub chemistry: Option<String>,
    pub exclude_seqs: Option<Vec<String>>,
    pub structure_tm_max: Option<f64>,
    /// Absent keeps the base cap, `null` clears it, a number sets it.
    #[serde(default, deserialize_with = "present")]
    pub keep_random_n: Option<Option<usize>>,
    pub thermo_params: Option<ThermoOverrides>,
    pub arm_tm_min: Option<f64>,
}

/// Wrap a present key (including an explicit `null`) in `Some`.
fn present<'de, D, T>(d: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(d).map(Some)
}

impl ConfigOverrides {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        serde_yaml::from_str(s).map_err(|source| Error::ParseConfig { file: "<string>".to_string(), source })
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let p = path.as_ref();
        let text = std::fs::read_to_string(p).map_err(|e| Error::file_io(p, e))?;
        serde_yaml::from_str(&text).map_err(|source| Error::ParseConfig { file: p.display().to_string(), source })
    }

    /// Merge onto `base`. Fails only on an unknown chemistry name.
    pub fn apply(self, base: ScreeningConfig) -> Result<ScreeningConfig> {
        let chemistry = match self.chemistry.as_deref() {
            Some(name) => name.parse::<Chemistry>()?,
            None => base.chemistry,
        };
        let mut tp = base.thermo_params;
        if let Some(t) = self.thermo_params {
            tp.mv_conc = t.mv_conc.unwrap_or(tp.mv_conc);
            tp.dv_conc = t.dv_conc.unwrap_or(tp.dv_conc);
            tp.dntp_conc = t.dntp_conc.unwrap_or(tp.dntp_conc);
            tp.dna_conc = t.dna_conc.unwrap_or(tp.dna_conc);
        }
        Ok(ScreeningConfig {
            species: self.species.unwrap_or(base.species),
            padding: self.padding.unwrap_or(base.padding),
            spacing: self.spacing.unwrap_or(base.spacing),
            arm_length: self.arm_length.unwrap_or(base.arm_length),
            gap_size: self.gap_size.unwrap_or(base.gap_size),
            arm_gc_min: self.arm_gc_min.unwrap_or(base.arm_gc_min),
            arm_gc_max: self.arm_gc_max.unwrap_or(base.arm_gc_max),
            chemistry,
            exclude_seqs: self.exclude_seqs.unwrap_or(base.exclude_seqs),
            structure_tm_max: self.structure_tm_max.unwrap_or(base.structure_tm_max),
            keep_random_n: self.keep_random_n.unwrap_or(base.keep_random_n),
            thermo_params: tp,
            arm_tm_min: self.arm_tm_min.unwrap_or(base.arm_tm_min),
        })
    }
}

//! Scaffold (loop) construction and barcode selection.
//!
//! A scaffold is a chemistry template instantiated with one barcode. Only a
//! structural check is applied here: a scaffold with a run of four or more G
//! bases is rejected because it does not synthesise cleanly. GC and Tm
//! screening of the loop happens later, against each candidate arm pair.
//!
//! # Examples
//! ```
//! use padlock::scaffold::{create_scaffold, select_scaffold, Chemistry};
//! let s = create_scaffold("ACGTAC", Chemistry::Hybrid).unwrap();
//! assert!(s.contains("ACGTAC"));
//! let choice = select_scaffold(&["GGGGAC", "ACGTAC"], Chemistry::Hybrid).unwrap();
//! assert_eq!(choice.barcode, "ACGTAC");
//! ```
use core::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::data::scaffolds::{AUX_SLOTS, BARCODE_SLOT, HYBRID_TEMPLATE, ILLUMINA_TEMPLATE, SOLID_TEMPLATE};
use crate::error::{Error, Result};

/// Homopolymer that disqualifies a scaffold or a target window.
pub const POLY_G: &str = "GGGG";

/// Scaffold chemistry; the three variants differ in adapter composition.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Chemistry { Solid, Illumina, Hybrid }

impl Chemistry {
    pub const ALL: [Chemistry; 3] = [Chemistry::Solid, Chemistry::Illumina, Chemistry::Hybrid];

    pub fn as_str(&self) -> &'static str {
        match self {
            Chemistry::Solid => "solid",
            Chemistry::Illumina => "illumina",
            Chemistry::Hybrid => "hybrid",
        }
    }

    /// Built-in template for this chemistry.
    pub fn template(&self) -> &'static str {
        match self {
            Chemistry::Solid => SOLID_TEMPLATE,
            Chemistry::Illumina => ILLUMINA_TEMPLATE,
            Chemistry::Hybrid => HYBRID_TEMPLATE,
        }
    }
}

impl fmt::Display for Chemistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.as_str()) }
}

impl std::str::FromStr for Chemistry {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "solid" => Ok(Chemistry::Solid),
            "illumina" => Ok(Chemistry::Illumina),
            "hybrid" => Ok(Chemistry::Hybrid),
            other => Err(Error::config(format!("Unknown scaf_type, {}", other))),
        }
    }
}

/// A full set of templates, one per chemistry.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScaffoldTemplates {
    pub solid: String,
    pub illumina: String,
    pub hybrid: String,
}

impl Default for ScaffoldTemplates {
    fn default() -> Self {
        ScaffoldTemplates {
            solid: SOLID_TEMPLATE.to_string(),
            illumina: ILLUMINA_TEMPLATE.to_string(),
            hybrid: HYBRID_TEMPLATE.to_string(),
        }
    }
}

impl ScaffoldTemplates {
    /// Load templates from a YAML mapping with keys `solid`, `illumina`, `hybrid`.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let p = path.as_ref();
        let text = std::fs::read_to_string(p).map_err(|e| Error::file_io(p, e))?;
        let t: ScaffoldTemplates = serde_yaml::from_str(&text)
            .map_err(|source| Error::ParseConfig { file: p.display().to_string(), source })?;
        // Catch unknown slots now rather than mid-run.
        for c in Chemistry::ALL {
            instantiate(t.get(c), "")?;
        }
        Ok(t)
    }

    pub fn get(&self, chemistry: Chemistry) -> &str {
        match chemistry {
            Chemistry::Solid => &self.solid,
            Chemistry::Illumina => &self.illumina,
            Chemistry::Hybrid => &self.hybrid,
        }
    }

    /// Instantiate this set's template for `chemistry` with `barcode`.
    pub fn create_scaffold(&self, barcode: &str, chemistry: Chemistry) -> Result<String> {
        instantiate(self.get(chemistry), barcode)
    }

    /// See [`select_scaffold`].
    pub fn select_scaffold<S: AsRef<str>>(&self, barcodes: &[S], chemistry: Chemistry) -> Result<ScaffoldChoice> {
        if barcodes.is_empty() {
            return Err(Error::config("barcodes length must be non-zero"));
        }
        let mut chosen: Option<(String, String)> = None;
        for bc in barcodes {
            let bc = bc.as_ref();
            let candidate = self.create_scaffold(bc, chemistry)?;
            if candidate.contains(POLY_G) {
                log::debug!("barcode {} rejected: poly-G in {} scaffold", bc, chemistry);
                continue;
            }
            chosen = Some((bc.to_string(), candidate));
        }
        let last_attempted = barcodes[barcodes.len() - 1].as_ref().to_string();
        match chosen {
            Some((barcode, scaffold)) => {
                log::info!("selected barcode {} for {} scaffold ({} nt)", barcode, chemistry, scaffold.len());
                Ok(ScaffoldChoice { barcode, scaffold, last_attempted })
            }
            None => Err(Error::NoViableBarcode { tried: barcodes.len() }),
        }
    }
}

/// Fill `{slot}` placeholders: `{barcode}` gets the barcode, the auxiliary
/// slots get `""`, anything else is a configuration error.
pub fn instantiate(template: &str, barcode: &str) -> Result<String> {
    let mut out = String::with_capacity(template.len() + barcode.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| Error::config(format!("unterminated slot in scaffold template: {}", template)))?;
        let slot = &after[..close];
        if slot == BARCODE_SLOT {
            out.push_str(barcode);
        } else if !AUX_SLOTS.contains(&slot) {
            return Err(Error::config(format!("unknown scaffold template slot {{{}}}", slot)));
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Build the built-in scaffold for `chemistry` with `barcode` substituted.
pub fn create_scaffold(barcode: &str, chemistry: Chemistry) -> Result<String> {
    instantiate(chemistry.template(), barcode)
}

/// The scaffold fixed for a whole probe-generation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScaffoldChoice {
    /// Barcode whose scaffold was selected; this is the label recorded on every probe.
    pub barcode: String,
    pub scaffold: String,
    /// Last barcode tried in the selection loop. Older pipelines labelled
    /// probes with this value even when its own scaffold was rejected.
    pub last_attempted: String,
}

/// Pick the scaffold for a run from an ordered barcode list.
///
/// Every barcode is tried in order and the **last** one whose scaffold has no
/// `GGGG` run wins. Fails with [`Error::InvalidConfiguration`] for an empty
/// list and [`Error::NoViableBarcode`] when every scaffold carries a poly-G run.
pub fn select_scaffold<S: AsRef<str>>(barcodes: &[S], chemistry: Chemistry) -> Result<ScaffoldChoice> {
    ScaffoldTemplates::default().select_scaffold(barcodes, chemistry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn barcode_lands_in_its_slot_and_aux_slots_vanish() {
        for c in Chemistry::ALL {
            let s = create_scaffold("ACGTAC", c).unwrap();
            assert!(!s.contains('{') && !s.contains('}'));
            assert!(s.contains("ACGTAC"));
            assert_eq!(s.len(), create_scaffold("", c).unwrap().len() + 6);
        }
    }

    #[test]
    fn chemistry_names_round_trip_and_unknown_fails() {
        for c in Chemistry::ALL {
            assert_eq!(c.as_str().parse::<Chemistry>().unwrap(), c);
        }
        assert_eq!("HYBRID".parse::<Chemistry>().unwrap(), Chemistry::Hybrid);
        let err = "nanopore".parse::<Chemistry>().unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn unknown_slot_is_a_configuration_error() {
        assert!(matches!(instantiate("AC{umi}GT", "A"), Err(Error::InvalidConfiguration(_))));
        assert!(matches!(instantiate("AC{barcode", "A"), Err(Error::InvalidConfiguration(_))));
        assert_eq!(instantiate("AC{arml}{barcode}GT", "TT").unwrap(), "ACTTGT");
    }

    #[test]
    fn only_third_barcode_viable_is_selected() {
        let bcs = ["GGGGAC", "ACGGGG", "ACGTAC"];
        let choice = select_scaffold(&bcs, Chemistry::Hybrid).unwrap();
        assert_eq!(choice.barcode, "ACGTAC");
        assert_eq!(choice.scaffold, create_scaffold("ACGTAC", Chemistry::Hybrid).unwrap());
    }

    #[test]
    fn last_viable_barcode_wins() {
        let bcs = ["ACGTAC", "TGCATG", "GGGGAA"];
        let choice = select_scaffold(&bcs, Chemistry::Solid).unwrap();
        assert_eq!(choice.barcode, "TGCATG");
        assert_eq!(choice.last_attempted, "GGGGAA");
        assert!(!choice.scaffold.contains(POLY_G));
    }

    #[test]
    fn poly_g_across_the_slot_boundary_is_caught() {
        // GG from the template plus GG from the barcode.
        let t = ScaffoldTemplates {
            solid: "AAGG{barcode}TT".to_string(),
            illumina: ILLUMINA_TEMPLATE.to_string(),
            hybrid: HYBRID_TEMPLATE.to_string(),
        };
        assert!(matches!(t.select_scaffold(&["GGAT"], Chemistry::Solid), Err(Error::NoViableBarcode { tried: 1 })));
        assert_eq!(t.select_scaffold(&["GAAT", "GGAT"], Chemistry::Solid).unwrap().barcode, "GAAT");
    }

    #[test]
    fn empty_and_all_bad_barcode_lists_fail() {
        let none: [&str; 0] = [];
        assert!(matches!(select_scaffold(&none, Chemistry::Hybrid), Err(Error::InvalidConfiguration(_))));
        assert!(matches!(
            select_scaffold(&["GGGGA", "TGGGG"], Chemistry::Hybrid),
            Err(Error::NoViableBarcode { tried: 2 })
        ));
    }
}

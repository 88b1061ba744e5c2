//! Scaffold (loop) fragments and templates for the three padlock chemistries.
//!
//! A template is a plain string with `{slot}` placeholders. The `{barcode}`
//! slot receives the barcode; the auxiliary slots (`armr`, `arml`, `t2s5p`,
//! `t2s3p`, `il5p`, `il3p`) belong to alternative layouts of the same template
//! family and are always instantiated empty.
//!
//! The templates read 5'→3' in the linear probe orientation: the right arm is
//! prepended and the left arm appended by the probe assembler.
//!
//! Alternative templates can be loaded from YAML, see
//! [`crate::scaffold::ScaffoldTemplates::from_yaml_file`].

/// A named scaffold fragment.
#[derive(Clone, Copy, Debug)]
pub struct Fragment {
    /// Short stable name.
    pub name: &'static str,
    /// Uppercase DNA, 5'→3'.
    pub sequence: &'static str,
    /// Where the fragment sits in the scaffold.
    pub notes: &'static str,
}

/// Tag-to-sequence priming site shared by every chemistry.
pub const T2S: Fragment = Fragment {
    name: "T2S",
    sequence: "TCTCATCGTAGCAAGTCACT",
    notes: "Tag-to-sequence priming site; sits immediately 5' of the barcode.",
};

/// Illumina read 1 sequencing primer site.
pub const ILLUMINA_READ1: Fragment = Fragment {
    name: "ILLUMINA_READ1",
    sequence: "ACACTCTTTCCCTACACGACGCTCTTCCGATCT",
    notes: "Illumina read 1 sequencing primer binding site.",
};

/// SOLiD P1-derived 5' adapter fragment.
pub const SOLID_5P: Fragment = Fragment {
    name: "SOLID_5P",
    sequence: "CCTCTCTATGGGCAGTCGGTGAT",
    notes: "3' portion of the SOLiD P1 adapter.",
};

/// SOLiD P2-derived 3' adapter fragment.
pub const SOLID_3P: Fragment = Fragment {
    name: "SOLID_3P",
    sequence: "CTGCTGTACGGCCAAGGCGT",
    notes: "SOLiD P2 adapter, follows the barcode.",
};

/// All fragments, in the order they appear across templates.
pub const FRAGMENTS: &[Fragment] = &[SOLID_5P, ILLUMINA_READ1, T2S, SOLID_3P];

/// Slot that receives the barcode.
pub const BARCODE_SLOT: &str = "barcode";

/// Slots that exist for alternative layouts and are always filled with `""`.
pub const AUX_SLOTS: &[&str] = &["armr", "t2s5p", "t2s3p", "il5p", "il3p", "arml"];

/// SOLiD chemistry: P1 fragment, T2S, barcode, P2 fragment.
pub const SOLID_TEMPLATE: &str =
    "{armr}CCTCTCTATGGGCAGTCGGTGAT{t2s5p}TCTCATCGTAGCAAGTCACT{t2s3p}{barcode}CTGCTGTACGGCCAAGGCGT{arml}";

/// Illumina chemistry: read 1 primer site, T2S, barcode.
pub const ILLUMINA_TEMPLATE: &str =
    "{armr}{il5p}ACACTCTTTCCCTACACGACGCTCTTCCGATCT{il3p}{t2s5p}TCTCATCGTAGCAAGTCACT{t2s3p}{barcode}TA{arml}";

/// Hybrid chemistry (default): Illumina read 1 site and T2S with short spacers.
pub const HYBRID_TEMPLATE: &str =
    "{armr}TA{il5p}ACACTCTTTCCCTACACGACGCTCTTCCGATCT{il3p}AT{t2s5p}TCTCATCGTAGCAAGTCACT{t2s3p}{barcode}TCA{arml}";

//! Melting temperature, heterodimer temperature and base-composition helpers.
//!
//! The screen talks to thermodynamics only through [`ThermoCalculator`], so a
//! different model (e.g. a binding to a full secondary-structure library) can
//! be dropped in. [`NearestNeighbor`] is the built-in model:
//!
//! - SantaLucia (1998) unified nearest-neighbour ΔH/ΔS with per-end
//!   initiation and the self-complementary symmetry correction;
//! - salt correction on ΔS, `0.368 · (N − 1) · ln[Na⁺]`, with divalent cations
//!   folded in as `Na_eq = mv + 120 · sqrt(max(dv − dNTP, 0))` (mM);
//! - `Tm = ΔH / (ΔS + R · ln(C / 4)) − 273.15`, `C` the oligo concentration.
//!
//! Heterodimer Tm is the Tm of the most stable (lowest ΔG at 37 °C) ungapped
//! antiparallel Watson–Crick stretch of at least two base pairs between the two
//! strands, clamped at 0 °C; 0.0 when no such stretch exists.
use bio::alphabets::dna::revcomp;

use crate::config::ThermoParams;

/// Gas constant, cal/(K·mol).
const R: f64 = 1.9872;
const KELVIN: f64 = 273.15;
/// Temperature (K) at which heterodimer stretches are compared by ΔG.
const T37: f64 = 310.15;
/// Bases at the 5' end of the left arm that form the GC clamp.
pub const CLAMP_WINDOW: usize = 5;

/// Source of self-duplex and heterodimer melting temperatures.
pub trait ThermoCalculator: Sync {
    /// Tm (°C) of `seq` against its perfect complement.
    fn tm(&self, seq: &str, params: &ThermoParams) -> f64;
    /// Tm (°C) of the most stable duplex between `a` and `b`.
    fn heterodimer_tm(&self, a: &str, b: &str, params: &ThermoParams) -> f64;
}

/// Built-in nearest-neighbour model, see the module docs.
#[derive(Clone, Copy, Debug, Default)]
pub struct NearestNeighbor;

impl ThermoCalculator for NearestNeighbor {
    fn tm(&self, seq: &str, params: &ThermoParams) -> f64 {
        let s = seq.as_bytes();
        if s.len() < 2 { return 0.0; }
        let (dh, ds) = duplex_dh_ds(s);
        let self_comp = revcomp(s) == s;
        melting_temp(dh, ds, s.len(), params, self_comp)
    }

    fn heterodimer_tm(&self, a: &str, b: &str, params: &ThermoParams) -> f64 {
        let a = a.as_bytes();
        let rb: Vec<u8> = b.bytes().rev().collect();
        if a.len() < 2 || rb.len() < 2 { return 0.0; }
        let (n, m) = (a.len() as isize, rb.len() as isize);
        // (ΔG37, Tm) of the most stable stretch so far.
        let mut best: Option<(f64, f64)> = None;
        let mut consider = |stretch: &[u8]| {
            let (dh, ds) = duplex_dh_ds(stretch);
            let ds = ds + salt_correction(stretch.len(), params);
            let dg = dh - T37 * ds / 1000.0;
            if best.map_or(true, |(bdg, _)| dg < bdg) {
                best = Some((dg, tm_from(dh, ds, params.dna_conc / 4.0)));
            }
        };
        for shift in -(n - 1)..m {
            let mut run_start: Option<usize> = None;
            for i in 0..=a.len() {
                let j = i as isize + shift;
                let paired = i < a.len() && j >= 0 && j < m && pairs(a[i], rb[j as usize]);
                match (paired, run_start) {
                    (true, None) => run_start = Some(i),
                    (false, Some(start)) => {
                        if i - start >= 2 { consider(&a[start..i]); }
                        run_start = None;
                    }
                    _ => {}
                }
            }
        }
        best.map_or(0.0, |(_, tm)| tm.max(0.0))
    }
}

fn pairs(x: u8, y: u8) -> bool {
    matches!(
        (x.to_ascii_uppercase(), y.to_ascii_uppercase()),
        (b'A', b'T') | (b'T', b'A') | (b'G', b'C') | (b'C', b'G')
    )
}

/// SantaLucia 1998 unified stacks, (ΔH kcal/mol, ΔS cal/K·mol), keyed by the
/// 5'→3' dinucleotide of the top strand.
fn nn_stack(a: u8, b: u8) -> (f64, f64) {
    match (a.to_ascii_uppercase(), b.to_ascii_uppercase()) {
        (b'A', b'A') | (b'T', b'T') => (-7.9, -22.2),
        (b'A', b'T') => (-7.2, -20.4),
        (b'T', b'A') => (-7.2, -21.3),
        (b'C', b'A') | (b'T', b'G') => (-8.5, -22.7),
        (b'G', b'T') | (b'A', b'C') => (-8.4, -22.4),
        (b'C', b'T') | (b'A', b'G') => (-7.8, -21.0),
        (b'G', b'A') | (b'T', b'C') => (-8.2, -22.2),
        (b'C', b'G') => (-10.6, -27.2),
        (b'G', b'C') => (-9.8, -24.4),
        (b'C', b'C') | (b'G', b'G') => (-8.0, -19.9),
        _ => (0.0, 0.0),
    }
}

fn terminal(base: u8) -> (f64, f64) {
    match base.to_ascii_uppercase() {
        b'G' | b'C' => (0.1, -2.8),
        _ => (2.3, 4.1),
    }
}

/// Uncorrected ΔH/ΔS of `s` paired with its complement, initiation included.
fn duplex_dh_ds(s: &[u8]) -> (f64, f64) {
    let (mut dh, mut ds) = (0.0, 0.0);
    for w in s.windows(2) {
        let (h, e) = nn_stack(w[0], w[1]);
        dh += h;
        ds += e;
    }
    for end in [s[0], s[s.len() - 1]] {
        let (h, e) = terminal(end);
        dh += h;
        ds += e;
    }
    (dh, ds)
}

/// Sodium-equivalent concentration (mM).
pub fn sodium_equivalent(params: &ThermoParams) -> f64 {
    params.mv_conc + 120.0 * (params.dv_conc - params.dntp_conc).max(0.0).sqrt()
}

fn salt_correction(len: usize, params: &ThermoParams) -> f64 {
    0.368 * (len as f64 - 1.0) * (sodium_equivalent(params) / 1000.0).ln()
}

fn tm_from(dh: f64, ds: f64, conc_nm: f64) -> f64 {
    1000.0 * dh / (ds + R * (conc_nm * 1e-9).ln()) - KELVIN
}

fn melting_temp(dh: f64, ds: f64, len: usize, params: &ThermoParams, self_comp: bool) -> f64 {
    let ds = ds + salt_correction(len, params);
    if self_comp {
        tm_from(dh, ds - 1.4, params.dna_conc)
    } else {
        tm_from(dh, ds, params.dna_conc / 4.0)
    }
}

/// Fraction of G/C bases; 0.0 for an empty sequence.
#[inline]
pub fn gc_fraction(seq: &str) -> f64 {
    if seq.is_empty() { return 0.0; }
    let gc = seq.bytes().filter(|b| matches!(b, b'G' | b'C' | b'g' | b'c')).count();
    gc as f64 / seq.len() as f64
}

fn gc_count(s: &[u8]) -> usize {
    s.iter().filter(|b| matches!(b, b'G' | b'C' | b'g' | b'c')).count()
}

/// G/C count in the first five bases of the left arm.
pub fn left_arm_gc_clamp(seq: &str) -> usize {
    let s = seq.as_bytes();
    gc_count(&s[..s.len().min(CLAMP_WINDOW)])
}

/// G/C count in the last five bases of the right arm.
pub fn right_arm_gc_clamp(seq: &str) -> usize {
    let s = seq.as_bytes();
    gc_count(&s[s.len().saturating_sub(CLAMP_WINDOW)..])
}

/// Reverse complement of an uppercase DNA string.
pub fn reverse_complement(seq: &str) -> String {
    String::from_utf8_lossy(&revcomp(seq.as_bytes())).into_owned()
}

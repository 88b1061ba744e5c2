//! Arm screen: the acceptability test applied to every candidate window.
//!
//! Padlock layout, left and right in terms of the hybridised target:
//!
//! ```text
//! LINEAR
//! 5'    Right Arm       Scaffold (loop)       Left Arm     3'
//! +------------------>+--------~--------+------------------>
//!
//! HYBRIDISED
//!                   Scaffold (loop)
//!         ---------------~---------------
//!         |                             |
//!         <     Left Arm    3' 5'   Right Arm    +
//! 3'      +------------------>+------------------>     5'
//! <----------------------------------------------------+
//! ```
//!
//! Every criterion is evaluated and recorded even after one has failed, so a
//! [`ScreeningReport`] is always complete. Failures are logged at `debug`.
use aho_corasick::AhoCorasick;

use crate::config::ScreeningConfig;
use crate::error::{Error, Result};
use crate::thermo::{gc_fraction, left_arm_gc_clamp, right_arm_gc_clamp, NearestNeighbor, ThermoCalculator};

/// Highest G/C count tolerated in the left arm clamp window.
pub const MAX_CLAMP_GC: usize = 3;

/// A screening criterion that a candidate failed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Criterion {
    GcMinLeft,
    GcMinRight,
    GcMaxLeft,
    GcMaxRight,
    ClampLeft,
    ArmTmLeft,
    ArmTmRight,
    ExcludedSeq,
    HeteroArms,
    HeteroLeftLoop,
    HeteroRightLoop,
}

/// Per-candidate diagnostics, also the input to ranking.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScreeningReport {
    /// GC fraction of the left arm.
    pub gc_l: f64,
    /// GC fraction of the right arm.
    pub gc_r: f64,
    /// G/C count in the left arm clamp window (first 5 nt).
    pub clamp_l: usize,
    /// G/C count in the right arm 3' window (last 5 nt); recorded, not gated.
    pub clamp_r: usize,
    /// Left arm Tm (°C).
    pub tm_arm_l: f64,
    /// Right arm Tm (°C).
    pub tm_arm_r: f64,
    /// Heterodimer Tm, left × right.
    pub tm_hetero_lr: f64,
    /// Heterodimer Tm, left × loop.
    pub tm_hetero_l_loop: f64,
    /// Heterodimer Tm, right × loop.
    pub tm_hetero_r_loop: f64,
    /// Excluded substrings found in `right + loop + left`, in configuration order.
    pub excluded: Vec<String>,
    /// Criteria that failed; empty for an accepted candidate.
    pub failures: Vec<Criterion>,
}

impl ScreeningReport {
    pub fn accepted(&self) -> bool { self.failures.is_empty() }

    /// Ranking score; the left arm Tm is weighted above the right.
    pub fn rank_score(&self) -> f64 {
        self.tm_arm_l + 0.9 * self.tm_arm_r
    }
}

/// A configured screen. Build once per run and reuse for every window.
pub struct ArmScreen<'a, T: ThermoCalculator = NearestNeighbor> {
    config: &'a ScreeningConfig,
    calc: T,
    motifs: Option<AhoCorasick>,
}

impl<'a> ArmScreen<'a, NearestNeighbor> {
    pub fn new(config: &'a ScreeningConfig) -> Result<Self> {
        Self::with_calculator(config, NearestNeighbor)
    }
}

impl<'a, T: ThermoCalculator> ArmScreen<'a, T> {
    pub fn with_calculator(config: &'a ScreeningConfig, calc: T) -> Result<Self> {
        let motifs = if config.exclude_seqs.is_empty() {
            None
        } else {
            let ac = AhoCorasick::new(config.exclude_seqs.iter().map(|s| s.as_bytes()))
                .map_err(|e| Error::config(format!("cannot build exclude_seqs matcher: {}", e)))?;
            Some(ac)
        };
        Ok(ArmScreen { config, calc, motifs })
    }

    pub fn config(&self) -> &ScreeningConfig { self.config }

    pub fn calculator(&self) -> &T { &self.calc }

    /// Distinct excluded substrings present in `seq`, in configuration order.
    pub fn excluded_in(&self, seq: &str) -> Vec<String> {
        let Some(ac) = &self.motifs else { return Vec::new() };
        let mut ids: Vec<usize> = ac.find_overlapping_iter(seq).map(|m| m.pattern().as_usize()).collect();
        ids.sort_unstable();
        ids.dedup();
        ids.into_iter().map(|i| self.config.exclude_seqs[i].clone()).collect()
    }

    /// Screen one arm pair against `loop_seq`. Returns the verdict and the full report.
    pub fn screen(&self, left: &str, right: &str, loop_seq: &str) -> (bool, ScreeningReport) {
        let cfg = self.config;
        let tp = &cfg.thermo_params;
        let mut failures = Vec::new();
        let mut fail = |c: Criterion, msg: String| {
            log::debug!("{}", msg);
            failures.push(c);
        };

        // 1. GC content
        let gc_l = gc_fraction(left);
        let gc_r = gc_fraction(right);
        if gc_l < cfg.arm_gc_min { fail(Criterion::GcMinLeft, format!("gc content L min fail {:.3}", gc_l)); }
        if gc_r < cfg.arm_gc_min { fail(Criterion::GcMinRight, format!("gc content R min fail {:.3}", gc_r)); }
        if gc_l > cfg.arm_gc_max { fail(Criterion::GcMaxLeft, format!("gc content L max fail {:.3}", gc_l)); }
        if gc_r > cfg.arm_gc_max { fail(Criterion::GcMaxRight, format!("gc content R max fail {:.3}", gc_r)); }

        // 2. GC clamp
        let clamp_l = left_arm_gc_clamp(left);
        let clamp_r = right_arm_gc_clamp(right);
        if clamp_l > MAX_CLAMP_GC { fail(Criterion::ClampLeft, format!("l clamp fail {}", clamp_l)); }

        // 3. Arm Tm
        let tm_arm_l = self.calc.tm(left, tp);
        let tm_arm_r = self.calc.tm(right, tp);
        if tm_arm_l < cfg.arm_tm_min { fail(Criterion::ArmTmLeft, format!("arm L fail {:.3}", tm_arm_l)); }
        if tm_arm_r < cfg.arm_tm_min { fail(Criterion::ArmTmRight, format!("arm R fail {:.3}", tm_arm_r)); }

        // 4. Excluded substrings in the assembled probe
        let probe = format!("{}{}{}", right, loop_seq, left);
        let excluded = self.excluded_in(&probe);
        if !excluded.is_empty() { fail(Criterion::ExcludedSeq, format!("excluded seqs {:?}", excluded)); }

        // 5. Secondary structure / cross-hybridisation
        let tm_hetero_lr = self.calc.heterodimer_tm(left, right, tp);
        let tm_hetero_l_loop = self.calc.heterodimer_tm(left, loop_seq, tp);
        let tm_hetero_r_loop = self.calc.heterodimer_tm(right, loop_seq, tp);
        if tm_hetero_lr > cfg.structure_tm_max { fail(Criterion::HeteroArms, format!("hetero 0 fail {:.3}", tm_hetero_lr)); }
        if tm_hetero_l_loop > cfg.structure_tm_max { fail(Criterion::HeteroLeftLoop, format!("hetero 1 fail {:.3}", tm_hetero_l_loop)); }
        if tm_hetero_r_loop > cfg.structure_tm_max { fail(Criterion::HeteroRightLoop, format!("hetero 2 fail {:.3}", tm_hetero_r_loop)); }

        let report = ScreeningReport {
            gc_l,
            gc_r,
            clamp_l,
            clamp_r,
            tm_arm_l,
            tm_arm_r,
            tm_hetero_lr,
            tm_hetero_l_loop,
            tm_hetero_r_loop,
            excluded,
            failures,
        };
        (report.accepted(), report)
    }
}

/// One-shot screen with the built-in thermodynamic model.
///
/// Prefer [`ArmScreen`] when screening many windows with the same configuration.
///
/// # Examples
/// ```
/// use padlock::{config::default_config, screen::screen_arms};
/// let (ok, report) = screen_arms("GGGATCACTGCCTAGCATCA", "CATCGTACAGTCACTCAGGG", "TTTTGG", &default_config()).unwrap();
/// assert!(!ok);
/// assert_eq!(report.excluded, vec!["GGGGG".to_string()]);
/// ```
pub fn screen_arms(left: &str, right: &str, loop_seq: &str, config: &ScreeningConfig) -> Result<(bool, ScreeningReport)> {
    Ok(ArmScreen::new(config)?.screen(left, right, loop_seq))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{default_config, ThermoParams};
    use crate::scaffold::{create_scaffold, Chemistry};

    const LEFT: &str = "GGGATCACTGCCTAGCATCA";
    const RIGHT: &str = "CATCGTACAGTCACTCAGGG";

    /// Constant temperatures, to exercise the gates without the NN model.
    struct Fixed { tm: f64, hetero: f64 }
    impl ThermoCalculator for Fixed {
        fn tm(&self, _: &str, _: &ThermoParams) -> f64 { self.tm }
        fn heterodimer_tm(&self, _: &str, _: &str, _: &ThermoParams) -> f64 { self.hetero }
    }

    #[test]
    fn clean_pair_passes_the_default_screen() {
        let cfg = default_config();
        let loop_seq = create_scaffold("ACGTAC", Chemistry::Hybrid).unwrap();
        let (ok, r) = screen_arms(LEFT, RIGHT, &loop_seq, &cfg).unwrap();
        assert!(ok, "{:?}", r);
        assert!((r.gc_l - 0.55).abs() < 1e-12 && (r.gc_r - 0.55).abs() < 1e-12);
        assert_eq!(r.clamp_l, 3);
        assert!(r.tm_arm_l >= 50.0 && r.tm_arm_r >= 50.0);
        assert!(r.excluded.is_empty());
    }

    #[test]
    fn excluded_motif_across_loop_junction_is_recorded() {
        let cfg = default_config();
        let (ok, r) = screen_arms(LEFT, RIGHT, "TTTTGG", &cfg).unwrap();
        assert!(!ok);
        assert_eq!(r.excluded, vec!["GGGGG".to_string()]);
        assert!(r.failures.contains(&Criterion::ExcludedSeq));
    }

    #[test]
    fn all_overlapping_motifs_are_reported_in_config_order() {
        let mut cfg = default_config();
        cfg.exclude_seqs = vec!["TTTT".to_string(), "GGG".to_string(), "GGGGG".to_string(), "CCCCC".to_string()];
        let screen = ArmScreen::new(&cfg).unwrap();
        assert_eq!(screen.excluded_in("AGGGGGTTTTA"), vec!["TTTT", "GGG", "GGGGG"]);
        assert!(screen.excluded_in("ACGT").is_empty());
    }

    #[test]
    fn every_field_is_filled_even_after_a_failure() {
        let cfg = default_config();
        let screen = ArmScreen::with_calculator(&cfg, Fixed { tm: 42.0, hetero: 35.0 }).unwrap();
        let (ok, r) = screen.screen("AAAAAAAAAAAAAAAAAAAA", RIGHT, "TTTT");
        assert!(!ok);
        assert_eq!(r.gc_l, 0.0);
        assert_eq!(r.tm_arm_l, 42.0);
        assert_eq!(r.tm_arm_r, 42.0);
        assert_eq!(r.tm_hetero_lr, 35.0);
        assert_eq!(r.tm_hetero_l_loop, 35.0);
        assert_eq!(r.tm_hetero_r_loop, 35.0);
        for c in [Criterion::GcMinLeft, Criterion::ArmTmLeft, Criterion::ArmTmRight, Criterion::HeteroArms] {
            assert!(r.failures.contains(&c), "{:?}", c);
        }
        assert!(!r.failures.contains(&Criterion::GcMinRight));
    }

    #[test]
    fn gc_bounds_are_inclusive() {
        let mut cfg = default_config();
        cfg.arm_gc_min = 0.5;
        cfg.arm_gc_max = 0.5;
        let screen = ArmScreen::with_calculator(&cfg, Fixed { tm: 60.0, hetero: 0.0 }).unwrap();
        // 10 of 20 G/C, clamp window ATATA
        let arm = "ATATAGCGCGCGCGCATATA";
        let (ok, r) = screen.screen(arm, arm, "TT");
        assert!(ok, "{:?}", r.failures);
        let (ok, _) = screen.screen("ATATAGCGCGCGCGAATATA", arm, "TT");
        assert!(!ok);
    }

    #[test]
    fn clamp_gates_left_arm_only() {
        let mut cfg = default_config();
        cfg.arm_gc_min = 0.0;
        cfg.arm_gc_max = 1.0;
        let screen = ArmScreen::with_calculator(&cfg, Fixed { tm: 60.0, hetero: 0.0 }).unwrap();
        let clamped = "GCGCATATATATATATATAT";
        let (ok, r) = screen.screen(clamped, "ATATATATATATATAGCGCG", "TT");
        assert!(!ok);
        assert_eq!(r.failures, vec![Criterion::ClampLeft]);
        assert_eq!(r.clamp_r, 5);
        let (ok, _) = screen.screen("ATATATATATATATAGCGCG", clamped, "TT");
        assert!(ok);
    }

    #[test]
    fn rank_score_weights_left_arm() {
        let r = ScreeningReport { tm_arm_l: 60.0, tm_arm_r: 50.0, ..Default::default() };
        assert!((r.rank_score() - 105.0).abs() < 1e-12);
    }
}

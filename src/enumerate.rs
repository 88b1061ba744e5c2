//! Sliding-window candidate enumeration.
//!
//! Every window start `i` in `0 .. len - (2 * arm_length + gap_size)` is
//! considered in increasing order. A window whose span carries a `GGGG` run is
//! skipped before any thermodynamics are computed; the rest are screened
//! against the run's fixed scaffold and kept when accepted.
//!
//! Windows are independent, so [`enumerate_candidates_par`] screens them on a
//! local rayon pool and hands back the same ascending-index list as the
//! sequential [`enumerate_candidates`].
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use crate::config::ScreeningConfig;
use crate::error::Result;
use crate::scaffold::POLY_G;
use crate::screen::{ArmScreen, ScreeningReport};
use crate::thermo::{NearestNeighbor, ThermoCalculator};

/// An accepted window: its start index and the screen report.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub index: usize,
    pub report: ScreeningReport,
}

/// Left and right arm of the window starting at `index`.
///
/// `left = seq[index .. index + arm_length]`,
/// `right = seq[index + arm_length + gap_size .. index + 2 * arm_length + gap_size]`.
/// `None` if the window runs past the end of `seq`.
///
/// # Examples
/// ```
/// use padlock::enumerate::arm_windows;
/// assert_eq!(arm_windows("AACCGGTT", 1, 2, 1), Some(("AC", "GG")));
/// assert_eq!(arm_windows("AACCGGTT", 5, 2, 1), None);
/// ```
pub fn arm_windows(seq: &str, index: usize, arm_length: usize, gap_size: usize) -> Option<(&str, &str)> {
    let left = seq.get(index..index + arm_length)?;
    let r0 = index + arm_length + gap_size;
    let right = seq.get(r0..r0 + arm_length)?;
    Some((left, right))
}

/// Number of window starts examined for a sequence of `seq_len` bases.
pub fn window_count(seq_len: usize, config: &ScreeningConfig) -> usize {
    seq_len.saturating_sub(config.span())
}

/// Screen the window at `index`; `None` when pre-filtered, out of range or rejected.
fn screen_window<T: ThermoCalculator>(seq: &str, index: usize, screen: &ArmScreen<'_, T>, scaffold: &str) -> Option<Candidate> {
    let cfg = screen.config();
    let span = seq.get(index..index + cfg.span())?;
    if span.contains(POLY_G) {
        log::trace!("window {} skipped: poly-G", index);
        return None;
    }
    let (left, right) = arm_windows(seq, index, cfg.arm_length, cfg.gap_size)?;
    let (ok, report) = screen.screen(left, right, scaffold);
    if ok { Some(Candidate { index, report }) } else { None }
}

/// Lazy, restartable iterator over accepted candidates in ascending index order.
pub struct Candidates<'a, T: ThermoCalculator = NearestNeighbor> {
    seq: &'a str,
    scaffold: &'a str,
    screen: &'a ArmScreen<'a, T>,
    next: usize,
    end: usize,
}

impl<'a, T: ThermoCalculator> Candidates<'a, T> {
    pub fn new(seq: &'a str, screen: &'a ArmScreen<'a, T>, scaffold: &'a str) -> Self {
        let end = window_count(seq.len(), screen.config());
        Candidates { seq, scaffold, screen, next: 0, end }
    }
}

impl<T: ThermoCalculator> Clone for Candidates<'_, T> {
    fn clone(&self) -> Self {
        Candidates { seq: self.seq, scaffold: self.scaffold, screen: self.screen, next: self.next, end: self.end }
    }
}

impl<T: ThermoCalculator> Iterator for Candidates<'_, T> {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        while self.next < self.end {
            let i = self.next;
            self.next += 1;
            if let Some(c) = screen_window(self.seq, i, self.screen, self.scaffold) {
                return Some(c);
            }
        }
        None
    }
}

/// All accepted candidates of `seq`, screened sequentially.
pub fn enumerate_candidates(seq: &str, config: &ScreeningConfig, scaffold: &str) -> Result<Vec<Candidate>> {
    let screen = ArmScreen::new(config)?;
    Ok(Candidates::new(seq, &screen, scaffold).collect())
}

/// Screen every window of `seq` on a rayon pool of `threads` workers
/// (`None` = all logical cores). The result is sorted by window index.
pub fn screen_windows_par<T: ThermoCalculator>(
    seq: &str,
    screen: &ArmScreen<'_, T>,
    scaffold: &str,
    threads: Option<usize>,
) -> Result<Vec<Candidate>> {
    let n = threads.unwrap_or_else(num_cpus::get).max(1);
    let pool = ThreadPoolBuilder::new().num_threads(n).build()?;
    let end = window_count(seq.len(), screen.config());
    let mut out: Vec<Candidate> = pool.install(|| {
        (0..end)
            .into_par_iter()
            .filter_map(|i| screen_window(seq, i, screen, scaffold))
            .collect()
    });
    out.sort_by_key(|c| c.index);
    Ok(out)
}

/// Parallel counterpart of [`enumerate_candidates`].
pub fn enumerate_candidates_par(
    seq: &str,
    config: &ScreeningConfig,
    scaffold: &str,
    threads: Option<usize>,
) -> Result<Vec<Candidate>> {
    let screen = ArmScreen::new(config)?;
    screen_windows_par(seq, &screen, scaffold, threads)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{default_config, ThermoParams};

    /// Accepts everything: Tm well above the minimum, no structure.
    struct Permissive;
    impl ThermoCalculator for Permissive {
        fn tm(&self, _: &str, _: &ThermoParams) -> f64 { 70.0 }
        fn heterodimer_tm(&self, _: &str, _: &str, _: &ThermoParams) -> f64 { 0.0 }
    }

    fn open_config(arm_length: usize, gap_size: usize) -> ScreeningConfig {
        let mut c = default_config();
        c.arm_length = arm_length;
        c.gap_size = gap_size;
        c.arm_gc_min = 0.0;
        c.arm_gc_max = 1.0;
        c.exclude_seqs.clear();
        c
    }

    #[test]
    fn arm_windows_respects_gap() {
        let seq = "AAAACCCCGGTTTT";
        assert_eq!(arm_windows(seq, 0, 4, 0), Some(("AAAA", "CCCC")));
        assert_eq!(arm_windows(seq, 0, 4, 2), Some(("AAAA", "CCGG")));
        assert_eq!(arm_windows(seq, 6, 4, 0), Some(("CCGG", "TTTT")));
        assert_eq!(arm_windows(seq, 7, 4, 0), None);
        assert_eq!(arm_windows(seq, 4, 4, 2), Some(("CCCC", "TTTT")));
        assert_eq!(arm_windows(seq, 5, 4, 2), None);
    }

    #[test]
    fn every_window_is_visited_once_in_order() {
        let cfg = open_config(3, 1);
        let screen = ArmScreen::with_calculator(&cfg, Permissive).unwrap();
        let seq = "ATATATATATATAT";
        let idx: Vec<usize> = Candidates::new(seq, &screen, "TT").map(|c| c.index).collect();
        // 14 - (2*3 + 1) = 7 windows, upper bound exclusive
        assert_eq!(idx, (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn iterator_is_restartable() {
        let cfg = open_config(3, 0);
        let screen = ArmScreen::with_calculator(&cfg, Permissive).unwrap();
        let it = Candidates::new("ATATATATATAT", &screen, "TT");
        let a: Vec<_> = it.clone().collect();
        let b: Vec<_> = it.collect();
        assert_eq!(a, b);
        assert_eq!(a.len(), 6);
    }

    #[test]
    fn poly_g_windows_are_skipped_before_screening() {
        let cfg = open_config(3, 0);
        let screen = ArmScreen::with_calculator(&cfg, Permissive).unwrap();
        // GGGG at 8..12; only spans starting at 6, 7 or 8 hold all four
        let seq = "ATATATATGGGGATATATAT";
        let idx: Vec<usize> = Candidates::new(seq, &screen, "TT").map(|c| c.index).collect();
        assert_eq!(idx, vec![0, 1, 2, 3, 4, 5, 9, 10, 11, 12, 13]);
    }

    #[test]
    fn short_sequences_yield_nothing() {
        let cfg = default_config();
        assert!(enumerate_candidates("ACGT", &cfg, "TT").unwrap().is_empty());
        let exact: String = "AC".repeat(20);
        assert!(enumerate_candidates(&exact, &cfg, "TT").unwrap().is_empty());
        assert_eq!(window_count(40, &cfg), 0);
        assert_eq!(window_count(41, &cfg), 1);
    }

    #[test]
    fn parallel_matches_sequential() {
        let cfg = open_config(4, 2);
        let screen = ArmScreen::with_calculator(&cfg, Permissive).unwrap();
        let seq = "ACGTTGCAAGGGGTACCATGCATGACGTACGTTTGACCA";
        let seq_list: Vec<_> = Candidates::new(seq, &screen, "TT").collect();
        let par_list = screen_windows_par(seq, &screen, "TT", Some(3)).unwrap();
        assert_eq!(seq_list, par_list);
        assert!(par_list.windows(2).all(|w| w[0].index < w[1].index));
    }
}

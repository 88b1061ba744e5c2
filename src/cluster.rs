//! Grouping of accepted candidates into spacing clusters and per-cluster selection.
//!
//! Clustering is a single forward pass over candidates sorted by window index.
//! The first candidate opens a cluster with threshold
//! `index + 2 * arm_length + spacing`; every later candidate whose index
//! exceeds the threshold opens the next cluster and resets it. Within a
//! cluster, members are ranked by [`ScreeningReport::rank_score`] (stable,
//! descending) and the top one represents the cluster.
//!
//! Only cluster *leaders* are guaranteed to lie more than
//! `2 * arm_length + spacing` apart. Representatives come out in strictly
//! increasing index order, but the best member of one cluster may be its last
//! and the best of the next its first, so two adjacent representatives can
//! sit closer than `spacing`.
//!
//! [`ScreeningReport::rank_score`]: crate::screen::ScreeningReport::rank_score
use std::cmp::Ordering;

use crate::enumerate::Candidate;

/// A contiguous run of candidates within one spacing threshold of its first member.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cluster {
    pub members: Vec<Candidate>,
}

impl Cluster {
    /// Index of the member that opened the cluster.
    pub fn leader_index(&self) -> Option<usize> {
        self.members.first().map(|c| c.index)
    }

    pub fn len(&self) -> usize { self.members.len() }

    pub fn is_empty(&self) -> bool { self.members.is_empty() }
}

fn by_score_desc(a: &Candidate, b: &Candidate) -> Ordering {
    b.report
        .rank_score()
        .partial_cmp(&a.report.rank_score())
        .unwrap_or(Ordering::Equal)
}

/// Partition `candidates` (ascending by index) into spacing clusters.
pub fn cluster(candidates: Vec<Candidate>, arm_length: usize, spacing: usize) -> Vec<Cluster> {
    let reach = 2 * arm_length + spacing;
    let mut clusters: Vec<Cluster> = Vec::new();
    let mut delta = 0usize;
    for c in candidates {
        match clusters.last_mut() {
            Some(open) if c.index <= delta => open.members.push(c),
            _ => {
                delta = c.index + reach;
                clusters.push(Cluster { members: vec![c] });
            }
        }
    }
    clusters
}

/// Sort candidates by descending score; ties keep enumeration order.
pub fn rank(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by(by_score_desc);
    candidates
}

/// One representative per cluster, in cluster order.
pub fn select_representatives(clusters: Vec<Cluster>) -> Vec<Candidate> {
    let picked: Vec<Candidate> = clusters
        .into_iter()
        .filter_map(|cl| rank(cl.members).into_iter().next())
        .collect();
    log::info!("selected {} representatives", picked.len());
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::ScreeningReport;

    fn cand(index: usize, tm_l: f64, tm_r: f64) -> Candidate {
        Candidate { index, report: ScreeningReport { tm_arm_l: tm_l, tm_arm_r: tm_r, ..Default::default() } }
    }

    fn indices(cl: &Cluster) -> Vec<usize> {
        cl.members.iter().map(|c| c.index).collect()
    }

    #[test]
    fn empty_input_gives_no_clusters() {
        assert!(cluster(Vec::new(), 20, 20).is_empty());
        assert!(select_representatives(Vec::new()).is_empty());
    }

    #[test]
    fn threshold_is_inclusive_and_resets_on_new_cluster() {
        // reach = 2*5 + 3 = 13
        let cands = vec![cand(0, 1.0, 1.0), cand(13, 1.0, 1.0), cand(14, 1.0, 1.0), cand(27, 1.0, 1.0), cand(28, 1.0, 1.0)];
        let cl = cluster(cands, 5, 3);
        assert_eq!(cl.len(), 3);
        assert_eq!(indices(&cl[0]), vec![0, 13]);
        assert_eq!(indices(&cl[1]), vec![14, 27]);
        assert_eq!(indices(&cl[2]), vec![28]);
    }

    #[test]
    fn threshold_is_anchored_on_first_member_not_last() {
        let cands: Vec<Candidate> = (0..10).map(|i| cand(i * 3, 1.0, 1.0)).collect();
        let cl = cluster(cands, 2, 2); // reach 6
        assert_eq!(indices(&cl[0]), vec![0, 3, 6]);
        assert_eq!(indices(&cl[1]), vec![9, 12, 15]);
        assert_eq!(indices(&cl[2]), vec![18, 21, 24]);
        assert_eq!(indices(&cl[3]), vec![27]);
    }

    #[test]
    fn ranking_weights_left_arm_and_is_stable() {
        // 60 + 0.9*50 = 105 vs 50 + 0.9*60 = 104
        let members = vec![cand(0, 50.0, 60.0), cand(1, 60.0, 50.0), cand(2, 60.0, 50.0)];
        let order: Vec<usize> = rank(members.clone()).iter().map(|c| c.index).collect();
        assert_eq!(order, vec![1, 2, 0]);
        let reps = select_representatives(vec![Cluster { members }]);
        assert_eq!(reps.iter().map(|c| c.index).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn one_representative_per_cluster() {
        let cands = vec![cand(0, 50.0, 50.0), cand(5, 55.0, 50.0), cand(100, 52.0, 52.0), cand(110, 51.0, 51.0)];
        let reps = select_representatives(cluster(cands, 20, 20));
        let idx: Vec<usize> = reps.iter().map(|c| c.index).collect();
        assert_eq!(idx, vec![5, 100]);
    }

    #[test]
    fn adjacent_representatives_may_sit_closer_than_spacing() {
        // reach = 2*2 + 10 = 14: clusters {0, 14} and {15}
        let cands = vec![cand(0, 40.0, 40.0), cand(14, 60.0, 60.0), cand(15, 50.0, 50.0)];
        let clusters = cluster(cands, 2, 10);
        let leaders: Vec<usize> = clusters.iter().filter_map(|c| c.leader_index()).collect();
        assert_eq!(leaders, vec![0, 15]);
        let reps: Vec<usize> = select_representatives(clusters).iter().map(|c| c.index).collect();
        assert_eq!(reps, vec![14, 15]);
    }
}

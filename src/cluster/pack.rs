//! DBSCAN on sorted one-dimensional data ("packing").
//!
//! When the data is a single ascending array (timestamps, positions along a
//! track), every ε-neighborhood is a contiguous run around its point, and
//! two core points belong to the same cluster exactly when every gap between
//! consecutive core points separating them is below ε. Clusters can then be
//! found in one forward pass: each core point either continues the cluster
//! of the previous core point or opens the next one.
//!
//! - [`DbPack`]: crisp labels, identical to [`Dbscan`](super::Dbscan) with
//!   absolute difference as the metric. Supports [`DbPack::extend`] for
//!   append-only data.
//! - [`BorderPack`]: crisp cores within `min_eps`, fuzzy borders out to
//!   `max_eps`.
//! - [`CorePack`]: fuzzy core membership from the neighborhood size.

use tracing::debug;

use super::fuzzy::{core_membership, distance_membership};
use super::label::{FuzzyLabel, NOISE, UNCLASSIFIED};
use super::neighbors::SortedScan;
use crate::error::{invalid, Error, Result};

/// Crisp DBSCAN over an ascending 1-D array.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DbPack {
    epsilon: f32,
    min_pts: usize,
}

impl DbPack {
    /// Create a packer. `epsilon` must be positive and `min_pts` at least 1.
    pub fn new(epsilon: f32, min_pts: usize) -> Result<Self> {
        if !(epsilon > 0.0) {
            return Err(invalid("epsilon", "must be positive"));
        }
        if min_pts == 0 {
            return Err(invalid("min_pts", "must be at least 1"));
        }
        Ok(Self { epsilon, min_pts })
    }

    /// Neighborhood radius.
    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// Minimum neighborhood size of a core point.
    pub fn min_pts(&self) -> usize {
        self.min_pts
    }

    /// Label every value of the ascending array `data`.
    pub fn predict(&self, data: &[f32]) -> Result<Vec<i32>> {
        let scan = SortedScan::new(data)?;
        let mut labels = vec![UNCLASSIFIED; data.len()];
        self.scan_from(&scan, 0, 0, &mut labels);
        Ok(labels)
    }

    /// Label values appended to a previously labeled array.
    ///
    /// `data` is the whole ascending array and `prior` the labels of its first
    /// `prior.len()` values. Labeling resumes from the last previously labeled
    /// index, stepping back over the old values within `epsilon` of the
    /// first new one since their neighborhoods grew. Earlier cluster labels
    /// are kept as they are; earlier noise inside a new core neighborhood is
    /// promoted to a border point. New clusters are numbered after the
    /// largest prior id.
    pub fn extend(&self, data: &[f32], prior: &[i32]) -> Result<Vec<i32>> {
        let scan = SortedScan::new(data)?;
        if prior.len() > data.len() {
            return Err(Error::LabelCountMismatch {
                labels: prior.len(),
                points: data.len(),
            });
        }
        if prior.len() == data.len() {
            return Ok(prior.to_vec());
        }
        if prior.is_empty() {
            return self.predict(data);
        }

        let first_new = prior.len();
        let mut resume = first_new - 1;
        while resume > 0 && data[first_new] - data[resume - 1] < self.epsilon {
            resume -= 1;
        }

        let next_cluster = prior.iter().copied().max().map_or(0, |m| m.max(NOISE) + 1);
        let mut labels = prior.to_vec();
        labels.resize(data.len(), UNCLASSIFIED);
        self.scan_from(&scan, resume, next_cluster, &mut labels);
        Ok(labels)
    }

    /// Forward pass from `start`, opening clusters from `next_cluster` on.
    fn scan_from(&self, scan: &SortedScan<'_>, start: usize, mut next_cluster: i32, labels: &mut [i32]) {
        for i in start..labels.len() {
            let range = scan.range(i, self.epsilon);
            if range.end() - range.start() + 1 < self.min_pts {
                if labels[i] == UNCLASSIFIED {
                    labels[i] = NOISE;
                }
                continue;
            }

            // A core point already claimed by the previous core continues its cluster.
            let cluster = if labels[i] >= 0 {
                labels[i]
            } else {
                next_cluster += 1;
                next_cluster - 1
            };
            for j in range {
                if labels[j] == UNCLASSIFIED || labels[j] == NOISE {
                    labels[j] = cluster;
                }
            }
        }

        debug!(
            points = labels.len(),
            resumed_at = start,
            clusters = next_cluster,
            "dbpack finished"
        );
    }
}

/// Sorted 1-D DBSCAN with crisp cores and fuzzy borders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderPack {
    min_eps: f32,
    max_eps: f32,
    min_pts: usize,
}

impl BorderPack {
    /// Cores need `min_pts` values within `min_eps`; borders reach out to `max_eps`.
    pub fn new(min_eps: f32, max_eps: f32, min_pts: usize) -> Result<Self> {
        if !(min_eps > 0.0) {
            return Err(invalid("min_eps", "must be positive"));
        }
        if !(max_eps >= min_eps) {
            return Err(invalid("max_eps", "must be at least min_eps"));
        }
        if min_pts == 0 {
            return Err(invalid("min_pts", "must be at least 1"));
        }
        Ok(Self {
            min_eps,
            max_eps,
            min_pts,
        })
    }

    /// Label every value of the ascending array `data`.
    pub fn predict(&self, data: &[f32]) -> Result<Vec<FuzzyLabel>> {
        let scan = SortedScan::new(data)?;
        let core_degree: Vec<Option<f32>> = (0..data.len())
            .map(|i| (scan.count(i, self.min_eps) >= self.min_pts).then_some(1.0))
            .collect();

        Ok(fuzzy_scan(&scan, &core_degree, self.min_eps, self.max_eps, |_, d| {
            Some(distance_membership(d, self.min_eps, self.max_eps)).filter(|&m| m > 0.0)
        }))
    }
}

/// Sorted 1-D DBSCAN with fuzzy core membership.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorePack {
    epsilon: f32,
    min_pts: usize,
    max_pts: usize,
}

impl CorePack {
    /// Values with at least `min_pts` neighbors within `epsilon` are core; their
    /// membership ramps from 0 at `min_pts` to 1 at `max_pts` neighbors.
    pub fn new(epsilon: f32, min_pts: usize, max_pts: usize) -> Result<Self> {
        if !(epsilon > 0.0) {
            return Err(invalid("epsilon", "must be positive"));
        }
        if min_pts == 0 {
            return Err(invalid("min_pts", "must be at least 1"));
        }
        if max_pts < min_pts {
            return Err(invalid("max_pts", "must be at least min_pts"));
        }
        Ok(Self {
            epsilon,
            min_pts,
            max_pts,
        })
    }

    /// Label every value of the ascending array `data`.
    pub fn predict(&self, data: &[f32]) -> Result<Vec<FuzzyLabel>> {
        let scan = SortedScan::new(data)?;
        let core_degree: Vec<Option<f32>> = (0..data.len())
            .map(|i| {
                let count = scan.count(i, self.epsilon);
                (count >= self.min_pts)
                    .then(|| core_membership(count as f32, self.min_pts, self.max_pts))
            })
            .collect();

        Ok(fuzzy_scan(&scan, &core_degree, self.epsilon, self.epsilon, |core, _| Some(core)))
    }
}

/// Forward pass shared by the fuzzy packs.
///
/// `core_degree` is `None` for non-core values. `border(core_degree, distance)`
/// is the degree a core point passes to a non-core value inside its
/// `border_radius`, if any.
fn fuzzy_scan(
    scan: &SortedScan<'_>,
    core_degree: &[Option<f32>],
    core_radius: f32,
    border_radius: f32,
    border: impl Fn(f32, f32) -> Option<f32>,
) -> Vec<FuzzyLabel> {
    let data = scan.values();
    let mut labels = vec![FuzzyLabel::default(); data.len()];
    let mut cluster: i32 = -1;
    let mut last_core: Option<usize> = None;

    for (i, &degree) in core_degree.iter().enumerate() {
        let Some(degree) = degree else {
            continue;
        };
        match last_core {
            Some(k) if data[i] - data[k] < core_radius => {}
            _ => cluster += 1,
        }
        last_core = Some(i);

        labels[i].assign(cluster, degree);
        for x in scan.range(i, border_radius) {
            if core_degree[x].is_some() {
                continue;
            }
            if let Some(d) = border(degree, (data[x] - data[i]).abs()) {
                labels[x].assign(cluster, d);
            }
        }
    }

    for label in labels.iter_mut().filter(|l| l.is_empty()) {
        *label = FuzzyLabel::noise();
    }
    debug!(points = data.len(), clusters = cluster + 1, "fuzzy pack finished");
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{Dbscan, FuzzyDbscan};

    const POINTS: [f32; 6] = [1.0, 2.0, 3.0, 10.0, 11.0, 50.0];

    #[test]
    fn scenario_one_dimensional() {
        let labels = DbPack::new(2.0, 2).unwrap().predict(&POINTS).unwrap();
        assert_eq!(labels, vec![0, 0, 0, 1, 1, NOISE]);

        let labels = DbPack::new(0.5, 2).unwrap().predict(&POINTS).unwrap();
        assert_eq!(labels, vec![NOISE; 6]);
    }

    #[test]
    fn matches_dbscan() {
        let data = [
            0.0, 0.0, 1.0, 3.0, 4.0, 4.0, 5.0, 9.0, 12.0, 13.0, 13.0, 14.0, 16.0, 20.0,
        ];
        let scan = SortedScan::new(&data).unwrap();
        for (eps, min_pts) in [(1.5, 2), (1.5, 3), (2.5, 3), (4.5, 4)] {
            let expected = Dbscan::new(eps, min_pts).unwrap().predict_with_query(&scan);
            assert_eq!(DbPack::new(eps, min_pts).unwrap().predict(&data).unwrap(), expected);
        }
    }

    #[test]
    fn border_goes_to_earlier_cluster() {
        // 5.0 is within reach of both dense runs but core in neither.
        let data = [0.0, 1.0, 2.0, 3.0, 5.0, 7.0, 8.0, 9.0, 10.0];
        let labels = DbPack::new(2.5, 4).unwrap().predict(&data).unwrap();
        assert_eq!(labels, vec![0, 0, 0, 0, 0, 1, 1, 1, 1]);
    }

    #[test]
    fn extend_without_new_points_is_identity() {
        let pack = DbPack::new(2.0, 2).unwrap();
        let prior = pack.predict(&POINTS).unwrap();
        assert_eq!(pack.extend(&POINTS, &prior).unwrap(), prior);
    }

    #[test]
    fn extend_continues_and_opens_clusters() {
        let pack = DbPack::new(2.0, 2).unwrap();
        let old = [1.0, 2.0, 3.0, 10.0, 11.0];
        let prior = pack.predict(&old).unwrap();
        assert_eq!(prior, vec![0, 0, 0, 1, 1]);

        let data = [1.0, 2.0, 3.0, 10.0, 11.0, 12.0, 30.0, 31.0, 45.0];
        let labels = pack.extend(&data, &prior).unwrap();
        assert_eq!(labels, vec![0, 0, 0, 1, 1, 1, 2, 2, NOISE]);
        assert_eq!(labels, pack.predict(&data).unwrap());
    }

    #[test]
    fn extend_promotes_trailing_noise() {
        let pack = DbPack::new(2.0, 2).unwrap();
        let old = [1.0, 2.0, 8.0];
        let prior = pack.predict(&old).unwrap();
        assert_eq!(prior, vec![0, 0, NOISE]);

        let labels = pack.extend(&[1.0, 2.0, 8.0, 9.0], &prior).unwrap();
        assert_eq!(labels, vec![0, 0, 1, 1]);
    }

    #[test]
    fn extend_rejects_bad_input() {
        let pack = DbPack::new(2.0, 2).unwrap();
        assert!(matches!(
            pack.extend(&[1.0], &[0, 0]),
            Err(Error::LabelCountMismatch { labels: 2, points: 1 })
        ));
        assert!(matches!(
            pack.extend(&[3.0, 1.0], &[0]),
            Err(Error::Unsorted { index: 1 })
        ));
        assert_eq!(pack.extend(&POINTS, &[]).unwrap(), pack.predict(&POINTS).unwrap());
    }

    #[test]
    fn border_pack_matches_fuzzy_border() {
        let data = [0.0, 1.0, 2.0, 4.0, 8.0, 9.0, 9.5, 10.0, 15.0];
        let scan = SortedScan::new(&data).unwrap();
        let pack = BorderPack::new(1.5, 3.5, 2).unwrap().predict(&data).unwrap();
        let generic = FuzzyDbscan::border(1.5, 3.5, 2)
            .unwrap()
            .predict_with_query(&scan);
        assert_eq!(pack, generic);
        assert_eq!(pack[3].degree(0), 0.75);
        assert!(pack[8].is_noise());
    }

    #[test]
    fn core_pack_matches_fuzzy_core() {
        let data = [0.0, 1.0, 2.0, 3.0, 4.0, 20.0, 30.0, 30.5, 31.0];
        let scan = SortedScan::new(&data).unwrap();
        for (min_pts, max_pts) in [(2, 4), (3, 5), (1, 1)] {
            let pack = CorePack::new(2.5, min_pts, max_pts)
                .unwrap()
                .predict(&data)
                .unwrap();
            let generic = FuzzyDbscan::core(2.5, min_pts, max_pts)
                .unwrap()
                .predict_with_query(&scan);
            assert_eq!(pack, generic);
        }
    }

    #[test]
    fn core_pack_partition_matches_dbpack() {
        let data = [0.0, 1.0, 2.0, 10.0, 11.0, 12.0];
        let crisp = DbPack::new(1.5, 3).unwrap().predict(&data).unwrap();
        assert_eq!(crisp, vec![0, 0, 0, 1, 1, 1]);

        let fuzzy = CorePack::new(1.5, 3, 5).unwrap().predict(&data).unwrap();
        for (label, &c) in fuzzy.iter().zip(&crisp) {
            assert!(!label.is_noise());
            assert_eq!(label.clusters().collect::<Vec<_>>(), vec![c]);
            assert_eq!(label.degree(c), 0.0);
        }
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(DbPack::new(0.0, 2).is_err());
        assert!(DbPack::new(1.0, 0).is_err());
        assert!(BorderPack::new(2.0, 1.0, 2).is_err());
        assert!(CorePack::new(1.0, 3, 2).is_err());
        assert!(DbPack::new(1.0, 2).unwrap().predict(&[2.0, 1.0]).is_err());
    }
}

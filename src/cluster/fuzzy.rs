//! Fuzzy DBSCAN: graded core and border membership.
//!
//! Crisp DBSCAN makes two hard decisions: "is this point dense enough to be
//! core?" and "is this point close enough to a core point to join it?". The
//! fuzzy variants (Ienco & Bordogna, 2018) soften one or both decisions into
//! clamped linear ramps:
//!
//! ```text
//! core_membership(c)     = 0 if c ≤ min_pts, 1 if c ≥ max_pts, linear between
//! distance_membership(d) = 1 if d ≤ min_eps, 0 if d ≥ max_eps, linear between
//! ```
//!
//! | Variant    | Core test                                 | Border degree of x via core k          |
//! |------------|-------------------------------------------|----------------------------------------|
//! | `Core`     | `|N_eps| ≥ min_pts`                       | core degree of k                       |
//! | `Border`   | `|N_min_eps| ≥ min_pts` (degree 1)        | `distance_membership(d(x, k))`         |
//! | `Combined` | `core_membership(Σ distance memberships)` | `min(core degree of k, dist. membership)` |
//!
//! The core degree of a `Core` variant point is `core_membership(|N_eps|)`,
//! which is 0 for a core point with exactly `min_pts` neighbors: such a point
//! still expands its cluster like a crisp core point does.
//!
//! Core points connected through the core radius form one cluster and carry
//! their own core degree. Every non-core point within the border radius of a
//! cluster's core points joins that cluster with the maximum, over those core
//! points, of its border degree. A core point belongs to exactly one cluster;
//! a border point may belong to several. Points that end up in no cluster
//! carry a single noise entry with degree 1.
//!
//! Border degrees depend only on the finished core set of their cluster, so
//! they are computed in parallel.
//!
//! ## References
//!
//! Ienco, D., Bordogna, G. (2018). "Fuzzy extensions of the DBScan clustering
//! algorithm." Soft Computing 22, 1719–1730.

use rayon::prelude::*;
use tracing::debug;

use super::label::{FuzzyLabel, UNCLASSIFIED};
use super::neighbors::{NeighborQuery, NeighborStrategy, Neighbors};
use super::traits::FuzzyClustering;
use crate::distance::{Distance, Euclidean};
use crate::error::{invalid, Result};

/// Degree to which a neighborhood of (possibly fractional) size `count` is dense.
///
/// 0 at or below `min_pts`, 1 at or above `max_pts`, linear in between.
pub fn core_membership(count: f32, min_pts: usize, max_pts: usize) -> f32 {
    let (lo, hi) = (min_pts as f32, max_pts as f32);
    if count >= hi {
        1.0
    } else if count <= lo {
        0.0
    } else {
        (count - lo) / (hi - lo)
    }
}

/// Degree to which a point at `distance` is close.
///
/// 1 at or below `min_eps`, 0 at or above `max_eps`, linear in between.
pub fn distance_membership(distance: f32, min_eps: f32, max_eps: f32) -> f32 {
    if distance <= min_eps {
        1.0
    } else if distance >= max_eps {
        0.0
    } else {
        (max_eps - distance) / (max_eps - min_eps)
    }
}

/// Which decisions of DBSCAN are fuzzified, with their thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FuzzyVariant {
    /// Graded core membership from the neighborhood size inside `epsilon`.
    Core {
        /// Neighborhood radius.
        epsilon: f32,
        /// Neighborhood size with zero core membership.
        min_pts: usize,
        /// Neighborhood size with full core membership.
        max_pts: usize,
    },
    /// Crisp cores inside `min_eps`, graded borders out to `max_eps`.
    Border {
        /// Core radius; full border membership.
        min_eps: f32,
        /// Outer border radius; zero border membership.
        max_eps: f32,
        /// Minimum neighborhood size (self included) inside `min_eps` of a core point.
        min_pts: usize,
    },
    /// Both: graded density from distance memberships, graded borders.
    Combined {
        /// Full distance membership radius.
        min_eps: f32,
        /// Zero distance membership radius.
        max_eps: f32,
        /// Density with zero core membership.
        min_pts: usize,
        /// Density with full core membership.
        max_pts: usize,
    },
}

impl FuzzyVariant {
    fn validate(&self) -> Result<()> {
        match *self {
            FuzzyVariant::Core {
                epsilon,
                min_pts,
                max_pts,
            } => {
                check_epsilon(epsilon, epsilon)?;
                check_points(min_pts, max_pts)
            }
            FuzzyVariant::Border {
                min_eps,
                max_eps,
                min_pts,
            } => {
                check_epsilon(min_eps, max_eps)?;
                check_points(min_pts, min_pts)
            }
            FuzzyVariant::Combined {
                min_eps,
                max_eps,
                min_pts,
                max_pts,
            } => {
                check_epsilon(min_eps, max_eps)?;
                check_points(min_pts, max_pts)
            }
        }
    }

    /// Radius that connects core points.
    fn core_radius(&self) -> f32 {
        match *self {
            FuzzyVariant::Core { epsilon, .. } => epsilon,
            FuzzyVariant::Border { min_eps, .. } => min_eps,
            FuzzyVariant::Combined { max_eps, .. } => max_eps,
        }
    }

    /// Radius inside which non-core points can join a cluster.
    fn border_radius(&self) -> f32 {
        match *self {
            FuzzyVariant::Core { epsilon, .. } => epsilon,
            FuzzyVariant::Border { max_eps, .. } | FuzzyVariant::Combined { max_eps, .. } => max_eps,
        }
    }

    /// Core degree of `point`, or `None` when it is not a core point.
    fn core_degree<Q: NeighborQuery + ?Sized>(&self, query: &Q, point: usize) -> Option<f32> {
        match *self {
            FuzzyVariant::Core {
                epsilon,
                min_pts,
                max_pts,
            } => {
                let count = query.neighbors(point, epsilon).len();
                (count >= min_pts).then(|| core_membership(count as f32, min_pts, max_pts))
            }
            FuzzyVariant::Border {
                min_eps, min_pts, ..
            } => (query.neighbors(point, min_eps).len() >= min_pts).then_some(1.0),
            FuzzyVariant::Combined {
                min_eps,
                max_eps,
                min_pts,
                max_pts,
            } => {
                let density: f32 = query
                    .neighbors(point, max_eps)
                    .into_iter()
                    .map(|j| distance_membership(query.distance(point, j), min_eps, max_eps))
                    .sum();
                let degree = core_membership(density, min_pts, max_pts);
                (degree > 0.0).then_some(degree)
            }
        }
    }

    /// Degree a core point with `core_degree` passes to a border point `distance`
    /// away, or `None` when the border point is out of its reach.
    fn border_degree(&self, core_degree: f32, distance: f32) -> Option<f32> {
        match *self {
            FuzzyVariant::Core { .. } => Some(core_degree),
            FuzzyVariant::Border {
                min_eps, max_eps, ..
            }
            | FuzzyVariant::Combined {
                min_eps, max_eps, ..
            } => {
                let closeness = distance_membership(distance, min_eps, max_eps);
                (closeness > 0.0).then(|| core_degree.min(closeness))
            }
        }
    }
}

fn check_epsilon(min_eps: f32, max_eps: f32) -> Result<()> {
    if !(min_eps > 0.0) {
        return Err(invalid("min_eps", "must be positive"));
    }
    if !(max_eps >= min_eps) {
        return Err(invalid("max_eps", "must be at least min_eps"));
    }
    Ok(())
}

fn check_points(min_pts: usize, max_pts: usize) -> Result<()> {
    if min_pts == 0 {
        return Err(invalid("min_pts", "must be at least 1"));
    }
    if max_pts < min_pts {
        return Err(invalid("max_pts", "must be at least min_pts"));
    }
    Ok(())
}

/// Fuzzy DBSCAN clustering algorithm.
#[derive(Debug, Clone)]
pub struct FuzzyDbscan<D = Euclidean> {
    variant: FuzzyVariant,
    metric: D,
    strategy: NeighborStrategy,
}

impl FuzzyDbscan<Euclidean> {
    /// Euclidean fuzzy-core DBSCAN.
    pub fn core(epsilon: f32, min_pts: usize, max_pts: usize) -> Result<Self> {
        Self::with_metric(
            FuzzyVariant::Core {
                epsilon,
                min_pts,
                max_pts,
            },
            Euclidean,
        )
    }

    /// Euclidean fuzzy-border DBSCAN.
    pub fn border(min_eps: f32, max_eps: f32, min_pts: usize) -> Result<Self> {
        Self::with_metric(
            FuzzyVariant::Border {
                min_eps,
                max_eps,
                min_pts,
            },
            Euclidean,
        )
    }

    /// Euclidean fuzzy DBSCAN with graded cores and borders.
    pub fn combined(min_eps: f32, max_eps: f32, min_pts: usize, max_pts: usize) -> Result<Self> {
        Self::with_metric(
            FuzzyVariant::Combined {
                min_eps,
                max_eps,
                min_pts,
                max_pts,
            },
            Euclidean,
        )
    }

    /// Answer neighbor queries with a KD-tree instead of a distance matrix.
    pub fn with_kdtree(mut self) -> Self {
        self.strategy = NeighborStrategy::KdTree;
        self
    }
}

impl<D: Distance> FuzzyDbscan<D> {
    /// Fuzzy DBSCAN of the given variant over a custom metric.
    pub fn with_metric(variant: FuzzyVariant, metric: D) -> Result<Self> {
        variant.validate()?;
        Ok(Self {
            variant,
            metric,
            strategy: NeighborStrategy::Precomputed,
        })
    }

    /// The configured variant and thresholds.
    pub fn variant(&self) -> FuzzyVariant {
        self.variant
    }

    /// How neighbor queries are answered.
    pub fn strategy(&self) -> NeighborStrategy {
        self.strategy
    }

    /// The configured metric.
    pub fn metric(&self) -> &D {
        &self.metric
    }

    /// Run the fuzzy clustering over an arbitrary neighbor source.
    pub fn predict_with_query<Q: NeighborQuery + ?Sized>(&self, query: &Q) -> Vec<FuzzyLabel> {
        let n = query.len();
        let variant = self.variant;

        let core_degree: Vec<Option<f32>> = (0..n)
            .into_par_iter()
            .map(|i| variant.core_degree(query, i))
            .collect();

        let mut labels = vec![FuzzyLabel::default(); n];
        // Cluster owning each core point.
        let mut owner = vec![UNCLASSIFIED; n];
        let mut cluster: i32 = 0;

        for point in 0..n {
            if core_degree[point].is_none() || owner[point] != UNCLASSIFIED {
                continue;
            }

            let cores = self.grow(query, point, cluster, &core_degree, &mut owner);
            for &k in &cores {
                if let Some(degree) = core_degree[k] {
                    labels[k].assign(cluster, degree);
                }
            }

            for (x, degree) in self.border_degrees(query, &cores, cluster, &core_degree, &owner) {
                labels[x].assign(cluster, degree);
            }
            cluster += 1;
        }

        let mut noise = 0usize;
        for label in labels.iter_mut().filter(|l| l.is_empty()) {
            *label = FuzzyLabel::noise();
            noise += 1;
        }

        debug!(points = n, clusters = cluster, noise, variant = ?variant, "fuzzy dbscan finished");
        labels
    }

    /// Collect every core point density-connected to `start` into `cluster`.
    fn grow<Q: NeighborQuery + ?Sized>(
        &self,
        query: &Q,
        start: usize,
        cluster: i32,
        core_degree: &[Option<f32>],
        owner: &mut [i32],
    ) -> Vec<usize> {
        let radius = self.variant.core_radius();
        owner[start] = cluster;
        let mut cores = vec![start];
        let mut next = 0;
        while next < cores.len() {
            let k = cores[next];
            next += 1;
            for q in query.neighbors(k, radius) {
                if core_degree[q].is_some() && owner[q] == UNCLASSIFIED {
                    owner[q] = cluster;
                    cores.push(q);
                }
            }
        }
        cores
    }

    /// Border degrees of the non-core points around `cores`.
    fn border_degrees<Q: NeighborQuery + ?Sized>(
        &self,
        query: &Q,
        cores: &[usize],
        cluster: i32,
        core_degree: &[Option<f32>],
        owner: &[i32],
    ) -> Vec<(usize, f32)> {
        let radius = self.variant.border_radius();
        let mut candidates: Vec<usize> = cores
            .iter()
            .flat_map(|&k| query.neighbors(k, radius))
            .filter(|&x| core_degree[x].is_none())
            .collect();
        candidates.sort_unstable();
        candidates.dedup();

        let variant = self.variant;
        candidates
            .into_par_iter()
            .filter_map(|x| {
                query
                    .neighbors(x, radius)
                    .into_iter()
                    .filter(|&k| owner[k] == cluster)
                    .filter_map(|k| {
                        let core = core_degree[k]?;
                        variant.border_degree(core, query.distance(x, k))
                    })
                    .reduce(f32::max)
                    .map(|degree| (x, degree))
            })
            .collect()
    }
}

impl<D: Distance> FuzzyClustering for FuzzyDbscan<D> {
    fn predict(&self, data: &[Vec<f32>]) -> Result<Vec<FuzzyLabel>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }
        let query = Neighbors::build(data, &self.metric, self.strategy)?;
        Ok(self.predict_with_query(&query))
    }
}

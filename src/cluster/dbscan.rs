//! DBSCAN: Density-Based Spatial Clustering of Applications with Noise.
//!
//! # The Algorithm (Ester et al., 1996)
//!
//! DBSCAN is a density-based clustering algorithm that groups points based on
//! neighborhood density. Unlike k-means, it:
//!
//! - Discovers clusters of arbitrary shape
//! - Automatically determines the number of clusters
//! - Identifies noise points (outliers)
//!
//! ## Core Concepts
//!
//! - **Epsilon (ε)**: Points closer than ε are neighbors.
//! - **MinPts**: Minimum neighborhood size (the point itself included) for a
//!   point to be "core".
//! - **Core point**: Has at least MinPts neighbors within ε.
//! - **Border point**: Within ε of a core point but not core itself.
//! - **Noise point**: Neither core nor border.
//!
//! ## Algorithm Steps
//!
//! 1. For each unclassified point P, in index order:
//!    - Find neighbors within ε
//!    - If |neighbors| < MinPts, mark as noise (may change later)
//!    - Else P is core: start a new cluster, expand from its neighbors
//!
//! 2. Expansion: every core point reached claims its unclassified and noise
//!    neighbors. Newly claimed unclassified points are queued and checked
//!    for core status in turn; former noise points are known non-core and
//!    stay border points.
//!
//! Cluster ids are dense, starting at 0, in order of discovery.
//!
//! ## Complexity
//!
//! - **Time**: O(n²) with the precomputed matrix, O(n log n) typical with the
//!   KD-tree strategy.
//! - **Space**: O(n²) for the matrix, O(n) for the KD-tree.
//!
//! ## References
//!
//! Ester et al. (1996). "A Density-Based Algorithm for Discovering Clusters
//! in Large Spatial Databases with Noise." KDD-96.

use tracing::debug;

use super::label::{NOISE, UNCLASSIFIED};
use super::neighbors::{NeighborQuery, NeighborStrategy, Neighbors};
use super::traits::Clustering;
use crate::distance::{Distance, Euclidean};
use crate::error::{invalid, Result};

/// DBSCAN clustering algorithm.
#[derive(Debug, Clone)]
pub struct Dbscan<D = Euclidean> {
    /// Epsilon: neighborhood radius (exclusive).
    epsilon: f32,
    /// Minimum points for core point classification.
    min_pts: usize,
    metric: D,
    strategy: NeighborStrategy,
}

impl Dbscan<Euclidean> {
    /// Create a Euclidean DBSCAN clusterer.
    ///
    /// # Arguments
    ///
    /// * `epsilon` - Points closer than this are neighbors. Must be positive.
    /// * `min_pts` - Minimum neighborhood size (self included) of a core point.
    ///   Must be at least 1.
    ///
    /// # Typical Values
    ///
    /// - `epsilon`: Often determined by k-distance plot (k = min_pts - 1).
    /// - `min_pts`: 2 * dimension is a common heuristic.
    pub fn new(epsilon: f32, min_pts: usize) -> Result<Self> {
        Self::with_metric(epsilon, min_pts, Euclidean)
    }

    /// Answer neighbor queries with a KD-tree instead of a distance matrix.
    pub fn with_kdtree(mut self) -> Self {
        self.strategy = NeighborStrategy::KdTree;
        self
    }
}

impl<D: Distance> Dbscan<D> {
    /// Create a DBSCAN clusterer over a custom metric.
    pub fn with_metric(epsilon: f32, min_pts: usize, metric: D) -> Result<Self> {
        if !(epsilon > 0.0) {
            return Err(invalid("epsilon", "must be positive"));
        }
        if min_pts == 0 {
            return Err(invalid("min_pts", "must be at least 1"));
        }
        Ok(Self {
            epsilon,
            min_pts,
            metric,
            strategy: NeighborStrategy::Precomputed,
        })
    }

    /// Neighborhood radius.
    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// Minimum neighborhood size of a core point.
    pub fn min_pts(&self) -> usize {
        self.min_pts
    }

    /// How neighbor queries are answered.
    pub fn strategy(&self) -> NeighborStrategy {
        self.strategy
    }

    /// The configured metric.
    pub fn metric(&self) -> &D {
        &self.metric
    }

    /// Run the clustering state machine over an arbitrary neighbor source.
    ///
    /// The configured metric and strategy are not used; `query` decides
    /// what "within epsilon" means.
    pub fn predict_with_query<Q: NeighborQuery + ?Sized>(&self, query: &Q) -> Vec<i32> {
        let n = query.len();
        let mut labels = vec![UNCLASSIFIED; n];
        // `visited[i] == c` marks i as expanded while growing cluster c.
        let mut visited = vec![UNCLASSIFIED; n];
        let mut cluster: i32 = 0;

        for point in 0..n {
            if labels[point] != UNCLASSIFIED {
                continue;
            }

            let neighbors = query.neighbors(point, self.epsilon);
            if neighbors.len() < self.min_pts {
                // Not dense enough: noise for now, may become a border point later.
                labels[point] = NOISE;
                continue;
            }

            labels[point] = cluster;
            self.expand_cluster(query, point, &neighbors, &mut labels, &mut visited, cluster);
            cluster += 1;
        }

        debug!(
            points = n,
            clusters = cluster,
            noise = labels.iter().filter(|&&l| l == NOISE).count(),
            "dbscan finished"
        );
        labels
    }

    /// Grow cluster `cluster` from the core point `point`.
    fn expand_cluster<Q: NeighborQuery + ?Sized>(
        &self,
        query: &Q,
        point: usize,
        neighbors: &[usize],
        labels: &mut [i32],
        visited: &mut [i32],
        cluster: i32,
    ) {
        visited[point] = cluster;

        // Use a stack for iterative expansion (avoid deep recursion)
        let mut seeds: Vec<usize> = Vec::with_capacity(neighbors.len());
        claim(neighbors, labels, cluster, &mut seeds);

        while let Some(seed) = seeds.pop() {
            if visited[seed] == cluster {
                continue;
            }
            visited[seed] = cluster;

            let seed_neighbors = query.neighbors(seed, self.epsilon);
            if seed_neighbors.len() >= self.min_pts {
                claim(&seed_neighbors, labels, cluster, &mut seeds);
            }
        }
    }
}

/// Pull the unclassified and noise points of a core neighborhood into `cluster`.
///
/// Only previously unclassified points are queued: noise points were already
/// found to be non-core.
fn claim(neighbors: &[usize], labels: &mut [i32], cluster: i32, seeds: &mut Vec<usize>) {
    for &q in neighbors {
        match labels[q] {
            UNCLASSIFIED => {
                labels[q] = cluster;
                seeds.push(q);
            }
            NOISE => labels[q] = cluster,
            _ => {}
        }
    }
}

impl Default for Dbscan<Euclidean> {
    fn default() -> Self {
        Self {
            epsilon: 0.5,
            min_pts: 5,
            metric: Euclidean,
            strategy: NeighborStrategy::Precomputed,
        }
    }
}

impl<D: Distance> Clustering for Dbscan<D> {
    fn predict(&self, data: &[Vec<f32>]) -> Result<Vec<i32>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }
        let query = Neighbors::build(data, &self.metric, self.strategy)?;
        Ok(self.predict_with_query(&query))
    }
}

/// Extended DBSCAN interface with noise detection.
pub trait DbscanExt {
    /// Fit and predict, returning labels where noise is marked as `None`.
    fn predict_with_noise(&self, data: &[Vec<f32>]) -> Result<Vec<Option<usize>>>;

    /// Check if a label represents noise.
    fn is_noise(label: i32) -> bool {
        label == NOISE
    }
}

impl<D: Distance> DbscanExt for Dbscan<D> {
    fn predict_with_noise(&self, data: &[Vec<f32>]) -> Result<Vec<Option<usize>>> {
        Ok(self
            .predict(data)?
            .into_iter()
            .map(|l| if l >= 0 { Some(l as usize) } else { None })
            .collect())
    }
}

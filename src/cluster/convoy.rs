//! Convoy detection with Coherent Moving Clusters (CMC).
//!
//! A convoy is a group of at least `m` objects that are density-connected in
//! every frame of a run of consecutive frames lasting at least `k` frames.
//!
//! ## Algorithm
//!
//! Each frame is clustered with [`Dbscan`]. Open candidates from the
//! previous frame are intersected with every cluster of the current frame:
//!
//! 1. An intersection of at least `m` objects extends the candidate to the
//!    current frame with the shrunken member set.
//! 2. A candidate that found no such cluster is closed. It is reported if
//!    it lived for at least `k` frames.
//! 3. Clusters that extended no candidate open new candidates.
//!
//! Candidates still open after the last frame are reported the same way.
//!
//! ## References
//!
//! Jeung, H., Yiu, M. L., Zhou, X., Jensen, C. S., Shen, H. T. (2008).
//! "Discovery of Convoys in Trajectory Databases." VLDB 2008.

use tracing::{debug, trace};

use super::dbscan::Dbscan;
use super::traits::Clustering;
use super::util;
use crate::distance::{Distance, Euclidean};
use crate::error::{invalid, Result};

/// Objects that traveled together from `start_time` to `end_time` (frame indices, inclusive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Convoy {
    /// Ascending object indices.
    pub indices: Vec<usize>,
    /// First frame of the convoy.
    pub start_time: usize,
    /// Last frame of the convoy.
    pub end_time: usize,
}

impl Convoy {
    /// `end_time - start_time`.
    pub fn lifetime(&self) -> usize {
        self.end_time - self.start_time
    }
}

/// Coherent Moving Cluster convoy detector.
#[derive(Debug, Clone)]
pub struct Cmc<D = Euclidean> {
    estimator: Dbscan<D>,
    k: usize,
    m: usize,
}

impl<D: Distance> Cmc<D> {
    /// Detect convoys of at least `m` objects lasting at least `k` frames.
    pub fn new(estimator: Dbscan<D>, k: usize, m: usize) -> Result<Self> {
        if k == 0 {
            return Err(invalid("k", "must be at least 1"));
        }
        if m == 0 {
            return Err(invalid("m", "must be at least 1"));
        }
        Ok(Self { estimator, k, m })
    }

    /// Minimum lifetime.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Minimum number of common objects.
    pub fn m(&self) -> usize {
        self.m
    }

    /// Convoys in `data` (object × frame × coordinate), in the order they close.
    pub fn predict(&self, data: &[Vec<Vec<f32>>]) -> Result<Vec<Convoy>> {
        let frames = util::frames(data)?;
        let last = frames.len().saturating_sub(1);
        let mut candidates: Vec<Convoy> = Vec::new();
        let mut convoys = Vec::new();

        for (t, frame) in frames.iter().enumerate() {
            let clusters = util::members(&self.estimator.predict(frame)?);
            let mut absorbed = vec![false; clusters.len()];
            let mut open = Vec::new();

            for candidate in candidates.drain(..) {
                let mut assigned = false;
                for (c, cluster) in clusters.iter().enumerate() {
                    let common = util::intersection(&candidate.indices, cluster);
                    if common.len() < self.m {
                        continue;
                    }
                    assigned = true;
                    absorbed[c] = true;
                    open.push(Convoy {
                        indices: common,
                        start_time: candidate.start_time,
                        end_time: t,
                    });
                }
                if !assigned && candidate.lifetime() >= self.k {
                    convoys.push(candidate);
                }
            }

            open.extend(
                clusters
                    .into_iter()
                    .zip(absorbed)
                    .filter(|(cluster, absorbed)| !absorbed && cluster.len() >= self.m)
                    .map(|(indices, _)| Convoy {
                        indices,
                        start_time: t,
                        end_time: t,
                    }),
            );
            trace!(frame = t, candidates = open.len(), "cmc frame");
            candidates = open;

            if t == last {
                convoys.extend(candidates.drain(..).filter(|c| c.lifetime() >= self.k));
            }
        }

        debug!(frames = frames.len(), convoys = convoys.len(), "cmc finished");
        Ok(convoys)
    }
}

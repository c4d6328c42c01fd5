//! Moving-cluster correlation across time frames.
//!
//! The input holds one track per object: `data[object][frame]` is a point.
//! Each frame is clustered on its own with [`Dbscan`]. Frame-local ids are
//! then stitched into global ids: a cluster inherits the id of the most
//! similar cluster of the previous frame when their Jaccard similarity
//! reaches `theta`, and gets a fresh id otherwise.
//!
//! ## References
//!
//! Kalnis, P., Mamoulis, N., Bakiras, S. (2005). "On Discovering Moving
//! Clusters in Spatio-temporal Data." SSTD 2005.

use tracing::{debug, trace};

use super::dbscan::Dbscan;
use super::label::NOISE;
use super::traits::Clustering;
use super::util;
use crate::distance::{Distance, Euclidean};
use crate::error::{invalid, Result};

/// DBSCAN per frame, with cluster identities carried across frames.
#[derive(Debug, Clone)]
pub struct MovingDbscan<D = Euclidean> {
    estimator: Dbscan<D>,
    theta: f64,
}

impl<D: Distance> MovingDbscan<D> {
    /// Correlate frames clustered by `estimator`; `theta` must lie in `(0, 1]`.
    pub fn new(estimator: Dbscan<D>, theta: f64) -> Result<Self> {
        if !(theta > 0.0 && theta <= 1.0) {
            return Err(invalid("theta", "must be in (0, 1]"));
        }
        Ok(Self { estimator, theta })
    }

    /// The per-frame clusterer.
    pub fn estimator(&self) -> &Dbscan<D> {
        &self.estimator
    }

    /// Minimum Jaccard similarity for a cluster to keep its previous id.
    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Global cluster id of every object in every frame (`NOISE` for noise).
    ///
    /// `data` is object × frame × coordinate; the output is object × frame.
    pub fn predict(&self, data: &[Vec<Vec<f32>>]) -> Result<Vec<Vec<i32>>> {
        let frames = util::frames(data)?;
        let mut out: Vec<Vec<i32>> = vec![Vec::with_capacity(frames.len()); data.len()];

        // Members and global id of each cluster in the previous frame.
        let mut previous: Vec<(Vec<usize>, i32)> = Vec::new();
        let mut next_id: i32 = 0;

        for (t, frame) in frames.iter().enumerate() {
            let labels = self.estimator.predict(frame)?;
            let groups = util::members(&labels);

            let global: Vec<i32> = if t == 0 {
                next_id = groups.len() as i32;
                (0..next_id).collect()
            } else {
                groups
                    .iter()
                    .map(|members| match best_match(&previous, members) {
                        Some((similarity, id)) if similarity >= self.theta => id,
                        _ => {
                            next_id += 1;
                            next_id - 1
                        }
                    })
                    .collect()
            };

            for (track, &label) in out.iter_mut().zip(&labels) {
                track.push(if label >= 0 { global[label as usize] } else { NOISE });
            }
            trace!(frame = t, clusters = groups.len(), "moving dbscan frame");

            previous = groups.into_iter().zip(global).collect();
        }

        debug!(
            objects = data.len(),
            frames = frames.len(),
            global_clusters = next_id,
            "moving dbscan finished"
        );
        Ok(out)
    }
}

/// Most similar previous cluster; the first one wins ties.
fn best_match(previous: &[(Vec<usize>, i32)], members: &[usize]) -> Option<(f64, i32)> {
    let mut best: Option<(f64, i32)> = None;
    for (prev, id) in previous {
        let similarity = util::jaccard(prev, members);
        if best.map_or(true, |(s, _)| similarity > s) {
            best = Some((similarity, *id));
        }
    }
    best
}

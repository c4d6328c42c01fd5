//! T-DBSCAN: stop/move segmentation of a trajectory.
//!
//! The points are samples of one trajectory in time order. Density is only
//! measured forward in time: the forward neighborhood of point `i` holds the
//! later points closer than `epsilon`, and the scan stops at the first later
//! point farther than `ceiling_eps`, so a trajectory that revisits a place
//! does not merge with its earlier visit.
//!
//! Segments are contiguous runs. A point continues the current segment when
//! a core point of that segment reaches it; otherwise it opens the next one.
//! Segments holding more than `min_pts` points are stops, the rest are moves.
//!
//! ## References
//!
//! Chen, W., Ji, M. H., Wang, J. M. (2014). "T-DBSCAN: A Spatiotemporal
//! Density Clustering for GPS Trajectory Segmentation." iJOE 10(6).

use rayon::prelude::*;
use tracing::debug;

use super::util;
use crate::distance::{Distance, Euclidean};
use crate::error::{invalid, Result};

/// Whether a trajectory segment is a dwell or a transit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    /// Dense run: the object stayed in one place.
    Stop,
    /// Sparse run between stops.
    Move,
}

/// Segment of one trajectory point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrajectoryLabel {
    /// Segment index, counting from 0 in time order.
    pub segment: usize,
    /// Kind of the whole segment.
    pub kind: SegmentKind,
}

/// Trajectory segmentation by forward-in-time density.
#[derive(Debug, Clone)]
pub struct Tdbscan<D = Euclidean> {
    epsilon: f32,
    ceiling_eps: f32,
    min_pts: usize,
    metric: D,
}

impl Tdbscan<Euclidean> {
    /// Euclidean T-DBSCAN.
    pub fn new(epsilon: f32, ceiling_eps: f32, min_pts: usize) -> Result<Self> {
        Self::with_metric(epsilon, ceiling_eps, min_pts, Euclidean)
    }
}

impl<D: Distance> Tdbscan<D> {
    /// T-DBSCAN over a custom metric.
    ///
    /// `epsilon` must be positive, `ceiling_eps` at least `epsilon`, and
    /// `min_pts` at least 1.
    pub fn with_metric(epsilon: f32, ceiling_eps: f32, min_pts: usize, metric: D) -> Result<Self> {
        if !(epsilon > 0.0) {
            return Err(invalid("epsilon", "must be positive"));
        }
        if !(ceiling_eps >= epsilon) {
            return Err(invalid("ceiling_eps", "must be at least epsilon"));
        }
        if min_pts == 0 {
            return Err(invalid("min_pts", "must be at least 1"));
        }
        Ok(Self {
            epsilon,
            ceiling_eps,
            min_pts,
            metric,
        })
    }

    /// Neighborhood radius.
    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// Distance at which the forward scan stops.
    pub fn ceiling_eps(&self) -> f32 {
        self.ceiling_eps
    }

    /// Minimum forward neighborhood size (self included) of a core point.
    pub fn min_pts(&self) -> usize {
        self.min_pts
    }

    /// Segment the time-ordered trajectory `data`.
    pub fn predict(&self, data: &[Vec<f32>]) -> Result<Vec<TrajectoryLabel>> {
        util::dimension(data)?;
        let n = data.len();

        let forward: Vec<Vec<usize>> = (0..n)
            .into_par_iter()
            .map(|i| self.forward_neighbors(data, i))
            .collect();

        let mut segment_of = vec![0usize; n];
        // Latest segment whose core point reached each point.
        let mut reached_by: Vec<Option<usize>> = vec![None; n];
        let mut segment = 0;
        for i in 0..n {
            if i > 0 && reached_by[i] != Some(segment) {
                segment += 1;
            }
            segment_of[i] = segment;
            if forward[i].len() + 1 >= self.min_pts {
                for &j in &forward[i] {
                    reached_by[j] = Some(segment);
                }
            }
        }

        let segments = if n == 0 { 0 } else { segment + 1 };
        let mut sizes = vec![0usize; segments];
        for &s in &segment_of {
            sizes[s] += 1;
        }

        let labels: Vec<TrajectoryLabel> = segment_of
            .into_iter()
            .map(|segment| TrajectoryLabel {
                segment,
                kind: if sizes[segment] > self.min_pts {
                    SegmentKind::Stop
                } else {
                    SegmentKind::Move
                },
            })
            .collect();

        let stops = sizes.iter().filter(|&&s| s > self.min_pts).count();
        debug!(points = n, segments, stops, "tdbscan finished");
        Ok(labels)
    }

    fn forward_neighbors(&self, data: &[Vec<f32>], i: usize) -> Vec<usize> {
        let mut out = Vec::new();
        for (j, point) in data.iter().enumerate().skip(i + 1) {
            let d = self.metric.distance(&data[i], point);
            if d > self.ceiling_eps {
                break;
            }
            if d < self.epsilon {
                out.push(j);
            }
        }
        out
    }
}

use super::label::FuzzyLabel;
use crate::error::Result;

/// Common interface for crisp clustering algorithms (one label per point).
pub trait Clustering {
    /// Return one label per input point: a cluster id `>= 0` or [`NOISE`](super::NOISE).
    fn predict(&self, data: &[Vec<f32>]) -> Result<Vec<i32>>;
}

/// Common interface for fuzzy clustering algorithms (graded labels per point).
pub trait FuzzyClustering {
    /// Return one membership map per input point.
    fn predict(&self, data: &[Vec<f32>]) -> Result<Vec<FuzzyLabel>>;
}

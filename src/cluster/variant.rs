//! One entry point for every flavor of DBSCAN.
//!
//! [`DensityModel`] is chosen by a closed [`Variant`] at construction time and
//! always answers with [`Labels`]. All variants share the same neighbor source
//! for a given dataset.

use super::dbscan::Dbscan;
use super::fuzzy::{FuzzyDbscan, FuzzyVariant};
use super::label::Labels;
use super::neighbors::{NeighborStrategy, Neighbors};
use crate::distance::{Distance, Euclidean};
use crate::error::Result;

/// The density-clustering flavors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Variant {
    /// Classic DBSCAN.
    Crisp {
        /// Neighborhood radius.
        epsilon: f32,
        /// Minimum neighborhood size of a core point.
        min_pts: usize,
    },
    /// Fuzzy core membership.
    CoreOnly {
        /// Neighborhood radius.
        epsilon: f32,
        /// Neighborhood size with zero core membership.
        min_pts: usize,
        /// Neighborhood size with full core membership.
        max_pts: usize,
    },
    /// Fuzzy border membership.
    BorderOnly {
        /// Core radius.
        min_eps: f32,
        /// Outer border radius.
        max_eps: f32,
        /// Minimum neighborhood size inside `min_eps` of a core point.
        min_pts: usize,
    },
    /// Fuzzy core and border membership.
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

#[derive(Debug, Clone)]
enum Engine<D> {
    Crisp(Dbscan<D>),
    Fuzzy(FuzzyDbscan<D>),
}

/// A validated density clusterer of any [`Variant`].
#[derive(Debug, Clone)]
pub struct DensityModel<D = Euclidean> {
    engine: Engine<D>,
    strategy: NeighborStrategy,
}

impl DensityModel<Euclidean> {
    /// Answer neighbor queries with a KD-tree instead of a distance matrix.
    pub fn with_kdtree(mut self) -> Self {
        self.strategy = NeighborStrategy::KdTree;
        self
    }
}

impl<D: Distance> DensityModel<D> {
    /// Validate `variant` and bind it to `metric`.
    pub fn new(variant: Variant, metric: D) -> Result<Self> {
        let engine = match variant {
            Variant::Crisp { epsilon, min_pts } => {
                Engine::Crisp(Dbscan::with_metric(epsilon, min_pts, metric)?)
            }
            Variant::CoreOnly {
                epsilon,
                min_pts,
                max_pts,
            } => Engine::Fuzzy(FuzzyDbscan::with_metric(
                FuzzyVariant::Core {
                    epsilon,
                    min_pts,
                    max_pts,
                },
                metric,
            )?),
            Variant::BorderOnly {
                min_eps,
                max_eps,
                min_pts,
            } => Engine::Fuzzy(FuzzyDbscan::with_metric(
                FuzzyVariant::Border {
                    min_eps,
                    max_eps,
                    min_pts,
                },
                metric,
            )?),
            Variant::Combined {
                min_eps,
                max_eps,
                min_pts,
                max_pts,
            } => Engine::Fuzzy(FuzzyDbscan::with_metric(
                FuzzyVariant::Combined {
                    min_eps,
                    max_eps,
                    min_pts,
                    max_pts,
                },
                metric,
            )?),
        };
        Ok(Self {
            engine,
            strategy: NeighborStrategy::Precomputed,
        })
    }

    /// Whether this model produces fuzzy labels.
    pub fn is_fuzzy(&self) -> bool {
        matches!(self.engine, Engine::Fuzzy(_))
    }

    /// Cluster `data`.
    pub fn predict(&self, data: &[Vec<f32>]) -> Result<Labels> {
        let metric = match &self.engine {
            Engine::Crisp(m) => m.metric(),
            Engine::Fuzzy(m) => m.metric(),
        };
        if data.is_empty() {
            return Ok(match self.engine {
                Engine::Crisp(_) => Labels::Crisp(Vec::new()),
                Engine::Fuzzy(_) => Labels::Fuzzy(Vec::new()),
            });
        }

        let query = Neighbors::build(data, metric, self.strategy)?;
        Ok(match &self.engine {
            Engine::Crisp(m) => Labels::Crisp(m.predict_with_query(&query)),
            Engine::Fuzzy(m) => Labels::Fuzzy(m.predict_with_query(&query)),
        })
    }
}

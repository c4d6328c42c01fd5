//! Density clustering primitives.
//!
//! `dbclust` is a small library of DBSCAN-family algorithms for numeric
//! point sets.
//!
//! The primary public API is under [`cluster`], which provides:
//! - DBSCAN (crisp density clustering, with optional noise labeling)
//! - fuzzy DBSCAN (graded core and/or border membership)
//! - DBSCAN over sorted 1-D data, with incremental `extend`
//! - moving-cluster correlation and convoy detection over time frames
//! - T-DBSCAN trajectory segmentation
//!
//! [`spatial`] holds the KD-tree used for neighbor queries, and [`distance`]
//! the pluggable metric every engine is generic over.

#![forbid(unsafe_code)]

pub mod cluster;
pub mod distance;
pub mod error;
pub mod spatial;

pub use cluster::{
    Clustering, Cmc, DbPack, Dbscan, DbscanExt, DensityModel, FuzzyClustering, FuzzyDbscan,
    FuzzyLabel, Labels, MovingDbscan, Tdbscan, Variant, NOISE,
};
pub use distance::{Distance, Euclidean};
pub use error::{Error, Result};

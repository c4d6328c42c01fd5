//! Pluggable dissimilarity between two points.
//!
//! Every engine in this crate is generic over a [`Distance`]. The crate ships
//! only a handful of common metrics; anything else can be supplied as a type
//! implementing the trait or as a plain closure:
//!
//! ```rust
//! use dbclust::distance::Distance;
//!
//! let l1 = |a: &[f32], b: &[f32]| a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum::<f32>();
//! assert_eq!(l1.distance(&[0.0, 0.0], &[1.0, 2.0]), 3.0);
//! assert!(l1.try_distance(&[0.0], &[1.0, 2.0]).is_err());
//! ```

use crate::error::{Error, Result};

/// A non-negative dissimilarity between two points of equal dimension.
///
/// Implementations hold no per-call state and must be symmetric.
pub trait Distance: Send + Sync {
    /// Distance between `a` and `b`. Callers guarantee `a.len() == b.len()`.
    fn distance(&self, a: &[f32], b: &[f32]) -> f32;

    /// Distance between `a` and `b`, failing on a dimension mismatch.
    fn try_distance(&self, a: &[f32], b: &[f32]) -> Result<f32> {
        if a.len() != b.len() {
            return Err(Error::DimensionMismatch {
                expected: a.len(),
                found: b.len(),
            });
        }
        Ok(self.distance(a, b))
    }
}

impl<F> Distance for F
where
    F: Fn(&[f32], &[f32]) -> f32 + Send + Sync,
{
    fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        self(a, b)
    }
}

/// Euclidean (L2) distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Euclidean;

impl Distance for Euclidean {
    #[inline]
    fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        squared_euclidean(a, b).sqrt()
    }
}

/// Manhattan (L1) distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Manhattan;

impl Distance for Manhattan {
    #[inline]
    fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum()
    }
}

/// Chebyshev (L∞) distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Chebyshev;

impl Distance for Chebyshev {
    #[inline]
    fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f32::max)
    }
}

#[inline]
pub(crate) fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_metrics() {
        let a = [0.0, 0.0];
        let b = [3.0, 4.0];
        assert_eq!(Euclidean.distance(&a, &b), 5.0);
        assert_eq!(Manhattan.distance(&a, &b), 7.0);
        assert_eq!(Chebyshev.distance(&a, &b), 4.0);
    }

    #[test]
    fn mismatch_is_a_typed_error() {
        let err = Euclidean.try_distance(&[1.0, 2.0], &[1.0]).unwrap_err();
        assert_eq!(
            err,
            Error::DimensionMismatch {
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn zero_distance_to_self() {
        let p = [1.5, -2.0, 7.25];
        assert_eq!(Euclidean.distance(&p, &p), 0.0);
        assert_eq!(Manhattan.distance(&p, &p), 0.0);
    }
}

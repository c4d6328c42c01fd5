use thiserror::Error;

/// Errors returned by clustering algorithms in this crate.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Invalid parameter value, rejected when a model is constructed.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Points have inconsistent dimensionality.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimensionality.
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },

    /// A per-call buffer could not be reserved.
    #[error("allocation failure: could not reserve {requested} elements")]
    AllocationFailure {
        /// Number of elements requested.
        requested: usize,
    },

    /// Input to a sorted-data algorithm is not in ascending order.
    #[error("input is not sorted in ascending order at index {index}")]
    Unsorted {
        /// First index that breaks the ordering.
        index: usize,
    },

    /// Prior labels passed to `extend` do not fit the data.
    #[error("got {labels} prior labels for {points} points")]
    LabelCountMismatch {
        /// Number of prior labels.
        labels: usize,
        /// Number of points.
        points: usize,
    },

    /// Objects in a multi-frame dataset disagree on frame count.
    #[error("object {object}: expected {expected} frames, found {found}")]
    FrameCountMismatch {
        /// Offending object index.
        object: usize,
        /// Expected frame count.
        expected: usize,
        /// Found frame count.
        found: usize,
    },
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Shorthand for the common `InvalidParameter` construction.
pub(crate) fn invalid(name: &'static str, message: &'static str) -> Error {
    Error::InvalidParameter { name, message }
}

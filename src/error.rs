//! Errors returned by [`KdTree`](crate::KdTree) operations.

use thiserror::Error;

/// Everything that can go wrong when using a [`KdTree`](crate::KdTree).
///
/// None of these are recovered internally; each one fails the call that raised it
/// and leaves the tree unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum KdTreeError {
    /// A tree was requested with zero dimensions.
    #[error("kd-tree dimensionality must be at least 1")]
    ZeroDimensions,
    /// A coordinate argument does not have exactly K components.
    #[error("coordinates have {found} components but the kd-tree is {expected}-dimensional")]
    DimensionMismatch {
        /// Dimensionality of the tree
        expected: usize,
        /// Length of the offending argument
        found: usize,
    },
    /// A query was issued after an append without calling `build()` again.
    #[error("kd-tree is not built; call build() after appending points")]
    NotBuilt,
    /// An appended point has a NaN or infinite component.
    #[error("point component {axis} is not finite")]
    NonFiniteCoordinate {
        /// Index of the first non-finite component
        axis: usize,
    },
    /// A query argument has a NaN component.
    #[error("query component {axis} is NaN")]
    NanCoordinate {
        /// Index of the first NaN component
        axis: usize,
    },
    /// A search radius is negative or NaN.
    #[error("search radius must be a non-negative number, got {0}")]
    InvalidRadius(f64),
}

//! Error types for layout and view operations

use einsor_planner::PlanError;
use thiserror::Error;

/// Error type for shape and tensor-view operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Data length disagrees with the shape's capacity (or is zero)
    #[error("tensor data length {actual} disagrees with shape capacity {expected}")]
    InvalidTensorLayout { expected: u64, actual: usize },

    /// The product of the sizes does not fit the size type
    #[error("shape capacity {capacity} overflows the size type")]
    CapacityOverflow { capacity: u64 },

    /// Two tensors that must hold the same element count do not
    #[error("capacity mismatch: expected {expected} elements, got {actual}")]
    CapacityMismatch { expected: u64, actual: u64 },

    /// An expression's index-list length disagrees with the tensor rank
    #[error("rank mismatch: expected {expected} indices, got {actual}")]
    RankMismatch { expected: usize, actual: usize },

    /// A permutation expression whose sides are not bijective
    #[error("invalid permutation expression: {0}")]
    InvalidPermutation(#[from] PlanError),
}

/// Result type for layout and view operations
pub type CoreResult<T> = Result<T, CoreError>;

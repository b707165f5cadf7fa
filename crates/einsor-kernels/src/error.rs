//! Error types for kernel operations

use thiserror::Error;

/// Error type for kernel operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    /// An operand's data length disagrees with its shape capacity
    #[error("tensor data length {actual} disagrees with shape capacity {expected}")]
    InvalidTensorLayout { expected: u64, actual: usize },

    /// Operands that must hold the same element count do not
    #[error("operands hold unequal element counts: {left} vs {right}")]
    UnequalSize { left: u64, right: u64 },

    /// A destination axis extent disagrees with what the plan requires
    #[error("destination axis {axis} has size {actual}, plan requires {expected}")]
    InvalidSizes {
        axis: usize,
        expected: u32,
        actual: u32,
    },

    /// A plan that does not fit the operands it was applied to
    #[error("plan does not match operand dimensions: {context}")]
    InvalidDimensions { context: &'static str },

    /// Reduction requested on a tensor without elements
    #[error("reduction requested on an empty tensor")]
    SizeZeroTensor,

    /// Signed-integer absolute value of the minimum representable value
    #[error("integer overflow: |MIN| is not representable")]
    IntegerOverflow,
}

/// Result type for kernel operations
pub type KernelResult<T> = Result<T, KernelError>;

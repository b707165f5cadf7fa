//! Error types for the caching allocator and tensor factory

use einsor_core::CoreError;
use einsor_kernels::KernelError;
use thiserror::Error;

/// Error type for allocator and registry operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// Allocation of a tensor without elements
    #[error("cannot allocate a zero-sized tensor")]
    TensorSizeZero,

    /// Adopted storage whose length disagrees with the declared shape
    #[error("allocation holds {actual} elements, shape requires {expected}")]
    AllocSizeMismatch { expected: u64, actual: usize },

    /// Binding storage to a view that already has data
    #[error("view already has data bound")]
    TensorHasAlloc,

    /// A tensor handed back to a factory it did not come from
    #[error("tensor does not belong to this factory's allocator")]
    WrongAllocator,

    /// Releasing a registry slot twice
    #[error("registry slot {index} was already freed")]
    IndexAlreadyFreed { index: usize },

    /// A registry slot that does not exist
    #[error("registry slot {index} does not exist")]
    InvalidIndex { index: usize },

    /// Every registry slot is occupied
    #[error("allocator registry is full ({capacity} slots)")]
    RegistryFull { capacity: usize },
}

/// Result type for allocator operations
pub type PoolResult<T> = Result<T, PoolError>;

/// Error type for factory operations, nesting the layers it composes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FactoryError {
    /// Allocator-level failure
    #[error(transparent)]
    Pool(#[from] PoolError),

    /// Kernel-level failure from a composing operation
    #[error(transparent)]
    Kernel(#[from] KernelError),

    /// Shape/view-level failure
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for factory operations
pub type FactoryResult<T> = Result<T, FactoryError>;

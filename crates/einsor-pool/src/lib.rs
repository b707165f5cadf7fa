//! # einsor-pool
//!
//! Tensor factory and linear caching allocator for the einsor stack.
//!
//! Short-lived intermediates dominate expression-heavy tensor code; this
//! crate keeps their storage out of the system allocator's way:
//!
//! - [`LinearCache`] - a size-ordered free list of `Vec<T>` blocks behind
//!   one mutex; requests may absorb a cached block up to twice their size
//! - [`CacheRegistry`] - a bounded, configurable slot table of shared
//!   caches with explicit exhaustion errors
//! - [`TensorBuf`] - the owning tensor type; pool-backed buffers deposit
//!   their storage back on drop
//! - [`TensorFactory`] - typed allocation, tracking scopes, and
//!   kernel-composing forms that allocate correctly-ranked results for
//!   contraction and product plans
//!
//! ## Quick start
//!
//! ```
//! use einsor_core::RowMajor;
//! use einsor_kernels::sum;
//! use einsor_pool::TensorFactory;
//! use einsor_planner::{contraction_parse, ContractionPlan};
//!
//! let mut factory = TensorFactory::<i64>::new();
//!
//! let mut x = factory.alloc_tensor::<2, RowMajor>([3, 4]).unwrap();
//! einsor_kernels::fill(&mut x.view_mut(), 2).unwrap();
//!
//! // Row sums, result tensor allocated by the factory.
//! const ROWS: ContractionPlan<2, 1> = contraction_parse("ij->i");
//! let rows = factory.contraction(&ROWS, &x.view()).unwrap();
//! assert_eq!(rows.data(), &[8, 8, 8]);
//! assert_eq!(sum(&rows.view()).unwrap(), 24);
//! ```
//!
//! ## Concurrency
//!
//! The cache serializes `alloc` / `free` / `resize` / `clear` /
//! `add_to_cache` on one internal `parking_lot` mutex and is the only
//! concurrent object here; a factory (and its tracking list) belongs to a
//! single owner.

#![deny(warnings)]

pub mod buf;
pub mod cache;
pub mod error;
pub mod factory;
pub mod registry;

pub use buf::TensorBuf;
pub use cache::LinearCache;
pub use error::{FactoryError, FactoryResult, PoolError, PoolResult};
pub use factory::{TensorFactory, TrackingMode};
pub use registry::{CacheRegistry, DEFAULT_REGISTRY_CAPACITY};

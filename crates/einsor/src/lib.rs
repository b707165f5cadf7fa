//! # einsor
//!
//! General-rank dense tensors for Rust: layout algebra, zero-copy views,
//! einsum-style expression plans compiled at build time, plan-driven SIMD
//! kernels, and a tensor factory over a linear caching allocator.
//!
//! This is the meta crate re-exporting the einsor components:
//!
//! - [`core`] - shapes, memory orders, tensor views, element vocabulary
//! - [`planner`] - `const fn` expression parsers and plan types
//! - [`kernels`] - contraction/product walkers, reductions, elementwise
//!   arithmetic, quantization
//! - [`pool`] - caching allocator, registry, owning buffers, factory
//!
//! ## Quick start
//!
//! ```
//! use einsor::prelude::*;
//!
//! // Views over caller-owned storage; transposition is zero-copy.
//! let data: Vec<i32> = (1..=9).collect();
//! let x = Tensor::<i32, 2, RowMajor>::new(&data, [3, 3]).unwrap();
//! let xt = x.permutate("ij->ji").unwrap();
//! assert_eq!(xt.get_value(&[0, 1]), 4);
//!
//! // Expressions compile to plans at build time; a typo'd literal in a
//! // `const` is a compile error, not a runtime surprise.
//! const ROWS: ContractionPlan<2, 1> = contraction_parse("ij->i");
//!
//! let mut factory = TensorFactory::<i32>::new();
//! let sums = factory.contraction(&ROWS, &x).unwrap();
//! assert_eq!(sums.data(), &[6, 15, 24]);
//! ```
//!
//! ## Layering
//!
//! Each layer depends only on the ones before it: plans are pure index
//! algebra, views borrow caller- or factory-owned storage, kernels walk
//! plans over views, and the factory composes kernels with cached
//! allocation. Everything is synchronous and deterministic; the caching
//! allocator is the only lock-holding object.

#![deny(warnings)]

pub use einsor_core as core;
pub use einsor_kernels as kernels;
pub use einsor_planner as planner;
pub use einsor_pool as pool;

pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! # Example
    //!
    //! ```
    //! use einsor::prelude::*;
    //!
    //! let t = TensorBuf::<f64, 2, RowMajor>::zeros([4, 4]).unwrap();
    //! assert_eq!(sum(&t.view()).unwrap(), 0.0);
    //! ```

    // Core types
    pub use crate::core::{
        ColMajor, CoreError, Element, MemoryOrder, RowMajor, Shape, Size, Tensor, TensorMut,
    };

    // Plan compilation
    pub use crate::planner::{
        contracted_rank, contraction_parse, inner_product_parse, outer_product_parse,
        permutate_parse, ContractionPlan, InnerProductPlan, PermutationPlan, PlanError,
    };

    // Common kernels
    pub use crate::kernels::{
        abs, absmax, absmin, add, bias, contraction, fill, fill_step, inner_product, map_reduce,
        max, min, mul, outer_product, permutate_copy, product, quantize, scale, sub, sum,
        unquantize, KernelError,
    };

    // Allocation
    pub use crate::pool::{
        CacheRegistry, FactoryError, LinearCache, PoolError, TensorBuf, TensorFactory,
        TrackingMode,
    };
}

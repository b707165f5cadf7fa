//! # einsor-kernels
//!
//! Plan-driven numerical kernels for the einsor stack.
//!
//! Two loop families cover every operation:
//!
//! - **Plan walkers** - [`contraction`], [`inner_product`],
//!   [`outer_product`], and [`permutate_copy`] run odometer loop nests whose
//!   per-level driving axes come from a plan compiled by `einsor-planner`.
//!   The walkers read the plan as data, maintain per-operand coordinate
//!   vectors incrementally, and accumulate through each shape's
//!   inner-product offset mapping.
//! - **SIMD-chunked 1-D passes** - reductions ([`sum`], [`product`],
//!   [`min`], [`max`], [`absmax`], [`absmin`], [`map_reduce`]), elementwise
//!   arithmetic ([`add`], [`sub`], [`mul`]), scalar broadcast ([`scale`],
//!   [`bias`]), fills, and [`quantize`]/[`unquantize`]. Buffers are chunked
//!   by the element type's suggested lane width with a scalar tail;
//!   `f32`/`f64` dispatch to AVX2 when the CPU has it.
//!
//! ## Quick start
//!
//! ```
//! use einsor_core::{RowMajor, Tensor, TensorMut};
//! use einsor_kernels::{contraction, sum};
//! use einsor_planner::contraction_parse;
//!
//! let data: Vec<i32> = (1..=6).collect();
//! let x = Tensor::<i32, 2, RowMajor>::new(&data, [2, 3]).unwrap();
//!
//! // Row sums via a compile-time contraction plan.
//! let mut out = vec![0i32; 2];
//! let mut z = TensorMut::<i32, 1, RowMajor>::new(&mut out, [2]).unwrap();
//! contraction(&contraction_parse("ij->i"), &x, &mut z).unwrap();
//! assert_eq!(z.data(), &[6, 15]);
//!
//! assert_eq!(sum(&x).unwrap(), 21);
//! ```
//!
//! ## Failure semantics
//!
//! Kernels are pure and synchronous: invalid operands surface a
//! [`KernelError`] before any element is touched, and no kernel recovers
//! locally or leaves partial progress behind (destinations are zeroed up
//! front by the accumulating walkers).

#![deny(warnings)]

pub mod abs;
pub mod contraction;
pub mod elementwise;
pub mod error;
pub mod product;
pub mod quantize;
pub mod reductions;
pub mod simd;
mod utils;

#[cfg(test)]
mod property_tests;

pub use abs::{abs, abs_checked, AbsValue};
pub use contraction::{contraction, permutate_copy};
pub use elementwise::{add, bias, fill, fill_step, mul, scale, sub};
pub use error::{KernelError, KernelResult};
pub use product::{inner_product, outer_product};
pub use quantize::{quantize, unquantize};
pub use reductions::{absmax, absmin, map_reduce, max, min, product, sum};
pub use simd::SimdCapabilities;

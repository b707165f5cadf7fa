//! # einsor-core
//!
//! Layout algebra and zero-copy tensor views for the einsor stack.
//!
//! This crate provides the foundations the kernel engine and factory build
//! on:
//!
//! - **Layout algebra** ([`Shape`]) - fixed-rank `(sizes, strides,
//!   permutation)` triples with row-/column-major stride inference and
//!   inner-product coordinate mapping
//! - **Memory orders** ([`RowMajor`], [`ColMajor`]) - type-level storage
//!   conventions
//! - **Tensor views** ([`Tensor`], [`TensorMut`]) - borrowed, zero-copy
//!   handles; permutation reshuffles the shape and shares the data
//! - **Element vocabulary** ([`Element`]) - numeric bounds plus a per-type
//!   SIMD lane suggestion
//!
//! ## Core principles
//!
//! Rank and memory order are type parameters: `Tensor<'a, T, R, O>`.
//! Rank is bounded to `1..=63` at compile time, which in turn bounds every
//! capacity below the [`Size`] limit that the checked constructors enforce.
//!
//! Views never own their data. Ownership sits with the caller (any slice)
//! or with the factory's caching allocator (`einsor-pool`); a permuted view
//! is just another borrow of the same buffer.
//!
//! ## Quick start
//!
//! ```
//! use einsor_core::{RowMajor, Tensor};
//!
//! let data: Vec<i32> = (1..=12).collect();
//! let x = Tensor::<i32, 2, RowMajor>::new(&data, [3, 4]).unwrap();
//! assert!(x.is_valid());
//! assert_eq!(x.value_capacity(), 12);
//! assert_eq!(x.get_value(&[1, 2]), 7);
//!
//! // Transpose without copying: same buffer, reshuffled strides.
//! let t = x.permutate("ij->ji").unwrap();
//! assert_eq!(t.get_value(&[2, 1]), 7);
//! ```
//!
//! ## Element access contract
//!
//! `get_value` / `set_value` are deliberately unchecked against the axis
//! sizes (bounds-checking every coordinate makes expression-heavy code
//! intolerable); the caller establishes validity once. The `unsafe`
//! `*_unchecked` siblings skip even the slice bound for hot paths and keep
//! a `debug_assert!` in debug builds.

#![deny(warnings)]

pub mod element;
pub mod error;
pub mod layout;
pub mod view;


pub use element::Element;
pub use error::{CoreError, CoreResult};
pub use layout::{ColMajor, MemoryOrder, RowMajor, Shape, Size};
pub use view::{Tensor, TensorMut};

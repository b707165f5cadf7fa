//! Element-type vocabulary for tensor storage and kernels
//!
//! [`Element`] gathers the numeric bounds the kernel engine relies on
//! (`num-traits`' `Num` + `Bounded` + ordering) and adds the per-type SIMD
//! lane suggestion the chunked 1-D primitives are parameterized by.

use num_traits::{Bounded, Num};
use std::fmt;

/// Trait bound for tensor element types.
///
/// Implemented for `f32`/`f64` and the 8- to 64-bit signed and unsigned
/// integers. `Bounded` supplies the reduction accumulator seeds: for floats
/// `min_value`/`max_value` are the finite extremes (`±MAX`), for integers
/// `MIN`/`MAX`.
pub trait Element:
    Num + Bounded + PartialOrd + Copy + Send + Sync + fmt::Debug + 'static
{
    /// Suggested SIMD lane count for this element type.
    ///
    /// Sized for a 256-bit vector register; kernels chunk 1-D passes by this
    /// width and fall back to a scalar tail. Correctness never depends on
    /// the particular value.
    const LANES: usize;
}

macro_rules! impl_element {
    ($($t:ty),* $(,)?) => {
        $(
            impl Element for $t {
                const LANES: usize = 32 / std::mem::size_of::<$t>();
            }
        )*
    };
}

impl_element!(f32, f64, i8, i16, i32, i64, u8, u16, u32, u64);

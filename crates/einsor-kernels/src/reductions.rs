//! Tensor reductions
//!
//! All reductions run over the raw data buffer (the multiset of elements is
//! layout-independent) through the SIMD-chunked primitives in
//! [`crate::simd`]. Accumulators are seeded per operation: `0` for sums,
//! `1` for products, and the type's finite extremes for `min`/`max` - for
//! floats `±MAX`, for integers `MIN`/`MAX`.
//!
//! For floats the chunked accumulation order differs from a scalar left
//! fold (lane accumulators are combined at the end); the order is fixed by
//! the element type's lane width, so results are deterministic for a given
//! input length.

use crate::abs::AbsValue;
use crate::error::KernelResult;
use crate::simd::{chunked_map_reduce, vproduct, vsum};
use crate::utils::check_valid;
use einsor_core::{Element, MemoryOrder, Tensor};

/// Generic chunked map-then-fold over a tensor's elements.
///
/// The primitive behind the named reductions; exposed for composite passes.
///
/// # Errors
///
/// [`crate::KernelError::SizeZeroTensor`] on a tensor without elements,
/// [`crate::KernelError::InvalidTensorLayout`] on a data/shape mismatch.
pub fn map_reduce<T: Element, const R: usize, O: MemoryOrder>(
    x: &Tensor<'_, T, R, O>,
    init: T,
    map: impl Fn(T) -> T,
    fold: impl Fn(T, T) -> T,
) -> KernelResult<T> {
    check_valid(x)?;
    Ok(chunked_map_reduce(x.data(), init, map, fold))
}

/// Sum of all elements.
///
/// # Examples
///
/// ```
/// use einsor_core::{RowMajor, Tensor};
/// use einsor_kernels::sum;
///
/// let data = vec![1i64; 100];
/// let x = Tensor::<i64, 2, RowMajor>::new(&data, [10, 10]).unwrap();
/// assert_eq!(sum(&x).unwrap(), 100);
/// ```
pub fn sum<T: Element, const R: usize, O: MemoryOrder>(
    x: &Tensor<'_, T, R, O>,
) -> KernelResult<T> {
    check_valid(x)?;
    Ok(vsum(x.data()))
}

/// Product of all elements.
pub fn product<T: Element, const R: usize, O: MemoryOrder>(
    x: &Tensor<'_, T, R, O>,
) -> KernelResult<T> {
    check_valid(x)?;
    Ok(vproduct(x.data()))
}

/// Smallest element.
pub fn min<T: Element, const R: usize, O: MemoryOrder>(
    x: &Tensor<'_, T, R, O>,
) -> KernelResult<T> {
    check_valid(x)?;
    Ok(chunked_map_reduce(
        x.data(),
        T::max_value(),
        |v| v,
        |a, b| if b < a { b } else { a },
    ))
}

/// Largest element.
pub fn max<T: Element, const R: usize, O: MemoryOrder>(
    x: &Tensor<'_, T, R, O>,
) -> KernelResult<T> {
    check_valid(x)?;
    Ok(chunked_map_reduce(
        x.data(),
        T::min_value(),
        |v| v,
        |a, b| if b > a { b } else { a },
    ))
}

/// Largest magnitude: `max(|x|)`.
pub fn absmax<T: AbsValue, const R: usize, O: MemoryOrder>(
    x: &Tensor<'_, T, R, O>,
) -> KernelResult<T> {
    check_valid(x)?;
    Ok(chunked_map_reduce(
        x.data(),
        T::zero(),
        |v| v.abs_value(),
        |a, b| if b > a { b } else { a },
    ))
}

/// Smallest magnitude: `min(|x|)`.
pub fn absmin<T: AbsValue, const R: usize, O: MemoryOrder>(
    x: &Tensor<'_, T, R, O>,
) -> KernelResult<T> {
    check_valid(x)?;
    Ok(chunked_map_reduce(
        x.data(),
        T::max_value(),
        |v| v.abs_value(),
        |a, b| if b < a { b } else { a },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KernelError;
    use einsor_core::RowMajor;

    fn view(data: &[i32]) -> Tensor<'_, i32, 1, RowMajor> {
        Tensor::new(data, [data.len() as u32]).unwrap()
    }

    #[test]
    fn test_sum_product_constant() {
        let data = vec![3i32; 24];
        let x = Tensor::<i32, 3, RowMajor>::new(&data, [2, 3, 4]).unwrap();
        assert_eq!(sum(&x).unwrap(), 72);

        let ones = vec![1i32; 24];
        let y = Tensor::<i32, 3, RowMajor>::new(&ones, [2, 3, 4]).unwrap();
        assert_eq!(product(&y).unwrap(), 1);
    }

    #[test]
    fn test_min_max() {
        let data = vec![5, -3, 8, 0, 12, -7, 2, 2, 9, 1];
        let x = view(&data);
        assert_eq!(min(&x).unwrap(), -7);
        assert_eq!(max(&x).unwrap(), 12);
    }

    #[test]
    fn test_absmax_absmin() {
        let data = vec![5, -3, 8, 0, 12, -77, 2, 2, 9, 1];
        let x = view(&data);
        assert_eq!(absmax(&x).unwrap(), 77);
        assert_eq!(absmin(&x).unwrap(), 0);
    }

    #[test]
    fn test_absmax_floats() {
        let data = vec![0.5f64, -2.5, 1.0, -0.25];
        let x = Tensor::<f64, 1, RowMajor>::new(&data, [4]).unwrap();
        assert_eq!(crate::absmax(&x).unwrap(), 2.5);
        assert_eq!(crate::absmin(&x).unwrap(), 0.25);
    }

    #[test]
    fn test_empty_tensor_fails() {
        let x = Tensor::<i32, 1, RowMajor>::unbound([4]);
        assert_eq!(sum(&x), Err(KernelError::SizeZeroTensor));
        assert_eq!(min(&x), Err(KernelError::SizeZeroTensor));
    }

    #[test]
    fn test_map_reduce_sum_of_squares() {
        let data = vec![1, 2, 3, 4];
        let x = view(&data);
        let sq = map_reduce(&x, 0, |v| v * v, |a, b| a + b).unwrap();
        assert_eq!(sq, 30);
    }

    #[test]
    fn test_reductions_ignore_permutation() {
        let data: Vec<i32> = (1..=12).collect();
        let x = Tensor::<i32, 2, RowMajor>::new(&data, [3, 4]).unwrap();
        let t = x.permutate("ij->ji").unwrap();
        assert_eq!(sum(&x).unwrap(), sum(&t).unwrap());
        assert_eq!(max(&x).unwrap(), max(&t).unwrap());
    }
}

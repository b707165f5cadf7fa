//! Float ↔ integer quantization
//!
//! `quantize` maps a float tensor onto the full symmetric range of an
//! integer type, normalizing by the largest magnitude when it exceeds one,
//! and returns that magnitude so `unquantize` can invert the mapping.

use crate::abs::AbsValue;
use crate::error::KernelResult;
use crate::reductions::absmax;
use crate::utils::{check_equal_len, check_valid, check_valid_mut};
use einsor_core::{Element, MemoryOrder, Tensor, TensorMut};
use num_traits::{Float, NumCast, PrimInt};

/// Quantize `x` into the integer tensor `z`; returns the scale `m`.
///
/// `m = absmax(x)`. When `m > 1` the input is normalized by `1/m` before
/// scaling to the integer type's `MAX`; otherwise values are scaled
/// directly. Rounding is half-away-from-zero; casts saturate at the type
/// bounds.
///
/// # Examples
///
/// ```
/// use einsor_core::{RowMajor, Tensor, TensorMut};
/// use einsor_kernels::{quantize, unquantize};
///
/// let data = vec![0.0f64, 1.0, -1.0, 0.5];
/// let x = Tensor::<f64, 1, RowMajor>::new(&data, [4]).unwrap();
///
/// let mut q = vec![0i8; 4];
/// let mut z = TensorMut::<i8, 1, RowMajor>::new(&mut q, [4]).unwrap();
/// let m = quantize(&x, &mut z).unwrap();
/// assert_eq!(m, 1.0);
/// assert_eq!(z.data(), &[0, 127, -127, 64]);
///
/// let mut back = vec![0.0f64; 4];
/// let mut y = TensorMut::<f64, 1, RowMajor>::new(&mut back, [4]).unwrap();
/// unquantize(&z.view(), &mut y, m).unwrap();
/// assert_eq!(y.data()[1], 1.0);
/// assert_eq!(y.data()[2], -1.0);
/// ```
pub fn quantize<F, I, const R: usize, O: MemoryOrder>(
    x: &Tensor<'_, F, R, O>,
    z: &mut TensorMut<'_, I, R, O>,
) -> KernelResult<F>
where
    F: Element + Float + AbsValue,
    I: Element + PrimInt,
{
    check_valid(x)?;
    check_valid_mut(z)?;
    check_equal_len(x.value_size(), z.value_size())?;

    let m = absmax(x)?;
    let imax = <F as NumCast>::from(I::max_value())
        .expect("integer maximum is representable as a float");
    let inv = if m > F::one() { m.recip() } else { F::one() };

    for (d, &v) in z.data_mut().iter_mut().zip(x.data().iter()) {
        let scaled = (v * inv * imax).round();
        *d = <I as NumCast>::from(scaled).unwrap_or_else(|| {
            if scaled > F::zero() {
                I::max_value()
            } else {
                I::min_value()
            }
        });
    }
    Ok(m)
}

/// Invert [`quantize`] given the saved scale `m`.
///
/// `z[i] = x[i] / MAX * m` when `m > 1`, else `z[i] = x[i] / MAX`. The
/// whole buffer is converted.
pub fn unquantize<I, F, const R: usize, O: MemoryOrder>(
    x: &Tensor<'_, I, R, O>,
    z: &mut TensorMut<'_, F, R, O>,
    m: F,
) -> KernelResult<()>
where
    I: Element + PrimInt,
    F: Element + Float,
{
    check_valid(x)?;
    check_valid_mut(z)?;
    check_equal_len(x.value_size(), z.value_size())?;

    let imax = <F as NumCast>::from(I::max_value())
        .expect("integer maximum is representable as a float");
    let factor = if m > F::one() { m } else { F::one() };

    for (d, &v) in z.data_mut().iter_mut().zip(x.data().iter()) {
        let vf = <F as NumCast>::from(v).unwrap_or_else(F::zero);
        *d = vf / imax * factor;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use einsor_core::RowMajor;

    #[test]
    fn test_quantize_normalizes_above_one() {
        let data = vec![2.0f64, -1.0, 0.0, 1.0];
        let x = Tensor::<f64, 1, RowMajor>::new(&data, [4]).unwrap();
        let mut q = vec![0i8; 4];
        let mut z = TensorMut::<i8, 1, RowMajor>::new(&mut q, [4]).unwrap();

        let m = quantize(&x, &mut z).unwrap();
        assert_eq!(m, 2.0);
        assert_eq!(z.data(), &[127, -64, 0, 64]);
    }

    #[test]
    fn test_quantize_round_trip_extremes() {
        let data = vec![4.0f32, -4.0, 2.0, 0.0];
        let x = Tensor::<f32, 1, RowMajor>::new(&data, [4]).unwrap();
        let mut q = vec![0i16; 4];
        let mut z = TensorMut::<i16, 1, RowMajor>::new(&mut q, [4]).unwrap();
        let m = quantize(&x, &mut z).unwrap();

        let mut back = vec![0.0f32; 4];
        let mut y = TensorMut::<f32, 1, RowMajor>::new(&mut back, [4]).unwrap();
        unquantize(&z.view(), &mut y, m).unwrap();

        assert_eq!(y.data()[0], 4.0);
        assert_eq!(y.data()[1], -4.0);
        assert!((y.data()[2] - 2.0).abs() < 1e-3);
        assert_eq!(y.data()[3], 0.0);
    }

    #[test]
    fn test_quantize_converts_whole_buffer() {
        // Well past any fixed-iteration fallback window.
        let data: Vec<f64> = (0..512).map(|i| (i % 3) as f64 * 0.25).collect();
        let x = Tensor::<f64, 1, RowMajor>::new(&data, [512]).unwrap();
        let mut q = vec![0i8; 512];
        let mut z = TensorMut::<i8, 1, RowMajor>::new(&mut q, [512]).unwrap();
        quantize(&x, &mut z).unwrap();
        // 0.0 / 0.25 / 0.5 scale to 0 / 32 / 64 against the i8 range.
        assert_eq!(z.data()[509], 64);
        assert_eq!(z.data()[510], 0);
        assert_eq!(z.data()[511], 32);
    }
}

//! Absolute-value support for every element class
//!
//! Signed integers use the branchless bit-twiddle
//! `(x + (x >> bits-1)) ^ (x >> bits-1)`, which wraps on `MIN`; the checked
//! kernel reports that case as [`KernelError::IntegerOverflow`]. Floats go
//! through their native `abs`, unsigned integers are their own magnitude.

use crate::error::{KernelError, KernelResult};
use crate::utils::{check_equal_len, check_valid, check_valid_mut};
use einsor_core::{Element, MemoryOrder, Tensor, TensorMut};

/// Element magnitude, with a checked variant for signed integers.
pub trait AbsValue: Element {
    /// `|self|`. Wraps to `MIN` for a signed integer `MIN`.
    fn abs_value(self) -> Self;

    /// `|self|`, or `None` when the magnitude is not representable.
    fn checked_abs_value(self) -> Option<Self>;
}

macro_rules! impl_abs_float {
    ($($t:ty),* $(,)?) => {
        $(
            impl AbsValue for $t {
                fn abs_value(self) -> Self {
                    self.abs()
                }

                fn checked_abs_value(self) -> Option<Self> {
                    Some(self.abs())
                }
            }
        )*
    };
}

macro_rules! impl_abs_signed {
    ($($t:ty),* $(,)?) => {
        $(
            impl AbsValue for $t {
                fn abs_value(self) -> Self {
                    let mask = self >> (std::mem::size_of::<$t>() * 8 - 1);
                    self.wrapping_add(mask) ^ mask
                }

                fn checked_abs_value(self) -> Option<Self> {
                    if self == <$t>::MIN {
                        None
                    } else {
                        Some(self.abs_value())
                    }
                }
            }
        )*
    };
}

macro_rules! impl_abs_unsigned {
    ($($t:ty),* $(,)?) => {
        $(
            impl AbsValue for $t {
                fn abs_value(self) -> Self {
                    self
                }

                fn checked_abs_value(self) -> Option<Self> {
                    Some(self)
                }
            }
        )*
    };
}

impl_abs_float!(f32, f64);
impl_abs_signed!(i8, i16, i32, i64);
impl_abs_unsigned!(u8, u16, u32, u64);

/// `z[i] = |x[i]|`, element-count-wise.
///
/// A signed-integer `MIN` wraps back to `MIN`; use [`abs_checked`] to
/// surface that case instead.
pub fn abs<T: AbsValue, const R: usize, O: MemoryOrder>(
    x: &Tensor<'_, T, R, O>,
    z: &mut TensorMut<'_, T, R, O>,
) -> KernelResult<()> {
    check_valid(x)?;
    check_valid_mut(z)?;
    check_equal_len(x.value_size(), z.value_size())?;
    for (d, &v) in z.data_mut().iter_mut().zip(x.data().iter()) {
        *d = v.abs_value();
    }
    Ok(())
}

/// `z[i] = |x[i]|`, failing on a non-representable magnitude.
///
/// # Errors
///
/// [`KernelError::IntegerOverflow`] when the input contains a signed
/// integer `MIN`.
pub fn abs_checked<T: AbsValue, const R: usize, O: MemoryOrder>(
    x: &Tensor<'_, T, R, O>,
    z: &mut TensorMut<'_, T, R, O>,
) -> KernelResult<()> {
    check_valid(x)?;
    check_valid_mut(z)?;
    check_equal_len(x.value_size(), z.value_size())?;
    for (d, &v) in z.data_mut().iter_mut().zip(x.data().iter()) {
        *d = v.checked_abs_value().ok_or(KernelError::IntegerOverflow)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use einsor_core::RowMajor;

    #[test]
    fn test_bit_twiddled_abs() {
        assert_eq!((-5i32).abs_value(), 5);
        assert_eq!(5i32.abs_value(), 5);
        assert_eq!(0i32.abs_value(), 0);
        assert_eq!((-128i8).abs_value(), -128); // wraps
        assert_eq!(i64::MIN.abs_value(), i64::MIN);
    }

    #[test]
    fn test_checked_abs() {
        assert_eq!((-5i32).checked_abs_value(), Some(5));
        assert_eq!(i32::MIN.checked_abs_value(), None);
        assert_eq!((-0.5f64).checked_abs_value(), Some(0.5));
        assert_eq!(7u8.checked_abs_value(), Some(7));
    }

    #[test]
    fn test_abs_kernel() {
        let data = vec![-1i32, 2, -3, 4];
        let x = Tensor::<i32, 1, RowMajor>::new(&data, [4]).unwrap();
        let mut out = vec![0i32; 4];
        let mut z = TensorMut::<i32, 1, RowMajor>::new(&mut out, [4]).unwrap();
        abs(&x, &mut z).unwrap();
        assert_eq!(z.data(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_abs_checked_kernel_overflow() {
        let data = vec![1i32, i32::MIN];
        let x = Tensor::<i32, 1, RowMajor>::new(&data, [2]).unwrap();
        let mut out = vec![0i32; 2];
        let mut z = TensorMut::<i32, 1, RowMajor>::new(&mut out, [2]).unwrap();
        assert_eq!(abs_checked(&x, &mut z), Err(KernelError::IntegerOverflow));
    }
}

//! Elementwise arithmetic and scalar broadcast
//!
//! Three-operand elementwise kernels require identical element types and
//! identical element counts; layouts beyond the count are not inspected
//! (the pass runs over the raw buffers).

use crate::error::KernelResult;
use crate::simd::{vadd, vbias, vfill, vmul, vscale, vsub};
use crate::utils::{check_equal_len, check_valid, check_valid_mut};
use einsor_core::{Element, MemoryOrder, Tensor, TensorMut};

/// `z[i] = x[i] + y[i]`
///
/// # Examples
///
/// ```
/// use einsor_core::{RowMajor, Tensor, TensorMut};
/// use einsor_kernels::add;
///
/// let a = vec![1i32, 2, 3, 4];
/// let b = vec![10i32, 20, 30, 40];
/// let x = Tensor::<i32, 2, RowMajor>::new(&a, [2, 2]).unwrap();
/// let y = Tensor::<i32, 2, RowMajor>::new(&b, [2, 2]).unwrap();
///
/// let mut out = vec![0i32; 4];
/// let mut z = TensorMut::<i32, 2, RowMajor>::new(&mut out, [2, 2]).unwrap();
/// add(&x, &y, &mut z).unwrap();
/// assert_eq!(z.data(), &[11, 22, 33, 44]);
/// ```
pub fn add<T: Element, const R: usize, O: MemoryOrder>(
    x: &Tensor<'_, T, R, O>,
    y: &Tensor<'_, T, R, O>,
    z: &mut TensorMut<'_, T, R, O>,
) -> KernelResult<()> {
    check_valid(x)?;
    check_valid(y)?;
    check_valid_mut(z)?;
    check_equal_len(x.value_size(), y.value_size())?;
    check_equal_len(x.value_size(), z.value_size())?;
    vadd(x.data(), y.data(), z.data_mut());
    Ok(())
}

/// `z[i] = x[i] - y[i]`
pub fn sub<T: Element, const R: usize, O: MemoryOrder>(
    x: &Tensor<'_, T, R, O>,
    y: &Tensor<'_, T, R, O>,
    z: &mut TensorMut<'_, T, R, O>,
) -> KernelResult<()> {
    check_valid(x)?;
    check_valid(y)?;
    check_valid_mut(z)?;
    check_equal_len(x.value_size(), y.value_size())?;
    check_equal_len(x.value_size(), z.value_size())?;
    vsub(x.data(), y.data(), z.data_mut());
    Ok(())
}

/// `z[i] = x[i] * y[i]` (Hadamard product)
pub fn mul<T: Element, const R: usize, O: MemoryOrder>(
    x: &Tensor<'_, T, R, O>,
    y: &Tensor<'_, T, R, O>,
    z: &mut TensorMut<'_, T, R, O>,
) -> KernelResult<()> {
    check_valid(x)?;
    check_valid(y)?;
    check_valid_mut(z)?;
    check_equal_len(x.value_size(), y.value_size())?;
    check_equal_len(x.value_size(), z.value_size())?;
    vmul(x.data(), y.data(), z.data_mut());
    Ok(())
}

/// Scalar broadcast: `z[i] = x[i] * s`
pub fn scale<T: Element, const R: usize, O: MemoryOrder>(
    x: &Tensor<'_, T, R, O>,
    z: &mut TensorMut<'_, T, R, O>,
    s: T,
) -> KernelResult<()> {
    check_valid(x)?;
    check_valid_mut(z)?;
    check_equal_len(x.value_size(), z.value_size())?;
    vscale(x.data(), z.data_mut(), s);
    Ok(())
}

/// Scalar broadcast: `z[i] = x[i] + s`
pub fn bias<T: Element, const R: usize, O: MemoryOrder>(
    x: &Tensor<'_, T, R, O>,
    z: &mut TensorMut<'_, T, R, O>,
    s: T,
) -> KernelResult<()> {
    check_valid(x)?;
    check_valid_mut(z)?;
    check_equal_len(x.value_size(), z.value_size())?;
    vbias(x.data(), z.data_mut(), s);
    Ok(())
}

/// `z[i] = value`
pub fn fill<T: Element, const R: usize, O: MemoryOrder>(
    z: &mut TensorMut<'_, T, R, O>,
    value: T,
) -> KernelResult<()> {
    check_valid_mut(z)?;
    vfill(z.data_mut(), value);
    Ok(())
}

/// Arithmetic-progression fill: `z[i] = start + i * step`, in buffer order.
///
/// # Examples
///
/// ```
/// use einsor_core::{RowMajor, TensorMut};
/// use einsor_kernels::fill_step;
///
/// let mut out = vec![0i32; 6];
/// let mut z = TensorMut::<i32, 2, RowMajor>::new(&mut out, [2, 3]).unwrap();
/// fill_step(&mut z, 1, 1).unwrap();
/// assert_eq!(z.data(), &[1, 2, 3, 4, 5, 6]);
/// ```
pub fn fill_step<T: Element, const R: usize, O: MemoryOrder>(
    z: &mut TensorMut<'_, T, R, O>,
    start: T,
    step: T,
) -> KernelResult<()> {
    check_valid_mut(z)?;
    let mut v = start;
    for d in z.data_mut().iter_mut() {
        *d = v;
        v = v + step;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KernelError;
    use einsor_core::RowMajor;

    #[test]
    fn test_add_sub_mul() {
        let a: Vec<i64> = (1..=8).collect();
        let b: Vec<i64> = (1..=8).map(|v| v * 10).collect();
        let x = Tensor::<i64, 3, RowMajor>::new(&a, [2, 2, 2]).unwrap();
        let y = Tensor::<i64, 3, RowMajor>::new(&b, [2, 2, 2]).unwrap();

        let mut out = vec![0i64; 8];
        let mut z = TensorMut::<i64, 3, RowMajor>::new(&mut out, [2, 2, 2]).unwrap();

        add(&x, &y, &mut z).unwrap();
        assert_eq!(z.data()[3], 44);
        sub(&x, &y, &mut z).unwrap();
        assert_eq!(z.data()[3], -36);
        mul(&x, &y, &mut z).unwrap();
        assert_eq!(z.data()[3], 160);
    }

    #[test]
    fn test_scale_bias() {
        let a: Vec<i32> = (0..10).collect();
        let x = Tensor::<i32, 1, RowMajor>::new(&a, [10]).unwrap();
        let mut out = vec![0i32; 10];
        let mut z = TensorMut::<i32, 1, RowMajor>::new(&mut out, [10]).unwrap();

        scale(&x, &mut z, 4).unwrap();
        assert_eq!(z.data()[9], 36);
        bias(&x, &mut z, 4).unwrap();
        assert_eq!(z.data()[9], 13);
    }

    #[test]
    fn test_unequal_counts_rejected() {
        let a = vec![1i32; 4];
        let b = vec![1i32; 6];
        let x = Tensor::<i32, 2, RowMajor>::new(&a, [2, 2]).unwrap();
        let y = Tensor::<i32, 2, RowMajor>::new(&b, [2, 3]).unwrap();
        let mut out = vec![0i32; 4];
        let mut z = TensorMut::<i32, 2, RowMajor>::new(&mut out, [2, 2]).unwrap();
        assert_eq!(
            add(&x, &y, &mut z),
            Err(KernelError::UnequalSize { left: 4, right: 6 })
        );
    }

    #[test]
    fn test_fill_and_fill_step() {
        let mut out = vec![0i32; 12];
        let mut z = TensorMut::<i32, 2, RowMajor>::new(&mut out, [3, 4]).unwrap();
        fill(&mut z, 7).unwrap();
        assert!(z.data().iter().all(|&v| v == 7));

        fill_step(&mut z, 10, -2).unwrap();
        assert_eq!(z.data()[0], 10);
        assert_eq!(z.data()[11], -12);
    }
}

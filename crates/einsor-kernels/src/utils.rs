//! Shared validation helpers for kernel entry points

use crate::error::{KernelError, KernelResult};
use einsor_core::{MemoryOrder, Tensor, TensorMut};

/// Layout check for a source operand.
///
/// An operand without elements is reported as
/// [`KernelError::SizeZeroTensor`]; any other shape/data disagreement is
/// [`KernelError::InvalidTensorLayout`].
pub(crate) fn check_valid<T, const R: usize, O: MemoryOrder>(
    x: &Tensor<'_, T, R, O>,
) -> KernelResult<()> {
    if x.value_size() == 0 {
        return Err(KernelError::SizeZeroTensor);
    }
    if !x.is_valid() {
        return Err(KernelError::InvalidTensorLayout {
            expected: x.value_capacity(),
            actual: x.value_size(),
        });
    }
    Ok(())
}

/// Layout check for a destination operand.
pub(crate) fn check_valid_mut<T, const R: usize, O: MemoryOrder>(
    z: &TensorMut<'_, T, R, O>,
) -> KernelResult<()> {
    if z.value_size() == 0 {
        return Err(KernelError::SizeZeroTensor);
    }
    if !z.is_valid() {
        return Err(KernelError::InvalidTensorLayout {
            expected: z.value_capacity(),
            actual: z.value_size(),
        });
    }
    Ok(())
}

/// Two buffers that must hold the same element count.
pub(crate) fn check_equal_len(left: usize, right: usize) -> KernelResult<()> {
    if left != right {
        return Err(KernelError::UnequalSize {
            left: left as u64,
            right: right as u64,
        });
    }
    Ok(())
}

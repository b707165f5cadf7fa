//! Plan-driven contraction and permutation walkers
//!
//! The walkers read their plan as data: an odometer advances one counter
//! per loop level, maintaining per-operand coordinate vectors incrementally,
//! and the innermost body accumulates through the shapes' inner-product
//! offset mapping. Destinations are zeroed before the walk.

use crate::error::{KernelError, KernelResult};
use crate::simd::vfill;
use crate::utils::{check_valid, check_valid_mut};
use einsor_core::{Element, MemoryOrder, Size, Tensor, TensorMut};
use einsor_planner::{ContractionPlan, PermutationPlan};

/// Each of `axes[..n]` must name a distinct axis below `rank`.
fn check_axis_cover(axes: &[u32], n: usize, rank: usize) -> KernelResult<()> {
    let mut mask: u64 = 0;
    for &axis in &axes[..n] {
        if axis as usize >= rank {
            return Err(KernelError::InvalidDimensions {
                context: "plan names an axis beyond the operand rank",
            });
        }
        if (mask >> axis) & 1 == 1 {
            return Err(KernelError::InvalidDimensions {
                context: "plan drives one axis at two loop levels",
            });
        }
        mask |= 1 << axis;
    }
    if mask != (1u64 << rank) - 1 {
        return Err(KernelError::InvalidDimensions {
            context: "plan leaves an operand axis undriven",
        });
    }
    Ok(())
}

/// Index-contraction: sum `x` over the plan's summation axes into `z`.
///
/// Loop level `i` drives source axis `plan.lhs[i]`; the first `YR` levels
/// also drive the paired result axis `plan.rhs[i]`, the remaining levels
/// are summed over. `z` is zeroed first.
///
/// # Errors
///
/// Layout errors for invalid operands, [`KernelError::InvalidSizes`] when a
/// destination axis disagrees with its paired source axis, and
/// [`KernelError::InvalidDimensions`] for a plan that does not cover the
/// operands.
///
/// # Examples
///
/// ```
/// use einsor_core::{RowMajor, Tensor, TensorMut};
/// use einsor_kernels::contraction;
/// use einsor_planner::contraction_parse;
///
/// // Row sums of a 2x3 matrix.
/// let data = vec![1i32, 2, 3, 10, 20, 30];
/// let x = Tensor::<i32, 2, RowMajor>::new(&data, [2, 3]).unwrap();
///
/// let mut out = vec![0i32; 2];
/// let mut z = TensorMut::<i32, 1, RowMajor>::new(&mut out, [2]).unwrap();
/// contraction(&contraction_parse("ij->i"), &x, &mut z).unwrap();
/// assert_eq!(z.data(), &[6, 60]);
/// ```
pub fn contraction<T: Element, const XR: usize, const YR: usize, O: MemoryOrder>(
    plan: &ContractionPlan<XR, YR>,
    x: &Tensor<'_, T, XR, O>,
    z: &mut TensorMut<'_, T, YR, O>,
) -> KernelResult<()> {
    const {
        assert!(YR <= XR, "contraction result rank cannot exceed the source rank");
    }
    check_valid(x)?;
    check_valid_mut(z)?;
    check_axis_cover(&plan.lhs, XR, XR)?;
    check_axis_cover(&plan.rhs, YR, YR)?;
    for m in 0..YR {
        let expected = x.shape().size(plan.lhs[m] as usize);
        let actual = z.shape().size(plan.rhs[m] as usize);
        if expected != actual {
            return Err(KernelError::InvalidSizes {
                axis: plan.rhs[m] as usize,
                expected,
                actual,
            });
        }
    }

    vfill(z.data_mut(), T::zero());

    let mut counters = [0 as Size; XR];
    let mut cx = [0 as Size; XR];
    let mut cz = [0 as Size; YR];
    loop {
        let offset = z.shape().index(&cz) as usize;
        let slot = &mut z.data_mut()[offset];
        *slot = *slot + x.get_value(&cx);

        // Advance the odometer, innermost level fastest.
        let mut level = XR;
        loop {
            if level == 0 {
                return Ok(());
            }
            level -= 1;
            let axis = plan.lhs[level] as usize;
            counters[level] += 1;
            if counters[level] < x.shape().size(axis) {
                cx[axis] = counters[level];
                if level < YR {
                    cz[plan.rhs[level] as usize] = counters[level];
                }
                break;
            }
            counters[level] = 0;
            cx[axis] = 0;
            if level < YR {
                cz[plan.rhs[level] as usize] = 0;
            }
        }
    }
}

/// Materialize a permuted copy: `z[c] = x[p ∘ c]`.
///
/// The zero-copy sibling is `Tensor::permutate`; this walker writes the
/// reordered elements into `z`'s own layout.
pub fn permutate_copy<T: Element, const R: usize, O: MemoryOrder>(
    plan: &PermutationPlan<R>,
    x: &Tensor<'_, T, R, O>,
    z: &mut TensorMut<'_, T, R, O>,
) -> KernelResult<()> {
    check_valid(x)?;
    check_valid_mut(z)?;
    check_axis_cover(plan, R, R)?;
    for (i, &src) in plan.iter().enumerate() {
        let expected = x.shape().size(src as usize);
        let actual = z.shape().size(i);
        if expected != actual {
            return Err(KernelError::InvalidSizes {
                axis: i,
                expected,
                actual,
            });
        }
    }

    let mut cz = [0 as Size; R];
    let mut cx = [0 as Size; R];
    loop {
        z.set_value(x.get_value(&cx), &cz);

        let mut level = R;
        loop {
            if level == 0 {
                return Ok(());
            }
            level -= 1;
            let src = plan[level] as usize;
            cz[level] += 1;
            if cz[level] < z.shape().size(level) {
                cx[src] = cz[level];
                break;
            }
            cz[level] = 0;
            cx[src] = 0;
        }
    }
}

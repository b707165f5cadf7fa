//! Generalized inner and outer products
//!
//! One walker serves both: the plan's loop levels enumerate every distinct
//! index of `"<x>,<y>-><z>"`, levels absent from `z` are contracted, and the
//! innermost body multiply-accumulates into the zeroed destination. The
//! outer-product entry additionally insists the plan contracts nothing.

use crate::error::{KernelError, KernelResult};
use crate::simd::vfill;
use crate::utils::{check_valid, check_valid_mut};
use einsor_core::{Element, MemoryOrder, Size, Tensor, TensorMut};
use einsor_planner::{InnerProductPlan, MAX_LEVELS, PASS, TRIP_FROM_X};

/// Per-level trip counts, with cross-operand size agreement enforced.
fn level_trips<T, const XR: usize, const YR: usize, const ZR: usize, O: MemoryOrder>(
    plan: &InnerProductPlan<XR, YR, ZR>,
    x: &Tensor<'_, T, XR, O>,
    y: &Tensor<'_, T, YR, O>,
    z_sizes: &[Size; ZR],
) -> KernelResult<[Size; MAX_LEVELS]> {
    if plan.levels == 0 || plan.levels > MAX_LEVELS {
        return Err(KernelError::InvalidDimensions {
            context: "plan has no usable loop levels",
        });
    }

    let mut x_mask: u64 = 0;
    let mut y_mask: u64 = 0;
    let mut z_mask: u64 = 0;
    let mut trips = [0 as Size; MAX_LEVELS];

    for level in 0..plan.levels {
        let xa = plan.x_axes[level];
        let ya = plan.y_axes[level];
        let za = plan.z_axes[level];

        if xa != PASS {
            if xa as usize >= XR || (x_mask >> xa) & 1 == 1 {
                return Err(KernelError::InvalidDimensions {
                    context: "plan does not cover the first operand",
                });
            }
            x_mask |= 1 << xa;
        }
        if ya != PASS {
            if ya as usize >= YR || (y_mask >> ya) & 1 == 1 {
                return Err(KernelError::InvalidDimensions {
                    context: "plan does not cover the second operand",
                });
            }
            y_mask |= 1 << ya;
        }
        if za != PASS {
            if za as usize >= ZR || (z_mask >> za) & 1 == 1 {
                return Err(KernelError::InvalidDimensions {
                    context: "plan does not cover the destination",
                });
            }
            z_mask |= 1 << za;
        }

        let trip = if plan.trip_from[level] == TRIP_FROM_X {
            if xa == PASS {
                return Err(KernelError::InvalidDimensions {
                    context: "trip count drawn from an operand that skips the level",
                });
            }
            x.shape().size(xa as usize)
        } else {
            if ya == PASS {
                return Err(KernelError::InvalidDimensions {
                    context: "trip count drawn from an operand that skips the level",
                });
            }
            y.shape().size(ya as usize)
        };

        if xa != PASS && x.shape().size(xa as usize) != trip {
            return Err(KernelError::UnequalSize {
                left: trip as u64,
                right: x.shape().size(xa as usize) as u64,
            });
        }
        if ya != PASS && y.shape().size(ya as usize) != trip {
            return Err(KernelError::UnequalSize {
                left: trip as u64,
                right: y.shape().size(ya as usize) as u64,
            });
        }
        if za != PASS && z_sizes[za as usize] != trip {
            return Err(KernelError::InvalidSizes {
                axis: za as usize,
                expected: trip,
                actual: z_sizes[za as usize],
            });
        }

        trips[level] = trip;
    }

    if x_mask != (1u64 << XR) - 1 {
        return Err(KernelError::InvalidDimensions {
            context: "plan does not cover the first operand",
        });
    }
    if y_mask != (1u64 << YR) - 1 {
        return Err(KernelError::InvalidDimensions {
            context: "plan does not cover the second operand",
        });
    }
    if z_mask != (1u64 << ZR) - 1 {
        return Err(KernelError::InvalidDimensions {
            context: "plan does not cover the destination",
        });
    }
    Ok(trips)
}

/// Generalized inner product: multiply-accumulate `x` against `y` into `z`.
///
/// Indices shared by `x` and `y` but absent from `z` are summed; indices
/// present in `z` drive its coordinates. `z` is zeroed first.
///
/// # Examples
///
/// ```
/// use einsor_core::{RowMajor, Tensor, TensorMut};
/// use einsor_kernels::inner_product;
/// use einsor_planner::inner_product_parse;
///
/// // 2x2 matrix product.
/// let a = vec![1i32, 1, 1, 1];
/// let b = vec![1i32, 2, 3, 4];
/// let x = Tensor::<i32, 2, RowMajor>::new(&a, [2, 2]).unwrap();
/// let y = Tensor::<i32, 2, RowMajor>::new(&b, [2, 2]).unwrap();
///
/// let mut out = vec![0i32; 4];
/// let mut z = TensorMut::<i32, 2, RowMajor>::new(&mut out, [2, 2]).unwrap();
/// inner_product(&inner_product_parse("ij,jk->ik"), &x, &y, &mut z).unwrap();
/// assert_eq!(z.data(), &[4, 6, 4, 6]);
/// ```
pub fn inner_product<T: Element, const XR: usize, const YR: usize, const ZR: usize, O: MemoryOrder>(
    plan: &InnerProductPlan<XR, YR, ZR>,
    x: &Tensor<'_, T, XR, O>,
    y: &Tensor<'_, T, YR, O>,
    z: &mut TensorMut<'_, T, ZR, O>,
) -> KernelResult<()> {
    check_valid(x)?;
    check_valid(y)?;
    check_valid_mut(z)?;
    let trips = level_trips(plan, x, y, z.shape().sizes())?;

    vfill(z.data_mut(), T::zero());

    let mut counters = [0 as Size; MAX_LEVELS];
    let mut cx = [0 as Size; XR];
    let mut cy = [0 as Size; YR];
    let mut cz = [0 as Size; ZR];
    loop {
        let offset = z.shape().index(&cz) as usize;
        let slot = &mut z.data_mut()[offset];
        *slot = *slot + x.get_value(&cx) * y.get_value(&cy);

        // Advance the odometer, innermost level fastest; levels whose plan
        // entry is PASS leave that operand's coordinates untouched.
        let mut level = plan.levels;
        loop {
            if level == 0 {
                return Ok(());
            }
            level -= 1;
            counters[level] += 1;
            let next = if counters[level] < trips[level] {
                counters[level]
            } else {
                counters[level] = 0;
                0
            };
            if plan.x_axes[level] != PASS {
                cx[plan.x_axes[level] as usize] = next;
            }
            if plan.y_axes[level] != PASS {
                cy[plan.y_axes[level] as usize] = next;
            }
            if plan.z_axes[level] != PASS {
                cz[plan.z_axes[level] as usize] = next;
            }
            if next != 0 {
                break;
            }
        }
    }
}

/// Generalized outer product: every input index survives to the output.
///
/// Runs the same walker as [`inner_product`] over a plan that must not
/// contract any level.
///
/// # Examples
///
/// ```
/// use einsor_core::{RowMajor, Tensor, TensorMut};
/// use einsor_kernels::outer_product;
/// use einsor_planner::outer_product_parse;
///
/// let a = vec![1i32, 2];
/// let b = vec![10i32, 20, 30];
/// let x = Tensor::<i32, 1, RowMajor>::new(&a, [2]).unwrap();
/// let y = Tensor::<i32, 1, RowMajor>::new(&b, [3]).unwrap();
///
/// let mut out = vec![0i32; 6];
/// let mut z = TensorMut::<i32, 2, RowMajor>::new(&mut out, [2, 3]).unwrap();
/// outer_product(&outer_product_parse("i,j->ij"), &x, &y, &mut z).unwrap();
/// assert_eq!(z.data(), &[10, 20, 30, 20, 40, 60]);
/// ```
pub fn outer_product<T: Element, const XR: usize, const YR: usize, const ZR: usize, O: MemoryOrder>(
    plan: &InnerProductPlan<XR, YR, ZR>,
    x: &Tensor<'_, T, XR, O>,
    y: &Tensor<'_, T, YR, O>,
    z: &mut TensorMut<'_, T, ZR, O>,
) -> KernelResult<()> {
    if plan.has_contraction() {
        return Err(KernelError::InvalidDimensions {
            context: "outer-product plan contracts an axis",
        });
    }
    inner_product(plan, x, y, z)
}

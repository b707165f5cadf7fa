//! Borrowed tensor views
//!
//! [`Tensor`] and [`TensorMut`] are handles over a data slice someone else
//! owns (the caller, or the factory's caching allocator). Permutation
//! produces a new view into the same slice with a reshuffled shape; nothing
//! is copied. Read views are `Copy` and freely duplicable, so aliasing a
//! buffer through several permuted views is ordinary shared borrowing;
//! writes go through the exclusive [`TensorMut`].

use crate::element::Element;
use crate::error::{CoreError, CoreResult};
use crate::layout::{MemoryOrder, Shape, Size};
use einsor_planner::{try_permutate_parse, PermutationPlan, PlanError};

/// Immutable rank- and order-parameterized tensor view.
///
/// # Examples
///
/// ```
/// use einsor_core::{RowMajor, Tensor};
///
/// let data: Vec<i32> = (1..=9).collect();
/// let x = Tensor::<i32, 2, RowMajor>::new(&data, [3, 3]).unwrap();
/// assert_eq!(x.get_value(&[0, 2]), 3);
/// assert_eq!(x.get_value(&[1, 0]), 4);
///
/// let y = x.permutate("ij->ji").unwrap();
/// assert_eq!(y.get_value(&[0, 1]), 4);
/// assert_eq!(y.get_value(&[2, 0]), 3);
/// ```
#[derive(Debug)]
pub struct Tensor<'a, T, const R: usize, O: MemoryOrder> {
    data: &'a [T],
    shape: Shape<R, O>,
}

impl<'a, T, const R: usize, O: MemoryOrder> Clone for Tensor<'a, T, R, O> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T, const R: usize, O: MemoryOrder> Copy for Tensor<'a, T, R, O> {}

impl<'a, T, const R: usize, O: MemoryOrder> Tensor<'a, T, R, O> {
    /// Bind a view over `data` with the given sizes.
    ///
    /// # Errors
    ///
    /// [`CoreError::CapacityOverflow`] when the size product does not fit
    /// [`Size`]; [`CoreError::InvalidTensorLayout`] when `data` does not
    /// hold exactly that many elements (or is empty).
    pub fn new(data: &'a [T], sizes: [Size; R]) -> CoreResult<Self> {
        let shape = Shape::from_sizes(sizes);
        let capacity = shape.checked_capacity()? as u64;
        if data.len() as u64 != capacity || data.is_empty() {
            return Err(CoreError::InvalidTensorLayout {
                expected: capacity,
                actual: data.len(),
            });
        }
        Ok(Self { data, shape })
    }

    /// A view with declared sizes but no data yet.
    ///
    /// Invalid until the factory binds storage for it; see
    /// `TensorFactory::alloc_to_tensor`.
    pub fn unbound(sizes: [Size; R]) -> Self {
        Self {
            data: &[],
            shape: Shape::from_sizes(sizes),
        }
    }

    /// View from pre-validated parts. Internal to the stack.
    #[doc(hidden)]
    pub fn from_parts(data: &'a [T], shape: Shape<R, O>) -> Self {
        Self { data, shape }
    }

    /// The underlying data slice.
    pub fn data(&self) -> &'a [T] {
        self.data
    }

    /// The shape triple.
    pub fn shape(&self) -> &Shape<R, O> {
        &self.shape
    }

    /// Number of elements actually bound.
    pub fn value_size(&self) -> usize {
        self.data.len()
    }

    /// Number of elements the shape spans.
    pub fn value_capacity(&self) -> u64 {
        self.shape.capacity()
    }

    /// Whether the bound data exactly covers the shape (and is non-empty).
    pub fn is_valid(&self) -> bool {
        !self.data.is_empty() && self.data.len() as u64 == self.shape.capacity()
    }

    /// Reorder axes according to an already-parsed permutation plan.
    ///
    /// Same data, value-copied shape.
    pub fn permutate_plan(&self, plan: &PermutationPlan<R>) -> Tensor<'a, T, R, O> {
        Tensor {
            data: self.data,
            shape: self.shape.apply_permutation(plan),
        }
    }

    /// Parse a permutation expression and reorder axes accordingly.
    ///
    /// Returns a new view into the **same** data slice; the original view
    /// stays live and valid. No allocation.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidTensorLayout`] when this view is not valid,
    /// [`CoreError::RankMismatch`] when an expression side does not have
    /// length `R`, [`CoreError::InvalidPermutation`] when the sides are not
    /// permutations of each other.
    pub fn permutate(&self, expr: &str) -> CoreResult<Tensor<'a, T, R, O>> {
        if !self.is_valid() {
            return Err(CoreError::InvalidTensorLayout {
                expected: self.shape.capacity(),
                actual: self.data.len(),
            });
        }
        let plan = parse_permutation::<R>(expr)?;
        Ok(self.permutate_plan(&plan))
    }
}

impl<'a, T: Element, const R: usize, O: MemoryOrder> Tensor<'a, T, R, O> {
    /// Read the element at `coord`.
    ///
    /// Deliberately unchecked against the axis sizes: the caller must have
    /// established `is_valid()` and in-range coordinates. Out-of-range
    /// coordinates at worst panic on the slice bound.
    pub fn get_value(&self, coord: &[Size; R]) -> T {
        self.data[self.shape.index(coord) as usize]
    }

    /// Read the element at `coord` without any bounds check.
    ///
    /// # Safety
    ///
    /// The view must be valid and every coordinate below its axis size.
    pub unsafe fn get_value_unchecked(&self, coord: &[Size; R]) -> T {
        let offset = self.shape.index(coord) as usize;
        debug_assert!(offset < self.data.len());
        *self.data.get_unchecked(offset)
    }
}

/// Mutable rank- and order-parameterized tensor view.
///
/// The writable sibling of [`Tensor`]; downgrade with
/// [`view`](TensorMut::view) to share read access.
pub struct TensorMut<'a, T, const R: usize, O: MemoryOrder> {
    data: &'a mut [T],
    shape: Shape<R, O>,
}

impl<'a, T, const R: usize, O: MemoryOrder> TensorMut<'a, T, R, O> {
    /// Bind a mutable view over `data` with the given sizes.
    ///
    /// Same validation as [`Tensor::new`].
    pub fn new(data: &'a mut [T], sizes: [Size; R]) -> CoreResult<Self> {
        let shape = Shape::from_sizes(sizes);
        let capacity = shape.checked_capacity()? as u64;
        if data.len() as u64 != capacity || data.is_empty() {
            return Err(CoreError::InvalidTensorLayout {
                expected: capacity,
                actual: data.len(),
            });
        }
        Ok(Self { data, shape })
    }

    /// Mutable view from pre-validated parts. Internal to the stack.
    #[doc(hidden)]
    pub fn from_parts(data: &'a mut [T], shape: Shape<R, O>) -> Self {
        Self { data, shape }
    }

    /// Reborrow as an immutable view.
    pub fn view(&self) -> Tensor<'_, T, R, O> {
        Tensor {
            data: &*self.data,
            shape: self.shape,
        }
    }

    /// The underlying data slice.
    pub fn data(&self) -> &[T] {
        &*self.data
    }

    /// The underlying data slice, mutably.
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut *self.data
    }

    /// The shape triple.
    pub fn shape(&self) -> &Shape<R, O> {
        &self.shape
    }

    /// Number of elements actually bound.
    pub fn value_size(&self) -> usize {
        self.data.len()
    }

    /// Number of elements the shape spans.
    pub fn value_capacity(&self) -> u64 {
        self.shape.capacity()
    }

    /// Whether the bound data exactly covers the shape (and is non-empty).
    pub fn is_valid(&self) -> bool {
        !self.data.is_empty() && self.data.len() as u64 == self.shape.capacity()
    }

    /// Exchange data and shapes with another view.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidTensorLayout`] when either view is invalid.
    pub fn swap(&mut self, other: &mut TensorMut<'a, T, R, O>) -> CoreResult<()> {
        if !self.is_valid() {
            return Err(CoreError::InvalidTensorLayout {
                expected: self.shape.capacity(),
                actual: self.data.len(),
            });
        }
        if !other.is_valid() {
            return Err(CoreError::InvalidTensorLayout {
                expected: other.shape.capacity(),
                actual: other.data.len(),
            });
        }
        std::mem::swap(&mut self.data, &mut other.data);
        std::mem::swap(&mut self.shape, &mut other.shape);
        Ok(())
    }
}

impl<'a, T: Element, const R: usize, O: MemoryOrder> TensorMut<'a, T, R, O> {
    /// Read the element at `coord`. See [`Tensor::get_value`].
    pub fn get_value(&self, coord: &[Size; R]) -> T {
        self.data[self.shape.index(coord) as usize]
    }

    /// Write `value` at `coord`.
    ///
    /// Unchecked against the axis sizes, like [`Tensor::get_value`].
    pub fn set_value(&mut self, value: T, coord: &[Size; R]) {
        self.data[self.shape.index(coord) as usize] = value;
    }

    /// Write `value` at `coord` without any bounds check.
    ///
    /// # Safety
    ///
    /// The view must be valid and every coordinate below its axis size.
    pub unsafe fn set_value_unchecked(&mut self, value: T, coord: &[Size; R]) {
        let offset = self.shape.index(coord) as usize;
        debug_assert!(offset < self.data.len());
        *self.data.get_unchecked_mut(offset) = value;
    }

    /// Copy every element of `src` into this view, coordinate-wise.
    ///
    /// Respects both layouts, so a permuted source materializes into this
    /// view's order.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidTensorLayout`] when either view is invalid;
    /// [`CoreError::CapacityMismatch`] when element counts differ.
    pub fn copy_from(&mut self, src: &Tensor<'_, T, R, O>) -> CoreResult<()> {
        if !src.is_valid() {
            return Err(CoreError::InvalidTensorLayout {
                expected: src.shape().capacity(),
                actual: src.value_size(),
            });
        }
        if !self.is_valid() {
            return Err(CoreError::InvalidTensorLayout {
                expected: self.shape.capacity(),
                actual: self.data.len(),
            });
        }
        if self.shape.capacity() != src.shape().capacity() {
            return Err(CoreError::CapacityMismatch {
                expected: self.shape.capacity(),
                actual: src.shape().capacity(),
            });
        }

        let mut coord = [0 as Size; R];
        loop {
            self.set_value(src.get_value(&coord), &coord);
            // Odometer over the shared sizes, last axis fastest.
            let mut axis = R;
            loop {
                if axis == 0 {
                    return Ok(());
                }
                axis -= 1;
                coord[axis] += 1;
                if coord[axis] < self.shape.size(axis) {
                    break;
                }
                coord[axis] = 0;
            }
        }
    }
}

fn parse_permutation<const R: usize>(expr: &str) -> CoreResult<PermutationPlan<R>> {
    try_permutate_parse::<R>(expr).map_err(|e| match e {
        PlanError::RankMismatch { expected, actual } => {
            CoreError::RankMismatch { expected, actual }
        }
        other => CoreError::InvalidPermutation(other),
    })
}

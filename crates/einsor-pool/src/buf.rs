//! Owning tensor buffers
//!
//! [`TensorBuf`] is the one owning tensor type in the stack: storage plus a
//! shape. Pool-backed buffers deposit their storage into the originating
//! [`LinearCache`](crate::LinearCache) on drop, so short-lived intermediates
//! recycle instead of churning the system allocator. All computation still
//! happens through the borrowed views ([`view`](TensorBuf::view) /
//! [`view_mut`](TensorBuf::view_mut)).

use crate::cache::LinearCache;
use crate::error::{FactoryError, FactoryResult, PoolError};
use einsor_core::{Element, MemoryOrder, Shape, Size, Tensor, TensorMut};
use std::sync::Arc;

/// Owning tensor: data, shape, and an optional pool to return the data to.
#[derive(Debug)]
pub struct TensorBuf<T: Element, const R: usize, O: MemoryOrder> {
    pub(crate) data: Vec<T>,
    pub(crate) shape: Shape<R, O>,
    pub(crate) pool: Option<Arc<LinearCache<T>>>,
}

impl<T: Element, const R: usize, O: MemoryOrder> TensorBuf<T, R, O> {
    /// Heap-backed zero-filled tensor (no pool involved).
    ///
    /// # Examples
    ///
    /// ```
    /// use einsor_core::RowMajor;
    /// use einsor_pool::TensorBuf;
    ///
    /// let t = TensorBuf::<f32, 2, RowMajor>::zeros([3, 4]).unwrap();
    /// assert_eq!(t.view().value_capacity(), 12);
    /// ```
    pub fn zeros(sizes: [Size; R]) -> FactoryResult<Self> {
        Self::filled(sizes, T::zero())
    }

    /// Heap-backed constant-filled tensor.
    pub fn filled(sizes: [Size; R], value: T) -> FactoryResult<Self> {
        let shape = Shape::<R, O>::from_sizes(sizes);
        let capacity = shape.checked_capacity().map_err(FactoryError::Core)?;
        if capacity == 0 {
            return Err(FactoryError::Pool(PoolError::TensorSizeZero));
        }
        Ok(Self {
            data: vec![value; capacity as usize],
            shape,
            pool: None,
        })
    }

    /// Heap-backed tensor adopting an existing vector.
    ///
    /// # Errors
    ///
    /// [`PoolError::AllocSizeMismatch`](crate::PoolError::AllocSizeMismatch)
    /// when the vector length disagrees with the size product (or is zero).
    pub fn from_vec(data: Vec<T>, sizes: [Size; R]) -> FactoryResult<Self> {
        let shape = Shape::<R, O>::from_sizes(sizes);
        let capacity = shape.checked_capacity().map_err(FactoryError::Core)? as u64;
        if data.len() as u64 != capacity || data.is_empty() {
            return Err(FactoryError::Pool(PoolError::AllocSizeMismatch {
                expected: capacity,
                actual: data.len(),
            }));
        }
        Ok(Self {
            data,
            shape,
            pool: None,
        })
    }

    /// Pool-backed buffer; storage returns to `pool` on drop.
    pub(crate) fn from_pool(data: Vec<T>, shape: Shape<R, O>, pool: Arc<LinearCache<T>>) -> Self {
        Self {
            data,
            shape,
            pool: Some(pool),
        }
    }

    /// Borrow as an immutable view.
    pub fn view(&self) -> Tensor<'_, T, R, O> {
        Tensor::from_parts(&self.data, self.shape)
    }

    /// Borrow as a mutable view.
    pub fn view_mut(&mut self) -> TensorMut<'_, T, R, O> {
        TensorMut::from_parts(&mut self.data, self.shape)
    }

    /// The shape triple.
    pub fn shape(&self) -> &Shape<R, O> {
        &self.shape
    }

    /// The underlying storage.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Read the element at `coord`.
    pub fn get_value(&self, coord: &[Size; R]) -> T {
        self.data[self.shape.index(coord) as usize]
    }

    /// Write `value` at `coord`.
    pub fn set_value(&mut self, value: T, coord: &[Size; R]) {
        let offset = self.shape.index(coord) as usize;
        self.data[offset] = value;
    }

    /// Whether this buffer came from a pool.
    pub fn is_pooled(&self) -> bool {
        self.pool.is_some()
    }

    /// Detach the storage, bypassing the pool deposit.
    pub fn into_data(mut self) -> Vec<T> {
        self.pool = None;
        std::mem::take(&mut self.data)
    }
}

impl<T: Element, const R: usize, O: MemoryOrder> Drop for TensorBuf<T, R, O> {
    fn drop(&mut self) {
        if let Some(pool) = self.pool.take() {
            pool.free(std::mem::take(&mut self.data));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use einsor_core::RowMajor;

    #[test]
    fn test_zeros_and_filled() {
        let t = TensorBuf::<i32, 2, RowMajor>::zeros([2, 3]).unwrap();
        assert!(t.view().is_valid());
        assert!(t.data().iter().all(|&v| v == 0));
        assert!(!t.is_pooled());

        let t = TensorBuf::<i32, 2, RowMajor>::filled([2, 3], 9).unwrap();
        assert_eq!(t.get_value(&[1, 2]), 9);
    }

    #[test]
    fn test_from_vec_validates() {
        let err = TensorBuf::<i32, 2, RowMajor>::from_vec(vec![1, 2, 3], [2, 2]).unwrap_err();
        assert!(matches!(
            err,
            FactoryError::Pool(PoolError::AllocSizeMismatch {
                expected: 4,
                actual: 3
            })
        ));

        let t = TensorBuf::<i32, 2, RowMajor>::from_vec(vec![1, 2, 3, 4], [2, 2]).unwrap();
        assert_eq!(t.get_value(&[1, 1]), 4);
    }

    #[test]
    fn test_drop_deposits_into_pool() {
        let pool = Arc::new(LinearCache::<i64>::new());
        {
            let data = pool.alloc(8).unwrap();
            let shape = Shape::<1, RowMajor>::from_sizes([8]);
            let _buf = TensorBuf::from_pool(data, shape, Arc::clone(&pool));
        }
        assert_eq!(pool.parked_count(), 1);
    }

    #[test]
    fn test_into_data_skips_deposit() {
        let pool = Arc::new(LinearCache::<i64>::new());
        let data = pool.alloc(8).unwrap();
        let shape = Shape::<1, RowMajor>::from_sizes([8]);
        let buf = TensorBuf::from_pool(data, shape, Arc::clone(&pool));

        let v = buf.into_data();
        assert_eq!(v.len(), 8);
        assert_eq!(pool.parked_count(), 0);
    }

    #[test]
    fn test_views_share_storage() {
        let mut t = TensorBuf::<i32, 2, RowMajor>::zeros([2, 2]).unwrap();
        t.set_value(5, &[0, 1]);
        assert_eq!(t.view().get_value(&[0, 1]), 5);

        {
            let mut vm = t.view_mut();
            vm.set_value(6, &[1, 0]);
        }
        assert_eq!(t.get_value(&[1, 0]), 6);
    }
}

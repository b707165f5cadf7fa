//! Tensor factory: typed allocation and kernel composition
//!
//! The factory owns a shared [`LinearCache`], allocates result tensors of
//! the correct rank for plan-driven kernels, and optionally tracks a
//! scope's allocations so their cached storage can be reclaimed in bulk.

use crate::buf::TensorBuf;
use crate::cache::LinearCache;
use crate::error::{FactoryError, FactoryResult, PoolError};
use einsor_core::{Element, MemoryOrder, Shape, Size, Tensor};
use einsor_kernels as kernels;
use einsor_kernels::{AbsValue, KernelError};
use einsor_planner::{ContractionPlan, InnerProductPlan, PASS, TRIP_FROM_X};
use smallvec::SmallVec;
use std::sync::Arc;

/// Recording state for the factory's tracking list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackingMode {
    /// Not recording; tracked blocks have been released
    #[default]
    Free,
    /// Recording every produced allocation
    Start,
    /// Recording paused; the list is retained
    Stop,
}

/// Typed tensor factory over a caching allocator.
///
/// # Examples
///
/// ```
/// use einsor_core::RowMajor;
/// use einsor_kernels::sum;
/// use einsor_pool::TensorFactory;
///
/// let mut factory = TensorFactory::<i64>::new();
/// let x = factory.alloc_tensor::<1, RowMajor>([1000]).unwrap();
/// assert_eq!(sum(&x.view()).unwrap(), 0);
/// ```
pub struct TensorFactory<T: Element> {
    cache: Arc<LinearCache<T>>,
    tracked: SmallVec<[(usize, usize); 16]>,
    mode: TrackingMode,
}

impl<T: Element> TensorFactory<T> {
    /// A factory over a fresh private cache.
    pub fn new() -> Self {
        Self::with_cache(Arc::new(LinearCache::new()))
    }

    /// A factory over a shared cache (e.g. from a
    /// [`CacheRegistry`](crate::CacheRegistry) slot).
    pub fn with_cache(cache: Arc<LinearCache<T>>) -> Self {
        Self {
            cache,
            tracked: SmallVec::new(),
            mode: TrackingMode::Free,
        }
    }

    /// The factory's cache handle.
    pub fn cache(&self) -> &Arc<LinearCache<T>> {
        &self.cache
    }

    /// Current tracking mode.
    pub fn tracking_mode(&self) -> TrackingMode {
        self.mode
    }

    /// Number of allocations currently on the tracking list.
    pub fn tracked_count(&self) -> usize {
        self.tracked.len()
    }

    /// Transition the tracking mode.
    ///
    /// Entering `Free` releases every tracked block that has returned to
    /// the cache out to the system allocator and clears the list; moving
    /// between `Start` and `Stop` toggles recording without releasing.
    pub fn set_tracking_mode(&mut self, target: TrackingMode) {
        use TrackingMode::*;
        match (self.mode, target) {
            (Free, Start) => self.mode = Start,
            (Free, Stop) | (Free, Free) => {}
            (Start, Stop) => self.mode = Stop,
            (Stop, Start) => self.mode = Start,
            (Start, Free) | (Stop, Free) => {
                self.cache.release_blocks(&self.tracked);
                self.tracked.clear();
                self.mode = Free;
            }
            (Start, Start) | (Stop, Stop) => {}
        }
    }

    fn alloc_data(&mut self, n: usize) -> FactoryResult<Vec<T>> {
        let data = self.cache.alloc(n).map_err(FactoryError::Pool)?;
        if self.mode == TrackingMode::Start {
            self.tracked.push((data.capacity(), data.as_ptr() as usize));
        }
        Ok(data)
    }

    /// Allocate a zero-filled tensor of the given sizes.
    pub fn alloc_tensor<const R: usize, O: MemoryOrder>(
        &mut self,
        sizes: [Size; R],
    ) -> FactoryResult<TensorBuf<T, R, O>> {
        let shape = Shape::<R, O>::from_sizes(sizes);
        let capacity = shape.checked_capacity().map_err(FactoryError::Core)?;
        if capacity == 0 {
            return Err(FactoryError::Pool(PoolError::TensorSizeZero));
        }
        let data = self.alloc_data(capacity as usize)?;
        Ok(TensorBuf::from_pool(data, shape, Arc::clone(&self.cache)))
    }

    /// Bind storage for a view declared without data.
    ///
    /// # Errors
    ///
    /// [`PoolError::TensorHasAlloc`] when the view already has data.
    pub fn alloc_to_tensor<const R: usize, O: MemoryOrder>(
        &mut self,
        view: &Tensor<'_, T, R, O>,
    ) -> FactoryResult<TensorBuf<T, R, O>> {
        if view.value_size() != 0 {
            return Err(FactoryError::Pool(PoolError::TensorHasAlloc));
        }
        self.alloc_tensor(*view.shape().sizes())
    }

    /// Return a tensor's storage to this factory's cache now.
    ///
    /// Dropping the buffer does the same implicitly; this form verifies
    /// ownership.
    ///
    /// # Errors
    ///
    /// [`PoolError::WrongAllocator`] when the buffer is heap-backed or came
    /// from a different cache. The buffer is consumed either way; on error
    /// its storage still returns to wherever it came from.
    pub fn free_from_tensor<const R: usize, O: MemoryOrder>(
        &mut self,
        buf: TensorBuf<T, R, O>,
    ) -> FactoryResult<()> {
        let owned = match &buf.pool {
            Some(pool) => Arc::ptr_eq(pool, &self.cache),
            None => false,
        };
        if !owned {
            return Err(FactoryError::Pool(PoolError::WrongAllocator));
        }
        drop(buf);
        Ok(())
    }

    /// Allocate a tensor holding a copy of `x` (materialized into this
    /// factory's canonical layout).
    pub fn copy_tensor<const R: usize, O: MemoryOrder>(
        &mut self,
        x: &Tensor<'_, T, R, O>,
    ) -> FactoryResult<TensorBuf<T, R, O>> {
        let mut buf = self.alloc_tensor(*x.shape().sizes())?;
        buf.view_mut().copy_from(x).map_err(FactoryError::Core)?;
        Ok(buf)
    }

    /// `x + y`, allocating the result.
    pub fn add<const R: usize, O: MemoryOrder>(
        &mut self,
        x: &Tensor<'_, T, R, O>,
        y: &Tensor<'_, T, R, O>,
    ) -> FactoryResult<TensorBuf<T, R, O>> {
        let mut buf = self.alloc_tensor(*x.shape().sizes())?;
        kernels::add(x, y, &mut buf.view_mut()).map_err(FactoryError::Kernel)?;
        Ok(buf)
    }

    /// `x - y`, allocating the result.
    pub fn sub<const R: usize, O: MemoryOrder>(
        &mut self,
        x: &Tensor<'_, T, R, O>,
        y: &Tensor<'_, T, R, O>,
    ) -> FactoryResult<TensorBuf<T, R, O>> {
        let mut buf = self.alloc_tensor(*x.shape().sizes())?;
        kernels::sub(x, y, &mut buf.view_mut()).map_err(FactoryError::Kernel)?;
        Ok(buf)
    }

    /// `x ⊙ y` (Hadamard), allocating the result.
    pub fn mul<const R: usize, O: MemoryOrder>(
        &mut self,
        x: &Tensor<'_, T, R, O>,
        y: &Tensor<'_, T, R, O>,
    ) -> FactoryResult<TensorBuf<T, R, O>> {
        let mut buf = self.alloc_tensor(*x.shape().sizes())?;
        kernels::mul(x, y, &mut buf.view_mut()).map_err(FactoryError::Kernel)?;
        Ok(buf)
    }

    /// `x * s`, allocating the result.
    pub fn scale<const R: usize, O: MemoryOrder>(
        &mut self,
        x: &Tensor<'_, T, R, O>,
        s: T,
    ) -> FactoryResult<TensorBuf<T, R, O>> {
        let mut buf = self.alloc_tensor(*x.shape().sizes())?;
        kernels::scale(x, &mut buf.view_mut(), s).map_err(FactoryError::Kernel)?;
        Ok(buf)
    }

    /// `x + s`, allocating the result.
    pub fn bias<const R: usize, O: MemoryOrder>(
        &mut self,
        x: &Tensor<'_, T, R, O>,
        s: T,
    ) -> FactoryResult<TensorBuf<T, R, O>> {
        let mut buf = self.alloc_tensor(*x.shape().sizes())?;
        kernels::bias(x, &mut buf.view_mut(), s).map_err(FactoryError::Kernel)?;
        Ok(buf)
    }

    /// `|x|`, allocating the result.
    pub fn abs<const R: usize, O: MemoryOrder>(
        &mut self,
        x: &Tensor<'_, T, R, O>,
    ) -> FactoryResult<TensorBuf<T, R, O>>
    where
        T: AbsValue,
    {
        let mut buf = self.alloc_tensor(*x.shape().sizes())?;
        kernels::abs(x, &mut buf.view_mut()).map_err(FactoryError::Kernel)?;
        Ok(buf)
    }

    /// Contract `x` per `plan`, allocating the rank-`YR` result.
    ///
    /// Result sizes come from the plan's result-carrying pairs:
    /// `z.sizes[plan.rhs[m]] = x.sizes[plan.lhs[m]]`.
    pub fn contraction<const XR: usize, const YR: usize, O: MemoryOrder>(
        &mut self,
        plan: &ContractionPlan<XR, YR>,
        x: &Tensor<'_, T, XR, O>,
    ) -> FactoryResult<TensorBuf<T, YR, O>> {
        const {
            assert!(YR <= XR, "contraction result rank cannot exceed the source rank");
        }
        let mut sizes = [0 as Size; YR];
        for m in 0..YR {
            let src = plan.lhs[m] as usize;
            let dst = plan.rhs[m] as usize;
            if src >= XR || dst >= YR {
                return Err(FactoryError::Kernel(KernelError::InvalidDimensions {
                    context: "plan names an axis beyond the operand rank",
                }));
            }
            sizes[dst] = x.shape().size(src);
        }
        let mut buf = self.alloc_tensor(sizes)?;
        kernels::contraction(plan, x, &mut buf.view_mut()).map_err(FactoryError::Kernel)?;
        Ok(buf)
    }

    /// Generalized inner product per `plan`, allocating the rank-`ZR`
    /// result (sizes from the plan's level trip counts).
    pub fn inner_product<const XR: usize, const YR: usize, const ZR: usize, O: MemoryOrder>(
        &mut self,
        plan: &InnerProductPlan<XR, YR, ZR>,
        x: &Tensor<'_, T, XR, O>,
        y: &Tensor<'_, T, YR, O>,
    ) -> FactoryResult<TensorBuf<T, ZR, O>> {
        let sizes = self.product_result_sizes(plan, x, y)?;
        let mut buf = self.alloc_tensor(sizes)?;
        kernels::inner_product(plan, x, y, &mut buf.view_mut()).map_err(FactoryError::Kernel)?;
        Ok(buf)
    }

    /// Generalized outer product per `plan`, allocating the result.
    pub fn outer_product<const XR: usize, const YR: usize, const ZR: usize, O: MemoryOrder>(
        &mut self,
        plan: &InnerProductPlan<XR, YR, ZR>,
        x: &Tensor<'_, T, XR, O>,
        y: &Tensor<'_, T, YR, O>,
    ) -> FactoryResult<TensorBuf<T, ZR, O>> {
        let sizes = self.product_result_sizes(plan, x, y)?;
        let mut buf = self.alloc_tensor(sizes)?;
        kernels::outer_product(plan, x, y, &mut buf.view_mut()).map_err(FactoryError::Kernel)?;
        Ok(buf)
    }

    fn product_result_sizes<const XR: usize, const YR: usize, const ZR: usize, O: MemoryOrder>(
        &self,
        plan: &InnerProductPlan<XR, YR, ZR>,
        x: &Tensor<'_, T, XR, O>,
        y: &Tensor<'_, T, YR, O>,
    ) -> FactoryResult<[Size; ZR]> {
        let mut sizes = [0 as Size; ZR];
        for level in 0..plan.levels {
            let za = plan.z_axes[level];
            if za == PASS {
                continue;
            }
            if za as usize >= ZR {
                return Err(FactoryError::Kernel(KernelError::InvalidDimensions {
                    context: "plan names an axis beyond the destination rank",
                }));
            }
            let trip = if plan.trip_from[level] == TRIP_FROM_X {
                let xa = plan.x_axes[level];
                if xa == PASS || xa as usize >= XR {
                    return Err(FactoryError::Kernel(KernelError::InvalidDimensions {
                        context: "trip count drawn from an operand that skips the level",
                    }));
                }
                x.shape().size(xa as usize)
            } else {
                let ya = plan.y_axes[level];
                if ya == PASS || ya as usize >= YR {
                    return Err(FactoryError::Kernel(KernelError::InvalidDimensions {
                        context: "trip count drawn from an operand that skips the level",
                    }));
                }
                y.shape().size(ya as usize)
            };
            sizes[za as usize] = trip;
        }
        Ok(sizes)
    }
}

impl<T: Element> Default for TensorFactory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element> Drop for TensorFactory<T> {
    fn drop(&mut self) {
        self.set_tracking_mode(TrackingMode::Free);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use einsor_core::RowMajor;
    use einsor_kernels::sum;
    use einsor_planner::{contraction_parse, inner_product_parse};

    #[test]
    fn test_alloc_tensor_zeroed() {
        let mut factory = TensorFactory::<i32>::new();
        let t = factory.alloc_tensor::<2, RowMajor>([4, 5]).unwrap();
        assert!(t.view().is_valid());
        assert_eq!(sum(&t.view()).unwrap(), 0);
        assert!(t.is_pooled());
    }

    #[test]
    fn test_alloc_zero_sized_rejected() {
        let mut factory = TensorFactory::<i32>::new();
        assert!(matches!(
            factory.alloc_tensor::<2, RowMajor>([4, 0]),
            Err(FactoryError::Pool(PoolError::TensorSizeZero))
        ));
    }

    #[test]
    fn test_alloc_to_tensor_binds_unbound_views() {
        let mut factory = TensorFactory::<i32>::new();
        let declared = Tensor::<i32, 2, RowMajor>::unbound([3, 4]);
        let bound = factory.alloc_to_tensor(&declared).unwrap();
        assert!(bound.view().is_valid());
        assert_eq!(bound.view().value_capacity(), 12);

        let data = vec![1i32; 4];
        let already = Tensor::<i32, 2, RowMajor>::new(&data, [2, 2]).unwrap();
        assert!(matches!(
            factory.alloc_to_tensor(&already),
            Err(FactoryError::Pool(PoolError::TensorHasAlloc))
        ));
    }

    #[test]
    fn test_free_from_tensor_checks_ownership() {
        let mut factory = TensorFactory::<i32>::new();
        let t = factory.alloc_tensor::<1, RowMajor>([16]).unwrap();
        factory.free_from_tensor(t).unwrap();
        assert_eq!(factory.cache().parked_count(), 1);

        let mut other = TensorFactory::<i32>::new();
        let foreign = other.alloc_tensor::<1, RowMajor>([16]).unwrap();
        assert!(matches!(
            factory.free_from_tensor(foreign),
            Err(FactoryError::Pool(PoolError::WrongAllocator))
        ));

        let heap = TensorBuf::<i32, 1, RowMajor>::zeros([16]).unwrap();
        assert!(matches!(
            factory.free_from_tensor(heap),
            Err(FactoryError::Pool(PoolError::WrongAllocator))
        ));
    }

    #[test]
    fn test_copy_tensor_materializes_permutation() {
        let mut factory = TensorFactory::<i32>::new();
        let data: Vec<i32> = (1..=6).collect();
        let x = Tensor::<i32, 2, RowMajor>::new(&data, [2, 3]).unwrap();
        let xt = x.permutate("ij->ji").unwrap();

        let copied = factory.copy_tensor(&xt).unwrap();
        assert_eq!(copied.shape().sizes(), &[3, 2]);
        assert_eq!(copied.data(), &[1, 4, 2, 5, 3, 6]);
    }

    #[test]
    fn test_factory_contraction_types_result() {
        let mut factory = TensorFactory::<i32>::new();
        let data: Vec<i32> = (1..=6).collect();
        let x = Tensor::<i32, 2, RowMajor>::new(&data, [2, 3]).unwrap();

        let z = factory.contraction(&contraction_parse("ij->i"), &x).unwrap();
        assert_eq!(z.shape().sizes(), &[2]);
        assert_eq!(z.data(), &[6, 15]);
    }

    #[test]
    fn test_factory_inner_product_types_result() {
        let mut factory = TensorFactory::<i32>::new();
        let a = vec![1i32, 1, 1, 1, 1, 1];
        let b = vec![1i32, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
        let x = Tensor::<i32, 2, RowMajor>::new(&a, [2, 3]).unwrap();
        let y = Tensor::<i32, 2, RowMajor>::new(&b, [3, 4]).unwrap();

        let z = factory
            .inner_product(&inner_product_parse("ij,jk->ik"), &x, &y)
            .unwrap();
        assert_eq!(z.shape().sizes(), &[2, 4]);
        // Column sums of y.
        assert_eq!(z.data(), &[15, 18, 21, 24, 15, 18, 21, 24]);
    }

    #[test]
    fn test_tracking_transitions() {
        let mut factory = TensorFactory::<i64>::new();
        assert_eq!(factory.tracking_mode(), TrackingMode::Free);

        // free -> stop stays free.
        factory.set_tracking_mode(TrackingMode::Stop);
        assert_eq!(factory.tracking_mode(), TrackingMode::Free);

        factory.set_tracking_mode(TrackingMode::Start);
        let a = factory.alloc_tensor::<1, RowMajor>([32]).unwrap();
        let b = factory.alloc_tensor::<1, RowMajor>([64]).unwrap();
        assert_eq!(factory.tracked_count(), 2);

        // start -> stop keeps the list, stops recording.
        factory.set_tracking_mode(TrackingMode::Stop);
        let c = factory.alloc_tensor::<1, RowMajor>([128]).unwrap();
        assert_eq!(factory.tracked_count(), 2);

        // stop -> start resumes recording.
        factory.set_tracking_mode(TrackingMode::Start);
        let d = factory.alloc_tensor::<1, RowMajor>([256]).unwrap();
        assert_eq!(factory.tracked_count(), 3);

        // Return everything to the cache, then release the tracked blocks.
        drop(a);
        drop(b);
        drop(c);
        drop(d);
        assert_eq!(factory.cache().parked_count(), 4);

        factory.set_tracking_mode(TrackingMode::Free);
        assert_eq!(factory.tracked_count(), 0);
        // The untracked 128-block survives; the three tracked ones are gone.
        assert_eq!(factory.cache().parked_count(), 1);
        assert_eq!(factory.cache().block_caps(), vec![128]);
    }
}

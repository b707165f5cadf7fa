//! Bounded registry of caching-allocator instances
//!
//! A process typically wants a small set of shared caches (one per element
//! type or subsystem). The registry hands out `Arc`-shared [`LinearCache`]
//! instances from a bounded slot table; exhausting the table is an explicit
//! error, not a panic, and the capacity is configurable.

use crate::cache::LinearCache;
use crate::error::{PoolError, PoolResult};
use einsor_core::Element;
use parking_lot::Mutex;
use std::sync::Arc;

/// Default number of registry slots.
pub const DEFAULT_REGISTRY_CAPACITY: usize = 100;

/// Bounded slot table of shared [`LinearCache`] instances.
///
/// # Examples
///
/// ```
/// use einsor_pool::CacheRegistry;
///
/// let registry = CacheRegistry::<f32>::with_capacity(2);
/// let (slot, cache) = registry.acquire().unwrap();
/// let _ = cache.alloc(16).unwrap();
///
/// registry.release(slot).unwrap();
/// assert!(registry.release(slot).is_err()); // already freed
/// ```
pub struct CacheRegistry<T: Element> {
    slots: Mutex<Vec<Option<Arc<LinearCache<T>>>>>,
    capacity: usize,
}

impl<T: Element> CacheRegistry<T> {
    /// A registry with [`DEFAULT_REGISTRY_CAPACITY`] slots.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_REGISTRY_CAPACITY)
    }

    /// A registry with a custom slot count.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Mutex::new(Vec::new()),
            capacity,
        }
    }

    /// Claim a slot holding a fresh cache.
    ///
    /// # Errors
    ///
    /// [`PoolError::RegistryFull`] when every slot is occupied.
    pub fn acquire(&self) -> PoolResult<(usize, Arc<LinearCache<T>>)> {
        let mut slots = self.slots.lock();
        if let Some(index) = slots.iter().position(|s| s.is_none()) {
            let cache = Arc::new(LinearCache::new());
            slots[index] = Some(Arc::clone(&cache));
            return Ok((index, cache));
        }
        if slots.len() < self.capacity {
            let cache = Arc::new(LinearCache::new());
            slots.push(Some(Arc::clone(&cache)));
            return Ok((slots.len() - 1, cache));
        }
        Err(PoolError::RegistryFull {
            capacity: self.capacity,
        })
    }

    /// The cache in a slot.
    ///
    /// # Errors
    ///
    /// [`PoolError::InvalidIndex`] for a slot that never existed,
    /// [`PoolError::IndexAlreadyFreed`] for one released earlier.
    pub fn get(&self, index: usize) -> PoolResult<Arc<LinearCache<T>>> {
        let slots = self.slots.lock();
        match slots.get(index) {
            None => Err(PoolError::InvalidIndex { index }),
            Some(None) => Err(PoolError::IndexAlreadyFreed { index }),
            Some(Some(cache)) => Ok(Arc::clone(cache)),
        }
    }

    /// Release a slot.
    ///
    /// The cache itself lives on while anything still holds its `Arc`; its
    /// parked blocks return to the system allocator when the last handle
    /// drops.
    pub fn release(&self, index: usize) -> PoolResult<()> {
        let mut slots = self.slots.lock();
        match slots.get_mut(index) {
            None => Err(PoolError::InvalidIndex { index }),
            Some(slot) => {
                if slot.is_none() {
                    return Err(PoolError::IndexAlreadyFreed { index });
                }
                *slot = None;
                Ok(())
            }
        }
    }

    /// Number of occupied slots.
    pub fn active_count(&self) -> usize {
        self.slots.lock().iter().filter(|s| s.is_some()).count()
    }

    /// Slot capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T: Element> Default for CacheRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_until_full() {
        let registry = CacheRegistry::<i32>::with_capacity(3);
        let (a, _ca) = registry.acquire().unwrap();
        let (b, _cb) = registry.acquire().unwrap();
        let (c, _cc) = registry.acquire().unwrap();
        assert_eq!((a, b, c), (0, 1, 2));
        assert_eq!(
            registry.acquire().unwrap_err(),
            PoolError::RegistryFull { capacity: 3 }
        );
    }

    #[test]
    fn test_release_reopens_slot() {
        let registry = CacheRegistry::<i32>::with_capacity(2);
        let (a, _ca) = registry.acquire().unwrap();
        let (_b, _cb) = registry.acquire().unwrap();

        registry.release(a).unwrap();
        assert_eq!(registry.active_count(), 1);

        let (again, _c) = registry.acquire().unwrap();
        assert_eq!(again, a);
    }

    #[test]
    fn test_index_errors() {
        let registry = CacheRegistry::<i32>::with_capacity(2);
        let (a, _c) = registry.acquire().unwrap();

        assert_eq!(
            registry.release(9),
            Err(PoolError::InvalidIndex { index: 9 })
        );
        registry.release(a).unwrap();
        assert_eq!(
            registry.release(a),
            Err(PoolError::IndexAlreadyFreed { index: a })
        );
        assert_eq!(
            registry.get(a),
            Err(PoolError::IndexAlreadyFreed { index: a })
        );
    }
}

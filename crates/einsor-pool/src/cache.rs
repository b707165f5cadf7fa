//! Linear caching allocator
//!
//! A size-ordered free list sitting above the system allocator. Blocks are
//! `Vec<T>` storage keyed by capacity and heap address; the list stays
//! weakly sorted by capacity at all times, so lookups are a binary search
//! for the lower bound plus a short forward scan. A request may only absorb
//! a block up to twice its size, which bounds the waste per hit.
//!
//! Every method serializes on one internal mutex; see the concurrency notes
//! in the crate root.

use crate::error::{PoolError, PoolResult};
use einsor_core::Element;
use parking_lot::Mutex;

#[derive(Debug)]
struct Block<T> {
    cap: usize,
    addr: usize,
    parked: Option<Vec<T>>,
}

/// Size-ordered caching allocator over `Vec<T>` blocks.
///
/// # Examples
///
/// ```
/// use einsor_pool::LinearCache;
///
/// let cache = LinearCache::<i64>::new();
/// let a = cache.alloc(100).unwrap();
/// let addr = a.as_ptr() as usize;
/// cache.free(a);
///
/// // Same size comes back from the cache, same storage.
/// let b = cache.alloc(100).unwrap();
/// assert_eq!(b.as_ptr() as usize, addr);
/// ```
#[derive(Debug)]
pub struct LinearCache<T: Element> {
    blocks: Mutex<Vec<Block<T>>>,
}

impl<T: Element> PartialEq for LinearCache<T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl<T: Element> Default for LinearCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element> LinearCache<T> {
    /// An empty cache.
    pub fn new() -> Self {
        Self {
            blocks: Mutex::new(Vec::new()),
        }
    }

    /// Allocate `n` elements, zero-filled.
    ///
    /// Scans parked blocks with capacity in `[n, 2n]`; on a miss the block
    /// comes fresh from the system allocator (and is only adopted into the
    /// cache when it is later freed).
    ///
    /// # Errors
    ///
    /// [`PoolError::TensorSizeZero`] for `n == 0`.
    pub fn alloc(&self, n: usize) -> PoolResult<Vec<T>> {
        if n == 0 {
            return Err(PoolError::TensorSizeZero);
        }

        let mut blocks = self.blocks.lock();
        let start = blocks.partition_point(|b| b.cap < n);
        let mut i = start;
        while i < blocks.len() && blocks[i].cap <= 2 * n {
            if let Some(mut v) = blocks[i].parked.take() {
                v.clear();
                v.resize(n, T::zero());
                return Ok(v);
            }
            i += 1;
        }
        drop(blocks);

        Ok(vec![T::zero(); n])
    }

    /// Deposit a block back into the cache.
    ///
    /// Known storage (handed out by [`alloc`](Self::alloc) from a parked
    /// block) is re-parked in place; unknown storage is inserted at its
    /// capacity-ordered index, growing the cache by one block.
    pub fn free(&self, buf: Vec<T>) {
        if buf.capacity() == 0 {
            return;
        }
        let cap = buf.capacity();
        let addr = buf.as_ptr() as usize;

        let mut blocks = self.blocks.lock();
        let start = blocks.partition_point(|b| b.cap < cap);
        let mut i = start;
        while i < blocks.len() && blocks[i].cap == cap {
            if blocks[i].parked.is_none() && blocks[i].addr == addr {
                blocks[i].parked = Some(buf);
                return;
            }
            i += 1;
        }
        blocks.insert(start, Block {
            cap,
            addr,
            parked: Some(buf),
        });
    }

    /// Resize a block in place when its capacity allows it.
    ///
    /// Returns `true` on an in-place resize (the address is preserved and
    /// new elements are zeroed), `false` when the caller must reallocate.
    ///
    /// # Errors
    ///
    /// [`PoolError::TensorSizeZero`] for `new_len == 0`.
    pub fn resize(&self, buf: &mut Vec<T>, new_len: usize) -> PoolResult<bool> {
        if new_len == 0 {
            return Err(PoolError::TensorSizeZero);
        }
        if new_len > buf.capacity() {
            return Ok(false);
        }
        if new_len <= buf.len() {
            buf.truncate(new_len);
        } else {
            buf.resize(new_len, T::zero());
        }
        Ok(true)
    }

    /// Release every parked block to the system allocator.
    ///
    /// Storage currently handed out is unaffected; it rejoins the cache
    /// when freed.
    pub fn clear(&self) {
        let mut blocks = self.blocks.lock();
        blocks.retain(|b| b.parked.is_none());
    }

    /// Prewarm the cache with one parked block per requested size.
    ///
    /// # Errors
    ///
    /// [`PoolError::TensorSizeZero`] when any size is zero; blocks added
    /// before the offending entry stay cached.
    pub fn add_to_cache(&self, sizes: &[usize]) -> PoolResult<()> {
        for &n in sizes {
            if n == 0 {
                return Err(PoolError::TensorSizeZero);
            }
            let buf: Vec<T> = Vec::with_capacity(n);
            let cap = buf.capacity();
            let addr = buf.as_ptr() as usize;

            let mut blocks = self.blocks.lock();
            let start = blocks.partition_point(|b| b.cap < cap);
            blocks.insert(start, Block {
                cap,
                addr,
                parked: Some(buf),
            });
        }
        Ok(())
    }

    /// Number of blocks the cache knows about (parked or handed out).
    pub fn block_count(&self) -> usize {
        self.blocks.lock().len()
    }

    /// Number of parked blocks.
    pub fn parked_count(&self) -> usize {
        self.blocks.lock().iter().filter(|b| b.parked.is_some()).count()
    }

    /// Capacities of every known block, in list order.
    ///
    /// The list is weakly sorted; tests assert the invariant through this.
    pub fn block_caps(&self) -> Vec<usize> {
        self.blocks.lock().iter().map(|b| b.cap).collect()
    }

    /// Drop specific parked blocks (identified by capacity and address) to
    /// the system allocator.
    pub(crate) fn release_blocks(&self, ids: &[(usize, usize)]) {
        let mut blocks = self.blocks.lock();
        blocks.retain(|b| b.parked.is_none() || !ids.contains(&(b.cap, b.addr)));
    }
}

//! Victim cache: a pool of recently freed base-array buffers.
//!
//! Freed buffers are parked here keyed by their byte size instead of going
//! straight back to the system allocator; a later allocation of exactly the
//! same size detaches a parked buffer instead of asking the allocator again.
//! Array programs allocate and free same-shaped temporaries constantly, so
//! the hit rate is high in practice.
//!
//! Capacity is a configured slot count; zero disables the cache and every
//! request goes directly to the system allocator. Within the pool the policy
//! is LRU: the oldest parked buffer is released to the system when parking a
//! new one would exceed capacity.

use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::collections::VecDeque;
use std::ptr::NonNull;

use log::debug;

use crate::array::BaseArray;
use crate::errors::EngineError;

/// Alignment of every buffer, large enough for the widest element type
/// (complex128).
const BUFFER_ALIGN: usize = 16;

/// An owned, zero-initialized, 16-byte-aligned allocation.
#[derive(Debug)]
pub struct Buffer {
    ptr: NonNull<u8>,
    bytes: usize,
}

// The buffer is an exclusive owner of its allocation; the engine itself is
// single-threaded but batches may be prepared on another thread.
unsafe impl Send for Buffer {}

impl Buffer {
    /// Allocates `bytes` zeroed bytes from the system allocator.
    pub fn alloc(bytes: usize) -> Result<Self, EngineError> {
        let size = bytes.max(1);
        let layout = Layout::from_size_align(size, BUFFER_ALIGN)
            .map_err(|_| EngineError::OutOfMemory { bytes })?;
        let ptr = unsafe { alloc_zeroed(layout) };
        match NonNull::new(ptr) {
            Some(ptr) => Ok(Self { ptr, bytes }),
            None => Err(EngineError::OutOfMemory { bytes }),
        }
    }

    pub fn as_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    pub fn len(&self) -> usize {
        self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.bytes == 0
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        let layout = Layout::from_size_align(self.bytes.max(1), BUFFER_ALIGN).unwrap();
        unsafe { dealloc(self.ptr.as_ptr(), layout) };
    }
}

/// Size-keyed LRU pool of freed buffers.
#[derive(Debug, Default)]
pub struct VictimCache {
    capacity: usize,
    slots: VecDeque<Buffer>,
    hits: u64,
    misses: u64,
    stores: u64,
}

impl VictimCache {
    /// Creates a cache holding at most `capacity` buffers; zero disables it.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            slots: VecDeque::with_capacity(capacity),
            hits: 0,
            misses: 0,
            stores: 0,
        }
    }

    /// Ensures the base has a realized buffer.
    ///
    /// A parked buffer of exactly the base's byte size is reused when
    /// available; otherwise a fresh allocation is made. Already-allocated
    /// bases are left untouched.
    pub fn malloc_base(&mut self, base: &mut BaseArray) -> Result<(), EngineError> {
        if base.is_allocated() {
            return Ok(());
        }
        let bytes = base.nbytes();
        if let Some(pos) = self.slots.iter().position(|b| b.len() == bytes) {
            self.hits += 1;
            let buf = self.slots.remove(pos).unwrap();
            base.attach(buf);
            return Ok(());
        }
        self.misses += 1;
        base.attach(Buffer::alloc(bytes)?);
        Ok(())
    }

    /// Detaches the base's buffer, parking it in the cache when capacity
    /// remains (evicting the oldest parked buffer when it does not).
    ///
    /// Unallocated bases are a no-op; whether freeing such a base is legal is
    /// the engine's call, made against its allocated-base tracking.
    pub fn free_base(&mut self, base: &mut BaseArray) {
        let Some(buf) = base.detach() else {
            return;
        };
        if self.capacity == 0 {
            return; // Cache disabled, drop to the system allocator.
        }
        if self.slots.len() == self.capacity {
            self.slots.pop_front();
        }
        self.stores += 1;
        self.slots.push_back(buf);
    }

    /// Releases every parked buffer to the system allocator.
    pub fn clear(&mut self) {
        debug!(
            "vcache: {} hits, {} misses, {} stores, {} resident at clear",
            self.hits,
            self.misses,
            self.stores,
            self.slots.len()
        );
        self.slots.clear();
    }

    pub fn resident(&self) -> usize {
        self.slots.len()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

impl Drop for VictimCache {
    fn drop(&mut self) {
        self.clear();
    }
}

//! Lock-free pool of reusable serialization buffers.
//!
//! Every conversion call borrows one `BytesMut` for its duration and hands
//! it back on exit. Buffers are created lazily on a miss; returned buffers
//! keep their capacity so a warmed-up pool stops allocating.
//!
//! ```ignore
//! let pool = BufferPool::new(64, 4096, 4 << 20);
//! {
//!     let mut buf = pool.acquire();
//!     buf.extend_from_slice(b"payload");
//! } // cleared and returned here
//! ```

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use bytes::BytesMut;
use crossbeam::queue::ArrayQueue;

pub const DEFAULT_POOL_SIZE: usize = 64;
pub const DEFAULT_BUFFER_CAPACITY: usize = 4096;
pub const DEFAULT_MAX_RETAINED_CAPACITY: usize = 4 * 1024 * 1024;

/// Pool counters. Relaxed ordering: these are observations, not synchronization.
#[derive(Debug, Default)]
pub struct BufferPoolMetrics {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub returns: AtomicU64,
    pub drops: AtomicU64,
}

impl BufferPoolMetrics {
    pub const fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            returns: AtomicU64::new(0),
            drops: AtomicU64::new(0),
        }
    }

    #[inline]
    fn record(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            returns: self.returns.load(Ordering::Relaxed),
            drops: self.drops.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`BufferPoolMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub returns: u64,
    pub drops: u64,
}

impl MetricsSnapshot {
    /// Share of acquisitions served from the free-list (1.0 when idle).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            1.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

pub struct BufferPool {
    queue: ArrayQueue<BytesMut>,
    /// Initial capacity of buffers allocated on a miss.
    buffer_capacity: usize,
    /// Buffers that grew past this are dropped on return (0 = keep all).
    max_retained_capacity: usize,
    metrics: BufferPoolMetrics,
}

impl BufferPool {
    /// `pool_size` bounds the free-list; it is clamped to at least 1.
    pub fn new(pool_size: usize, buffer_capacity: usize, max_retained_capacity: usize) -> Self {
        Self {
            queue: ArrayQueue::new(pool_size.max(1)),
            buffer_capacity,
            max_retained_capacity,
            metrics: BufferPoolMetrics::new(),
        }
    }

    /// Borrow a buffer for the current scope. Never blocks, never fails.
    pub fn acquire(&self) -> PooledBuffer<'_> {
        PooledBuffer {
            buf: self.get(),
            pool: self,
        }
    }

    /// Take a buffer out of the pool, allocating on a miss.
    /// Prefer [`acquire`](Self::acquire), which returns it automatically.
    #[inline]
    pub fn get(&self) -> BytesMut {
        match self.queue.pop() {
            Some(buf) => {
                BufferPoolMetrics::record(&self.metrics.hits);
                buf
            }
            None => {
                BufferPoolMetrics::record(&self.metrics.misses);
                BytesMut::with_capacity(self.buffer_capacity)
            }
        }
    }

    /// Clear `buf` and return it to the free-list, or drop it when the
    /// list is full or the buffer outgrew `max_retained_capacity`.
    #[inline]
    pub fn put(&self, mut buf: BytesMut) {
        buf.clear();

        if self.max_retained_capacity > 0 && buf.capacity() > self.max_retained_capacity {
            BufferPoolMetrics::record(&self.metrics.drops);
            return;
        }

        match self.queue.push(buf) {
            Ok(()) => BufferPoolMetrics::record(&self.metrics.returns),
            Err(_) => BufferPoolMetrics::record(&self.metrics.drops),
        }
    }

    /// Buffers currently idle in the free-list.
    #[inline]
    pub fn available(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    #[inline]
    pub fn buffer_capacity(&self) -> usize {
        self.buffer_capacity
    }

    #[inline]
    pub fn metrics(&self) -> &BufferPoolMetrics {
        &self.metrics
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_SIZE, DEFAULT_BUFFER_CAPACITY, DEFAULT_MAX_RETAINED_CAPACITY)
    }
}

/// Process-wide pool shared by converters that are not given their own.
pub fn stream_pool() -> Arc<BufferPool> {
    static POOL: OnceLock<Arc<BufferPool>> = OnceLock::new();
    POOL.get_or_init(|| Arc::new(BufferPool::default())).clone()
}

/// Scoped borrow of a pooled buffer. Returned to the pool on drop,
/// whichever way the owning scope exits.
pub struct PooledBuffer<'a> {
    buf: BytesMut,
    pool: &'a BufferPool,
}

impl Deref for PooledBuffer<'_> {
    type Target = BytesMut;

    fn deref(&self) -> &BytesMut {
        &self.buf
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut BytesMut {
        &mut self.buf
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        // BytesMut::new() does not allocate
        self.pool.put(std::mem::take(&mut self.buf));
    }
}

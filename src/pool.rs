//! Component C: a size-keyed free-list of limb buffers, shared by the
//! multiplier (component B) for scratch space. Safe under concurrent
//! `get`/return; buffers themselves are never shared while lent out.

use std::collections::HashMap;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Mutex;
use std::time::Duration;

use crate::limb::Limb;

const ALIGNMENT: usize = 8;

fn align_up(size: usize) -> usize {
    (size + ALIGNMENT - 1) / ALIGNMENT * ALIGNMENT
}

/// Which multiplication strategy a timing sample belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Schoolbook,
    Karatsuba,
    Toom3,
}

#[derive(Default)]
struct StrategyTimes {
    schoolbook: Mutex<Duration>,
    karatsuba: Mutex<Duration>,
    toom3: Mutex<Duration>,
}

/// A point-in-time read of the pool's counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub block_hits: u64,
    pub cache_misses: u64,
    pub peak_memory: usize,
    pub schoolbook_time: Duration,
    pub karatsuba_time: Duration,
    pub toom3_time: Duration,
}

struct Metrics {
    block_hits: AtomicU64,
    cache_misses: AtomicU64,
    peak_memory: AtomicUsize,
    resident: AtomicUsize,
    time_spent: StrategyTimes,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            block_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
            peak_memory: AtomicUsize::new(0),
            resident: AtomicUsize::new(0),
            time_spent: StrategyTimes::default(),
        }
    }
}

/// The pool itself: a mapping from aligned size to a stack of idle buffers,
/// plus usage counters.
pub struct Pool<L: Limb> {
    free: Mutex<HashMap<usize, Vec<Vec<L>>>>,
    metrics: Metrics,
}

impl<L: Limb> fmt::Debug for Pool<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool").finish_non_exhaustive()
    }
}

impl<L: Limb> Default for Pool<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Limb> Pool<L> {
    pub fn new() -> Self {
        Self {
            free: Mutex::new(HashMap::new()),
            metrics: Metrics::default(),
        }
    }

    /// The process-wide default instance for this limb width. Operator
    /// overloads and other call sites that cannot thread an explicit pool
    /// handle through use this; everything else should prefer an explicit
    /// `&Pool<L>`.
    pub fn global() -> &'static Pool<L> {
        L::global_pool()
    }

    /// Acquires a buffer of at least `size` limbs, rounded up to a multiple
    /// of 8. Returns an RAII guard that returns the buffer to the free list
    /// on drop (including on an unwind), so a lend can never be forgotten.
    pub fn get(&self, size: usize) -> PoolBuffer<'_, L> {
        let aligned = align_up(size.max(1));
        let mut free = self.free.lock().unwrap();
        let buf = match free.get_mut(&aligned).and_then(|stack| stack.pop()) {
            Some(b) => {
                self.metrics.block_hits.fetch_add(1, AtomicOrdering::Relaxed);
                self.metrics.resident.fetch_sub(aligned, AtomicOrdering::Relaxed);
                b
            }
            None => {
                self.metrics.cache_misses.fetch_add(1, AtomicOrdering::Relaxed);
                vec![L::ZERO; aligned]
            }
        };
        drop(free);
        PoolBuffer {
            pool: self,
            size: aligned,
            buf: Some(buf),
        }
    }

    fn return_buffer(&self, mut buf: Vec<L>) {
        let aligned = buf.len();
        buf.iter_mut().for_each(|l| *l = L::ZERO);
        let mut free = self.free.lock().unwrap();
        free.entry(aligned).or_default().push(buf);
        let resident = self.metrics.resident.fetch_add(aligned, AtomicOrdering::Relaxed) + aligned;
        self.metrics
            .peak_memory
            .fetch_max(resident, AtomicOrdering::Relaxed);
    }

    pub(crate) fn record_time(&self, strategy: Strategy, elapsed: Duration) {
        let target = match strategy {
            Strategy::Schoolbook => &self.metrics.time_spent.schoolbook,
            Strategy::Karatsuba => &self.metrics.time_spent.karatsuba,
            Strategy::Toom3 => &self.metrics.time_spent.toom3,
        };
        *target.lock().unwrap() += elapsed;
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            block_hits: self.metrics.block_hits.load(AtomicOrdering::Relaxed),
            cache_misses: self.metrics.cache_misses.load(AtomicOrdering::Relaxed),
            peak_memory: self.metrics.peak_memory.load(AtomicOrdering::Relaxed),
            schoolbook_time: *self.metrics.time_spent.schoolbook.lock().unwrap(),
            karatsuba_time: *self.metrics.time_spent.karatsuba.lock().unwrap(),
            toom3_time: *self.metrics.time_spent.toom3.lock().unwrap(),
        }
    }
}


/// An RAII-held scratch buffer on loan from a `Pool`. Returned to the free
/// list when dropped, on every exit path.
pub struct PoolBuffer<'a, L: Limb> {
    pool: &'a Pool<L>,
    size: usize,
    buf: Option<Vec<L>>,
}

impl<L: Limb> PoolBuffer<'_, L> {
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

impl<L: Limb> Deref for PoolBuffer<'_, L> {
    type Target = [L];
    fn deref(&self) -> &[L] {
        self.buf.as_deref().expect("buffer present until drop")
    }
}

impl<L: Limb> DerefMut for PoolBuffer<'_, L> {
    fn deref_mut(&mut self) -> &mut [L] {
        self.buf.as_deref_mut().expect("buffer present until drop")
    }
}

impl<L: Limb> Drop for PoolBuffer<'_, L> {
    fn drop(&mut self) {
        if let Some(buf) = self.buf.take() {
            self.pool.return_buffer(buf);
        }
    }
}

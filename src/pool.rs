//! Generic grow-on-demand object pool with usage statistics.
//!
//! The dispatcher acquires its async-mode staging buffer from a
//! `Pool<Arc<CircularBuffer>>` rather than allocating one directly.

use parking_lot::Mutex;

struct Slot<T> {
    value: T,
    in_use: bool,
}

struct Inner<T> {
    slots: Vec<Slot<T>>,
    peak_usage: usize,
}

/// Point-in-time usage snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub total_items: usize,
    pub in_use: usize,
    pub peak_usage: usize,
}

/// A pool of `T` values, grown by doubling when no free slot remains.
///
/// A single lock guards the slot array and stats. `T` must be `Send`
/// since slots may outlive the thread that acquired them.
pub struct Pool<T> {
    inner: Mutex<Inner<T>>,
    creator: Box<dyn Fn() -> T + Send + Sync>,
    destroyer: Box<dyn Fn(T) + Send + Sync>,
}

impl<T> Pool<T> {
    /// Creates a pool with `initial` pre-populated slots.
    pub fn new(
        initial: usize,
        creator: impl Fn() -> T + Send + Sync + 'static,
        destroyer: impl Fn(T) + Send + Sync + 'static,
    ) -> Self {
        let slots = (0..initial)
            .map(|_| Slot {
                value: creator(),
                in_use: false,
            })
            .collect();
        Pool {
            inner: Mutex::new(Inner {
                slots,
                peak_usage: 0,
            }),
            creator: Box::new(creator),
            destroyer: Box::new(destroyer),
        }
    }

    /// Returns the index of a free slot, growing the pool (doubling) if
    /// none is available. Updates `peak_usage`.
    pub fn acquire(&self) -> usize {
        let mut inner = self.inner.lock();
        if let Some(idx) = inner.slots.iter().position(|s| !s.in_use) {
            inner.slots[idx].in_use = true;
            let in_use = inner.slots.iter().filter(|s| s.in_use).count();
            inner.peak_usage = inner.peak_usage.max(in_use);
            return idx;
        }

        let old_len = inner.slots.len();
        let new_len = (old_len * 2).max(1);
        for _ in old_len..new_len {
            inner.slots.push(Slot {
                value: (self.creator)(),
                in_use: false,
            });
        }
        inner.slots[old_len].in_use = true;
        let in_use = inner.slots.iter().filter(|s| s.in_use).count();
        inner.peak_usage = inner.peak_usage.max(in_use);
        old_len
    }

    /// Runs `f` with a reference to the slot at `index`.
    pub fn with<R>(&self, index: usize, f: impl FnOnce(&T) -> R) -> R {
        let inner = self.inner.lock();
        f(&inner.slots[index].value)
    }

    /// Marks the slot at `index` free. Releasing an index that is already
    /// free, or out of range, is a no-op.
    pub fn release(&self, index: usize) {
        let mut inner = self.inner.lock();
        if let Some(slot) = inner.slots.get_mut(index) {
            slot.in_use = false;
        }
    }

    /// Compacts unused tail entries, leaving `ceil(active * 1.25)` slots.
    /// Entries removed this way are passed to the destroyer.
    pub fn shrink_to_fit(&self) {
        let mut inner = self.inner.lock();
        let active = inner.slots.iter().filter(|s| s.in_use).count();
        let target = ((active as f64) * 1.25).ceil() as usize;
        if target >= inner.slots.len() {
            return;
        }

        // Keep all in-use slots plus enough free tail slots to hit target,
        // preferring to drop free slots from the tail first.
        let mut kept = Vec::with_capacity(target);
        let mut removed = Vec::new();
        for slot in inner.slots.drain(..) {
            if kept.len() < target || slot.in_use {
                kept.push(slot);
            } else {
                removed.push(slot);
            }
        }
        inner.slots = kept;
        drop(inner);
        for slot in removed {
            (self.destroyer)(slot.value);
        }
    }

    /// Snapshot of current usage statistics.
    pub fn stats(&self) -> PoolStats {
        let inner = self.inner.lock();
        PoolStats {
            total_items: inner.slots.len(),
            in_use: inner.slots.iter().filter(|s| s.in_use).count(),
            peak_usage: inner.peak_usage,
        }
    }
}

use crate::Id;
use parking_lot::{lock_api::ArcMutexGuard, Mutex, RawMutex, RwLock};
use std::{collections::HashMap, sync::Arc};

/// One mutex per review id.
///
/// Operations on the same review are serialized in the order
/// they acquire the lock, operations on different reviews
/// don't block each other. The guard is released on every
/// exit path including unwinding.
///
/// A mutex only lives as long as somebody holds or waits for it.
#[derive(Debug, Default)]
pub struct ReviewLocks {
    locks: RwLock<HashMap<Id, Arc<Mutex<()>>>>,
}

/// Held while a single review is read and modified.
#[must_use]
pub struct ReviewGuard<'a> {
    locks: &'a ReviewLocks,
    review_id: Id,
    mutex: Arc<Mutex<()>>,
    guard: Option<ArcMutexGuard<RawMutex, ()>>,
}

impl Drop for ReviewGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.locks.release(self.review_id.as_str(), &self.mutex);
    }
}

impl ReviewLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn get_or_create(&self, review_id: &str) -> Arc<Mutex<()>> {
        // Fast path
        if let Some(lock) = self.locks.read().get(review_id) {
            return Arc::clone(lock);
        }
        let mut locks = self.locks.write();
        // Another thread might have inserted it in between
        Arc::clone(
            locks
                .entry(Id::from(review_id))
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }

    /// Evicts the mutex unless another thread still references it.
    ///
    /// New references are only handed out while holding the map
    /// lock, so the count can't grow during the check.
    fn release(&self, review_id: &str, mutex: &Arc<Mutex<()>>) {
        let mut locks = self.locks.write();
        // The caller's reference and the one in the map
        if Arc::strong_count(mutex) > 2 {
            return;
        }
        if locks
            .get(review_id)
            .is_some_and(|lock| Arc::ptr_eq(lock, mutex))
        {
            locks.remove(review_id);
        }
    }

    fn guard(
        &self,
        review_id: &str,
        mutex: Arc<Mutex<()>>,
        guard: ArcMutexGuard<RawMutex, ()>,
    ) -> ReviewGuard<'_> {
        ReviewGuard {
            locks: self,
            review_id: Id::from(review_id),
            mutex,
            guard: Some(guard),
        }
    }

    /// Blocks until the review is available.
    pub fn lock(&self, review_id: &str) -> ReviewGuard<'_> {
        let mutex = self.get_or_create(review_id);
        let guard = mutex.lock_arc();
        self.guard(review_id, mutex, guard)
    }

    pub fn try_lock(&self, review_id: &str) -> Option<ReviewGuard<'_>> {
        let mutex = self.get_or_create(review_id);
        match mutex.try_lock_arc() {
            Some(guard) => Some(self.guard(review_id, mutex, guard)),
            None => {
                self.release(review_id, &mutex);
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.locks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

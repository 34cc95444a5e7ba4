//! Per-group async locks.
//!
//! Serialized admission takes the lock for a group id before its first store
//! call and holds it until the operation returns, so mutations on one group
//! never interleave while different groups proceed in parallel.
//!
//! An entry lives only while someone holds or waits on it: dropping the last
//! [`GroupLockGuard`] removes it, so matched, deleted and unknown group ids
//! leave nothing behind.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::trace;

#[derive(Debug, Clone, Default)]
pub struct GroupLocks {
    locks: Arc<DashMap<i64, Arc<Mutex<()>>>>,
}

impl GroupLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `group_id`.
    pub async fn acquire(&self, group_id: i64) -> GroupLockGuard {
        // Clone the Arc out so the shard lock is released before awaiting.
        let lock = self.locks.entry(group_id).or_default().clone();
        let guard = lock.lock_owned().await;
        trace!(group_id, "group lock acquired");
        GroupLockGuard {
            guard: Some(guard),
            locks: self.clone(),
            group_id,
        }
    }

    /// Remove the entry once only the map itself references it.
    fn release_if_idle(&self, group_id: i64) {
        let removed = self
            .locks
            .remove_if(&group_id, |_, lock| Arc::strong_count(lock) == 1);
        if removed.is_some() {
            trace!(group_id, "group lock entry released");
        }
    }

    /// Number of group ids with a lock entry.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Exclusive access to one group. Releases the map entry on drop when no
/// other task is waiting for it.
#[derive(Debug)]
pub struct GroupLockGuard {
    guard: Option<OwnedMutexGuard<()>>,
    locks: GroupLocks,
    group_id: i64,
}

impl Drop for GroupLockGuard {
    fn drop(&mut self) {
        // Unlock first so our own Arc no longer counts against the entry.
        drop(self.guard.take());
        self.locks.release_if_idle(self.group_id);
    }
}

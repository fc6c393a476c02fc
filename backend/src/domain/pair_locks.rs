//! Per-pair mutual exclusion for relationship writes.
//!
//! Every operation that touches the edge between two accounts, in either
//! direction, first acquires the lock for their unordered pair. Operations on
//! disjoint pairs never contend. Lock slots are created on demand and dropped
//! once nobody holds or waits for them, so the registry only ever contains
//! pairs with work in flight.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use super::AccountId;

type Slot = Arc<AsyncMutex<()>>;
type Registry = Arc<Mutex<HashMap<PairKey, Slot>>>;

/// Unordered pair of accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairKey {
    low: AccountId,
    high: AccountId,
}

impl PairKey {
    /// Build the key for `a` and `b` in either order.
    ///
    /// # Examples
    /// ```
    /// use social_backend::domain::{AccountId, PairKey};
    ///
    /// let (a, b) = (AccountId::random(), AccountId::random());
    /// assert_eq!(PairKey::new(a, b), PairKey::new(b, a));
    /// ```
    pub fn new(a: AccountId, b: AccountId) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    /// Whether `id` is one of the two accounts.
    pub fn involves(&self, id: &AccountId) -> bool {
        self.low == *id || self.high == *id
    }

    /// The two accounts, lower id first.
    pub fn members(&self) -> (AccountId, AccountId) {
        (self.low, self.high)
    }
}

/// Registry of per-pair locks. Clones share the same registry.
#[derive(Debug, Clone, Default)]
pub struct PairLocks {
    slots: Registry,
}

/// Held pair lock; released on drop.
#[derive(Debug)]
pub struct PairGuard {
    // Declared first so the mutex is released before the lease checks idleness.
    _guard: OwnedMutexGuard<()>,
    lease: SlotLease,
}

/// A claim on a registry slot, taken before waiting on it. Dropping the last
/// claim evicts the slot, including when a waiter is cancelled.
#[derive(Debug)]
struct SlotLease {
    key: PairKey,
    slot: Slot,
    slots: Registry,
}

fn registry(slots: &Registry) -> MutexGuard<'_, HashMap<PairKey, Slot>> {
    slots.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PairLocks {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to the pair `(a, b)`.
    pub async fn lock(&self, a: AccountId, b: AccountId) -> PairGuard {
        let key = PairKey::new(a, b);
        let lease = SlotLease {
            key,
            slot: Arc::clone(registry(&self.slots).entry(key).or_default()),
            slots: Arc::clone(&self.slots),
        };
        let guard = Arc::clone(&lease.slot).lock_owned().await;
        PairGuard {
            _guard: guard,
            lease,
        }
    }

    /// Wait until every pair operation involving `account` that is in flight
    /// right now has finished.
    ///
    /// Operations that start afterwards are not waited for; callers mark the
    /// account first so later operations refuse it.
    pub async fn drain(&self, account: &AccountId) {
        let pending: Vec<PairKey> = registry(&self.slots)
            .keys()
            .filter(|key| key.involves(account))
            .copied()
            .collect();
        for key in pending {
            let (a, b) = key.members();
            drop(self.lock(a, b).await);
        }
    }

    /// Number of pairs currently held or awaited.
    pub fn in_flight(&self) -> usize {
        registry(&self.slots).len()
    }
}

impl PairGuard {
    /// The locked pair.
    pub fn key(&self) -> PairKey {
        self.lease.key
    }
}

impl Drop for SlotLease {
    fn drop(&mut self) {
        let mut slots = registry(&self.slots);
        // Registry entry plus our own handle: nobody else holds or waits.
        let idle = Arc::strong_count(&self.slot) == 2;
        let ours = slots
            .get(&self.key)
            .is_some_and(|current| Arc::ptr_eq(current, &self.slot));
        if idle && ours {
            slots.remove(&self.key);
        }
    }
}

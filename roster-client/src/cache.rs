//! Cache slots for the employee store
//!
//! Each slot is a small state machine:
//!
//! ```text
//! Empty ──fetch ok──▶ Fresh ──invalidate / ttl──▶ Stale
//!   │                  ▲  │                        │
//!   │                  └──┼──────fetch ok──────────┘
//!   └──fetch err──▶ Error(last_good) ◀──fetch err──┘
//! ```
//!
//! A failed refresh never drops data: the previous value moves into
//! `Error::last_good`.

use std::collections::BTreeMap;
use tokio::time::{Duration, Instant};

use shared::{Employee, EmployeeId};

/// One cached value and its provenance
#[derive(Debug, Clone, PartialEq)]
pub enum CacheSlot<T> {
    /// Never fetched
    Empty,
    /// Fetched at `fetched_at` and not invalidated since
    Fresh { value: T, fetched_at: Instant },
    /// Invalidated (or fetched while an invalidation was in flight)
    Stale { value: T, fetched_at: Instant },
    /// Last refresh failed
    Error {
        last_good: Option<(T, Instant)>,
        error: String,
    },
}

impl<T> Default for CacheSlot<T> {
    fn default() -> Self {
        CacheSlot::Empty
    }
}

impl<T> CacheSlot<T> {
    /// Value that can be served without a network call
    pub fn fresh_value(&self, now: Instant, ttl: Duration) -> Option<&T> {
        match self {
            CacheSlot::Fresh { value, fetched_at } if now.duration_since(*fetched_at) < ttl => {
                Some(value)
            }
            _ => None,
        }
    }

    /// Most recent successfully fetched value, fresh or not
    pub fn last_good(&self) -> Option<&T> {
        match self {
            CacheSlot::Fresh { value, .. } | CacheSlot::Stale { value, .. } => Some(value),
            CacheSlot::Error { last_good, .. } => last_good.as_ref().map(|(v, _)| v),
            CacheSlot::Empty => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            CacheSlot::Error { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CacheSlot::Empty)
    }

    pub fn state_name(&self) -> &'static str {
        match self {
            CacheSlot::Empty => "empty",
            CacheSlot::Fresh { .. } => "fresh",
            CacheSlot::Stale { .. } => "stale",
            CacheSlot::Error { .. } => "error",
        }
    }

    /// Replace the slot with a freshly fetched value
    pub fn store(&mut self, value: T, now: Instant) {
        *self = CacheSlot::Fresh {
            value,
            fetched_at: now,
        };
    }

    /// Replace the slot with a value already known to be outdated
    pub fn store_stale(&mut self, value: T, now: Instant) {
        *self = CacheSlot::Stale {
            value,
            fetched_at: now,
        };
    }

    /// Force the next read to refetch. Keeps the value for display.
    pub fn invalidate(&mut self) {
        if let CacheSlot::Fresh { .. } = self {
            if let CacheSlot::Fresh { value, fetched_at } = std::mem::take(self) {
                *self = CacheSlot::Stale { value, fetched_at };
            }
        }
    }

    /// Record a failed refresh, keeping the last good value
    pub fn record_error(&mut self, error: impl Into<String>) {
        let last_good = match std::mem::take(self) {
            CacheSlot::Fresh { value, fetched_at } | CacheSlot::Stale { value, fetched_at } => {
                Some((value, fetched_at))
            }
            CacheSlot::Error { last_good, .. } => last_good,
            CacheSlot::Empty => None,
        };
        *self = CacheSlot::Error {
            last_good,
            error: error.into(),
        };
    }
}

/// Whole cache state: the collection plus per-id detail slots
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CacheSnapshot {
    pub collection: CacheSlot<Vec<Employee>>,
    pub details: BTreeMap<EmployeeId, CacheSlot<Employee>>,
    /// Bumped on every collection invalidation
    pub collection_epoch: u64,
    /// Per-id counterpart of `collection_epoch`, bumped by every mutation of that id
    pub detail_epochs: BTreeMap<EmployeeId, u64>,
}

impl CacheSnapshot {
    pub fn invalidate_collection(&mut self) {
        self.collection.invalidate();
        self.collection_epoch += 1;
    }

    pub fn detail_epoch(&self, id: EmployeeId) -> u64 {
        self.detail_epochs.get(&id).copied().unwrap_or(0)
    }

    /// Mark `id` as mutated. Reads of `id` already in flight must not
    /// overwrite whatever the mutation leaves in its slot.
    pub fn bump_detail(&mut self, id: EmployeeId) {
        *self.detail_epochs.entry(id).or_default() += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_until_ttl() {
        let t0 = Instant::now();
        let ttl = Duration::from_secs(300);
        let mut slot = CacheSlot::Empty;
        slot.store(vec![1, 2], t0);

        assert_eq!(slot.fresh_value(t0 + Duration::from_secs(299), ttl), Some(&vec![1, 2]));
        assert_eq!(slot.fresh_value(t0 + ttl, ttl), None);
        assert_eq!(slot.last_good(), Some(&vec![1, 2]));
    }

    #[test]
    fn test_invalidate_keeps_value() {
        let t0 = Instant::now();
        let mut slot = CacheSlot::Empty;
        slot.store("a", t0);
        slot.invalidate();

        assert_eq!(slot.state_name(), "stale");
        assert_eq!(slot.fresh_value(t0, Duration::from_secs(60)), None);
        assert_eq!(slot.last_good(), Some(&"a"));
    }

    #[test]
    fn test_invalidate_empty_is_noop() {
        let mut slot: CacheSlot<u8> = CacheSlot::Empty;
        slot.invalidate();
        assert!(slot.is_empty());
    }

    #[test]
    fn test_error_retains_last_good() {
        let t0 = Instant::now();
        let mut slot = CacheSlot::Empty;
        slot.store(5, t0);
        slot.record_error("boom");
        assert_eq!(slot.last_good(), Some(&5));
        assert_eq!(slot.error(), Some("boom"));

        slot.record_error("again");
        assert_eq!(slot.last_good(), Some(&5));
        assert_eq!(slot.error(), Some("again"));
    }

    #[test]
    fn test_error_from_empty_has_nothing() {
        let mut slot: CacheSlot<u8> = CacheSlot::Empty;
        slot.record_error("down");
        assert_eq!(slot.last_good(), None);
        assert_eq!(slot.state_name(), "error");
    }

    #[test]
    fn test_snapshot_invalidation_bumps_epoch() {
        let mut cache = CacheSnapshot::default();
        cache.invalidate_collection();
        cache.invalidate_collection();
        assert_eq!(cache.collection_epoch, 2);
        assert!(cache.collection.is_empty());
    }

    #[test]
    fn test_detail_epochs_are_per_id() {
        let mut cache = CacheSnapshot::default();
        cache.bump_detail(3);
        cache.bump_detail(3);
        assert_eq!(cache.detail_epoch(3), 2);
        assert_eq!(cache.detail_epoch(4), 0);
        assert_eq!(cache.collection_epoch, 0);
    }
}

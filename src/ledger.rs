//! Allocation accounting for owned storage.
//!
//! A ledger is shared through `Arc` between every buffer allocated against
//! it. It only counts; it never holds or aliases the storage itself.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Counters for allocations and releases of buffer storage.
#[derive(Debug, Default)]
pub struct AllocationLedger {
    allocations: AtomicUsize,
    releases: AtomicUsize,
    live: AtomicUsize,
    live_bytes: AtomicUsize,
}

impl AllocationLedger {
    /// Create a new shared ledger
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn record_alloc(&self, bytes: usize) {
        self.allocations.fetch_add(1, Ordering::Relaxed);
        self.live.fetch_add(1, Ordering::Relaxed);
        self.live_bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    pub(crate) fn record_release(&self, bytes: usize) {
        self.releases.fetch_add(1, Ordering::Relaxed);
        self.live.fetch_sub(1, Ordering::Relaxed);
        self.live_bytes.fetch_sub(bytes, Ordering::Relaxed);
    }

    /// Number of storage allocations recorded
    pub fn allocations(&self) -> usize {
        self.allocations.load(Ordering::Relaxed)
    }

    /// Number of storage releases recorded
    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::Relaxed)
    }

    /// Allocations not yet released
    pub fn live(&self) -> usize {
        self.live.load(Ordering::Relaxed)
    }

    /// Bytes held by live allocations
    pub fn live_bytes(&self) -> usize {
        self.live_bytes.load(Ordering::Relaxed)
    }

    /// True once every allocation has been released exactly once
    pub fn is_balanced(&self) -> bool {
        self.live() == 0 && self.live_bytes() == 0
    }

    /// Snapshot of the counters
    pub fn stats(&self) -> LedgerStats {
        LedgerStats {
            allocations: self.allocations(),
            releases: self.releases(),
            live_bytes: self.live_bytes(),
        }
    }
}

/// Point-in-time ledger counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerStats {
    pub allocations: usize,
    pub releases: usize,
    pub live_bytes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_balance() {
        let ledger = AllocationLedger::new();
        assert!(ledger.is_balanced());

        ledger.record_alloc(16);
        ledger.record_alloc(4);
        assert_eq!(ledger.live(), 2);
        assert_eq!(ledger.live_bytes(), 20);
        assert!(!ledger.is_balanced());

        ledger.record_release(16);
        ledger.record_release(4);
        assert!(ledger.is_balanced());
        assert_eq!(
            ledger.stats(),
            LedgerStats {
                allocations: 2,
                releases: 2,
                live_bytes: 0
            }
        );
    }

    #[test]
    fn test_live_reads_during_concurrent_churn() {
        let ledger = AllocationLedger::new();

        crossbeam::thread::scope(|s| {
            for _ in 0..4 {
                let ledger = Arc::clone(&ledger);
                s.spawn(move |_| {
                    for _ in 0..10_000 {
                        ledger.record_alloc(8);
                        ledger.record_release(8);
                    }
                });
            }
            let reader = Arc::clone(&ledger);
            s.spawn(move |_| {
                for _ in 0..10_000 {
                    assert!(reader.live() <= 4);
                }
            });
        })
        .unwrap();

        assert!(ledger.is_balanced());
        assert_eq!(ledger.allocations(), 40_000);
        assert_eq!(ledger.releases(), 40_000);
    }
}

//! Device identifier generation.
//!
//! Identifiers come from an [`IdGenerator`] so callers and tests control
//! where they start. The process-wide generator is only the default.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Identifier assigned to a [`Device`](crate::Device)
pub type DeviceId = u64;

/// First identifier handed out by a fresh generator
pub const FIRST_DEVICE_ID: DeviceId = 1;

/// Source of monotonically increasing device identifiers
pub trait IdGenerator: Send + Sync {
    /// Allocate the next identifier
    fn next_id(&self) -> DeviceId;
}

/// Atomic counter, safe under concurrent device creation
#[derive(Debug)]
pub struct SequentialIds {
    first: DeviceId,
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::starting_at(FIRST_DEVICE_ID)
    }

    pub fn starting_at(first: DeviceId) -> Self {
        Self {
            first,
            next: AtomicU64::new(first),
        }
    }

    /// Identifier the next call to `next_id` will return
    pub fn peek(&self) -> DeviceId {
        self.next.load(Ordering::SeqCst)
    }

    /// Restart the sequence from its first identifier
    pub fn reset(&self) {
        self.next.store(self.first, Ordering::SeqCst);
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> DeviceId {
        self.next.fetch_add(1, Ordering::SeqCst)
    }
}

impl<G: IdGenerator + ?Sized> IdGenerator for Arc<G> {
    fn next_id(&self) -> DeviceId {
        (**self).next_id()
    }
}

lazy_static::lazy_static! {
    static ref GLOBAL_IDS: Arc<SequentialIds> = Arc::new(SequentialIds::new());
}

/// The process-wide generator used by [`Device::create`](crate::Device::create)
pub fn global_ids() -> Arc<SequentialIds> {
    Arc::clone(&GLOBAL_IDS)
}

//! Device Registry
//!
//! An ordered list of owned devices. Devices go in by value and come back
//! out by value; callers only ever borrow them through closures.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::device::{Device, DeviceStatus, DeviceType};
use crate::error::{DeviceError, DeviceResult};
use crate::ids::{DeviceId, IdGenerator, SequentialIds};

/// Listing entry for a registered device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSummary {
    pub id: DeviceId,
    #[serde(rename = "type")]
    pub kind: DeviceType,
    pub status: DeviceStatus,
}

impl From<&Device> for DeviceSummary {
    fn from(device: &Device) -> Self {
        Self {
            id: device.id(),
            kind: device.kind(),
            status: device.status(),
        }
    }
}

/// Ordered collection of devices
pub struct DeviceRegistry {
    devices: RwLock<Vec<Device>>,
    ids: Arc<dyn IdGenerator>,
}

impl DeviceRegistry {
    /// Create a registry with its own id sequence starting at 1
    pub fn new() -> Self {
        Self::with_ids(Arc::new(SequentialIds::new()))
    }

    pub fn with_ids(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            devices: RwLock::new(Vec::new()),
            ids,
        }
    }

    /// Id generator used by [`create`](Self::create)
    pub fn ids(&self) -> &dyn IdGenerator {
        &*self.ids
    }

    /// Build a new device and append it
    pub fn create(
        &self,
        kind: DeviceType,
        status: DeviceStatus,
        capacity: usize,
    ) -> DeviceResult<DeviceId> {
        let device = Device::with_kind(&*self.ids, kind, status, capacity);
        self.insert(device)
    }

    /// Append an existing device. Ids are unique within a registry, so a
    /// copy of a registered device is rejected.
    pub fn insert(&self, device: Device) -> DeviceResult<DeviceId> {
        let id = device.id();
        let mut devices = self.devices.write();
        if devices.iter().any(|d| d.id() == id) {
            return Err(DeviceError::DuplicateId(id));
        }
        devices.push(device);
        debug!(id, "device registered");
        Ok(id)
    }

    /// Put `device` at `slot`, returning the device it displaced.
    ///
    /// The incoming id may match the displaced device but no other entry.
    pub fn replace(&self, slot: usize, device: Device) -> DeviceResult<Device> {
        let mut devices = self.devices.write();
        let len = devices.len();
        let id = device.id();
        if devices
            .iter()
            .enumerate()
            .any(|(i, d)| i != slot && d.id() == id)
        {
            return Err(DeviceError::DuplicateId(id));
        }
        let entry = devices
            .get_mut(slot)
            .ok_or(DeviceError::SlotOutOfRange { slot, len })?;
        debug!(slot, old = entry.id(), new = device.id(), "device replaced");
        Ok(std::mem::replace(entry, device))
    }

    /// Copy of the device with `id`
    pub fn get(&self, id: DeviceId) -> DeviceResult<Device> {
        self.with(id, Device::clone)
    }

    /// Copy of the device at `slot`
    pub fn get_slot(&self, slot: usize) -> DeviceResult<Device> {
        let devices = self.devices.read();
        devices
            .get(slot)
            .cloned()
            .ok_or(DeviceError::SlotOutOfRange {
                slot,
                len: devices.len(),
            })
    }

    pub fn with<F, R>(&self, id: DeviceId, f: F) -> DeviceResult<R>
    where
        F: FnOnce(&Device) -> R,
    {
        let devices = self.devices.read();
        devices
            .iter()
            .find(|d| d.id() == id)
            .map(f)
            .ok_or(DeviceError::NotFound(id))
    }

    pub fn with_mut<F, R>(&self, id: DeviceId, f: F) -> DeviceResult<R>
    where
        F: FnOnce(&mut Device) -> R,
    {
        let mut devices = self.devices.write();
        devices
            .iter_mut()
            .find(|d| d.id() == id)
            .map(f)
            .ok_or(DeviceError::NotFound(id))
    }

    /// Remove the first device with `id` and hand it back
    pub fn remove(&self, id: DeviceId) -> DeviceResult<Device> {
        let mut devices = self.devices.write();
        let pos = devices
            .iter()
            .position(|d| d.id() == id)
            .ok_or(DeviceError::NotFound(id))?;
        debug!(id, "device removed");
        Ok(devices.remove(pos))
    }

    pub fn contains(&self, id: DeviceId) -> bool {
        self.devices.read().iter().any(|d| d.id() == id)
    }

    /// Summaries in registration order
    pub fn summaries(&self) -> Vec<DeviceSummary> {
        self.devices.read().iter().map(DeviceSummary::from).collect()
    }

    pub fn len(&self) -> usize {
        self.devices.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.read().is_empty()
    }

    /// Drop every device
    pub fn clear(&self) {
        let mut devices = self.devices.write();
        debug!(count = devices.len(), "registry cleared");
        devices.clear();
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_list() {
        let registry = DeviceRegistry::new();
        let a = registry.create(DeviceType::Keyboard, DeviceStatus::Stopped, 32).unwrap();
        let b = registry.create(DeviceType::Mouse, DeviceStatus::Idle, 32).unwrap();
        assert_eq!((a, b), (1, 2));

        let summaries = registry.summaries();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[1].kind, DeviceType::Mouse);
        assert_eq!(summaries[1].status, DeviceStatus::Idle);
    }

    #[test]
    fn test_with_mut_and_get() {
        let registry = DeviceRegistry::new();
        let id = registry.create(DeviceType::Display, DeviceStatus::Ready, 8).unwrap();
        registry.with_mut(id, |d| d.add_comment("hello")).unwrap();
        assert_eq!(registry.get(id).unwrap().comment(), "hello");
        assert_eq!(registry.get(99), Err(DeviceError::NotFound(99)));
    }

    #[test]
    fn test_replace_returns_displaced() {
        let registry = DeviceRegistry::new();
        let first = registry.create(DeviceType::Printer, DeviceStatus::Idle, 32).unwrap();
        let fresh = Device::with_capacity(registry.ids(), 128);
        let fresh_id = fresh.id();

        let old = registry.replace(0, fresh).unwrap();
        assert_eq!(old.id(), first);
        assert!(!registry.contains(first));
        assert_eq!(registry.get_slot(0).unwrap().id(), fresh_id);

        let err = registry.replace(5, old).unwrap_err();
        assert_eq!(err, DeviceError::SlotOutOfRange { slot: 5, len: 1 });
    }

    #[test]
    fn test_remove_and_clear() {
        let registry = DeviceRegistry::new();
        let id = registry.create(DeviceType::GenericIo, DeviceStatus::Idle, 4).unwrap();
        registry.create(DeviceType::GenericIo, DeviceStatus::Idle, 4).unwrap();

        let removed = registry.remove(id).unwrap();
        assert_eq!(removed.id(), id);
        assert_eq!(registry.len(), 1);

        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_insert_rejects_copy_of_registered_device() {
        let registry = DeviceRegistry::new();
        let id = registry.create(DeviceType::Keyboard, DeviceStatus::Idle, 8).unwrap();
        let copy = registry.get(id).unwrap();

        assert_eq!(registry.insert(copy), Err(DeviceError::DuplicateId(id)));
        assert_eq!(registry.len(), 1);

        registry.with_mut(id, |d| d.add_comment("edited")).unwrap();
        let removed = registry.remove(id).unwrap();
        assert_eq!(removed.comment(), "edited");
        assert!(!registry.contains(id));
        assert_eq!(registry.get(id), Err(DeviceError::NotFound(id)));
    }

    #[test]
    fn test_replace_rejects_id_held_by_other_slot() {
        let registry = DeviceRegistry::new();
        let first = registry.create(DeviceType::Mouse, DeviceStatus::Idle, 8).unwrap();
        let second = registry.create(DeviceType::Display, DeviceStatus::Idle, 8).unwrap();

        let copy_of_first = registry.get(first).unwrap();
        assert_eq!(
            registry.replace(1, copy_of_first.clone()),
            Err(DeviceError::DuplicateId(first))
        );
        assert_eq!(registry.get_slot(1).unwrap().id(), second);

        // Same id in the same slot is a plain swap.
        let mut updated = copy_of_first;
        updated.set_status(DeviceStatus::Fault);
        let old = registry.replace(0, updated).unwrap();
        assert_eq!(old.status(), DeviceStatus::Idle);
        assert_eq!(registry.get(first).unwrap().status(), DeviceStatus::Fault);
    }

    #[test]
    fn test_summary_json() {
        let summary = DeviceSummary {
            id: 4,
            kind: DeviceType::GenericIo,
            status: DeviceStatus::Stopped,
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert_eq!(json, r#"{"id":4,"type":"GENERIC_IO","status":"STOPPED"}"#);
    }
}

//! Device Records
//!
//! A [`Device`] owns a [`DataBuffer`] and carries descriptive fields: an
//! identifier, a type, a status and an append-only comment.
//!
//! Transferring a device hands its storage to the new owner and tombstones
//! the source: type becomes [`DeviceType::GenericIo`], status becomes
//! [`DeviceStatus::Stopped`] and the comment is cleared. The source keeps
//! its identifier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::buffer::DataBuffer;
use crate::error::{DeviceError, DeviceResult};
use crate::ids::{global_ids, DeviceId, IdGenerator};

/// Default storage size for a device buffer
pub const DEFAULT_DEVICE_CAPACITY: usize = 32;

/// Separator placed between appended comments
pub const COMMENT_SEPARATOR: &str = "\n";

/// Operational status of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceStatus {
    Ready,
    Starting,
    Idle,
    Fault,
    Stopped,
}

impl DeviceStatus {
    pub const ALL: [DeviceStatus; 5] = [
        DeviceStatus::Ready,
        DeviceStatus::Starting,
        DeviceStatus::Idle,
        DeviceStatus::Fault,
        DeviceStatus::Stopped,
    ];

    /// Fixed display label
    pub fn label(&self) -> &'static str {
        match self {
            DeviceStatus::Ready => "READY",
            DeviceStatus::Starting => "STARTING",
            DeviceStatus::Idle => "IDLE",
            DeviceStatus::Fault => "FAULT",
            DeviceStatus::Stopped => "STOPPED",
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DeviceStatus {
    type Err = DeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeviceStatus::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| DeviceError::UnknownLabel(s.to_string()))
    }
}

/// Kind of device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceType {
    GenericIo,
    Keyboard,
    Mouse,
    Display,
    Printer,
}

impl DeviceType {
    pub const ALL: [DeviceType; 5] = [
        DeviceType::GenericIo,
        DeviceType::Keyboard,
        DeviceType::Mouse,
        DeviceType::Display,
        DeviceType::Printer,
    ];

    /// Fixed display label
    pub fn label(&self) -> &'static str {
        match self {
            DeviceType::GenericIo => "GENERIC_IO",
            DeviceType::Keyboard => "KEYBOARD",
            DeviceType::Mouse => "MOUSE",
            DeviceType::Display => "DISPLAY",
            DeviceType::Printer => "PRINTER",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DeviceType {
    type Err = DeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeviceType::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| DeviceError::UnknownLabel(s.to_string()))
    }
}

/// A device that owns a data buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    id: DeviceId,
    kind: DeviceType,
    status: DeviceStatus,
    comment: String,
    buffer: DataBuffer,
}

impl Device {
    /// Generic IO device, starting, with the default capacity
    pub fn new(ids: &dyn IdGenerator) -> Self {
        Self::with_capacity(ids, DEFAULT_DEVICE_CAPACITY)
    }

    pub fn with_capacity(ids: &dyn IdGenerator, capacity: usize) -> Self {
        Self::with_kind(ids, DeviceType::GenericIo, DeviceStatus::Starting, capacity)
    }

    pub fn with_kind(
        ids: &dyn IdGenerator,
        kind: DeviceType,
        status: DeviceStatus,
        capacity: usize,
    ) -> Self {
        Self::with_id(ids.next_id(), kind, status, capacity)
    }

    /// Build a device with an explicit identifier; no generator is consulted
    pub fn with_id(id: DeviceId, kind: DeviceType, status: DeviceStatus, capacity: usize) -> Self {
        debug!(id, kind = kind.label(), status = status.label(), capacity, "device created");
        Self {
            id,
            kind,
            status,
            comment: String::new(),
            buffer: DataBuffer::with_capacity(capacity),
        }
    }

    /// Build a device from the process-wide generator with the default capacity
    pub fn create(kind: DeviceType, status: DeviceStatus) -> Self {
        Self::with_kind(&global_ids(), kind, status, DEFAULT_DEVICE_CAPACITY)
    }

    pub fn id(&self) -> DeviceId {
        self.id
    }

    pub fn kind(&self) -> DeviceType {
        self.kind
    }

    pub fn status(&self) -> DeviceStatus {
        self.status
    }

    pub fn set_status(&mut self, status: DeviceStatus) {
        self.status = status;
    }

    pub fn status_label(&self) -> &'static str {
        self.status.label()
    }

    pub fn type_label(&self) -> &'static str {
        self.kind.label()
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Append a comment; earlier comments are kept
    pub fn add_comment(&mut self, text: &str) {
        if !self.comment.is_empty() {
            self.comment.push_str(COMMENT_SEPARATOR);
        }
        self.comment.push_str(text);
    }

    pub fn buffer(&self) -> &DataBuffer {
        &self.buffer
    }

    /// Bytes written into the device buffer
    pub fn data_size(&self) -> usize {
        self.buffer.len()
    }

    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Append bytes to the device buffer within its capacity
    pub fn write_data(&mut self, data: &[u8]) -> DeviceResult<()> {
        self.buffer.append(data)?;
        Ok(())
    }

    /// Move this device's contents into a new value and tombstone `self`
    pub fn transfer(&mut self) -> Device {
        let moved = Device {
            id: self.id,
            kind: self.kind,
            status: self.status,
            comment: std::mem::take(&mut self.comment),
            buffer: self.buffer.transfer(),
        };
        self.tombstone();
        moved
    }

    /// Take over `source`'s contents, keeping this device's identifier,
    /// and tombstone `source`
    pub fn transfer_from(&mut self, source: &mut Device) {
        self.buffer.transfer_from(&mut source.buffer);
        self.kind = source.kind;
        self.status = source.status;
        self.comment = std::mem::take(&mut source.comment);
        source.tombstone();
        debug!(id = self.id, from = source.id, "device transfer-assigned");
    }

    fn tombstone(&mut self) {
        self.kind = DeviceType::GenericIo;
        self.status = DeviceStatus::Stopped;
        self.comment.clear();
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Device #{} -> Type: {} -> Status: {}",
            self.id,
            self.type_label(),
            self.status_label()
        )
    }
}

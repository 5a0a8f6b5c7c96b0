//! Error types for buffer and device operations.

use thiserror::Error;

use crate::ids::DeviceId;

/// Errors raised by [`DataBuffer`](crate::DataBuffer) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Capacity exceeded: required {required}, capacity {capacity}")]
    CapacityExceeded { required: usize, capacity: usize },
}

/// Result type for buffer operations.
pub type BufferResult<T> = Result<T, BufferError>;

/// Errors raised by device records and the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    #[error("Device not found: {0}")]
    NotFound(DeviceId),

    #[error("Device id already registered: {0}")]
    DuplicateId(DeviceId),

    #[error("Slot {slot} out of range (registry holds {len} devices)")]
    SlotOutOfRange { slot: usize, len: usize },

    #[error("Unknown label: {0}")]
    UnknownLabel(String),

    #[error(transparent)]
    Buffer(#[from] BufferError),
}

/// Result type for device operations.
pub type DeviceResult<T> = Result<T, DeviceError>;

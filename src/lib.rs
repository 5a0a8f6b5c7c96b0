//! Ownbuf - owning buffers with explicit copy and transfer
//!
//! Value types that exclusively own their storage:
//!
//! - [`DataBuffer`]: a fixed-size byte block. `clone()` duplicates the
//!   storage, [`DataBuffer::transfer`] hands it over and leaves the source
//!   emptied.
//! - [`Device`]: a record owning a `DataBuffer`, with an identifier from an
//!   injectable [`IdGenerator`], status and type label tables, and an
//!   append-only comment.
//! - [`DeviceRegistry`]: an ordered, lock-guarded list of owned devices.
//! - [`Message`]: plain and decorated log messages rendered through
//!   dynamic dispatch.
//!
//! # Example
//!
//! ```rust
//! use ownbuf::{DataBuffer, Device, DeviceStatus, DeviceType, SequentialIds};
//!
//! let mut buf = DataBuffer::with_capacity(10);
//! buf.replace("Hello");
//! assert_eq!(buf.len(), 5);
//!
//! let ids = SequentialIds::new();
//! let mut dev = Device::with_kind(&ids, DeviceType::Keyboard, DeviceStatus::Idle, 32);
//! dev.add_comment("attached");
//! let moved = dev.transfer();
//! assert_eq!(moved.comment(), "attached");
//! assert_eq!(dev.status(), DeviceStatus::Stopped);
//! ```

#![warn(clippy::all)]

pub mod buffer;
pub mod config;
pub mod device;
pub mod error;
pub mod ids;
pub mod ledger;
pub mod message;
pub mod registry;
pub mod telemetry;

pub use buffer::DataBuffer;
pub use config::{ConfigError, ConfigResult, OwnbufConfig};
pub use device::{Device, DeviceStatus, DeviceType, DEFAULT_DEVICE_CAPACITY};
pub use error::{BufferError, BufferResult, DeviceError, DeviceResult};
pub use ids::{global_ids, DeviceId, IdGenerator, SequentialIds};
pub use ledger::{AllocationLedger, LedgerStats};
pub use message::{write_log, DecoratedMessage, Message, PlainMessage};
pub use registry::{DeviceRegistry, DeviceSummary};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

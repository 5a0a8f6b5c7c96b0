//! Owning Byte Buffer
//!
//! `DataBuffer` owns a fixed-size block of bytes. Copying it duplicates the
//! storage; transferring it hands the storage to a new owner and leaves the
//! source *emptied* (no storage, capacity 0). Reading an emptied buffer
//! yields an empty view.
//!
//! # Example
//!
//! ```rust
//! use ownbuf::DataBuffer;
//!
//! let mut original = DataBuffer::from("Hello");
//! let copy = original.clone();
//! original.replace("World");
//! assert_eq!(copy.as_bytes(), b"Hello");
//!
//! let moved = original.transfer();
//! assert_eq!(moved.as_bytes(), b"World");
//! assert!(original.is_emptied());
//! assert_eq!(original.as_bytes(), b"");
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Add;
use std::sync::Arc;

use tracing::trace;

use crate::error::{BufferError, BufferResult};
use crate::ledger::AllocationLedger;

/// Memory-safe buffer that exclusively owns its storage
pub struct DataBuffer {
    storage: Option<Box<[u8]>>,
    len: usize,
    ledger: Option<Arc<AllocationLedger>>,
}

impl DataBuffer {
    /// Create an emptied buffer (no storage)
    pub fn new() -> Self {
        Self {
            storage: None,
            len: 0,
            ledger: None,
        }
    }

    /// Allocate zeroed storage of `capacity` bytes. Length starts at 0.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut buf = Self::new();
        buf.install(vec![0u8; capacity].into_boxed_slice(), 0);
        buf
    }

    /// Create a buffer from a slice (copies data)
    pub fn from_slice(data: &[u8]) -> Self {
        Self::from_vec(data.to_vec())
    }

    /// Create a buffer that adopts a Vec's contents
    pub fn from_vec(data: Vec<u8>) -> Self {
        let mut buf = Self::new();
        let len = data.len();
        buf.install(data.into_boxed_slice(), len);
        buf
    }

    /// Create a buffer from NUL-terminated bytes, keeping everything before
    /// the first NUL.
    pub fn from_nul_terminated(data: &[u8]) -> BufferResult<Self> {
        let end = data.iter().position(|&b| b == 0).ok_or_else(|| {
            BufferError::InvalidArgument("content has no NUL terminator".to_string())
        })?;
        Ok(Self::from_slice(&data[..end]))
    }

    /// Account this buffer's storage against `ledger`.
    ///
    /// Copies and concatenations made from this buffer are accounted
    /// against the same ledger.
    pub fn with_ledger(mut self, ledger: Arc<AllocationLedger>) -> Self {
        if let Some(storage) = &self.storage {
            if let Some(old) = &self.ledger {
                old.record_release(storage.len());
            }
            ledger.record_alloc(storage.len());
        }
        self.ledger = Some(ledger);
        self
    }

    /// Number of meaningful bytes
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the buffer holds no meaningful bytes
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Size of the owned storage, 0 when emptied
    pub fn capacity(&self) -> usize {
        self.storage.as_ref().map_or(0, |s| s.len())
    }

    /// True when the storage has been transferred away (or never allocated)
    pub fn is_emptied(&self) -> bool {
        self.storage.is_none()
    }

    /// Read-only view of the meaningful bytes
    pub fn as_bytes(&self) -> &[u8] {
        match &self.storage {
            Some(storage) => &storage[..self.len],
            None => &[],
        }
    }

    /// Try to view the buffer as a UTF-8 string slice
    pub fn as_str(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(self.as_bytes())
    }

    /// Get a byte at an index, `None` past the length
    pub fn get(&self, index: usize) -> Option<u8> {
        self.as_bytes().get(index).copied()
    }

    /// Release the current storage, then own a copy of `content`.
    pub fn replace(&mut self, content: impl AsRef<[u8]>) {
        let content = content.as_ref();
        self.release();
        self.install(Box::from(content), content.len());
        trace!(len = content.len(), "buffer replaced");
    }

    /// Write `data` at `offset` without growing the storage.
    ///
    /// `offset` must not be past the current length; the length grows to
    /// cover the written range.
    pub fn write_at(&mut self, offset: usize, data: &[u8]) -> BufferResult<()> {
        if offset > self.len {
            return Err(BufferError::InvalidArgument(format!(
                "offset {} is past length {}",
                offset, self.len
            )));
        }
        let capacity = self.capacity();
        let end = offset
            .checked_add(data.len())
            .filter(|&end| end <= capacity)
            .ok_or(BufferError::CapacityExceeded {
                required: offset.saturating_add(data.len()),
                capacity,
            })?;
        if let Some(storage) = self.storage.as_mut() {
            storage[offset..end].copy_from_slice(data);
        }
        self.len = self.len.max(end);
        Ok(())
    }

    /// Append `data` after the current length
    pub fn append(&mut self, data: &[u8]) -> BufferResult<()> {
        self.write_at(self.len, data)
    }

    /// Move the storage out into a new buffer, leaving `self` emptied.
    pub fn transfer(&mut self) -> Self {
        let moved = Self {
            storage: self.storage.take(),
            len: std::mem::take(&mut self.len),
            ledger: self.ledger.clone(),
        };
        trace!(len = moved.len, "buffer transferred");
        moved
    }

    /// Release own storage, then take over `source`'s storage.
    ///
    /// `source` is left emptied. Passing `self` as its own source cannot
    /// compile; `buf = buf.transfer()` is the self-transfer and leaves
    /// `buf` unchanged.
    pub fn transfer_from(&mut self, source: &mut DataBuffer) {
        self.release();
        self.storage = source.storage.take();
        self.len = std::mem::take(&mut source.len);
        self.ledger = source.ledger.clone();
        trace!(len = self.len, "buffer transfer-assigned");
    }

    /// Byte-wise concatenation of `self` followed by `other`
    pub fn concat(&self, other: &DataBuffer) -> DataBuffer {
        let mut bytes = Vec::with_capacity(self.len + other.len);
        bytes.extend_from_slice(self.as_bytes());
        bytes.extend_from_slice(other.as_bytes());
        let buf = Self::from_vec(bytes);
        match &self.ledger {
            Some(ledger) => buf.with_ledger(Arc::clone(ledger)),
            None => buf,
        }
    }

    /// Copy the meaningful bytes out into a Vec
    pub fn to_vec(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    fn install(&mut self, storage: Box<[u8]>, len: usize) {
        debug_assert!(self.storage.is_none());
        debug_assert!(len <= storage.len());
        if let Some(ledger) = &self.ledger {
            ledger.record_alloc(storage.len());
        }
        self.storage = Some(storage);
        self.len = len;
    }

    fn release(&mut self) {
        if let Some(storage) = self.storage.take() {
            if let Some(ledger) = &self.ledger {
                ledger.record_release(storage.len());
            }
        }
        self.len = 0;
    }
}

impl Default for DataBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for DataBuffer {
    fn clone(&self) -> Self {
        let mut copy = Self {
            storage: None,
            len: 0,
            ledger: self.ledger.clone(),
        };
        if let Some(storage) = &self.storage {
            copy.install(storage.clone(), self.len);
        }
        trace!(len = self.len, "buffer copied");
        copy
    }
}

impl Drop for DataBuffer {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for DataBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataBuffer")
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .field("emptied", &self.is_emptied())
            .finish()
    }
}

impl From<&[u8]> for DataBuffer {
    fn from(data: &[u8]) -> Self {
        Self::from_slice(data)
    }
}

impl From<Vec<u8>> for DataBuffer {
    fn from(data: Vec<u8>) -> Self {
        Self::from_vec(data)
    }
}

impl From<&str> for DataBuffer {
    fn from(s: &str) -> Self {
        Self::from_slice(s.as_bytes())
    }
}

impl From<String> for DataBuffer {
    fn from(s: String) -> Self {
        Self::from_vec(s.into_bytes())
    }
}

impl AsRef<[u8]> for DataBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl PartialEq for DataBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for DataBuffer {}

impl Hash for DataBuffer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl Add<&DataBuffer> for &DataBuffer {
    type Output = DataBuffer;

    fn add(self, rhs: &DataBuffer) -> DataBuffer {
        self.concat(rhs)
    }
}

impl Add for DataBuffer {
    type Output = DataBuffer;

    fn add(self, rhs: DataBuffer) -> DataBuffer {
        self.concat(&rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        let buf = DataBuffer::from("Hello");
        assert_eq!(buf.len(), 5);
        assert_eq!(buf.capacity(), 5);
        assert_eq!(buf.as_bytes(), &[b'H', b'e', b'l', b'l', b'o']);
        assert_eq!(buf.as_str().unwrap(), "Hello");
    }

    #[test]
    fn test_with_capacity_then_replace() {
        let mut buf = DataBuffer::with_capacity(10);
        assert_eq!(buf.capacity(), 10);
        assert!(buf.is_empty());
        assert!(!buf.is_emptied());

        buf.replace("Hello");
        assert_eq!(buf.len(), 5);
        assert_eq!(buf.capacity(), 5);
        assert_eq!(buf.as_str().unwrap(), "Hello");
    }

    #[test]
    fn test_emptied_reads_empty() {
        let buf = DataBuffer::new();
        assert!(buf.is_emptied());
        assert_eq!(buf.capacity(), 0);
        assert_eq!(buf.as_bytes(), b"");
        assert_eq!(buf.get(0), None);

        let zero = DataBuffer::with_capacity(0);
        assert!(!zero.is_emptied());
        assert_eq!(zero.as_bytes(), b"");
    }

    #[test]
    fn test_transfer_empties_source() {
        let mut src = DataBuffer::from("Hello");
        let dest = src.transfer();
        assert_eq!(dest.as_str().unwrap(), "Hello");
        assert!(src.is_emptied());
        assert_eq!(src.len(), 0);
        assert_eq!(src.as_bytes(), b"");
    }

    #[test]
    fn test_transfer_from_releases_then_takes() {
        let ledger = AllocationLedger::new();
        let mut dest = DataBuffer::from("old").with_ledger(ledger.clone());
        let mut src = DataBuffer::from("new").with_ledger(ledger.clone());
        assert_eq!(ledger.live(), 2);

        dest.transfer_from(&mut src);
        assert_eq!(dest.as_str().unwrap(), "new");
        assert!(src.is_emptied());
        assert_eq!(ledger.live(), 1);

        drop(src);
        assert_eq!(ledger.live(), 1);
        drop(dest);
        assert!(ledger.is_balanced());
    }

    #[test]
    fn test_self_transfer_is_noop() {
        let mut buf = DataBuffer::from("Hello");
        buf = buf.transfer();
        assert_eq!(buf.as_str().unwrap(), "Hello");
        assert_eq!(buf.capacity(), 5);
    }

    #[test]
    fn test_write_at_within_capacity() {
        let mut buf = DataBuffer::with_capacity(8);
        buf.write_at(0, b"abc").unwrap();
        buf.append(b"de").unwrap();
        assert_eq!(buf.as_bytes(), b"abcde");

        buf.write_at(1, b"XY").unwrap();
        assert_eq!(buf.as_bytes(), b"aXYde");
        assert_eq!(buf.len(), 5);
    }

    #[test]
    fn test_write_at_rejects_overflow() {
        let mut buf = DataBuffer::with_capacity(4);
        let err = buf.write_at(0, b"hello").unwrap_err();
        assert_eq!(
            err,
            BufferError::CapacityExceeded {
                required: 5,
                capacity: 4
            }
        );
        assert!(buf.is_empty());

        let err = buf.write_at(2, b"x").unwrap_err();
        assert!(matches!(err, BufferError::InvalidArgument(_)));

        let mut emptied = DataBuffer::new();
        assert!(emptied.append(b"x").is_err());
    }

    #[test]
    fn test_from_nul_terminated() {
        let buf = DataBuffer::from_nul_terminated(b"Input\0trailing").unwrap();
        assert_eq!(buf.as_str().unwrap(), "Input");

        let err = DataBuffer::from_nul_terminated(b"no terminator").unwrap_err();
        assert!(matches!(err, BufferError::InvalidArgument(_)));
    }

    #[test]
    fn test_concat() {
        let a = DataBuffer::from("Hello, ");
        let b = DataBuffer::from("World!");
        let joined = &a + &b;
        assert_eq!(joined.as_str().unwrap(), "Hello, World!");
        assert_eq!(a.as_str().unwrap(), "Hello, ");

        let emptied = DataBuffer::new();
        assert_eq!((&emptied + &b).as_bytes(), b"World!");
        assert_eq!((a + emptied).as_bytes(), b"Hello, ");
    }

    #[test]
    fn test_value_equality() {
        let a = DataBuffer::from("same");
        let b = DataBuffer::from(String::from("same"));
        assert_eq!(a, b);
        assert_ne!(a, DataBuffer::from("other"));
        assert_eq!(DataBuffer::new(), DataBuffer::with_capacity(3));
    }
}

//! # Wire Encoding Helpers
//!
//! Big-endian byte cursor for the fixed-order wire formats used by the
//! approval validator. Every field is read at an explicit width; there is
//! no tagging, no padding, and no variable-length integer scheme.

use crate::entities::{Address, Hash, U256};
use thiserror::Error;

/// Decode failure for a fixed-order wire payload.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum DecodeError {
    /// Payload ended before a required field.
    #[error("Truncated payload: needed {needed} more bytes at offset {offset}")]
    Truncated {
        /// Offset at which the read was attempted.
        offset: usize,
        /// Bytes still required by the read.
        needed: usize,
    },

    /// Payload has bytes left over after the last field.
    #[error("Trailing bytes: {remaining} bytes after final field")]
    TrailingBytes {
        /// Number of unread bytes.
        remaining: usize,
    },

    /// A declared length field exceeds a hard limit.
    #[error("Length field out of range: {value} (max {max})")]
    LengthOutOfRange {
        /// Declared value.
        value: usize,
        /// Maximum allowed.
        max: usize,
    },
}

/// Forward-only reader over a byte slice.
///
/// Reads are bounds-checked; a failed read leaves the cursor unchanged.
#[derive(Debug)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    /// Wrap a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Current read offset.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Take `n` raw bytes.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < n {
            return Err(DecodeError::Truncated {
                offset: self.offset,
                needed: n - self.remaining(),
            });
        }
        let out = &self.data[self.offset..self.offset + n];
        self.offset += n;
        Ok(out)
    }

    /// Read a big-endian `u16`.
    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    /// Read a big-endian `u64`.
    pub fn read_u64(&mut self) -> Result<u64, DecodeError> {
        let b = self.take(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(b);
        Ok(u64::from_be_bytes(buf))
    }

    /// Read a big-endian `U256` (32 bytes).
    pub fn read_u256(&mut self) -> Result<U256, DecodeError> {
        let b = self.take(32)?;
        Ok(U256::from_big_endian(b))
    }

    /// Read a 32-byte hash.
    pub fn read_hash(&mut self) -> Result<Hash, DecodeError> {
        let b = self.take(32)?;
        let mut h = [0u8; 32];
        h.copy_from_slice(b);
        Ok(h)
    }

    /// Read a 20-byte address.
    pub fn read_address(&mut self) -> Result<Address, DecodeError> {
        let b = self.take(20)?;
        let mut a = [0u8; 20];
        a.copy_from_slice(b);
        Ok(a)
    }

    /// Require that every byte has been consumed.
    pub fn finish(&self) -> Result<(), DecodeError> {
        if self.remaining() != 0 {
            return Err(DecodeError::TrailingBytes {
                remaining: self.remaining(),
            });
        }
        Ok(())
    }
}

/// Append a `U256` as 32 big-endian bytes.
pub fn put_u256(out: &mut Vec<u8>, value: &U256) {
    let mut buf = [0u8; 32];
    value.to_big_endian(&mut buf);
    out.extend_from_slice(&buf);
}

/// Append a `u64` as 8 big-endian bytes.
pub fn put_u64(out: &mut Vec<u8>, value: u64) {
    out.extend_from_slice(&value.to_be_bytes());
}

/// Append a `u16` as 2 big-endian bytes.
pub fn put_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

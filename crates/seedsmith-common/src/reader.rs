//! Binary reader for zero-copy parsing of byte slices.
//!
//! This module provides [`BinaryReader`], a cursor-like type that reads
//! little-endian values and 7-bit length-prefixed strings from a byte slice
//! without copying.

use byteorder::{ByteOrder, LittleEndian};
use zerocopy::FromBytes;

use crate::varint::MAX_7BIT_ENCODED_LEN;
use crate::{Error, Result};

/// A binary reader that provides zero-copy reading from a byte slice.
///
/// Every read is bounds-checked: running off the end of the buffer is an
/// [`Error::UnexpectedEof`], never a zero fill.
///
/// # Example
///
/// ```
/// use seedsmith_common::BinaryReader;
///
/// let data = [0x04, 0x00, 0x00, 0x00, 0x03, b'a', b'b', b'c'];
/// let mut reader = BinaryReader::new(&data);
///
/// assert_eq!(reader.read_i32().unwrap(), 4);
/// assert_eq!(reader.read_prefixed_bytes().unwrap(), b"abc");
/// assert!(reader.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BinaryReader<'a> {
    /// Create a new reader from a byte slice.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Create a new reader starting at a specific position.
    #[inline]
    pub const fn new_at(data: &'a [u8], position: usize) -> Self {
        Self { data, position }
    }

    /// Get the current position in the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Get the number of bytes remaining to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Check if there are no more bytes to read.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Seek to an absolute position.
    #[inline]
    pub fn seek(&mut self, position: usize) {
        self.position = position;
    }

    /// Peek at bytes without advancing the position.
    #[inline]
    pub fn peek_bytes(&self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(Error::UnexpectedEof {
                offset: self.position,
                needed: count,
                available: self.remaining(),
            });
        }
        Ok(&self.data[self.position..self.position + count])
    }

    /// Read bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(count)?;
        self.position += count;
        Ok(bytes)
    }

    /// Skip exactly `count` bytes, failing if fewer remain.
    #[inline]
    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.read_bytes(count).map(|_| ())
    }

    /// Read a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_bytes(1).map(|b| b[0])
    }

    /// Read a little-endian i32.
    #[inline]
    pub fn read_i32(&mut self) -> Result<i32> {
        self.read_bytes(4).map(LittleEndian::read_i32)
    }

    /// Peek at a little-endian i32 without advancing.
    #[inline]
    pub fn peek_i32(&self) -> Result<i32> {
        self.peek_bytes(4).map(LittleEndian::read_i32)
    }

    /// Read a struct using zerocopy.
    ///
    /// The struct must implement `FromBytes` from the zerocopy crate.
    #[inline]
    pub fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let offset = self.position;
        let bytes = self.read_bytes(size)?;
        T::read_from_bytes(bytes).map_err(|_| Error::UnexpectedEof {
            offset,
            needed: size,
            available: bytes.len(),
        })
    }

    /// Read a 7-bit encoded unsigned integer.
    ///
    /// Each byte carries seven value bits, least significant group first; the
    /// high bit marks a continuation. At most five bytes are accepted and the
    /// fifth may only carry the top four bits of a `u32`.
    pub fn read_7bit_encoded_u32(&mut self) -> Result<u32> {
        let offset = self.position;
        let mut value = 0u32;

        for index in 0..MAX_7BIT_ENCODED_LEN {
            let byte = self.read_u8()?;

            if index == MAX_7BIT_ENCODED_LEN - 1 && byte > 0x0F {
                return Err(if byte & 0x80 != 0 {
                    Error::VarIntTooLong { offset }
                } else {
                    Error::VarIntOverflow { offset }
                });
            }

            value |= u32::from(byte & 0x7F) << (7 * index);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }

        Err(Error::VarIntTooLong { offset })
    }

    /// Read a string prefixed by its 7-bit encoded byte length.
    ///
    /// The bytes are returned raw; callers decide how to interpret them.
    pub fn read_prefixed_bytes(&mut self) -> Result<&'a [u8]> {
        let length = self.read_7bit_encoded_u32()? as usize;
        self.read_bytes(length)
    }
}

//! Bounds-checked integer reads from an in-memory buffer.
//!
//! Every calculator reads header fields through these helpers, so a short or
//! truncated buffer turns into [`ParseError::Truncated`] instead of a panic.

use crate::error::ParseError;

/// Byte order (endianness) of multi-byte values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian ("II" = Intel)
    LittleEndian,
    /// Big-endian ("MM" = Motorola)
    BigEndian,
}

impl ByteOrder {
    /// Read a u16 at `offset` using this byte order.
    #[inline]
    pub fn read_u16(self, data: &[u8], offset: usize) -> Result<u16, ParseError> {
        match self {
            ByteOrder::LittleEndian => read_u16_le(data, offset),
            ByteOrder::BigEndian => read_u16_be(data, offset),
        }
    }

    /// Read a u32 at `offset` using this byte order.
    #[inline]
    pub fn read_u32(self, data: &[u8], offset: usize) -> Result<u32, ParseError> {
        match self {
            ByteOrder::LittleEndian => read_u32_le(data, offset),
            ByteOrder::BigEndian => read_u32_be(data, offset),
        }
    }

    /// Read a u64 at `offset` using this byte order.
    #[inline]
    pub fn read_u64(self, data: &[u8], offset: usize) -> Result<u64, ParseError> {
        match self {
            ByteOrder::LittleEndian => read_u64_le(data, offset),
            ByteOrder::BigEndian => read_u64_be(data, offset),
        }
    }
}

/// Borrow `len` bytes starting at `offset`.
#[inline]
pub fn slice_at(data: &[u8], offset: usize, len: usize) -> Result<&[u8], ParseError> {
    offset
        .checked_add(len)
        .and_then(|end| data.get(offset..end))
        .ok_or(ParseError::Truncated {
            offset,
            needed: len,
            available: data.len(),
        })
}

#[inline]
fn array_at<const N: usize>(data: &[u8], offset: usize) -> Result<[u8; N], ParseError> {
    let bytes = slice_at(data, offset, N)?;
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    Ok(out)
}

/// Read a single byte.
#[inline]
pub fn read_u8(data: &[u8], offset: usize) -> Result<u8, ParseError> {
    Ok(array_at::<1>(data, offset)?[0])
}

/// Read a little-endian u16.
#[inline]
pub fn read_u16_le(data: &[u8], offset: usize) -> Result<u16, ParseError> {
    array_at(data, offset).map(u16::from_le_bytes)
}

/// Read a big-endian u16.
#[inline]
pub fn read_u16_be(data: &[u8], offset: usize) -> Result<u16, ParseError> {
    array_at(data, offset).map(u16::from_be_bytes)
}

/// Read a little-endian 24-bit unsigned integer.
#[inline]
pub fn read_u24_le(data: &[u8], offset: usize) -> Result<u32, ParseError> {
    let [a, b, c] = array_at::<3>(data, offset)?;
    Ok(u32::from_le_bytes([a, b, c, 0]))
}

/// Read a little-endian u32.
#[inline]
pub fn read_u32_le(data: &[u8], offset: usize) -> Result<u32, ParseError> {
    array_at(data, offset).map(u32::from_le_bytes)
}

/// Read a big-endian u32.
#[inline]
pub fn read_u32_be(data: &[u8], offset: usize) -> Result<u32, ParseError> {
    array_at(data, offset).map(u32::from_be_bytes)
}

/// Read a little-endian i32.
#[inline]
pub fn read_i32_le(data: &[u8], offset: usize) -> Result<i32, ParseError> {
    array_at(data, offset).map(i32::from_le_bytes)
}

/// Read a little-endian u64.
#[inline]
pub fn read_u64_le(data: &[u8], offset: usize) -> Result<u64, ParseError> {
    array_at(data, offset).map(u64::from_le_bytes)
}

/// Read a big-endian u64.
#[inline]
pub fn read_u64_be(data: &[u8], offset: usize) -> Result<u64, ParseError> {
    array_at(data, offset).map(u64::from_be_bytes)
}

/// Check whether `data` holds `pattern` at `offset`. Short input never matches.
#[inline]
pub fn has_bytes_at(data: &[u8], offset: usize, pattern: &[u8]) -> bool {
    slice_at(data, offset, pattern.len()).is_ok_and(|bytes| bytes == pattern)
}

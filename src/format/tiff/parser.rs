//! TIFF header and IFD parsing over an in-memory buffer.
//!
//! # TIFF Header Structure
//!
//! ## Classic TIFF (8 bytes)
//! ```text
//! Bytes 0-1: Byte order (0x4949 = little-endian "II", 0x4D4D = big-endian "MM")
//! Bytes 2-3: Version (42 = 0x002A)
//! Bytes 4-7: Offset to first IFD (4 bytes)
//! ```
//!
//! ## BigTIFF (16 bytes)
//! ```text
//! Bytes 0-1: Byte order (0x4949 = little-endian "II", 0x4D4D = big-endian "MM")
//! Bytes 2-3: Version (43 = 0x002B)
//! Bytes 4-5: Offset byte size (must be 8)
//! Bytes 6-7: Reserved (must be 0)
//! Bytes 8-15: Offset to first IFD (8 bytes)
//! ```

use crate::error::{ParseError, TiffError};
use crate::io::ByteOrder;

use super::tags::{FieldType, TiffTag};

// =============================================================================
// Constants
// =============================================================================

/// Magic bytes indicating little-endian byte order ("II" for Intel)
const BYTE_ORDER_LITTLE_ENDIAN: u16 = 0x4949;

/// Magic bytes indicating big-endian byte order ("MM" for Motorola)
const BYTE_ORDER_BIG_ENDIAN: u16 = 0x4D4D;

/// Version number for classic TIFF
const VERSION_TIFF: u16 = 42;

/// Version number for BigTIFF
const VERSION_BIGTIFF: u16 = 43;

/// Size of classic TIFF header in bytes
pub const TIFF_HEADER_SIZE: usize = 8;

/// Size of BigTIFF header in bytes
pub const BIGTIFF_HEADER_SIZE: usize = 16;

// =============================================================================
// TiffHeader
// =============================================================================

/// Parsed TIFF header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiffHeader {
    /// Byte order for all multi-byte values
    pub byte_order: ByteOrder,

    /// Whether this is a BigTIFF file (64-bit offsets)
    pub is_bigtiff: bool,

    /// Offset to the first IFD, relative to the start of the TIFF structure
    pub first_ifd_offset: u64,
}

impl TiffHeader {
    /// Parse a TIFF header from the start of `bytes`.
    ///
    /// The first IFD offset must point inside `bytes`.
    ///
    /// # Errors
    /// - `InvalidMagic` if byte order bytes are not II or MM
    /// - `InvalidVersion` if version is not 42 or 43
    /// - `InvalidBigTiffOffsetSize` if BigTIFF offset size is not 8
    /// - `FileTooSmall` if there aren't enough bytes for the header
    /// - `InvalidIfdOffset` if the first IFD offset is outside the buffer
    pub fn parse(bytes: &[u8]) -> Result<Self, TiffError> {
        let available = bytes.len() as u64;

        if bytes.len() < TIFF_HEADER_SIZE {
            return Err(TiffError::FileTooSmall {
                required: TIFF_HEADER_SIZE as u64,
                actual: available,
            });
        }

        // Read as little-endian: we are checking for a byte pattern
        let magic = u16::from_le_bytes([bytes[0], bytes[1]]);
        let byte_order = match magic {
            BYTE_ORDER_LITTLE_ENDIAN => ByteOrder::LittleEndian,
            BYTE_ORDER_BIG_ENDIAN => ByteOrder::BigEndian,
            _ => return Err(TiffError::InvalidMagic(magic)),
        };

        let version = read_header_u16(byte_order, bytes, 2);

        let (is_bigtiff, first_ifd_offset) = match version {
            VERSION_TIFF => (false, u64::from(read_header_u32(byte_order, bytes, 4))),
            VERSION_BIGTIFF => {
                if bytes.len() < BIGTIFF_HEADER_SIZE {
                    return Err(TiffError::FileTooSmall {
                        required: BIGTIFF_HEADER_SIZE as u64,
                        actual: available,
                    });
                }

                let offset_size = read_header_u16(byte_order, bytes, 4);
                if offset_size != 8 {
                    return Err(TiffError::InvalidBigTiffOffsetSize(offset_size));
                }

                (true, read_header_u64(byte_order, bytes, 8))
            }
            _ => return Err(TiffError::InvalidVersion(version)),
        };

        if first_ifd_offset >= available {
            return Err(TiffError::InvalidIfdOffset(first_ifd_offset));
        }

        Ok(TiffHeader {
            byte_order,
            is_bigtiff,
            first_ifd_offset,
        })
    }

    /// Size of an IFD entry in bytes.
    ///
    /// Classic TIFF: 12 bytes (2 tag + 2 type + 4 count + 4 value/offset)
    /// BigTIFF: 20 bytes (2 tag + 2 type + 8 count + 8 value/offset)
    #[inline]
    pub const fn ifd_entry_size(&self) -> usize {
        if self.is_bigtiff {
            20
        } else {
            12
        }
    }

    /// Size of the entry count field at the start of an IFD.
    #[inline]
    pub const fn ifd_count_size(&self) -> usize {
        if self.is_bigtiff {
            8
        } else {
            2
        }
    }
}

// The header length was checked by the caller, so these reads cannot fail.
fn read_header_u16(order: ByteOrder, bytes: &[u8], offset: usize) -> u16 {
    order.read_u16(bytes, offset).unwrap_or_default()
}

fn read_header_u32(order: ByteOrder, bytes: &[u8], offset: usize) -> u32 {
    order.read_u32(bytes, offset).unwrap_or_default()
}

fn read_header_u64(order: ByteOrder, bytes: &[u8], offset: usize) -> u64 {
    order.read_u64(bytes, offset).unwrap_or_default()
}

// =============================================================================
// IFD
// =============================================================================

/// One entry of an Image File Directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IfdEntry {
    /// Raw tag ID
    pub tag: u16,

    /// Field type, `None` for types we don't read
    pub field_type: Option<FieldType>,

    /// Number of values
    pub count: u64,

    /// Buffer position of the value/offset field
    value_pos: usize,
}

impl IfdEntry {
    /// Read the first value of an integer entry.
    ///
    /// Handles both inline values and values stored at an offset.
    pub fn first_u64(&self, data: &[u8], header: &TiffHeader) -> Result<u64, ParseError> {
        let field_type = match self.field_type {
            Some(t) if t.is_integer() && self.count > 0 => t,
            _ => {
                return Err(TiffError::InvalidTagValue {
                    tag: tag_name(self.tag),
                    message: format!(
                        "expected an integer value, got type {:?} x{}",
                        self.field_type, self.count
                    ),
                }
                .into())
            }
        };

        let order = header.byte_order;
        let pos = if field_type.fits_inline(self.count, header.is_bigtiff) {
            self.value_pos
        } else {
            let offset = if header.is_bigtiff {
                order.read_u64(data, self.value_pos)?
            } else {
                u64::from(order.read_u32(data, self.value_pos)?)
            };
            usize::try_from(offset).map_err(|_| TiffError::InvalidIfdOffset(offset))?
        };

        let value = match field_type {
            FieldType::Byte => u64::from(crate::io::endian::read_u8(data, pos)?),
            FieldType::Short => u64::from(order.read_u16(data, pos)?),
            FieldType::Long => u64::from(order.read_u32(data, pos)?),
            _ => order.read_u64(data, pos)?,
        };
        Ok(value)
    }
}

fn tag_name(tag: u16) -> &'static str {
    TiffTag::from_u16(tag).map_or("unknown tag", TiffTag::name)
}

/// A parsed Image File Directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ifd {
    pub entries: Vec<IfdEntry>,
}

impl Ifd {
    /// Parse the IFD at `offset`.
    ///
    /// Entries that run past the end of the buffer are dropped: the buffer is
    /// a bounded prefix and the tags needed may still be among the ones read.
    pub fn parse(data: &[u8], offset: u64, header: &TiffHeader) -> Result<Self, ParseError> {
        let start = usize::try_from(offset).map_err(|_| TiffError::InvalidIfdOffset(offset))?;
        let order = header.byte_order;

        let entry_count = if header.is_bigtiff {
            order.read_u64(data, start)?
        } else {
            u64::from(order.read_u16(data, start)?)
        };

        let entry_size = header.ifd_entry_size();
        let first_entry = start + header.ifd_count_size();
        let room = data.len().saturating_sub(first_entry) / entry_size;
        let count = usize::try_from(entry_count).unwrap_or(usize::MAX).min(room);

        let mut entries = Vec::with_capacity(count);
        for index in 0..count {
            let pos = first_entry + index * entry_size;
            let tag = order.read_u16(data, pos)?;
            let field_type = FieldType::from_u16(order.read_u16(data, pos + 2)?);

            let (count, value_pos) = if header.is_bigtiff {
                (order.read_u64(data, pos + 4)?, pos + 12)
            } else {
                (u64::from(order.read_u32(data, pos + 4)?), pos + 8)
            };

            entries.push(IfdEntry {
                tag,
                field_type,
                count,
                value_pos,
            });
        }

        Ok(Ifd { entries })
    }

    /// Get an entry by tag.
    pub fn get_entry_by_tag(&self, tag: TiffTag) -> Option<&IfdEntry> {
        self.entries.iter().find(|e| e.tag == tag.as_u16())
    }

    /// Read a required integer tag.
    pub fn required_u64(
        &self,
        data: &[u8],
        header: &TiffHeader,
        tag: TiffTag,
    ) -> Result<u64, ParseError> {
        self.get_entry_by_tag(tag)
            .ok_or(TiffError::MissingTag(tag.name()))?
            .first_u64(data, header)
    }
}

// =============================================================================
// Tests
// =============================================================================

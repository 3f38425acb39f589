//! KTX texture size calculator.
//!
//! # KTX 1
//! ```text
//! Bytes 0-11:  AB 4B 54 58 20 31 31 BB 0D 0A 1A 0A ("«KTX 11»\r\n\x1A\n")
//! Bytes 12-15: Endianness (0x04030201 in the file's byte order)
//! Bytes 36-39: pixelWidth
//! Bytes 40-43: pixelHeight
//! ```
//!
//! # KTX 2
//! ```text
//! Bytes 0-11:  AB 4B 54 58 20 32 30 BB 0D 0A 1A 0A ("«KTX 20»\r\n\x1A\n")
//! Bytes 20-23: pixelWidth (u32 LE)
//! Bytes 24-27: pixelHeight (u32 LE)
//! ```

use std::path::Path;

use crate::error::ParseError;
use crate::io::endian::{has_bytes_at, read_u32_le};
use crate::io::ByteOrder;
use crate::size::ImageInfo;

use super::{Calculator, ImageFormat};

const KTX1_VERSION: &[u8; 6] = b"KTX 11";
const KTX2_VERSION: &[u8; 6] = b"KTX 20";

const ENDIANNESS: u32 = 0x0403_0201;

pub fn matches(header: &[u8]) -> bool {
    header.first() == Some(&0xAB)
        && (has_bytes_at(header, 1, KTX1_VERSION) || has_bytes_at(header, 1, KTX2_VERSION))
}

pub struct KtxCalculator;

impl Calculator for KtxCalculator {
    fn calculate(&self, data: &[u8], _path: Option<&Path>) -> Result<ImageInfo, ParseError> {
        if has_bytes_at(data, 1, KTX2_VERSION) {
            let width = read_u32_le(data, 20)?;
            let height = read_u32_le(data, 24)?;
            return Ok(ImageInfo::new(width, height).with_format(ImageFormat::Ktx2));
        }

        let byte_order = if ByteOrder::LittleEndian.read_u32(data, 12)? == ENDIANNESS {
            ByteOrder::LittleEndian
        } else if ByteOrder::BigEndian.read_u32(data, 12)? == ENDIANNESS {
            ByteOrder::BigEndian
        } else {
            return Err(ParseError::malformed("KTX", "invalid endianness marker"));
        };

        let width = byte_order.read_u32(data, 36)?;
        let height = byte_order.read_u32(data, 40)?;
        Ok(ImageInfo::new(width, height))
    }
}

//! JPEG XL size calculators (ISO-BMFF container and bare codestream).
//!
//! The codestream begins with `FF 0A` followed by a bit-packed `SizeHeader`.
//! Fields are read least-significant bit first:
//!
//! ```text
//! small (1 bit)
//!   small:  ysize = (u(5) + 1) * 8
//!   !small: ysize = U32(u(9), u(13), u(18), u(30)) + 1
//! ratio (3 bits)
//!   0: xsize is coded like ysize
//!   1..=7: xsize = ysize * 1, 12/10, 4/3, 3/2, 16/9, 5/4, 2
//! ```

use std::path::Path;

use crate::error::ParseError;
use crate::size::ImageInfo;

use super::isobmff::find_box;
use super::Calculator;

/// The 12-byte JPEG XL container signature box
pub const CONTAINER_SIGNATURE: [u8; 12] = [
    0x00, 0x00, 0x00, 0x0C, b'J', b'X', b'L', b' ', 0x0D, 0x0A, 0x87, 0x0A,
];

/// Bare codestream signature
pub const CODESTREAM_SIGNATURE: [u8; 2] = [0xFF, 0x0A];

/// (numerator, denominator) for ratio codes 1..=7
const RATIOS: [(u64, u64); 7] = [(1, 1), (12, 10), (4, 3), (3, 2), (16, 9), (5, 4), (2, 1)];

/// Bit widths selectable by the 2-bit selector of a size `U32` field
const SIZE_BITS: [u32; 4] = [9, 13, 18, 30];

pub fn matches_container(header: &[u8]) -> bool {
    header.starts_with(&CONTAINER_SIGNATURE)
}

pub fn matches_codestream(header: &[u8]) -> bool {
    header.starts_with(&CODESTREAM_SIGNATURE)
}

// =============================================================================
// Bit reader
// =============================================================================

/// LSB-first bit reader over a byte slice.
struct BitReader<'a> {
    data: &'a [u8],
    bit_pos: usize,
}

impl<'a> BitReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, bit_pos: 0 }
    }

    fn read(&mut self, bits: u32) -> Result<u64, ParseError> {
        let mut value = 0u64;
        for i in 0..bits {
            let byte_index = self.bit_pos / 8;
            let byte = *self.data.get(byte_index).ok_or(ParseError::Truncated {
                offset: byte_index,
                needed: 1,
                available: 0,
            })?;
            let bit = (byte >> (self.bit_pos % 8)) & 1;
            value |= u64::from(bit) << i;
            self.bit_pos += 1;
        }
        Ok(value)
    }

    fn read_size(&mut self, small: bool) -> Result<u64, ParseError> {
        if small {
            Ok((self.read(5)? + 1) * 8)
        } else {
            let selector = self.read(2)? as usize;
            Ok(self.read(SIZE_BITS[selector])? + 1)
        }
    }
}

/// Decode the `SizeHeader` that follows the `FF 0A` codestream signature.
fn codestream_size(codestream: &[u8]) -> Result<ImageInfo, ParseError> {
    if !matches_codestream(codestream) {
        return Err(ParseError::InvalidSignature("JPEG XL codestream signature"));
    }

    let mut bits = BitReader::new(&codestream[2..]);
    let small = bits.read(1)? == 1;
    let height = bits.read_size(small)?;
    let ratio = bits.read(3)? as usize;
    let width = match ratio {
        0 => bits.read_size(small)?,
        n => {
            let (num, den) = RATIOS[n - 1];
            height * num / den
        }
    };

    let to_u32 = |value: u64| {
        u32::try_from(value)
            .map_err(|_| ParseError::malformed("JPEG XL", format!("size {} out of range", value)))
    };
    Ok(ImageInfo::new(to_u32(width)?, to_u32(height)?))
}

// =============================================================================
// Calculators
// =============================================================================

/// Bare `FF 0A` codestream.
pub struct JxlStreamCalculator;

impl Calculator for JxlStreamCalculator {
    fn calculate(&self, data: &[u8], _path: Option<&Path>) -> Result<ImageInfo, ParseError> {
        codestream_size(data)
    }
}

/// ISO-BMFF container holding the codestream in `jxlc` or split across `jxlp`.
pub struct JxlCalculator;

impl Calculator for JxlCalculator {
    fn calculate(&self, data: &[u8], _path: Option<&Path>) -> Result<ImageInfo, ParseError> {
        if let Some(jxlc) = find_box(data, 0, data.len(), b"jxlc")? {
            return codestream_size(&data[jxlc.content_start().min(data.len())..]);
        }

        // Partial codestream boxes carry a 4-byte sequence index first
        if let Some(jxlp) = find_box(data, 0, data.len(), b"jxlp")? {
            let start = (jxlp.content_start() + 4).min(data.len());
            return codestream_size(&data[start..]);
        }

        Err(ParseError::MissingDimensions("JPEG XL container has no codestream box"))
    }
}

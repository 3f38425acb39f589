//! WebP size calculator.
//!
//! # Layout
//! ```text
//! Bytes 0-3:   "RIFF"
//! Bytes 4-7:   File size - 8 (u32 LE)
//! Bytes 8-11:  "WEBP"
//! Bytes 12-15: First chunk: "VP8 " (lossy), "VP8L" (lossless), "VP8X" (extended)
//! Bytes 16-19: Chunk size (u32 LE)
//! ```

use std::path::Path;

use crate::error::ParseError;
use crate::io::endian::{has_bytes_at, read_u16_le, read_u24_le, read_u32_le, read_u8};
use crate::size::ImageInfo;

use super::Calculator;

/// VP8 key frame start code
const VP8_START_CODE: [u8; 3] = [0x9D, 0x01, 0x2A];

/// VP8L signature byte
const VP8L_SIGNATURE: u8 = 0x2F;

pub fn matches(header: &[u8]) -> bool {
    header.starts_with(b"RIFF") && has_bytes_at(header, 8, b"WEBPVP8")
}

/// Extended format: canvas size stored as 24-bit "minus one" values.
fn vp8x_size(data: &[u8]) -> Result<ImageInfo, ParseError> {
    let flags = read_u8(data, 20)?;
    // bits 0 and 6-7 are reserved
    if flags & 0b1100_0001 != 0 {
        return Err(ParseError::malformed("WebP", format!("reserved VP8X flags set: {:#04x}", flags)));
    }
    let width = read_u24_le(data, 24)? + 1;
    let height = read_u24_le(data, 27)? + 1;
    Ok(ImageInfo::new(width, height))
}

/// Lossy format: 14-bit sizes after the key frame start code.
fn vp8_size(data: &[u8]) -> Result<ImageInfo, ParseError> {
    if !has_bytes_at(data, 23, &VP8_START_CODE) {
        return Err(ParseError::InvalidSignature("VP8 key frame start code"));
    }
    let width = read_u16_le(data, 26)? & 0x3FFF;
    let height = read_u16_le(data, 28)? & 0x3FFF;
    Ok(ImageInfo::new(u32::from(width), u32::from(height)))
}

/// Lossless format: two 14-bit "minus one" fields packed after the signature.
fn vp8l_size(data: &[u8]) -> Result<ImageInfo, ParseError> {
    if read_u8(data, 20)? != VP8L_SIGNATURE {
        return Err(ParseError::InvalidSignature("VP8L signature byte"));
    }
    let bits = read_u32_le(data, 21)?;
    let width = (bits & 0x3FFF) + 1;
    let height = ((bits >> 14) & 0x3FFF) + 1;
    Ok(ImageInfo::new(width, height))
}

pub struct WebpCalculator;

impl Calculator for WebpCalculator {
    fn calculate(&self, data: &[u8], _path: Option<&Path>) -> Result<ImageInfo, ParseError> {
        match read_u8(data, 15)? {
            b'X' => vp8x_size(data),
            b' ' => vp8_size(data),
            b'L' => vp8l_size(data),
            other => Err(ParseError::malformed(
                "WebP",
                format!("unknown chunk 'VP8{}'", char::from(other)),
            )),
        }
    }
}

//! PNG size calculator.
//!
//! # Layout
//! ```text
//! Bytes 0-7:   Signature 89 50 4E 47 0D 0A 1A 0A
//! Bytes 8-11:  IHDR chunk length
//! Bytes 12-15: "IHDR" (or "CgBI" for Apple-optimised PNGs, IHDR follows at 28)
//! Bytes 16-19: Width (u32 BE)
//! Bytes 20-23: Height (u32 BE)
//! ```

use std::path::Path;

use crate::error::ParseError;
use crate::io::endian::{has_bytes_at, read_u32_be};
use crate::size::ImageInfo;

use super::Calculator;

/// PNG file signature
pub const SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

const IHDR: &[u8; 4] = b"IHDR";

/// Apple "fried" PNG chunk, inserted before IHDR
const CGBI: &[u8; 4] = b"CgBI";

pub fn matches(header: &[u8]) -> bool {
    header.starts_with(&SIGNATURE)
}

pub struct PngCalculator;

impl Calculator for PngCalculator {
    fn calculate(&self, data: &[u8], _path: Option<&Path>) -> Result<ImageInfo, ParseError> {
        let chunk_start = if has_bytes_at(data, 12, CGBI) { 24 } else { 8 };

        if !has_bytes_at(data, chunk_start + 4, IHDR) {
            return Err(ParseError::InvalidSignature("PNG first chunk is not IHDR"));
        }

        let width = read_u32_be(data, chunk_start + 8)?;
        let height = read_u32_be(data, chunk_start + 12)?;
        Ok(ImageInfo::new(width, height))
    }
}

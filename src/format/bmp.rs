//! Windows bitmap size calculator.
//!
//! Width is a u32 LE at offset 18. Height is an i32 LE at offset 22; a
//! negative height marks a top-down bitmap, so its magnitude is used.

use std::path::Path;

use crate::error::ParseError;
use crate::io::endian::{read_i32_le, read_u32_le};
use crate::size::ImageInfo;

use super::Calculator;

pub fn matches(header: &[u8]) -> bool {
    header.starts_with(b"BM")
}

pub struct BmpCalculator;

impl Calculator for BmpCalculator {
    fn calculate(&self, data: &[u8], _path: Option<&Path>) -> Result<ImageInfo, ParseError> {
        let width = read_u32_le(data, 18)?;
        let height = read_i32_le(data, 22)?.unsigned_abs();
        Ok(ImageInfo::new(width, height))
    }
}

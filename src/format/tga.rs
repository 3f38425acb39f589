//! Truevision TGA size calculator.
//!
//! TGA has no magic number. The signature check requires a zero-length image
//! ID, no color map, and a known image type, which keeps arbitrary zeroed
//! buffers from being claimed as TGA.

use std::path::Path;

use crate::error::ParseError;
use crate::io::endian::{read_u16_le, read_u8};
use crate::size::ImageInfo;

use super::Calculator;

/// Size of the fixed TGA header
const HEADER_SIZE: usize = 18;

/// Color-mapped, true-color, grayscale, and their RLE variants
const IMAGE_TYPES: [u8; 6] = [1, 2, 3, 9, 10, 11];

pub fn matches(header: &[u8]) -> bool {
    if header.len() < HEADER_SIZE {
        return false;
    }

    let id_length = header[0];
    let color_map_type = header[1];
    let image_type = header[2];
    let color_map_length = u16::from_le_bytes([header[5], header[6]]);

    id_length == 0
        && color_map_type == 0
        && color_map_length == 0
        && IMAGE_TYPES.contains(&image_type)
}

/// Width (u16 LE) at 12, height (u16 LE) at 14.
pub struct TgaCalculator;

impl Calculator for TgaCalculator {
    fn calculate(&self, data: &[u8], _path: Option<&Path>) -> Result<ImageInfo, ParseError> {
        let image_type = read_u8(data, 2)?;
        if !IMAGE_TYPES.contains(&image_type) {
            return Err(ParseError::malformed(
                "TGA",
                format!("unknown image type {}", image_type),
            ));
        }

        let width = read_u16_le(data, 12)?;
        let height = read_u16_le(data, 14)?;
        Ok(ImageInfo::new(width.into(), height.into()))
    }
}

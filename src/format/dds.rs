use std::path::Path;

use crate::error::ParseError;
use crate::io::endian::read_u32_le;
use crate::size::ImageInfo;

use super::Calculator;

/// "DDS " magic
const MAGIC: &[u8; 4] = b"DDS ";

pub fn matches(header: &[u8]) -> bool {
    header.starts_with(MAGIC)
}

/// DirectDraw Surface: height (u32 LE) at 12, width (u32 LE) at 16.
pub struct DdsCalculator;

impl Calculator for DdsCalculator {
    fn calculate(&self, data: &[u8], _path: Option<&Path>) -> Result<ImageInfo, ParseError> {
        let height = read_u32_le(data, 12)?;
        let width = read_u32_le(data, 16)?;
        Ok(ImageInfo::new(width, height))
    }
}

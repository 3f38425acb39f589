use std::path::Path;

use crate::error::ParseError;
use crate::io::endian::read_u32_be;
use crate::size::ImageInfo;

use super::Calculator;

pub fn matches(header: &[u8]) -> bool {
    header.starts_with(b"8BPS")
}

/// Photoshop header: rows (u32 BE) at 14, columns (u32 BE) at 18.
pub struct PsdCalculator;

impl Calculator for PsdCalculator {
    fn calculate(&self, data: &[u8], _path: Option<&Path>) -> Result<ImageInfo, ParseError> {
        let height = read_u32_be(data, 14)?;
        let width = read_u32_be(data, 18)?;
        Ok(ImageInfo::new(width, height))
    }
}

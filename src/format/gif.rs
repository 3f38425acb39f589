use std::path::Path;

use crate::error::ParseError;
use crate::io::endian::read_u16_le;
use crate::size::ImageInfo;

use super::Calculator;

pub fn matches(header: &[u8]) -> bool {
    matches!(header.get(..6), Some([b'G', b'I', b'F', b'8', b'7' | b'9', b'a']))
}

/// Reads the logical screen size (u16 LE at 6 and 8).
pub struct GifCalculator;

impl Calculator for GifCalculator {
    fn calculate(&self, data: &[u8], _path: Option<&Path>) -> Result<ImageInfo, ParseError> {
        let width = read_u16_le(data, 6)?;
        let height = read_u16_le(data, 8)?;
        Ok(ImageInfo::new(width.into(), height.into()))
    }
}

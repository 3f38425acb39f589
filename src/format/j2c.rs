//! JPEG 2000 codestream size calculator.
//!
//! # Layout
//! ```text
//! Bytes 0-1:   SOC marker FF 4F
//! Bytes 2-3:   SIZ marker FF 51
//! Bytes 4-5:   Lsiz
//! Bytes 6-7:   Rsiz
//! Bytes 8-11:  Xsiz   (reference grid width)
//! Bytes 12-15: Ysiz   (reference grid height)
//! Bytes 16-19: XOsiz  (image area horizontal offset)
//! Bytes 20-23: YOsiz  (image area vertical offset)
//! ```

use std::path::Path;

use crate::error::ParseError;
use crate::io::endian::read_u32_be;
use crate::size::ImageInfo;

use super::Calculator;

/// SOC followed by SIZ
pub const SIGNATURE: [u8; 4] = [0xFF, 0x4F, 0xFF, 0x51];

pub fn matches(header: &[u8]) -> bool {
    header.starts_with(&SIGNATURE)
}

/// Size of the image area: the reference grid minus the image offset.
fn codestream_size(data: &[u8]) -> Result<ImageInfo, ParseError> {
    let grid_width = read_u32_be(data, 8)?;
    let grid_height = read_u32_be(data, 12)?;
    let x_offset = read_u32_be(data, 16)?;
    let y_offset = read_u32_be(data, 20)?;

    match (
        grid_width.checked_sub(x_offset),
        grid_height.checked_sub(y_offset),
    ) {
        (Some(width), Some(height)) => Ok(ImageInfo::new(width, height)),
        _ => Err(ParseError::malformed(
            "J2C",
            "image offset lies outside the reference grid",
        )),
    }
}

pub struct J2cCalculator;

impl Calculator for J2cCalculator {
    fn calculate(&self, data: &[u8], _path: Option<&Path>) -> Result<ImageInfo, ParseError> {
        codestream_size(data)
    }
}

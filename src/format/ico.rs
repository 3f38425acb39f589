//! Windows icon (ICO) and cursor (CUR) size calculators.
//!
//! ```text
//! Bytes 0-1: Reserved (0)
//! Bytes 2-3: Type (1 = icon, 2 = cursor, u16 LE)
//! Bytes 4-5: Image count (u16 LE)
//! Then 16-byte directory entries:
//!   Byte 0: Width (0 means 256)
//!   Byte 1: Height (0 means 256)
//! ```

use std::path::Path;

use crate::error::ParseError;
use crate::io::endian::{read_u16_le, read_u8};
use crate::size::{ImageDimensions, ImageInfo};

use super::Calculator;

const HEADER_SIZE: usize = 6;
const ENTRY_SIZE: usize = 16;

const TYPE_ICON: u16 = 1;
const TYPE_CURSOR: u16 = 2;

fn matches_type(header: &[u8], kind: u16) -> bool {
    read_u16_le(header, 0) == Ok(0)
        && read_u16_le(header, 2) == Ok(kind)
        && read_u16_le(header, 4).is_ok_and(|count| count > 0)
}

pub fn matches_ico(header: &[u8]) -> bool {
    matches_type(header, TYPE_ICON)
}

pub fn matches_cur(header: &[u8]) -> bool {
    matches_type(header, TYPE_CURSOR)
}

fn edge(byte: u8) -> u32 {
    if byte == 0 {
        256
    } else {
        u32::from(byte)
    }
}

fn directory_sizes(data: &[u8]) -> Result<ImageInfo, ParseError> {
    let count = read_u16_le(data, 4)? as usize;
    let images = (0..count)
        .map(|i| {
            let entry = HEADER_SIZE + ENTRY_SIZE * i;
            Ok(ImageDimensions::new(
                edge(read_u8(data, entry)?),
                edge(read_u8(data, entry + 1)?),
            ))
        })
        .collect::<Result<Vec<_>, ParseError>>()?;

    ImageInfo::from_images(images).ok_or(ParseError::MissingDimensions("icon directory is empty"))
}

pub struct IcoCalculator;

impl Calculator for IcoCalculator {
    fn calculate(&self, data: &[u8], _path: Option<&Path>) -> Result<ImageInfo, ParseError> {
        directory_sizes(data)
    }
}

pub struct CurCalculator;

impl Calculator for CurCalculator {
    fn calculate(&self, data: &[u8], _path: Option<&Path>) -> Result<ImageInfo, ParseError> {
        directory_sizes(data)
    }
}

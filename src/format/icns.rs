//! Apple Icon Image (ICNS) size calculator.
//!
//! ```text
//! Bytes 0-3: "icns"
//! Bytes 4-7: File length (u32 BE)
//! Then entries: type (4 bytes), length including this header (u32 BE), data
//! ```
//!
//! Icon dimensions are implied by the entry type. Entries with unknown types
//! (table of contents, metadata) are skipped.

use std::path::Path;

use crate::error::ParseError;
use crate::io::endian::{read_u32_be, slice_at};
use crate::size::{ImageDimensions, ImageInfo};

use super::Calculator;

pub const SIGNATURE: &[u8; 4] = b"icns";

const ENTRY_HEADER_SIZE: usize = 8;

/// Icon type to edge length in pixels
const ICON_TYPES: [(&[u8; 4], u32); 31] = [
    (b"ICON", 32),
    (b"ICN#", 32),
    (b"icm#", 16),
    (b"icm4", 16),
    (b"icm8", 16),
    (b"ics#", 16),
    (b"ics4", 16),
    (b"ics8", 16),
    (b"is32", 16),
    (b"s8mk", 16),
    (b"icp4", 16),
    (b"icl4", 32),
    (b"icl8", 32),
    (b"il32", 32),
    (b"l8mk", 32),
    (b"icp5", 32),
    (b"ic11", 32),
    (b"ich4", 48),
    (b"ich8", 48),
    (b"ih32", 48),
    (b"h8mk", 48),
    (b"icp6", 64),
    (b"ic12", 64),
    (b"it32", 128),
    (b"t8mk", 128),
    (b"ic07", 128),
    (b"ic08", 256),
    (b"ic13", 256),
    (b"ic09", 512),
    (b"ic14", 512),
    (b"ic10", 1024),
];

fn icon_size(kind: &[u8]) -> Option<u32> {
    ICON_TYPES
        .iter()
        .find(|(name, _)| name.as_slice() == kind)
        .map(|(_, size)| *size)
}

pub fn matches(header: &[u8]) -> bool {
    header.starts_with(SIGNATURE)
}

pub struct IcnsCalculator;

impl Calculator for IcnsCalculator {
    fn calculate(&self, data: &[u8], _path: Option<&Path>) -> Result<ImageInfo, ParseError> {
        let file_length = read_u32_be(data, 4)? as usize;
        let end = file_length.min(data.len());

        let mut images = Vec::new();
        let mut pos = ENTRY_HEADER_SIZE;
        while pos.saturating_add(ENTRY_HEADER_SIZE) <= end {
            let kind = slice_at(data, pos, 4)?;
            let length = read_u32_be(data, pos + 4)? as usize;
            if length < ENTRY_HEADER_SIZE {
                return Err(ParseError::malformed(
                    "ICNS",
                    format!("entry at {} has length {}", pos, length),
                ));
            }

            if let Some(size) = icon_size(kind) {
                images.push(ImageDimensions::new(size, size));
            }
            pos = pos.saturating_add(length);
        }

        ImageInfo::from_images(images).ok_or(ParseError::MissingDimensions("ICNS has no icon entries"))
    }
}

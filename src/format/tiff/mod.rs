//! TIFF size calculator.
//!
//! Handles classic TIFF and BigTIFF in either byte order. Dimensions come from
//! the ImageWidth/ImageLength tags of the first IFD; the Orientation tag is
//! reported when present. The same IFD reader parses EXIF blocks embedded in
//! JPEG files.
//!
//! # Key Concepts
//!
//! - **Byte order**: TIFF files declare their endianness (II = little-endian,
//!   MM = big-endian) in the header.
//!
//! - **Inline vs offset values**: Small values are stored inline in the IFD
//!   entry, larger values at an offset pointed to by the entry. Dimension
//!   values are almost always inline.

mod parser;
mod tags;

use std::path::Path;

use crate::error::{ParseError, TiffError};
use crate::size::ImageInfo;

use super::Calculator;

pub use parser::{Ifd, IfdEntry, TiffHeader, BIGTIFF_HEADER_SIZE, TIFF_HEADER_SIZE};
pub use tags::{FieldType, TiffTag};

/// Check if bytes start with a TIFF or BigTIFF header.
pub fn matches(header: &[u8]) -> bool {
    matches!(
        header.get(..4),
        Some([0x49, 0x49, 0x2A | 0x2B, 0x00] | [0x4D, 0x4D, 0x00, 0x2A | 0x2B])
    )
}

/// Read the orientation tag from a TIFF structure (EXIF payload).
///
/// Returns `None` when the tag is absent or outside the valid 1-8 range.
pub fn read_orientation(data: &[u8]) -> Result<Option<u8>, ParseError> {
    let header = TiffHeader::parse(data)?;
    let ifd = Ifd::parse(data, header.first_ifd_offset, &header)?;
    orientation_from_ifd(data, &header, &ifd)
}

fn orientation_from_ifd(
    data: &[u8],
    header: &TiffHeader,
    ifd: &Ifd,
) -> Result<Option<u8>, ParseError> {
    let Some(entry) = ifd.get_entry_by_tag(TiffTag::Orientation) else {
        return Ok(None);
    };

    let value = entry.first_u64(data, header)?;
    Ok(match value {
        1..=8 => Some(value as u8),
        _ => None,
    })
}

fn dimension(value: u64, tag: TiffTag) -> Result<u32, ParseError> {
    u32::try_from(value).map_err(|_| {
        TiffError::InvalidTagValue {
            tag: tag.name(),
            message: format!("{} does not fit in 32 bits", value),
        }
        .into()
    })
}

pub struct TiffCalculator;

impl Calculator for TiffCalculator {
    fn calculate(&self, data: &[u8], _path: Option<&Path>) -> Result<ImageInfo, ParseError> {
        let header = TiffHeader::parse(data)?;
        let ifd = Ifd::parse(data, header.first_ifd_offset, &header)?;

        let width = ifd.required_u64(data, &header, TiffTag::ImageWidth)?;
        let height = ifd.required_u64(data, &header, TiffTag::ImageLength)?;

        // A broken orientation tag doesn't make the dimensions wrong
        let orientation = orientation_from_ifd(data, &header, &ifd).unwrap_or(None);

        Ok(ImageInfo::new(
            dimension(width, TiffTag::ImageWidth)?,
            dimension(height, TiffTag::ImageLength)?,
        )
        .with_orientation(orientation))
    }
}

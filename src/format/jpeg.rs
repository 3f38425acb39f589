//! JPEG size calculator.
//!
//! A JPEG stream is a sequence of marker segments. The calculator walks them
//! from the SOI marker until it finds a Start Of Frame (SOFn) segment, which
//! carries the frame height and width. An EXIF APP1 segment seen on the way is
//! parsed for the orientation tag.
//!
//! ```text
//! FF D8                  SOI
//! FF En LL LL ...        APPn segment (length includes the two length bytes)
//! FF Cn LL LL P HH HH WW WW ...   SOFn: precision, height, width (u16 BE)
//! ```

use std::path::Path;

use tracing::debug;

use crate::error::ParseError;
use crate::io::endian::{has_bytes_at, read_u16_be, read_u8};
use crate::size::ImageInfo;

use super::{tiff, Calculator};

// =============================================================================
// JPEG Markers
// =============================================================================

/// Start Of Image marker
pub const SOI: [u8; 2] = [0xFF, 0xD8];

/// End Of Image marker
const EOI: u8 = 0xD9;

/// Start Of Scan marker
const SOS: u8 = 0xDA;

/// Temporary marker used in arithmetic coding
const TEM: u8 = 0x01;

/// Application segment 1 (EXIF) marker
const APP1: u8 = 0xE1;

/// Define Huffman Table marker (shares the SOFn range)
const DHT: u8 = 0xC4;

/// Reserved JPEG extension marker (shares the SOFn range)
const JPG: u8 = 0xC8;

/// Define Arithmetic Conditioning marker (shares the SOFn range)
const DAC: u8 = 0xCC;

const EXIF_HEADER: &[u8; 6] = b"Exif\0\0";

pub fn matches(header: &[u8]) -> bool {
    header.starts_with(&SOI) && header.get(2) == Some(&0xFF)
}

/// Markers that have no length field.
fn is_standalone(marker: u8) -> bool {
    matches!(marker, 0xD8 | TEM | 0xD0..=0xD7)
}

fn is_start_of_frame(marker: u8) -> bool {
    (0xC0..=0xCF).contains(&marker) && !matches!(marker, DHT | JPG | DAC)
}

/// Orientation from an EXIF APP1 payload. A broken EXIF block is ignored.
fn exif_orientation(data: &[u8], segment_start: usize, segment_end: usize) -> Option<u8> {
    let tiff_start = segment_start + 4 + EXIF_HEADER.len();
    let tiff_data = data.get(tiff_start..segment_end.min(data.len()))?;
    match tiff::read_orientation(tiff_data) {
        Ok(orientation) => orientation,
        Err(e) => {
            debug!("Ignoring unreadable EXIF block at {}: {}", segment_start, e);
            None
        }
    }
}

pub struct JpegCalculator;

impl Calculator for JpegCalculator {
    fn calculate(&self, data: &[u8], _path: Option<&Path>) -> Result<ImageInfo, ParseError> {
        let mut orientation = None;
        let mut pos = SOI.len();

        loop {
            if read_u8(data, pos)? != 0xFF {
                return Err(ParseError::malformed(
                    "JPEG",
                    format!("expected marker at offset {}", pos),
                ));
            }
            // fill bytes may precede any marker
            while read_u8(data, pos + 1)? == 0xFF {
                pos += 1;
            }

            let marker = read_u8(data, pos + 1)?;
            if is_standalone(marker) {
                pos += 2;
                continue;
            }
            if marker == EOI || marker == SOS {
                return Err(ParseError::MissingDimensions("JPEG has no frame header before scan data"));
            }

            let length = read_u16_be(data, pos + 2)? as usize;
            if length < 2 {
                return Err(ParseError::malformed(
                    "JPEG",
                    format!("segment {:#04x} has length {}", marker, length),
                ));
            }
            let segment_end = pos + 2 + length;

            if is_start_of_frame(marker) {
                let height = read_u16_be(data, pos + 5)?;
                let width = read_u16_be(data, pos + 7)?;
                return Ok(ImageInfo::new(u32::from(width), u32::from(height))
                    .with_orientation(orientation));
            }

            if marker == APP1 && orientation.is_none() && has_bytes_at(data, pos + 4, EXIF_HEADER) {
                orientation = exif_orientation(data, pos, segment_end);
            }

            pos = segment_end;
        }
    }
}

//! JPEG 2000 (JP2 container) size calculator.
//!
//! ```text
//! Box 'jP  ' (12 bytes): signature 0D 0A 87 0A
//! Box 'ftyp': brand 'jp2 ' (or 'jpx ')
//! Box 'jp2h' > 'ihdr': height (u32 BE), width (u32 BE), ...
//! ```

use std::path::Path;

use crate::error::ParseError;
use crate::io::endian::{has_bytes_at, read_u32_be};
use crate::size::ImageInfo;

use super::isobmff::find_box;
use super::Calculator;

/// The 12-byte JPEG 2000 signature box
pub const SIGNATURE_BOX: [u8; 12] = [
    0x00, 0x00, 0x00, 0x0C, b'j', b'P', b' ', b' ', 0x0D, 0x0A, 0x87, 0x0A,
];

pub fn matches(header: &[u8]) -> bool {
    header.starts_with(&SIGNATURE_BOX)
        && has_bytes_at(header, 16, b"ftyp")
        && (has_bytes_at(header, 20, b"jp2 ") || has_bytes_at(header, 20, b"jpx "))
}

pub struct Jp2Calculator;

impl Calculator for Jp2Calculator {
    fn calculate(&self, data: &[u8], _path: Option<&Path>) -> Result<ImageInfo, ParseError> {
        let jp2h = find_box(data, 0, data.len(), b"jp2h")?
            .ok_or(ParseError::MissingDimensions("JP2 has no 'jp2h' box"))?;
        let ihdr = find_box(data, jp2h.content_start(), jp2h.end(), b"ihdr")?
            .ok_or(ParseError::MissingDimensions("JP2 has no 'ihdr' box"))?;

        let height = read_u32_be(data, ihdr.content_start())?;
        let width = read_u32_be(data, ihdr.content_start() + 4)?;
        Ok(ImageInfo::new(width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::isobmff::tests::make_box;

    fn jp2_file(width: u32, height: u32) -> Vec<u8> {
        let mut data = SIGNATURE_BOX.to_vec();
        data.extend(make_box(b"ftyp", b"jp2 \0\0\0\0jp2 "));

        let mut ihdr = height.to_be_bytes().to_vec();
        ihdr.extend_from_slice(&width.to_be_bytes());
        ihdr.extend_from_slice(&[0, 3, 7, 7, 0, 0]); // components, bpc, c, unk, ipr
        let mut jp2h = make_box(b"ihdr", &ihdr);
        jp2h.extend(make_box(b"colr", &[1, 0, 0, 0, 0, 0, 16]));
        data.extend(make_box(b"jp2h", &jp2h));
        data.extend(make_box(b"jp2c", &[0xFF, 0x4F, 0xFF, 0x51]));
        data
    }

    #[test]
    fn test_matches() {
        assert!(matches(&jp2_file(1, 1)));
        assert!(!matches(&SIGNATURE_BOX));
    }

    #[test]
    fn test_calculate() {
        let info = Jp2Calculator.calculate(&jp2_file(2048, 1536), None).unwrap();
        assert_eq!((info.width, info.height), (2048, 1536));
    }

    #[test]
    fn test_missing_header_box() {
        let mut data = SIGNATURE_BOX.to_vec();
        data.extend(make_box(b"ftyp", b"jp2 \0\0\0\0jp2 "));
        assert!(matches!(
            Jp2Calculator.calculate(&data, None),
            Err(ParseError::MissingDimensions(_))
        ));
    }
}

//! HEIF family size calculator (HEIC, AVIF).
//!
//! The detector matches an `ftyp` box with a known brand and reports `Heif`.
//! The calculator narrows the format to `Avif` or `Heic` from the major and
//! compatible brands, then collects `ispe` (image spatial extent) properties
//! from `meta/iprp/ipco`. The first one belongs to the primary item.

use std::path::Path;

use crate::error::ParseError;
use crate::io::endian::{has_bytes_at, read_u32_be, slice_at};
use crate::size::{ImageDimensions, ImageInfo};

use super::isobmff::{find_box, BoxHeader};
use super::{Calculator, ImageFormat};

/// Known `ftyp` brands and the format each one implies.
const BRANDS: [(&[u8; 4], ImageFormat); 8] = [
    (b"avif", ImageFormat::Avif),
    (b"avis", ImageFormat::Avif),
    (b"mif1", ImageFormat::Heif),
    (b"msf1", ImageFormat::Heif),
    (b"heic", ImageFormat::Heic),
    (b"heix", ImageFormat::Heic),
    (b"hevc", ImageFormat::Heic),
    (b"hevx", ImageFormat::Heic),
];

fn brand_format(brand: &[u8]) -> Option<ImageFormat> {
    BRANDS
        .iter()
        .find(|(name, _)| name.as_slice() == brand)
        .map(|(_, format)| *format)
}

pub fn matches(header: &[u8]) -> bool {
    has_bytes_at(header, 4, b"ftyp") && slice_at(header, 8, 4).is_ok_and(|b| brand_format(b).is_some())
}

/// Resolve the concrete format from the `ftyp` box.
///
/// Generic `mif1`/`msf1` files are refined by their compatible brands.
fn resolve_format(data: &[u8], ftyp: &BoxHeader) -> Result<ImageFormat, ParseError> {
    let major = slice_at(data, ftyp.content_start(), 4)?;
    let format = brand_format(major).ok_or(ParseError::InvalidSignature("unknown HEIF brand"))?;
    if format != ImageFormat::Heif {
        return Ok(format);
    }

    // major brand (4) + minor version (4), then compatible brands
    let mut pos = ftyp.content_start() + 8;
    let end = ftyp.end().min(data.len());
    while pos.saturating_add(4) <= end {
        match brand_format(&data[pos..pos + 4]) {
            Some(refined) if refined != ImageFormat::Heif => return Ok(refined),
            _ => pos += 4,
        }
    }

    Ok(ImageFormat::Heif)
}

fn child(data: &[u8], parent: &BoxHeader, skip: usize, kind: &[u8; 4]) -> Result<BoxHeader, ParseError> {
    find_box(data, parent.content_start() + skip, parent.end(), kind)?.ok_or_else(|| {
        ParseError::malformed(
            "HEIF",
            format!("no '{}' box found", String::from_utf8_lossy(kind)),
        )
    })
}

pub struct HeifCalculator;

impl Calculator for HeifCalculator {
    fn calculate(&self, data: &[u8], _path: Option<&Path>) -> Result<ImageInfo, ParseError> {
        let ftyp = BoxHeader::read(data, 0, data.len())?;
        let format = resolve_format(data, &ftyp)?;

        let meta = find_box(data, ftyp.end(), data.len(), b"meta")?
            .ok_or_else(|| ParseError::malformed("HEIF", "no 'meta' box found"))?;
        // meta is a full box: 4 bytes of version and flags precede its children
        let iprp = child(data, &meta, 4, b"iprp")?;
        let ipco = child(data, &iprp, 0, b"ipco")?;

        let mut images = Vec::new();
        let end = ipco.end().min(data.len());
        let mut pos = ipco.content_start();
        while pos.saturating_add(8) <= end {
            let property = BoxHeader::read(data, pos, end)?;
            if &property.kind == b"ispe" {
                // full box header, then width and height
                let width = read_u32_be(data, property.content_start() + 4)?;
                let height = read_u32_be(data, property.content_start() + 8)?;
                images.push(ImageDimensions::new(width, height));
            }
            pos = property.end();
        }

        ImageInfo::from_images(images)
            .map(|info| info.with_format(format))
            .ok_or(ParseError::MissingDimensions("HEIF has no 'ispe' property"))
    }
}

//! Signature-based format detection.
//!
//! Formats are probed in a fixed order: unambiguous magic numbers first,
//! loose structural checks (ICO/CUR, TGA, SVG) last, so that a buffer that
//! satisfies several checks resolves to the most specific one. Sub-types
//! (`Avif`, `Heic`, `Ktx2`) are never returned here; their family calculator
//! reports them.

use tracing::debug;

use super::{
    bmp, dds, gif, heif, icns, ico, j2c, jp2, jpeg, jxl, ktx, png, pnm, psd, svg, tga, tiff, webp,
    ImageFormat,
};

/// Signature check for one format.
pub type SignatureCheck = fn(&[u8]) -> bool;

/// Detection table, in priority order.
pub const DETECTION_ORDER: [(ImageFormat, SignatureCheck); 20] = [
    (ImageFormat::Png, png::matches),
    (ImageFormat::Jpeg, jpeg::matches),
    (ImageFormat::Gif, gif::matches),
    (ImageFormat::Webp, webp::matches),
    (ImageFormat::Jxl, jxl::matches_container),
    (ImageFormat::JxlStream, jxl::matches_codestream),
    (ImageFormat::Jp2, jp2::matches),
    (ImageFormat::J2c, j2c::matches),
    (ImageFormat::Heif, heif::matches),
    (ImageFormat::Tiff, tiff::matches),
    (ImageFormat::Psd, psd::matches),
    (ImageFormat::Bmp, bmp::matches),
    (ImageFormat::Dds, dds::matches),
    (ImageFormat::Icns, icns::matches),
    (ImageFormat::Ktx, ktx::matches),
    (ImageFormat::Pnm, pnm::matches),
    (ImageFormat::Ico, ico::matches_ico),
    (ImageFormat::Cur, ico::matches_cur),
    (ImageFormat::Tga, tga::matches),
    (ImageFormat::Svg, svg::matches),
];

/// Identify the format of `header` from its leading bytes.
///
/// Returns `None` when no signature matches, including for buffers too short
/// to hold any signature.
pub fn detect_format(header: &[u8]) -> Option<ImageFormat> {
    let detected = DETECTION_ORDER
        .iter()
        .find(|(_, check)| check(header))
        .map(|(format, _)| *format);

    debug!(
        "Detected format {:?} from {} header bytes",
        detected,
        header.len()
    );
    detected
}

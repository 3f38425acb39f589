//! Image formats, signature detection and per-format size calculators.
//!
//! # Format Detection
//!
//! Use [`detect::detect_format`] to identify the format of a buffer from its
//! leading bytes. Each format module exposes a `matches` signature check and
//! a zero-sized calculator implementing [`Calculator`]; the
//! [`registry`] maps every [`ImageFormat`] to its calculator.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ParseError;
use crate::size::ImageInfo;

pub mod bmp;
pub mod dds;
pub mod detect;
pub mod gif;
pub mod heif;
pub mod icns;
pub mod ico;
mod isobmff;
pub mod j2c;
pub mod jp2;
pub mod jpeg;
pub mod jxl;
pub mod ktx;
pub mod png;
pub mod pnm;
pub mod psd;
pub mod registry;
pub mod svg;
pub mod tga;
pub mod tiff;
pub mod webp;

pub use detect::{detect_format, DETECTION_ORDER};
pub use registry::{calculator_for, registered_formats};

// =============================================================================
// ImageFormat
// =============================================================================

/// Supported image encodings.
///
/// `Avif`, `Heic` and `Ktx2` are sub-types: the detector reports their family
/// (`Heif`, `Ktx`) and the family calculator narrows it down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    #[serde(rename = "jpg")]
    Jpeg,
    Gif,
    Webp,
    Jxl,
    #[serde(rename = "jxl-stream")]
    JxlStream,
    Jp2,
    J2c,
    Heif,
    Tiff,
    Psd,
    Bmp,
    Dds,
    Icns,
    Ktx,
    Pnm,
    Ico,
    Cur,
    Tga,
    Svg,
    Avif,
    Heic,
    Ktx2,
}

impl ImageFormat {
    /// Every format, detector-level formats first in detection order, then
    /// sub-types.
    pub const ALL: [ImageFormat; 23] = [
        ImageFormat::Png,
        ImageFormat::Jpeg,
        ImageFormat::Gif,
        ImageFormat::Webp,
        ImageFormat::Jxl,
        ImageFormat::JxlStream,
        ImageFormat::Jp2,
        ImageFormat::J2c,
        ImageFormat::Heif,
        ImageFormat::Tiff,
        ImageFormat::Psd,
        ImageFormat::Bmp,
        ImageFormat::Dds,
        ImageFormat::Icns,
        ImageFormat::Ktx,
        ImageFormat::Pnm,
        ImageFormat::Ico,
        ImageFormat::Cur,
        ImageFormat::Tga,
        ImageFormat::Svg,
        ImageFormat::Avif,
        ImageFormat::Heic,
        ImageFormat::Ktx2,
    ];

    /// Short lowercase identifier, as used on the command line and in JSON.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Gif => "gif",
            ImageFormat::Webp => "webp",
            ImageFormat::Jxl => "jxl",
            ImageFormat::JxlStream => "jxl-stream",
            ImageFormat::Jp2 => "jp2",
            ImageFormat::J2c => "j2c",
            ImageFormat::Heif => "heif",
            ImageFormat::Tiff => "tiff",
            ImageFormat::Psd => "psd",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Dds => "dds",
            ImageFormat::Icns => "icns",
            ImageFormat::Ktx => "ktx",
            ImageFormat::Pnm => "pnm",
            ImageFormat::Ico => "ico",
            ImageFormat::Cur => "cur",
            ImageFormat::Tga => "tga",
            ImageFormat::Svg => "svg",
            ImageFormat::Avif => "avif",
            ImageFormat::Heic => "heic",
            ImageFormat::Ktx2 => "ktx2",
        }
    }

    /// Get a human-readable name for the format.
    pub const fn name(&self) -> &'static str {
        match self {
            ImageFormat::Png => "PNG",
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::Gif => "GIF",
            ImageFormat::Webp => "WebP",
            ImageFormat::Jxl => "JPEG XL",
            ImageFormat::JxlStream => "JPEG XL codestream",
            ImageFormat::Jp2 => "JPEG 2000",
            ImageFormat::J2c => "JPEG 2000 codestream",
            ImageFormat::Heif => "HEIF",
            ImageFormat::Tiff => "TIFF",
            ImageFormat::Psd => "Photoshop",
            ImageFormat::Bmp => "BMP",
            ImageFormat::Dds => "DirectDraw Surface",
            ImageFormat::Icns => "Apple Icon Image",
            ImageFormat::Ktx => "KTX",
            ImageFormat::Pnm => "Netpbm",
            ImageFormat::Ico => "Windows Icon",
            ImageFormat::Cur => "Windows Cursor",
            ImageFormat::Tga => "Truevision TGA",
            ImageFormat::Svg => "SVG",
            ImageFormat::Avif => "AVIF",
            ImageFormat::Heic => "HEIC",
            ImageFormat::Ktx2 => "KTX 2",
        }
    }

    /// The detector-level format this one belongs to.
    pub const fn family(&self) -> ImageFormat {
        match self {
            ImageFormat::Avif | ImageFormat::Heic => ImageFormat::Heif,
            ImageFormat::Ktx2 => ImageFormat::Ktx,
            other => *other,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let alias = match lower.as_str() {
            "jpeg" | "jpe" | "jfif" => Some(ImageFormat::Jpeg),
            "tif" => Some(ImageFormat::Tiff),
            "heic" | "heix" => Some(ImageFormat::Heic),
            "pbm" | "pgm" | "ppm" | "pam" | "pfm" => Some(ImageFormat::Pnm),
            "jpx" | "j2k" => Some(ImageFormat::Jp2),
            _ => None,
        };

        alias
            .or_else(|| {
                ImageFormat::ALL
                    .into_iter()
                    .find(|format| format.as_str() == lower)
            })
            .ok_or_else(|| format!("unknown image format '{}'", s))
    }
}

// =============================================================================
// Calculator
// =============================================================================

/// Derives dimensions from the raw bytes of one format.
///
/// Implementations must be pure: the same buffer always produces the same
/// result. `path` is only used for diagnostics, never for parsing. An error
/// means "this buffer is not a readable instance of my format".
pub trait Calculator: Sync {
    fn calculate(&self, data: &[u8], path: Option<&Path>) -> Result<ImageInfo, ParseError>;
}

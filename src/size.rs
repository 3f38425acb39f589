//! Size results.
//!
//! Calculators produce an [`ImageInfo`], whose format is optional: most
//! calculators leave it unset and let dispatch fill in the detected format,
//! while container calculators (HEIF, KTX) name the concrete sub-type.
//! [`normalize`] turns it into the [`SizeResult`] handed back to callers,
//! where the format is always present.

use serde::Serialize;
use tracing::warn;

use crate::format::ImageFormat;

/// Width and height of one image inside a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Calculator output, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    /// Sub-type override; `None` means "whatever the detector found"
    pub format: Option<ImageFormat>,
    /// EXIF/TIFF orientation (1-8)
    pub orientation: Option<u8>,
    /// Every image in a multi-image container, primary first
    pub images: Vec<ImageDimensions>,
}

impl ImageInfo {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_orientation(mut self, orientation: Option<u8>) -> Self {
        self.orientation = orientation;
        self
    }

    /// Build from a list of contained images; the first one is the primary.
    ///
    /// The `images` list is only kept when there is more than one entry.
    pub fn from_images(images: Vec<ImageDimensions>) -> Option<Self> {
        let primary = *images.first()?;
        let images = if images.len() > 1 { images } else { Vec::new() };
        Some(Self {
            width: primary.width,
            height: primary.height,
            images,
            ..Self::default()
        })
    }
}

/// Dimensions and metadata returned by the public entry points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeResult {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<u8>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageDimensions>,
}

impl SizeResult {
    pub fn dimensions(&self) -> ImageDimensions {
        ImageDimensions::new(self.width, self.height)
    }
}

/// Turn calculator output into a [`SizeResult`].
///
/// An unset format is backfilled with `detected`. A calculator override is
/// kept only if it belongs to the detected family; anything else is dropped
/// in favour of `detected`.
pub fn normalize(info: ImageInfo, detected: ImageFormat) -> SizeResult {
    let format = match info.format {
        None => detected,
        Some(reported) if reported.family() == detected => reported,
        Some(reported) => {
            warn!(
                "Calculator for {} reported unrelated format {}, keeping {}",
                detected, reported, detected
            );
            detected
        }
    };

    SizeResult {
        width: info.width,
        height: info.height,
        format,
        orientation: info.orientation,
        images: info.images,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_backfills_format() {
        let result = normalize(ImageInfo::new(10, 20), ImageFormat::Png);
        assert_eq!(result.format, ImageFormat::Png);
        assert_eq!(result.dimensions(), ImageDimensions::new(10, 20));
    }

    #[test]
    fn test_normalize_keeps_same_family_override() {
        let info = ImageInfo::new(64, 64).with_format(ImageFormat::Avif);
        let result = normalize(info, ImageFormat::Heif);
        assert_eq!(result.format, ImageFormat::Avif);

        let info = ImageInfo::new(4, 4).with_format(ImageFormat::Ktx2);
        assert_eq!(normalize(info, ImageFormat::Ktx).format, ImageFormat::Ktx2);
    }

    #[test]
    fn test_normalize_rejects_unrelated_override() {
        let info = ImageInfo::new(64, 64).with_format(ImageFormat::Gif);
        let result = normalize(info, ImageFormat::Png);
        assert_eq!(result.format, ImageFormat::Png);
    }

    #[test]
    fn test_from_images() {
        assert!(ImageInfo::from_images(Vec::new()).is_none());

        let single = ImageInfo::from_images(vec![ImageDimensions::new(16, 16)]).unwrap();
        assert_eq!((single.width, single.height), (16, 16));
        assert!(single.images.is_empty());

        let many = ImageInfo::from_images(vec![
            ImageDimensions::new(32, 32),
            ImageDimensions::new(16, 16),
        ])
        .unwrap();
        assert_eq!((many.width, many.height), (32, 32));
        assert_eq!(many.images.len(), 2);
    }

    #[test]
    fn test_size_result_json() {
        let result = normalize(
            ImageInfo::new(640, 480).with_orientation(Some(6)),
            ImageFormat::Jpeg,
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "width": 640,
                "height": 480,
                "format": "jpg",
                "orientation": 6,
            })
        );
    }
}

//! Format coverage through the public API.
//!
//! Images from a real encoder check the common formats against what an
//! independent writer produces; the rest use hand-built headers.

use image::ImageFormat as EncodedFormat;

use image_dims::{image_size_from_bytes, ImageDimensions, ImageFormat, SizeResult};

use super::test_utils::{encode_ico, encode_rgb};

fn size_of(data: &[u8]) -> SizeResult {
    image_size_from_bytes(data).unwrap()
}

// =============================================================================
// Encoder round trips
// =============================================================================

#[test]
fn test_encoded_images() {
    let cases = [
        (EncodedFormat::Png, ImageFormat::Png),
        (EncodedFormat::Jpeg, ImageFormat::Jpeg),
        (EncodedFormat::Gif, ImageFormat::Gif),
        (EncodedFormat::Bmp, ImageFormat::Bmp),
        (EncodedFormat::Tiff, ImageFormat::Tiff),
    ];

    for (encoded, expected) in cases {
        for (width, height) in [(1, 1), (37, 19), (300, 7)] {
            let data = encode_rgb(width, height, encoded);
            let result = size_of(&data);
            assert_eq!(result.format, expected, "{:?} {}x{}", encoded, width, height);
            assert_eq!(
                result.dimensions(),
                ImageDimensions::new(width, height),
                "{:?}",
                encoded
            );
        }
    }
}

#[test]
fn test_encoded_ico() {
    let result = size_of(&encode_ico(48, 32));
    assert_eq!(result.format, ImageFormat::Ico);
    assert_eq!((result.width, result.height), (48, 32));

    // 256 is stored as 0 in the directory
    let result = size_of(&encode_ico(256, 256));
    assert_eq!((result.width, result.height), (256, 256));
}

#[test]
fn test_encoded_jpeg_has_no_orientation() {
    let data = encode_rgb(64, 48, EncodedFormat::Jpeg);
    assert_eq!(size_of(&data).orientation, None);
}

// =============================================================================
// Hand-built headers
// =============================================================================

#[test]
fn test_psd() {
    let mut data = b"8BPS\x00\x01".to_vec();
    data.extend_from_slice(&[0u8; 6]); // reserved
    data.extend_from_slice(&3u16.to_be_bytes()); // channels
    data.extend_from_slice(&600u32.to_be_bytes()); // height
    data.extend_from_slice(&800u32.to_be_bytes()); // width
    data.extend_from_slice(&[0, 8, 0, 3]);

    let result = size_of(&data);
    assert_eq!(result.format, ImageFormat::Psd);
    assert_eq!((result.width, result.height), (800, 600));
}

#[test]
fn test_dds() {
    let mut data = b"DDS ".to_vec();
    data.extend_from_slice(&124u32.to_le_bytes()); // header size
    data.extend_from_slice(&0x1007u32.to_le_bytes()); // flags
    data.extend_from_slice(&128u32.to_le_bytes()); // height
    data.extend_from_slice(&256u32.to_le_bytes()); // width
    data.extend_from_slice(&[0u8; 108]);

    let result = size_of(&data);
    assert_eq!(result.format, ImageFormat::Dds);
    assert_eq!((result.width, result.height), (256, 128));
}

#[test]
fn test_webp_lossless() {
    let bits: u32 = (99 - 1) | ((51 - 1) << 14);
    let mut data = b"RIFF\x1a\x00\x00\x00WEBPVP8L".to_vec();
    data.extend_from_slice(&5u32.to_le_bytes());
    data.push(0x2F);
    data.extend_from_slice(&bits.to_le_bytes());

    let result = size_of(&data);
    assert_eq!(result.format, ImageFormat::Webp);
    assert_eq!((result.width, result.height), (99, 51));
}

#[test]
fn test_pnm() {
    let result = size_of(b"P3\n# a comment\n4 2\n255\n");
    assert_eq!(result.format, ImageFormat::Pnm);
    assert_eq!((result.width, result.height), (4, 2));
}

#[test]
fn test_svg_with_xml_prolog() {
    let data = br#"<?xml version="1.0" encoding="UTF-8"?>
<!-- drawn by hand -->
<svg xmlns="http://www.w3.org/2000/svg" width="12cm" height="6cm" viewBox="0 0 120 60">
  <rect width="120" height="60"/>
</svg>"#;
    let result = size_of(data);
    assert_eq!(result.format, ImageFormat::Svg);
    assert_eq!((result.width, result.height), (454, 227));
}

#[test]
fn test_j2c_codestream() {
    let mut data = vec![0xFF, 0x4F, 0xFF, 0x51];
    data.extend_from_slice(&41u16.to_be_bytes()); // Lsiz
    data.extend_from_slice(&0u16.to_be_bytes()); // Rsiz
    data.extend_from_slice(&1024u32.to_be_bytes()); // Xsiz
    data.extend_from_slice(&512u32.to_be_bytes()); // Ysiz
    data.extend_from_slice(&[0u8; 8]); // XOsiz, YOsiz
    data.extend_from_slice(&[0u8; 16]);

    let result = size_of(&data);
    assert_eq!(result.format, ImageFormat::J2c);
    assert_eq!((result.width, result.height), (1024, 512));
}

#[test]
fn test_jxl_codestream() {
    // small header: 256 x 256
    let result = size_of(&[0xFF, 0x0A, 0x7F, 0x00, 0x00]);
    assert_eq!(result.format, ImageFormat::JxlStream);
    assert_eq!((result.width, result.height), (256, 256));
}

#[test]
fn test_multi_image_ico() {
    let mut data = vec![0, 0, 1, 0, 2, 0];
    for size in [64u8, 16] {
        data.extend_from_slice(&[size, size, 0, 0, 1, 0, 32, 0]);
        data.extend_from_slice(&[0u8; 8]);
    }

    let result = size_of(&data);
    assert_eq!((result.width, result.height), (64, 64));
    assert_eq!(
        result.images,
        vec![ImageDimensions::new(64, 64), ImageDimensions::new(16, 16)]
    );
}

#[test]
fn test_tga() {
    let mut data = vec![0, 0, 10, 0, 0, 0, 0, 0, 0, 0, 0, 0];
    data.extend_from_slice(&640u16.to_le_bytes());
    data.extend_from_slice(&480u16.to_le_bytes());
    data.extend_from_slice(&[32, 8]);

    let result = size_of(&data);
    assert_eq!(result.format, ImageFormat::Tga);
    assert_eq!((result.width, result.height), (640, 480));
}

//! Test utilities for integration tests.
//!
//! This module provides a tracking range reader and helpers that encode real
//! images with the `image` crate.

use std::io::{Cursor, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use image::{DynamicImage, ImageFormat as EncodedFormat, Rgb, RgbImage, RgbaImage};
use tempfile::NamedTempFile;

use image_dims::io::RangeReader;

// =============================================================================
// Mock Range Reader with Request Tracking
// =============================================================================

/// A mock range reader that tracks all read requests.
pub struct TrackingMockReader {
    data: Bytes,
    identifier: String,
    request_count: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<(u64, usize)>>>,
}

impl TrackingMockReader {
    pub fn new(data: Vec<u8>, identifier: impl Into<String>) -> Self {
        Self {
            data: Bytes::from(data),
            identifier: identifier.into(),
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    pub fn get_requests(&self) -> Vec<(u64, usize)> {
        self.requests.lock().unwrap().clone()
    }
}

impl RangeReader for TrackingMockReader {
    fn read_exact_at(&self, offset: u64, len: usize) -> std::io::Result<Bytes> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push((offset, len));

        let start = offset as usize;
        let end = start + len;
        if end > self.data.len() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!("range {}..{} beyond {} bytes", start, end, self.data.len()),
            ));
        }
        Ok(self.data.slice(start..end))
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}

// =============================================================================
// Encoded Images
// =============================================================================

/// Gradient RGB image, so encoders don't special-case flat input.
fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 128]))
}

/// Encode a `width` x `height` RGB image in `format`.
pub fn encode_rgb(width: u32, height: u32, format: EncodedFormat) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(gradient(width, height))
        .write_to(&mut buffer, format)
        .unwrap();
    buffer.into_inner()
}

/// Encode an RGBA icon (ICO only accepts images up to 256x256).
pub fn encode_ico(width: u32, height: u32) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(RgbaImage::new(width, height))
        .write_to(&mut buffer, EncodedFormat::Ico)
        .unwrap();
    buffer.into_inner()
}

// =============================================================================
// Files
// =============================================================================

/// Write `data` to a fresh temporary file.
pub fn temp_file_with(data: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(data).unwrap();
    file.flush().unwrap();
    file
}

/// `data` padded with zeros to `total` bytes.
pub fn padded(mut data: Vec<u8>, total: usize) -> Vec<u8> {
    data.resize(total.max(data.len()), 0);
    data
}

// =============================================================================
// ISO-BMFF Boxes
// =============================================================================

/// Serialize a box with a 32-bit size.
pub fn iso_box(kind: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut data = ((payload.len() + 8) as u32).to_be_bytes().to_vec();
    data.extend_from_slice(kind);
    data.extend_from_slice(payload);
    data
}

/// A HEIC file whose `ipco` holds the given pre-serialized property boxes.
pub fn heic_with_properties(properties: &[u8]) -> Vec<u8> {
    let mut ftyp = b"heic".to_vec();
    ftyp.extend_from_slice(&[0u8; 4]);
    ftyp.extend_from_slice(b"mif1");

    let iprp = iso_box(b"iprp", &iso_box(b"ipco", properties));
    let mut meta = vec![0u8; 4]; // version + flags
    meta.extend(iprp);

    let mut data = iso_box(b"ftyp", &ftyp);
    data.extend(iso_box(b"meta", &meta));
    data
}

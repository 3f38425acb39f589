//! Path-based lookups: bounded reads, empty files, I/O errors.

use std::path::Path;

use image::ImageFormat as EncodedFormat;

use image_dims::io::{read_file_prefix, read_prefix, MAX_INPUT_SIZE};
use image_dims::{image_size_from_path, Engine, ErrorKind, ImageFormat, ImageSizeError};

use super::test_utils::{encode_rgb, padded, temp_file_with, TrackingMockReader};

const TWO_MB: usize = 2 * 1024 * 1024;

#[test]
fn test_large_source_read_is_capped() {
    let data = padded(encode_rgb(10, 10, EncodedFormat::Png), TWO_MB);
    let reader = TrackingMockReader::new(data, "big.png");

    let prefix = read_prefix(&reader, MAX_INPUT_SIZE).unwrap();
    assert_eq!(prefix.len(), MAX_INPUT_SIZE);
    assert_eq!(reader.request_count(), 1);
    assert_eq!(reader.get_requests(), vec![(0, MAX_INPUT_SIZE)]);
}

#[test]
fn test_small_source_read_whole() {
    let data = encode_rgb(4, 4, EncodedFormat::Gif);
    let len = data.len();
    let reader = TrackingMockReader::new(data, "small.gif");

    let prefix = read_prefix(&reader, MAX_INPUT_SIZE).unwrap();
    assert_eq!(prefix.len(), len);
    assert_eq!(reader.get_requests(), vec![(0, len)]);
}

#[test]
fn test_empty_source_never_read() {
    let reader = TrackingMockReader::new(Vec::new(), "empty.png");
    let err = read_prefix(&reader, MAX_INPUT_SIZE).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyInput);
    assert_eq!(reader.request_count(), 0);
}

#[test]
fn test_large_file_on_disk() {
    let data = padded(encode_rgb(123, 45, EncodedFormat::Png), TWO_MB);
    let file = temp_file_with(&data);

    let prefix = read_file_prefix(file.path(), MAX_INPUT_SIZE).unwrap();
    assert_eq!(prefix.len(), MAX_INPUT_SIZE);
    assert_eq!(&prefix[..], &data[..MAX_INPUT_SIZE]);

    let result = image_size_from_path(file.path()).unwrap();
    assert_eq!(result.format, ImageFormat::Png);
    assert_eq!((result.width, result.height), (123, 45));
}

#[test]
fn test_custom_cap_still_finds_header() {
    let data = padded(encode_rgb(7, 9, EncodedFormat::Bmp), 64 * 1024);
    let file = temp_file_with(&data);

    let engine = Engine::new().with_max_input_size(1024);
    let result = engine.image_size(file.path()).unwrap();
    assert_eq!((result.width, result.height), (7, 9));
}

#[test]
fn test_zero_byte_file() {
    let file = temp_file_with(&[]);
    let err = image_size_from_path(file.path()).unwrap_err();
    assert!(
        matches!(err, ImageSizeError::EmptyInput { ref path } if path == file.path()),
        "{:?}",
        err
    );
}

#[test]
fn test_missing_file() {
    let err = image_size_from_path("/definitely/not/a/real/file.jpg").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(err.to_string().contains("file.jpg"));
}

#[test]
fn test_unsupported_file_mentions_path() {
    let file = temp_file_with(b"plain text, not an image at all");
    let err = image_size_from_path(file.path()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
    assert!(err.to_string().contains(&file.path().display().to_string()));
}

#[test]
fn test_disabled_format_from_file() {
    let file = temp_file_with(&encode_rgb(2, 2, EncodedFormat::Jpeg));
    let engine = Engine::new().with_disabled_formats([ImageFormat::Jpeg]);
    let err = engine.image_size(file.path()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DisabledFormat);
}

#[test]
fn test_no_caching_between_calls() {
    let file = temp_file_with(&encode_rgb(5, 5, EncodedFormat::Png));
    let engine = Engine::new();
    assert_eq!(engine.image_size(file.path()).unwrap().width, 5);

    std::fs::write(file.path(), encode_rgb(9, 9, EncodedFormat::Png)).unwrap();
    assert_eq!(engine.image_size(file.path()).unwrap().width, 9);
}

#[test]
fn test_relative_path_resolved() {
    // Cargo runs integration tests from the package root
    let err = Engine::new()
        .image_size(Path::new("does-not-exist.png"))
        .unwrap_err();
    let ImageSizeError::Io { path, .. } = err else {
        panic!("expected an I/O error");
    };
    assert!(path.is_absolute(), "{}", path.display());
}

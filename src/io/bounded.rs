//! Bounded prefix reads.
//!
//! Dimension metadata lives near the start of the file for every supported
//! format, so at most [`MAX_INPUT_SIZE`] bytes are ever pulled into memory,
//! no matter how large the file is.

use std::path::Path;

use bytes::Bytes;
use tracing::debug;

use crate::error::ImageSizeError;

use super::range_reader::{FileRangeReader, RangeReader};

/// Default cap on the number of leading bytes read from a file (512 KiB).
pub const MAX_INPUT_SIZE: usize = 512 * 1024;

/// Read the bounded prefix of a range reader.
///
/// Reads exactly `min(reader.size(), max_input_size)` bytes from offset 0.
///
/// # Errors
/// * `EmptyInput` if the resource reports a size of zero
/// * `Io` if the read fails or returns fewer bytes than requested
pub fn read_prefix<R: RangeReader>(
    reader: &R,
    max_input_size: usize,
) -> Result<Bytes, ImageSizeError> {
    let size = reader.size();
    if size == 0 {
        return Err(ImageSizeError::EmptyInput {
            path: reader.identifier().into(),
        });
    }

    let effective = usize::try_from(size).map_or(max_input_size, |s| s.min(max_input_size));

    let buffer = reader
        .read_exact_at(0, effective)
        .map_err(|source| ImageSizeError::Io {
            path: reader.identifier().into(),
            source,
        })?;

    if buffer.len() != effective {
        return Err(ImageSizeError::Io {
            path: reader.identifier().into(),
            source: std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!("short read: expected {} bytes, got {}", effective, buffer.len()),
            ),
        });
    }

    debug!(
        "Read {} of {} bytes from {}",
        effective,
        size,
        reader.identifier()
    );

    Ok(buffer)
}

/// Open `path` read-only and read its bounded prefix.
///
/// The file handle is closed before this function returns, including when the
/// read fails.
pub fn read_file_prefix(path: &Path, max_input_size: usize) -> Result<Bytes, ImageSizeError> {
    let reader = FileRangeReader::open(path).map_err(|source| ImageSizeError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    read_prefix(&reader, max_input_size)
}

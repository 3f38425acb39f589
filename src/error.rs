use std::path::PathBuf;

use thiserror::Error;

use crate::format::ImageFormat;

/// Coarse classification of [`ImageSizeError`].
///
/// Useful for matching in callers that don't care about the payload
/// (exit codes, metrics, tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    EmptyInput,
    InvalidInvocation,
    UnsupportedFormat,
    DisabledFormat,
    Io,
}

/// Errors returned by the public entry points.
///
/// Every variant is terminal for the call that produced it; the engine never
/// retries and never falls back to a second format.
#[derive(Debug, Error)]
pub enum ImageSizeError {
    /// The target file reports a size of zero bytes
    #[error("Empty input: {} has no content", .path.display())]
    EmptyInput { path: PathBuf },

    /// Path given while filesystem access is disabled, or a malformed path
    #[error("Invalid invocation: {0}")]
    InvalidInvocation(String),

    /// No signature matched, no calculator is registered, or the calculator
    /// could not infer dimensions from the buffer
    #[error("Unsupported format{}: {reason}", display_path(.path))]
    UnsupportedFormat {
        path: Option<PathBuf>,
        reason: String,
    },

    /// The detected format is administratively disabled
    #[error("Disabled format: {format}")]
    DisabledFormat { format: ImageFormat },

    /// Error opening, sizing or reading the file
    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn display_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!(" ({})", p.display()),
        None => String::new(),
    }
}

impl ImageSizeError {
    /// Get the coarse kind of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            ImageSizeError::EmptyInput { .. } => ErrorKind::EmptyInput,
            ImageSizeError::InvalidInvocation(_) => ErrorKind::InvalidInvocation,
            ImageSizeError::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            ImageSizeError::DisabledFormat { .. } => ErrorKind::DisabledFormat,
            ImageSizeError::Io { .. } => ErrorKind::Io,
        }
    }

    pub(crate) fn unsupported(path: Option<&std::path::Path>, reason: impl Into<String>) -> Self {
        ImageSizeError::UnsupportedFormat {
            path: path.map(|p| p.to_path_buf()),
            reason: reason.into(),
        }
    }
}

/// Errors raised by a calculator that recognised its format family but could
/// not read dimensions from this particular buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A read ran past the end of the buffer
    #[error("Truncated input: need {needed} bytes at offset {offset}, have {available}")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A structural marker the calculator depends on is wrong
    #[error("Invalid signature: {0}")]
    InvalidSignature(&'static str),

    /// The header parsed but carried no usable dimensions
    #[error("No dimensions found: {0}")]
    MissingDimensions(&'static str),

    /// Any other structural problem
    #[error("Malformed {format}: {message}")]
    Malformed {
        format: &'static str,
        message: String,
    },

    /// TIFF structure error (TIFF files and EXIF blocks)
    #[error("TIFF error: {0}")]
    Tiff(#[from] TiffError),
}

impl ParseError {
    pub(crate) fn malformed(format: &'static str, message: impl Into<String>) -> Self {
        ParseError::Malformed {
            format,
            message: message.into(),
        }
    }
}

/// Errors that can occur when parsing TIFF structures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TiffError {
    /// Invalid TIFF magic bytes (not II or MM)
    #[error("Invalid TIFF magic bytes: expected 0x4949 (II) or 0x4D4D (MM), got 0x{0:04X}")]
    InvalidMagic(u16),

    /// Invalid TIFF version number
    #[error("Invalid TIFF version: expected 42 (TIFF) or 43 (BigTIFF), got {0}")]
    InvalidVersion(u16),

    /// Invalid BigTIFF offset byte size (must be 8)
    #[error("Invalid BigTIFF offset byte size: expected 8, got {0}")]
    InvalidBigTiffOffsetSize(u16),

    /// Buffer is too small to contain a valid TIFF header
    #[error("Input too small: need at least {required} bytes, got {actual}")]
    FileTooSmall { required: u64, actual: u64 },

    /// IFD offset points outside the buffer
    #[error("Invalid IFD offset: {0}")]
    InvalidIfdOffset(u64),

    /// Tag has unexpected type or count
    #[error("Invalid tag value for {tag}: {message}")]
    InvalidTagValue { tag: &'static str, message: String },

    /// Required tag is missing from IFD
    #[error("Missing required tag: {0}")]
    MissingTag(&'static str),
}

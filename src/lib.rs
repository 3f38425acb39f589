//! # image-dims
//!
//! Read the pixel dimensions of an image from its header, without decoding it.
//!
//! The format is identified from the leading bytes (never from the file
//! extension), then a format-specific calculator reads width and height from
//! the header. Files are read through a bounded prefix reader, so memory use
//! per call is capped no matter how large the file is.
//!
//! ## Architecture
//!
//! - [`io`] - Bounded prefix reads over the [`io::RangeReader`] trait
//! - [`mod@format`] - Signature detection, the calculator registry, and one
//!   module per format
//! - [`engine`] - Policy gate and dispatch ([`Engine`])
//! - [`size`] - Result types and normalization
//! - [`config`] and [`report`] - The `image-dims` command line
//!
//! ## Example
//!
//! ```rust,no_run
//! use image_dims::{Engine, ImageFormat};
//!
//! let engine = Engine::new().with_disabled_formats([ImageFormat::Svg]);
//! let size = engine.image_size("photo.jpg").unwrap();
//! println!("{}x{} ({})", size.width, size.height, size.format);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod io;
pub mod report;
pub mod size;

// Re-export commonly used types
pub use config::{Cli, Command, FormatsConfig, PolicyArgs, SizeConfig};
pub use engine::{image_size, image_size_from_bytes, image_size_from_path, Engine, Input, Policy};
pub use error::{ErrorKind, ImageSizeError, ParseError, TiffError};
pub use format::{
    calculator_for, detect_format, registered_formats, Calculator, ImageFormat, DETECTION_ORDER,
};
pub use io::{read_file_prefix, read_prefix, FileRangeReader, RangeReader, MAX_INPUT_SIZE};
pub use size::{normalize, ImageDimensions, ImageInfo, SizeResult};

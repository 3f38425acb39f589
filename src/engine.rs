//! Dispatch engine: detection, policy gate, registry lookup, normalization.
//!
//! An [`Engine`] owns its [`Policy`]. Mutation goes through `&mut self`, while
//! lookups take `&self`, so a lookup can never observe a policy change half way
//! through. Share an engine across threads behind `Arc` for concurrent lookups.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::debug;

use crate::error::ImageSizeError;
use crate::format::{calculator_for, detect_format, registered_formats, ImageFormat};
use crate::io::{read_file_prefix, MAX_INPUT_SIZE};
use crate::size::{normalize, SizeResult};

// =============================================================================
// Input
// =============================================================================

/// What the entry point was asked to size: bytes already in memory, or a
/// file to read.
#[derive(Debug, Clone, Copy)]
pub enum Input<'a> {
    Bytes(&'a [u8]),
    Path(&'a Path),
}

impl<'a> From<&'a [u8]> for Input<'a> {
    fn from(data: &'a [u8]) -> Self {
        Input::Bytes(data)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Input<'a> {
    fn from(data: &'a [u8; N]) -> Self {
        Input::Bytes(data)
    }
}

impl<'a> From<&'a Vec<u8>> for Input<'a> {
    fn from(data: &'a Vec<u8>) -> Self {
        Input::Bytes(data)
    }
}

impl<'a> From<&'a Bytes> for Input<'a> {
    fn from(data: &'a Bytes) -> Self {
        Input::Bytes(data)
    }
}

impl<'a> From<&'a Path> for Input<'a> {
    fn from(path: &'a Path) -> Self {
        Input::Path(path)
    }
}

impl<'a> From<&'a PathBuf> for Input<'a> {
    fn from(path: &'a PathBuf) -> Self {
        Input::Path(path)
    }
}

impl<'a> From<&'a str> for Input<'a> {
    fn from(path: &'a str) -> Self {
        Input::Path(Path::new(path))
    }
}

// =============================================================================
// Policy
// =============================================================================

/// Administrative restrictions applied by an [`Engine`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Policy {
    /// Reject every path-based call before touching the filesystem
    pub filesystem_disabled: bool,

    /// Formats that fail with `DisabledFormat` even though they are supported
    pub disabled_formats: HashSet<ImageFormat>,
}

impl Policy {
    pub fn is_disabled(&self, format: ImageFormat) -> bool {
        self.disabled_formats.contains(&format)
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Image size lookup engine.
#[derive(Debug, Clone)]
pub struct Engine {
    policy: Policy,
    max_input_size: usize,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            policy: Policy::default(),
            max_input_size: MAX_INPUT_SIZE,
        }
    }
}

impl Engine {
    /// Create an engine with no restrictions and the default read cap.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filesystem_disabled(mut self, disabled: bool) -> Self {
        self.set_filesystem_disabled(disabled);
        self
    }

    pub fn with_disabled_formats(mut self, formats: impl IntoIterator<Item = ImageFormat>) -> Self {
        self.set_disabled_formats(formats);
        self
    }

    /// Override how many leading bytes are read from a file.
    pub fn with_max_input_size(mut self, max_input_size: usize) -> Self {
        self.max_input_size = max_input_size;
        self
    }

    pub fn set_filesystem_disabled(&mut self, disabled: bool) {
        self.policy.filesystem_disabled = disabled;
    }

    /// Replace the disabled set. Formats from a previous call are re-enabled.
    pub fn set_disabled_formats(&mut self, formats: impl IntoIterator<Item = ImageFormat>) {
        self.policy.disabled_formats = formats.into_iter().collect();
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn max_input_size(&self) -> usize {
        self.max_input_size
    }

    /// Every format with a registered calculator, regardless of policy.
    pub fn registered_formats(&self) -> Vec<ImageFormat> {
        registered_formats()
    }

    /// Determine the size of an in-memory buffer.
    ///
    /// `path` is only used in error messages.
    ///
    /// # Errors
    /// * `UnsupportedFormat` if no signature matches, no calculator is
    ///   registered, or the calculator cannot read the buffer
    /// * `DisabledFormat` if the detected (or refined) format is disabled
    pub fn lookup(&self, data: &[u8], path: Option<&Path>) -> Result<SizeResult, ImageSizeError> {
        let detected = detect_format(data)
            .ok_or_else(|| ImageSizeError::unsupported(path, "unrecognized signature"))?;

        if self.policy.is_disabled(detected) {
            return Err(ImageSizeError::DisabledFormat { format: detected });
        }

        let calculator = calculator_for(detected).ok_or_else(|| {
            ImageSizeError::unsupported(path, format!("no calculator registered for {}", detected))
        })?;

        debug!("Dispatching {} bytes to the {} calculator", data.len(), detected);

        let info = calculator
            .calculate(data, path)
            .map_err(|e| ImageSizeError::unsupported(path, format!("{} calculator: {}", detected, e)))?;

        let result = normalize(info, detected);

        // a sub-type reported by the calculator may itself be disabled
        if result.format != detected && self.policy.is_disabled(result.format) {
            return Err(ImageSizeError::DisabledFormat {
                format: result.format,
            });
        }

        Ok(result)
    }

    /// Determine the size of a buffer or a file.
    ///
    /// Buffers go straight to [`lookup`](Self::lookup). Paths are checked
    /// against the filesystem policy before any I/O, made absolute, and read up
    /// to the configured cap.
    pub fn image_size<'a>(&self, input: impl Into<Input<'a>>) -> Result<SizeResult, ImageSizeError> {
        match input.into() {
            Input::Bytes(data) => self.lookup(data, None),
            Input::Path(path) => self.image_size_from_path(path),
        }
    }

    fn image_size_from_path(&self, path: &Path) -> Result<SizeResult, ImageSizeError> {
        if self.policy.filesystem_disabled {
            return Err(ImageSizeError::InvalidInvocation(format!(
                "filesystem access is disabled, refusing to read {}",
                path.display()
            )));
        }

        let raw = path.as_os_str();
        if raw.is_empty() {
            return Err(ImageSizeError::InvalidInvocation("empty path".to_string()));
        }
        if raw.as_encoded_bytes().contains(&0) {
            return Err(ImageSizeError::InvalidInvocation(format!(
                "path contains a NUL byte: {}",
                path.display()
            )));
        }
        if self.max_input_size == 0 {
            return Err(ImageSizeError::InvalidInvocation(
                "maximum input size must be greater than zero".to_string(),
            ));
        }

        let absolute = std::path::absolute(path).map_err(|source| ImageSizeError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let data = read_file_prefix(&absolute, self.max_input_size)?;
        self.lookup(&data, Some(&absolute))
    }
}

// =============================================================================
// Convenience functions
// =============================================================================

/// Size a buffer or file with an unrestricted [`Engine`].
pub fn image_size<'a>(input: impl Into<Input<'a>>) -> Result<SizeResult, ImageSizeError> {
    Engine::default().image_size(input)
}

/// Size an in-memory buffer with an unrestricted [`Engine`].
pub fn image_size_from_bytes(data: &[u8]) -> Result<SizeResult, ImageSizeError> {
    Engine::default().lookup(data, None)
}

/// Size a file with an unrestricted [`Engine`].
pub fn image_size_from_path(path: impl AsRef<Path>) -> Result<SizeResult, ImageSizeError> {
    Engine::default().image_size(path.as_ref())
}

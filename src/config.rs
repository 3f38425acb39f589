//! Command-line configuration for the `image-dims` binary.
//!
//! Options can be given as flags or through environment variables with the
//! `IMAGE_DIMS_` prefix:
//!
//! - `IMAGE_DIMS_DISABLE` - Comma-separated formats to reject (e.g. `svg,tga`)
//! - `IMAGE_DIMS_NO_FS` - Refuse to read files; only `--stdin` works
//! - `IMAGE_DIMS_MAX_INPUT_SIZE` - Bytes read from each file (default: 524288)

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::engine::Engine;
use crate::format::ImageFormat;
use crate::io::MAX_INPUT_SIZE;

// =============================================================================
// Default Values
// =============================================================================

/// Smallest accepted `--max-input-size` (1 KiB).
pub const MIN_MAX_INPUT_SIZE: usize = 1024;

/// Largest accepted `--max-input-size` (64 MiB).
pub const MAX_MAX_INPUT_SIZE: usize = 64 * 1024 * 1024;

// =============================================================================
// CLI Arguments
// =============================================================================

/// image-dims - read image dimensions from file headers.
///
/// Only the first few hundred kilobytes of each file are read; pixel data is
/// never decoded.
#[derive(Parser, Debug, Clone)]
#[command(name = "image-dims")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn into_command(self) -> Command {
        self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the dimensions of one or more images
    Size(SizeConfig),

    /// List the supported formats
    Formats(FormatsConfig),
}

/// Options shared by every subcommand that builds an [`Engine`].
#[derive(Args, Debug, Clone, Default)]
pub struct PolicyArgs {
    /// Formats to reject even though they are supported.
    #[arg(long, env = "IMAGE_DIMS_DISABLE", value_delimiter = ',')]
    pub disable: Vec<ImageFormat>,

    /// Refuse to read from the filesystem.
    #[arg(long, default_value_t = false, env = "IMAGE_DIMS_NO_FS")]
    pub no_fs: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SizeConfig {
    /// Image files to inspect.
    pub paths: Vec<PathBuf>,

    /// Read a single image from standard input instead of files.
    #[arg(long, default_value_t = false, conflicts_with = "paths")]
    pub stdin: bool,

    /// Print a JSON array instead of one line per input.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Maximum number of leading bytes read from each input.
    #[arg(long, default_value_t = MAX_INPUT_SIZE, env = "IMAGE_DIMS_MAX_INPUT_SIZE")]
    pub max_input_size: usize,

    /// Enable debug logging.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl SizeConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_input_size < MIN_MAX_INPUT_SIZE || self.max_input_size > MAX_MAX_INPUT_SIZE {
            return Err("max_input_size must be between 1KB and 64MB".to_string());
        }

        if self.paths.is_empty() && !self.stdin {
            return Err("No input given. Pass one or more paths, or --stdin".to_string());
        }

        Ok(())
    }

    /// Build the engine described by these options.
    pub fn engine(&self) -> Engine {
        Engine::new()
            .with_filesystem_disabled(self.policy.no_fs)
            .with_disabled_formats(self.policy.disable.iter().copied())
            .with_max_input_size(self.max_input_size)
    }
}

#[derive(Args, Debug, Clone)]
pub struct FormatsConfig {
    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Print a JSON array instead of one format per line.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

impl FormatsConfig {
    pub fn engine(&self) -> Engine {
        Engine::new().with_disabled_formats(self.policy.disable.iter().copied())
    }
}

// =============================================================================
// Tests
// =============================================================================

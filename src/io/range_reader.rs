use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use bytes::Bytes;

/// Trait for reading byte ranges from a sized resource.
///
/// The bounded reader works against this abstraction so the amount of data
/// pulled from a source can be observed and capped independently of where
/// the bytes come from.
pub trait RangeReader {
    /// Read exactly `len` bytes starting at `offset`.
    ///
    /// Returns an error if the read fails or the resource ends early.
    fn read_exact_at(&self, offset: u64, len: usize) -> std::io::Result<Bytes>;

    /// Get the total size of the resource in bytes.
    fn size(&self) -> u64;

    /// Get a unique identifier for this resource (for logging and errors).
    fn identifier(&self) -> &str;
}

// =============================================================================
// FileRangeReader
// =============================================================================

/// Range reader over a local file opened read-only.
///
/// The size is taken once at open time. The file handle is released when the
/// reader is dropped, on every exit path.
#[derive(Debug)]
pub struct FileRangeReader {
    file: File,
    size: u64,
    identifier: String,
}

impl FileRangeReader {
    /// Open `path` read-only and stat it.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = File::open(path)?;
        let size = file.metadata()?.len();

        Ok(Self {
            file,
            size,
            identifier: path.display().to_string(),
        })
    }
}

impl RangeReader for FileRangeReader {
    fn read_exact_at(&self, offset: u64, len: usize) -> std::io::Result<Bytes> {
        // &File implements Read + Seek, so no interior mutability is needed
        let mut file = &self.file;
        file.seek(SeekFrom::Start(offset))?;

        let mut buf = vec![0u8; len];
        file.read_exact(&mut buf)?;
        Ok(Bytes::from(buf))
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}

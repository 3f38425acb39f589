//! Minimal ISO base media box walker shared by HEIF, JPEG 2000 and JPEG XL.
//!
//! ```text
//! Bytes 0-3: Box size (u32 BE, 0 = to end of data, 1 = 64-bit size follows)
//! Bytes 4-7: Box type (four ASCII characters)
//! Bytes 8-15: Large size (u64 BE, only when size == 1)
//! ```

use crate::error::ParseError;
use crate::io::endian::{read_u32_be, read_u64_be, slice_at};

/// Location of one box within the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BoxHeader {
    pub kind: [u8; 4],
    pub offset: usize,
    pub header_len: usize,
    pub size: usize,
}

impl BoxHeader {
    /// Read the box header at `offset`. `limit` is where a size-0 box ends.
    pub fn read(data: &[u8], offset: usize, limit: usize) -> Result<Self, ParseError> {
        let size32 = read_u32_be(data, offset)?;
        let mut kind = [0u8; 4];
        kind.copy_from_slice(slice_at(data, offset + 4, 4)?);

        let (size, header_len) = match size32 {
            0 => (limit.saturating_sub(offset), 8),
            1 => {
                let large = read_u64_be(data, offset + 8)?;
                let large = usize::try_from(large)
                    .map_err(|_| ParseError::malformed("ISO-BMFF", "box size overflows"))?;
                (large, 16)
            }
            n => (n as usize, 8),
        };

        if size < header_len {
            return Err(ParseError::malformed(
                "ISO-BMFF",
                format!(
                    "box '{}' at {} has size {}",
                    String::from_utf8_lossy(&kind),
                    offset,
                    size
                ),
            ));
        }

        Ok(BoxHeader {
            kind,
            offset,
            header_len,
            size,
        })
    }

    /// First byte of the box payload.
    pub fn content_start(&self) -> usize {
        self.offset + self.header_len
    }

    /// First byte after the box.
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.size)
    }
}

/// Find the first box of type `kind` among the sibling boxes in `start..end`.
///
/// The walk stops at the end of the buffer, so boxes beyond the bounded
/// prefix are never found.
pub(crate) fn find_box(
    data: &[u8],
    start: usize,
    end: usize,
    kind: &[u8; 4],
) -> Result<Option<BoxHeader>, ParseError> {
    let end = end.min(data.len());
    let mut pos = start;

    while pos.saturating_add(8) <= end {
        let header = BoxHeader::read(data, pos, end)?;
        if &header.kind == kind {
            return Ok(Some(header));
        }
        pos = header.end();
    }

    Ok(None)
}

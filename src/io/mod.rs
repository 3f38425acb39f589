mod bounded;
pub mod endian;
mod range_reader;

pub use bounded::{read_file_prefix, read_prefix, MAX_INPUT_SIZE};
pub use endian::ByteOrder;
pub use range_reader::{FileRangeReader, RangeReader};

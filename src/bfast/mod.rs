//! BFAST: Binary Format for Array Streaming and Transmission.
//!
//! A BFAST container is a list of named byte arrays:
//!
//! ```text
//! 0     header {magic, data_start, data_end, num_arrays}   32 bytes
//! 32    zero padding                                        to 64
//! 64    num_arrays x {begin: u64, end: u64}                 padded to 64
//! ...   array 0: NUL-terminated names of arrays 1..n
//! ...   array 1..n, each starting on a 64-byte boundary
//! ```
//!
//! All integers are little-endian.

pub mod format;
mod reader;
mod writer;

pub use reader::{read_segments, read_segments_sized, SegmentReader};
pub use writer::{write_segments, Segment};

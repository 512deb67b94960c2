//! BFAST layout constants and header.

/// Magic number in the first eight bytes, little-endian.
pub const MAGIC: u64 = 0xBFA5;

/// `MAGIC` as seen by a reader of the opposite byte order.
pub const SWAPPED_MAGIC: u64 = 0xA5BF << 48;

/// Size of the fixed header in bytes.
pub const HEADER_SIZE: u64 = 32;

/// Size of one `{begin, end}` range entry.
pub const RANGE_SIZE: u64 = 16;

/// Byte offset of the first range entry (header plus padding).
pub const RANGES_START: u64 = 64;

/// Every array starts on a multiple of this.
pub const ALIGNMENT: u64 = 64;

/// Round `n` up to the next multiple of [`ALIGNMENT`].
#[inline]
pub const fn aligned(n: u64) -> u64 {
    n.div_ceil(ALIGNMENT) * ALIGNMENT
}

/// Offset of the first array for a container with `num_arrays` arrays.
#[inline]
pub const fn data_start(num_arrays: u64) -> u64 {
    aligned(RANGES_START + RANGE_SIZE * num_arrays)
}

/// The 32-byte container header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Header {
    pub magic: u64,
    pub data_start: u64,
    pub data_end: u64,
    pub num_arrays: u64,
}

/// Byte range of one array, relative to the start of the container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArrayRange {
    pub begin: u64,
    pub end: u64,
}

impl ArrayRange {
    #[inline]
    pub fn len(&self) -> u64 {
        self.end - self.begin
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end == self.begin
    }
}

/// Ranges for arrays of the given sizes, packed from [`data_start`] with
/// each array aligned.
pub fn layout(sizes: impl ExactSizeIterator<Item = u64>) -> Vec<ArrayRange> {
    let mut pos = data_start(sizes.len() as u64);
    sizes
        .map(|size| {
            let range = ArrayRange { begin: pos, end: pos + size };
            pos = aligned(range.end);
            range
        })
        .collect()
}

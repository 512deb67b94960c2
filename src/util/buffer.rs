//! Owned byte storage with an alignment suitable for every attribute element type.

use std::fmt;
use std::io::Read;

use bytemuck::{Pod, Zeroable};

/// Alignment guaranteed for the start of every [`AlignedBuffer`].
pub const BUFFER_ALIGN: usize = 16;

/// Bytes read per step by [`AlignedBuffer::read_from`].
const READ_STEP: usize = 1 << 20;

#[derive(Clone, Copy, Default, Pod, Zeroable)]
#[repr(C, align(16))]
struct Chunk([u8; BUFFER_ALIGN]);

/// Byte buffer whose start is 16-byte aligned.
///
/// Typed views (`&[Vec3]`, `&[Mat4]`, `&[f64]`, ...) are taken with
/// `bytemuck::try_cast_slice`, which requires the source slice to be aligned
/// for the target type. Storing bytes in 16-byte chunks makes those casts
/// succeed for every element type G3D supports.
#[derive(Clone, Default)]
pub struct AlignedBuffer {
    chunks: Vec<Chunk>,
    len: usize,
}

impl AlignedBuffer {
    /// Create a zero-filled buffer of `len` bytes.
    pub fn zeroed(len: usize) -> Self {
        let num_chunks = len.div_ceil(BUFFER_ALIGN);
        Self { chunks: bytemuck::allocation::zeroed_vec(num_chunks), len }
    }

    /// Grow or shrink to `len` bytes, zero-filling new bytes.
    fn resize(&mut self, len: usize) {
        self.chunks.resize(len.div_ceil(BUFFER_ALIGN), Chunk::zeroed());
        self.len = len;
    }

    /// Copy bytes into a new aligned buffer.
    pub fn from_slice(data: &[u8]) -> Self {
        let mut buf = Self::zeroed(data.len());
        buf.as_bytes_mut().copy_from_slice(data);
        buf
    }

    /// Concatenate byte slices into one buffer.
    pub fn concat<'a>(parts: impl IntoIterator<Item = &'a [u8]> + Clone) -> Self {
        let total = parts.clone().into_iter().map(<[u8]>::len).sum();
        let mut buf = Self::zeroed(total);
        let mut pos = 0;
        let out = buf.as_bytes_mut();
        for part in parts {
            out[pos..pos + part.len()].copy_from_slice(part);
            pos += part.len();
        }
        buf
    }

    /// Read exactly `len` bytes from `reader`.
    ///
    /// Storage grows with the bytes actually read, so a `len` larger than
    /// the input fails with `UnexpectedEof` without allocating `len` bytes.
    pub fn read_from<R: Read + ?Sized>(reader: &mut R, len: usize) -> std::io::Result<Self> {
        let mut buf = Self::default();
        while buf.len < len {
            let start = buf.len;
            buf.resize(start + (len - start).min(READ_STEP));
            reader.read_exact(&mut buf.as_bytes_mut()[start..])?;
        }
        Ok(buf)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        let all: &[u8] = bytemuck::cast_slice(&self.chunks);
        &all[..self.len]
    }

    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        let all: &mut [u8] = bytemuck::cast_slice_mut(&mut self.chunks);
        &mut all[..self.len]
    }
}

impl PartialEq for AlignedBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for AlignedBuffer {}

impl fmt::Debug for AlignedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedBuffer").field("len", &self.len).finish()
    }
}

impl From<&[u8]> for AlignedBuffer {
    fn from(data: &[u8]) -> Self {
        Self::from_slice(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment() {
        for len in [0usize, 1, 15, 16, 17, 100] {
            let buf = AlignedBuffer::zeroed(len);
            assert_eq!(buf.len(), len);
            assert_eq!(buf.as_bytes().as_ptr() as usize % BUFFER_ALIGN, 0);
        }
    }

    #[test]
    fn test_concat() {
        let a: &[u8] = &[1, 2, 3];
        let b: &[u8] = &[4, 5];
        let buf = AlignedBuffer::concat([a, b]);
        assert_eq!(buf.as_bytes(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_read_from() {
        let data = [9u8; 20];
        let mut cursor = std::io::Cursor::new(&data[..]);
        let buf = AlignedBuffer::read_from(&mut cursor, 20).unwrap();
        assert_eq!(buf.as_bytes(), &data[..]);
        assert!(AlignedBuffer::read_from(&mut cursor, 1).is_err());
    }

    #[test]
    fn test_read_from_in_steps() {
        let data: Vec<u8> = (0..READ_STEP + 5).map(|i| i as u8).collect();
        let buf = AlignedBuffer::read_from(&mut data.as_slice(), data.len()).unwrap();
        assert_eq!(buf.as_bytes(), data.as_slice());
    }

    #[test]
    fn test_read_from_short_input() {
        let data = [1u8; 32];
        let err = AlignedBuffer::read_from(&mut &data[..], usize::MAX / 2).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
    }
}

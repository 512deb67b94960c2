//! BFAST container reader.
//!
//! The reader is streaming: it needs only [`Read`], never seeks, and hands
//! each segment to a visitor as a bounded sub-reader.

use std::io::{self, Read};

use byteorder::{LittleEndian, ReadBytesExt};
use tracing::trace;

use super::format::*;
use crate::util::{AlignedBuffer, Error, Result};

/// Input stream that tracks its position.
struct IStream<R: Read> {
    reader: R,
    pos: u64,
}

impl<R: Read> IStream<R> {
    fn read_u64(&mut self) -> Result<u64> {
        let value = self.reader.read_u64::<LittleEndian>().map_err(|e| eof(e, self.pos))?;
        self.pos += 8;
        Ok(value)
    }

    fn read_bytes(&mut self, len: u64) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let n = (&mut self.reader).take(len).read_to_end(&mut buf)? as u64;
        self.pos += n;
        if n < len {
            return Err(Error::UnexpectedEof(self.pos));
        }
        Ok(buf)
    }

    /// Discard bytes up to `target`.
    fn skip_to(&mut self, target: u64) -> Result<()> {
        if target < self.pos {
            return Err(Error::invalid(format!(
                "cannot seek back from {} to {target}",
                self.pos
            )));
        }
        let len = target - self.pos;
        let n = io::copy(&mut (&mut self.reader).take(len), &mut io::sink())?;
        self.pos += n;
        if n < len {
            return Err(Error::UnexpectedEof(self.pos));
        }
        Ok(())
    }
}

fn eof(e: io::Error, pos: u64) -> Error {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        Error::UnexpectedEof(pos)
    } else {
        Error::Io(e)
    }
}

/// Bounded reader over one segment's bytes.
pub struct SegmentReader<'a> {
    inner: io::Take<&'a mut dyn Read>,
    begin: u64,
    size: u64,
}

impl SegmentReader<'_> {
    /// Total segment size in bytes.
    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Bytes not consumed yet.
    #[inline]
    pub fn remaining(&self) -> u64 {
        self.inner.limit()
    }

    /// Read the rest of the segment into an aligned buffer.
    pub fn read_buffer(&mut self) -> Result<AlignedBuffer> {
        let len = usize::try_from(self.remaining())
            .map_err(|_| Error::other(format!("segment of {} bytes does not fit in memory", self.size)))?;
        let pos = self.begin + self.size - self.remaining();
        AlignedBuffer::read_from(&mut self.inner, len).map_err(|e| eof(e, pos))
    }
}

impl Read for SegmentReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

/// Read and check the header. `len`, when known, is the total input size.
fn read_header<R: Read>(stream: &mut IStream<R>, len: Option<u64>) -> Result<Header> {
    let magic = stream.read_u64()?;
    if magic == SWAPPED_MAGIC {
        return Err(Error::Endianness);
    }
    if magic != MAGIC {
        return Err(Error::InvalidMagic(magic));
    }
    let header = Header {
        magic,
        data_start: stream.read_u64()?,
        data_end: stream.read_u64()?,
        num_arrays: stream.read_u64()?,
    };
    if header.data_end < header.data_start {
        return Err(Error::invalid(format!(
            "data ends at {} before it starts at {}",
            header.data_end, header.data_start
        )));
    }
    if let Some(len) = len {
        if header.data_end > len {
            return Err(Error::invalid(format!(
                "data ends at {} past the end of the {len}-byte input",
                header.data_end
            )));
        }
    }
    Ok(header)
}

/// Ranges must be ordered, non-overlapping and inside the data section.
fn read_ranges<R: Read>(stream: &mut IStream<R>, header: &Header) -> Result<Vec<ArrayRange>> {
    if header.num_arrays == 0 {
        return Ok(Vec::new());
    }
    // The range table sits between RANGES_START and data_start.
    let capacity = header.data_start.saturating_sub(RANGES_START) / RANGE_SIZE;
    if header.num_arrays > capacity {
        return Err(Error::invalid(format!(
            "{} arrays do not fit in a range table ending at {}",
            header.num_arrays, header.data_start
        )));
    }
    stream.skip_to(RANGES_START)?;

    let mut ranges: Vec<ArrayRange> = Vec::new();
    for i in 0..header.num_arrays {
        let range = ArrayRange { begin: stream.read_u64()?, end: stream.read_u64()? };
        if range.begin > range.end {
            return Err(Error::invalid(format!("array {i} begins after it ends")));
        }
        if range.begin < header.data_start || range.end > header.data_end {
            return Err(Error::invalid(format!(
                "array {i} ({}..{}) is outside the data section",
                range.begin, range.end
            )));
        }
        if let Some(prev) = ranges.last() {
            if range.begin < prev.end {
                return Err(Error::invalid(format!("array {i} overlaps the previous array")));
            }
        }
        ranges.push(range);
    }
    Ok(ranges)
}

fn split_names(bytes: &[u8]) -> Result<Vec<String>> {
    let bytes = bytes.strip_suffix(&[0]).unwrap_or(bytes);
    if bytes.is_empty() {
        return Ok(Vec::new());
    }
    bytes
        .split(|&b| b == 0)
        .map(|name| Ok(String::from_utf8(name.to_vec())?))
        .collect()
}

/// Read a BFAST container, calling `visit` for every segment in order.
///
/// The visitor receives a reader limited to the segment, the segment name
/// and its size. Bytes it leaves unread are skipped. Every `Some` it
/// returns is collected.
pub fn read_segments<R, T, F>(reader: R, visit: F) -> Result<Vec<T>>
where
    R: Read,
    F: FnMut(&mut SegmentReader<'_>, &str, u64) -> Result<Option<T>>,
{
    read_segments_impl(reader, None, visit)
}

/// Like [`read_segments`] for an input of known size `len`. A header whose
/// data section extends past `len` is rejected before any segment is read.
pub fn read_segments_sized<R, T, F>(reader: R, len: u64, visit: F) -> Result<Vec<T>>
where
    R: Read,
    F: FnMut(&mut SegmentReader<'_>, &str, u64) -> Result<Option<T>>,
{
    read_segments_impl(reader, Some(len), visit)
}

fn read_segments_impl<R, T, F>(reader: R, len: Option<u64>, mut visit: F) -> Result<Vec<T>>
where
    R: Read,
    F: FnMut(&mut SegmentReader<'_>, &str, u64) -> Result<Option<T>>,
{
    let mut stream = IStream { reader, pos: 0 };
    let header = read_header(&mut stream, len)?;
    let ranges = read_ranges(&mut stream, &header)?;
    let Some((names_range, data_ranges)) = ranges.split_first() else {
        return Ok(Vec::new());
    };

    stream.skip_to(names_range.begin)?;
    let names = split_names(&stream.read_bytes(names_range.len())?)?;
    if names.len() != data_ranges.len() {
        return Err(Error::invalid(format!(
            "{} names for {} arrays",
            names.len(),
            data_ranges.len()
        )));
    }

    let mut out = Vec::new();
    for (name, range) in names.iter().zip(data_ranges) {
        stream.skip_to(range.begin)?;
        let size = range.len();
        trace!(segment = %name, size, "reading segment");
        let mut segment = SegmentReader {
            inner: (&mut stream.reader as &mut dyn Read).take(size),
            begin: range.begin,
            size,
        };
        if let Some(value) = visit(&mut segment, name, size)? {
            out.push(value);
        }
        let rest = segment.remaining();
        let drained = io::copy(&mut segment.inner, &mut io::sink())?;
        if drained < rest {
            return Err(Error::UnexpectedEof(range.end - (rest - drained)));
        }
        stream.pos = range.end;
    }
    Ok(out)
}

//! BFAST container writer.

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};
use tracing::trace;

use super::format::*;
use crate::util::{Error, Result};

/// A named byte array to store.
#[derive(Clone, Copy, Debug)]
pub struct Segment<'a> {
    pub name: &'a str,
    pub data: &'a [u8],
}

impl<'a> Segment<'a> {
    pub fn new(name: &'a str, data: &'a [u8]) -> Self {
        Self { name, data }
    }
}

/// Output stream that tracks its position for padding.
struct OStream<W: Write> {
    writer: W,
    pos: u64,
}

impl<W: Write> OStream<W> {
    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.pos += data.len() as u64;
        Ok(())
    }

    fn write_u64(&mut self, value: u64) -> Result<()> {
        self.writer.write_u64::<LittleEndian>(value)?;
        self.pos += 8;
        Ok(())
    }

    /// Zero-fill up to `target`.
    fn pad_to(&mut self, target: u64) -> Result<()> {
        const ZEROS: [u8; ALIGNMENT as usize] = [0; ALIGNMENT as usize];
        while self.pos < target {
            let n = (target - self.pos).min(ALIGNMENT) as usize;
            self.write_bytes(&ZEROS[..n])?;
        }
        Ok(())
    }
}

/// Write segments as a BFAST container. Returns the number of bytes written.
///
/// Array 0 holds the NUL-terminated names; segment `i` is array `i + 1`.
/// Names must not contain NUL.
pub fn write_segments<W: Write>(writer: W, segments: &[Segment<'_>]) -> Result<u64> {
    let mut names = Vec::new();
    for seg in segments {
        if seg.name.contains('\0') {
            return Err(Error::invalid(format!("segment name {:?} contains NUL", seg.name)));
        }
        names.extend_from_slice(seg.name.as_bytes());
        names.push(0);
    }

    let arrays: Vec<&[u8]> = std::iter::once(names.as_slice())
        .chain(segments.iter().map(|s| s.data))
        .collect();
    let ranges = layout(arrays.iter().map(|a| a.len() as u64));
    let header = Header {
        magic: MAGIC,
        data_start: ranges.first().map_or(0, |r| r.begin),
        data_end: ranges.last().map_or(0, |r| r.end),
        num_arrays: ranges.len() as u64,
    };

    let mut out = OStream { writer, pos: 0 };
    out.write_u64(header.magic)?;
    out.write_u64(header.data_start)?;
    out.write_u64(header.data_end)?;
    out.write_u64(header.num_arrays)?;
    out.pad_to(RANGES_START)?;

    for range in &ranges {
        out.write_u64(range.begin)?;
        out.write_u64(range.end)?;
    }

    for (data, range) in arrays.iter().zip(&ranges) {
        out.pad_to(range.begin)?;
        out.write_bytes(data)?;
        trace!(begin = range.begin, len = data.len(), "wrote array");
    }
    out.writer.flush()?;
    Ok(out.pos)
}

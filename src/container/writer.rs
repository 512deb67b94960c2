//! Encoding a meta header and attributes as a G3D container.

use std::io::Write;

use crate::attribute::Attribute;
use crate::bfast::{write_segments, Segment};
use crate::geometry::header::META_SEGMENT_NAME;
use crate::geometry::MetaHeader;
use crate::util::{Error, Result};

/// Write the meta segment followed by one segment per attribute, sorted by
/// descriptor string. Two attributes with the same descriptor are an error.
pub(crate) fn write_container<'a, W: Write>(
    writer: W,
    header: &MetaHeader,
    attributes: impl IntoIterator<Item = &'a Attribute>,
) -> Result<u64> {
    let mut named: Vec<(String, &Attribute)> =
        attributes.into_iter().map(|a| (a.name(), a)).collect();
    named.sort_by(|a, b| a.0.cmp(&b.0));
    if let Some(pair) = named.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(Error::invalid(format!("duplicate attribute {}", pair[0].0)));
    }

    let meta = header.to_bytes();
    let segments: Vec<Segment<'_>> = std::iter::once(Segment::new(META_SEGMENT_NAME, &meta))
        .chain(named.iter().map(|(name, attr)| Segment::new(name, attr.bytes())))
        .collect();
    write_segments(writer, &segments)
}

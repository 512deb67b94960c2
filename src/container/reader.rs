//! Decoding a G3D container into a meta header and attributes.

use std::io::Read;

use tracing::{debug, warn};

use crate::attribute::Attribute;
use crate::bfast::{read_segments, read_segments_sized, SegmentReader};
use crate::descriptor::AttributeDescriptor;
use crate::geometry::MetaHeader;
use crate::util::{Error, Result};

enum Item {
    Meta(MetaHeader),
    Attribute(Attribute),
}

fn read_item(segment: &mut SegmentReader<'_>, name: &str, size: u64) -> Result<Option<Item>> {
    if MetaHeader::is_meta_segment(name, size) {
        let bytes = segment.read_buffer()?;
        return Ok(Some(Item::Meta(MetaHeader::from_bytes(bytes.as_bytes())?)));
    }
    let Some(descriptor) = AttributeDescriptor::try_parse(name) else {
        debug!(segment = name, size, "skipping segment that is not an attribute descriptor");
        return Ok(None);
    };
    let data = segment.read_buffer()?;
    Attribute::new(descriptor, data).map(|a| Some(Item::Attribute(a)))
}

/// Read the meta header and every recognizable attribute.
///
/// Segments whose names are not valid descriptors are skipped. A missing
/// or malformed meta segment is an error. `len` is the input size when it
/// is known up front.
pub(crate) fn read_container<R: Read>(
    reader: R,
    len: Option<u64>,
) -> Result<(MetaHeader, Vec<Attribute>)> {
    let items = match len {
        Some(len) => read_segments_sized(reader, len, read_item)?,
        None => read_segments(reader, read_item)?,
    };

    let mut header = None;
    let mut attributes = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Item::Meta(meta) if header.is_none() => header = Some(meta),
            Item::Meta(_) => warn!("ignoring repeated meta segment"),
            Item::Attribute(attr) => attributes.push(attr),
        }
    }
    let header = header.ok_or(Error::MissingMetaHeader)?;
    debug!(num_attributes = attributes.len(), "read container");
    Ok((header, attributes))
}

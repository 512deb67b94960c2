//! Merging several collections into one.
//!
//! Data attributes are concatenated in input order. Index-into attributes
//! are shifted by the number of target elements that precede each input, so
//! every merged index still points at the element it pointed at before.
//! The no-relation sentinel is never shifted.

use smallvec::SmallVec;
use tracing::debug;

use crate::attribute::Attribute;
use crate::descriptor::{common, semantic, Association, AttributeDescriptor};
use crate::geometry::{index_relation, CountKind, GeometryAttributes};
use crate::relation::{rebase, NO_RELATION};
use crate::schema::{Slot, VimAttributes};
use crate::util::{Error, Result};

pub use crate::relation::counts_to_offsets;

/// Per-input running totals. Merges rarely have many inputs.
type Bases = SmallVec<[usize; 8]>;

/// Shift each part by its paired base and concatenate. Negative values are
/// kept as they are.
///
/// Fails when a shifted value no longer fits in an `i32`.
pub fn rebase_indices(parts: &[(&[i32], usize)]) -> Result<Vec<i32>> {
    let mut out = Vec::with_capacity(parts.iter().map(|(values, _)| values.len()).sum());
    for &(values, base) in parts {
        let shift = i32::try_from(base)
            .map_err(|_| Error::other(format!("index base {base} does not fit in int32")))?;
        for &v in values {
            if v < 0 {
                out.push(v);
                continue;
            }
            let shifted = v
                .checked_add(shift)
                .ok_or_else(|| Error::other(format!("index {v} + {base} overflows int32")))?;
            out.push(shifted);
        }
    }
    Ok(out)
}

/// Sub-geometries an input contributes: one spanning everything when it
/// has none.
fn effective_subgeometries(g: &GeometryAttributes) -> usize {
    g.num_subgeometries().max(1)
}

fn target_count(g: &GeometryAttributes, kind: CountKind) -> usize {
    match kind {
        CountKind::Subgeometries => effective_subgeometries(g),
        kind => g.counts().get(kind),
    }
}

/// Elements an input contributes to an attribute with this descriptor.
fn contributed_count(g: &GeometryAttributes, desc: &AttributeDescriptor) -> usize {
    match desc.association {
        Association::Subgeometry => effective_subgeometries(g),
        _ => g.expected_element_count(desc).unwrap_or(0),
    }
}

fn running_bases(inputs: &[GeometryAttributes], count: impl Fn(&GeometryAttributes) -> usize) -> Bases {
    let mut total = 0;
    inputs
        .iter()
        .map(|g| {
            let base = total;
            total += count(g);
            base
        })
        .collect()
}

/// Offset table over every input's sub-geometries, in merged coordinates.
fn merged_offsets(
    inputs: &[GeometryAttributes],
    bases: &Bases,
    start: impl Fn(&GeometryAttributes, usize) -> usize,
) -> Vec<i64> {
    let start = &start;
    inputs
        .iter()
        .zip(bases)
        .flat_map(|(g, &base)| {
            (0..effective_subgeometries(g)).map(move |i| (base + start(g, i)) as i64)
        })
        .collect()
}

fn merge_relation(
    inputs: &[GeometryAttributes],
    desc: &AttributeDescriptor,
    target: CountKind,
) -> Result<Attribute> {
    let bases = running_bases(inputs, |g| target_count(g, target));
    let mut values = Vec::new();
    for (g, &base) in inputs.iter().zip(&bases) {
        match g.attribute_by_descriptor(desc) {
            Some(attr) => values.extend(rebase(&attr.to_integers()?, base)),
            None => {
                let n = contributed_count(g, desc) * desc.data_arity as usize;
                values.extend(std::iter::repeat(NO_RELATION).take(n));
            }
        }
    }
    Attribute::from_integers(desc.clone(), &values)
}

/// Start offsets rebased by the running size of their target. An input
/// without the table starts every one of its elements at its base.
fn merge_offset_table(
    inputs: &[GeometryAttributes],
    desc: &AttributeDescriptor,
    target: CountKind,
) -> Result<Attribute> {
    let bases = running_bases(inputs, |g| target_count(g, target));
    let mut values = Vec::new();
    for (g, &base) in inputs.iter().zip(&bases) {
        match g.attribute_by_descriptor(desc) {
            Some(attr) => values.extend(rebase(&attr.to_integers()?, base)),
            None => {
                let n = contributed_count(g, desc) * desc.data_arity as usize;
                values.extend(std::iter::repeat(base as i64).take(n));
            }
        }
    }
    Attribute::from_integers(desc.clone(), &values)
}

fn merge_data(inputs: &[GeometryAttributes], desc: &AttributeDescriptor) -> Result<Attribute> {
    let parts = inputs
        .iter()
        .map(|g| match g.attribute_by_descriptor(desc) {
            Some(attr) if g.num_subgeometries() > 0 || desc.association != Association::Subgeometry => {
                Ok(attr.clone())
            }
            _ => Attribute::default_attribute(desc.clone(), contributed_count(g, desc)),
        })
        .collect::<Result<Vec<_>>>()?;
    Attribute::concat(desc.clone(), &parts)
}

/// Merge open collections into one.
///
/// All inputs must have the same corners per face. The result has the
/// attributes of the first input, and always carries sub-geometry index and
/// vertex offset tables with one entry per input sub-geometry. `all`
/// attributes are taken from the first input. A single input is returned as
/// is; no input gives `None`.
pub fn merge_geometries(inputs: Vec<GeometryAttributes>) -> Result<Option<GeometryAttributes>> {
    let mut inputs = inputs;
    if inputs.len() <= 1 {
        return Ok(inputs.pop());
    }
    let first = &inputs[0];
    let cpf = first.corners_per_face();
    if let Some(other) = inputs.iter().find(|g| g.corners_per_face() != cpf) {
        return Err(Error::CornersPerFaceMismatch { expected: cpf, actual: other.corners_per_face() });
    }

    let index_desc = first
        .attributes()
        .iter()
        .map(Attribute::descriptor)
        .find(|d| d.same_role(&Association::Subgeometry, semantic::INDEX_OFFSET))
        .cloned()
        .unwrap_or_else(common::subgeometry_index_offset);
    let vertex_desc = first
        .attributes()
        .iter()
        .map(Attribute::descriptor)
        .find(|d| d.same_role(&Association::Subgeometry, semantic::VERTEX_OFFSET))
        .cloned()
        .unwrap_or_else(common::subgeometry_vertex_offset);

    let mut merged = Vec::with_capacity(first.attributes().len() + 2);
    for attr in first.attributes() {
        let desc = attr.descriptor();
        if desc == &index_desc || desc == &vertex_desc {
            continue;
        }
        let attr = match (&desc.association, index_relation(desc)) {
            (Association::All, _) => attr.clone(),
            (_, Some(rel)) if rel.offset_table => merge_offset_table(&inputs, desc, rel.target)?,
            (_, Some(rel)) => merge_relation(&inputs, desc, rel.target)?,
            _ => merge_data(&inputs, desc)?,
        };
        merged.push(attr);
    }

    let corner_bases = running_bases(&inputs, GeometryAttributes::num_corners);
    let vertex_bases = running_bases(&inputs, GeometryAttributes::num_vertices);
    let index_offsets =
        merged_offsets(&inputs, &corner_bases, |g, i| g.subgeometry_index_range(i).start);
    let vertex_offsets =
        merged_offsets(&inputs, &vertex_bases, |g, i| g.subgeometry_vertex_range(i).start);
    merged.push(Attribute::from_integers(index_desc, &index_offsets)?);
    merged.push(Attribute::from_integers(vertex_desc, &vertex_offsets)?);

    debug!(
        inputs = inputs.len(),
        attributes = merged.len(),
        subgeometries = index_offsets.len(),
        "merged geometries"
    );
    GeometryAttributes::with_header(merged, *first.header()).map(Some)
}

/// Merge fixed-schema collections slot by slot.
///
/// The result fills exactly the slots of the first input. No input gives an
/// empty collection.
pub fn merge_vim(inputs: Vec<VimAttributes>) -> Result<VimAttributes> {
    let mut inputs = inputs;
    if inputs.len() <= 1 {
        return Ok(inputs.pop().unwrap_or_default());
    }
    let (first, rest) = inputs.split_at(1);
    let first = &first[0];
    let others: Vec<&VimAttributes> = rest.iter().collect();

    let mut merged = VimAttributes::with_header(*first.header());
    for slot in Slot::ALL {
        if let Some(attr) = first.merge_attribute(slot, &others)? {
            merged.set(slot, attr)?;
        }
    }
    debug!(inputs = inputs.len(), slots = merged.attributes().count(), "merged VIM attributes");
    Ok(merged)
}

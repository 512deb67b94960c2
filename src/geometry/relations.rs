//! Index-into relations inferred from association and semantic.

use crate::descriptor::{semantic, Association, AttributeDescriptor};

/// A derived element count of a geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CountKind {
    Vertices,
    Corners,
    Faces,
    Groups,
    Subgeometries,
    Instances,
}

impl CountKind {
    /// Count an association maps to, if any.
    pub fn of(association: &Association) -> Option<Self> {
        match association {
            Association::Vertex => Some(Self::Vertices),
            Association::Corner | Association::Edge => Some(Self::Corners),
            Association::Face => Some(Self::Faces),
            Association::Group => Some(Self::Groups),
            Association::Subgeometry => Some(Self::Subgeometries),
            Association::Instance => Some(Self::Instances),
            Association::None | Association::All | Association::Custom(_) => None,
        }
    }
}

/// How an index-valued attribute relates to its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexRelation {
    /// Count the values index into.
    pub target: CountKind,
    /// Values are start offsets of ranges of the target; the end of the
    /// target is a valid value.
    pub offset_table: bool,
}

impl IndexRelation {
    const fn into(target: CountKind) -> Self {
        Self { target, offset_table: false }
    }

    const fn table(target: CountKind) -> Self {
        Self { target, offset_table: true }
    }

    /// Largest valid value for a target with `count` elements.
    pub fn max_index(&self, count: usize) -> i64 {
        if self.offset_table {
            count as i64
        } else {
            count as i64 - 1
        }
    }
}

/// Relation of an attribute, or `None` for plain data.
///
/// Only integer attributes can carry a relation.
pub fn index_relation(desc: &AttributeDescriptor) -> Option<IndexRelation> {
    if !desc.data_type.is_integer() {
        return None;
    }
    let rel = match (&desc.association, desc.semantic.as_str()) {
        (Association::Corner, semantic::INDEX) => IndexRelation::into(CountKind::Vertices),
        (Association::Face, semantic::INDEX) => IndexRelation::into(CountKind::Vertices),
        (Association::Group, semantic::INDEX_OFFSET) => IndexRelation::table(CountKind::Corners),
        (Association::Group, semantic::VERTEX_OFFSET) => IndexRelation::table(CountKind::Vertices),
        (Association::Face, semantic::GROUP) => IndexRelation::into(CountKind::Groups),
        (Association::Instance, semantic::PARENT) => IndexRelation::into(CountKind::Instances),
        (Association::Instance, semantic::SUBGEOMETRY) => {
            IndexRelation::into(CountKind::Subgeometries)
        }
        (Association::Subgeometry, semantic::INDEX_OFFSET) => IndexRelation::table(CountKind::Corners),
        (Association::Subgeometry, semantic::VERTEX_OFFSET) => {
            IndexRelation::table(CountKind::Vertices)
        }
        _ => return None,
    };
    Some(rel)
}

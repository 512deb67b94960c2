//! Descriptors of the attributes the library itself understands.

use super::semantic;
use super::{Association, AttributeDescriptor};
use crate::util::DataType;

fn desc(assoc: Association, sem: &str, index: u32, dt: DataType, arity: u32) -> AttributeDescriptor {
    AttributeDescriptor::new(assoc, sem, index, dt, arity)
}

/// `g3d:vertex:position:0:float32:3`
pub fn position() -> AttributeDescriptor {
    desc(Association::Vertex, semantic::POSITION, 0, DataType::Float32, 3)
}

/// `g3d:corner:index:0:int32:1`
pub fn index() -> AttributeDescriptor {
    desc(Association::Corner, semantic::INDEX, 0, DataType::Int32, 1)
}

/// `g3d:all:facesize:0:int32:1`
pub fn corners_per_face() -> AttributeDescriptor {
    desc(Association::All, semantic::FACE_SIZE, 0, DataType::Int32, 1)
}

pub fn vertex_uv(channel: u32) -> AttributeDescriptor {
    desc(Association::Vertex, semantic::UV, channel, DataType::Float32, 2)
}

pub fn vertex_uvw(channel: u32) -> AttributeDescriptor {
    desc(Association::Vertex, semantic::UV, channel, DataType::Float32, 3)
}

pub fn vertex_normal() -> AttributeDescriptor {
    desc(Association::Vertex, semantic::NORMAL, 0, DataType::Float32, 3)
}

pub fn face_normal() -> AttributeDescriptor {
    desc(Association::Face, semantic::NORMAL, 0, DataType::Float32, 3)
}

pub fn vertex_color(channel: u32) -> AttributeDescriptor {
    desc(Association::Vertex, semantic::COLOR, channel, DataType::Float32, 3)
}

pub fn vertex_color_with_alpha(channel: u32) -> AttributeDescriptor {
    desc(Association::Vertex, semantic::COLOR, channel, DataType::Float32, 4)
}

pub fn face_color() -> AttributeDescriptor {
    desc(Association::Face, semantic::COLOR, 0, DataType::Float32, 4)
}

pub fn vertex_tangent() -> AttributeDescriptor {
    desc(Association::Vertex, semantic::TANGENT, 0, DataType::Float32, 4)
}

pub fn vertex_bitangent() -> AttributeDescriptor {
    desc(Association::Vertex, semantic::BITANGENT, 0, DataType::Float32, 3)
}

pub fn vertex_weight() -> AttributeDescriptor {
    desc(Association::Vertex, semantic::WEIGHT, 0, DataType::Float32, 1)
}

pub fn face_material_id() -> AttributeDescriptor {
    desc(Association::Face, semantic::MATERIAL_ID, 0, DataType::Int32, 1)
}

/// Group each face belongs to; indexes into the groups.
pub fn face_group() -> AttributeDescriptor {
    desc(Association::Face, semantic::GROUP, 0, DataType::Int32, 1)
}

pub fn group_material_id() -> AttributeDescriptor {
    desc(Association::Group, semantic::MATERIAL_ID, 0, DataType::Int32, 1)
}

/// First corner of each group.
pub fn group_index_offset() -> AttributeDescriptor {
    desc(Association::Group, semantic::INDEX_OFFSET, 0, DataType::Int32, 1)
}

/// First vertex of each group.
pub fn group_vertex_offset() -> AttributeDescriptor {
    desc(Association::Group, semantic::VERTEX_OFFSET, 0, DataType::Int32, 1)
}

/// First corner of each sub-geometry.
pub fn subgeometry_index_offset() -> AttributeDescriptor {
    desc(Association::Subgeometry, semantic::INDEX_OFFSET, 0, DataType::Int32, 1)
}

/// First vertex of each sub-geometry.
pub fn subgeometry_vertex_offset() -> AttributeDescriptor {
    desc(Association::Subgeometry, semantic::VERTEX_OFFSET, 0, DataType::Int32, 1)
}

pub fn subgeometry_material_id() -> AttributeDescriptor {
    desc(Association::Subgeometry, semantic::MATERIAL_ID, 0, DataType::Int32, 1)
}

/// `g3d:instance:transform:0:float32:16`
pub fn instance_transform() -> AttributeDescriptor {
    desc(Association::Instance, semantic::TRANSFORM, 0, DataType::Float32, 16)
}

/// Parent of each instance, `-1` for roots.
pub fn instance_parent() -> AttributeDescriptor {
    desc(Association::Instance, semantic::PARENT, 0, DataType::Int32, 1)
}

/// Sub-geometry placed by each instance, `-1` for none.
pub fn instance_subgeometry() -> AttributeDescriptor {
    desc(Association::Instance, semantic::SUBGEOMETRY, 0, DataType::Int32, 1)
}

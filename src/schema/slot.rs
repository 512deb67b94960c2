//! Slot table of the fixed VIM schema.

use std::fmt;

use crate::descriptor::{Association, AttributeDescriptor};
use crate::util::DataType;

/// How a slot's values are interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotKind {
    /// A single value for the whole collection.
    Singleton,
    /// Plain per-element data.
    Data,
    /// Per-element index into the elements of another slot.
    Index { into: Slot },
}

/// One attribute slot of [`VimAttributes`](super::VimAttributes).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    CornersPerFace,
    Vertex,
    Index,
    InstanceTransform,
    InstanceParent,
    InstanceFlags,
    InstanceMesh,
    MeshSubmeshOffset,
    SubmeshIndexOffset,
    SubmeshMaterial,
    MaterialColor,
    MaterialGlossiness,
    MaterialSmoothness,
    ShapeVertex,
    ShapeVertexOffset,
    ShapeColor,
    ShapeWidth,
}

impl Slot {
    pub const COUNT: usize = 17;

    pub const ALL: [Slot; Self::COUNT] = [
        Self::CornersPerFace,
        Self::Vertex,
        Self::Index,
        Self::InstanceTransform,
        Self::InstanceParent,
        Self::InstanceFlags,
        Self::InstanceMesh,
        Self::MeshSubmeshOffset,
        Self::SubmeshIndexOffset,
        Self::SubmeshMaterial,
        Self::MaterialColor,
        Self::MaterialGlossiness,
        Self::MaterialSmoothness,
        Self::ShapeVertex,
        Self::ShapeVertexOffset,
        Self::ShapeColor,
        Self::ShapeWidth,
    ];

    /// Canonical descriptor string of the slot.
    pub const fn name(self) -> &'static str {
        match self {
            Self::CornersPerFace => "g3d:all:facesize:0:int32:1",
            Self::Vertex => "g3d:vertex:position:0:float32:3",
            Self::Index => "g3d:corner:index:0:int32:1",
            Self::InstanceTransform => "g3d:instance:transform:0:float32:16",
            Self::InstanceParent => "g3d:instance:parent:0:int32:1",
            Self::InstanceFlags => "g3d:instance:flags:0:uint16:1",
            Self::InstanceMesh => "g3d:instance:mesh:0:int32:1",
            Self::MeshSubmeshOffset => "g3d:mesh:submeshoffset:0:int32:1",
            Self::SubmeshIndexOffset => "g3d:submesh:indexoffset:0:int32:1",
            Self::SubmeshMaterial => "g3d:submesh:material:0:int32:1",
            Self::MaterialColor => "g3d:material:color:0:float32:4",
            Self::MaterialGlossiness => "g3d:material:glossiness:0:float32:1",
            Self::MaterialSmoothness => "g3d:material:smoothness:0:float32:1",
            Self::ShapeVertex => "g3d:shapevertex:position:0:float32:3",
            Self::ShapeVertexOffset => "g3d:shape:vertexoffset:0:int32:1",
            Self::ShapeColor => "g3d:shape:color:0:float32:4",
            Self::ShapeWidth => "g3d:shape:width:0:float32:1",
        }
    }

    /// Identifier used in diagnostics.
    pub const fn label(self) -> &'static str {
        match self {
            Self::CornersPerFace => "CornersPerFace",
            Self::Vertex => "Vertex",
            Self::Index => "Index",
            Self::InstanceTransform => "InstanceTransform",
            Self::InstanceParent => "InstanceParent",
            Self::InstanceFlags => "InstanceFlags",
            Self::InstanceMesh => "InstanceMesh",
            Self::MeshSubmeshOffset => "MeshSubmeshOffset",
            Self::SubmeshIndexOffset => "SubmeshIndexOffset",
            Self::SubmeshMaterial => "SubmeshMaterial",
            Self::MaterialColor => "MaterialColor",
            Self::MaterialGlossiness => "MaterialGlossiness",
            Self::MaterialSmoothness => "MaterialSmoothness",
            Self::ShapeVertex => "ShapeVertex",
            Self::ShapeVertexOffset => "ShapeVertexOffset",
            Self::ShapeColor => "ShapeColor",
            Self::ShapeWidth => "ShapeWidth",
        }
    }

    pub const fn kind(self) -> SlotKind {
        match self {
            Self::CornersPerFace => SlotKind::Singleton,
            Self::Index => SlotKind::Index { into: Self::Vertex },
            Self::InstanceParent => SlotKind::Index { into: Self::InstanceTransform },
            Self::InstanceMesh => SlotKind::Index { into: Self::MeshSubmeshOffset },
            Self::MeshSubmeshOffset => SlotKind::Index { into: Self::SubmeshIndexOffset },
            Self::SubmeshIndexOffset => SlotKind::Index { into: Self::Index },
            Self::SubmeshMaterial => SlotKind::Index { into: Self::MaterialColor },
            Self::ShapeVertexOffset => SlotKind::Index { into: Self::ShapeVertex },
            Self::Vertex
            | Self::InstanceTransform
            | Self::InstanceFlags
            | Self::MaterialColor
            | Self::MaterialGlossiness
            | Self::MaterialSmoothness
            | Self::ShapeVertex
            | Self::ShapeColor
            | Self::ShapeWidth => SlotKind::Data,
        }
    }

    /// Slot whose length defines the element count of this slot's
    /// association.
    pub const fn count_source(self) -> Slot {
        match self {
            Self::CornersPerFace => Self::CornersPerFace,
            Self::Vertex => Self::Vertex,
            Self::Index => Self::Index,
            Self::InstanceTransform
            | Self::InstanceParent
            | Self::InstanceFlags
            | Self::InstanceMesh => Self::InstanceTransform,
            Self::MeshSubmeshOffset => Self::MeshSubmeshOffset,
            Self::SubmeshIndexOffset | Self::SubmeshMaterial => Self::SubmeshIndexOffset,
            Self::MaterialColor | Self::MaterialGlossiness | Self::MaterialSmoothness => {
                Self::MaterialColor
            }
            Self::ShapeVertex => Self::ShapeVertex,
            Self::ShapeVertexOffset | Self::ShapeColor | Self::ShapeWidth => {
                Self::ShapeVertexOffset
            }
        }
    }

    fn parts(self) -> (Association, &'static str, DataType, u32) {
        let custom = |name: &str| Association::custom(name);
        match self {
            Self::CornersPerFace => (Association::All, "facesize", DataType::Int32, 1),
            Self::Vertex => (Association::Vertex, "position", DataType::Float32, 3),
            Self::Index => (Association::Corner, "index", DataType::Int32, 1),
            Self::InstanceTransform => (Association::Instance, "transform", DataType::Float32, 16),
            Self::InstanceParent => (Association::Instance, "parent", DataType::Int32, 1),
            Self::InstanceFlags => (Association::Instance, "flags", DataType::Uint16, 1),
            Self::InstanceMesh => (Association::Instance, "mesh", DataType::Int32, 1),
            Self::MeshSubmeshOffset => (custom("mesh"), "submeshoffset", DataType::Int32, 1),
            Self::SubmeshIndexOffset => (custom("submesh"), "indexoffset", DataType::Int32, 1),
            Self::SubmeshMaterial => (custom("submesh"), "material", DataType::Int32, 1),
            Self::MaterialColor => (custom("material"), "color", DataType::Float32, 4),
            Self::MaterialGlossiness => (custom("material"), "glossiness", DataType::Float32, 1),
            Self::MaterialSmoothness => (custom("material"), "smoothness", DataType::Float32, 1),
            Self::ShapeVertex => (custom("shapevertex"), "position", DataType::Float32, 3),
            Self::ShapeVertexOffset => (custom("shape"), "vertexoffset", DataType::Int32, 1),
            Self::ShapeColor => (custom("shape"), "color", DataType::Float32, 4),
            Self::ShapeWidth => (custom("shape"), "width", DataType::Float32, 1),
        }
    }

    pub fn descriptor(self) -> AttributeDescriptor {
        let (association, semantic, data_type, arity) = self.parts();
        AttributeDescriptor::new(association, semantic, 0, data_type, arity)
    }

    pub fn from_name(name: &str) -> Option<Slot> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    pub fn from_descriptor(desc: &AttributeDescriptor) -> Option<Slot> {
        Self::ALL.into_iter().find(|s| &s.descriptor() == desc)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_match_descriptors() {
        for slot in Slot::ALL {
            assert_eq!(slot.descriptor().to_string(), slot.name(), "{slot}");
            assert_eq!(Slot::from_name(slot.name()), Some(slot));
        }
        assert_eq!(Slot::from_name("g3d:vertex:position:1:float32:3"), None);
    }

    #[test]
    fn test_index_targets() {
        assert_eq!(Slot::Index.kind(), SlotKind::Index { into: Slot::Vertex });
        assert_eq!(Slot::SubmeshIndexOffset.kind(), SlotKind::Index { into: Slot::Index });
        assert_eq!(Slot::CornersPerFace.kind(), SlotKind::Singleton);
        assert_eq!(Slot::MaterialGlossiness.kind(), SlotKind::Data);
    }

    #[test]
    fn test_count_sources_share_association() {
        for slot in Slot::ALL {
            let source = slot.count_source();
            assert_eq!(slot.descriptor().association, source.descriptor().association, "{slot}");
            assert_eq!(source.count_source(), source);
        }
    }
}

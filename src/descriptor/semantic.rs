//! Well-known semantic names.

pub const POSITION: &str = "position";
pub const INDEX: &str = "index";
pub const FACE_SIZE: &str = "facesize";
pub const UV: &str = "uv";
pub const NORMAL: &str = "normal";
pub const COLOR: &str = "color";
pub const TANGENT: &str = "tangent";
pub const BITANGENT: &str = "bitangent";
pub const WEIGHT: &str = "weight";

/// Usually associated with faces or groups.
pub const MATERIAL_ID: &str = "materialid";

/// Start of a sub-unit in the index buffer.
pub const INDEX_OFFSET: &str = "indexoffset";
/// Start of a sub-unit in the vertex buffer.
pub const VERTEX_OFFSET: &str = "vertexoffset";

pub const SUBGEOMETRY: &str = "subgeometry";
pub const PARENT: &str = "parent";
pub const TRANSFORM: &str = "transform";

pub const GROUP: &str = "group";
pub const GROUP_ID: &str = "groupid";

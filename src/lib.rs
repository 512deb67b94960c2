//! # G3D
//!
//! Rust implementation of G3D, a self-describing binary format for 3D mesh
//! geometry.
//!
//! A G3D file is a list of attribute buffers. Each buffer is named by a
//! descriptor such as `g3d:vertex:position:0:float32:3` that states what one
//! element belongs to, what it means, and how it is laid out. Readers can
//! skip buffers they do not understand.
//!
//! ## Modules
//!
//! - [`util`] - Basic types (DataType, element trait, aligned buffers, errors)
//! - [`descriptor`] - Descriptor grammar and common descriptors
//! - [`attribute`] - Attribute buffers and typed views
//! - [`geometry`] - Open attribute collection with derived counts
//! - [`schema`] - Fixed VIM attribute schema
//! - [`bfast`] - Segmented container format
//! - [`container`] - G3D reader and writer
//! - [`merge`] - Merging collections with index rebasing
//! - [`validate`] - Index range validation
//!
//! ## Example
//!
//! ```ignore
//! use g3d::prelude::*;
//!
//! let geometry = GeometryBuilder::new()
//!     .vertices(&[Vec3::ZERO, Vec3::X, Vec3::Y])?
//!     .indices(&[0, 1, 2])?
//!     .build()?;
//! write_geometry_file(&geometry, "triangle.g3d")?;
//!
//! let read = read_geometry_file("triangle.g3d")?;
//! assert_eq!(read.num_faces(), 1);
//! ```

pub mod util;
pub mod descriptor;
pub mod attribute;
pub mod relation;
pub mod geometry;
pub mod schema;
pub mod bfast;
pub mod container;
pub mod merge;
pub mod validate;

// Re-export commonly used types
pub use util::{DataType, Error, G3dPod, Result};
pub use attribute::{Attribute, TypedAttribute};
pub use descriptor::{Association, AttributeDescriptor, DescriptorErrors};
pub use geometry::{GeometryAttributes, GeometryBuilder, MetaHeader};
pub use schema::{Slot, VimAttributes};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{DataType, Error, G3dPod, Result};
    pub use crate::util::{Mat4, Vec2, Vec3, Vec4};
    pub use crate::attribute::{Attribute, TypedAttribute};
    pub use crate::descriptor::{common, Association, AttributeDescriptor};
    pub use crate::geometry::{GeometryAttributes, GeometryBuilder, MetaHeader};
    pub use crate::schema::{Slot, VimAttributes};
    pub use crate::container::{
        geometry_from_bytes, geometry_to_bytes, read_geometry, read_geometry_file,
        write_geometry, write_geometry_file,
    };
    pub use crate::merge::{merge_geometries, merge_vim};
    pub use crate::validate::{validate_geometry, ValidationMode};
}

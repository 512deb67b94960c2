//! Utility types and functions for G3D.
//!
//! This module contains fundamental types used throughout the library:
//! - [`DataType`] - Component types named in descriptors
//! - [`G3dPod`] - Element types usable for typed views
//! - [`AlignedBuffer`] - Attribute byte storage
//! - [`Error`] / [`Result`] - Error handling
//! - Math type re-exports from glam

mod buffer;
mod data_type;
mod error;
mod math;
mod pod;

pub use buffer::*;
pub use data_type::*;
pub use error::*;
pub use math::*;
pub use pod::*;

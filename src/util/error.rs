//! Error types for the G3D library.

use std::path::PathBuf;
use thiserror::Error;

use crate::descriptor::DescriptorErrors;

/// Main error type for G3D operations.
#[derive(Error, Debug)]
pub enum Error {
    /// File does not exist or cannot be accessed
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Descriptor string failed to parse
    #[error("Invalid attribute descriptor '{name}': {errors:?}")]
    InvalidDescriptor { name: String, errors: DescriptorErrors },

    /// Byte length is not a multiple of the descriptor's element size
    #[error("Attribute {name}: {byte_len} bytes is not a multiple of element size {element_size}")]
    SizeMismatch { name: String, byte_len: usize, element_size: usize },

    /// Typed view requested with an incompatible element type
    #[error("Type mismatch for {name}: expected {expected}, got {actual}")]
    TypeMismatch { name: String, expected: String, actual: String },

    /// Attribute element count disagrees with the count of its association
    #[error("Attribute {name} has {actual} elements, expected {expected}")]
    ElementCountMismatch { name: String, expected: usize, actual: usize },

    /// A required attribute is absent
    #[error("Missing required attribute: {0}")]
    MissingRequiredAttribute(String),

    /// Corners-per-face disagrees between sources
    #[error("Corners per face mismatch: expected {expected}, got {actual}")]
    CornersPerFaceMismatch { expected: usize, actual: usize },

    /// Offset table is not monotonic or not face aligned
    #[error("Invalid offsets in {name}: {reason}")]
    InvalidOffsets { name: String, reason: String },

    /// Index-into attribute value outside its target range
    #[error("{name}[{position}] = {value} is out of range (max index {max})")]
    IndexOutOfRange { name: String, position: usize, value: i64, max: i64 },

    /// Container has no meta segment
    #[error("Missing meta header segment")]
    MissingMetaHeader,

    /// Meta segment failed validation
    #[error("Invalid meta header: {0}")]
    InvalidMetaHeader(String),

    /// Invalid magic number at start of container
    #[error("Invalid container: bad magic number {0:#x}")]
    InvalidMagic(u64),

    /// Container was written with the opposite byte order
    #[error("Container byte order does not match this reader")]
    Endianness,

    /// File is truncated or corrupted
    #[error("Unexpected end of data at position {0}")]
    UnexpectedEof(u64),

    /// Invalid data structure in container
    #[error("Invalid container structure: {0}")]
    InvalidStructure(String),

    /// Attribute assigned to a slot with a different descriptor
    #[error("Slot {slot} expects {expected}, got {actual}")]
    SlotMismatch { slot: &'static str, expected: String, actual: String },

    /// Memory mapping failed
    #[error("Memory mapping failed: {0}")]
    MmapFailed(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 conversion error
    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create an invalid structure error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidStructure(msg.into())
    }

    pub(crate) fn offsets(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOffsets { name: name.into(), reason: reason.into() }
    }
}

/// Result type alias for G3D operations.
pub type Result<T> = std::result::Result<T, Error>;

//! Primitive component types of G3D attribute data.

use std::fmt;

/// Component type of an attribute, as named in the descriptor string.
///
/// Every attribute element is `arity` consecutive components of one of these
/// types, stored little-endian. `Unknown` is what the parser yields for a
/// type token it does not recognize; it has size 0 and cannot back an
/// attribute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum DataType {
    /// Signed 8-bit integer
    Int8 = 0,
    /// Signed 16-bit integer
    Int16 = 1,
    /// Signed 32-bit integer
    Int32 = 2,
    /// Signed 64-bit integer
    Int64 = 3,
    /// Unsigned 8-bit integer
    Uint8 = 4,
    /// Unsigned 16-bit integer
    Uint16 = 5,
    /// Unsigned 32-bit integer
    Uint32 = 6,
    /// Unsigned 64-bit integer
    Uint64 = 7,
    /// 32-bit floating point (IEEE 754 single precision)
    Float32 = 8,
    /// 64-bit floating point (IEEE 754 double precision)
    Float64 = 9,
    /// Unrecognized type token
    #[default]
    Unknown = 127,
}

impl DataType {
    /// All known data types, in declaration order.
    pub const ALL: [DataType; 10] = [
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::Uint8,
        Self::Uint16,
        Self::Uint32,
        Self::Uint64,
        Self::Float32,
        Self::Float64,
    ];

    /// Returns the size in bytes of a single component of this type.
    #[inline]
    pub const fn num_bytes(self) -> usize {
        match self {
            Self::Int8 | Self::Uint8 => 1,
            Self::Int16 | Self::Uint16 => 2,
            Self::Int32 | Self::Uint32 | Self::Float32 => 4,
            Self::Int64 | Self::Uint64 | Self::Float64 => 8,
            Self::Unknown => 0,
        }
    }

    /// Returns the descriptor token for this type.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Parse a data type from its descriptor token.
    pub fn from_name(name: &str) -> Self {
        match name {
            "int8" => Self::Int8,
            "int16" => Self::Int16,
            "int32" => Self::Int32,
            "int64" => Self::Int64,
            "uint8" => Self::Uint8,
            "uint16" => Self::Uint16,
            "uint32" => Self::Uint32,
            "uint64" => Self::Uint64,
            "float32" => Self::Float32,
            "float64" => Self::Float64,
            _ => Self::Unknown,
        }
    }

    #[inline]
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Returns true if this is an integer type.
    #[inline]
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            Self::Int8
                | Self::Int16
                | Self::Int32
                | Self::Int64
                | Self::Uint8
                | Self::Uint16
                | Self::Uint32
                | Self::Uint64
        )
    }

    /// Returns true if this is a floating point type.
    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    /// Two types can view the same bytes when width and kind agree.
    /// Signed and unsigned integers of one width alias each other.
    #[inline]
    pub const fn is_layout_compatible(self, other: DataType) -> bool {
        self.num_bytes() == other.num_bytes()
            && self.num_bytes() != 0
            && self.is_float() == other.is_float()
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes() {
        assert_eq!(DataType::Int8.num_bytes(), 1);
        assert_eq!(DataType::Uint16.num_bytes(), 2);
        assert_eq!(DataType::Int32.num_bytes(), 4);
        assert_eq!(DataType::Float32.num_bytes(), 4);
        assert_eq!(DataType::Float64.num_bytes(), 8);
        assert_eq!(DataType::Unknown.num_bytes(), 0);
    }

    #[test]
    fn test_names_round_trip() {
        for dt in DataType::ALL {
            assert_eq!(DataType::from_name(dt.name()), dt);
        }
        assert_eq!(DataType::from_name("float16"), DataType::Unknown);
        assert_eq!(DataType::from_name("Float32"), DataType::Unknown);
    }

    #[test]
    fn test_layout_compatibility() {
        assert!(DataType::Int32.is_layout_compatible(DataType::Uint32));
        assert!(!DataType::Int32.is_layout_compatible(DataType::Float32));
        assert!(!DataType::Int32.is_layout_compatible(DataType::Int64));
        assert!(!DataType::Unknown.is_layout_compatible(DataType::Unknown));
    }
}

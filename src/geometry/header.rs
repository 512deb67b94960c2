//! Meta header: units and coordinate-system conventions of a geometry.

use std::fmt;

use crate::util::{Error, Result};

/// Name of the meta segment in a G3D container.
pub const META_SEGMENT_NAME: &str = "meta";

/// Size of the meta segment (7 bytes of header + 1 byte padding).
pub const META_SEGMENT_SIZE: usize = 8;

/// First magic byte of the meta segment.
pub const META_MAGIC_A: u8 = 0x63;

/// Second magic byte of the meta segment.
pub const META_MAGIC_B: u8 = 0xD0;

/// Length unit of position data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Unit {
    Millimeter,
    Centimeter,
    #[default]
    Meter,
    Kilometer,
    Inch,
    Foot,
    Yard,
    Mile,
}

impl Unit {
    pub const ALL: [Unit; 8] = [
        Self::Millimeter,
        Self::Centimeter,
        Self::Meter,
        Self::Kilometer,
        Self::Inch,
        Self::Foot,
        Self::Yard,
        Self::Mile,
    ];

    /// Two-byte code stored in the header. Meters are `m` followed by NUL.
    pub const fn code(self) -> [u8; 2] {
        match self {
            Self::Millimeter => *b"mm",
            Self::Centimeter => *b"cm",
            Self::Meter => [b'm', 0],
            Self::Kilometer => *b"km",
            Self::Inch => *b"in",
            Self::Foot => *b"ft",
            Self::Yard => *b"yd",
            Self::Mile => *b"mi",
        }
    }

    pub fn from_code(code: [u8; 2]) -> Option<Self> {
        Self::ALL.into_iter().find(|u| u.code() == code)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Millimeter => "mm",
            Self::Centimeter => "cm",
            Self::Meter => "m",
            Self::Kilometer => "km",
            Self::Inch => "in",
            Self::Foot => "ft",
            Self::Yard => "yd",
            Self::Mile => "mi",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Up axis: 0 = x, 1 = y, 2 = z.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum UpAxis {
    X = 0,
    Y = 1,
    #[default]
    Z = 2,
}

impl UpAxis {
    pub const fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::X),
            1 => Some(Self::Y),
            2 => Some(Self::Z),
            _ => None,
        }
    }
}

/// Forward vector: 0 = x, 1 = y, 2 = z, 3 = -x, 4 = -y, 5 = -z.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ForwardAxis {
    #[default]
    X = 0,
    Y = 1,
    Z = 2,
    NegX = 3,
    NegY = 4,
    NegZ = 5,
}

impl ForwardAxis {
    pub const fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::X),
            1 => Some(Self::Y),
            2 => Some(Self::Z),
            3 => Some(Self::NegX),
            4 => Some(Self::NegY),
            5 => Some(Self::NegZ),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Handedness {
    #[default]
    Left = 0,
    Right = 1,
}

impl Handedness {
    pub const fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Left),
            1 => Some(Self::Right),
            _ => None,
        }
    }
}

/// Contents of the `meta` segment.
///
/// The default is meters, z up, +x forward, left handed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MetaHeader {
    pub unit: Unit,
    pub up_axis: UpAxis,
    pub forward_axis: ForwardAxis,
    pub handedness: Handedness,
}

impl MetaHeader {
    /// Serialize to the 8-byte segment layout.
    pub fn to_bytes(&self) -> [u8; META_SEGMENT_SIZE] {
        let [unit_a, unit_b] = self.unit.code();
        [
            META_MAGIC_A,
            META_MAGIC_B,
            unit_a,
            unit_b,
            self.up_axis as u8,
            self.forward_axis as u8,
            self.handedness as u8,
            0,
        ]
    }

    /// Parse and validate the 8-byte segment.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != META_SEGMENT_SIZE {
            return Err(Error::InvalidMetaHeader(format!(
                "expected {META_SEGMENT_SIZE} bytes, got {}",
                bytes.len()
            )));
        }
        if bytes[0] != META_MAGIC_A || bytes[1] != META_MAGIC_B {
            return Err(Error::InvalidMetaHeader(format!(
                "magic must be {META_MAGIC_A:#04x} {META_MAGIC_B:#04x}, got {:#04x} {:#04x}",
                bytes[0], bytes[1]
            )));
        }
        let unit = Unit::from_code([bytes[2], bytes[3]]).ok_or_else(|| {
            Error::InvalidMetaHeader(format!(
                "unsupported unit {:?}",
                String::from_utf8_lossy(&bytes[2..4])
            ))
        })?;
        let up_axis = UpAxis::from_u8(bytes[4]).ok_or_else(|| {
            Error::InvalidMetaHeader(format!("up axis must be 0, 1 or 2, got {}", bytes[4]))
        })?;
        let forward_axis = ForwardAxis::from_u8(bytes[5]).ok_or_else(|| {
            Error::InvalidMetaHeader(format!("forward axis must be 0..=5, got {}", bytes[5]))
        })?;
        let handedness = Handedness::from_u8(bytes[6]).ok_or_else(|| {
            Error::InvalidMetaHeader(format!("handedness must be 0 or 1, got {}", bytes[6]))
        })?;
        Ok(Self { unit, up_axis, forward_axis, handedness })
    }

    /// Whether a container segment has the shape of the meta segment.
    #[inline]
    pub fn is_meta_segment(name: &str, size: u64) -> bool {
        name == META_SEGMENT_NAME && size == META_SEGMENT_SIZE as u64
    }
}

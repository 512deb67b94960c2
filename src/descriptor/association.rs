//! Structural element an attribute is associated with.

use std::fmt;

/// What one element of an attribute corresponds to.
///
/// The built-in associations determine which derived count of a geometry an
/// attribute must match. Schemas can name further associations (`mesh`,
/// `submesh`, `material`, ...); those are kept verbatim in `Custom`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Association {
    /// No association
    None,
    /// One element per vertex
    Vertex,
    /// One element per face
    Face,
    /// One element per face corner
    Corner,
    /// One element per half-edge (one per corner)
    Edge,
    /// One element per polygon group
    Group,
    /// One element per sub-geometry
    Subgeometry,
    /// One element per instance
    Instance,
    /// Applies to the whole geometry
    All,
    /// Schema-defined association
    Custom(String),
}

impl Association {
    /// Built-in associations.
    pub const BUILTIN: [Association; 9] = [
        Self::None,
        Self::Vertex,
        Self::Face,
        Self::Corner,
        Self::Edge,
        Self::Group,
        Self::Subgeometry,
        Self::Instance,
        Self::All,
    ];

    /// Returns the descriptor token.
    pub fn name(&self) -> &str {
        match self {
            Self::None => "none",
            Self::Vertex => "vertex",
            Self::Face => "face",
            Self::Corner => "corner",
            Self::Edge => "edge",
            Self::Group => "group",
            Self::Subgeometry => "subgeometry",
            Self::Instance => "instance",
            Self::All => "all",
            Self::Custom(name) => name,
        }
    }

    /// Parse a descriptor token. Returns `None` for an empty token.
    pub fn from_name(name: &str) -> Option<Self> {
        let assoc = match name {
            "" => return None,
            "none" => Self::None,
            "vertex" => Self::Vertex,
            "face" => Self::Face,
            "corner" => Self::Corner,
            "edge" => Self::Edge,
            "group" => Self::Group,
            "subgeometry" => Self::Subgeometry,
            "instance" => Self::Instance,
            "all" => Self::All,
            other => Self::Custom(other.to_string()),
        };
        Some(assoc)
    }

    /// Custom association with the given name.
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    #[inline]
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

impl fmt::Display for Association {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

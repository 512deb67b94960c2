//! Attribute descriptor grammar.
//!
//! Every G3D attribute is named by a descriptor string of six `:`-separated
//! tokens:
//!
//! ```text
//! g3d:instance:transform:0:float32:16
//! ~~~ ~~~~~~~~ ~~~~~~~~~ ~ ~~~~~~~ ~~
//!  |     |         |     |    |     +- arity: components per element
//!  |     |         |     |    +------- data type of each component
//!  |     |         |     +------------ index among same association+semantic
//!  |     |         +------------------ semantic: role of the data
//!  |     +---------------------------- association: what one element belongs to
//!  +---------------------------------- fixed prefix
//! ```
//!
//! Parsing never stops at the first problem. [`AttributeDescriptor::parse`]
//! returns the best-effort descriptor together with every
//! [`DescriptorErrors`] flag that applies.

mod association;
pub mod common;
mod errors;
pub mod semantic;

pub use association::Association;
pub use errors::DescriptorErrors;

use std::fmt;
use std::str::FromStr;

use crate::util::{DataType, Error, Result};

/// Fixed first token of every descriptor.
pub const PREFIX: &str = "g3d";

/// Separator between descriptor tokens.
pub const SEPARATOR: char = ':';

/// Number of tokens in a well-formed descriptor.
pub const NUM_TOKENS: usize = 6;

/// Role, type and shape of one attribute buffer.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeDescriptor {
    pub association: Association,
    pub semantic: String,
    pub index: u32,
    pub data_type: DataType,
    pub data_arity: u32,
}

impl AttributeDescriptor {
    pub fn new(
        association: Association,
        semantic: impl Into<String>,
        index: u32,
        data_type: DataType,
        data_arity: u32,
    ) -> Self {
        Self {
            association,
            semantic: semantic.into(),
            index,
            data_type,
            data_arity,
        }
    }

    /// Parse a descriptor string, collecting every error.
    ///
    /// Fields that fail to parse keep a neutral value (`Association::None`,
    /// empty semantic, 0, `DataType::Unknown`, 0) and set their flag. With a
    /// wrong token count the tokens that are present are still read by
    /// position.
    pub fn parse(text: &str) -> (Self, DescriptorErrors) {
        let tokens: Vec<&str> = text.split(SEPARATOR).collect();
        let token = |i: usize| tokens.get(i).copied().unwrap_or("");
        let mut errors = DescriptorErrors::empty();

        if tokens.len() != NUM_TOKENS {
            errors |= DescriptorErrors::UNEXPECTED_NUMBER_OF_TOKENS;
        }
        if token(0) != PREFIX {
            errors |= DescriptorErrors::PREFIX;
        }

        let association = Association::from_name(token(1)).unwrap_or_else(|| {
            errors |= DescriptorErrors::ASSOCIATION;
            Association::None
        });

        let semantic = token(2);
        if semantic.is_empty() {
            errors |= DescriptorErrors::SEMANTIC;
        }

        let index = parse_number(token(3)).unwrap_or_else(|| {
            errors |= DescriptorErrors::INDEX;
            0
        });

        let data_type = DataType::from_name(token(4));
        if !data_type.is_known() {
            errors |= DescriptorErrors::DATA_TYPE;
        }

        let data_arity = match parse_number(token(5)) {
            Some(arity) if arity > 0 => arity,
            _ => {
                errors |= DescriptorErrors::DATA_ARITY;
                0
            }
        };

        let desc = Self {
            association,
            semantic: semantic.to_string(),
            index,
            data_type,
            data_arity,
        };
        (desc, errors)
    }

    /// Parse a descriptor string, returning it only if no error flag is set.
    pub fn try_parse(text: &str) -> Option<Self> {
        match Self::parse(text) {
            (desc, errors) if errors.is_empty() => Some(desc),
            _ => None,
        }
    }

    /// Canonical descriptor string.
    pub fn name(&self) -> String {
        self.to_string()
    }

    /// Size in bytes of one component.
    #[inline]
    pub fn data_type_size(&self) -> usize {
        self.data_type.num_bytes()
    }

    /// Size in bytes of one element (`data_type_size * data_arity`).
    #[inline]
    pub fn data_element_size(&self) -> usize {
        self.data_type_size() * self.data_arity as usize
    }

    /// Same association and semantic, ignoring index, type and arity.
    pub fn same_role(&self, association: &Association, semantic: &str) -> bool {
        &self.association == association && self.semantic == semantic
    }

    /// Copy with a different index.
    pub fn with_index(&self, index: u32) -> Self {
        Self { index, ..self.clone() }
    }
}

/// Decimal number in canonical form: digits only, no sign, no leading zero.
fn parse_number(text: &str) -> Option<u32> {
    let digits = text.bytes().all(|b| b.is_ascii_digit());
    if digits && (text == "0" || !text.starts_with('0')) {
        text.parse().ok()
    } else {
        None
    }
}

impl fmt::Display for AttributeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{PREFIX}:{}:{}:{}:{}:{}",
            self.association, self.semantic, self.index, self.data_type, self.data_arity
        )
    }
}

impl FromStr for AttributeDescriptor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (desc, errors) = Self::parse(s);
        if errors.has_errors() {
            return Err(Error::InvalidDescriptor { name: s.to_string(), errors });
        }
        Ok(desc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_transform() {
        let (desc, errors) = AttributeDescriptor::parse("g3d:instance:transform:0:float32:16");
        assert!(errors.is_empty());
        assert_eq!(desc.association, Association::Instance);
        assert_eq!(desc.semantic, "transform");
        assert_eq!(desc.index, 0);
        assert_eq!(desc.data_type, DataType::Float32);
        assert_eq!(desc.data_arity, 16);
        assert_eq!(desc.data_type_size(), 4);
        assert_eq!(desc.data_element_size(), 64);
    }

    #[test]
    fn test_format_is_canonical() {
        let desc = AttributeDescriptor::new(Association::Vertex, "uv", 1, DataType::Float32, 2);
        assert_eq!(desc.to_string(), "g3d:vertex:uv:1:float32:2");
        assert_eq!(desc.name(), "g3d:vertex:uv:1:float32:2");
    }

    #[test]
    fn test_custom_association() {
        let desc = AttributeDescriptor::try_parse("g3d:submesh:indexoffset:0:int32:1").unwrap();
        assert_eq!(desc.association, Association::custom("submesh"));
        assert_eq!(desc.to_string(), "g3d:submesh:indexoffset:0:int32:1");
    }

    #[test]
    fn test_unknown_data_type() {
        let (desc, errors) = AttributeDescriptor::parse("g3d:instance:beep:0:UNKNOWN:1");
        assert_eq!(errors, DescriptorErrors::DATA_TYPE);
        assert_eq!(desc.data_type, DataType::Unknown);
        assert_eq!(desc.data_element_size(), 0);
        assert!(AttributeDescriptor::try_parse("g3d:instance:beep:0:UNKNOWN:1").is_none());
    }

    #[test]
    fn test_all_errors_observable() {
        let (_, errors) = AttributeDescriptor::parse("abc:::x:float33:-1");
        assert!(errors.contains(DescriptorErrors::PREFIX));
        assert!(errors.contains(DescriptorErrors::ASSOCIATION));
        assert!(errors.contains(DescriptorErrors::SEMANTIC));
        assert!(errors.contains(DescriptorErrors::INDEX));
        assert!(errors.contains(DescriptorErrors::DATA_TYPE));
        assert!(errors.contains(DescriptorErrors::DATA_ARITY));
        assert!(!errors.contains(DescriptorErrors::UNEXPECTED_NUMBER_OF_TOKENS));
    }

    #[test]
    fn test_token_count() {
        let (desc, errors) = AttributeDescriptor::parse("g3d:vertex:position:float32:3");
        assert!(errors.contains(DescriptorErrors::UNEXPECTED_NUMBER_OF_TOKENS));
        assert_eq!(desc.association, Association::Vertex);

        let (_, errors) = AttributeDescriptor::parse("g3d:vertex:position:0:float32:3:extra");
        assert_eq!(errors, DescriptorErrors::UNEXPECTED_NUMBER_OF_TOKENS);

        let (_, errors) = AttributeDescriptor::parse("");
        assert!(errors.contains(DescriptorErrors::UNEXPECTED_NUMBER_OF_TOKENS));
        assert!(errors.contains(DescriptorErrors::PREFIX));
    }

    #[test]
    fn test_zero_arity_rejected() {
        let (_, errors) = AttributeDescriptor::parse("g3d:vertex:position:0:float32:0");
        assert_eq!(errors, DescriptorErrors::DATA_ARITY);
    }

    #[test]
    fn test_numbers_must_be_canonical() {
        for text in [
            "g3d:vertex:uv:+1:float32:2",
            "g3d:vertex:uv:01:float32:2",
            "g3d:vertex:uv: 1:float32:2",
        ] {
            let (_, errors) = AttributeDescriptor::parse(text);
            assert_eq!(errors, DescriptorErrors::INDEX, "{text}");
        }
        let (_, errors) = AttributeDescriptor::parse("g3d:vertex:uv:1:float32:+2");
        assert_eq!(errors, DescriptorErrors::DATA_ARITY);
        assert!(AttributeDescriptor::try_parse("g3d:vertex:uv:10:float32:2").is_some());
    }

    #[test]
    fn test_from_str() {
        let desc: AttributeDescriptor = "g3d:corner:index:0:int32:1".parse().unwrap();
        assert_eq!(desc.association, Association::Corner);

        let err = "g3d:corner".parse::<AttributeDescriptor>().unwrap_err();
        assert!(matches!(err, Error::InvalidDescriptor { .. }));
    }

    fn arb_association() -> impl Strategy<Value = Association> {
        prop_oneof![
            proptest::sample::select(Association::BUILTIN.to_vec()),
            "[a-z]{1,12}".prop_map(|s| Association::from_name(&s).unwrap_or(Association::None)),
        ]
    }

    fn arb_descriptor() -> impl Strategy<Value = AttributeDescriptor> {
        (
            arb_association(),
            "[a-z][a-z0-9_]{0,15}",
            any::<u32>(),
            proptest::sample::select(DataType::ALL.to_vec()),
            1u32..=64,
        )
            .prop_map(|(association, semantic, index, data_type, arity)| {
                AttributeDescriptor::new(association, semantic, index, data_type, arity)
            })
    }

    proptest! {
        #[test]
        fn prop_parse_format_round_trip(desc in arb_descriptor()) {
            let text = desc.to_string();
            let (parsed, errors) = AttributeDescriptor::parse(&text);
            prop_assert!(errors.is_empty());
            prop_assert_eq!(&parsed, &desc);
            prop_assert_eq!(parsed.to_string(), text);
        }
    }
}

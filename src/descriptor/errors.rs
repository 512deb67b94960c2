//! Descriptor parse error flags.

use bitflags::bitflags;

bitflags! {
    /// Everything that went wrong while parsing one descriptor string.
    ///
    /// Flags accumulate: a string with a bad prefix and an unknown data type
    /// reports both.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DescriptorErrors: u32 {
        /// Not exactly six `:`-separated tokens
        const UNEXPECTED_NUMBER_OF_TOKENS = 1;
        /// First token is not `g3d`
        const PREFIX = 1 << 1;
        /// Association token is empty
        const ASSOCIATION = 1 << 2;
        /// Semantic token is empty
        const SEMANTIC = 1 << 3;
        /// Index token is not a non-negative integer
        const INDEX = 1 << 4;
        /// Data type token is not recognized
        const DATA_TYPE = 1 << 5;
        /// Arity token is not a positive integer
        const DATA_ARITY = 1 << 6;
    }
}

impl DescriptorErrors {
    #[inline]
    pub fn has_errors(self) -> bool {
        !self.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_combine() {
        let e = DescriptorErrors::PREFIX | DescriptorErrors::INDEX;
        assert!(e.has_errors());
        assert!(e.contains(DescriptorErrors::PREFIX));
        assert!(!e.contains(DescriptorErrors::DATA_TYPE));
        assert_eq!(e.bits(), 0b10010);
        assert!(!DescriptorErrors::empty().has_errors());
    }
}

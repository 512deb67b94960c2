//! Borrowed, strongly-typed view over an attribute's bytes.

use std::ops::Deref;

use super::Attribute;
use crate::descriptor::AttributeDescriptor;
use crate::util::G3dPod;

/// Zero-copy view of an [`Attribute`] as a slice of `T`.
///
/// When `T` is a scalar and the attribute has arity > 1, the slice holds
/// `element_count * arity` components; otherwise one `T` per element.
#[derive(Clone, Copy, Debug)]
pub struct TypedAttribute<'a, T: G3dPod> {
    attribute: &'a Attribute,
    data: &'a [T],
}

impl<'a, T: G3dPod> TypedAttribute<'a, T> {
    pub(super) fn new(attribute: &'a Attribute, data: &'a [T]) -> Self {
        Self { attribute, data }
    }

    #[inline]
    pub fn attribute(&self) -> &'a Attribute {
        self.attribute
    }

    #[inline]
    pub fn descriptor(&self) -> &'a AttributeDescriptor {
        self.attribute.descriptor()
    }

    /// The typed values, valid for as long as the owning attribute.
    #[inline]
    pub fn data(&self) -> &'a [T] {
        self.data
    }

    /// Number of attribute elements (not values of `T`).
    #[inline]
    pub fn element_count(&self) -> usize {
        self.attribute.element_count()
    }

    /// Values of `T` per element: 1, or the arity for flat scalar views.
    #[inline]
    pub fn values_per_element(&self) -> usize {
        if self.element_count() == 0 {
            return 1;
        }
        self.data.len() / self.element_count()
    }

    /// Values making up element `i`.
    pub fn element(&self, i: usize) -> Option<&'a [T]> {
        let n = self.values_per_element();
        let start = i.checked_mul(n)?;
        self.data.get(start..start + n)
    }
}

impl<T: G3dPod> Deref for TypedAttribute<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.data
    }
}

//! Accumulation phase of a geometry.

use super::{GeometryAttributes, MetaHeader};
use crate::attribute::Attribute;
use crate::descriptor::{common, AttributeDescriptor};
use crate::util::{G3dPod, Mat4, Result, Vec3};

/// Collects attributes before they are frozen into [`GeometryAttributes`].
///
/// ```ignore
/// let geometry = GeometryBuilder::new()
///     .vertices(&points)?
///     .indices(&indices)?
///     .build()?;
/// ```
#[derive(Clone, Debug, Default)]
pub struct GeometryBuilder {
    header: MetaHeader,
    attributes: Vec<Attribute>,
}

impl GeometryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, header: MetaHeader) -> Self {
        self.header = header;
        self
    }

    pub fn add(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Add typed values under `descriptor`.
    pub fn add_data<T: G3dPod>(self, descriptor: AttributeDescriptor, values: &[T]) -> Result<Self> {
        Ok(self.add(Attribute::from_data(descriptor, values)?))
    }

    pub fn vertices(self, positions: &[Vec3]) -> Result<Self> {
        self.add_data(common::position(), positions)
    }

    pub fn indices(self, indices: &[i32]) -> Result<Self> {
        self.add_data(common::index(), indices)
    }

    pub fn corners_per_face(self, corners: i32) -> Result<Self> {
        self.add_data(common::corners_per_face(), &[corners])
    }

    pub fn instance_transforms(self, transforms: &[Mat4]) -> Result<Self> {
        self.add_data(common::instance_transform(), transforms)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Freeze: derive counts and check consistency.
    pub fn build(self) -> Result<GeometryAttributes> {
        GeometryAttributes::with_header(self.attributes, self.header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Unit;

    #[test]
    fn test_build_quad() {
        let header = MetaHeader { unit: Unit::Foot, ..Default::default() };
        let g = GeometryBuilder::new()
            .header(header)
            .vertices(&[Vec3::ZERO, Vec3::X, Vec3::ONE, Vec3::Y])
            .unwrap()
            .indices(&[0, 1, 2, 3])
            .unwrap()
            .corners_per_face(4)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(g.num_faces(), 1);
        assert_eq!(g.header().unit, Unit::Foot);
    }

    #[test]
    fn test_build_without_positions_fails() {
        let b = GeometryBuilder::new().indices(&[0, 1, 2]).unwrap();
        assert_eq!(b.len(), 1);
        assert!(b.build().is_err());
    }
}

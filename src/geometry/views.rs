//! Read-only views into parts of a geometry.

use std::ops::Range;

use super::GeometryAttributes;
use crate::relation::relation;
use crate::util::{Mat4, Vec3};

/// A contiguous section of the shared vertex and index buffers.
#[derive(Clone, Copy, Debug)]
pub struct SubGeometry<'a> {
    geometry: &'a GeometryAttributes,
    index: usize,
}

impl<'a> SubGeometry<'a> {
    pub(super) fn new(geometry: &'a GeometryAttributes, index: usize) -> Self {
        Self { geometry, index }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn vertex_range(&self) -> Range<usize> {
        self.geometry.subgeometry_vertex_range(self.index)
    }

    pub fn index_range(&self) -> Range<usize> {
        self.geometry.subgeometry_index_range(self.index)
    }

    pub fn vertex_offset(&self) -> usize {
        self.vertex_range().start
    }

    pub fn num_vertices(&self) -> usize {
        self.vertex_range().len()
    }

    pub fn index_offset(&self) -> usize {
        self.index_range().start
    }

    pub fn num_corners(&self) -> usize {
        self.index_range().len()
    }

    pub fn face_offset(&self) -> usize {
        self.geometry.corner_to_face(self.index_offset())
    }

    pub fn num_faces(&self) -> usize {
        self.num_corners() / self.geometry.corners_per_face()
    }

    pub fn vertices(&self) -> &'a [Vec3] {
        self.geometry.vertices().get(self.vertex_range()).unwrap_or_default()
    }

    /// Indices into the whole vertex buffer.
    pub fn indices(&self) -> &'a [i32] {
        self.geometry.indices().get(self.index_range()).unwrap_or_default()
    }

    /// Indices relative to this sub-geometry's first vertex.
    pub fn local_indices(&self) -> Vec<i32> {
        let offset = self.vertex_offset() as i32;
        self.indices().iter().map(|&i| i - offset).collect()
    }

    pub fn material_id(&self) -> Option<i32> {
        self.geometry.subgeometry_material_ids()?.get(self.index).copied()
    }
}

/// A placement of a sub-geometry.
#[derive(Clone, Copy, Debug)]
pub struct Instance<'a> {
    geometry: &'a GeometryAttributes,
    index: usize,
}

impl<'a> Instance<'a> {
    pub(super) fn new(geometry: &'a GeometryAttributes, index: usize) -> Self {
        Self { geometry, index }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn transform(&self) -> Option<Mat4> {
        self.geometry.instance_transforms()?.get(self.index).copied()
    }

    /// Parent instance, `None` for roots.
    pub fn parent(&self) -> Option<u32> {
        let raw = *self.geometry.instance_parents()?.get(self.index)?;
        relation(raw as i64)
    }

    /// Placed sub-geometry, `None` when the instance places nothing.
    pub fn subgeometry(&self) -> Option<SubGeometry<'a>> {
        let raw = *self.geometry.instance_subgeometries()?.get(self.index)?;
        let i = relation(raw as i64)? as usize;
        (i < self.geometry.num_subgeometries()).then(|| SubGeometry::new(self.geometry, i))
    }
}

/// A contiguous series of faces sharing a material.
#[derive(Clone, Copy, Debug)]
pub struct PolygonGroup<'a> {
    geometry: &'a GeometryAttributes,
    index: usize,
}

impl<'a> PolygonGroup<'a> {
    pub(super) fn new(geometry: &'a GeometryAttributes, index: usize) -> Self {
        Self { geometry, index }
    }

    #[inline]
    pub fn id(&self) -> usize {
        self.index
    }

    pub fn index_range(&self) -> Range<usize> {
        self.geometry.group_index_range(self.index)
    }

    pub fn index_count(&self) -> usize {
        self.index_range().len()
    }

    pub fn num_faces(&self) -> usize {
        self.index_count() / self.geometry.corners_per_face()
    }

    pub fn indices(&self) -> &'a [i32] {
        self.geometry.indices().get(self.index_range()).unwrap_or_default()
    }

    pub fn material_id(&self) -> Option<i32> {
        self.geometry.group_material_ids()?.get(self.index).copied()
    }
}

#[cfg(test)]
mod tests {
    use crate::attribute::Attribute;
    use crate::descriptor::common;
    use crate::geometry::GeometryAttributes;
    use crate::util::{Mat4, Vec3};

    fn two_triangles() -> GeometryAttributes {
        GeometryAttributes::new(vec![
            Attribute::from_data(common::position(), &[Vec3::ZERO; 6]).unwrap(),
            Attribute::from_data(common::index(), &[0i32, 1, 2, 3, 4, 5]).unwrap(),
            Attribute::from_data(common::subgeometry_index_offset(), &[0i32, 3]).unwrap(),
            Attribute::from_data(common::subgeometry_vertex_offset(), &[0i32, 3]).unwrap(),
            Attribute::from_data(common::subgeometry_material_id(), &[7i32, 8]).unwrap(),
            Attribute::from_data(common::instance_transform(), &[Mat4::IDENTITY; 2]).unwrap(),
            Attribute::from_data(common::instance_parent(), &[-1i32, 0]).unwrap(),
            Attribute::from_data(common::instance_subgeometry(), &[1i32, -1]).unwrap(),
            Attribute::from_data(common::group_index_offset(), &[0i32, 3]).unwrap(),
            Attribute::from_data(common::group_material_id(), &[2i32, 3]).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn test_sub_geometries() {
        let g = two_triangles();
        let subs: Vec<_> = g.sub_geometries().collect();
        assert_eq!(subs.len(), 2);
        assert_eq!(subs[1].vertex_offset(), 3);
        assert_eq!(subs[1].num_vertices(), 3);
        assert_eq!(subs[1].face_offset(), 1);
        assert_eq!(subs[1].num_faces(), 1);
        assert_eq!(subs[1].indices(), &[3, 4, 5]);
        assert_eq!(subs[1].local_indices(), vec![0, 1, 2]);
        assert_eq!(subs[1].material_id(), Some(8));
    }

    #[test]
    fn test_instances() {
        let g = two_triangles();
        let inst: Vec<_> = g.instances().collect();
        assert_eq!(inst.len(), 2);
        assert_eq!(inst[0].parent(), None);
        assert_eq!(inst[1].parent(), Some(0));
        assert_eq!(inst[0].subgeometry().map(|s| s.index()), Some(1));
        assert!(inst[1].subgeometry().is_none());
        assert_eq!(inst[0].transform(), Some(Mat4::IDENTITY));
    }

    #[test]
    fn test_groups() {
        let g = two_triangles();
        let groups: Vec<_> = g.groups().collect();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].indices(), &[0, 1, 2]);
        assert_eq!(groups[1].num_faces(), 1);
        assert_eq!(groups[1].material_id(), Some(3));
    }
}

//! Operations that rebuild a geometry with remapped faces, corners or vertices.

use tracing::debug;

use super::{index_relation, Canonical, CountKind, GeometryAttributes};
use crate::attribute::Attribute;
use crate::descriptor::{common, semantic, Association};
use crate::relation::relation;
use crate::util::{DataType, Error, Mat4, Result, Vec3};

impl GeometryAttributes {
    /// Low-level remap of faces and corners at the same time.
    ///
    /// Element `i` of every face attribute becomes element `face_remap[i]` of
    /// the old one, likewise corners with `corner_remap`. Vertex, group, `none`
    /// and `all` attributes are kept; sub-geometry and instance attributes
    /// and group index offsets are dropped. When `corners_per_face` is given
    /// the face size attribute is replaced.
    pub fn remap_faces_and_corners(
        &self,
        face_remap: &[usize],
        corner_remap: &[usize],
        corners_per_face: Option<usize>,
    ) -> Result<Self> {
        let resize = corners_per_face.is_some();
        let mut out = Vec::with_capacity(self.attributes.len() + 1);
        for attr in &self.attributes {
            let desc = attr.descriptor();
            match &desc.association {
                Association::Face if resize && desc.semantic == semantic::INDEX => {}
                Association::Face => out.push(attr.remap(face_remap)?),
                Association::Corner | Association::Edge => out.push(attr.remap(corner_remap)?),
                Association::Subgeometry | Association::Instance => {}
                Association::Group if desc.semantic == semantic::INDEX_OFFSET => {}
                Association::All if resize && desc.semantic == semantic::FACE_SIZE => {}
                _ => out.push(attr.clone()),
            }
        }
        if let Some(cpf) = corners_per_face {
            let cpf = i32::try_from(cpf).map_err(|_| Error::other("corners per face overflow"))?;
            out.push(Attribute::from_data(common::corners_per_face(), &[cpf])?);
        }
        Self::with_header(out, self.header)
    }

    /// Keep only the listed faces, in the given order.
    pub fn remap_faces(&self, face_remap: &[usize]) -> Result<Self> {
        let corners = self.face_indices_to_corner_indices(face_remap);
        self.remap_faces_and_corners(face_remap, &corners, None)
    }

    /// Keep faces for which `keep` returns true.
    pub fn copy_faces(&self, keep: impl Fn(usize) -> bool) -> Result<Self> {
        let faces: Vec<usize> = (0..self.num_faces()).filter(|&f| keep(f)).collect();
        self.remap_faces(&faces)
    }

    /// Drop faces for which `delete` returns true.
    pub fn delete_faces(&self, delete: impl Fn(usize) -> bool) -> Result<Self> {
        self.copy_faces(|f| !delete(f))
    }

    /// Split every quad into two triangles, carrying all attributes along.
    ///
    /// Quad `[a, b, c, d]` becomes `[a, b, c]` and `[a, c, d]`.
    pub fn triangulate_quad_mesh(&self) -> Result<Self> {
        if self.corners_per_face != 4 {
            return Err(Error::CornersPerFaceMismatch {
                expected: 4,
                actual: self.corners_per_face,
            });
        }
        let num_faces = self.num_faces();
        let mut corner_remap = Vec::with_capacity(num_faces * 6);
        let mut face_remap = Vec::with_capacity(num_faces * 2);
        for f in 0..num_faces {
            let c = f * 4;
            corner_remap.extend_from_slice(&[c, c + 1, c + 2, c, c + 2, c + 3]);
            face_remap.extend_from_slice(&[f, f]);
        }
        let triangulated = self.remap_faces_and_corners(&face_remap, &corner_remap, Some(3))?;

        // Group starts move from quad corners to triangle corners.
        match self.canonical_attribute(Canonical::GroupIndexOffset) {
            Some(attr) => {
                let offsets: Vec<i64> = attr.to_integers()?.iter().map(|&o| o / 4 * 6).collect();
                let attr = Attribute::from_integers(attr.descriptor().clone(), &offsets)?;
                triangulated.set_attribute(attr)
            }
            None => Ok(triangulated),
        }
    }

    /// Reorder, repeat or drop vertices.
    ///
    /// `vertex_remap[i]` is the old vertex that becomes vertex `i`. Every
    /// attribute that indexes vertices is renumbered, and fails if it still
    /// references a dropped vertex. Group, sub-geometry and instance
    /// attributes are dropped, along with anything that indexes them.
    pub fn remap_vertices(&self, vertex_remap: &[usize]) -> Result<Self> {
        let mut lookup = vec![None; self.num_vertices()];
        for (new, &old) in vertex_remap.iter().enumerate() {
            let slot = lookup.get_mut(old).ok_or_else(|| Error::IndexOutOfRange {
                name: "vertex remap".into(),
                position: new,
                value: old as i64,
                max: self.num_vertices() as i64 - 1,
            })?;
            *slot = Some(new as i64);
        }

        let mut out = Vec::with_capacity(self.attributes.len());
        for attr in &self.attributes {
            match (attr.association(), index_relation(attr.descriptor())) {
                (Association::Group | Association::Subgeometry | Association::Instance, _) => {}
                (_, Some(rel))
                    if matches!(
                        rel.target,
                        CountKind::Groups | CountKind::Subgeometries | CountKind::Instances
                    ) => {}
                (_, Some(rel)) if rel.target == CountKind::Vertices => {
                    out.push(renumber_vertices(attr, &lookup)?)
                }
                (Association::Vertex, _) => out.push(attr.remap(vertex_remap)?),
                (Association::Custom(_), _) => {}
                _ => out.push(attr.clone()),
            }
        }
        Self::with_header(out, self.header)
    }

    /// Transform positions as points and normals as directions.
    pub fn transform(&self, matrix: Mat4) -> Result<Self> {
        let mut out = Vec::with_capacity(self.attributes.len());
        for attr in &self.attributes {
            let desc = attr.descriptor();
            let is_vec3 = desc.data_type == DataType::Float32 && desc.data_arity == 3;
            let attr = match desc.semantic.as_str() {
                semantic::POSITION if is_vec3 => {
                    let points: Vec<Vec3> =
                        attr.data::<Vec3>()?.iter().map(|&p| matrix.transform_point3(p)).collect();
                    Attribute::from_data(desc.clone(), &points)?
                }
                semantic::NORMAL if is_vec3 => {
                    let normals: Vec<Vec3> = attr
                        .data::<Vec3>()?
                        .iter()
                        .map(|&n| matrix.transform_vector3(n).normalize_or_zero())
                        .collect();
                    Attribute::from_data(desc.clone(), &normals)?
                }
                _ => attr.clone(),
            };
            out.push(attr);
        }
        debug!(num_attributes = out.len(), "transformed geometry");
        Self::with_header(out, self.header)
    }
}

/// Rewrite vertex references through `lookup`, keeping the sentinel.
fn renumber_vertices(attr: &Attribute, lookup: &[Option<i64>]) -> Result<Attribute> {
    let values = attr
        .to_integers()?
        .into_iter()
        .enumerate()
        .map(|(position, raw)| match relation(raw) {
            None => Ok(raw),
            Some(v) => lookup.get(v as usize).copied().flatten().ok_or_else(|| {
                Error::invalid(format!(
                    "{}[{position}] references removed vertex {v}",
                    attr.name()
                ))
            }),
        })
        .collect::<Result<Vec<i64>>>()?;
    Attribute::from_integers(attr.descriptor().clone(), &values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::AttributeDescriptor;
    use crate::util::Vec3;
    use crate::validate::{validate_geometry, ValidationMode};

    fn quad() -> GeometryAttributes {
        GeometryAttributes::new(vec![
            Attribute::from_data(common::position(), &[Vec3::ZERO, Vec3::X, Vec3::ONE, Vec3::Y])
                .unwrap(),
            Attribute::from_data(common::index(), &[0i32, 1, 2, 3]).unwrap(),
            Attribute::from_data(common::corners_per_face(), &[4i32]).unwrap(),
            Attribute::from_data(common::face_material_id(), &[5i32]).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn test_triangulate_quad() {
        let tri = quad().triangulate_quad_mesh().unwrap();
        assert_eq!(tri.corners_per_face(), 3);
        assert_eq!(tri.num_faces(), 2);
        assert_eq!(tri.indices(), &[0, 1, 2, 0, 2, 3]);
        assert_eq!(tri.face_material_ids(), Some(&[5, 5][..]));
        assert_eq!(tri.num_vertices(), 4);
    }

    #[test]
    fn test_triangulate_requires_quads() {
        let tri = quad().triangulate_quad_mesh().unwrap();
        assert!(matches!(
            tri.triangulate_quad_mesh(),
            Err(Error::CornersPerFaceMismatch { expected: 4, actual: 3 })
        ));
    }

    #[test]
    fn test_triangulate_moves_group_offsets() {
        let g = GeometryAttributes::new(vec![
            Attribute::from_data(common::position(), &[Vec3::ZERO; 8]).unwrap(),
            Attribute::from_data(common::index(), &[0i32, 1, 2, 3, 4, 5, 6, 7]).unwrap(),
            Attribute::from_data(common::corners_per_face(), &[4i32]).unwrap(),
            Attribute::from_data(common::group_index_offset(), &[0i32, 4]).unwrap(),
        ])
        .unwrap();
        let tri = g.triangulate_quad_mesh().unwrap();
        assert_eq!(tri.group_index_offsets(), Some(&[0, 6][..]));
        assert_eq!(tri.groups().count(), 2);
    }

    #[test]
    fn test_copy_and_delete_faces() {
        let g = GeometryAttributes::new(vec![
            Attribute::from_data(common::position(), &[Vec3::ZERO; 4]).unwrap(),
            Attribute::from_data(common::index(), &[0i32, 1, 2, 1, 2, 3]).unwrap(),
            Attribute::from_data(common::face_material_id(), &[10i32, 11]).unwrap(),
        ])
        .unwrap();

        let kept = g.copy_faces(|f| f == 1).unwrap();
        assert_eq!(kept.indices(), &[1, 2, 3]);
        assert_eq!(kept.face_material_ids(), Some(&[11][..]));

        let rest = g.delete_faces(|f| f == 1).unwrap();
        assert_eq!(rest.indices(), &[0, 1, 2]);
    }

    #[test]
    fn test_remap_vertices() {
        let g = GeometryAttributes::new(vec![
            Attribute::from_data(common::position(), &[Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z])
                .unwrap(),
            Attribute::from_data(common::index(), &[1i32, 2, 3]).unwrap(),
        ])
        .unwrap();

        let r = g.remap_vertices(&[3, 2, 1]).unwrap();
        assert_eq!(r.vertices(), &[Vec3::Z, Vec3::Y, Vec3::X]);
        assert_eq!(r.indices(), &[2, 1, 0]);

        assert!(g.remap_vertices(&[1, 2]).is_err());
        assert!(g.remap_vertices(&[9]).is_err());
    }

    #[test]
    fn test_remap_vertices_renumbers_face_indices_and_drops_groups() {
        let face_index =
            AttributeDescriptor::new(Association::Face, semantic::INDEX, 0, DataType::Int32, 3);
        let g = GeometryAttributes::new(vec![
            Attribute::from_data(common::position(), &[Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z])
                .unwrap(),
            Attribute::from_data(common::index(), &[1i32, 2, 3]).unwrap(),
            Attribute::from_data(face_index.clone(), &[1i32, 2, 3]).unwrap(),
            Attribute::from_data(common::face_group(), &[0i32]).unwrap(),
            Attribute::from_data(common::group_material_id(), &[4i32]).unwrap(),
            Attribute::from_data(common::face_material_id(), &[9i32]).unwrap(),
        ])
        .unwrap();

        let r = g.remap_vertices(&[3, 2, 1]).unwrap();
        let renumbered = r.attribute_by_descriptor(&face_index).unwrap();
        assert_eq!(renumbered.data::<i32>().unwrap(), &[2, 1, 0]);
        assert!(r.face_groups().is_none());
        assert!(r.group_material_ids().is_none());
        assert_eq!(r.face_material_ids(), Some(&[9][..]));
        assert!(validate_geometry(&r, ValidationMode::FailFast).unwrap().is_empty());

        assert!(g.remap_vertices(&[1, 2]).is_err());
    }

    #[test]
    fn test_transform() {
        let g = GeometryAttributes::new(vec![
            Attribute::from_data(common::position(), &[Vec3::ZERO, Vec3::X, Vec3::Y]).unwrap(),
            Attribute::from_data(common::vertex_normal(), &[Vec3::Z; 3]).unwrap(),
        ])
        .unwrap();
        let m = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0)) * Mat4::from_scale(Vec3::splat(2.0));
        let t = g.transform(m).unwrap();
        assert_eq!(t.vertices()[1], Vec3::new(3.0, 0.0, 0.0));
        assert_eq!(t.vertex_normals().unwrap()[0], Vec3::Z);
    }
}

//! Open geometry attribute collection.
//!
//! [`GeometryAttributes`] takes an arbitrary list of attributes, derives the
//! element counts of the mesh from their associations, and exposes the
//! attributes it recognizes through typed accessors:
//!
//! - [`GeometryAttributes::vertices`] / [`GeometryAttributes::indices`]
//! - per-vertex normals, uvs, colors, tangents
//! - per-face normals, colors, material ids, groups
//! - group, sub-geometry and instance tables
//!
//! Construction is the only point where counts are derived; a frozen
//! collection is read-only. Operations that change the mesh
//! ([`triangulate_quad_mesh`](GeometryAttributes::triangulate_quad_mesh),
//! [`set_attribute`](GeometryAttributes::set_attribute), merging) return a new
//! collection.

mod builder;
pub mod header;
pub mod relations;
mod remap;
mod views;

pub use builder::GeometryBuilder;
pub use header::{ForwardAxis, Handedness, MetaHeader, Unit, UpAxis};
pub use relations::{index_relation, CountKind, IndexRelation};
pub use views::{Instance, PolygonGroup, SubGeometry};

use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};
use std::ops::Range;

use tracing::{debug, warn};

use crate::attribute::Attribute;
use crate::descriptor::{common, semantic, Association, AttributeDescriptor};
use crate::relation::offsets_to_counts;
use crate::util::{Bounds3, DataType, Error, G3dPod, Mat4, Result, Vec2, Vec3, Vec4};

/// Corners per face assumed when the geometry does not say.
pub const DEFAULT_CORNERS_PER_FACE: usize = 3;

/// Element counts derived from a set of attributes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GeometryCounts {
    pub vertices: usize,
    pub corners: usize,
    pub faces: usize,
    pub groups: usize,
    pub subgeometries: usize,
    pub instances: usize,
}

impl GeometryCounts {
    pub fn get(&self, kind: CountKind) -> usize {
        match kind {
            CountKind::Vertices => self.vertices,
            CountKind::Corners => self.corners,
            CountKind::Faces => self.faces,
            CountKind::Groups => self.groups,
            CountKind::Subgeometries => self.subgeometries,
            CountKind::Instances => self.instances,
        }
    }
}

/// Attributes with a dedicated accessor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Canonical {
    Position,
    Index,
    CornersPerFace,
    VertexNormal,
    VertexUv,
    VertexUvw,
    VertexColor,
    VertexColorRgb,
    VertexTangent,
    FaceNormal,
    FaceColor,
    FaceMaterialId,
    FaceGroup,
    GroupMaterialId,
    GroupIndexOffset,
    GroupVertexOffset,
    SubgeometryIndexOffset,
    SubgeometryVertexOffset,
    SubgeometryMaterialId,
    InstanceTransform,
    InstanceParent,
    InstanceSubgeometry,
}

impl Canonical {
    const COUNT: usize = 22;

    /// Recognize by (semantic, association, arity) and component kind.
    fn recognize(desc: &AttributeDescriptor) -> Option<Self> {
        use Association as A;

        let float = desc.data_type == DataType::Float32;
        let int = desc.data_type.is_layout_compatible(DataType::Int32);
        let key = match (desc.semantic.as_str(), &desc.association, desc.data_arity) {
            (semantic::POSITION, A::Vertex, 3) if float => Self::Position,
            (semantic::INDEX, A::Corner, 1) if int => Self::Index,
            (semantic::FACE_SIZE, A::All, 1) if int => Self::CornersPerFace,
            (semantic::NORMAL, A::Vertex, 3) if float => Self::VertexNormal,
            (semantic::UV, A::Vertex, 2) if float => Self::VertexUv,
            (semantic::UV, A::Vertex, 3) if float => Self::VertexUvw,
            (semantic::COLOR, A::Vertex, 4) if float => Self::VertexColor,
            (semantic::COLOR, A::Vertex, 3) if float => Self::VertexColorRgb,
            (semantic::TANGENT, A::Vertex, 4) if float => Self::VertexTangent,
            (semantic::NORMAL, A::Face, 3) if float => Self::FaceNormal,
            (semantic::COLOR, A::Face, 4) if float => Self::FaceColor,
            (semantic::MATERIAL_ID, A::Face, 1) if int => Self::FaceMaterialId,
            (semantic::GROUP, A::Face, 1) if int => Self::FaceGroup,
            (semantic::MATERIAL_ID, A::Group, 1) if int => Self::GroupMaterialId,
            (semantic::INDEX_OFFSET, A::Group, 1) if int => Self::GroupIndexOffset,
            (semantic::VERTEX_OFFSET, A::Group, 1) if int => Self::GroupVertexOffset,
            (semantic::INDEX_OFFSET, A::Subgeometry, 1) if int => Self::SubgeometryIndexOffset,
            (semantic::VERTEX_OFFSET, A::Subgeometry, 1) if int => Self::SubgeometryVertexOffset,
            (semantic::MATERIAL_ID, A::Subgeometry, 1) if int => Self::SubgeometryMaterialId,
            (semantic::TRANSFORM, A::Instance, 16) if float => Self::InstanceTransform,
            (semantic::PARENT, A::Instance, 1) if int => Self::InstanceParent,
            (semantic::SUBGEOMETRY, A::Instance, 1) if int => Self::InstanceSubgeometry,
            _ => return None,
        };
        Some(key)
    }
}

/// Running per-association element counts, checked as attributes arrive.
#[derive(Default)]
struct CountTally {
    vertices: Option<usize>,
    corners: Option<usize>,
    faces: Option<usize>,
    groups: Option<usize>,
    subgeometries: Option<usize>,
    instances: Option<usize>,
    custom: BTreeMap<String, usize>,
}

impl CountTally {
    fn record(&mut self, attr: &Attribute) -> Result<()> {
        let actual = attr.element_count();
        let slot = match attr.association() {
            Association::Vertex => &mut self.vertices,
            Association::Corner | Association::Edge => &mut self.corners,
            Association::Face => &mut self.faces,
            Association::Group => &mut self.groups,
            Association::Subgeometry => &mut self.subgeometries,
            Association::Instance => &mut self.instances,
            Association::Custom(name) => {
                let expected = *self.custom.entry(name.clone()).or_insert(actual);
                return check_count(attr, expected);
            }
            Association::None | Association::All => return Ok(()),
        };
        let expected = *slot.get_or_insert(actual);
        check_count(attr, expected)
    }
}

fn check_count(attr: &Attribute, expected: usize) -> Result<()> {
    let actual = attr.element_count();
    if actual != expected {
        return Err(Error::ElementCountMismatch { name: attr.name(), expected, actual });
    }
    Ok(())
}

/// Ranges described by an offset table, checked against `total` and, for
/// index tables, face alignment.
fn offset_ranges(
    attr: Option<&Attribute>,
    total: usize,
    align: Option<usize>,
) -> Result<Vec<Range<usize>>> {
    let Some(attr) = attr else {
        return Ok(Vec::new());
    };
    let offsets = attr.to_integers()?;
    let name = attr.name();
    if let Some(&first) = offsets.first() {
        if first < 0 || first as u64 > total as u64 {
            return Err(Error::offsets(name, format!("first offset {first} outside 0..={total}")));
        }
    }
    let counts = offsets_to_counts(&offsets, total);
    offsets
        .iter()
        .zip(counts)
        .enumerate()
        .map(|(i, (&start, count))| {
            if count < 0 {
                return Err(Error::offsets(&name, format!("entry {i} has negative count {count}")));
            }
            if let Some(a) = align {
                if start as usize % a != 0 || count as usize % a != 0 {
                    return Err(Error::offsets(
                        &name,
                        format!("entry {i} ({start}+{count}) is not aligned to {a} corners per face"),
                    ));
                }
            }
            let start = start as usize;
            Ok(start..start + count as usize)
        })
        .collect()
}

/// A frozen, self-consistent set of mesh attributes.
#[derive(Clone, Debug)]
pub struct GeometryAttributes {
    header: MetaHeader,
    attributes: Vec<Attribute>,
    canonical: [Option<usize>; Canonical::COUNT],
    counts: GeometryCounts,
    custom_counts: BTreeMap<String, usize>,
    corners_per_face: usize,
    subgeometry_vertex_ranges: Vec<Range<usize>>,
    subgeometry_index_ranges: Vec<Range<usize>>,
    group_index_ranges: Vec<Range<usize>>,
}

impl GeometryAttributes {
    /// Freeze attributes with the default meta header.
    pub fn new(attributes: Vec<Attribute>) -> Result<Self> {
        Self::with_header(attributes, MetaHeader::default())
    }

    /// Freeze attributes, deriving and cross-checking all counts.
    ///
    /// Descriptors are unique: only the first attribute with a given
    /// descriptor is kept.
    pub fn with_header(mut attributes: Vec<Attribute>, header: MetaHeader) -> Result<Self> {
        let mut seen = HashSet::with_capacity(attributes.len());
        attributes.retain(|attr| {
            let first = seen.insert(attr.descriptor().clone());
            if !first {
                warn!(attribute = %attr.name(), "dropping attribute with a repeated descriptor");
            }
            first
        });

        let mut tally = CountTally::default();
        let mut canonical = [None; Canonical::COUNT];

        for (i, attr) in attributes.iter().enumerate() {
            tally.record(attr)?;
            if let Some(key) = Canonical::recognize(attr.descriptor()) {
                canonical[key as usize].get_or_insert(i);
            }
        }

        let position = canonical[Canonical::Position as usize]
            .ok_or_else(|| Error::MissingRequiredAttribute(common::position().to_string()))?;
        let num_vertices = attributes[position].element_count();

        if canonical[Canonical::Index as usize].is_none() {
            let count = i32::try_from(num_vertices)
                .map_err(|_| Error::other(format!("{num_vertices} vertices cannot be indexed")))?;
            let identity: Vec<i32> = (0..count).collect();
            let attr = Attribute::from_data(common::index(), &identity)?;
            tally.record(&attr)?;
            debug!(num_vertices, "no index attribute, using identity index buffer");
            canonical[Canonical::Index as usize] = Some(attributes.len());
            attributes.push(attr);
        }
        let num_corners = tally.corners.unwrap_or(num_vertices);

        let mut cpf = None;
        if let Some(i) = canonical[Canonical::CornersPerFace as usize] {
            let attr = &attributes[i];
            match attr.scalar_integer()? {
                Some(v) if v > 0 => cpf = Some(v as usize),
                v => {
                    return Err(Error::invalid(format!(
                        "{}: corners per face must be positive, got {v:?}",
                        attr.name()
                    )))
                }
            }
        }
        // A face-associated index buffer states its polygon size in its arity.
        for attr in &attributes {
            if attr.descriptor().same_role(&Association::Face, semantic::INDEX) {
                let arity = attr.descriptor().data_arity as usize;
                match cpf {
                    Some(expected) if expected != arity => {
                        return Err(Error::CornersPerFaceMismatch { expected, actual: arity })
                    }
                    _ => cpf = Some(arity),
                }
            }
        }
        let corners_per_face = cpf.unwrap_or(DEFAULT_CORNERS_PER_FACE);

        if num_corners % corners_per_face != 0 {
            return Err(Error::invalid(format!(
                "{num_corners} corners is not a multiple of {corners_per_face} corners per face"
            )));
        }
        let num_faces = num_corners / corners_per_face;
        if let Some(faces) = tally.faces {
            if faces != num_faces {
                let name = attributes
                    .iter()
                    .find(|a| a.association() == &Association::Face)
                    .map(Attribute::name)
                    .unwrap_or_default();
                return Err(Error::ElementCountMismatch { name, expected: num_faces, actual: faces });
            }
        }

        let attr_at = |key: Canonical| canonical[key as usize].map(|i| &attributes[i]);
        let subgeometry_index_ranges = offset_ranges(
            attr_at(Canonical::SubgeometryIndexOffset),
            num_corners,
            Some(corners_per_face),
        )?;
        let subgeometry_vertex_ranges =
            offset_ranges(attr_at(Canonical::SubgeometryVertexOffset), num_vertices, None)?;
        let group_index_ranges = offset_ranges(
            attr_at(Canonical::GroupIndexOffset),
            num_corners,
            Some(corners_per_face),
        )?;

        let counts = GeometryCounts {
            vertices: num_vertices,
            corners: num_corners,
            faces: num_faces,
            groups: tally.groups.unwrap_or(0),
            subgeometries: tally.subgeometries.unwrap_or(0),
            instances: tally.instances.unwrap_or(0),
        };

        Ok(Self {
            header,
            attributes,
            canonical,
            counts,
            custom_counts: tally.custom,
            corners_per_face,
            subgeometry_vertex_ranges,
            subgeometry_index_ranges,
            group_index_ranges,
        })
    }

    #[inline]
    pub fn header(&self) -> &MetaHeader {
        &self.header
    }

    /// Same attributes under a different meta header.
    pub fn with_meta_header(mut self, header: MetaHeader) -> Self {
        self.header = header;
        self
    }

    #[inline]
    pub fn counts(&self) -> GeometryCounts {
        self.counts
    }

    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.counts.vertices
    }

    #[inline]
    pub fn num_corners(&self) -> usize {
        self.counts.corners
    }

    #[inline]
    pub fn num_faces(&self) -> usize {
        self.counts.faces
    }

    #[inline]
    pub fn num_groups(&self) -> usize {
        self.counts.groups
    }

    #[inline]
    pub fn num_subgeometries(&self) -> usize {
        self.counts.subgeometries
    }

    #[inline]
    pub fn num_instances(&self) -> usize {
        self.counts.instances
    }

    #[inline]
    pub fn corners_per_face(&self) -> usize {
        self.corners_per_face
    }

    /// Element count of a schema-defined association.
    pub fn custom_count(&self, association: &str) -> Option<usize> {
        self.custom_counts.get(association).copied()
    }

    /// All attributes, in construction order, including a synthesized index.
    #[inline]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn into_attributes(self) -> Vec<Attribute> {
        self.attributes
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = String> + '_ {
        self.attributes.iter().map(Attribute::name)
    }

    /// Attribute by canonical descriptor string.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        let desc = AttributeDescriptor::try_parse(name)?;
        self.attribute_by_descriptor(&desc)
    }

    pub fn attribute_by_descriptor(&self, desc: &AttributeDescriptor) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.descriptor() == desc)
    }

    /// Attributes with the given association.
    pub fn attributes_with<'a>(
        &'a self,
        association: &'a Association,
    ) -> impl Iterator<Item = &'a Attribute> + 'a {
        self.attributes.iter().filter(move |a| a.association() == association)
    }

    /// Same descriptors in the same order.
    pub fn has_same_attributes(&self, other: &GeometryAttributes) -> bool {
        self.attributes.len() == other.attributes.len()
            && self
                .attributes
                .iter()
                .zip(&other.attributes)
                .all(|(a, b)| a.descriptor() == b.descriptor())
    }

    /// Number of elements an attribute with this descriptor must have.
    /// `None` for a custom association this geometry has never seen.
    pub fn expected_element_count(&self, desc: &AttributeDescriptor) -> Option<usize> {
        match &desc.association {
            Association::All => Some(1),
            Association::None => Some(0),
            Association::Custom(name) => self.custom_count(name),
            assoc => CountKind::of(assoc).map(|kind| self.counts.get(kind)),
        }
    }

    /// Zero-filled attribute sized for this geometry.
    pub fn default_attribute_for(&self, desc: &AttributeDescriptor) -> Result<Attribute> {
        let count = self.expected_element_count(desc).unwrap_or(0);
        Attribute::default_attribute(desc.clone(), count)
    }

    pub fn get_or_default_attribute(&self, desc: &AttributeDescriptor) -> Result<Cow<'_, Attribute>> {
        match self.attribute_by_descriptor(desc) {
            Some(attr) => Ok(Cow::Borrowed(attr)),
            None => Ok(Cow::Owned(self.default_attribute_for(desc)?)),
        }
    }

    /// New geometry with `attr` replacing any attribute of the same descriptor.
    pub fn set_attribute(&self, attr: Attribute) -> Result<Self> {
        let mut attributes: Vec<Attribute> = self
            .attributes
            .iter()
            .filter(|a| a.descriptor() != attr.descriptor())
            .cloned()
            .collect();
        attributes.push(attr);
        Self::with_header(attributes, self.header)
    }

    /// New geometry with extra attributes appended.
    pub fn add_attributes(&self, extra: impl IntoIterator<Item = Attribute>) -> Result<Self> {
        let mut attributes = self.attributes.clone();
        attributes.extend(extra);
        Self::with_header(attributes, self.header)
    }

    fn canonical_attribute(&self, key: Canonical) -> Option<&Attribute> {
        self.canonical[key as usize].map(|i| &self.attributes[i])
    }

    fn typed<T: G3dPod>(&self, key: Canonical) -> Option<&[T]> {
        self.canonical_attribute(key)?.data::<T>().ok()
    }

    /// Vertex positions.
    pub fn vertices(&self) -> &[Vec3] {
        self.typed(Canonical::Position).unwrap_or_default()
    }

    /// Corner-to-vertex index buffer.
    pub fn indices(&self) -> &[i32] {
        self.typed(Canonical::Index).unwrap_or_default()
    }

    pub fn vertex_normals(&self) -> Option<&[Vec3]> {
        self.typed(Canonical::VertexNormal)
    }

    pub fn vertex_uvs(&self) -> Option<&[Vec2]> {
        self.typed(Canonical::VertexUv)
    }

    pub fn vertex_uvws(&self) -> Option<&[Vec3]> {
        self.typed(Canonical::VertexUvw)
    }

    pub fn vertex_colors(&self) -> Option<&[Vec4]> {
        self.typed(Canonical::VertexColor)
    }

    pub fn vertex_colors_rgb(&self) -> Option<&[Vec3]> {
        self.typed(Canonical::VertexColorRgb)
    }

    pub fn vertex_tangents(&self) -> Option<&[Vec4]> {
        self.typed(Canonical::VertexTangent)
    }

    pub fn face_normals(&self) -> Option<&[Vec3]> {
        self.typed(Canonical::FaceNormal)
    }

    pub fn face_colors(&self) -> Option<&[Vec4]> {
        self.typed(Canonical::FaceColor)
    }

    pub fn face_material_ids(&self) -> Option<&[i32]> {
        self.typed(Canonical::FaceMaterialId)
    }

    pub fn face_groups(&self) -> Option<&[i32]> {
        self.typed(Canonical::FaceGroup)
    }

    pub fn group_material_ids(&self) -> Option<&[i32]> {
        self.typed(Canonical::GroupMaterialId)
    }

    pub fn group_index_offsets(&self) -> Option<&[i32]> {
        self.typed(Canonical::GroupIndexOffset)
    }

    pub fn group_vertex_offsets(&self) -> Option<&[i32]> {
        self.typed(Canonical::GroupVertexOffset)
    }

    pub fn subgeometry_index_offsets(&self) -> Option<&[i32]> {
        self.typed(Canonical::SubgeometryIndexOffset)
    }

    pub fn subgeometry_vertex_offsets(&self) -> Option<&[i32]> {
        self.typed(Canonical::SubgeometryVertexOffset)
    }

    pub fn subgeometry_material_ids(&self) -> Option<&[i32]> {
        self.typed(Canonical::SubgeometryMaterialId)
    }

    pub fn instance_transforms(&self) -> Option<&[Mat4]> {
        self.typed(Canonical::InstanceTransform)
    }

    pub fn instance_parents(&self) -> Option<&[i32]> {
        self.typed(Canonical::InstanceParent)
    }

    pub fn instance_subgeometries(&self) -> Option<&[i32]> {
        self.typed(Canonical::InstanceSubgeometry)
    }

    /// Corners of each sub-geometry, from the index offset table.
    pub fn subgeometry_index_counts(&self) -> Vec<usize> {
        self.subgeometry_index_ranges.iter().map(ExactSizeIterator::len).collect()
    }

    /// Vertices of each sub-geometry, from the vertex offset table.
    pub fn subgeometry_vertex_counts(&self) -> Vec<usize> {
        self.subgeometry_vertex_ranges.iter().map(ExactSizeIterator::len).collect()
    }

    pub fn sub_geometries(&self) -> impl Iterator<Item = SubGeometry<'_>> + '_ {
        (0..self.num_subgeometries()).map(move |i| SubGeometry::new(self, i))
    }

    pub fn instances(&self) -> impl Iterator<Item = Instance<'_>> + '_ {
        (0..self.num_instances()).map(move |i| Instance::new(self, i))
    }

    /// Polygon groups. Empty unless groups carry an index offset table.
    pub fn groups(&self) -> impl Iterator<Item = PolygonGroup<'_>> + '_ {
        (0..self.group_index_ranges.len()).map(move |i| PolygonGroup::new(self, i))
    }

    pub(crate) fn subgeometry_vertex_range(&self, i: usize) -> Range<usize> {
        match self.subgeometry_vertex_ranges.get(i) {
            Some(r) => r.clone(),
            None if self.subgeometry_vertex_ranges.is_empty() => 0..self.num_vertices(),
            None => 0..0,
        }
    }

    pub(crate) fn subgeometry_index_range(&self, i: usize) -> Range<usize> {
        match self.subgeometry_index_ranges.get(i) {
            Some(r) => r.clone(),
            None if self.subgeometry_index_ranges.is_empty() => 0..self.num_corners(),
            None => 0..0,
        }
    }

    pub(crate) fn group_index_range(&self, i: usize) -> Range<usize> {
        self.group_index_ranges.get(i).cloned().unwrap_or(0..0)
    }

    #[inline]
    pub fn face_to_corner(&self, face: usize) -> usize {
        face * self.corners_per_face
    }

    #[inline]
    pub fn corner_to_face(&self, corner: usize) -> usize {
        corner / self.corners_per_face
    }

    /// Position of a corner within its face.
    #[inline]
    pub fn corner_number(&self, corner: usize) -> usize {
        corner % self.corners_per_face
    }

    /// Every corner of the given faces, in order.
    pub fn face_indices_to_corner_indices(&self, faces: &[usize]) -> Vec<usize> {
        let cpf = self.corners_per_face;
        faces.iter().flat_map(|&f| f * cpf..(f + 1) * cpf).collect()
    }

    /// Bounding box of all vertex positions.
    pub fn bounds(&self) -> Bounds3 {
        Bounds3::from_points(self.vertices())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Vec<Attribute> {
        vec![
            Attribute::from_data(
                common::position(),
                &[Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 1.0, 1.0)],
            )
            .unwrap(),
            Attribute::from_data(common::index(), &[0i32, 1, 2]).unwrap(),
        ]
    }

    #[test]
    fn test_triangle_counts() {
        let g = GeometryAttributes::new(triangle()).unwrap();
        let c = g.counts();
        assert_eq!(c.vertices, 3);
        assert_eq!(c.corners, 3);
        assert_eq!(c.faces, 1);
        assert_eq!(c.subgeometries, 0);
        assert_eq!(c.instances, 0);
        assert_eq!(g.corners_per_face(), DEFAULT_CORNERS_PER_FACE);
        assert_eq!(g.indices(), &[0, 1, 2]);
    }

    #[test]
    fn test_missing_position() {
        let attrs = vec![Attribute::from_data(common::index(), &[0i32]).unwrap()];
        let err = GeometryAttributes::new(attrs).unwrap_err();
        assert!(matches!(err, Error::MissingRequiredAttribute(_)));
    }

    #[test]
    fn test_identity_index_synthesized() {
        let attrs = vec![Attribute::from_data(common::position(), &[Vec3::ZERO; 6]).unwrap()];
        let g = GeometryAttributes::new(attrs).unwrap();
        assert_eq!(g.indices(), &[0, 1, 2, 3, 4, 5]);
        assert_eq!(g.attributes().len(), 2);
        assert_eq!(g.num_faces(), 2);
    }

    #[test]
    fn test_first_canonical_wins() {
        let mut attrs = triangle();
        attrs.push(Attribute::from_data(common::vertex_normal(), &[Vec3::X; 3]).unwrap());
        attrs.push(
            Attribute::from_data(common::vertex_normal().with_index(1), &[Vec3::Y; 3]).unwrap(),
        );
        let g = GeometryAttributes::new(attrs).unwrap();
        assert_eq!(g.vertex_normals().unwrap()[0], Vec3::X);
        assert_eq!(g.attributes().len(), 4);
    }

    #[test]
    fn test_repeated_descriptor_keeps_first() {
        let mut attrs = triangle();
        attrs.push(Attribute::from_data(common::vertex_normal(), &[Vec3::X; 3]).unwrap());
        attrs.push(Attribute::from_data(common::vertex_normal(), &[Vec3::Y; 3]).unwrap());
        let g = GeometryAttributes::new(attrs).unwrap();
        assert_eq!(g.attributes().len(), 3);
        assert_eq!(g.attributes_with(&Association::Vertex).count(), 2);
        assert_eq!(g.vertex_normals().unwrap(), &[Vec3::X; 3]);
    }

    #[test]
    fn test_count_mismatch() {
        let mut attrs = triangle();
        attrs.push(Attribute::from_data(common::vertex_normal(), &[Vec3::X; 2]).unwrap());
        let err = GeometryAttributes::new(attrs).unwrap_err();
        assert!(matches!(err, Error::ElementCountMismatch { expected: 3, actual: 2, .. }));
    }

    #[test]
    fn test_face_count_must_match_corners() {
        let mut attrs = triangle();
        attrs.push(Attribute::from_data(common::face_material_id(), &[0i32, 1]).unwrap());
        assert!(matches!(
            GeometryAttributes::new(attrs),
            Err(Error::ElementCountMismatch { expected: 1, actual: 2, .. })
        ));
    }

    #[test]
    fn test_corners_per_face() {
        let attrs = vec![
            Attribute::from_data(common::position(), &[Vec3::ZERO; 4]).unwrap(),
            Attribute::from_data(common::index(), &[0i32, 1, 2, 3]).unwrap(),
            Attribute::from_data(common::corners_per_face(), &[4i32]).unwrap(),
        ];
        let g = GeometryAttributes::new(attrs).unwrap();
        assert_eq!(g.corners_per_face(), 4);
        assert_eq!(g.num_faces(), 1);

        let attrs = vec![
            Attribute::from_data(common::position(), &[Vec3::ZERO; 4]).unwrap(),
            Attribute::from_data(common::index(), &[0i32, 1, 2, 3]).unwrap(),
        ];
        assert!(GeometryAttributes::new(attrs).is_err());
    }

    #[test]
    fn test_corners_per_face_conflict() {
        let face_index = AttributeDescriptor::new(Association::Face, "index", 0, DataType::Int32, 4);
        let attrs = vec![
            Attribute::from_data(common::position(), &[Vec3::ZERO; 3]).unwrap(),
            Attribute::from_data(common::corners_per_face(), &[3i32]).unwrap(),
            Attribute::from_data(face_index, &[0i32, 1, 2, 0]).unwrap(),
        ];
        assert!(matches!(
            GeometryAttributes::new(attrs),
            Err(Error::CornersPerFaceMismatch { expected: 3, actual: 4 })
        ));
    }

    #[test]
    fn test_subgeometry_offsets() {
        let mut attrs = vec![
            Attribute::from_data(common::position(), &[Vec3::ZERO; 5]).unwrap(),
            Attribute::from_data(common::index(), &[0i32, 1, 2, 0, 1, 2, 2, 3, 4]).unwrap(),
        ];
        attrs.push(Attribute::from_data(common::subgeometry_index_offset(), &[0i32, 3]).unwrap());
        attrs.push(Attribute::from_data(common::subgeometry_vertex_offset(), &[0i32, 3]).unwrap());
        let g = GeometryAttributes::new(attrs).unwrap();
        assert_eq!(g.num_subgeometries(), 2);
        assert_eq!(g.subgeometry_index_counts(), vec![3, 6]);
        assert_eq!(g.subgeometry_vertex_counts(), vec![3, 2]);
    }

    #[test]
    fn test_bad_subgeometry_offsets() {
        let base = || {
            vec![
                Attribute::from_data(common::position(), &[Vec3::ZERO; 3]).unwrap(),
                Attribute::from_data(common::index(), &[0i32, 1, 2, 0, 1, 2]).unwrap(),
            ]
        };

        let mut attrs = base();
        attrs.push(Attribute::from_data(common::subgeometry_index_offset(), &[3i32, 0]).unwrap());
        assert!(matches!(GeometryAttributes::new(attrs), Err(Error::InvalidOffsets { .. })));

        let mut attrs = base();
        attrs.push(Attribute::from_data(common::subgeometry_index_offset(), &[0i32, 2]).unwrap());
        assert!(matches!(GeometryAttributes::new(attrs), Err(Error::InvalidOffsets { .. })));
    }

    #[test]
    fn test_custom_association_counts() {
        let mut attrs = triangle();
        let a = AttributeDescriptor::new(Association::custom("material"), "color", 0, DataType::Float32, 4);
        let b = AttributeDescriptor::new(Association::custom("material"), "gloss", 0, DataType::Float32, 1);
        attrs.push(Attribute::from_data(a, &[Vec4::ONE; 2]).unwrap());
        attrs.push(Attribute::from_data(b.clone(), &[0.5f32; 2]).unwrap());
        let g = GeometryAttributes::new(attrs.clone()).unwrap();
        assert_eq!(g.custom_count("material"), Some(2));
        assert_eq!(g.expected_element_count(&b), Some(2));

        attrs.push(Attribute::from_data(b.with_index(1), &[0.5f32; 3]).unwrap());
        assert!(GeometryAttributes::new(attrs).is_err());
    }

    #[test]
    fn test_expected_counts_and_defaults() {
        let g = GeometryAttributes::new(triangle()).unwrap();
        assert_eq!(g.expected_element_count(&common::corners_per_face()), Some(1));
        assert_eq!(g.expected_element_count(&common::face_normal()), Some(1));
        assert_eq!(g.expected_element_count(&common::instance_parent()), Some(0));

        let uv = g.get_or_default_attribute(&common::vertex_uv(0)).unwrap();
        assert!(matches!(uv, Cow::Owned(_)));
        assert_eq!(uv.element_count(), 3);

        let pos = g.get_or_default_attribute(&common::position()).unwrap();
        assert!(matches!(pos, Cow::Borrowed(_)));
    }

    #[test]
    fn test_set_attribute_replaces() {
        let g = GeometryAttributes::new(triangle()).unwrap();
        let g = g
            .set_attribute(Attribute::from_data(common::index(), &[2i32, 1, 0]).unwrap())
            .unwrap();
        assert_eq!(g.indices(), &[2, 1, 0]);
        assert_eq!(g.attributes().len(), 2);
    }

    #[test]
    fn test_face_corner_conversions() {
        let g = GeometryAttributes::new(triangle()).unwrap();
        assert_eq!(g.face_to_corner(2), 6);
        assert_eq!(g.corner_to_face(7), 2);
        assert_eq!(g.corner_number(7), 1);
        assert_eq!(g.face_indices_to_corner_indices(&[1, 0]), vec![3, 4, 5, 0, 1, 2]);
    }

    #[test]
    fn test_lookup_by_name() {
        let g = GeometryAttributes::new(triangle()).unwrap();
        assert!(g.attribute("g3d:corner:index:0:int32:1").is_some());
        assert!(g.attribute("g3d:corner:index:1:int32:1").is_none());
        assert!(g.attribute("nonsense").is_none());
        assert_eq!(g.attributes_with(&Association::Vertex).count(), 1);
    }
}

//! Fixed VIM attribute schema.
//!
//! [`VimAttributes`] holds at most one attribute per [`Slot`]. Slots are
//! mutable and independent; counts are derived on demand by
//! [`VimAttributes::counts`] and relations are checked by
//! [`VimAttributes::validate`].

mod slot;

pub use slot::{Slot, SlotKind};

use crate::attribute::Attribute;
use crate::geometry::{MetaHeader, DEFAULT_CORNERS_PER_FACE};
use crate::relation::{rebase, NO_RELATION};
use crate::util::{Error, G3dPod, Mat4, Result, Vec3, Vec4};
use crate::validate::{check_relation, IndexViolation, ValidationMode};

/// Element counts of a [`VimAttributes`], each taken from its defining slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VimCounts {
    pub vertices: usize,
    pub indices: usize,
    /// `None` when the collection has no face size attribute.
    pub corners_per_face: Option<usize>,
    pub faces: usize,
    pub instances: usize,
    pub meshes: usize,
    pub submeshes: usize,
    pub materials: usize,
    pub shape_vertices: usize,
    pub shapes: usize,
}

/// Attribute collection with the fixed VIM slot layout.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VimAttributes {
    header: MetaHeader,
    slots: [Option<Attribute>; Slot::COUNT],
}

macro_rules! slot_accessors {
    ($($slot:ident: $ty:ty => $get:ident, $set:ident;)*) => {
        impl VimAttributes {
            $(
                pub fn $get(&self) -> Option<&[$ty]> {
                    self.get(Slot::$slot)?.data::<$ty>().ok()
                }

                pub fn $set(&mut self, values: &[$ty]) -> Result<()> {
                    self.set_data(Slot::$slot, values)
                }
            )*
        }
    };
}

slot_accessors! {
    CornersPerFace: i32 => corners_per_face, set_corners_per_face;
    Vertex: Vec3 => vertices, set_vertices;
    Index: i32 => indices, set_indices;
    InstanceTransform: Mat4 => instance_transforms, set_instance_transforms;
    InstanceParent: i32 => instance_parents, set_instance_parents;
    InstanceFlags: u16 => instance_flags, set_instance_flags;
    InstanceMesh: i32 => instance_meshes, set_instance_meshes;
    MeshSubmeshOffset: i32 => mesh_submesh_offsets, set_mesh_submesh_offsets;
    SubmeshIndexOffset: i32 => submesh_index_offsets, set_submesh_index_offsets;
    SubmeshMaterial: i32 => submesh_materials, set_submesh_materials;
    MaterialColor: Vec4 => material_colors, set_material_colors;
    MaterialGlossiness: f32 => material_glossiness, set_material_glossiness;
    MaterialSmoothness: f32 => material_smoothness, set_material_smoothness;
    ShapeVertex: Vec3 => shape_vertices, set_shape_vertices;
    ShapeVertexOffset: i32 => shape_vertex_offsets, set_shape_vertex_offsets;
    ShapeColor: Vec4 => shape_colors, set_shape_colors;
    ShapeWidth: f32 => shape_widths, set_shape_widths;
}

impl VimAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(header: MetaHeader) -> Self {
        Self { header, ..Self::default() }
    }

    #[inline]
    pub fn header(&self) -> &MetaHeader {
        &self.header
    }

    pub fn set_header(&mut self, header: MetaHeader) {
        self.header = header;
    }

    #[inline]
    pub fn get(&self, slot: Slot) -> Option<&Attribute> {
        self.slots[slot as usize].as_ref()
    }

    /// Like [`get`](Self::get) but fails when the slot is empty.
    pub fn get_attribute(&self, slot: Slot) -> Result<&Attribute> {
        self.get(slot).ok_or_else(|| Error::MissingRequiredAttribute(slot.name().to_string()))
    }

    /// Attribute by canonical descriptor string.
    pub fn attribute_by_name(&self, name: &str) -> Option<&Attribute> {
        self.get(Slot::from_name(name)?)
    }

    /// Store an attribute, returning the previous one.
    ///
    /// Fails with [`Error::SlotMismatch`] unless the descriptor is exactly the
    /// slot's.
    pub fn set(&mut self, slot: Slot, attr: Attribute) -> Result<Option<Attribute>> {
        let expected = slot.descriptor();
        if attr.descriptor() != &expected {
            return Err(Error::SlotMismatch {
                slot: slot.label(),
                expected: expected.to_string(),
                actual: attr.name(),
            });
        }
        Ok(self.slots[slot as usize].replace(attr))
    }

    /// Store typed values in a slot.
    pub fn set_data<T: G3dPod>(&mut self, slot: Slot, values: &[T]) -> Result<()> {
        let attr = Attribute::from_data(slot.descriptor(), values)?;
        self.slots[slot as usize] = Some(attr);
        Ok(())
    }

    pub fn take(&mut self, slot: Slot) -> Option<Attribute> {
        self.slots[slot as usize].take()
    }

    /// Place an attribute in the slot with the same descriptor. Returns it
    /// back when no slot matches.
    pub fn insert(&mut self, attr: Attribute) -> std::result::Result<Slot, Attribute> {
        match Slot::from_descriptor(attr.descriptor()) {
            Some(slot) => {
                self.slots[slot as usize] = Some(attr);
                Ok(slot)
            }
            None => Err(attr),
        }
    }

    /// Occupied slots in slot order.
    pub fn attributes(&self) -> impl Iterator<Item = (Slot, &Attribute)> + '_ {
        Slot::ALL.into_iter().filter_map(move |s| self.get(s).map(|a| (s, a)))
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Element count of a slot, 0 when empty.
    pub fn len(&self, slot: Slot) -> usize {
        self.get(slot).map_or(0, Attribute::element_count)
    }

    /// Counts taken from each association's defining slot.
    ///
    /// Only the face size is checked here: it must be positive and divide
    /// the index count. See [`check_counts`](Self::check_counts) for the
    /// per-slot cross-check.
    pub fn counts(&self) -> Result<VimCounts> {
        let corners_per_face = match self.corners_per_face().and_then(|v| v.first().copied()) {
            Some(v) if v > 0 => Some(v as usize),
            Some(v) => {
                return Err(Error::invalid(format!("corners per face must be positive, got {v}")))
            }
            None => None,
        };
        let indices = self.len(Slot::Index);
        let cpf = corners_per_face.unwrap_or(DEFAULT_CORNERS_PER_FACE);
        if indices % cpf != 0 {
            return Err(Error::invalid(format!(
                "{indices} indices is not a multiple of {cpf} corners per face"
            )));
        }
        Ok(VimCounts {
            vertices: self.len(Slot::Vertex),
            indices,
            corners_per_face,
            faces: indices / cpf,
            instances: self.len(Slot::InstanceTransform),
            meshes: self.len(Slot::MeshSubmeshOffset),
            submeshes: self.len(Slot::SubmeshIndexOffset),
            materials: self.len(Slot::MaterialColor),
            shape_vertices: self.len(Slot::ShapeVertex),
            shapes: self.len(Slot::ShapeVertexOffset),
        })
    }

    /// Every occupied slot must have as many elements as its association's
    /// defining slot, and the face size must hold exactly one value.
    pub fn check_counts(&self) -> Result<()> {
        for (slot, attr) in self.attributes() {
            let expected = match slot.kind() {
                SlotKind::Singleton => 1,
                _ => self.len(slot.count_source()),
            };
            if attr.element_count() != expected {
                return Err(Error::ElementCountMismatch {
                    name: attr.name(),
                    expected,
                    actual: attr.element_count(),
                });
            }
        }
        Ok(())
    }

    /// Check every index slot, stopping at the first violation.
    pub fn validate(&self) -> Result<()> {
        self.validate_with(ValidationMode::FailFast).map(|_| ())
    }

    /// Check every index slot against the length of its target slot.
    ///
    /// An empty index slot is skipped; an index slot whose target is empty
    /// only accepts the sentinel.
    pub fn validate_with(&self, mode: ValidationMode) -> Result<Vec<IndexViolation>> {
        let mut violations = Vec::new();
        for (slot, attr) in self.attributes() {
            if let SlotKind::Index { into } = slot.kind() {
                let max = self.len(into) as i64 - 1;
                check_relation(slot.name(), &attr.to_integers()?, max, mode, &mut violations)?;
            }
        }
        Ok(violations)
    }

    /// Merge one slot of `self` followed by `others`.
    ///
    /// Data is concatenated, padding inputs that lack the slot with zeros.
    /// Index slots are rebased by the running length of their target and
    /// padded with the sentinel. A singleton is taken from `self` and must
    /// agree with every other input that has one. Returns `None` when `self`
    /// does not have the slot.
    pub fn merge_attribute(&self, slot: Slot, others: &[&VimAttributes]) -> Result<Option<Attribute>> {
        let Some(first) = self.get(slot) else {
            return Ok(None);
        };
        let inputs: Vec<&VimAttributes> = std::iter::once(self).chain(others.iter().copied()).collect();
        let desc = slot.descriptor();

        match slot.kind() {
            SlotKind::Singleton => {
                let mut present = others.iter().filter_map(|v| v.get(slot));
                if let Some(other) = present.find(|a| a.bytes() != first.bytes()) {
                    let value = |a: &Attribute| a.scalar_integer().ok().flatten().unwrap_or(0) as usize;
                    return Err(Error::CornersPerFaceMismatch {
                        expected: value(first),
                        actual: value(other),
                    });
                }
                Ok(Some(first.clone()))
            }
            SlotKind::Data => {
                let padded = inputs
                    .iter()
                    .map(|v| match v.get(slot) {
                        Some(attr) => Ok(attr.clone()),
                        None => Attribute::default_attribute(desc.clone(), v.len(slot.count_source())),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Attribute::concat(desc, &padded).map(Some)
            }
            SlotKind::Index { into } => {
                let mut values = Vec::new();
                let mut base = 0usize;
                for v in &inputs {
                    match v.get(slot) {
                        Some(attr) => values.extend(rebase(&attr.to_integers()?, base)),
                        None => {
                            let n = v.len(slot.count_source());
                            values.extend(std::iter::repeat(NO_RELATION).take(n));
                        }
                    }
                    base += v.len(into);
                }
                Attribute::from_integers(desc, &values).map(Some)
            }
        }
    }
}

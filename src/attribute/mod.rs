//! Attributes: a descriptor bound to an owned byte buffer.

mod typed;

pub use typed::TypedAttribute;

use crate::descriptor::{Association, AttributeDescriptor};
use crate::util::{AlignedBuffer, DataType, Error, G3dPod, Result};

/// One attribute buffer.
///
/// The byte length is always a whole number of elements; this is checked on
/// construction and the bytes are never mutated afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    descriptor: AttributeDescriptor,
    data: AlignedBuffer,
}

impl Attribute {
    /// Bind a descriptor to a byte buffer.
    pub fn new(descriptor: AttributeDescriptor, data: AlignedBuffer) -> Result<Self> {
        let element_size = descriptor.data_element_size();
        if element_size == 0 || data.len() % element_size != 0 {
            return Err(Error::SizeMismatch {
                name: descriptor.to_string(),
                byte_len: data.len(),
                element_size,
            });
        }
        Ok(Self { descriptor, data })
    }

    /// Bind a descriptor to a copy of `bytes`.
    pub fn from_bytes(descriptor: AttributeDescriptor, bytes: &[u8]) -> Result<Self> {
        Self::new(descriptor, AlignedBuffer::from_slice(bytes))
    }

    /// Build an attribute from typed values.
    pub fn from_data<T: G3dPod>(descriptor: AttributeDescriptor, values: &[T]) -> Result<Self> {
        check_type::<T>(&descriptor)?;
        Self::from_bytes(descriptor, bytemuck::cast_slice(values))
    }

    /// Zero-filled attribute with `count` elements.
    pub fn default_attribute(descriptor: AttributeDescriptor, count: usize) -> Result<Self> {
        let len = descriptor.data_element_size() * count;
        Self::new(descriptor, AlignedBuffer::zeroed(len))
    }

    /// Attribute holding the given integers, narrowed to the descriptor's
    /// integer type.
    ///
    /// A value must fit the type as either signed or unsigned, so `-1` is
    /// accepted for unsigned types.
    pub fn from_integers(descriptor: AttributeDescriptor, values: &[i64]) -> Result<Self> {
        let bits = descriptor.data_type_size() as u32 * 8;
        if (8..64).contains(&bits) {
            let (min, max) = (-(1i64 << (bits - 1)), (1i64 << bits) - 1);
            if let Some(&v) = values.iter().find(|&&v| v < min || v > max) {
                return Err(Error::other(format!(
                    "{descriptor}: value {v} does not fit in {}",
                    descriptor.data_type
                )));
            }
        }
        let bytes: Vec<u8> = match descriptor.data_type {
            DataType::Int8 | DataType::Uint8 => values.iter().map(|&v| v as u8).collect(),
            DataType::Int16 | DataType::Uint16 => {
                values.iter().flat_map(|&v| (v as u16).to_le_bytes()).collect()
            }
            DataType::Int32 | DataType::Uint32 => {
                values.iter().flat_map(|&v| (v as u32).to_le_bytes()).collect()
            }
            DataType::Int64 | DataType::Uint64 => {
                values.iter().flat_map(|&v| v.to_le_bytes()).collect()
            }
            other => {
                return Err(Error::TypeMismatch {
                    name: descriptor.to_string(),
                    expected: "integer data type".into(),
                    actual: other.to_string(),
                })
            }
        };
        Self::from_bytes(descriptor, &bytes)
    }

    /// Concatenate the bytes of several attributes under one descriptor.
    pub fn concat<'a>(
        descriptor: AttributeDescriptor,
        parts: impl IntoIterator<Item = &'a Attribute>,
    ) -> Result<Self> {
        let parts: Vec<&Attribute> = parts.into_iter().collect();
        for part in &parts {
            if part.descriptor.data_element_size() != descriptor.data_element_size() {
                return Err(Error::TypeMismatch {
                    name: descriptor.to_string(),
                    expected: descriptor.to_string(),
                    actual: part.descriptor.to_string(),
                });
            }
        }
        let buf = AlignedBuffer::concat(parts.iter().map(|a| a.bytes()));
        Self::new(descriptor, buf)
    }

    #[inline]
    pub fn descriptor(&self) -> &AttributeDescriptor {
        &self.descriptor
    }

    /// Canonical descriptor string.
    pub fn name(&self) -> String {
        self.descriptor.to_string()
    }

    #[inline]
    pub fn association(&self) -> &Association {
        &self.descriptor.association
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        self.data.as_bytes()
    }

    #[inline]
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn element_count(&self) -> usize {
        self.data.len() / self.descriptor.data_element_size()
    }

    /// Typed zero-copy view.
    pub fn as_type<T: G3dPod>(&self) -> Result<TypedAttribute<'_, T>> {
        check_type::<T>(&self.descriptor)?;
        let data: &[T] = bytemuck::try_cast_slice(self.bytes()).map_err(|e| Error::TypeMismatch {
            name: self.name(),
            expected: format!("{} x{}", T::DATA_TYPE, T::ARITY),
            actual: e.to_string(),
        })?;
        Ok(TypedAttribute::new(self, data))
    }

    /// Shortcut for `as_type::<T>()?.data()`.
    pub fn data<T: G3dPod>(&self) -> Result<&[T]> {
        Ok(self.as_type::<T>()?.data())
    }

    /// Every component widened to `i64`. Fails for float attributes.
    pub fn to_integers(&self) -> Result<Vec<i64>> {
        let values = match self.descriptor.data_type {
            DataType::Int8 => self.data::<i8>()?.iter().map(|&v| v as i64).collect(),
            DataType::Int16 => self.data::<i16>()?.iter().map(|&v| v as i64).collect(),
            DataType::Int32 => self.data::<i32>()?.iter().map(|&v| v as i64).collect(),
            DataType::Int64 => self.data::<i64>()?.to_vec(),
            DataType::Uint8 => self.data::<u8>()?.iter().map(|&v| v as i64).collect(),
            DataType::Uint16 => self.data::<u16>()?.iter().map(|&v| v as i64).collect(),
            DataType::Uint32 => self.data::<u32>()?.iter().map(|&v| v as i64).collect(),
            DataType::Uint64 => self.data::<u64>()?.iter().map(|&v| v as i64).collect(),
            other => {
                return Err(Error::TypeMismatch {
                    name: self.name(),
                    expected: "integer data type".into(),
                    actual: other.to_string(),
                })
            }
        };
        Ok(values)
    }

    /// First component as an integer, for `all`-associated scalars.
    pub fn scalar_integer(&self) -> Result<Option<i64>> {
        Ok(self.to_integers()?.first().copied())
    }

    pub fn check_arity(&self, arity: u32) -> Option<&Attribute> {
        (self.descriptor.data_arity == arity).then_some(self)
    }

    pub fn check_association(&self, association: &Association) -> Option<&Attribute> {
        (&self.descriptor.association == association).then_some(self)
    }

    /// `Some(self)` only when both arity and association match.
    pub fn check_arity_and_association(
        &self,
        arity: u32,
        association: &Association,
    ) -> Option<&Attribute> {
        self.check_arity(arity)?.check_association(association)
    }

    /// New attribute whose element `i` is element `remap[i]` of this one.
    pub fn remap(&self, remap: &[usize]) -> Result<Self> {
        let size = self.descriptor.data_element_size();
        let count = self.element_count();
        let src = self.bytes();
        let mut buf = AlignedBuffer::zeroed(remap.len() * size);
        let dst = buf.as_bytes_mut();
        for (i, &from) in remap.iter().enumerate() {
            if from >= count {
                return Err(Error::IndexOutOfRange {
                    name: self.name(),
                    position: i,
                    value: from as i64,
                    max: count as i64 - 1,
                });
            }
            dst[i * size..(i + 1) * size].copy_from_slice(&src[from * size..(from + 1) * size]);
        }
        Self::new(self.descriptor.clone(), buf)
    }

    /// Same bytes under a different descriptor of equal element size.
    pub fn with_descriptor(self, descriptor: AttributeDescriptor) -> Result<Self> {
        Self::new(descriptor, self.data)
    }
}

fn check_type<T: G3dPod>(desc: &AttributeDescriptor) -> Result<()> {
    let layout_ok = T::DATA_TYPE.is_layout_compatible(desc.data_type);
    let arity_ok = T::ARITY == 1 || T::ARITY == desc.data_arity as usize;
    if layout_ok && arity_ok {
        return Ok(());
    }
    Err(Error::TypeMismatch {
        name: desc.to_string(),
        expected: format!("{} x{}", desc.data_type, desc.data_arity),
        actual: format!("{} x{}", T::DATA_TYPE, T::ARITY),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::common;
    use crate::util::{Vec3, Vec4};

    #[test]
    fn test_size_mismatch() {
        let err = Attribute::from_bytes(common::position(), &[0u8; 13]).unwrap_err();
        assert!(matches!(err, Error::SizeMismatch { byte_len: 13, element_size: 12, .. }));

        let attr = Attribute::from_bytes(common::position(), &[0u8; 24]).unwrap();
        assert_eq!(attr.element_count(), 2);
        assert_eq!(attr.element_count() * attr.descriptor().data_element_size(), attr.byte_len());
    }

    #[test]
    fn test_unknown_type_rejected() {
        let (desc, _) = AttributeDescriptor::parse("g3d:instance:beep:0:UNKNOWN:1");
        assert!(Attribute::from_bytes(desc, &[]).is_err());
    }

    #[test]
    fn test_signed_unsigned_aliasing() {
        let attr = Attribute::from_data(common::index(), &[0i32, 1, 2]).unwrap();
        assert_eq!(attr.data::<u32>().unwrap(), &[0u32, 1, 2]);
        assert!(attr.as_type::<f32>().is_err());
        assert!(attr.as_type::<i64>().is_err());
        assert!(attr.as_type::<i16>().is_err());
    }

    #[test]
    fn test_arity_checked_for_vectors() {
        let attr = Attribute::from_data(common::position(), &[Vec3::ONE]).unwrap();
        assert!(attr.as_type::<Vec4>().is_err());
        assert!(Attribute::from_data(common::position(), &[Vec4::ONE]).is_err());
    }

    #[test]
    fn test_check_arity_and_association() {
        let attr = Attribute::from_data(common::position(), &[Vec3::ONE]).unwrap();
        assert!(attr.check_arity_and_association(3, &Association::Vertex).is_some());
        assert!(attr.check_arity_and_association(2, &Association::Vertex).is_none());
        assert!(attr.check_arity_and_association(3, &Association::Face).is_none());
    }

    #[test]
    fn test_default_attribute() {
        let attr = Attribute::default_attribute(common::instance_transform(), 3).unwrap();
        assert_eq!(attr.element_count(), 3);
        assert_eq!(attr.byte_len(), 3 * 64);
        assert!(attr.bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_integers_round_trip() {
        let attr = Attribute::from_integers(common::index(), &[-1, 0, 7]).unwrap();
        assert_eq!(attr.data::<i32>().unwrap(), &[-1, 0, 7]);
        assert_eq!(attr.to_integers().unwrap(), vec![-1, 0, 7]);
        assert!(Attribute::from_integers(common::position(), &[1]).is_err());
    }

    #[test]
    fn test_integers_out_of_range() {
        let (u8_desc, _) = AttributeDescriptor::parse("g3d:face:size:0:uint8:1");
        assert!(Attribute::from_integers(u8_desc.clone(), &[-128, 255]).is_ok());
        assert!(Attribute::from_integers(u8_desc.clone(), &[256]).is_err());
        assert!(Attribute::from_integers(u8_desc, &[-129]).is_err());
        assert!(Attribute::from_integers(common::index(), &[1 << 32]).is_err());
    }

    #[test]
    fn test_concat_and_remap() {
        let a = Attribute::from_data(common::index(), &[1i32, 2]).unwrap();
        let b = Attribute::from_data(common::index(), &[3i32]).unwrap();
        let c = Attribute::concat(common::index(), [&a, &b]).unwrap();
        assert_eq!(c.data::<i32>().unwrap(), &[1, 2, 3]);

        let r = c.remap(&[2, 0, 0]).unwrap();
        assert_eq!(r.data::<i32>().unwrap(), &[3, 1, 1]);
        assert!(c.remap(&[3]).is_err());
    }
}

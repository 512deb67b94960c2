//! Element types that can back a typed attribute view.

use bytemuck::{Pod, Zeroable};

use super::data_type::DataType;
use super::math::{
    DMat4, DVec2, DVec3, DVec4, IVec2, IVec3, IVec4, Mat3, Mat4, UVec2, UVec3, UVec4, Vec2, Vec3,
    Vec4,
};

/// Trait for types that can be viewed over G3D attribute bytes.
///
/// `DATA_TYPE` is the component type and `ARITY` the number of components
/// packed into one value of `Self`. Scalars have arity 1 and can view an
/// attribute of any arity as a flat component slice; vector and matrix types
/// require the descriptor arity to match exactly.
pub trait G3dPod: Pod + Zeroable + Copy + Default + 'static {
    /// Component type.
    const DATA_TYPE: DataType;

    /// Components per value.
    const ARITY: usize = 1;

    /// Size of this type in bytes.
    const SIZE: usize = std::mem::size_of::<Self>();
}

impl G3dPod for i8 {
    const DATA_TYPE: DataType = DataType::Int8;
}

impl G3dPod for i16 {
    const DATA_TYPE: DataType = DataType::Int16;
}

impl G3dPod for i32 {
    const DATA_TYPE: DataType = DataType::Int32;
}

impl G3dPod for i64 {
    const DATA_TYPE: DataType = DataType::Int64;
}

impl G3dPod for u8 {
    const DATA_TYPE: DataType = DataType::Uint8;
}

impl G3dPod for u16 {
    const DATA_TYPE: DataType = DataType::Uint16;
}

impl G3dPod for u32 {
    const DATA_TYPE: DataType = DataType::Uint32;
}

impl G3dPod for u64 {
    const DATA_TYPE: DataType = DataType::Uint64;
}

impl G3dPod for f32 {
    const DATA_TYPE: DataType = DataType::Float32;
}

impl G3dPod for f64 {
    const DATA_TYPE: DataType = DataType::Float64;
}

macro_rules! impl_glam_pod {
    ($($ty:ty => $dt:ident, $arity:expr;)*) => {
        $(
            impl G3dPod for $ty {
                const DATA_TYPE: DataType = DataType::$dt;
                const ARITY: usize = $arity;
            }
        )*
    };
}

impl_glam_pod! {
    Vec2 => Float32, 2;
    Vec3 => Float32, 3;
    Vec4 => Float32, 4;
    Mat3 => Float32, 9;
    Mat4 => Float32, 16;
    DVec2 => Float64, 2;
    DVec3 => Float64, 3;
    DVec4 => Float64, 4;
    DMat4 => Float64, 16;
    IVec2 => Int32, 2;
    IVec3 => Int32, 3;
    IVec4 => Int32, 4;
    UVec2 => Uint32, 2;
    UVec3 => Uint32, 3;
    UVec4 => Uint32, 4;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout_ok<T: G3dPod>() -> bool {
        T::SIZE == T::DATA_TYPE.num_bytes() * T::ARITY
    }

    #[test]
    fn test_sizes_match_component_layout() {
        assert!(layout_ok::<i8>());
        assert!(layout_ok::<u16>());
        assert!(layout_ok::<i32>());
        assert!(layout_ok::<f64>());
        assert!(layout_ok::<Vec2>());
        assert!(layout_ok::<Vec3>());
        assert!(layout_ok::<Vec4>());
        assert!(layout_ok::<Mat3>());
        assert!(layout_ok::<Mat4>());
        assert!(layout_ok::<DVec3>());
        assert!(layout_ok::<DMat4>());
        assert!(layout_ok::<IVec3>());
        assert!(layout_ok::<UVec4>());
    }

    #[test]
    fn test_arity() {
        assert_eq!(f32::ARITY, 1);
        assert_eq!(Vec3::ARITY, 3);
        assert_eq!(Mat4::ARITY, 16);
        assert_eq!(Mat4::DATA_TYPE, DataType::Float32);
    }
}

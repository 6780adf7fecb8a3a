//! Core voxel types.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Unique identifier for a voxel material.
///
/// Material ID 0 is reserved for empty space. Models imported from
/// palette-indexed grids use palette indices (1-255) as material IDs, so
/// palette-derived materials never collide with the empty code.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize,
)]
#[repr(transparent)]
pub struct MaterialId(pub u16);

impl MaterialId {
    /// Empty space (no voxel)
    pub const EMPTY: Self = Self(0);

    /// Returns true if this material marks empty space
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns true if this material marks a solid voxel
    #[inline]
    pub const fn is_solid(self) -> bool {
        self.0 != 0
    }
}

/// A single uncompressed voxel.
///
/// This is the transient editing representation; storage goes through the
/// packed codec in `duskvox-voxel`. Albedo is quantized to 8 bits per channel
/// at construction so that codec round-trips reproduce it exactly. The normal
/// is either unit length or exactly zero (unset).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Voxel {
    /// The material of this voxel
    pub material: MaterialId,
    /// Albedo color, 8 bits per channel
    pub albedo: [u8; 3],
    /// Surface normal, unit length or zero if not yet computed
    pub normal: Vec3,
}

impl Voxel {
    /// Empty voxel
    pub const EMPTY: Self = Self {
        material: MaterialId::EMPTY,
        albedo: [0; 3],
        normal: Vec3::ZERO,
    };

    /// Create a new voxel with the given material and albedo
    #[inline]
    pub const fn new(material: MaterialId, albedo: [u8; 3]) -> Self {
        Self {
            material,
            albedo,
            normal: Vec3::ZERO,
        }
    }

    /// Create a new voxel with a normalized-float albedo, quantizing each
    /// channel to 8 bits
    #[inline]
    pub fn with_albedo_vec3(material: MaterialId, albedo: Vec3) -> Self {
        Self::new(material, quantize_albedo(albedo))
    }

    /// Return a copy of this voxel carrying the given normal
    #[inline]
    pub const fn with_normal(mut self, normal: Vec3) -> Self {
        self.normal = normal;
        self
    }

    /// Albedo as a normalized-float color
    #[inline]
    pub fn albedo_vec3(&self) -> Vec3 {
        Vec3::new(
            f32::from(self.albedo[0]) / 255.0,
            f32::from(self.albedo[1]) / 255.0,
            f32::from(self.albedo[2]) / 255.0,
        )
    }

    /// Returns true if this voxel is empty
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.material.is_empty()
    }

    /// Returns true if this voxel is solid
    #[inline]
    pub const fn is_solid(&self) -> bool {
        self.material.is_solid()
    }
}

/// Quantize a normalized-float color to 8 bits per channel.
#[inline]
#[must_use]
pub fn quantize_albedo(albedo: Vec3) -> [u8; 3] {
    let c = albedo.clamp(Vec3::ZERO, Vec3::ONE) * 255.0;
    [
        c.x.round() as u8,
        c.y.round() as u8,
        c.z.round() as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_empty() {
        assert!(MaterialId::EMPTY.is_empty());
        assert!(!MaterialId::EMPTY.is_solid());
        assert!(MaterialId(1).is_solid());
        assert!(MaterialId(255).is_solid());
    }

    #[test]
    fn voxel_default_is_empty() {
        let voxel = Voxel::default();
        assert!(voxel.is_empty());
        assert_eq!(voxel, Voxel::EMPTY);
    }

    #[test]
    fn albedo_quantization_roundtrip() {
        let voxel = Voxel::with_albedo_vec3(MaterialId(3), Vec3::new(0.5, 0.25, 1.0));
        assert_eq!(voxel.albedo, [128, 64, 255]);
        let back = voxel.albedo_vec3();
        assert!((back.x - 0.5).abs() < 1.0 / 255.0);
        assert!((back.z - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn albedo_quantization_clamps() {
        let voxel = Voxel::with_albedo_vec3(MaterialId(1), Vec3::new(-0.5, 2.0, 0.0));
        assert_eq!(voxel.albedo, [0, 255, 0]);
    }
}

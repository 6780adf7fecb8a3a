//! Packed voxel encoding.
//!
//! A voxel compresses into two little-endian `u32` words (8 bytes) laid out
//! for direct GPU consumption:
//!
//! ```text
//! word0 (color):   albedo.r | albedo.g << 8 | albedo.b << 16 | flags << 24
//! word1 (surface): material | oct.u << 16   | oct.v << 24
//! ```
//!
//! Flag bit 0 marks a stored normal. Material and albedo round-trip exactly;
//! the normal is quantized with an 8+8-bit octahedral mapping whose
//! worst-case angular error stays below 1.5 degrees (typically around 0.5).
//! The all-zero pattern is the unique empty encoding: material code 0 is
//! reserved, so no solid voxel can collide with it.
//!
//! Encode and decode are pure, total, and allocation-free. Decoding always
//! yields an exactly unit-length normal, or exact zero when no normal was
//! stored.

use bytemuck::{Pod, Zeroable};
use duskvox_core::types::{MaterialId, Voxel};
use glam::Vec3;

/// Flag bit marking a stored surface normal.
const FLAG_HAS_NORMAL: u32 = 1;

/// A voxel in its packed storage form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct PackedVoxel {
    /// Albedo (8:8:8) and flags (8)
    pub color: u32,
    /// Material code (16) and octahedral normal (8:8)
    pub surface: u32,
}

impl PackedVoxel {
    /// The reserved empty encoding
    pub const EMPTY: Self = Self {
        color: 0,
        surface: 0,
    };

    /// Material code stored in this record
    #[inline]
    pub const fn material(self) -> MaterialId {
        MaterialId((self.surface & 0xFFFF) as u16)
    }

    /// Returns true if this record encodes empty space
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.surface & 0xFFFF == 0
    }

    /// Returns true if this record encodes a solid voxel
    #[inline]
    pub const fn is_solid(self) -> bool {
        !self.is_empty()
    }
}

/// Pack a voxel into its storage form.
///
/// An empty voxel always packs to [`PackedVoxel::EMPTY`] regardless of its
/// albedo or normal fields.
#[inline]
#[must_use]
pub fn encode(voxel: &Voxel) -> PackedVoxel {
    if voxel.is_empty() {
        return PackedVoxel::EMPTY;
    }

    let [r, g, b] = voxel.albedo;
    let has_normal = voxel.normal != Vec3::ZERO;
    let flags = if has_normal { FLAG_HAS_NORMAL } else { 0 };
    let (u, v) = if has_normal {
        encode_octahedral(voxel.normal)
    } else {
        (0, 0)
    };

    PackedVoxel {
        color: u32::from(r) | u32::from(g) << 8 | u32::from(b) << 16 | flags << 24,
        surface: u32::from(voxel.material.0) | u32::from(u) << 16 | u32::from(v) << 24,
    }
}

/// Unpack a voxel from its storage form.
#[inline]
#[must_use]
pub fn decode(packed: PackedVoxel) -> Voxel {
    if packed.is_empty() {
        return Voxel::EMPTY;
    }

    let albedo = [
        (packed.color & 0xFF) as u8,
        (packed.color >> 8 & 0xFF) as u8,
        (packed.color >> 16 & 0xFF) as u8,
    ];
    let flags = packed.color >> 24;
    let normal = if flags & FLAG_HAS_NORMAL != 0 {
        decode_octahedral((packed.surface >> 16 & 0xFF) as u8, (packed.surface >> 24) as u8)
    } else {
        Vec3::ZERO
    };

    Voxel {
        material: packed.material(),
        albedo,
        normal,
    }
}

#[inline]
fn nonzero_sign(x: f32) -> f32 {
    if x >= 0.0 { 1.0 } else { -1.0 }
}

/// Map a unit vector onto the octahedron and quantize to 8 bits per axis.
#[inline]
fn encode_octahedral(n: Vec3) -> (u8, u8) {
    let inv = 1.0 / (n.x.abs() + n.y.abs() + n.z.abs());
    let mut u = n.x * inv;
    let mut v = n.y * inv;
    if n.z < 0.0 {
        // Fold the lower hemisphere over the diagonals.
        let folded_u = (1.0 - v.abs()) * nonzero_sign(u);
        let folded_v = (1.0 - u.abs()) * nonzero_sign(v);
        u = folded_u;
        v = folded_v;
    }
    (
        ((u * 0.5 + 0.5) * 255.0).round() as u8,
        ((v * 0.5 + 0.5) * 255.0).round() as u8,
    )
}

/// Reconstruct a unit vector from its quantized octahedral form.
#[inline]
fn decode_octahedral(qu: u8, qv: u8) -> Vec3 {
    let u = f32::from(qu) / 255.0 * 2.0 - 1.0;
    let v = f32::from(qv) / 255.0 * 2.0 - 1.0;
    let z = 1.0 - u.abs() - v.abs();
    let n = if z < 0.0 {
        Vec3::new(
            (1.0 - v.abs()) * nonzero_sign(u),
            (1.0 - u.abs()) * nonzero_sign(v),
            z,
        )
    } else {
        Vec3::new(u, v, z)
    };
    n.normalize()
}

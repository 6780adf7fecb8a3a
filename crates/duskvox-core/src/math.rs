//! Placement transforms and bounding-box math.

use glam::{Mat4, Quat, Vec3};

/// Axis-Aligned Bounding Box.
#[derive(Clone, Copy, Debug, Default)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max corners
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at origin with given half-extents
    #[inline]
    pub fn from_half_extents(half_extents: Vec3) -> Self {
        Self {
            min: -half_extents,
            max: half_extents,
        }
    }

    /// Get the center of the AABB
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the size of the AABB
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Get the half-extents of the AABB
    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        self.size() * 0.5
    }

    /// True if the box encloses no space on at least one axis
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y || self.min.z >= self.max.z
    }

    /// Check if a point is inside the AABB
    #[inline]
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Check if this AABB intersects another
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Expand AABB to include a point
    #[inline]
    pub fn expand_to_include(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Merge two AABBs
    #[inline]
    pub fn merge(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// The eight corners of the box
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }
}

/// Rigid placement of a shape in the volume: translation plus orientation.
///
/// Orientation is handled purely by transforming sample points into the
/// shape's local frame with [`ShapeTransform::inverse_matrix`]; distance
/// functions themselves stay axis-aligned.
#[derive(Clone, Copy, Debug)]
pub struct ShapeTransform {
    /// World-space position of the shape's local origin
    pub position: Vec3,
    /// World-space orientation
    pub orientation: Quat,
}

impl ShapeTransform {
    /// Identity placement at the origin
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
    };

    /// Create a placement from position and orientation
    #[inline]
    pub const fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Create an axis-aligned placement at the given position
    #[inline]
    pub const fn from_position(position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
        }
    }

    /// Local-to-world matrix
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position)
    }

    /// World-to-local matrix
    #[inline]
    pub fn inverse_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position).inverse()
    }

    /// World-space AABB of a local-space box under this placement.
    ///
    /// Transforms all eight corners and takes their bounds, so the result is
    /// conservative for any rotation.
    pub fn world_bounds(&self, local: &Aabb) -> Aabb {
        let matrix = self.matrix();
        let corners = local.corners();
        let first = matrix.transform_point3(corners[0]);
        let mut bounds = Aabb::new(first, first);
        for corner in &corners[1..] {
            bounds.expand_to_include(matrix.transform_point3(*corner));
        }
        bounds
    }
}

impl Default for ShapeTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_4;

    #[test]
    fn aabb_contains_point() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert!(aabb.contains_point(Vec3::splat(0.5)));
        assert!(aabb.contains_point(Vec3::ZERO));
        assert!(aabb.contains_point(Vec3::ONE));
        assert!(!aabb.contains_point(Vec3::new(2.0, 0.5, 0.5)));
    }

    #[test]
    fn aabb_degenerate() {
        assert!(Aabb::from_half_extents(Vec3::ZERO).is_degenerate());
        assert!(Aabb::from_half_extents(Vec3::new(1.0, 0.0, 1.0)).is_degenerate());
        assert!(!Aabb::from_half_extents(Vec3::ONE).is_degenerate());
    }

    #[test]
    fn identity_world_bounds() {
        let local = Aabb::from_half_extents(Vec3::splat(2.0));
        let bounds = ShapeTransform::IDENTITY.world_bounds(&local);
        assert_relative_eq!(bounds.min.x, -2.0);
        assert_relative_eq!(bounds.max.z, 2.0);
    }

    #[test]
    fn translated_world_bounds() {
        let local = Aabb::from_half_extents(Vec3::ONE);
        let transform = ShapeTransform::from_position(Vec3::new(10.0, 0.0, -3.0));
        let bounds = transform.world_bounds(&local);
        assert_relative_eq!(bounds.min.x, 9.0);
        assert_relative_eq!(bounds.max.x, 11.0);
        assert_relative_eq!(bounds.min.z, -4.0);
    }

    #[test]
    fn rotated_world_bounds_are_conservative() {
        // A unit cube rotated 45 degrees about Y spans sqrt(2) on X and Z.
        let local = Aabb::from_half_extents(Vec3::ONE);
        let transform =
            ShapeTransform::new(Vec3::ZERO, Quat::from_rotation_y(FRAC_PI_4));
        let bounds = transform.world_bounds(&local);
        let expected = 2.0_f32.sqrt();
        assert_relative_eq!(bounds.max.x, expected, epsilon = 1e-5);
        assert_relative_eq!(bounds.max.z, expected, epsilon = 1e-5);
        assert_relative_eq!(bounds.max.y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn inverse_matrix_roundtrip() {
        let transform = ShapeTransform::new(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_rotation_z(0.7),
        );
        let p = Vec3::new(-4.0, 0.5, 9.0);
        let local = transform.inverse_matrix().transform_point3(p);
        let back = transform.matrix().transform_point3(local);
        assert_relative_eq!(back.x, p.x, epsilon = 1e-5);
        assert_relative_eq!(back.y, p.y, epsilon = 1e-5);
        assert_relative_eq!(back.z, p.z, epsilon = 1e-5);
    }
}

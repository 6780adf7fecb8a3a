//! Analytic signed distance functions for the shape primitives.
//!
//! Every primitive is evaluated in its own local frame (centered at the
//! origin, axis-aligned); orientation is handled entirely by transforming
//! sample points with the placement's inverse matrix. Distances are negative
//! inside, positive outside.

use duskvox_core::math::Aabb;
use glam::{Vec2, Vec3, Vec3Swizzles};

/// A shape primitive described by its signed distance function.
#[derive(Clone, Copy, Debug)]
pub enum SdfShape {
    /// Sphere centered at the origin.
    Sphere { radius: f32 },
    /// Axis-aligned box centered at the origin.
    Box { half_extents: Vec3 },
    /// Box with uniformly rounded edges; total extent is
    /// `half_extents + radius` per axis.
    RoundedBox { half_extents: Vec3, radius: f32 },
    /// Torus around the local Y axis.
    Torus { major_radius: f32, minor_radius: f32 },
    /// Ellipsoid with the given semi-axes.
    Ellipsoid { radii: Vec3 },
    /// Capped cylinder along the local Y axis, centered at the origin.
    Cylinder { radius: f32, height: f32 },
    /// Cone with its base disc on the local XZ plane and its apex at
    /// `(0, height, 0)`.
    Cone { radius: f32, height: f32 },
}

impl SdfShape {
    /// Signed distance from a local-space point to the surface.
    #[must_use]
    pub fn distance(&self, p: Vec3) -> f32 {
        match *self {
            Self::Sphere { radius } => p.length() - radius,
            Self::Box { half_extents } => sd_box(p, half_extents),
            Self::RoundedBox {
                half_extents,
                radius,
            } => sd_box(p, half_extents) - radius,
            Self::Torus {
                major_radius,
                minor_radius,
            } => {
                let q = Vec2::new(p.xz().length() - major_radius, p.y);
                q.length() - minor_radius
            }
            Self::Ellipsoid { radii } => sd_ellipsoid(p, radii),
            Self::Cylinder { radius, height } => {
                let d = Vec2::new(p.xz().length(), p.y).abs() - Vec2::new(radius, height * 0.5);
                d.x.max(d.y).min(0.0) + d.max(Vec2::ZERO).length()
            }
            Self::Cone { radius, height } => {
                // Capped-cone form with the tip radius at zero, shifted so the
                // base sits on the local XZ plane.
                sd_capped_cone(p - Vec3::new(0.0, height * 0.5, 0.0), height * 0.5, radius, 0.0)
            }
        }
    }

    /// Central-difference gradient of the distance field at a local-space
    /// point. Not normalized; callers normalize (and guard the zero vector)
    /// themselves.
    #[must_use]
    pub fn gradient(&self, p: Vec3, eps: f32) -> Vec3 {
        let dx = Vec3::new(eps, 0.0, 0.0);
        let dy = Vec3::new(0.0, eps, 0.0);
        let dz = Vec3::new(0.0, 0.0, eps);
        Vec3::new(
            self.distance(p + dx) - self.distance(p - dx),
            self.distance(p + dy) - self.distance(p - dy),
            self.distance(p + dz) - self.distance(p - dz),
        )
    }

    /// Local-space bounding box of the surface.
    #[must_use]
    pub fn local_bounds(&self) -> Aabb {
        match *self {
            Self::Sphere { radius } => Aabb::from_half_extents(Vec3::splat(radius)),
            Self::Box { half_extents } => Aabb::from_half_extents(half_extents),
            Self::RoundedBox {
                half_extents,
                radius,
            } => Aabb::from_half_extents(half_extents + radius),
            Self::Torus {
                major_radius,
                minor_radius,
            } => Aabb::from_half_extents(Vec3::new(
                major_radius + minor_radius,
                minor_radius,
                major_radius + minor_radius,
            )),
            Self::Ellipsoid { radii } => Aabb::from_half_extents(radii),
            Self::Cylinder { radius, height } => {
                Aabb::from_half_extents(Vec3::new(radius, height * 0.5, radius))
            }
            Self::Cone { radius, height } => Aabb::new(
                Vec3::new(-radius, 0.0, -radius),
                Vec3::new(radius, height, radius),
            ),
        }
    }

    /// True if the shape encloses no space and must rasterize to zero voxels.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        match *self {
            Self::Sphere { radius } => radius <= 0.0,
            Self::Box { half_extents } | Self::Ellipsoid { radii: half_extents } => {
                half_extents.min_element() <= 0.0
            }
            Self::RoundedBox {
                half_extents,
                radius,
            } => half_extents.min_element() + radius <= 0.0 || radius < 0.0,
            Self::Torus {
                major_radius,
                minor_radius,
            } => major_radius <= 0.0 || minor_radius <= 0.0,
            Self::Cylinder { radius, height } | Self::Cone { radius, height } => {
                radius <= 0.0 || height <= 0.0
            }
        }
    }
}

fn sd_box(p: Vec3, half_extents: Vec3) -> f32 {
    let q = p.abs() - half_extents;
    q.max(Vec3::ZERO).length() + q.max_element().min(0.0)
}

fn sd_ellipsoid(p: Vec3, radii: Vec3) -> f32 {
    let k1 = (p / (radii * radii)).length();
    if k1 == 0.0 {
        // At the exact center the scaled form degenerates; the nearest
        // surface lies along the shortest semi-axis.
        return -radii.min_element();
    }
    let k0 = (p / radii).length();
    k0 * (k0 - 1.0) / k1
}

fn sd_capped_cone(p: Vec3, half_height: f32, r1: f32, r2: f32) -> f32 {
    let q = Vec2::new(p.xz().length(), p.y);
    let k1 = Vec2::new(r2, half_height);
    let k2 = Vec2::new(r2 - r1, 2.0 * half_height);
    let ca = Vec2::new(
        q.x - q.x.min(if q.y < 0.0 { r1 } else { r2 }),
        q.y.abs() - half_height,
    );
    let cb = q - k1 + k2 * ((k1 - q).dot(k2) / k2.length_squared()).clamp(0.0, 1.0);
    let s = if cb.x < 0.0 && ca.y < 0.0 { -1.0 } else { 1.0 };
    s * ca.length_squared().min(cb.length_squared()).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sphere_distance() {
        let shape = SdfShape::Sphere { radius: 2.0 };
        assert_relative_eq!(shape.distance(Vec3::ZERO), -2.0);
        assert_relative_eq!(shape.distance(Vec3::new(2.0, 0.0, 0.0)), 0.0);
        assert_relative_eq!(shape.distance(Vec3::new(5.0, 0.0, 0.0)), 3.0);
    }

    #[test]
    fn box_distance() {
        let shape = SdfShape::Box {
            half_extents: Vec3::new(1.0, 2.0, 3.0),
        };
        assert!(shape.distance(Vec3::ZERO) < 0.0);
        assert_relative_eq!(shape.distance(Vec3::new(1.0, 0.0, 0.0)), 0.0);
        assert_relative_eq!(shape.distance(Vec3::new(3.0, 0.0, 0.0)), 2.0);
        // Corner distance is the Euclidean distance to the corner point.
        assert_relative_eq!(
            shape.distance(Vec3::new(2.0, 3.0, 4.0)),
            3.0_f32.sqrt(),
            epsilon = 1e-6
        );
    }

    #[test]
    fn rounded_box_inflates() {
        let plain = SdfShape::Box {
            half_extents: Vec3::ONE,
        };
        let rounded = SdfShape::RoundedBox {
            half_extents: Vec3::ONE,
            radius: 0.5,
        };
        let p = Vec3::new(1.25, 0.0, 0.0);
        assert!(plain.distance(p) > 0.0);
        assert!(rounded.distance(p) < 0.0);
    }

    #[test]
    fn torus_has_a_hole() {
        let shape = SdfShape::Torus {
            major_radius: 4.0,
            minor_radius: 1.0,
        };
        // Center of the hole is outside the surface.
        assert!(shape.distance(Vec3::ZERO) > 0.0);
        // A point on the ring circle is maximally inside.
        assert_relative_eq!(shape.distance(Vec3::new(4.0, 0.0, 0.0)), -1.0);
    }

    #[test]
    fn ellipsoid_distance_signs() {
        let shape = SdfShape::Ellipsoid {
            radii: Vec3::new(3.0, 1.0, 2.0),
        };
        assert!(shape.distance(Vec3::ZERO) < 0.0);
        assert!(shape.distance(Vec3::new(0.0, 2.0, 0.0)) > 0.0);
        assert_relative_eq!(shape.distance(Vec3::new(3.0, 0.0, 0.0)), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn ellipsoid_center_is_finite() {
        let shape = SdfShape::Ellipsoid {
            radii: Vec3::new(2.0, 1.0, 3.0),
        };
        let d = shape.distance(Vec3::ZERO);
        assert!(d.is_finite());
        assert_relative_eq!(d, -1.0);
    }

    #[test]
    fn cylinder_caps() {
        let shape = SdfShape::Cylinder {
            radius: 1.0,
            height: 4.0,
        };
        assert!(shape.distance(Vec3::new(0.0, 1.9, 0.0)) < 0.0);
        assert!(shape.distance(Vec3::new(0.0, 2.1, 0.0)) > 0.0);
        assert!(shape.distance(Vec3::new(1.1, 0.0, 0.0)) > 0.0);
    }

    #[test]
    fn cone_narrows_toward_apex() {
        let shape = SdfShape::Cone {
            radius: 2.0,
            height: 4.0,
        };
        // Wide near the base, empty at the same offset near the apex.
        assert!(shape.distance(Vec3::new(1.5, 0.5, 0.0)) < 0.0);
        assert!(shape.distance(Vec3::new(1.5, 3.5, 0.0)) > 0.0);
        // On the axis, inside along the full height.
        assert!(shape.distance(Vec3::new(0.0, 0.5, 0.0)) < 0.0);
        assert!(shape.distance(Vec3::new(0.0, 3.5, 0.0)) < 0.0);
        assert!(shape.distance(Vec3::new(0.0, 4.5, 0.0)) > 0.0);
    }

    #[test]
    fn gradient_points_outward() {
        let shape = SdfShape::Sphere { radius: 3.0 };
        let g = shape.gradient(Vec3::new(2.0, 0.0, 0.0), 0.5).normalize();
        assert_relative_eq!(g.x, 1.0, epsilon = 1e-4);
        assert!(g.y.abs() < 1e-4);
    }

    #[test]
    fn degenerate_shapes() {
        assert!(SdfShape::Sphere { radius: 0.0 }.is_degenerate());
        assert!(SdfShape::Sphere { radius: -1.0 }.is_degenerate());
        assert!(SdfShape::Box {
            half_extents: Vec3::new(1.0, 0.0, 1.0)
        }
        .is_degenerate());
        assert!(SdfShape::Torus {
            major_radius: 2.0,
            minor_radius: 0.0
        }
        .is_degenerate());
        assert!(SdfShape::Cylinder {
            radius: 1.0,
            height: 0.0
        }
        .is_degenerate());
        assert!(SdfShape::Cone {
            radius: 0.0,
            height: 3.0
        }
        .is_degenerate());
        assert!(!SdfShape::Sphere { radius: 0.5 }.is_degenerate());
    }

    #[test]
    fn cone_bounds_anchor_at_base() {
        let shape = SdfShape::Cone {
            radius: 2.0,
            height: 5.0,
        };
        let bounds = shape.local_bounds();
        assert_relative_eq!(bounds.min.y, 0.0);
        assert_relative_eq!(bounds.max.y, 5.0);
        assert_relative_eq!(bounds.max.x, 2.0);
    }
}

//! Shape rasterization into a sparse volume.
//!
//! The rasterizer scans the conservative world-space bound of a placed shape,
//! samples the distance field at every voxel center (transformed into the
//! shape's local frame), and writes surviving voxels through the volume
//! store. A distance of exactly zero counts as inside, so surfaces are
//! closed. Normals come from the central-difference gradient of the distance
//! field, rotated back into world space.
//!
//! Writing a shape with an empty template voxel removes instead: targeted
//! voxels are cleared, and with `flip_normals` set the six face-adjacent
//! neighbors of each cleared voxel get their normals re-derived from their
//! own open directions.

use glam::{Mat4, Quat, Vec3};
use tracing::debug;

use duskvox_core::coords::VoxelPos;
use duskvox_core::math::{Aabb, ShapeTransform};
use duskvox_core::types::Voxel;
use duskvox_core::Result;
use duskvox_voxel::codec::PackedVoxel;
use duskvox_voxel::Volume;

use crate::sdf::SdfShape;

/// Finite-difference step for normal estimation, in voxel units.
const NORMAL_EPS: f32 = 0.5;

/// Per-voxel context handed to a transform callback.
///
/// The callback decides the voxel actually written, enabling per-voxel
/// procedural variation (noise, gradients, material banding). User context
/// travels in the closure's captures.
pub struct ShapeSample<'a> {
    /// World-space center of the voxel being placed
    pub position: Vec3,
    /// Estimated surface normal at this voxel
    pub normal: Vec3,
    /// The template voxel passed to the rasterizer
    pub voxel: Voxel,
    /// The shape's local-space bounding box
    pub bounds: Aabb,
    /// World-to-local matrix of the shape's placement
    pub inv_transform: &'a Mat4,
}

/// Rasterize a shape into the volume.
///
/// If `template` is empty this is a removal: covered voxels are cleared, and
/// with `flip_normals` the neighbors of each cleared voxel are repaired.
/// Degenerate shape parameters produce zero voxels, silently.
pub fn rasterize(
    volume: &mut Volume,
    template: &Voxel,
    flip_normals: bool,
    shape: &SdfShape,
    transform: &ShapeTransform,
) -> Result<()> {
    rasterize_impl(volume, template, flip_normals, shape, transform, None)
}

/// Rasterize a shape, passing every surviving voxel through a transform
/// callback that decides what is actually written.
pub fn rasterize_with<F>(
    volume: &mut Volume,
    template: &Voxel,
    flip_normals: bool,
    shape: &SdfShape,
    transform: &ShapeTransform,
    mut transform_fn: F,
) -> Result<()>
where
    F: FnMut(&ShapeSample<'_>) -> Voxel,
{
    rasterize_impl(
        volume,
        template,
        flip_normals,
        shape,
        transform,
        Some(&mut transform_fn),
    )
}

fn rasterize_impl(
    volume: &mut Volume,
    template: &Voxel,
    flip_normals: bool,
    shape: &SdfShape,
    transform: &ShapeTransform,
    mut transform_fn: Option<&mut dyn FnMut(&ShapeSample<'_>) -> Voxel>,
) -> Result<()> {
    if shape.is_degenerate() {
        return Ok(());
    }

    let bounds = shape.local_bounds();
    let world = transform.world_bounds(&bounds);
    // One-voxel outward margin so surface cells cannot be clipped by
    // floor/ceil rounding.
    let min = VoxelPos::new(
        world.min.x.floor() as i32 - 1,
        world.min.y.floor() as i32 - 1,
        world.min.z.floor() as i32 - 1,
    );
    let max = VoxelPos::new(
        world.max.x.ceil() as i32 + 1,
        world.max.y.ceil() as i32 + 1,
        world.max.z.ceil() as i32 + 1,
    );

    let inv = transform.inverse_matrix();
    let removing = template.is_empty();
    let mut placed = 0_u64;
    let mut cleared = Vec::new();

    for z in min.z..=max.z {
        for y in min.y..=max.y {
            for x in min.x..=max.x {
                let pos = VoxelPos::new(x, y, z);
                let local = inv.transform_point3(pos.center());
                if shape.distance(local) > 0.0 {
                    continue;
                }

                if removing {
                    if volume.get_packed(pos).is_solid() {
                        volume.set_packed(pos, PackedVoxel::EMPTY)?;
                        cleared.push(pos);
                    }
                    continue;
                }

                let normal = (transform.orientation * shape.gradient(local, NORMAL_EPS))
                    .normalize_or_zero();
                let voxel = match transform_fn.as_deref_mut() {
                    Some(f) => f(&ShapeSample {
                        position: pos.center(),
                        normal,
                        voxel: *template,
                        bounds,
                        inv_transform: &inv,
                    }),
                    None => template.with_normal(normal),
                };
                volume.set(pos, &voxel)?;
                placed += 1;
            }
        }
    }

    if removing && flip_normals {
        repair_neighbor_normals(volume, &cleared)?;
    }

    debug!(
        shape = ?shape,
        placed,
        removed = cleared.len(),
        "rasterized shape"
    );
    Ok(())
}

/// Re-derive the normals of voxels left exposed by a removal.
///
/// Only the six face-adjacent neighbors of each cleared voxel are touched.
/// Each surviving neighbor's normal becomes the normalized average of the
/// unit directions toward its own empty face-neighbors; if those directions
/// cancel out, the previous normal is kept. Results are always unit length.
fn repair_neighbor_normals(volume: &mut Volume, cleared: &[VoxelPos]) -> Result<()> {
    for &pos in cleared {
        for neighbor in pos.face_neighbors() {
            let voxel = volume.get(neighbor);
            if voxel.is_empty() {
                continue;
            }
            let open = open_direction(volume, neighbor);
            if open != Vec3::ZERO {
                volume.set(neighbor, &voxel.with_normal(open))?;
            }
        }
    }
    Ok(())
}

/// Normalized average of the unit directions from a voxel toward its empty
/// face-neighbors, or zero if they cancel.
fn open_direction(volume: &Volume, pos: VoxelPos) -> Vec3 {
    let mut sum = Vec3::ZERO;
    for neighbor in pos.face_neighbors() {
        if volume.get_packed(neighbor).is_empty() {
            sum += (neighbor.center() - pos.center()).normalize();
        }
    }
    sum.normalize_or_zero()
}

/// Place a sphere into the volume.
pub fn rasterize_sphere(
    volume: &mut Volume,
    voxel: &Voxel,
    flip_normals: bool,
    center: Vec3,
    radius: f32,
) -> Result<()> {
    rasterize(
        volume,
        voxel,
        flip_normals,
        &SdfShape::Sphere { radius },
        &ShapeTransform::from_position(center),
    )
}

/// Place a box into the volume. `half_extents` is the distance from the
/// center to each face.
pub fn rasterize_box(
    volume: &mut Volume,
    voxel: &Voxel,
    flip_normals: bool,
    center: Vec3,
    half_extents: Vec3,
    orientation: Quat,
) -> Result<()> {
    rasterize(
        volume,
        voxel,
        flip_normals,
        &SdfShape::Box { half_extents },
        &ShapeTransform::new(center, orientation),
    )
}

/// Place a rounded box into the volume.
pub fn rasterize_rounded_box(
    volume: &mut Volume,
    voxel: &Voxel,
    flip_normals: bool,
    center: Vec3,
    half_extents: Vec3,
    radius: f32,
    orientation: Quat,
) -> Result<()> {
    rasterize(
        volume,
        voxel,
        flip_normals,
        &SdfShape::RoundedBox {
            half_extents,
            radius,
        },
        &ShapeTransform::new(center, orientation),
    )
}

/// Place a torus into the volume.
pub fn rasterize_torus(
    volume: &mut Volume,
    voxel: &Voxel,
    flip_normals: bool,
    center: Vec3,
    major_radius: f32,
    minor_radius: f32,
    orientation: Quat,
) -> Result<()> {
    rasterize(
        volume,
        voxel,
        flip_normals,
        &SdfShape::Torus {
            major_radius,
            minor_radius,
        },
        &ShapeTransform::new(center, orientation),
    )
}

/// Place an ellipsoid into the volume. `radii` are the semi-axis lengths.
pub fn rasterize_ellipsoid(
    volume: &mut Volume,
    voxel: &Voxel,
    flip_normals: bool,
    center: Vec3,
    radii: Vec3,
    orientation: Quat,
) -> Result<()> {
    rasterize(
        volume,
        voxel,
        flip_normals,
        &SdfShape::Ellipsoid { radii },
        &ShapeTransform::new(center, orientation),
    )
}

/// Place a cylinder into the volume.
pub fn rasterize_cylinder(
    volume: &mut Volume,
    voxel: &Voxel,
    flip_normals: bool,
    center: Vec3,
    radius: f32,
    height: f32,
    orientation: Quat,
) -> Result<()> {
    rasterize(
        volume,
        voxel,
        flip_normals,
        &SdfShape::Cylinder { radius, height },
        &ShapeTransform::new(center, orientation),
    )
}

/// Place a cone into the volume. `base` is the center of the base disc; the
/// apex sits `height` above it along the oriented local Y axis.
pub fn rasterize_cone(
    volume: &mut Volume,
    voxel: &Voxel,
    flip_normals: bool,
    base: Vec3,
    radius: f32,
    height: f32,
    orientation: Quat,
) -> Result<()> {
    rasterize(
        volume,
        voxel,
        flip_normals,
        &SdfShape::Cone { radius, height },
        &ShapeTransform::new(base, orientation),
    )
}

//! Smoothed normal reconstruction for imported models.

use glam::Vec3;
use tracing::debug;

use duskvox_voxel::codec::{decode, encode};

use crate::model::VoxelModel;

/// Estimate a smoothed normal for every solid voxel in the model.
///
/// Palette-indexed containers store no surface orientation, so normals are
/// derived from local occupancy: each solid voxel's normal becomes the
/// normalized average of the unit directions toward every empty sample in
/// the cubical window of the given radius around it. Samples outside the
/// model's extent count as empty, so boundaries behave as open space.
///
/// A larger radius trades computation time for smoother normals. A voxel
/// whose open directions cancel (fully enclosed, or isolated with a
/// perfectly symmetric neighborhood) keeps the exact zero "unset" normal;
/// the result is always finite.
pub fn recalculate_normals(radius: i32, model: &mut VoxelModel) {
    let radius = radius.max(1);
    let size = model.size();

    let mut updates: Vec<(usize, Vec3)> = Vec::new();
    for z in 0..size.z {
        for y in 0..size.y {
            for x in 0..size.x {
                if model.get_packed(x, y, z).is_empty() {
                    continue;
                }
                let normal = open_direction(model, x as i32, y as i32, z as i32, radius);
                updates.push((model.index(x, y, z), normal));
            }
        }
    }

    let voxels = model.voxels_mut();
    for (index, normal) in updates {
        let voxel = decode(voxels[index]).with_normal(normal);
        voxels[index] = encode(&voxel);
    }

    debug!(radius, size = ?size, "recalculated model normals");
}

/// Normalized average of directions toward empty samples in the window.
fn open_direction(model: &VoxelModel, x: i32, y: i32, z: i32, radius: i32) -> Vec3 {
    let size = model.size();
    let mut sum = Vec3::ZERO;
    for dz in -radius..=radius {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx == 0 && dy == 0 && dz == 0 {
                    continue;
                }
                let (sx, sy, sz) = (x + dx, y + dy, z + dz);
                let empty = sx < 0
                    || sy < 0
                    || sz < 0
                    || sx >= size.x as i32
                    || sy >= size.y as i32
                    || sz >= size.z as i32
                    || model.get_packed(sx as u32, sy as u32, sz as u32).is_empty();
                if empty {
                    sum += Vec3::new(dx as f32, dy as f32, dz as f32).normalize();
                }
            }
        }
    }
    sum.normalize_or_zero()
}

//! Duskvox sandbox: builds a demo scene through the full content pipeline
//! (shape rasterization, model import, placement) and reports volume stats.

use anyhow::Result;
use glam::{Quat, UVec3, Vec3};
use std::f32::consts::FRAC_PI_4;
use std::sync::Arc;
use tracing::info;

use duskvox_core::coords::VoxelPos;
use duskvox_core::diagnostics::TracingSink;
use duskvox_core::math::ShapeTransform;
use duskvox_core::types::{MaterialId, Voxel};
use duskvox_model::{
    import_indexed_grid, place_model, recalculate_normals, IndexedGrid, MaterialSource,
};
use duskvox_shapes::{
    rasterize_box, rasterize_cone, rasterize_sphere, rasterize_torus, rasterize_with, SdfShape,
    ShapeSample,
};
use duskvox_voxel::Volume;

const GROUND: MaterialId = MaterialId(1);
const ROCK: MaterialId = MaterialId(2);
const METAL: MaterialId = MaterialId(3);

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    info!("Duskvox sandbox");

    let mut volume = Volume::with_diagnostics(Arc::new(TracingSink));

    // Ground slab.
    let grass = Voxel::new(GROUND, [86, 125, 70]);
    volume.fill_box(VoxelPos::new(-32, -4, -32), VoxelPos::new(32, -1, 32), &grass)?;

    // A few landmarks.
    let rock = Voxel::new(ROCK, [128, 128, 128]);
    rasterize_sphere(&mut volume, &rock, false, Vec3::new(0.0, 6.0, 0.0), 6.0)?;
    rasterize_torus(
        &mut volume,
        &Voxel::new(METAL, [180, 160, 60]),
        false,
        Vec3::new(0.0, 14.0, 0.0),
        8.0,
        1.5,
        Quat::from_rotation_x(FRAC_PI_4),
    )?;
    rasterize_cone(
        &mut volume,
        &rock,
        false,
        Vec3::new(18.0, 0.0, -10.0),
        5.0,
        12.0,
        Quat::IDENTITY,
    )?;
    rasterize_box(
        &mut volume,
        &Voxel::new(METAL, [90, 90, 110]),
        false,
        Vec3::new(-16.0, 3.0, 12.0),
        Vec3::new(4.0, 3.0, 4.0),
        Quat::from_rotation_y(FRAC_PI_4),
    )?;

    // Procedural banding through the transform callback.
    rasterize_with(
        &mut volume,
        &rock,
        false,
        &SdfShape::Sphere { radius: 4.0 },
        &ShapeTransform::from_position(Vec3::new(-18.0, 5.0, -14.0)),
        |sample: &ShapeSample<'_>| {
            let band = (sample.position.y as i32).rem_euclid(2) == 0;
            let albedo = if band { [150, 60, 60] } else { [60, 60, 150] };
            Voxel::new(ROCK, albedo).with_normal(sample.normal)
        },
    )?;

    // Carve a cavity out of the big sphere, repairing exposed normals.
    rasterize_sphere(
        &mut volume,
        &Voxel::EMPTY,
        true,
        Vec3::new(0.0, 8.0, 0.0),
        3.0,
    )?;

    // Import a small checkered banner and stamp it down twice.
    let banner = build_banner_grid();
    let mut model = import_indexed_grid(&banner, MaterialSource::PaletteIndex)?;
    recalculate_normals(1, &mut model);
    info!(
        size = ?model.size(),
        solid = model.solid_count(),
        "imported banner model"
    );
    place_model(&mut volume, &model, VoxelPos::new(8, 0, 14))?;
    place_model(&mut volume, &model, VoxelPos::new(-12, 0, -20))?;

    info!(
        chunks = volume.chunk_count(),
        solid = volume.solid_count(),
        dirty = volume.dirty_chunks().len(),
        memory_kib = volume.memory_usage() / 1024,
        "scene built"
    );
    Ok(())
}

/// An 8x6x1 checkered plate, the kind of grid a `.vox` reader hands over.
fn build_banner_grid() -> IndexedGrid {
    let size = UVec3::new(8, 6, 1);
    let mut palette = [[0; 4]; 256];
    palette[10] = [220, 220, 220, 255];
    palette[11] = [30, 30, 30, 255];

    let mut indices = Vec::with_capacity((size.x * size.y * size.z) as usize);
    for _z in 0..size.z {
        for y in 0..size.y {
            for x in 0..size.x {
                indices.push(if (x + y) % 2 == 0 { 10 } else { 11 });
            }
        }
    }
    IndexedGrid {
        size,
        indices,
        palette,
    }
}

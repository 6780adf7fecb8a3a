//! Merging models into a volume.

use tracing::debug;

use duskvox_core::coords::VoxelPos;
use duskvox_core::Result;
use duskvox_voxel::Volume;

use crate::model::VoxelModel;

/// Merge a model into the volume.
///
/// `position` is the minimum voxel coordinate the model touches. Every
/// non-empty model cell overwrites whatever was at its target coordinate,
/// with the compressed record (normals included) carried over untouched;
/// empty cells are skipped, so nothing is allocated for emptiness. Repeating
/// the same call yields the same volume state.
pub fn place_model(volume: &mut Volume, model: &VoxelModel, position: VoxelPos) -> Result<()> {
    for (cell, packed) in model.iter_solid() {
        let target = VoxelPos::new(
            position.x + cell.x as i32,
            position.y + cell.y as i32,
            position.z + cell.z as i32,
        );
        volume.set_packed(target, packed)?;
    }
    debug!(size = ?model.size(), ?position, "placed model");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::{import_indexed_grid, IndexedGrid, MaterialSource};
    use duskvox_core::types::MaterialId;
    use glam::UVec3;

    fn small_model() -> VoxelModel {
        let mut palette = [[0; 4]; 256];
        palette[5] = [9, 8, 7, 255];
        let grid = IndexedGrid {
            size: UVec3::new(2, 1, 2),
            indices: vec![5, 0, 0, 5],
            palette,
        };
        import_indexed_grid(&grid, MaterialSource::PaletteIndex).unwrap()
    }

    #[test]
    fn placement_translates_cells() {
        let mut volume = Volume::new();
        let model = small_model();
        place_model(&mut volume, &model, VoxelPos::new(10, -4, 7)).unwrap();

        assert!(volume.get(VoxelPos::new(10, -4, 7)).is_solid());
        assert!(volume.get(VoxelPos::new(11, -4, 8)).is_solid());
        assert!(volume.get(VoxelPos::new(11, -4, 7)).is_empty());
        assert_eq!(volume.solid_count(), 2);

        let placed = volume.get(VoxelPos::new(10, -4, 7));
        assert_eq!(placed.material, MaterialId(5));
        assert_eq!(placed.albedo, [9, 8, 7]);
    }

    #[test]
    fn placement_is_idempotent() {
        let mut volume = Volume::new();
        let model = small_model();
        let at = VoxelPos::new(0, 0, 0);

        place_model(&mut volume, &model, at).unwrap();
        let chunks = volume.chunk_count();
        let solids = volume.solid_count();

        place_model(&mut volume, &model, at).unwrap();
        assert_eq!(volume.chunk_count(), chunks);
        assert_eq!(volume.solid_count(), solids);
    }

    #[test]
    fn empty_cells_do_not_clear_the_volume() {
        let mut volume = Volume::new();
        let existing = duskvox_core::types::Voxel::new(MaterialId(1), [1, 1, 1]);
        // This coordinate corresponds to an empty model cell after offset.
        volume.set(VoxelPos::new(1, 0, 0), &existing).unwrap();

        place_model(&mut volume, &small_model(), VoxelPos::new(0, 0, 0)).unwrap();
        assert!(volume.get(VoxelPos::new(1, 0, 0)).is_solid());
    }

    #[test]
    fn placing_an_empty_model_allocates_nothing() {
        let mut volume = Volume::new();
        let grid = IndexedGrid {
            size: UVec3::new(4, 4, 4),
            indices: vec![0; 64],
            palette: [[0; 4]; 256],
        };
        let model = import_indexed_grid(&grid, MaterialSource::PaletteIndex).unwrap();
        place_model(&mut volume, &model, VoxelPos::new(0, 0, 0)).unwrap();
        assert_eq!(volume.chunk_count(), 0);
    }
}

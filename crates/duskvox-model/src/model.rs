//! Standalone compressed voxel model.

use glam::UVec3;

use duskvox_core::types::Voxel;
use duskvox_voxel::codec::{decode, PackedVoxel};

/// An axis-aligned block of packed voxels, dense row-major with x fastest.
///
/// Models are immutable after import except for the explicit normal
/// recalculation pass, and are exclusively owned; dropping one releases its
/// storage.
#[derive(Debug)]
pub struct VoxelModel {
    size: UVec3,
    voxels: Vec<PackedVoxel>,
}

impl VoxelModel {
    /// Build a model from its extent and packed payload.
    ///
    /// The payload length must equal the extent's volume.
    pub(crate) fn from_parts(size: UVec3, voxels: Vec<PackedVoxel>) -> Self {
        debug_assert_eq!(voxels.len(), (size.x * size.y * size.z) as usize);
        Self { size, voxels }
    }

    /// Extent in voxels per axis.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> UVec3 {
        self.size
    }

    /// Linear index of a cell, x fastest.
    #[inline]
    #[must_use]
    pub const fn index(&self, x: u32, y: u32, z: u32) -> usize {
        (x + y * self.size.x + z * self.size.x * self.size.y) as usize
    }

    /// Packed voxel at a cell; empty outside the extent.
    #[must_use]
    pub fn get_packed(&self, x: u32, y: u32, z: u32) -> PackedVoxel {
        if x >= self.size.x || y >= self.size.y || z >= self.size.z {
            return PackedVoxel::EMPTY;
        }
        self.voxels[self.index(x, y, z)]
    }

    /// Decoded voxel at a cell; empty outside the extent.
    #[must_use]
    pub fn get(&self, x: u32, y: u32, z: u32) -> Voxel {
        decode(self.get_packed(x, y, z))
    }

    /// Number of solid voxels in the model.
    #[must_use]
    pub fn solid_count(&self) -> usize {
        self.voxels.iter().filter(|v| v.is_solid()).count()
    }

    /// Iterate over all solid cells and their packed records.
    pub fn iter_solid(&self) -> impl Iterator<Item = (UVec3, PackedVoxel)> + '_ {
        let size = self.size;
        self.voxels.iter().enumerate().filter_map(move |(i, &packed)| {
            packed.is_solid().then(|| {
                let i = i as u32;
                let x = i % size.x;
                let y = i / size.x % size.y;
                let z = i / (size.x * size.y);
                (UVec3::new(x, y, z), packed)
            })
        })
    }

    /// Mutable access to the packed payload, for the normal pass.
    pub(crate) fn voxels_mut(&mut self) -> &mut [PackedVoxel] {
        &mut self.voxels
    }

    /// Get memory usage in bytes.
    #[must_use]
    pub fn memory_usage(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.voxels.capacity() * std::mem::size_of::<PackedVoxel>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duskvox_core::types::MaterialId;
    use duskvox_voxel::codec::encode;

    fn model_2x2x1() -> VoxelModel {
        let solid = encode(&Voxel::new(MaterialId(1), [10, 20, 30]));
        VoxelModel::from_parts(
            UVec3::new(2, 2, 1),
            vec![solid, PackedVoxel::EMPTY, PackedVoxel::EMPTY, solid],
        )
    }

    #[test]
    fn indexing_is_x_fastest() {
        let model = model_2x2x1();
        assert_eq!(model.index(1, 0, 0), 1);
        assert_eq!(model.index(0, 1, 0), 2);
        assert!(model.get(0, 0, 0).is_solid());
        assert!(model.get(1, 0, 0).is_empty());
        assert!(model.get(1, 1, 0).is_solid());
    }

    #[test]
    fn out_of_bounds_reads_empty() {
        let model = model_2x2x1();
        assert!(model.get(5, 0, 0).is_empty());
        assert!(model.get(0, 0, 1).is_empty());
    }

    #[test]
    fn solid_iteration() {
        let model = model_2x2x1();
        assert_eq!(model.solid_count(), 2);
        let cells: Vec<_> = model.iter_solid().map(|(c, _)| c).collect();
        assert_eq!(cells, vec![UVec3::new(0, 0, 0), UVec3::new(1, 1, 0)]);
    }
}

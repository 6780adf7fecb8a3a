//! Chunk data structure for sparse volume storage.

use duskvox_core::constants::CHUNK_SIZE_CUBED;
use duskvox_core::coords::LocalPos;
use duskvox_core::Result;

use crate::codec::PackedVoxel;

/// A single chunk of packed voxel data (16x16x16 voxels).
///
/// Chunks are allocated lazily on the first solid write and are never freed
/// implicitly when they empty out again; the map entry stays so repeated
/// edit/undo cycles do not churn the allocator.
pub struct Chunk {
    /// Dense packed voxel payload, `CHUNK_SIZE_CUBED` entries.
    voxels: Vec<PackedVoxel>,
    /// Number of solid voxels currently stored.
    solid_count: u32,
    /// Local bounds of everything ever written solid, for upload culling.
    /// Conservative: cleared voxels do not shrink them.
    occupied_min: LocalPos,
    occupied_max: LocalPos,
    /// Whether the chunk needs GPU re-upload.
    dirty: bool,
}

impl Chunk {
    /// Allocate a new all-empty chunk.
    ///
    /// The payload is grown through `try_reserve_exact` so an allocation
    /// failure surfaces as [`duskvox_core::Error::Allocation`] instead of
    /// aborting, leaving the volume untouched.
    pub fn new() -> Result<Self> {
        let mut voxels = Vec::new();
        voxels.try_reserve_exact(CHUNK_SIZE_CUBED)?;
        voxels.resize(CHUNK_SIZE_CUBED, PackedVoxel::EMPTY);
        Ok(Self {
            voxels,
            solid_count: 0,
            occupied_min: LocalPos::new(0, 0, 0),
            occupied_max: LocalPos::new(0, 0, 0),
            dirty: true,
        })
    }

    /// Get the packed voxel at a local position.
    #[inline]
    pub fn get(&self, local: LocalPos) -> PackedVoxel {
        self.voxels[local.to_index()]
    }

    /// Store a packed voxel at a local position, maintaining the solid count
    /// and occupancy bounds. Marks the chunk dirty.
    pub fn set(&mut self, local: LocalPos, packed: PackedVoxel) {
        let slot = &mut self.voxels[local.to_index()];
        let was_solid = slot.is_solid();
        let is_solid = packed.is_solid();
        *slot = packed;

        match (was_solid, is_solid) {
            (false, true) => {
                if self.solid_count == 0 {
                    self.occupied_min = local;
                    self.occupied_max = local;
                } else {
                    self.occupied_min = LocalPos::new(
                        self.occupied_min.x.min(local.x),
                        self.occupied_min.y.min(local.y),
                        self.occupied_min.z.min(local.z),
                    );
                    self.occupied_max = LocalPos::new(
                        self.occupied_max.x.max(local.x),
                        self.occupied_max.y.max(local.y),
                        self.occupied_max.z.max(local.z),
                    );
                }
                self.solid_count += 1;
            }
            (true, false) => self.solid_count -= 1,
            _ => {}
        }
        self.dirty = true;
    }

    /// Number of solid voxels in the chunk.
    #[inline]
    pub const fn solid_count(&self) -> u32 {
        self.solid_count
    }

    /// Check if the chunk holds no solid voxels.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.solid_count == 0
    }

    /// Conservative local bounds of the solid region, if any.
    pub fn occupied_bounds(&self) -> Option<(LocalPos, LocalPos)> {
        (self.solid_count > 0).then_some((self.occupied_min, self.occupied_max))
    }

    /// Whether the chunk needs GPU re-upload.
    #[inline]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag once the uploader has consumed the chunk.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Raw packed payload for GPU upload.
    pub fn packed_voxels(&self) -> &[PackedVoxel] {
        &self.voxels
    }

    /// Get memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        std::mem::size_of::<Self>() + self.voxels.capacity() * std::mem::size_of::<PackedVoxel>()
    }
}

//! Sparse voxel volume backed by lazily allocated chunks.

use std::sync::Arc;

use hashbrown::HashMap;
use tracing::trace;

use duskvox_core::coords::{ChunkPos, VoxelPos};
use duskvox_core::diagnostics::{Category, DiagnosticsSink, NullSink, Severity};
use duskvox_core::types::Voxel;
use duskvox_core::Result;

use crate::chunk::Chunk;
use crate::codec::{decode, encode, PackedVoxel};

/// A sparse 3D voxel volume addressed by signed integer coordinates.
///
/// Chunks are allocated on the first solid write; an absent chunk reads as
/// all-empty. The volume has no global bound beyond what storage allows.
///
/// The volume performs no internal locking: rasterization, placement, and
/// reads are expected to run on the thread that owns it, and a renderer
/// consuming [`Volume::dirty_chunks`] must be serialized externally.
pub struct Volume {
    chunks: HashMap<ChunkPos, Chunk>,
    diagnostics: Arc<dyn DiagnosticsSink + Send + Sync>,
}

impl Volume {
    /// Create an empty volume with the default (no-op) diagnostics sink.
    #[must_use]
    pub fn new() -> Self {
        Self::with_diagnostics(Arc::new(NullSink))
    }

    /// Create an empty volume reporting through the given sink.
    #[must_use]
    pub fn with_diagnostics(diagnostics: Arc<dyn DiagnosticsSink + Send + Sync>) -> Self {
        Self {
            chunks: HashMap::new(),
            diagnostics,
        }
    }

    /// Get the voxel at a position.
    ///
    /// Returns the empty voxel for any coordinate outside allocated chunks;
    /// reading never allocates.
    #[must_use]
    pub fn get(&self, pos: VoxelPos) -> Voxel {
        decode(self.get_packed(pos))
    }

    /// Get the packed voxel at a position without decoding.
    #[must_use]
    pub fn get_packed(&self, pos: VoxelPos) -> PackedVoxel {
        let (chunk_pos, local) = pos.split();
        self.chunks
            .get(&chunk_pos)
            .map_or(PackedVoxel::EMPTY, |chunk| chunk.get(local))
    }

    /// Set the voxel at a position, encoding it through the codec.
    ///
    /// Allocates the owning chunk on the first solid write. Writing an empty
    /// voxel where no chunk exists is a no-op; nothing is allocated purely to
    /// store emptiness. Successful writes mark the chunk dirty.
    pub fn set(&mut self, pos: VoxelPos, voxel: &Voxel) -> Result<()> {
        self.set_packed(pos, encode(voxel))
    }

    /// Set an already-packed voxel at a position.
    ///
    /// Same allocation and dirty-marking behavior as [`Volume::set`]; used by
    /// the model placer to merge compressed records without a decode step.
    pub fn set_packed(&mut self, pos: VoxelPos, packed: PackedVoxel) -> Result<()> {
        let (chunk_pos, local) = pos.split();

        if let Some(chunk) = self.chunks.get_mut(&chunk_pos) {
            chunk.set(local, packed);
            return Ok(());
        }
        if packed.is_empty() {
            // Clearing space that is already empty allocates nothing.
            return Ok(());
        }

        let mut chunk = match Chunk::new() {
            Ok(chunk) => chunk,
            Err(err) => {
                self.diagnostics.report(
                    Category::CpuMemory,
                    Severity::Error,
                    &format!("failed to allocate chunk at {chunk_pos:?}: {err}"),
                );
                return Err(err);
            }
        };
        trace!(?chunk_pos, "allocated chunk");
        chunk.set(local, packed);
        self.chunks.insert(chunk_pos, chunk);
        Ok(())
    }

    /// Fill an inclusive voxel range with copies of a voxel.
    ///
    /// Filling with the empty voxel clears the range.
    pub fn fill_box(&mut self, min: VoxelPos, max: VoxelPos, voxel: &Voxel) -> Result<()> {
        let packed = encode(voxel);
        for z in min.z..=max.z {
            for y in min.y..=max.y {
                for x in min.x..=max.x {
                    self.set_packed(VoxelPos::new(x, y, z), packed)?;
                }
            }
        }
        Ok(())
    }

    /// Iterate over all solid voxels in an inclusive coordinate range.
    pub fn solid_in_range(
        &self,
        min: VoxelPos,
        max: VoxelPos,
    ) -> impl Iterator<Item = (VoxelPos, Voxel)> + '_ {
        let (x0, x1) = (min.x, max.x);
        let (y0, y1) = (min.y, max.y);
        (min.z..=max.z).flat_map(move |z| {
            (y0..=y1).flat_map(move |y| {
                (x0..=x1).filter_map(move |x| {
                    let pos = VoxelPos::new(x, y, z);
                    let packed = self.get_packed(pos);
                    packed.is_solid().then(|| (pos, decode(packed)))
                })
            })
        })
    }

    /// Check if a chunk exists at the given chunk position.
    #[must_use]
    pub fn contains_chunk(&self, pos: ChunkPos) -> bool {
        self.chunks.contains_key(&pos)
    }

    /// Access a chunk's payload and metadata, e.g. for GPU upload.
    #[must_use]
    pub fn chunk(&self, pos: ChunkPos) -> Option<&Chunk> {
        self.chunks.get(&pos)
    }

    /// Number of allocated chunks.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Total number of solid voxels in the volume.
    #[must_use]
    pub fn solid_count(&self) -> u64 {
        self.chunks.values().map(|c| u64::from(c.solid_count())).sum()
    }

    /// Positions of chunks that need GPU re-upload.
    #[must_use]
    pub fn dirty_chunks(&self) -> Vec<ChunkPos> {
        self.chunks
            .iter()
            .filter(|(_, chunk)| chunk.is_dirty())
            .map(|(pos, _)| *pos)
            .collect()
    }

    /// Clear a chunk's dirty flag once the uploader has consumed it.
    pub fn mark_chunk_clean(&mut self, pos: ChunkPos) {
        if let Some(chunk) = self.chunks.get_mut(&pos) {
            chunk.mark_clean();
        }
    }

    /// Get total memory usage of all chunks in bytes.
    #[must_use]
    pub fn memory_usage(&self) -> usize {
        std::mem::size_of::<Self>() + self.chunks.values().map(Chunk::memory_usage).sum::<usize>()
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duskvox_core::types::MaterialId;

    fn stone() -> Voxel {
        Voxel::new(MaterialId(1), [128, 128, 128])
    }

    #[test]
    fn unwritten_coordinates_read_empty() {
        let volume = Volume::new();
        assert!(volume.get(VoxelPos::new(0, 0, 0)).is_empty());
        assert!(volume.get(VoxelPos::new(-1000, 77, 3)).is_empty());
        assert_eq!(volume.chunk_count(), 0);
    }

    #[test]
    fn reads_never_allocate() {
        let volume = Volume::new();
        for x in -20..20 {
            let _ = volume.get(VoxelPos::new(x, x, x));
        }
        assert_eq!(volume.chunk_count(), 0);
    }

    #[test]
    fn set_and_get_roundtrip() {
        let mut volume = Volume::new();
        let pos = VoxelPos::new(5, -9, 100);
        volume.set(pos, &stone()).unwrap();
        let back = volume.get(pos);
        assert_eq!(back.material, MaterialId(1));
        assert_eq!(back.albedo, [128, 128, 128]);
        assert_eq!(volume.chunk_count(), 1);
        assert_eq!(volume.solid_count(), 1);
    }

    #[test]
    fn writing_empty_into_void_is_a_noop() {
        let mut volume = Volume::new();
        volume.set(VoxelPos::new(3, 3, 3), &Voxel::EMPTY).unwrap();
        assert_eq!(volume.chunk_count(), 0);
    }

    #[test]
    fn clearing_keeps_the_chunk() {
        let mut volume = Volume::new();
        let pos = VoxelPos::new(1, 2, 3);
        volume.set(pos, &stone()).unwrap();
        volume.set(pos, &Voxel::EMPTY).unwrap();
        assert!(volume.get(pos).is_empty());
        assert_eq!(volume.chunk_count(), 1);
        assert_eq!(volume.solid_count(), 0);
    }

    #[test]
    fn writes_mark_chunks_dirty() {
        let mut volume = Volume::new();
        let pos = VoxelPos::new(0, 0, 0);
        volume.set(pos, &stone()).unwrap();

        let dirty = volume.dirty_chunks();
        assert_eq!(dirty, vec![pos.chunk_pos()]);

        volume.mark_chunk_clean(pos.chunk_pos());
        assert!(volume.dirty_chunks().is_empty());

        volume.set(pos, &Voxel::EMPTY).unwrap();
        assert_eq!(volume.dirty_chunks(), vec![pos.chunk_pos()]);
    }

    #[test]
    fn fill_box_spans_chunks() {
        let mut volume = Volume::new();
        volume
            .fill_box(VoxelPos::new(-2, 0, 0), VoxelPos::new(17, 1, 1), &stone())
            .unwrap();
        // 20 x 2 x 2 voxels across three chunk columns on X.
        assert_eq!(volume.solid_count(), 80);
        assert!(volume.chunk_count() >= 2);
        assert!(volume.get(VoxelPos::new(-2, 0, 0)).is_solid());
        assert!(volume.get(VoxelPos::new(17, 1, 1)).is_solid());
        assert!(volume.get(VoxelPos::new(18, 0, 0)).is_empty());
    }

    #[test]
    fn solid_in_range_yields_only_solid() {
        let mut volume = Volume::new();
        volume.set(VoxelPos::new(0, 0, 0), &stone()).unwrap();
        volume.set(VoxelPos::new(2, 0, 0), &stone()).unwrap();

        let hits: Vec<_> = volume
            .solid_in_range(VoxelPos::new(-1, -1, -1), VoxelPos::new(3, 1, 1))
            .collect();
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|(_, v)| v.is_solid()));
    }
}

//! Importing palette-indexed voxel grids.
//!
//! The byte-level `.vox` container parsing happens in an external reader;
//! what arrives here is its output: grid dimensions, one palette index per
//! cell, and a 256-entry RGBA palette. Cell index 0 means empty, matching
//! the source format, so palette-derived material codes (1-255) never
//! collide with [`MaterialId::EMPTY`].

use std::sync::Arc;

use glam::UVec3;
use tracing::debug;

use duskvox_core::diagnostics::{Category, DiagnosticsSink, NullSink, Severity};
use duskvox_core::types::{MaterialId, Voxel};
use duskvox_core::{Error, Result};
use duskvox_voxel::codec::{encode, PackedVoxel};

use crate::model::VoxelModel;

/// A dense, palette-indexed voxel grid as handed over by the container
/// reader. Cells are row-major with x fastest; index 0 marks an empty cell.
pub struct IndexedGrid {
    /// Grid extent in voxels per axis
    pub size: UVec3,
    /// One palette index per cell
    pub indices: Vec<u8>,
    /// RGBA palette the indices refer to
    pub palette: [[u8; 4]; 256],
}

/// How imported voxels get their material code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterialSource {
    /// Every voxel receives this material.
    Fixed(MaterialId),
    /// Every voxel's material is its palette index (1-255).
    PaletteIndex,
}

/// Converts indexed grids into compressed voxel models.
pub struct ModelImporter {
    diagnostics: Arc<dyn DiagnosticsSink + Send + Sync>,
}

impl ModelImporter {
    /// Create an importer with the default (no-op) diagnostics sink.
    #[must_use]
    pub fn new() -> Self {
        Self::with_diagnostics(Arc::new(NullSink))
    }

    /// Create an importer reporting through the given sink.
    #[must_use]
    pub fn with_diagnostics(diagnostics: Arc<dyn DiagnosticsSink + Send + Sync>) -> Self {
        Self { diagnostics }
    }

    /// Convert a parsed grid into a compressed model.
    ///
    /// Every non-empty cell is encoded with albedo taken from the palette
    /// and material per `material`. Imported voxels carry no normal; run
    /// [`crate::recalculate_normals`] afterwards to reconstruct them.
    ///
    /// Fails with [`Error::InvalidData`] when the cell count does not match
    /// the extent, and with [`Error::Allocation`] (after a diagnostics
    /// report) when the model buffer cannot be grown. No partial model is
    /// ever returned.
    pub fn import(&self, grid: &IndexedGrid, material: MaterialSource) -> Result<VoxelModel> {
        let cell_count = (grid.size.x * grid.size.y * grid.size.z) as usize;
        if grid.indices.len() != cell_count {
            let message = format!(
                "indexed grid holds {} cells but extent {:?} needs {}",
                grid.indices.len(),
                grid.size,
                cell_count
            );
            self.diagnostics
                .report(Category::FileIo, Severity::Error, &message);
            return Err(Error::InvalidData(message));
        }

        let mut voxels = Vec::new();
        if let Err(err) = voxels.try_reserve_exact(cell_count) {
            self.diagnostics.report(
                Category::CpuMemory,
                Severity::Error,
                &format!("failed to allocate model buffer for {cell_count} cells: {err}"),
            );
            return Err(err.into());
        }

        for &index in &grid.indices {
            voxels.push(Self::import_cell(grid, material, index));
        }

        let model = VoxelModel::from_parts(grid.size, voxels);
        debug!(size = ?grid.size, solid = model.solid_count(), "imported model");
        Ok(model)
    }

    fn import_cell(grid: &IndexedGrid, material: MaterialSource, index: u8) -> PackedVoxel {
        if index == 0 {
            return PackedVoxel::EMPTY;
        }
        let [r, g, b, _a] = grid.palette[index as usize];
        let material = match material {
            MaterialSource::Fixed(id) => id,
            MaterialSource::PaletteIndex => MaterialId(u16::from(index)),
        };
        encode(&Voxel::new(material, [r, g, b]))
    }
}

impl Default for ModelImporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a parsed grid into a compressed model with default diagnostics.
pub fn import_indexed_grid(grid: &IndexedGrid, material: MaterialSource) -> Result<VoxelModel> {
    ModelImporter::new().import(grid, material)
}

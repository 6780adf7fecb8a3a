//! Voxel model import and placement.
//!
//! Models arrive as palette-indexed dense grids from an external container
//! reader, are compressed into [`VoxelModel`]s through the packed codec, and
//! merge into a volume with [`place_model`]. Imported grids carry no surface
//! orientation, so [`recalculate_normals`] reconstructs smoothed normals by
//! local averaging.

pub mod import;
pub mod model;
pub mod normals;
pub mod place;

pub use import::{import_indexed_grid, IndexedGrid, MaterialSource, ModelImporter};
pub use model::VoxelModel;
pub use normals::recalculate_normals;
pub use place::place_model;

//! Core types, math, and traits for the Duskvox voxel pipeline.
//!
//! This crate provides the foundational types used throughout the pipeline:
//! - Voxel and material types
//! - Coordinate systems (world voxel, chunk, local)
//! - Placement transforms and bounding-box math
//! - Diagnostics port and error types

pub mod coords;
pub mod diagnostics;
pub mod error;
pub mod math;
pub mod types;

pub use coords::{ChunkPos, LocalPos, VoxelPos};
pub use diagnostics::{Category, DiagnosticsSink, NullSink, Severity, TracingSink};
pub use error::{Error, Result};
pub use math::{Aabb, ShapeTransform};
pub use types::{MaterialId, Voxel};

/// Pipeline-wide constants
pub mod constants {
    /// Size of a chunk in voxels per axis
    pub const CHUNK_SIZE: usize = 16;
    /// Total voxels in a chunk (16^3)
    pub const CHUNK_SIZE_CUBED: usize = CHUNK_SIZE * CHUNK_SIZE * CHUNK_SIZE;
    /// Bits needed to represent position within a chunk (4 bits for 0-15)
    pub const CHUNK_BITS: u32 = 4;
}

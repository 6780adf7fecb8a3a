//! Packed voxel codec and chunked sparse volume storage.

pub mod chunk;
pub mod codec;
pub mod volume;

pub use chunk::Chunk;
pub use codec::{decode, encode, PackedVoxel};
pub use volume::Volume;

//! SDF shape rasterization for the Duskvox voxel pipeline.
//!
//! Shapes are generated from analytic distance fields, so they may not appear
//! exactly as specified once sampled onto the voxel grid; a cylinder of
//! height 5 can come out 4 voxels tall depending on where its surface falls
//! relative to cell centers.

pub mod rasterize;
pub mod sdf;

pub use rasterize::{
    rasterize, rasterize_box, rasterize_cone, rasterize_cylinder, rasterize_ellipsoid,
    rasterize_rounded_box, rasterize_sphere, rasterize_torus, rasterize_with, ShapeSample,
};
pub use sdf::SdfShape;

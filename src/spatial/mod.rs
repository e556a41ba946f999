//! Spatial data structures: rasters, grids, tiles and freeform regions
//!
//! This module contains:
//! - The decoded RGBA raster shared by every stage
//! - Grid resolution and tile slicing
//! - Connected-component sprite region detection

/// Tiling grid resolution and auto-detection
pub mod grid;
/// Decoded RGBA raster
pub mod raster;
/// Freeform sprite region segmentation
pub mod regions;
/// Tile rectangle enumeration
pub mod tiles;

pub use grid::{GridParams, GridSpec, ResolvedGrid};
pub use raster::RasterImage;

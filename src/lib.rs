//! Semantic metadata extraction for 2D tilesets and sprite sheets
//!
//! A decoded sheet is cut into a tile grid (given or auto-detected), the tiles
//! are scored by auto-tile pattern classifiers, a colour/content classifier
//! and a vendor naming catalog, and freeform sprite regions are segmented
//! from the raw pixels. The results are merged into a [`TilesetMetadata`]
//! record of themes, materials, named tiles, groups, confidences and
//! validation warnings.
//!
//! [`TilesetMetadata`]: algorithm::metadata::TilesetMetadata

#![forbid(unsafe_code)]

/// Merging, naming, overrides, validation and the analysis pipeline
pub mod algorithm;
/// Classifiers over sliced tiles and asset names
pub mod analysis;
/// Input/output operations, configuration and error handling
pub mod io;
/// Colour space conversion, histograms and descriptive statistics
pub mod math;
/// Raster storage, grid geometry, tile slicing and region segmentation
pub mod spatial;

pub use io::error::{AnalysisError, Result};

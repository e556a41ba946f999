//! Persisted tileset metadata and the records exchanged with callers
//!
//! Field names serialize in camelCase; they are the compatibility contract for
//! catalog and recommendation consumers.

use crate::analysis::patterns::AutoTileSystem;
use crate::analysis::seams::SeamQuality;
use crate::spatial::grid::GridSpec;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A freeform rectangle the user (or segmenter) selected on the sheet
///
/// Analysis only ever changes `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteSelection {
    /// Stable identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// A caller-supplied correction for one tile
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualOverride {
    /// Tile being renamed
    pub tile_index: usize,
    /// New variant name
    pub semantic_name: String,
    /// Group the tile belongs to; empty keeps the name ungrouped
    #[serde(default)]
    pub category: String,
}

/// Named tiles sharing a prefix
///
/// Always derived from `named_tiles`; never edited on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileSemanticGroup {
    /// Group key, the first token of each member name
    pub label: String,
    /// Human-readable summary
    pub description: String,
    /// Auto-tile system when the group holds its canonical variants
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_tile_system: Option<AutoTileSystem>,
    /// Materials, only when unambiguous
    #[serde(skip_serializing_if = "Option::is_none")]
    pub materials: Option<Vec<String>>,
    /// Themes, only when unambiguous
    #[serde(skip_serializing_if = "Option::is_none")]
    pub themes: Option<Vec<String>>,
    /// Variant name to tile index
    pub tiles: BTreeMap<String, usize>,
    /// Sorted unique variant names
    pub variants: Vec<String>,
    /// Number of named entries folded into the group
    pub tile_count: usize,
}

/// Confidence scalars for the public discovery surface
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionConfidence {
    /// Belief in `auto_tile_system`
    pub auto_tile_pattern: f64,
    /// Belief in the non-fallback tile names
    pub named_tiles: f64,
    /// Mean over the classifiers that actually contributed
    pub overall: f64,
}

/// Consolidated validation outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    /// Seam verdict for the first tile
    pub seam_quality: SeamQuality,
    /// Whether the grid fits the image dimensions
    pub grid_dimensions_valid: bool,
    /// Deduplicated advisories from every stage
    pub warnings: Vec<String>,
    /// When validation ran
    pub checked_at: DateTime<Utc>,
}

/// Complete semantic description of one tileset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TilesetMetadata {
    /// Image width in pixels
    pub image_width: u32,
    /// Image height in pixels
    pub image_height: u32,
    /// Resolved grid
    pub grid: GridSpec,
    /// Number of tiles in the grid
    pub tile_count: usize,
    /// Themes, strongest first
    pub themes: Vec<String>,
    /// Materials in discovery order
    pub materials: Vec<String>,
    /// Suggested editor layers
    pub layer_types: Vec<String>,
    /// Detected auto-tile system
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_tile_system: Option<AutoTileSystem>,
    /// Unique name to tile index; every index is below `tile_count`
    pub named_tiles: BTreeMap<String, usize>,
    /// Groups derived from `named_tiles`
    pub tile_groups: Vec<TileSemanticGroup>,
    /// Confidence scalars
    pub detection_confidence: DetectionConfidence,
    /// Validation report
    pub validation: ValidationSummary,
}

impl TilesetMetadata {
    /// Numeric-only metadata used when full analysis is unavailable
    pub fn minimal(image_width: u32, image_height: u32, grid: GridSpec, warning: &str) -> Self {
        Self {
            image_width,
            image_height,
            grid,
            tile_count: grid.tile_count as usize,
            themes: Vec::new(),
            materials: Vec::new(),
            layer_types: Vec::new(),
            auto_tile_system: None,
            named_tiles: BTreeMap::new(),
            tile_groups: Vec::new(),
            detection_confidence: DetectionConfidence::default(),
            validation: ValidationSummary {
                seam_quality: SeamQuality::Unchecked,
                grid_dimensions_valid: grid.validate(image_width, image_height).is_ok(),
                warnings: vec![warning.to_string()],
                checked_at: Utc::now(),
            },
        }
    }

    /// Group with the given label
    pub fn group(&self, label: &str) -> Option<&TileSemanticGroup> {
        self.tile_groups.iter().find(|group| group.label == label)
    }
}

//! Manual override channel applied after automatic analysis

use crate::algorithm::aggregator::fill_missing_names;
use crate::algorithm::groups::build_groups;
use crate::algorithm::metadata::{ManualOverride, TilesetMetadata};
use crate::algorithm::renaming::clean_identifier;
use crate::io::error::{AnalysisError, Result, invalid_parameter};
use tracing::debug;

/// Name key an override writes into the named tile map
///
/// `category.semantic_name`, or just the name when the category is blank.
pub fn override_key(entry: &ManualOverride) -> String {
    let name = clean_identifier(&entry.semantic_name);
    let category = clean_identifier(&entry.category);
    if category.is_empty() {
        name
    } else {
        format!("{category}.{name}")
    }
}

/// Apply overrides in order and rebuild the groups
///
/// Every name previously pointing at an overridden index is dropped before the
/// new one is inserted, and a key already used elsewhere moves to the
/// overridden index. Indices left without a name get a fallback name again.
/// Applying the same list twice gives the same result as applying it once.
///
/// # Errors
///
/// Returns `InvalidTileIndex` if any override targets a tile outside the
/// grid, or `InvalidParameter` if a semantic name is blank. Nothing is applied
/// in that case.
pub fn apply_overrides(
    metadata: &TilesetMetadata,
    overrides: &[ManualOverride],
) -> Result<TilesetMetadata> {
    for entry in overrides {
        if entry.tile_index >= metadata.tile_count {
            return Err(AnalysisError::InvalidTileIndex {
                index: entry.tile_index,
                max_tiles: metadata.tile_count,
            });
        }
        if clean_identifier(&entry.semantic_name).is_empty() {
            return Err(invalid_parameter(
                "semanticName",
                &entry.semantic_name,
                &format!("override for tile {} has no name", entry.tile_index),
            ));
        }
    }

    let mut updated = metadata.clone();
    if overrides.is_empty() {
        return Ok(updated);
    }

    for entry in overrides {
        updated
            .named_tiles
            .retain(|_, index| *index != entry.tile_index);
        updated
            .named_tiles
            .insert(override_key(entry), entry.tile_index);
    }
    fill_missing_names(&mut updated.named_tiles, updated.tile_count);

    updated.tile_groups = build_groups(
        &updated.named_tiles,
        &updated.materials,
        &updated.themes,
        updated.auto_tile_system,
    );

    debug!(overrides = overrides.len(), "applied manual overrides");
    Ok(updated)
}

//! Pure renaming of sprite selections from named tiles

use crate::algorithm::metadata::SpriteSelection;
use crate::io::configuration::RENAME_SAMPLE_SIZE;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// What a renaming pass did
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameSummary {
    /// Selections that received a tile name
    pub renamed_count: usize,
    /// Selections left with their prior name
    pub skipped_count: usize,
    /// A few of the new names, in selection order
    pub sample_names: Vec<String>,
}

/// Lowercase with dots and whitespace turned into underscores
pub fn clean_identifier(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| {
            if c == '.' || c.is_whitespace() {
                '_'
            } else {
                c
            }
        })
        .collect::<String>()
        .to_lowercase()
}

/// Rename selections whose position matches a named tile index
///
/// Selection `i` takes the name of the first entry (in key order) whose value
/// is `i`. Names are always derived from the asset base and the tile name,
/// never from the selection's previous name, so re-running with the same map
/// is a no-op. Selections without a matching tile keep their name, or get
/// `<base>_sprite_<i>` if that name is empty.
pub fn rename_selections(
    selections: &[SpriteSelection],
    named_tiles: &BTreeMap<String, usize>,
    asset_base: &str,
) -> (Vec<SpriteSelection>, RenameSummary) {
    let base = clean_identifier(asset_base);

    let mut by_index: BTreeMap<usize, &str> = BTreeMap::new();
    for (name, &index) in named_tiles {
        by_index.entry(index).or_insert(name.as_str());
    }

    let mut summary = RenameSummary::default();
    let renamed = selections
        .iter()
        .enumerate()
        .map(|(index, selection)| {
            let mut next = selection.clone();
            if let Some(tile_name) = by_index.get(&index) {
                next.name = format!("{base}_{}", clean_identifier(tile_name));
                summary.renamed_count += 1;
                if summary.sample_names.len() < RENAME_SAMPLE_SIZE {
                    summary.sample_names.push(next.name.clone());
                }
            } else {
                summary.skipped_count += 1;
                if next.name.trim().is_empty() {
                    next.name = format!("{base}_sprite_{index}");
                }
            }
            next
        })
        .collect();

    if summary.renamed_count == 0 && !selections.is_empty() {
        info!(
            selections = selections.len(),
            "no selection matched a named tile; names left unchanged"
        );
    } else {
        debug!(
            renamed = summary.renamed_count,
            skipped = summary.skipped_count,
            "renamed sprite selections"
        );
    }

    (renamed, summary)
}

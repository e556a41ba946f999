//! Semantic aggregation of classifier outputs
//!
//! Each field has a fixed precedence. The name catalog wins where it has an
//! opinion, a confident pattern classifier comes next, and count-based
//! inference is the last resort. Whatever source wins, a single fallback pass
//! afterwards guarantees every tile index has a name.

use crate::algorithm::groups::build_groups;
use crate::algorithm::metadata::{DetectionConfidence, TileSemanticGroup};
use crate::analysis::catalog::{CatalogMatch, suggest_layer_types};
use crate::analysis::color::{ColorClassification, infer_from_tile_count};
use crate::analysis::patterns::{AutoTileSystem, PatternOutcome};
use crate::io::configuration::PATTERN_FALLBACK_MATERIAL;
use crate::math::statistics::mean;
use std::collections::BTreeMap;
use tracing::debug;

/// Outputs of the grid-based classifiers
///
/// A `None` field means that classifier did not produce anything, either
/// because it failed or because it does not apply.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassifierReports<'a> {
    /// Ranked pattern classifier results
    pub patterns: Option<&'a PatternOutcome>,
    /// Color/content classification
    pub colors: Option<&'a ColorClassification>,
    /// Vendor naming convention match
    pub catalog: Option<&'a CatalogMatch>,
}

/// Where the auto-tile system came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemSource {
    /// Vendor naming convention
    Catalog,
    /// Winning pattern classifier
    Pattern,
    /// Tile count heuristic
    TileCount,
    /// Nothing applied
    Undetermined,
}

/// Where the non-fallback tile names came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameSource {
    /// Vendor naming convention
    Catalog,
    /// Winning pattern classifier
    Pattern,
    /// Only numeric fallback names
    Fallback,
}

/// Merged semantic fields ready to be placed into metadata
#[derive(Debug, Clone, PartialEq)]
pub struct MergedSemantics {
    /// Detected auto-tile system
    pub auto_tile_system: Option<AutoTileSystem>,
    /// Which source supplied the system
    pub system_source: SystemSource,
    /// Complete name to index map
    pub named_tiles: BTreeMap<String, usize>,
    /// Which source supplied the non-fallback names
    pub name_source: NameSource,
    /// Number of indices named by the fallback pass
    pub fallback_names: usize,
    /// Union of catalog and color themes
    pub themes: Vec<String>,
    /// Union of catalog and color materials
    pub materials: Vec<String>,
    /// Suggested editor layers
    pub layer_types: Vec<String>,
    /// Groups derived from `named_tiles`
    pub tile_groups: Vec<TileSemanticGroup>,
    /// Confidence scalars
    pub detection_confidence: DetectionConfidence,
    /// Advisories raised while merging
    pub warnings: Vec<String>,
}

/// Merge classifier outputs for a sheet with `tile_count` tiles
pub fn merge_semantics(
    asset_name: &str,
    tile_count: usize,
    reports: ClassifierReports<'_>,
    pattern_threshold: f64,
) -> MergedSemantics {
    let catalog = reports.catalog;
    let pattern = reports
        .patterns
        .and_then(|outcome| outcome.mergeable(pattern_threshold));
    let colors = reports.colors;
    let mut contributions: Vec<f64> = Vec::new();
    let mut warnings = Vec::new();

    // Auto-tile system
    let (auto_tile_system, system_source, pattern_confidence) = if let Some(matched) = catalog {
        (
            Some(catalog_system(tile_count)),
            SystemSource::Catalog,
            matched.confidence,
        )
    } else if let Some(winner) = pattern {
        (Some(winner.system), SystemSource::Pattern, winner.confidence)
    } else if let Some((system, confidence)) = infer_from_tile_count(tile_count) {
        contributions.push(confidence);
        (Some(system), SystemSource::TileCount, confidence)
    } else {
        (None, SystemSource::Undetermined, 0.0)
    };

    if catalog.is_none() && pattern.is_none() {
        let best = reports
            .patterns
            .and_then(PatternOutcome::winner)
            .map_or(0.0, |winner| winner.confidence);
        warnings.push(format!(
            "auto-tile pattern confidence {best:.2} is below {pattern_threshold:.2}"
        ));
    }

    // Named tiles
    let material = colors
        .and_then(|classification| classification.materials.first())
        .map_or(PATTERN_FALLBACK_MATERIAL, String::as_str);
    let (mut named_tiles, name_source, names_confidence) = if let Some(matched) = catalog {
        contributions.push(matched.confidence);
        (
            in_range(&matched.named_tiles, tile_count),
            NameSource::Catalog,
            matched.confidence,
        )
    } else if let Some(winner) = pattern {
        contributions.push(winner.confidence);
        let prefixed: BTreeMap<String, usize> = winner
            .named_tiles
            .iter()
            .map(|(name, &index)| (format!("{material}.{name}"), index))
            .collect();
        (
            in_range(&prefixed, tile_count),
            NameSource::Pattern,
            winner.confidence,
        )
    } else {
        (BTreeMap::new(), NameSource::Fallback, 0.0)
    };
    let fallback_names = fill_missing_names(&mut named_tiles, tile_count);
    if name_source == NameSource::Fallback && tile_count > 0 {
        warnings.push("no semantic tile names detected; numeric fallback names used".to_string());
    }

    // Themes and materials
    let mut themes: Vec<String> = Vec::new();
    let mut materials: Vec<String> = Vec::new();
    if let Some(matched) = catalog {
        extend_unique(&mut themes, matched.themes.iter().cloned());
        extend_unique(&mut materials, [matched.material.clone()]);
    }
    if let Some(classification) = colors {
        extend_unique(
            &mut themes,
            classification.themes.iter().map(|theme| theme.theme.clone()),
        );
        extend_unique(&mut materials, classification.materials.iter().cloned());
        if let Some(confidence) = classification.top_confidence() {
            contributions.push(confidence);
        }
    }

    let layer_types = catalog.map_or_else(
        || suggest_layer_types(asset_name, tile_count),
        |matched| matched.layer_types.clone(),
    );

    let tile_groups = build_groups(&named_tiles, &materials, &themes, auto_tile_system);

    let detection_confidence = DetectionConfidence {
        auto_tile_pattern: pattern_confidence.clamp(0.0, 1.0),
        named_tiles: names_confidence.clamp(0.0, 1.0),
        overall: mean(&contributions).unwrap_or(0.0).clamp(0.0, 1.0),
    };

    debug!(
        ?auto_tile_system,
        ?system_source,
        ?name_source,
        fallback_names,
        overall = detection_confidence.overall,
        "merged classifier outputs"
    );

    MergedSemantics {
        auto_tile_system,
        system_source,
        named_tiles,
        name_source,
        fallback_names,
        themes,
        materials,
        layer_types,
        tile_groups,
        detection_confidence,
        warnings,
    }
}

/// Give every unnamed index in `[0, tile_count)` a `tile_<i>` name
///
/// Existing names are never replaced. A fallback name that is already taken
/// by another index gets a numeric suffix. Returns how many names were added.
pub fn fill_missing_names(named_tiles: &mut BTreeMap<String, usize>, tile_count: usize) -> usize {
    let mut covered = vec![false; tile_count];
    for &index in named_tiles.values() {
        if let Some(slot) = covered.get_mut(index) {
            *slot = true;
        }
    }

    let mut added = 0;
    for (index, _) in covered.iter().enumerate().filter(|(_, is_named)| !**is_named) {
        let mut name = format!("tile_{index}");
        let mut suffix = 1;
        while named_tiles.contains_key(&name) {
            name = format!("tile_{index}_{suffix}");
            suffix += 1;
        }
        named_tiles.insert(name, index);
        added += 1;
    }
    added
}

// System implied by the canonical table a catalog match used
const fn catalog_system(tile_count: usize) -> AutoTileSystem {
    match tile_count {
        16 => AutoTileSystem::Blob16,
        47 | 48 => AutoTileSystem::Blob47,
        _ => AutoTileSystem::Custom,
    }
}

fn in_range(named_tiles: &BTreeMap<String, usize>, tile_count: usize) -> BTreeMap<String, usize> {
    named_tiles
        .iter()
        .filter(|&(_, &index)| index < tile_count)
        .map(|(name, &index)| (name.clone(), index))
        .collect()
}

fn extend_unique(target: &mut Vec<String>, values: impl IntoIterator<Item = String>) {
    for value in values {
        if !target.contains(&value) {
            target.push(value);
        }
    }
}

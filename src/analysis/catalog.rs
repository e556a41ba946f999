//! Recognition of known third-party asset naming conventions
//!
//! A match means the sheet follows a published layout, so the names, material
//! and themes derived here outrank anything inferred from pixels.

use crate::analysis::names::{BLOB16_NAMES, blob47_names};
use crate::io::configuration::{CATALOG_MATCH_CONFIDENCE, FALLBACK_MATERIAL};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

const VENDOR_PATTERNS: [(&str, &str); 6] = [
    (
        "kenney",
        r"(?i)(kenney|roguelike|tiny[_ -]?(town|dungeon|farm)|pixel[_ -]?platformer)",
    ),
    ("rpg_maker", r"(?i)\b(outside|inside|world|dungeon)_[a-e][1-5]?\b"),
    ("lpc", r"(?i)(^|[^a-z])lpc([^a-z]|$)"),
    ("craftpix", r"(?i)craftpix"),
    ("cainos", r"(?i)cainos"),
    ("pipoya", r"(?i)pipo(ya)?[_ -]"),
];

// Patterns are constants; one that fails to compile simply never matches
static VENDORS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    VENDOR_PATTERNS
        .iter()
        .filter_map(|(vendor, pattern)| Regex::new(pattern).ok().map(|re| (*vendor, re)))
        .collect()
});

const MATERIAL_KEYWORDS: [(&str, &[&str]); 9] = [
    ("grass", &["grass", "meadow", "lawn"]),
    ("dirt", &["dirt", "mud", "soil", "earth"]),
    ("water", &["water", "ocean", "sea", "lake", "river"]),
    ("stone", &["stone", "rock", "cobble", "brick"]),
    ("sand", &["sand", "beach", "dune"]),
    ("snow", &["snow", "ice", "frost"]),
    ("lava", &["lava", "magma"]),
    ("wood", &["wood", "plank"]),
    ("metal", &["metal", "steel", "iron"]),
];

const THEME_KEYWORDS: [(&str, &[&str]); 7] = [
    ("forest", &["forest", "woods", "jungle", "tree"]),
    ("dungeon", &["dungeon", "crypt", "cave", "castle"]),
    ("desert", &["desert", "dune"]),
    ("snow", &["snow", "winter", "tundra"]),
    ("water", &["water", "ocean", "beach", "island"]),
    ("lava", &["lava", "volcano", "magma"]),
    ("town", &["town", "village", "city", "house"]),
];

/// Result of a vendor naming convention match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogMatch {
    /// Vendor whose convention matched
    pub vendor: String,
    /// Dominant material, never empty
    pub material: String,
    /// Every theme keyword found in the name
    pub themes: Vec<String>,
    /// Suggested editor layers
    pub layer_types: Vec<String>,
    /// Canonical names for the sheet's tiles
    pub named_tiles: BTreeMap<String, usize>,
    /// Belief in the match
    pub confidence: f64,
}

/// Vendor whose naming convention the asset name follows
pub fn match_vendor(asset_name: &str) -> Option<&'static str> {
    VENDORS
        .iter()
        .find(|(_, pattern)| pattern.is_match(asset_name))
        .map(|(vendor, _)| *vendor)
}

/// First material keyword found in the name, `tile` otherwise
pub fn dominant_material(asset_name: &str) -> String {
    let lowered = asset_name.to_lowercase();
    MATERIAL_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| lowered.contains(keyword)))
        .map_or(FALLBACK_MATERIAL, |(material, _)| *material)
        .to_string()
}

/// Every theme whose keywords appear in the name
pub fn name_themes(asset_name: &str) -> Vec<String> {
    let lowered = asset_name.to_lowercase();
    THEME_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|keyword| lowered.contains(keyword)))
        .map(|(theme, _)| (*theme).to_string())
        .collect()
}

/// Editor layers an asset is likely meant for
pub fn suggest_layer_types(asset_name: &str, tile_count: usize) -> Vec<String> {
    let lowered = asset_name.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|word| lowered.contains(word));

    let mut layers: Vec<&str> = Vec::new();
    if matches!(tile_count, 16 | 47 | 48) {
        layers.extend(["ground", "background"]);
    }
    if mentions(&["prop", "object"]) {
        layers.extend(["props", "decals"]);
    }
    if mentions(&["effect", "particle"]) {
        layers.push("fx");
    }
    if mentions(&["collision", "physics"]) {
        layers.push("collision");
    }

    let mut unique: Vec<String> = Vec::with_capacity(layers.len());
    for layer in layers {
        if !unique.iter().any(|existing| existing == layer) {
            unique.push(layer.to_string());
        }
    }
    unique
}

/// Names for every tile following the canonical table for the tile count
pub fn catalog_tile_names(material: &str, tile_count: usize) -> BTreeMap<String, usize> {
    match tile_count {
        16 => BLOB16_NAMES
            .iter()
            .enumerate()
            .map(|(index, suffix)| (format!("{material}.{suffix}"), index))
            .collect(),
        47 | 48 => blob47_names()
            .into_iter()
            .enumerate()
            .map(|(index, suffix)| (format!("{material}.{suffix}"), index))
            .collect(),
        _ => (0..tile_count)
            .map(|index| (format!("{material}_{index}"), index))
            .collect(),
    }
}

/// Classify an asset by its name
///
/// Returns `None` when no known vendor convention applies.
pub fn classify_name(asset_name: &str, tile_count: usize) -> Option<CatalogMatch> {
    let vendor = match_vendor(asset_name)?;
    let material = dominant_material(asset_name);

    Some(CatalogMatch {
        vendor: vendor.to_string(),
        themes: name_themes(asset_name),
        layer_types: suggest_layer_types(asset_name, tile_count),
        named_tiles: catalog_tile_names(&material, tile_count),
        material,
        confidence: CATALOG_MATCH_CONFIDENCE,
    })
}

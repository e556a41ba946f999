//! Semantic tile groups derived from named tiles
//!
//! Groups are a pure function of the named tile map and the asset-level
//! materials, themes and auto-tile system. They are rebuilt from scratch
//! whenever any of those change, never patched.

use crate::algorithm::metadata::TileSemanticGroup;
use crate::analysis::names::{BLOB16_NAMES, blob47_names};
use crate::analysis::patterns::AutoTileSystem;
use std::collections::BTreeMap;

/// Variant used for names that consist of a single token
pub const BASE_VARIANT: &str = "base";

/// Split a tile name into its group key and variant
///
/// Tokens are separated by `.`, `_` or `-`. The first token is the group key
/// and the remaining tokens joined with `_` form the variant.
pub fn split_name(name: &str) -> (String, String) {
    let mut tokens = name
        .split(['.', '_', '-'])
        .filter(|token| !token.is_empty());

    let Some(label) = tokens.next() else {
        return (name.to_string(), BASE_VARIANT.to_string());
    };

    let rest: Vec<&str> = tokens.collect();
    let variant = if rest.is_empty() {
        BASE_VARIANT.to_string()
    } else {
        rest.join("_")
    };
    (label.to_string(), variant)
}

/// Build groups from the named tiles in key order
pub fn build_groups(
    named_tiles: &BTreeMap<String, usize>,
    materials: &[String],
    themes: &[String],
    system: Option<AutoTileSystem>,
) -> Vec<TileSemanticGroup> {
    let mut groups: Vec<TileSemanticGroup> = Vec::new();

    for (name, &index) in named_tiles {
        let (label, variant) = split_name(name);
        let position = match groups.iter().position(|group| group.label == label) {
            Some(position) => position,
            None => {
                groups.push(TileSemanticGroup {
                    materials: inherit(&label, materials),
                    themes: inherit(&label, themes),
                    label,
                    description: String::new(),
                    auto_tile_system: None,
                    tiles: BTreeMap::new(),
                    variants: Vec::new(),
                    tile_count: 0,
                });
                groups.len() - 1
            }
        };

        let Some(group) = groups.get_mut(position) else {
            continue;
        };
        group.tiles.entry(variant.clone()).or_insert(index);
        if let Err(slot) = group.variants.binary_search(&variant) {
            group.variants.insert(slot, variant);
        }
        group.tile_count += 1;
    }

    for group in &mut groups {
        group.auto_tile_system = system.filter(|&system| holds_canonical_set(group, system));
        group.description = describe(group);
    }
    groups
}

// A group inherits a value when exactly one candidate relates to its label,
// or when there is exactly one candidate overall
fn inherit(label: &str, candidates: &[String]) -> Option<Vec<String>> {
    let label = label.to_lowercase();
    let related: Vec<&String> = candidates
        .iter()
        .filter(|candidate| {
            let candidate = candidate.to_lowercase();
            !candidate.is_empty() && (candidate.contains(&label) || label.contains(&candidate))
        })
        .collect();

    match (related.as_slice(), candidates) {
        ([only], _) => Some(vec![(*only).clone()]),
        ([], [only]) => Some(vec![only.clone()]),
        _ => None,
    }
}

fn holds_canonical_set(group: &TileSemanticGroup, system: AutoTileSystem) -> bool {
    let has = |name: &str| group.variants.binary_search_by(|v| v.as_str().cmp(name)).is_ok();
    match system {
        AutoTileSystem::Blob16 => BLOB16_NAMES.iter().all(|name| has(name)),
        AutoTileSystem::Blob47 => blob47_names().iter().all(|name| has(name)),
        AutoTileSystem::Wang | AutoTileSystem::Custom => false,
    }
}

fn describe(group: &TileSemanticGroup) -> String {
    let noun = if group.variants.len() == 1 {
        "variant"
    } else {
        "variants"
    };
    match group.auto_tile_system {
        Some(system) => format!(
            "{} {system} auto-tile set ({} {noun})",
            group.label,
            group.variants.len()
        ),
        None => format!("{} tiles ({} {noun})", group.label, group.variants.len()),
    }
}

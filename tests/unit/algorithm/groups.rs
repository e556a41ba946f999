//! Tests for semantic group construction

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use tilesense::algorithm::groups::{BASE_VARIANT, build_groups, split_name};
    use tilesense::analysis::names::BLOB16_NAMES;
    use tilesense::analysis::patterns::AutoTileSystem;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    // Tests name splitting on every separator
    // Verified by splitting on dots only
    #[test]
    fn test_split_name() {
        assert_eq!(
            split_name("grass.corner_ne"),
            ("grass".to_string(), "corner_ne".to_string())
        );
        assert_eq!(
            split_name("water-edge-n"),
            ("water".to_string(), "edge_n".to_string())
        );
        assert_eq!(
            split_name("tile"),
            ("tile".to_string(), BASE_VARIANT.to_string())
        );
        assert_eq!(
            split_name("__lava__"),
            ("lava".to_string(), BASE_VARIANT.to_string())
        );
    }

    // Tests groups appear in key order with sorted variants
    // Verified by ordering groups by tile count
    #[test]
    fn test_groups_in_key_order() {
        let named: BTreeMap<String, usize> = [
            ("water.center", 3),
            ("grass.island", 0),
            ("grass.center", 1),
            ("water.island", 2),
        ]
        .into_iter()
        .map(|(name, index)| (name.to_string(), index))
        .collect();

        let groups = build_groups(&named, &strings(&["grass", "water"]), &[], None);
        let labels: Vec<&str> = groups.iter().map(|group| group.label.as_str()).collect();
        assert_eq!(labels, vec!["grass", "water"]);

        let grass = groups.first().expect("grass group");
        assert_eq!(grass.variants, vec!["center", "island"]);
        assert_eq!(grass.tiles.get("island"), Some(&0));
        assert_eq!(grass.tile_count, 2);
        assert_eq!(grass.materials, Some(vec!["grass".to_string()]));
        assert_eq!(grass.themes, None);
        assert_eq!(grass.description, "grass tiles (2 variants)");
    }

    // Tests a lone candidate is inherited even without a name relation
    // Verified by requiring a substring match
    #[test]
    fn test_single_candidate_is_inherited() {
        let named: BTreeMap<String, usize> = [("tile_0".to_string(), 0)].into_iter().collect();
        let groups = build_groups(&named, &strings(&["stone"]), &strings(&["dungeon"]), None);

        let tile = groups.first().expect("one group");
        assert_eq!(tile.materials, Some(vec!["stone".to_string()]));
        assert_eq!(tile.themes, Some(vec!["dungeon".to_string()]));
        assert_eq!(tile.variants, vec!["0"]);
        assert_eq!(tile.description, "tile tiles (1 variant)");
    }

    // Tests ambiguous candidates are not inherited
    // Verified by inheriting the first candidate
    #[test]
    fn test_ambiguous_candidates() {
        let named: BTreeMap<String, usize> = [("tile_0".to_string(), 0)].into_iter().collect();
        let groups = build_groups(&named, &strings(&["stone", "sand"]), &[], None);

        assert_eq!(groups.first().and_then(|group| group.materials.clone()), None);
    }

    // Tests only a group holding the full canonical set carries the system
    // Verified by tagging every group with the asset system
    #[test]
    fn test_canonical_set_carries_system() {
        let mut named: BTreeMap<String, usize> = BLOB16_NAMES
            .iter()
            .enumerate()
            .map(|(index, name)| (format!("grass.{name}"), index))
            .collect();
        named.insert("water.island".to_string(), 16);

        let groups = build_groups(&named, &[], &[], Some(AutoTileSystem::Blob16));
        let grass = groups.iter().find(|group| group.label == "grass").expect("grass");
        let water = groups.iter().find(|group| group.label == "water").expect("water");

        assert_eq!(grass.auto_tile_system, Some(AutoTileSystem::Blob16));
        assert_eq!(grass.description, "grass blob16 auto-tile set (16 variants)");
        assert_eq!(water.auto_tile_system, None);

        let wang = build_groups(&named, &[], &[], Some(AutoTileSystem::Wang));
        assert!(wang.iter().all(|group| group.auto_tile_system.is_none()));
    }
}

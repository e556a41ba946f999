//! Tests for persisted metadata records

#[cfg(test)]
mod tests {
    use tilesense::algorithm::metadata::{ManualOverride, TilesetMetadata};
    use tilesense::analysis::seams::SeamQuality;
    use tilesense::spatial::grid::GridSpec;

    // Tests minimal metadata carries only numeric facts and the reason
    // Verified by leaving the warnings empty
    #[test]
    fn test_minimal_metadata() {
        let grid = GridSpec::fit(64, 32, 16, 16, 0, 0);
        let metadata = TilesetMetadata::minimal(64, 32, grid, "analysis timed out");

        assert_eq!(metadata.tile_count, 8);
        assert!(metadata.named_tiles.is_empty());
        assert!(metadata.tile_groups.is_empty());
        assert_eq!(metadata.auto_tile_system, None);
        assert_eq!(metadata.validation.seam_quality, SeamQuality::Unchecked);
        assert!(metadata.validation.grid_dimensions_valid);
        assert_eq!(metadata.validation.warnings, vec!["analysis timed out"]);
        assert!(metadata.detection_confidence.overall.abs() < f64::EPSILON);
        assert!(metadata.group("tile").is_none());
    }

    // Tests field names serialize in camelCase and empty systems are omitted
    // Verified by serializing with the Rust field names
    #[test]
    fn test_json_field_names() {
        let grid = GridSpec::fit(32, 32, 16, 16, 0, 0);
        let metadata = TilesetMetadata::minimal(32, 32, grid, "note");
        let json = serde_json::to_value(&metadata).expect("serializes");

        assert_eq!(json["imageWidth"], 32);
        assert_eq!(json["tileCount"], 4);
        assert_eq!(json["grid"]["tileWidth"], 16);
        assert_eq!(json["validation"]["seamQuality"], "unchecked");
        assert_eq!(json["validation"]["gridDimensionsValid"], true);
        assert!(json["detectionConfidence"]["autoTilePattern"].is_number());
        assert!(json.get("autoTileSystem").is_none());

        let decoded: TilesetMetadata = serde_json::from_value(json).expect("deserializes");
        assert_eq!(decoded, metadata);
    }

    // Tests overrides read from camelCase JSON with an optional category
    // Verified by requiring the category field
    #[test]
    fn test_override_json() {
        let parsed: Vec<ManualOverride> = serde_json::from_str(
            r#"[{"tileIndex": 3, "semanticName": "corner_ne", "category": "grass"},
                {"tileIndex": 4, "semanticName": "flower"}]"#,
        )
        .expect("parses");

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.first().map(|o| o.tile_index), Some(3));
        assert_eq!(parsed.get(1).map(|o| o.category.as_str()), Some(""));
    }
}

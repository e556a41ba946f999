//! Tests for histogram-based theme and material inference

#[cfg(test)]
mod tests {
    use tilesense::analysis::color::{ColorHistograms, classify_colors, infer_from_tile_count};
    use tilesense::analysis::patterns::AutoTileSystem;
    use tilesense::spatial::raster::{RasterImage, TRANSPARENT};

    // Tests a mostly green sheet reads as forest grass
    // Verified by counting grey samples towards the hue ratio
    #[test]
    fn test_green_sheet_is_forest() {
        let mut image = RasterImage::filled(10, 10, [0, 200, 0, 255]);
        image.fill_rect(0, 8, 10, 2, [128, 128, 128, 255]);

        let histograms = ColorHistograms::from_image(&image);
        assert_eq!(histograms.samples, 25);

        let classification = classify_colors(&image);
        let top = classification.themes.first().expect("a theme fired");
        assert_eq!(top.theme, "forest");
        assert!((top.confidence - 0.8).abs() < 1e-9);
        assert!(classification.materials.contains(&"grass".to_string()));
        assert!(!classification.themes.iter().any(|theme| theme.theme == "dungeon"));
    }

    // Tests light blue splits to snow rather than water
    // Verified by ignoring lightness for blue hues
    #[test]
    fn test_light_blue_is_snow() {
        let image = RasterImage::filled(8, 8, [180, 200, 255, 255]);
        let classification = classify_colors(&image);

        assert_eq!(classification.top_confidence(), Some(0.8));
        let names: Vec<&str> = classification
            .themes
            .iter()
            .map(|theme| theme.theme.as_str())
            .collect();
        assert_eq!(names, vec!["snow"]);
        assert_eq!(classification.materials, vec!["water".to_string()]);
    }

    // Tests a mid grey sheet reads as dungeon stone
    // Verified by binning greys at hue zero
    #[test]
    fn test_grey_sheet_is_dungeon_stone() {
        let image = RasterImage::filled(8, 8, [128, 128, 128, 255]);
        let classification = classify_colors(&image);

        assert_eq!(classification.top_confidence(), Some(0.7));
        assert_eq!(classification.materials, vec!["stone".to_string()]);
        assert!(classification.average_saturation.abs() < f64::EPSILON);
    }

    fn fired_themes(image: &RasterImage) -> (Vec<String>, Vec<f64>) {
        classify_colors(image)
            .themes
            .into_iter()
            .map(|theme| (theme.theme, theme.confidence))
            .unzip()
    }

    // Tests a dark saturated blue sheet reads as water at the water cap
    // Verified by routing every blue sheet to snow
    #[test]
    fn test_deep_blue_is_water() {
        let image = RasterImage::filled(8, 8, [30, 60, 160, 255]);
        let classification = classify_colors(&image);

        assert_eq!(fired_themes(&image), (vec!["water".to_string()], vec![0.85]));
        assert_eq!(classification.materials, vec!["water".to_string()]);
    }

    // Tests a pale yellow sheet reads as desert sand at the desert cap
    // Verified by dropping the yellow hue rule
    #[test]
    fn test_yellow_sheet_is_desert_sand() {
        let image = RasterImage::filled(8, 8, [220, 200, 120, 255]);
        let classification = classify_colors(&image);

        assert_eq!(fired_themes(&image), (vec!["desert".to_string()], vec![0.85]));
        assert_eq!(classification.materials, vec!["sand".to_string()]);
    }

    // Tests dark red fires lava while light red only keeps the lava material
    // Verified by ignoring lightness in the lava theme rule
    #[test]
    fn test_lava_requires_dark_red() {
        let dark = RasterImage::filled(8, 8, [160, 30, 10, 255]);
        assert_eq!(fired_themes(&dark), (vec!["lava".to_string()], vec![0.9]));
        assert_eq!(classify_colors(&dark).materials, vec!["lava".to_string()]);

        let light = RasterImage::filled(8, 8, [255, 120, 100, 255]);
        let classification = classify_colors(&light);
        assert!(classification.themes.is_empty());
        assert_eq!(classification.materials, vec!["lava".to_string()]);
    }

    // Tests brown reads as dirt rather than lava material
    // Verified by widening the lava material hue band
    #[test]
    fn test_brown_sheet_is_dirt() {
        let image = RasterImage::filled(8, 8, [120, 80, 40, 255]);
        let classification = classify_colors(&image);

        assert_eq!(classification.materials, vec!["dirt".to_string()]);
        assert_eq!(fired_themes(&image).0, vec!["lava".to_string()]);
    }

    // Tests uniform sheets never exceed the per-rule confidence caps
    // Verified by using the raw hue ratio as confidence
    #[test]
    fn test_rule_confidence_caps() {
        let cases: [([u8; 4], &str, f64); 5] = [
            ([0, 200, 0, 255], "forest", 0.9),
            ([180, 200, 255, 255], "snow", 0.8),
            ([30, 60, 160, 255], "water", 0.85),
            ([220, 200, 120, 255], "desert", 0.85),
            ([160, 30, 10, 255], "lava", 0.9),
        ];
        for (color, theme, cap) in cases {
            let classification = classify_colors(&RasterImage::filled(8, 8, color));
            let fired = classification
                .themes
                .iter()
                .find(|matched| matched.theme == theme)
                .unwrap_or_else(|| panic!("{theme} should fire"));
            assert!((fired.confidence - cap).abs() < 1e-9, "{theme}: {}", fired.confidence);
        }
    }

    // Tests independent rules co-fire and are ordered by confidence
    // Verified by keeping only the first matching theme
    #[test]
    fn test_mossy_stone_fires_forest_and_dungeon() {
        let mut image = RasterImage::filled(8, 8, [100, 140, 100, 255]);
        image.fill_rect(0, 4, 8, 4, [128, 128, 128, 255]);

        let classification = classify_colors(&image);
        let (names, confidences) = fired_themes(&image);
        assert_eq!(names, vec!["dungeon".to_string(), "forest".to_string()]);
        assert!((confidences.first().copied().unwrap_or_default() - 0.7).abs() < 1e-9);
        assert!((confidences.get(1).copied().unwrap_or_default() - 0.5).abs() < 1e-9);
        assert!(confidences.is_sorted_by(|a, b| a >= b));
        assert_eq!(
            classification.materials,
            vec!["grass".to_string(), "stone".to_string()]
        );
    }

    // Tests fully transparent images produce no classification
    // Verified by sampling translucent pixels
    #[test]
    fn test_transparent_image() {
        let image = RasterImage::filled(8, 8, TRANSPARENT);
        let classification = classify_colors(&image);

        assert!(classification.themes.is_empty());
        assert!(classification.materials.is_empty());
        assert_eq!(classification.top_confidence(), None);
    }

    // Tests tile count inference table
    // Verified by checking the wang rule before blob16
    #[test]
    fn test_infer_from_tile_count() {
        assert_eq!(
            infer_from_tile_count(16),
            Some((AutoTileSystem::Blob16, 0.95))
        );
        assert_eq!(
            infer_from_tile_count(47),
            Some((AutoTileSystem::Blob47, 0.9))
        );
        assert_eq!(
            infer_from_tile_count(48),
            Some((AutoTileSystem::Blob47, 0.9))
        );
        assert_eq!(infer_from_tile_count(32), Some((AutoTileSystem::Wang, 0.6)));
        assert_eq!(
            infer_from_tile_count(272),
            Some((AutoTileSystem::Custom, 0.4))
        );
        assert_eq!(infer_from_tile_count(5), Some((AutoTileSystem::Custom, 0.4)));
        assert_eq!(infer_from_tile_count(1), None);
        assert_eq!(infer_from_tile_count(5000), None);
    }
}

//! Tests for grid geometry resolution, validation and auto-detection

#[cfg(test)]
mod tests {
    use tilesense::AnalysisError;
    use tilesense::spatial::grid::{
        GridMethod, GridParams, GridSpec, common_divisors, resolve_grid, score_candidate,
        separator_line_score,
    };
    use tilesense::spatial::raster::RasterImage;

    const OPAQUE: [u8; 4] = [120, 160, 90, 255];

    // Tests explicit parameters produce the expected column/row counts
    // Verified by dropping spacing from the span calculation
    #[test]
    fn test_explicit_grid_with_spacing() {
        // 16px tiles with a 1px gutter, 17px step
        let image = RasterImage::filled(67, 16, OPAQUE);
        let resolved = resolve_grid(&image, &GridParams::explicit(16, 16, 1, 0))
            .expect("explicit grid should resolve");

        assert_eq!(resolved.method, GridMethod::Explicit);
        assert_eq!(resolved.spec.columns, 4);
        assert_eq!(resolved.spec.rows, 1);
        assert_eq!(resolved.spec.tile_count, 4);
        assert!((resolved.confidence - 1.0).abs() < f64::EPSILON);
    }

    // Tests a single given dimension is mirrored to the other
    // Verified by defaulting the missing dimension to zero
    #[test]
    fn test_single_dimension_is_mirrored() {
        let image = RasterImage::filled(64, 64, OPAQUE);
        let params = GridParams {
            tile_width: Some(16),
            ..GridParams::auto()
        };
        let resolved = resolve_grid(&image, &params).expect("grid should resolve");
        assert_eq!(resolved.spec.tile_height, 16);
        assert_eq!(resolved.spec.tile_count, 16);
    }

    // Tests every violated constraint is itemised in one error
    // Verified by returning on the first violation
    #[test]
    fn test_invalid_explicit_grid_lists_all_violations() {
        let image = RasterImage::filled(32, 32, OPAQUE);
        let result = resolve_grid(&image, &GridParams::explicit(0, 64, -1, -2));

        match result {
            Err(AnalysisError::InvalidGridConfig { violations }) => {
                assert_eq!(violations.len(), 4, "violations: {violations:?}");
                assert!(violations.iter().any(|v| v.contains("tileWidth")));
                assert!(violations.iter().any(|v| v.contains("tileHeight")));
                assert!(violations.iter().any(|v| v.contains("spacing")));
                assert!(violations.iter().any(|v| v.contains("margin")));
            }
            other => panic!("expected InvalidGridConfig, got {other:?}"),
        }
    }

    // Tests a margin that leaves no room for a whole tile is rejected
    // Verified by accepting zero-tile grids
    #[test]
    fn test_no_whole_tile_fits() {
        let image = RasterImage::filled(20, 20, OPAQUE);
        let result = resolve_grid(&image, &GridParams::explicit(16, 16, 0, 4));
        assert!(matches!(
            result,
            Err(AnalysisError::InvalidGridConfig { .. })
        ));
    }

    // Tests advisories for leftover pixels and non-multiple-of-8 tiles
    // Verified by skipping the leftover check
    #[test]
    fn test_advisories_are_reported() {
        let image = RasterImage::filled(50, 40, OPAQUE);
        let resolved = resolve_grid(&image, &GridParams::explicit(12, 20, 0, 0))
            .expect("grid should resolve");

        assert_eq!(resolved.spec.columns, 4);
        assert!(resolved.advisories.iter().any(|a| a.contains("2px of image width")));
        assert!(resolved.advisories.iter().any(|a| a.contains("not a multiple of 8")));
    }

    // Tests auto-detection keeps the smallest candidate on score ties
    // Verified by using >= in the candidate comparison
    #[test]
    fn test_auto_detect_prefers_smallest_tied_candidate() {
        let image = RasterImage::filled(64, 64, OPAQUE);
        let resolved = resolve_grid(&image, &GridParams::auto()).expect("auto never fails");

        assert_eq!(resolved.method, GridMethod::AutoDetected);
        assert_eq!(resolved.spec.tile_width, 8);
        assert_eq!(resolved.spec.spacing, 0);
        assert_eq!(resolved.spec.margin, 0);
    }

    // Tests detection is idempotent when fed its own output as explicit params
    // Verified by letting explicit mode re-run auto-detection
    #[test]
    fn test_auto_detect_is_idempotent() {
        let image = RasterImage::filled(96, 48, OPAQUE);
        let first = resolve_grid(&image, &GridParams::auto()).expect("auto never fails");
        let second = resolve_grid(&image, &GridParams::from(&first.spec))
            .expect("explicit re-run should resolve");
        assert_eq!(first.spec, second.spec);
    }

    // Tests images too small for any candidate fall back to the unclamped default size
    // Verified by clamping the default tile to the image
    #[test]
    fn test_tiny_image_uses_default_fallback() {
        let image = RasterImage::filled(7, 200, OPAQUE);
        let resolved = resolve_grid(&image, &GridParams::auto()).expect("auto never fails");

        assert_eq!(resolved.method, GridMethod::DefaultFallback);
        assert!(resolved.method.is_fallback());
        assert_eq!(resolved.spec.tile_width, 32);
        assert_eq!(resolved.spec.tile_height, 32);
        assert_eq!(resolved.spec.tile_count, 0);
        assert!((resolved.confidence - 0.3).abs() < f64::EPSILON);
        assert!(resolved.advisories.iter().any(|a| a.contains("7px of image width")));
    }

    // Tests a gutter wider than the image leaves a single tile instead of overflowing
    // Verified by adding spacing to the span without an overflow check
    #[test]
    fn test_huge_spacing_fits_one_tile() {
        let image = RasterImage::filled(64, 64, OPAQUE);
        let params = GridParams::explicit(16, 16, i64::from(u32::MAX), 0);
        let resolved = resolve_grid(&image, &params).expect("one tile still fits");

        assert_eq!(resolved.spec.columns, 1);
        assert_eq!(resolved.spec.rows, 1);
        assert_eq!(resolved.spec.tile_count, 1);
        assert_eq!(resolved.spec.step_x(), u32::MAX);
        assert!(resolved.spec.validate(64, 64).is_ok());
    }

    // Tests common divisors are restricted to the fallback range and sorted
    // Verified by including divisors below 8
    #[test]
    fn test_common_divisors() {
        assert_eq!(common_divisors(48, 32), vec![8, 16]);
        assert_eq!(common_divisors(100, 60), vec![10, 20]);
        assert!(common_divisors(7, 13).is_empty());
    }

    // Tests candidate scoring rewards full coverage
    // Verified by inverting the leftover term
    #[test]
    fn test_score_candidate_full_coverage() {
        let image = RasterImage::filled(64, 64, OPAQUE);
        let exact = GridSpec::fit(64, 64, 16, 16, 0, 0);
        let loose = GridSpec::fit(64, 64, 24, 24, 0, 0);

        let exact_score = score_candidate(&image, &exact);
        assert!((exact_score - 0.9).abs() < 1e-9);
        assert!(score_candidate(&image, &loose) < exact_score);
    }

    // Tests dark gutters are detected between tiles
    // Verified by sampling tile interiors instead of gutters
    #[test]
    fn test_separator_line_score_counts_dark_gutters() {
        let mut image = RasterImage::filled(33, 16, OPAQUE);
        image.fill_rect(16, 0, 1, 16, [0, 0, 0, 255]);
        let spec = GridSpec::fit(33, 16, 16, 16, 1, 0);

        assert_eq!(spec.columns, 2);
        assert!((separator_line_score(&image, &spec) - 1.0).abs() < f64::EPSILON);

        let no_gutter = GridSpec::fit(32, 16, 16, 16, 0, 0);
        assert!(separator_line_score(&image, &no_gutter).abs() < f64::EPSILON);
    }

    // Tests validation catches a tile count that disagrees with rows x columns
    // Verified by removing the product check
    #[test]
    fn test_validate_rejects_inconsistent_count() {
        let mut spec = GridSpec::fit(32, 32, 16, 16, 0, 0);
        assert!(spec.validate(32, 32).is_ok());
        spec.tile_count = 3;
        assert!(spec.validate(32, 32).is_err());
        assert!(GridSpec::fit(32, 32, 16, 16, 0, 0).validate(16, 16).is_err());
    }
}

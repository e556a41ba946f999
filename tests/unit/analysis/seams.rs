//! Tests for first-tile seam checking

#[cfg(test)]
mod tests {
    use tilesense::analysis::seams::{SeamQuality, check_seams};
    use tilesense::spatial::raster::RasterImage;
    use tilesense::spatial::tiles::TileSlice;

    const FIRST: TileSlice = TileSlice {
        index: 0,
        x: 0,
        y: 0,
        width: 16,
        height: 16,
    };

    // Tests a uniform tile repeats cleanly
    // Verified by flipping the distance comparison
    #[test]
    fn test_uniform_tile_is_good() {
        let image = RasterImage::filled(32, 32, [100, 120, 140, 255]);
        let report = check_seams(&image, Some(&FIRST), 50.0);

        assert_eq!(report.quality, SeamQuality::Good);
        assert!(report.warnings.is_empty());
    }

    // Tests mismatched top and bottom rows are reported
    // Verified by comparing the top row with itself
    #[test]
    fn test_mismatched_edges_are_issues() {
        let mut image = RasterImage::filled(16, 16, [100, 120, 140, 255]);
        image.fill_rect(0, 15, 16, 1, [250, 10, 10, 255]);
        let report = check_seams(&image, Some(&FIRST), 50.0);

        assert_eq!(report.quality, SeamQuality::Issues);
        assert!(report.warnings.iter().any(|w| w.contains("top and bottom")));
        // The changed row touches the side columns only at one pixel each, on both sides
        assert!(!report.warnings.iter().any(|w| w.contains("left and right")));
    }

    // Tests small differences under the threshold are tolerated
    // Verified by using a zero threshold
    #[test]
    fn test_small_differences_are_tolerated() {
        let mut image = RasterImage::filled(16, 16, [100, 120, 140, 255]);
        image.fill_rect(0, 15, 16, 1, [110, 130, 150, 255]);
        assert_eq!(
            check_seams(&image, Some(&FIRST), 50.0).quality,
            SeamQuality::Good
        );
    }

    // Tests images without a whole tile are unchecked
    // Verified by reading pixels outside the image
    #[test]
    fn test_missing_tile_is_unchecked() {
        let image = RasterImage::filled(8, 8, [0, 0, 0, 255]);
        let unchecked = check_seams(&image, Some(&FIRST), 50.0);
        assert_eq!(unchecked.quality, SeamQuality::Unchecked);
        assert_eq!(unchecked.warnings.len(), 1);

        assert_eq!(check_seams(&image, None, 50.0).quality, SeamQuality::Unchecked);
        assert_eq!(SeamQuality::Unchecked.to_string(), "unchecked");
    }
}

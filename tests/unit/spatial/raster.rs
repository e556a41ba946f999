//! Tests for the decoded RGBA raster and tile similarity

#[cfg(test)]
mod tests {
    use tilesense::AnalysisError;
    use tilesense::spatial::raster::{RasterImage, TRANSPARENT};
    use tilesense::spatial::tiles::TileSlice;

    const fn slice(index: usize, x: u32, y: u32, size: u32) -> TileSlice {
        TileSlice {
            index,
            x,
            y,
            width: size,
            height: size,
        }
    }

    // Tests a row-major RGBA buffer is addressed as (x, y)
    // Verified by swapping row and column in pixel lookup
    #[test]
    fn test_from_rgba_addresses_pixels() {
        let mut data = vec![0_u8; 3 * 2 * 4];
        // Pixel (2, 1) is the last one
        if let Some(last) = data.get_mut(20..24) {
            last.copy_from_slice(&[1, 2, 3, 4]);
        }
        let image = RasterImage::from_rgba(3, 2, data).expect("buffer is well formed");

        assert_eq!(image.width(), 3);
        assert_eq!(image.height(), 2);
        assert_eq!(image.pixel(2, 1), Some([1, 2, 3, 4]));
        assert_eq!(image.alpha(2, 1), 4);
        assert_eq!(image.pixel(3, 0), None);
        assert_eq!(image.alpha(10, 10), 0);
    }

    // Tests malformed buffers are rejected as invalid image data
    // Verified by truncating silently instead of failing
    #[test]
    fn test_from_rgba_rejects_bad_buffers() {
        assert!(matches!(
            RasterImage::from_rgba(2, 2, vec![0; 15]),
            Err(AnalysisError::InvalidImageData { .. })
        ));
        assert!(matches!(
            RasterImage::from_rgba(0, 2, Vec::new()),
            Err(AnalysisError::InvalidImageData { .. })
        ));
    }

    // Tests rectangles are clipped to the image when painted
    // Verified by removing the bounds clamp
    #[test]
    fn test_fill_rect_clips() {
        let mut image = RasterImage::filled(4, 4, TRANSPARENT);
        image.fill_rect(2, 2, 10, 10, [9, 9, 9, 255]);

        assert_eq!(image.pixel(3, 3), Some([9, 9, 9, 255]));
        assert_eq!(image.pixel(1, 1), Some(TRANSPARENT));
    }

    // Tests cropping copies the tile's pixels into a standalone image
    // Verified by offsetting the crop origin
    #[test]
    fn test_crop_copies_tile() {
        let mut image = RasterImage::filled(8, 4, TRANSPARENT);
        image.fill_rect(4, 0, 4, 4, [200, 10, 10, 255]);
        let tile = image.crop(&slice(1, 4, 0, 4));

        assert_eq!(tile.dimensions(), (4, 4));
        assert_eq!(tile.get_pixel(0, 0).0, [200, 10, 10, 255]);
    }

    // Tests similarity is one for identical tiles and drops with difference
    // Verified by ignoring the alpha channel
    #[test]
    fn test_tile_similarity() {
        let mut image = RasterImage::filled(48, 16, [50, 100, 150, 255]);
        image.fill_rect(32, 0, 16, 16, TRANSPARENT);

        let identical = image.tile_similarity(&slice(0, 0, 0, 16), &slice(1, 16, 0, 16));
        let different = image.tile_similarity(&slice(0, 0, 0, 16), &slice(2, 32, 0, 16));

        assert!((identical - 1.0).abs() < f64::EPSILON);
        let expected = 1.0 - (50.0 + 100.0 + 150.0 + 255.0) / 255.0 / 4.0;
        assert!((different - expected).abs() < 1e-9);
    }

    // Tests tiles entirely outside the image score zero
    // Verified by returning one for empty comparisons
    #[test]
    fn test_tile_similarity_outside_image() {
        let image = RasterImage::filled(16, 16, [1, 1, 1, 255]);
        assert!(image.tile_similarity(&slice(0, 0, 0, 16), &slice(1, 64, 64, 16)).abs() < f64::EPSILON);
    }
}

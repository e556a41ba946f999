//! Tests for RGB to HSL conversion and color distances

#[cfg(test)]
mod tests {
    use tilesense::math::color_space::{mean_rgb, rgb_distance, rgb_to_hsl};

    // Tests primary colors map to their textbook hues with full saturation
    // Verified by swapping the green and blue sector offsets
    #[test]
    fn test_primary_hues() {
        let red = rgb_to_hsl(255, 0, 0);
        let green = rgb_to_hsl(0, 255, 0);
        let blue = rgb_to_hsl(0, 0, 255);

        assert!(red.hue.is_some_and(|hue| hue.abs() < 1e-9));
        assert!(green.hue.is_some_and(|hue| (hue - 120.0).abs() < 1e-9));
        assert!(blue.hue.is_some_and(|hue| (hue - 240.0).abs() < 1e-9));
        assert!((red.saturation - 1.0).abs() < 1e-9);
        assert!((red.lightness - 0.5).abs() < 1e-9);
    }

    // Tests greys have no hue and zero saturation
    // Verified by returning hue 0 for achromatic colors
    #[test]
    fn test_grey_has_undefined_hue() {
        let grey = rgb_to_hsl(128, 128, 128);
        assert!(grey.hue.is_none());
        assert!(grey.saturation.abs() < f64::EPSILON);
        assert!((grey.lightness - 128.0 / 255.0).abs() < 1e-9);
    }

    // Tests magenta wraps into the upper hue range instead of going negative
    // Verified by removing the +6 sector correction
    #[test]
    fn test_hue_wraps_for_red_dominant_colors() {
        let magenta = rgb_to_hsl(255, 0, 128);
        let hue = magenta.hue.unwrap_or(-1.0);
        assert!(hue > 300.0 && hue < 360.0, "hue was {hue}");
    }

    // Tests Euclidean RGB distance ignores alpha
    // Verified by including the alpha channel in the sum
    #[test]
    fn test_rgb_distance_ignores_alpha() {
        let a = [0, 0, 0, 0];
        let b = [3, 4, 0, 255];
        assert!((rgb_distance(a, b) - 5.0).abs() < 1e-9);
        assert!(rgb_distance(b, b).abs() < f64::EPSILON);
    }

    // Tests mean RGB used for separator darkness
    // Verified by dividing by four channels
    #[test]
    fn test_mean_rgb() {
        assert!((mean_rgb([30, 60, 90, 0]) - 60.0).abs() < 1e-9);
    }
}

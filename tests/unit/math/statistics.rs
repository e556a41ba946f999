//! Tests for descriptive statistics helpers

#[cfg(test)]
mod tests {
    use tilesense::math::statistics::{coefficient_of_variation, mean, standard_deviation};

    // Tests mean and population standard deviation on a known sample
    // Verified by using the sample (n - 1) denominator
    #[test]
    fn test_mean_and_standard_deviation() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&values), Some(5.0));
        assert!(standard_deviation(&values).is_some_and(|sd| (sd - 2.0).abs() < 1e-9));
    }

    // Tests empty samples yield no statistics
    // Verified by returning zero for empty input
    #[test]
    fn test_empty_sample() {
        assert_eq!(mean(&[]), None);
        assert_eq!(standard_deviation(&[]), None);
        assert_eq!(coefficient_of_variation(&[]), None);
    }

    // Tests coefficient of variation is relative and undefined at zero mean
    // Verified by returning the raw standard deviation
    #[test]
    fn test_coefficient_of_variation() {
        assert!(coefficient_of_variation(&[16.0, 16.0, 16.0]).is_some_and(|cv| cv.abs() < 1e-12));
        assert!(coefficient_of_variation(&[10.0, 30.0]).is_some_and(|cv| (cv - 0.5).abs() < 1e-9));
        assert_eq!(coefficient_of_variation(&[0.0, 0.0]), None);
    }
}

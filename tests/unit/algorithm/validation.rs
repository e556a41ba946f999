//! Tests for the consolidated validation report

#[cfg(test)]
mod tests {
    use tilesense::algorithm::validation::{dedupe_warnings, summarize_validation};
    use tilesense::analysis::seams::{SeamQuality, SeamReport};
    use tilesense::spatial::grid::{GridMethod, GridSpec, ResolvedGrid};

    fn resolved(method: GridMethod, confidence: f64) -> ResolvedGrid {
        ResolvedGrid {
            spec: GridSpec::fit(64, 64, 16, 16, 0, 0),
            method,
            confidence,
            advisories: vec!["2 px of leftover width".to_string()],
        }
    }

    // Tests warning order and deduplication across stages
    // Verified by appending stage warnings before grid advisories
    #[test]
    fn test_summary_orders_and_dedupes() {
        let seams = SeamReport {
            quality: SeamQuality::Issues,
            warnings: vec!["top and bottom edges of the first tile do not match".to_string()],
        };
        let summary = summarize_validation(
            64,
            64,
            &resolved(GridMethod::DivisorFallback, 0.3),
            &seams,
            vec![
                "2 px of leftover width".to_string(),
                "  ".to_string(),
                "stage note".to_string(),
            ],
        );

        assert_eq!(
            summary.warnings,
            vec![
                "grid auto-detection fell back to 16x16 tiles (confidence 0.30)".to_string(),
                "2 px of leftover width".to_string(),
                "top and bottom edges of the first tile do not match".to_string(),
                "stage note".to_string(),
            ]
        );
        assert_eq!(summary.seam_quality, SeamQuality::Issues);
        assert!(summary.grid_dimensions_valid);
    }

    // Tests grids that do not fit the image are flagged
    // Verified by always reporting valid dimensions
    #[test]
    fn test_invalid_dimensions() {
        let summary = summarize_validation(
            32,
            32,
            &resolved(GridMethod::Explicit, 1.0),
            &SeamReport::default(),
            Vec::new(),
        );

        assert!(!summary.grid_dimensions_valid);
        assert_eq!(summary.seam_quality, SeamQuality::Unchecked);
        assert_eq!(summary.warnings, vec!["2 px of leftover width".to_string()]);
    }

    // Tests warnings are trimmed before comparison
    // Verified by comparing untrimmed text
    #[test]
    fn test_dedupe_warnings() {
        let unique = dedupe_warnings(vec![
            " a ".to_string(),
            "a".to_string(),
            String::new(),
            "b".to_string(),
        ]);
        assert_eq!(unique, vec!["a".to_string(), "b".to_string()]);
    }
}

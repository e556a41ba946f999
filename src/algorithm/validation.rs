//! Consolidated validation report

use crate::algorithm::metadata::ValidationSummary;
use crate::analysis::seams::SeamReport;
use crate::spatial::grid::ResolvedGrid;
use chrono::Utc;

/// Gather every stage's advisories into one report
///
/// Grid observations come first, then seam findings, then the remaining
/// stage warnings in the order given. Duplicates keep their first position.
pub fn summarize_validation(
    image_width: u32,
    image_height: u32,
    grid: &ResolvedGrid,
    seams: &SeamReport,
    stage_warnings: impl IntoIterator<Item = String>,
) -> ValidationSummary {
    let mut warnings = Vec::new();

    if grid.method.is_fallback() {
        warnings.push(format!(
            "grid auto-detection fell back to {}x{} tiles (confidence {:.2})",
            grid.spec.tile_width, grid.spec.tile_height, grid.confidence
        ));
    }
    warnings.extend(grid.advisories.iter().cloned());
    warnings.extend(seams.warnings.iter().cloned());
    warnings.extend(stage_warnings);

    ValidationSummary {
        seam_quality: seams.quality,
        grid_dimensions_valid: grid.spec.validate(image_width, image_height).is_ok(),
        warnings: dedupe_warnings(warnings),
        checked_at: Utc::now(),
    }
}

/// Drop repeated warnings, keeping first occurrences in order
pub fn dedupe_warnings(warnings: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(warnings.len());
    for warning in warnings {
        let trimmed = warning.trim();
        if !trimmed.is_empty() && !unique.iter().any(|existing| existing == trimmed) {
            unique.push(trimmed.to_string());
        }
    }
    unique
}

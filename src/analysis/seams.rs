//! Edge continuity check for repeating tiles

use crate::math::color_space::rgb_distance;
use crate::spatial::raster::RasterImage;
use crate::spatial::tiles::TileSlice;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a tile repeats without visible seams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeamQuality {
    /// Opposite edges match
    Good,
    /// At least one opposite edge pixel pair differs noticeably
    Issues,
    /// The image does not contain a whole tile
    #[default]
    Unchecked,
}

impl fmt::Display for SeamQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Good => "good",
            Self::Issues => "issues",
            Self::Unchecked => "unchecked",
        })
    }
}

/// Outcome of a seam check
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeamReport {
    /// Overall verdict
    pub quality: SeamQuality,
    /// Explanations for a non-good verdict
    pub warnings: Vec<String>,
}

/// Compare the first tile's top row to its bottom row and left column to right column
///
/// Any pixel pair further apart than `threshold` in RGB space marks the
/// tile as having seam issues.
pub fn check_seams(image: &RasterImage, first_tile: Option<&TileSlice>, threshold: f64) -> SeamReport {
    let Some(tile) = first_tile.filter(|tile| {
        tile.width > 0
            && tile.height > 0
            && tile.right() <= image.width()
            && tile.bottom() <= image.height()
    }) else {
        return SeamReport {
            quality: SeamQuality::Unchecked,
            warnings: vec!["image is smaller than one tile; seams were not checked".to_string()],
        };
    };

    let last_row = tile.bottom() - 1;
    let last_col = tile.right() - 1;

    let vertical_seam = (tile.x..tile.right()).any(|x| {
        matches!(
            (image.pixel(x, tile.y), image.pixel(x, last_row)),
            (Some(top), Some(bottom)) if rgb_distance(top, bottom) > threshold
        )
    });
    let horizontal_seam = (tile.y..tile.bottom()).any(|y| {
        matches!(
            (image.pixel(tile.x, y), image.pixel(last_col, y)),
            (Some(left), Some(right)) if rgb_distance(left, right) > threshold
        )
    });

    let mut warnings = Vec::new();
    if vertical_seam {
        warnings.push("top and bottom edges of the first tile do not match".to_string());
    }
    if horizontal_seam {
        warnings.push("left and right edges of the first tile do not match".to_string());
    }

    SeamReport {
        quality: if warnings.is_empty() {
            SeamQuality::Good
        } else {
            SeamQuality::Issues
        },
        warnings,
    }
}

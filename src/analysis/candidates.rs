//! Quick scan for 4x4 blocks of solid tiles that may hold an auto-tile set
//!
//! Only tile centres are sampled, which makes this cheap enough to run on
//! large sheets before any similarity scoring.

use crate::io::configuration::OCCUPANCY_ALPHA;
use crate::spatial::grid::GridSpec;
use crate::spatial::raster::RasterImage;
use crate::spatial::tiles::tile_at;
use serde::{Deserialize, Serialize};

/// A 4x4 window whose tile centres are all opaque
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoTileCandidate {
    /// Grid row of the window's top-left tile
    pub row: u32,
    /// Grid column of the window's top-left tile
    pub col: u32,
    /// Pixel x of the window
    pub x: u32,
    /// Pixel y of the window
    pub y: u32,
    /// Mean RGB of the sampled centres
    pub average_color: [u8; 3],
    /// Rough material guess from the mean color
    pub label: String,
}

/// Rough material name for an average color
pub fn label_color([r, g, b]: [u8; 3]) -> &'static str {
    if g > r && g > b && g > 100 {
        "grass"
    } else if r > 100 && g > 100 && b < 100 {
        "dirt"
    } else if r < 100 && g < 100 && b > 100 {
        "water"
    } else if (r > 100 && g > 100 && b > 100)
        || (r.abs_diff(g) < 30 && g.abs_diff(b) < 30 && r > 80)
    {
        "stone"
    } else {
        "unknown"
    }
}

/// Find every 4x4 window of opaque tile centres
pub fn scan_autotile_candidates(image: &RasterImage, grid: &GridSpec) -> Vec<AutoTileCandidate> {
    if grid.rows < 4 || grid.columns < 4 {
        return Vec::new();
    }

    let mut candidates = Vec::new();
    for start_row in 0..=grid.rows - 4 {
        for start_col in 0..=grid.columns - 4 {
            let Some(average_color) = window_center_average(image, grid, start_row, start_col)
            else {
                continue;
            };
            let origin = tile_at(grid, start_row, start_col);
            candidates.push(AutoTileCandidate {
                row: start_row,
                col: start_col,
                x: origin.x,
                y: origin.y,
                average_color,
                label: label_color(average_color).to_string(),
            });
        }
    }
    candidates
}

// None as soon as any centre is transparent
fn window_center_average(
    image: &RasterImage,
    grid: &GridSpec,
    start_row: u32,
    start_col: u32,
) -> Option<[u8; 3]> {
    let mut sums = [0_u32; 3];
    for row in start_row..start_row + 4 {
        for col in start_col..start_col + 4 {
            let tile = tile_at(grid, row, col);
            let pixel = image.pixel(tile.x + tile.width / 2, tile.y + tile.height / 2)?;
            if pixel[3] < OCCUPANCY_ALPHA {
                return None;
            }
            for (sum, channel) in sums.iter_mut().zip(pixel) {
                *sum += u32::from(channel);
            }
        }
    }
    Some(sums.map(|sum| (sum / 16) as u8))
}

//! Freeform sprite region detection by connected-component analysis
//!
//! Works on raw pixels and ignores any tiling grid. Occupied pixels (alpha
//! above a small threshold) are grouped by an 8-connected flood fill driven
//! by an explicit stack, so very large sprites cannot exhaust the call stack.
//! Nearby components are merged, then every survivor is snapped outward to
//! a coarse pixel grid so the result is convenient to edit by hand.

use crate::algorithm::metadata::SpriteSelection;
use crate::algorithm::renaming::clean_identifier;
use crate::io::configuration::{
    AnalysisConfig, GRID_LIKE_MAX_VARIATION, GRID_LIKE_MIN_FILL, GRID_LIKE_MIN_REGIONS,
    OCCUPANCY_ALPHA,
};
use crate::math::statistics::{coefficient_of_variation, mean};
use crate::spatial::raster::RasterImage;
use bitvec::prelude::*;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Bounding box of a detected sprite
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectedRegion {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Number of occupied pixels inside the region
    pub area: u64,
    /// Fill density of the original component in `[0, 1]`
    pub confidence: f64,
}

impl DetectedRegion {
    /// Exclusive right edge
    pub const fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge
    pub const fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Whether the two boxes overlap or touch once both are padded
    pub const fn touches(&self, other: &Self, padding: u32) -> bool {
        let reach = padding * 2;
        self.x <= other.right() + reach
            && other.x <= self.right() + reach
            && self.y <= other.bottom() + reach
            && other.y <= self.bottom() + reach
    }

    /// Bounding-box union keeping the stronger confidence
    pub fn union(&self, other: &Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self {
            x,
            y,
            width: right - x,
            height: bottom - y,
            area: self.area + other.area,
            confidence: self.confidence.max(other.confidence),
        }
    }

    /// Grow the box outward so every edge lies on a multiple of `grid`
    pub const fn snapped(&self, grid: u32) -> Self {
        if grid <= 1 {
            return *self;
        }
        let x = self.x / grid * grid;
        let y = self.y / grid * grid;
        let right = self.right().div_ceil(grid) * grid;
        let bottom = self.bottom().div_ceil(grid) * grid;
        Self {
            x,
            y,
            width: right - x,
            height: bottom - y,
            area: self.area,
            confidence: self.confidence,
        }
    }
}

/// Tuning for region segmentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentationConfig {
    /// Components narrower or shorter than this are discarded
    pub min_region_size: u32,
    /// Padding used when deciding whether two regions merge
    pub merge_padding: u32,
    /// Pixel grid survivors are snapped to
    pub snap_size: u32,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self::from(&AnalysisConfig::default())
    }
}

impl From<&AnalysisConfig> for SegmentationConfig {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            min_region_size: config.min_region_size,
            merge_padding: config.merge_padding,
            snap_size: config.snap_size,
        }
    }
}

/// Regions found in an image plus a layout judgement
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segmentation {
    /// Merged and snapped regions ordered top-to-bottom, left-to-right
    pub regions: Vec<DetectedRegion>,
    /// Whether the regions look like a regular sprite grid
    pub grid_like: bool,
    /// Rounded average region size when grid-like
    pub suggested_tile_size: Option<(u32, u32)>,
}

impl Segmentation {
    /// No qualifying regions; callers should fall back to manual selection
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Turn regions into editable sprite selections named after the asset
    pub fn to_selections(&self, asset_base: &str) -> Vec<SpriteSelection> {
        let base = clean_identifier(asset_base);
        self.regions
            .iter()
            .enumerate()
            .map(|(i, region)| SpriteSelection {
                id: format!("region-{i}"),
                name: format!("{base}_sprite_{i}"),
                x: region.x,
                y: region.y,
                width: region.width,
                height: region.height,
            })
            .collect()
    }
}

/// Occupancy map indexed `(row, col)`
pub fn occupancy_map(image: &RasterImage) -> Array2<bool> {
    Array2::from_shape_fn(
        (image.height() as usize, image.width() as usize),
        |(row, col)| image.alpha(col as u32, row as u32) > OCCUPANCY_ALPHA,
    )
}

/// Find, merge and snap freeform sprite regions
pub fn segment_regions(image: &RasterImage, config: &SegmentationConfig) -> Segmentation {
    let occupancy = occupancy_map(image);
    let (rows, cols) = occupancy.dim();
    let mut visited = bitvec![0; rows * cols];
    let mut components = Vec::new();

    for row in 0..rows {
        for col in 0..cols {
            let occupied = occupancy.get((row, col)).copied().unwrap_or(false);
            let seen = visited.get(row * cols + col).as_deref() == Some(&true);
            if occupied && !seen {
                components.push(flood_fill(&occupancy, &mut visited, row, col));
            }
        }
    }

    let component_count = components.len();
    components.retain(|region| {
        region.width >= config.min_region_size && region.height >= config.min_region_size
    });

    let mut regions: Vec<DetectedRegion> = merge_regions(components, config.merge_padding)
        .iter()
        .map(|region| region.snapped(config.snap_size))
        .collect();
    regions.sort_by_key(|region| (region.y, region.x));

    let (grid_like, suggested_tile_size) = classify_layout(&regions);

    debug!(
        components = component_count,
        regions = regions.len(),
        grid_like,
        "segmented sprite regions"
    );

    Segmentation {
        regions,
        grid_like,
        suggested_tile_size,
    }
}

// 8-connected fill from a seed using an explicit worklist
fn flood_fill(
    occupancy: &Array2<bool>,
    visited: &mut BitVec,
    seed_row: usize,
    seed_col: usize,
) -> DetectedRegion {
    let (rows, cols) = occupancy.dim();
    let mut stack = vec![(seed_row, seed_col)];
    visited.set(seed_row * cols + seed_col, true);

    let (mut min_row, mut max_row) = (seed_row, seed_row);
    let (mut min_col, mut max_col) = (seed_col, seed_col);
    let mut area = 0_u64;

    while let Some((row, col)) = stack.pop() {
        area += 1;
        min_row = min_row.min(row);
        max_row = max_row.max(row);
        min_col = min_col.min(col);
        max_col = max_col.max(col);

        for dr in -1_isize..=1 {
            for dc in -1_isize..=1 {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let (Some(nr), Some(nc)) =
                    (row.checked_add_signed(dr), col.checked_add_signed(dc))
                else {
                    continue;
                };
                if nr >= rows || nc >= cols {
                    continue;
                }
                let index = nr * cols + nc;
                let occupied = occupancy.get((nr, nc)).copied().unwrap_or(false);
                let seen = visited.get(index).as_deref() == Some(&true);
                if occupied && !seen {
                    visited.set(index, true);
                    stack.push((nr, nc));
                }
            }
        }
    }

    let width = (max_col - min_col + 1) as u32;
    let height = (max_row - min_row + 1) as u32;
    DetectedRegion {
        x: min_col as u32,
        y: min_row as u32,
        width,
        height,
        area,
        confidence: (area as f64 / (f64::from(width) * f64::from(height))).min(1.0),
    }
}

/// Repeatedly union any two regions whose padded boxes touch
pub fn merge_regions(mut regions: Vec<DetectedRegion>, padding: u32) -> Vec<DetectedRegion> {
    while let Some((keep, absorb)) = find_mergeable_pair(&regions, padding) {
        let other = regions.swap_remove(absorb);
        if let Some(region) = regions.get_mut(keep) {
            *region = region.union(&other);
        }
    }
    regions
}

// Returns (i, j) with i < j so removing j leaves i in place
fn find_mergeable_pair(regions: &[DetectedRegion], padding: u32) -> Option<(usize, usize)> {
    regions.iter().enumerate().find_map(|(i, a)| {
        regions
            .iter()
            .enumerate()
            .skip(i + 1)
            .find(|(_, b)| a.touches(b, padding))
            .map(|(j, _)| (i, j))
    })
}

/// Decide whether regions form a regular grid and suggest a tile size
pub fn classify_layout(regions: &[DetectedRegion]) -> (bool, Option<(u32, u32)>) {
    if regions.len() < GRID_LIKE_MIN_REGIONS {
        return (false, None);
    }

    let widths: Vec<f64> = regions.iter().map(|r| f64::from(r.width)).collect();
    let heights: Vec<f64> = regions.iter().map(|r| f64::from(r.height)).collect();

    let uniform = [&widths, &heights].iter().all(|values| {
        coefficient_of_variation(values).is_some_and(|cv| cv < GRID_LIKE_MAX_VARIATION)
    });

    let columns: BTreeSet<u32> = regions.iter().map(|r| r.x).collect();
    let rows: BTreeSet<u32> = regions.iter().map(|r| r.y).collect();
    let implied = (columns.len() * rows.len()) as f64;
    let filled = regions.len() as f64 >= GRID_LIKE_MIN_FILL * implied;

    if !(uniform && filled) {
        return (false, None);
    }

    let suggested = mean(&widths)
        .zip(mean(&heights))
        .map(|(w, h)| (w.round() as u32, h.round() as u32));
    (true, suggested)
}

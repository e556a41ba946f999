//! Tiling grid resolution from image dimensions and optional explicit parameters
//!
//! Explicit parameters are validated and every violated constraint is reported
//! at once. Without explicit tile dimensions the grid is auto-detected by scoring
//! a fixed set of candidate sizes, spacings and margins; a weak best candidate
//! falls back to the common divisors of the image dimensions.

use crate::io::configuration::{
    CANDIDATE_MARGINS, CANDIDATE_SPACINGS, CANDIDATE_TILE_SIZES, COVERAGE_WEIGHT,
    DEFAULT_TILE_SIZE, FALLBACK_GRID_CONFIDENCE, LEFTOVER_WEIGHT, MAX_DIVISOR_TILE,
    MIN_AUTO_DETECT_SCORE, MIN_DIVISOR_TILE, PREFERRED_TILE_MULTIPLE, SEPARATOR_DARKNESS,
    SEPARATOR_WEIGHT,
};
use crate::io::error::{AnalysisError, Result};
use crate::math::color_space::mean_rgb;
use crate::spatial::raster::RasterImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A fully resolved tiling grid
///
/// Invariant: `columns * rows == tile_count`, and every tile lies inside the
/// image it was resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSpec {
    /// Tile width in pixels
    pub tile_width: u32,
    /// Tile height in pixels
    pub tile_height: u32,
    /// Gap between neighbouring tiles
    pub spacing: u32,
    /// Border around the whole sheet
    pub margin: u32,
    /// Tiles per row
    pub columns: u32,
    /// Tiles per column
    pub rows: u32,
    /// Total tiles, `columns * rows`
    pub tile_count: u32,
}

impl GridSpec {
    /// Fit as many whole tiles as possible into an image
    pub fn fit(
        image_width: u32,
        image_height: u32,
        tile_width: u32,
        tile_height: u32,
        spacing: u32,
        margin: u32,
    ) -> Self {
        let columns = span_count(image_width, tile_width, spacing, margin);
        let rows = span_count(image_height, tile_height, spacing, margin);
        Self {
            tile_width,
            tile_height,
            spacing,
            margin,
            columns,
            rows,
            tile_count: columns * rows,
        }
    }

    /// Horizontal distance between the origins of adjacent tiles
    pub const fn step_x(&self) -> u32 {
        self.tile_width.saturating_add(self.spacing)
    }

    /// Vertical distance between the origins of adjacent tiles
    pub const fn step_y(&self) -> u32 {
        self.tile_height.saturating_add(self.spacing)
    }

    /// Pixels spanned horizontally by margin, tiles and gutters
    pub const fn used_width(&self) -> u32 {
        used_extent(self.columns, self.tile_width, self.spacing, self.margin)
    }

    /// Pixels spanned vertically by margin, tiles and gutters
    pub const fn used_height(&self) -> u32 {
        used_extent(self.rows, self.tile_height, self.spacing, self.margin)
    }

    /// Row-major index of the tile at `(row, col)`
    pub const fn tile_index(&self, row: u32, col: u32) -> usize {
        (row * self.columns + col) as usize
    }

    /// Check the structural invariants against an image size
    ///
    /// # Errors
    ///
    /// Returns `InvalidGridConfig` listing every broken invariant.
    pub fn validate(&self, image_width: u32, image_height: u32) -> Result<()> {
        let mut violations = Vec::new();
        if self.tile_width == 0 || self.tile_height == 0 {
            violations.push(format!(
                "tile dimensions must be at least 1 (got {}x{})",
                self.tile_width, self.tile_height
            ));
        }
        if u64::from(self.columns) * u64::from(self.rows) != u64::from(self.tile_count) {
            violations.push(format!(
                "columns x rows ({} x {}) does not equal tileCount {}",
                self.columns, self.rows, self.tile_count
            ));
        }
        if self.columns > 0 && self.used_width() > image_width.saturating_sub(self.margin) {
            violations.push(format!(
                "{} columns need {}px but the image is {image_width}px wide",
                self.columns,
                self.used_width()
            ));
        }
        if self.rows > 0 && self.used_height() > image_height.saturating_sub(self.margin) {
            violations.push(format!(
                "{} rows need {}px but the image is {image_height}px high",
                self.rows,
                self.used_height()
            ));
        }
        if violations.is_empty() {
            Ok(())
        } else {
            Err(AnalysisError::InvalidGridConfig { violations })
        }
    }
}

// Trailing margin is counted by the caller; this is the margin-to-last-tile span
const fn used_extent(count: u32, tile: u32, spacing: u32, margin: u32) -> u32 {
    if count == 0 {
        0
    } else {
        margin + count * tile + (count - 1) * spacing
    }
}

fn span_count(extent: u32, tile: u32, spacing: u32, margin: u32) -> u32 {
    let usable = extent.saturating_sub(margin.saturating_mul(2));
    if tile == 0 || usable < tile {
        return 0;
    }
    // A gutter wider than the remaining space leaves room for the first tile only
    match (usable.checked_add(spacing), tile.checked_add(spacing)) {
        (Some(span), Some(step)) => span / step,
        _ => 1,
    }
}

/// Caller-supplied grid parameters
///
/// Signed so that negative values coming from untrusted input can be reported
/// as violations instead of wrapping. Missing tile dimensions select
/// auto-detection; a single given dimension is mirrored to the other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridParams {
    /// Explicit tile width
    pub tile_width: Option<i64>,
    /// Explicit tile height
    pub tile_height: Option<i64>,
    /// Gap between tiles
    #[serde(default)]
    pub spacing: i64,
    /// Border around the sheet
    #[serde(default)]
    pub margin: i64,
}

impl GridParams {
    /// Parameters requesting auto-detection
    pub const fn auto() -> Self {
        Self {
            tile_width: None,
            tile_height: None,
            spacing: 0,
            margin: 0,
        }
    }

    /// Fully explicit parameters
    pub const fn explicit(tile_width: i64, tile_height: i64, spacing: i64, margin: i64) -> Self {
        Self {
            tile_width: Some(tile_width),
            tile_height: Some(tile_height),
            spacing,
            margin,
        }
    }

    /// Whether these parameters bypass auto-detection
    pub const fn is_explicit(&self) -> bool {
        self.tile_width.is_some() || self.tile_height.is_some()
    }
}

impl From<&GridSpec> for GridParams {
    fn from(spec: &GridSpec) -> Self {
        Self::explicit(
            i64::from(spec.tile_width),
            i64::from(spec.tile_height),
            i64::from(spec.spacing),
            i64::from(spec.margin),
        )
    }
}

/// How a grid was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridMethod {
    /// Caller supplied tile dimensions
    Explicit,
    /// Best scoring auto-detection candidate
    AutoDetected,
    /// Middle common divisor of the image dimensions
    DivisorFallback,
    /// Fixed default tile size, which may hold no whole tile
    DefaultFallback,
}

impl GridMethod {
    /// Whether auto-detection had to fall back
    pub const fn is_fallback(self) -> bool {
        matches!(self, Self::DivisorFallback | Self::DefaultFallback)
    }
}

/// Result of grid resolution
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedGrid {
    /// The grid itself
    pub spec: GridSpec,
    /// How it was obtained
    pub method: GridMethod,
    /// Belief in the grid, `1.0` for explicit grids
    pub confidence: f64,
    /// Non-fatal observations about the fit
    pub advisories: Vec<String>,
}

/// Resolve the tiling grid for an image
///
/// # Errors
///
/// Returns `InvalidGridConfig` when explicit parameters are out of bounds or
/// no whole tile fits. Auto-detection never fails.
pub fn resolve_grid(image: &RasterImage, params: &GridParams) -> Result<ResolvedGrid> {
    let (spec, method, confidence) = if params.is_explicit() {
        (resolve_explicit(image, params)?, GridMethod::Explicit, 1.0)
    } else {
        auto_detect(image)
    };

    debug!(
        tile_width = spec.tile_width,
        tile_height = spec.tile_height,
        spacing = spec.spacing,
        margin = spec.margin,
        tiles = spec.tile_count,
        ?method,
        "resolved grid"
    );

    Ok(ResolvedGrid {
        advisories: advisories(&spec, image.width(), image.height()),
        spec,
        method,
        confidence,
    })
}

fn resolve_explicit(image: &RasterImage, params: &GridParams) -> Result<GridSpec> {
    let (width, height) = (i64::from(image.width()), i64::from(image.height()));
    let tile_width = params.tile_width.or(params.tile_height).unwrap_or(0);
    let tile_height = params.tile_height.or(params.tile_width).unwrap_or(0);
    let mut violations = Vec::new();

    if tile_width < 1 {
        violations.push(format!("tileWidth must be at least 1 (got {tile_width})"));
    } else if tile_width > width {
        violations.push(format!(
            "tileWidth {tile_width} exceeds image width {width}"
        ));
    }
    if tile_height < 1 {
        violations.push(format!("tileHeight must be at least 1 (got {tile_height})"));
    } else if tile_height > height {
        violations.push(format!(
            "tileHeight {tile_height} exceeds image height {height}"
        ));
    }
    if params.spacing < 0 {
        violations.push(format!(
            "spacing must be non-negative (got {})",
            params.spacing
        ));
    }
    if params.margin < 0 {
        violations.push(format!(
            "margin must be non-negative (got {})",
            params.margin
        ));
    }
    if !violations.is_empty() {
        return Err(AnalysisError::InvalidGridConfig { violations });
    }

    let to_u32 = |value: i64| u32::try_from(value).unwrap_or(u32::MAX);
    let spec = GridSpec::fit(
        image.width(),
        image.height(),
        to_u32(tile_width),
        to_u32(tile_height),
        to_u32(params.spacing),
        to_u32(params.margin),
    );

    if spec.tile_count == 0 {
        return Err(AnalysisError::InvalidGridConfig {
            violations: vec![format!(
                "no whole {tile_width}x{tile_height} tile fits in {width}x{height} with margin {}",
                params.margin
            )],
        });
    }
    Ok(spec)
}

fn auto_detect(image: &RasterImage) -> (GridSpec, GridMethod, f64) {
    let (width, height) = (image.width(), image.height());
    let mut best: Option<(f64, GridSpec)> = None;

    for &size in &CANDIDATE_TILE_SIZES {
        for &spacing in &CANDIDATE_SPACINGS {
            for &margin in &CANDIDATE_MARGINS {
                let spec = GridSpec::fit(width, height, size, size, spacing, margin);
                if spec.tile_count == 0 {
                    continue;
                }
                let score = score_candidate(image, &spec);
                // Strict comparison keeps the earliest (smallest) candidate on ties
                if best.is_none_or(|(best_score, _)| score > best_score) {
                    best = Some((score, spec));
                }
            }
        }
    }

    match best {
        Some((score, spec)) if score >= MIN_AUTO_DETECT_SCORE => {
            (spec, GridMethod::AutoDetected, score.clamp(0.0, 1.0))
        }
        _ => divisor_fallback(width, height),
    }
}

/// Score a candidate grid on coverage, leftover pixels and separator lines
pub fn score_candidate(image: &RasterImage, spec: &GridSpec) -> f64 {
    let total = f64::from(image.width()) * f64::from(image.height());
    if total <= 0.0 {
        return 0.0;
    }

    let tile_area = f64::from(spec.tile_count)
        * f64::from(spec.tile_width)
        * f64::from(spec.tile_height);
    let coverage = (tile_area / total).min(1.0);

    let used_w = f64::from((spec.used_width() + spec.margin).min(image.width()));
    let used_h = f64::from((spec.used_height() + spec.margin).min(image.height()));
    let leftover_fraction = (1.0 - used_w * used_h / total).clamp(0.0, 1.0);

    let separator = if spec.spacing > 0 {
        separator_line_score(image, spec)
    } else {
        0.0
    };

    SEPARATOR_WEIGHT.mul_add(
        separator,
        COVERAGE_WEIGHT.mul_add(coverage, LEFTOVER_WEIGHT * (1.0 - leftover_fraction)),
    )
}

/// Fraction of dark pixels along the gutters between tiles
///
/// Returns zero when the grid has no interior gutters.
pub fn separator_line_score(image: &RasterImage, spec: &GridSpec) -> f64 {
    let mut dark = 0_u64;
    let mut sampled = 0_u64;
    let mut visit = |x: u32, y: u32| {
        if let Some(pixel) = image.pixel(x, y) {
            sampled += 1;
            if mean_rgb(pixel) < SEPARATOR_DARKNESS {
                dark += 1;
            }
        }
    };

    let top = spec.margin;
    let bottom = spec.used_height();
    let left = spec.margin;
    let right = spec.used_width();

    for col in 1..spec.columns {
        let gutter_start = spec.margin + col * spec.step_x() - spec.spacing;
        for x in gutter_start..gutter_start + spec.spacing {
            for y in top..bottom {
                visit(x, y);
            }
        }
    }
    for row in 1..spec.rows {
        let gutter_start = spec.margin + row * spec.step_y() - spec.spacing;
        for y in gutter_start..gutter_start + spec.spacing {
            for x in left..right {
                visit(x, y);
            }
        }
    }

    if sampled == 0 {
        0.0
    } else {
        dark as f64 / sampled as f64
    }
}

fn divisor_fallback(width: u32, height: u32) -> (GridSpec, GridMethod, f64) {
    let common = common_divisors(width, height);

    if let Some(&size) = common.get(common.len() / 2) {
        debug!(size, candidates = common.len(), "grid fell back to common divisor");
        return (
            GridSpec::fit(width, height, size, size, 0, 0),
            GridMethod::DivisorFallback,
            FALLBACK_GRID_CONFIDENCE,
        );
    }

    debug!(size = DEFAULT_TILE_SIZE, "grid fell back to default tile size");
    (
        GridSpec::fit(width, height, DEFAULT_TILE_SIZE, DEFAULT_TILE_SIZE, 0, 0),
        GridMethod::DefaultFallback,
        FALLBACK_GRID_CONFIDENCE,
    )
}

/// Divisors shared by both dimensions inside the fallback tile range, ascending
pub fn common_divisors(width: u32, height: u32) -> Vec<u32> {
    (MIN_DIVISOR_TILE..=MAX_DIVISOR_TILE)
        .filter(|d| width % d == 0 && height % d == 0)
        .collect()
}

fn advisories(spec: &GridSpec, width: u32, height: u32) -> Vec<String> {
    let mut notes = Vec::new();
    let leftover_x = width.saturating_sub(spec.used_width().saturating_add(spec.margin));
    let leftover_y = height.saturating_sub(spec.used_height().saturating_add(spec.margin));

    if leftover_x > 0 {
        notes.push(format!(
            "{leftover_x}px of image width is not covered by tiles"
        ));
    }
    if leftover_y > 0 {
        notes.push(format!(
            "{leftover_y}px of image height is not covered by tiles"
        ));
    }
    if spec.tile_width % PREFERRED_TILE_MULTIPLE != 0
        || spec.tile_height % PREFERRED_TILE_MULTIPLE != 0
    {
        notes.push(format!(
            "tile size {}x{} is not a multiple of {PREFERRED_TILE_MULTIPLE}",
            spec.tile_width, spec.tile_height
        ));
    }
    notes
}

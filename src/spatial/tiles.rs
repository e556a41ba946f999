//! Deterministic enumeration of tile rectangles from a resolved grid

use crate::io::error::Result;
use crate::spatial::grid::GridSpec;
use serde::{Deserialize, Serialize};

/// Pixel rectangle of one tile
///
/// Derived from a [`GridSpec`] on demand; never persisted on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileSlice {
    /// Row-major 0-based tile index
    pub index: usize,
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl TileSlice {
    /// Exclusive right edge
    pub const fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge
    pub const fn bottom(&self) -> u32 {
        self.y + self.height
    }
}

/// Rectangle of the tile at `(row, col)`
///
/// Does not check that the position lies inside the grid.
pub const fn tile_at(spec: &GridSpec, row: u32, col: u32) -> TileSlice {
    TileSlice {
        index: spec.tile_index(row, col),
        x: spec.margin + col * spec.step_x(),
        y: spec.margin + row * spec.step_y(),
        width: spec.tile_width,
        height: spec.tile_height,
    }
}

/// Enumerate every tile of a grid in row-major order
///
/// # Errors
///
/// Propagates `InvalidGridConfig` when the grid does not fit the image.
pub fn slice_tiles(spec: &GridSpec, image_width: u32, image_height: u32) -> Result<Vec<TileSlice>> {
    spec.validate(image_width, image_height)?;

    let mut slices = Vec::with_capacity(spec.tile_count as usize);
    for row in 0..spec.rows {
        for col in 0..spec.columns {
            slices.push(tile_at(spec, row, col));
        }
    }
    Ok(slices)
}

//! Decoded RGBA raster shared read-only by every analysis stage

use crate::io::error::{AnalysisError, Result};
use crate::spatial::tiles::TileSlice;
use image::{ImageBuffer, Rgba, RgbaImage};
use ndarray::Array3;

/// Fully transparent black
pub const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

/// An RGBA image stored as a `(height, width, 4)` byte array
///
/// Decoding happens once per asset; afterwards the raster is only ever
/// borrowed immutably, so it can be shared across classifier threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Array3<u8>,
}

impl RasterImage {
    /// Wrap a row-major RGBA byte buffer
    ///
    /// # Errors
    ///
    /// Returns `InvalidImageData` if either dimension is zero or the buffer
    /// length is not `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(AnalysisError::InvalidImageData {
                reason: format!("image dimensions must be non-zero, got {width}x{height}"),
            });
        }
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(AnalysisError::InvalidImageData {
                reason: format!(
                    "expected {expected} bytes for {width}x{height} RGBA, got {}",
                    data.len()
                ),
            });
        }
        let pixels = Array3::from_shape_vec((height as usize, width as usize, 4), data).map_err(
            |e| AnalysisError::InvalidImageData {
                reason: e.to_string(),
            },
        )?;
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Convert an `image` crate buffer
    ///
    /// # Errors
    ///
    /// Returns `InvalidImageData` for zero-sized images.
    pub fn from_rgba_image(image: &RgbaImage) -> Result<Self> {
        Self::from_rgba(image.width(), image.height(), image.as_raw().clone())
    }

    /// Create an image where every pixel has the same color
    pub fn filled(width: u32, height: u32, color: [u8; 4]) -> Self {
        let mut pixels = Array3::zeros((height as usize, width as usize, 4));
        for mut pixel in pixels.lanes_mut(ndarray::Axis(2)) {
            for (channel, value) in pixel.iter_mut().zip(color) {
                *channel = value;
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Image width in pixels
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Underlying `(height, width, 4)` array
    pub const fn pixels(&self) -> &Array3<u8> {
        &self.pixels
    }

    /// RGBA value at a coordinate, `None` outside the image
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let (row, col) = (y as usize, x as usize);
        Some([
            self.pixels.get((row, col, 0)).copied()?,
            self.pixels.get((row, col, 1)).copied()?,
            self.pixels.get((row, col, 2)).copied()?,
            self.pixels.get((row, col, 3)).copied()?,
        ])
    }

    /// Alpha at a coordinate, zero outside the image
    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        self.pixels
            .get((y as usize, x as usize, 3))
            .copied()
            .unwrap_or(0)
    }

    /// Overwrite a single pixel; out-of-bounds writes are ignored
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 4]) {
        for (channel, value) in color.into_iter().enumerate() {
            if let Some(slot) = self.pixels.get_mut((y as usize, x as usize, channel)) {
                *slot = value;
            }
        }
    }

    /// Paint an axis-aligned rectangle, clipped to the image
    pub fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: [u8; 4]) {
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);
        for py in y..y_end {
            for px in x..x_end {
                self.set_pixel(px, py, color);
            }
        }
    }

    /// Copy a tile out as a standalone image, clipped to the raster
    pub fn crop(&self, slice: &TileSlice) -> RgbaImage {
        let width = slice.width.min(self.width.saturating_sub(slice.x));
        let height = slice.height.min(self.height.saturating_sub(slice.y));
        ImageBuffer::from_fn(width, height, |dx, dy| {
            Rgba(
                self.pixel(slice.x + dx, slice.y + dy)
                    .unwrap_or(TRANSPARENT),
            )
        })
    }

    /// Similarity of two equally sized tiles in `[0, 1]`
    ///
    /// Defined as one minus the mean normalized per-channel RGBA difference
    /// over the overlapping extent of both tiles. Empty overlaps score zero.
    pub fn tile_similarity(&self, a: &TileSlice, b: &TileSlice) -> f64 {
        let width = a.width.min(b.width);
        let height = a.height.min(b.height);
        let mut difference = 0.0;
        let mut samples = 0_u64;

        for dy in 0..height {
            for dx in 0..width {
                let (Some(pa), Some(pb)) = (
                    self.pixel(a.x + dx, a.y + dy),
                    self.pixel(b.x + dx, b.y + dy),
                ) else {
                    continue;
                };
                for (ca, cb) in pa.iter().zip(pb.iter()) {
                    difference += f64::from(ca.abs_diff(*cb)) / 255.0;
                }
                samples += 4;
            }
        }

        if samples == 0 {
            return 0.0;
        }
        1.0 - difference / samples as f64
    }
}

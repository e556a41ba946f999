//! Image decoding into the shared raster buffer

use crate::io::error::{AnalysisError, Result};
use crate::spatial::raster::RasterImage;
use std::path::Path;
use tracing::debug;

/// Decode an image file of any supported format into RGBA
///
/// # Errors
///
/// Returns `ImageLoad` if the file cannot be opened or decoded, or
/// `InvalidImageData` if it decodes to an empty image.
pub fn load_raster(path: &Path) -> Result<RasterImage> {
    let decoded = image::open(path).map_err(|source| AnalysisError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;
    let raster = RasterImage::from_rgba_image(&decoded.to_rgba8())?;
    debug!(
        path = %path.display(),
        width = raster.width(),
        height = raster.height(),
        "decoded image"
    );
    Ok(raster)
}

/// Decode an in-memory encoded image
///
/// # Errors
///
/// Returns `ImageLoad` if the bytes are not a decodable image, or
/// `InvalidImageData` if they decode to an empty image.
pub fn decode_raster(bytes: &[u8]) -> Result<RasterImage> {
    let decoded = image::load_from_memory(bytes).map_err(|source| AnalysisError::ImageLoad {
        path: "<memory>".into(),
        source,
    })?;
    RasterImage::from_rgba_image(&decoded.to_rgba8())
}

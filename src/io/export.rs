//! Writing metadata JSON and per-tile PNG files

use crate::algorithm::metadata::TilesetMetadata;
use crate::io::configuration::OUTPUT_SUFFIX;
use crate::io::error::{AnalysisError, Result};
use crate::spatial::raster::RasterImage;
use crate::spatial::tiles::TileSlice;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// `<stem>_metadata.json` next to the input image
pub fn metadata_path(input_path: &Path) -> PathBuf {
    let stem = input_path.file_stem().unwrap_or_default();
    let output_name = format!("{}{OUTPUT_SUFFIX}.json", stem.to_string_lossy());

    if let Some(parent) = input_path.parent() {
        parent.join(output_name)
    } else {
        PathBuf::from(output_name)
    }
}

/// Serialize metadata as JSON
///
/// # Errors
///
/// Returns `Serialization` if encoding fails, or `FileSystem` if the parent
/// directory cannot be created or the file cannot be written.
pub fn write_metadata(metadata: &TilesetMetadata, path: &Path, pretty: bool) -> Result<()> {
    let encoded = if pretty {
        serde_json::to_string_pretty(metadata)
    } else {
        serde_json::to_string(metadata)
    }
    .map_err(|source| AnalysisError::Serialization {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| AnalysisError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source,
        })?;
    }
    fs::write(path, encoded).map_err(|source| AnalysisError::FileSystem {
        path: path.to_path_buf(),
        operation: "write metadata",
        source,
    })?;

    debug!(path = %path.display(), "wrote metadata");
    Ok(())
}

/// Read metadata previously written by [`write_metadata`]
///
/// # Errors
///
/// Returns `FileSystem` if the file cannot be read, or `Serialization` if it
/// does not contain valid metadata.
pub fn read_metadata(path: &Path) -> Result<TilesetMetadata> {
    let contents = fs::read_to_string(path).map_err(|source| AnalysisError::FileSystem {
        path: path.to_path_buf(),
        operation: "read metadata",
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| AnalysisError::Serialization {
        path: path.to_path_buf(),
        source,
    })
}

/// File name of an exported tile, with a two-digit zero-padded index
pub fn tile_file_name(base: &str, index: usize) -> String {
    format!("{base}_{index:02}.png")
}

/// Save every tile as its own PNG in `output_dir`
///
/// # Errors
///
/// Returns `FileSystem` if the directory cannot be created, or `ImageExport`
/// if a tile cannot be written.
pub fn export_tiles(
    image: &RasterImage,
    tiles: &[TileSlice],
    output_dir: &Path,
    base: &str,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir).map_err(|source| AnalysisError::FileSystem {
        path: output_dir.to_path_buf(),
        operation: "create directory",
        source,
    })?;

    let mut written = Vec::with_capacity(tiles.len());
    for tile in tiles {
        let path = output_dir.join(tile_file_name(base, tile.index));
        image
            .crop(tile)
            .save(&path)
            .map_err(|source| AnalysisError::ImageExport {
                path: path.clone(),
                source,
            })?;
        written.push(path);
    }

    debug!(
        directory = %output_dir.display(),
        tiles = written.len(),
        "exported tiles"
    );
    Ok(written)
}

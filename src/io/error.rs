//! Error types for tileset analysis operations

use std::fmt;
use std::path::PathBuf;

/// Main error type for all analysis operations
///
/// Only grid and image failures are fatal to an analysis. Classifier-level
/// problems never surface here; they degrade confidence and add warnings.
#[derive(Debug)]
pub enum AnalysisError {
    /// Failed to load source image from filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Raw pixel buffer doesn't describe a usable RGBA image
    InvalidImageData {
        /// Description of what's wrong with the buffer
        reason: String,
    },

    /// Explicit grid parameters violate bounds or positivity
    InvalidGridConfig {
        /// One entry per violated constraint
        violations: Vec<String>,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Tile index exceeds the analysed tile set
    InvalidTileIndex {
        /// The invalid tile index
        index: usize,
        /// Number of tiles in the tileset
        max_tiles: usize,
    },

    /// Failed to save an exported tile image
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Metadata could not be encoded as JSON
    Serialization {
        /// Destination of the encoded metadata
        path: PathBuf,
        /// Underlying encoder error
        source: serde_json::Error,
    },

    /// Async runtime for batch processing could not be started
    Runtime {
        /// Description of the failure
        reason: String,
    },
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::InvalidImageData { reason } => {
                write!(f, "Invalid image data: {reason}")
            }
            Self::InvalidGridConfig { violations } => {
                write!(f, "Invalid grid configuration: {}", violations.join("; "))
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::InvalidTileIndex { index, max_tiles } => {
                write!(
                    f,
                    "Tile index {index} is out of bounds (tileset has {max_tiles} tiles)"
                )
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::Serialization { path, source } => {
                write!(
                    f,
                    "Failed to encode metadata for '{}': {source}",
                    path.display()
                )
            }
            Self::Runtime { reason } => {
                write!(f, "Runtime error: {reason}")
            }
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::Serialization { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for analysis results
pub type Result<T> = std::result::Result<T, AnalysisError>;

impl From<image::ImageError> for AnalysisError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for AnalysisError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> AnalysisError {
    AnalysisError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

impl AnalysisError {
    /// Whether this error should be shown as a blocking failure
    ///
    /// Grid and image problems need corrected input; everything else is an
    /// environment problem the caller may retry.
    pub const fn requires_corrected_input(&self) -> bool {
        matches!(
            self,
            Self::ImageLoad { .. }
                | Self::InvalidImageData { .. }
                | Self::InvalidGridConfig { .. }
                | Self::InvalidTileIndex { .. }
        )
    }
}

/// Command-line interface and batch processing
pub mod cli;
/// Analysis constants and runtime defaults
pub mod configuration;
/// Error types and result alias
pub mod error;
/// Metadata and tile file output
pub mod export;
/// Image decoding
pub mod image;
/// Batch progress display
pub mod progress;

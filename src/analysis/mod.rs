//! Classifiers that turn sliced tiles and raw pixels into semantic hints

/// Quick scan for solid 4x4 tile blocks
pub mod candidates;
/// Vendor naming convention lookup
pub mod catalog;
/// Histogram-based theme and material inference
pub mod color;
/// Canonical auto-tile variant names
pub mod names;
/// Auto-tile layout classifiers and ranking
pub mod patterns;
/// Edge continuity check
pub mod seams;

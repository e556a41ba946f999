//! Mathematical utilities for color and size statistics

/// RGB to HSL conversion and color distances
pub mod color_space;
/// Fixed-bin histograms with range queries
pub mod histogram;
/// Descriptive statistics over sample sets
pub mod statistics;

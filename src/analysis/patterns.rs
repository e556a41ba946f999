//! Auto-tile layout classification over sliced tiles
//!
//! Every layout convention is an independent [`PatternClassifier`]. The
//! pipeline runs an ordered list of them and ranks the results by confidence,
//! breaking ties with a fixed system priority so the winner is deterministic.

use crate::analysis::names::BLOB16_NAMES;
use crate::io::configuration::{
    BLOB16_CORNER_DISSIMILARITY, BLOB16_CORNER_SCORE, BLOB16_EDGE_SCORE, BLOB16_EDGE_SIMILARITY,
    BLOB16_INTERIOR_SCORE, BLOB16_INTERIOR_SIMILARITY, BLOB16_MIN_CONFIDENCE,
};
use crate::io::error::Result;
use crate::spatial::grid::GridSpec;
use crate::spatial::raster::RasterImage;
use crate::spatial::tiles::TileSlice;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Named auto-tile layout conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoTileSystem {
    /// 4-neighbour layout with 16 variants
    Blob16,
    /// 8-neighbour layout with 47 variants
    Blob47,
    /// Edge/corner colour matching layout
    Wang,
    /// Recognisable tileset without a standard layout
    Custom,
}

impl AutoTileSystem {
    /// Tie-break rank, lower wins
    pub const fn priority(self) -> u8 {
        match self {
            Self::Blob16 => 0,
            Self::Blob47 => 1,
            Self::Wang => 2,
            Self::Custom => 3,
        }
    }

    /// Lowercase identifier used in metadata
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blob16 => "blob16",
            Self::Blob47 => "blob47",
            Self::Wang => "wang",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for AutoTileSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classifier's proposal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternResult {
    /// System this result argues for
    pub system: AutoTileSystem,
    /// Belief in `[0, 1]`
    pub confidence: f64,
    /// Proposed variant name to tile index mapping
    pub named_tiles: BTreeMap<String, usize>,
}

impl PatternResult {
    /// A result expressing no opinion
    pub const fn none(system: AutoTileSystem) -> Self {
        Self {
            system,
            confidence: 0.0,
            named_tiles: BTreeMap::new(),
        }
    }
}

/// Read-only view of the tiles handed to every classifier
#[derive(Debug, Clone, Copy)]
pub struct TileContext<'a> {
    /// Decoded source image
    pub image: &'a RasterImage,
    /// Resolved grid
    pub grid: &'a GridSpec,
    /// Row-major tile rectangles
    pub tiles: &'a [TileSlice],
}

impl TileContext<'_> {
    /// Tile at a grid position
    pub fn tile(&self, row: u32, col: u32) -> Option<&TileSlice> {
        if row >= self.grid.rows || col >= self.grid.columns {
            return None;
        }
        self.tiles.get(self.grid.tile_index(row, col))
    }

    /// Similarity of two tiles by grid position, zero if either is missing
    pub fn similarity(&self, a: (u32, u32), b: (u32, u32)) -> f64 {
        match (self.tile(a.0, a.1), self.tile(b.0, b.1)) {
            (Some(first), Some(second)) => self.image.tile_similarity(first, second),
            _ => 0.0,
        }
    }
}

/// A scorer for one auto-tile convention
pub trait PatternClassifier: Send + Sync {
    /// Convention this classifier recognises
    fn system(&self) -> AutoTileSystem;

    /// Score the tiles and propose names
    ///
    /// # Errors
    ///
    /// Implementations may fail internally; callers treat a failure as
    /// confidence zero.
    fn classify(&self, context: &TileContext<'_>) -> Result<PatternResult>;
}

/// Detects 4x4 blob16 sheets by tile similarity
#[derive(Debug, Clone, Copy, Default)]
pub struct Blob16Classifier;

impl Blob16Classifier {
    /// Score a 4x4 window whose top-left tile is at `(row, col)`
    pub fn score_window(context: &TileContext<'_>, row: u32, col: u32) -> f64 {
        let at = |r: u32, c: u32| (row + r, col + c);
        let mut score = 0.0;

        // Island and center sit in opposite corners and must differ
        if context.similarity(at(0, 0), at(3, 3)) < BLOB16_CORNER_DISSIMILARITY {
            score += BLOB16_CORNER_SCORE;
        }

        let parallel_edges = [
            (at(0, 1), at(3, 1)),
            (at(0, 2), at(3, 2)),
            (at(1, 0), at(1, 3)),
            (at(2, 0), at(2, 3)),
        ];
        if parallel_edges
            .iter()
            .all(|&(a, b)| context.similarity(a, b) > BLOB16_EDGE_SIMILARITY)
        {
            score += BLOB16_EDGE_SCORE;
        }

        let interior = [at(1, 1), at(1, 2), at(2, 1), at(2, 2)];
        let mut total = 0.0;
        let mut pairs = 0_u32;
        for (i, &a) in interior.iter().enumerate() {
            for &b in interior.iter().skip(i + 1) {
                total += context.similarity(a, b);
                pairs += 1;
            }
        }
        if pairs > 0 && total / f64::from(pairs) > BLOB16_INTERIOR_SIMILARITY {
            score += BLOB16_INTERIOR_SCORE;
        }

        score
    }
}

impl PatternClassifier for Blob16Classifier {
    fn system(&self) -> AutoTileSystem {
        AutoTileSystem::Blob16
    }

    fn classify(&self, context: &TileContext<'_>) -> Result<PatternResult> {
        let grid = context.grid;
        if grid.columns < 4 || grid.rows < 4 {
            return Ok(PatternResult::none(self.system()));
        }

        let mut best: Option<(f64, u32, u32)> = None;
        for row in 0..=grid.rows - 4 {
            for col in 0..=grid.columns - 4 {
                let score = Self::score_window(context, row, col);
                if best.is_none_or(|(best_score, _, _)| score > best_score) {
                    best = Some((score, row, col));
                }
            }
        }

        let Some((confidence, row, col)) = best else {
            return Ok(PatternResult::none(self.system()));
        };
        if confidence < BLOB16_MIN_CONFIDENCE {
            return Ok(PatternResult::none(self.system()));
        }

        let named_tiles = BLOB16_NAMES
            .iter()
            .zip(0_u32..)
            .map(|(name, offset)| {
                (
                    (*name).to_string(),
                    grid.tile_index(row + offset / 4, col + offset % 4),
                )
            })
            .collect();

        Ok(PatternResult {
            system: self.system(),
            confidence: confidence.min(1.0),
            named_tiles,
        })
    }
}

/// Extension point for 47-variant blob sheets; currently expresses no opinion
#[derive(Debug, Clone, Copy, Default)]
pub struct Blob47Classifier;

impl PatternClassifier for Blob47Classifier {
    fn system(&self) -> AutoTileSystem {
        AutoTileSystem::Blob47
    }

    fn classify(&self, _context: &TileContext<'_>) -> Result<PatternResult> {
        Ok(PatternResult::none(self.system()))
    }
}

/// Extension point for Wang tile sheets; currently expresses no opinion
#[derive(Debug, Clone, Copy, Default)]
pub struct WangClassifier;

impl PatternClassifier for WangClassifier {
    fn system(&self) -> AutoTileSystem {
        AutoTileSystem::Wang
    }

    fn classify(&self, _context: &TileContext<'_>) -> Result<PatternResult> {
        Ok(PatternResult::none(self.system()))
    }
}

/// The built-in classifiers in priority order
pub fn default_classifiers() -> Vec<Box<dyn PatternClassifier>> {
    vec![
        Box::new(Blob16Classifier),
        Box::new(Blob47Classifier),
        Box::new(WangClassifier),
    ]
}

/// Ranked classifier results plus any internal failures
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PatternOutcome {
    /// Results sorted by descending confidence then system priority
    pub ranked: Vec<PatternResult>,
    /// Human-readable description of each classifier that failed
    pub failures: Vec<String>,
}

impl PatternOutcome {
    /// Highest ranked result
    pub fn winner(&self) -> Option<&PatternResult> {
        self.ranked.first()
    }

    /// Winner, but only if strong enough to contribute names
    pub fn mergeable(&self, threshold: f64) -> Option<&PatternResult> {
        self.winner().filter(|result| result.confidence > threshold)
    }
}

/// Sort results by descending confidence, ties by fixed system priority
pub fn rank_results(mut results: Vec<PatternResult>) -> Vec<PatternResult> {
    results.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.system.priority().cmp(&b.system.priority()))
    });
    results
}

/// Run every classifier, turning failures into zero-confidence results
pub fn run_classifiers(
    classifiers: &[Box<dyn PatternClassifier>],
    context: &TileContext<'_>,
) -> PatternOutcome {
    let mut results = Vec::with_capacity(classifiers.len());
    let mut failures = Vec::new();

    for classifier in classifiers {
        match classifier.classify(context) {
            Ok(result) => results.push(result),
            Err(error) => {
                failures.push(format!("{} classifier failed: {error}", classifier.system()));
                results.push(PatternResult::none(classifier.system()));
            }
        }
    }

    PatternOutcome {
        ranked: rank_results(results),
        failures,
    }
}

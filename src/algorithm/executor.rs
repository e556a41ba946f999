use crate::{
    algorithm::aggregator::{ClassifierReports, NameSource, merge_semantics},
    algorithm::metadata::{ManualOverride, SpriteSelection, TilesetMetadata},
    algorithm::overrides::apply_overrides,
    algorithm::renaming::{RenameSummary, rename_selections},
    algorithm::validation::summarize_validation,
    analysis::candidates::{AutoTileCandidate, scan_autotile_candidates},
    analysis::catalog::classify_name,
    analysis::color::classify_colors,
    analysis::patterns::{
        PatternClassifier, PatternOutcome, TileContext, default_classifiers, run_classifiers,
    },
    analysis::seams::{SeamQuality, SeamReport, check_seams},
    io::configuration::AnalysisConfig,
    io::error::Result,
    spatial::grid::{GridMethod, GridParams, resolve_grid},
    spatial::raster::RasterImage,
    spatial::regions::{Segmentation, SegmentationConfig, segment_regions},
    spatial::tiles::slice_tiles,
};
use std::any::Any;
use std::fmt;
use std::path::Path;
use std::thread;
use tracing::{debug, info, warn};

/// Everything the caller supplies for one analysis
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisRequest {
    /// Asset name, used for catalog matching and sprite names
    pub asset_name: String,
    /// Grid parameters; missing tile dimensions select auto-detection
    pub grid: GridParams,
    /// Existing sprite selections to rename
    pub selections: Vec<SpriteSelection>,
    /// Corrections applied after automatic analysis
    pub overrides: Vec<ManualOverride>,
}

impl AnalysisRequest {
    /// Request with auto-detected grid and no selections
    pub fn new(asset_name: impl Into<String>) -> Self {
        Self {
            asset_name: asset_name.into(),
            ..Self::default()
        }
    }

    /// Use the given grid parameters
    #[must_use]
    pub const fn with_grid(mut self, grid: GridParams) -> Self {
        self.grid = grid;
        self
    }

    /// Rename these selections instead of the segmented regions
    #[must_use]
    pub fn with_selections(mut self, selections: Vec<SpriteSelection>) -> Self {
        self.selections = selections;
        self
    }

    /// Apply these overrides after analysis
    #[must_use]
    pub fn with_overrides(mut self, overrides: Vec<ManualOverride>) -> Self {
        self.overrides = overrides;
        self
    }

    /// File stem of the asset name
    pub fn asset_base(&self) -> String {
        Path::new(&self.asset_name)
            .file_stem()
            .map_or_else(|| self.asset_name.clone(), |stem| stem.to_string_lossy().into_owned())
    }
}

/// Result of a complete analysis
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    /// Metadata to persist
    pub metadata: TilesetMetadata,
    /// Renamed sprite selections
    pub selections: Vec<SpriteSelection>,
    /// What renaming did
    pub rename_summary: RenameSummary,
    /// Freeform regions found on the raw pixels
    pub segmentation: Segmentation,
    /// 4x4 windows of solid tiles
    pub candidates: Vec<AutoTileCandidate>,
    /// How the grid was obtained
    pub grid_method: GridMethod,
    /// Some stage failed or fell back; warnings explain which
    pub degraded: bool,
}

/// Runs the full tileset analysis pipeline
pub struct TilesetAnalyzer {
    config: AnalysisConfig,
    classifiers: Vec<Box<dyn PatternClassifier>>,
}

impl fmt::Debug for TilesetAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TilesetAnalyzer")
            .field("config", &self.config)
            .field(
                "classifiers",
                &self
                    .classifiers
                    .iter()
                    .map(|classifier| classifier.system())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Default for TilesetAnalyzer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl TilesetAnalyzer {
    /// Analyzer with the built-in pattern classifiers
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            classifiers: default_classifiers(),
        }
    }

    /// Append a pattern classifier after the built-in ones
    #[must_use]
    pub fn with_classifier(mut self, classifier: Box<dyn PatternClassifier>) -> Self {
        self.classifiers.push(classifier);
        self
    }

    /// Active configuration
    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze a decoded image
    ///
    /// The pattern, color, catalog and segmentation stages run concurrently on
    /// the shared read-only image and are joined before aggregation. A stage
    /// that panics counts as zero confidence and adds a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Explicit grid parameters are invalid (`InvalidGridConfig`)
    /// - An override targets a tile outside the grid (`InvalidTileIndex`)
    pub fn analyze(&self, image: &RasterImage, request: &AnalysisRequest) -> Result<AnalysisOutcome> {
        let (width, height) = (image.width(), image.height());
        let resolved = resolve_grid(image, &request.grid)?;
        let grid = resolved.spec;
        let tiles = slice_tiles(&grid, width, height)?;
        let tile_count = tiles.len();
        let context = TileContext {
            image,
            grid: &grid,
            tiles: &tiles,
        };
        let segmentation_config = SegmentationConfig::from(&self.config);
        let seam_threshold = self.config.seam_distance_threshold;

        let (patterns, colors, catalog, segmentation, candidates) = thread::scope(|scope| {
            let patterns = scope.spawn(|| run_classifiers(&self.classifiers, &context));
            let colors = scope.spawn(|| {
                (
                    classify_colors(image),
                    check_seams(image, tiles.first(), seam_threshold),
                )
            });
            let catalog = scope.spawn(|| classify_name(&request.asset_name, tile_count));
            let segmentation = scope.spawn(|| segment_regions(image, &segmentation_config));

            let candidates = scan_autotile_candidates(image, &grid);
            (
                patterns.join(),
                colors.join(),
                catalog.join(),
                segmentation.join(),
                candidates,
            )
        });

        let mut failures = Vec::new();
        let patterns = joined("pattern classification", patterns, &mut failures);
        let colors = joined("color classification", colors, &mut failures);
        let catalog = joined("name catalog", catalog, &mut failures).flatten();
        let segmentation =
            joined("region segmentation", segmentation, &mut failures).unwrap_or_default();
        let (colors, seams) = colors.map_or_else(
            || {
                (
                    None,
                    SeamReport {
                        quality: SeamQuality::Unchecked,
                        warnings: Vec::new(),
                    },
                )
            },
            |(classification, seams)| (Some(classification), seams),
        );
        failures.extend(
            patterns
                .iter()
                .flat_map(|outcome: &PatternOutcome| outcome.failures.iter().cloned()),
        );

        if let Some(winner) = patterns.as_ref().and_then(PatternOutcome::winner) {
            debug!(system = %winner.system, confidence = winner.confidence, "pattern winner");
        }
        if let Some(matched) = &catalog {
            debug!(vendor = %matched.vendor, material = %matched.material, "catalog match");
        }

        let merged = merge_semantics(
            &request.asset_name,
            tile_count,
            ClassifierReports {
                patterns: patterns.as_ref(),
                colors: colors.as_ref(),
                catalog: catalog.as_ref(),
            },
            self.config.pattern_merge_threshold,
        );

        let mut stage_warnings = merged.warnings.clone();
        stage_warnings.extend(failures.iter().cloned());
        if segmentation.is_empty() && request.selections.is_empty() {
            stage_warnings
                .push("no sprite regions found; select sprites manually".to_string());
        }
        let validation = summarize_validation(width, height, &resolved, &seams, stage_warnings);

        let automatic = TilesetMetadata {
            image_width: width,
            image_height: height,
            grid,
            tile_count,
            themes: merged.themes,
            materials: merged.materials,
            layer_types: merged.layer_types,
            auto_tile_system: merged.auto_tile_system,
            named_tiles: merged.named_tiles,
            tile_groups: merged.tile_groups,
            detection_confidence: merged.detection_confidence,
            validation,
        };
        let metadata = apply_overrides(&automatic, &request.overrides)?;

        let asset_base = request.asset_base();
        let selections = if request.selections.is_empty() {
            segmentation.to_selections(&asset_base)
        } else {
            request.selections.clone()
        };
        let (selections, rename_summary) =
            rename_selections(&selections, &metadata.named_tiles, &asset_base);

        for failure in &failures {
            warn!(asset = %request.asset_name, "{failure}");
        }
        let degraded = !failures.is_empty()
            || merged.name_source == NameSource::Fallback
            || resolved.method.is_fallback();

        info!(
            asset = %request.asset_name,
            tiles = tile_count,
            system = ?metadata.auto_tile_system,
            confidence = metadata.detection_confidence.overall,
            regions = segmentation.regions.len(),
            warnings = metadata.validation.warnings.len(),
            degraded,
            "analysed tileset"
        );

        Ok(AnalysisOutcome {
            metadata,
            selections,
            rename_summary,
            segmentation,
            candidates,
            grid_method: resolved.method,
            degraded,
        })
    }
}

// A panicked stage is recorded and treated as absent
fn joined<T>(stage: &str, result: thread::Result<T>, failures: &mut Vec<String>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(payload) => {
            failures.push(format!("{stage} failed: {}", panic_message(payload.as_ref())));
            None
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("panicked")
}

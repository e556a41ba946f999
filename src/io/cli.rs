//! Command-line interface for batch tileset analysis

use crate::algorithm::executor::{AnalysisRequest, TilesetAnalyzer};
use crate::algorithm::metadata::{ManualOverride, TilesetMetadata};
use crate::io::configuration::{
    AnalysisConfig, DEFAULT_ASSET_TIMEOUT_SECS, DEFAULT_MERGE_PADDING, DEFAULT_MIN_REGION_SIZE,
    SUPPORTED_EXTENSIONS,
};
use crate::io::error::{AnalysisError, Result, invalid_parameter};
use crate::io::export::{export_tiles, metadata_path, write_metadata};
use crate::io::image::load_raster;
use crate::io::progress::ProgressManager;
use crate::spatial::grid::{GridParams, resolve_grid};
use crate::spatial::raster::RasterImage;
use crate::spatial::tiles::slice_tiles;
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "tilesense")]
#[command(
    author,
    version,
    about = "Extract semantic metadata from tilesets and sprite sheets"
)]
/// Command-line arguments for the tileset analyzer
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Input image file or directory to process
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// Tile width in pixels (auto-detected when neither dimension is given)
    #[arg(short = 'w', long)]
    pub tile_width: Option<i64>,

    /// Tile height in pixels (defaults to the tile width)
    #[arg(short = 'H', long)]
    pub tile_height: Option<i64>,

    /// Gap between tiles in pixels
    #[arg(short, long, default_value_t = 0)]
    pub spacing: i64,

    /// Border around the sheet in pixels
    #[arg(short, long, default_value_t = 0)]
    pub margin: i64,

    /// Asset name used for catalog matching (defaults to the file name)
    #[arg(short, long)]
    pub name: Option<String>,

    /// JSON file with manual overrides to apply after analysis
    #[arg(short, long, value_name = "FILE")]
    pub overrides: Option<PathBuf>,

    /// Smallest sprite region kept by segmentation
    #[arg(long, default_value_t = DEFAULT_MIN_REGION_SIZE)]
    pub min_region_size: u32,

    /// Padding used when merging nearby sprite regions
    #[arg(long, default_value_t = DEFAULT_MERGE_PADDING)]
    pub merge_padding: u32,

    /// Seconds before an asset falls back to numeric-only metadata
    #[arg(short, long, default_value_t = DEFAULT_ASSET_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Write each tile as <name>_<NN>.png into <stem>_tiles/
    #[arg(short, long)]
    pub export_tiles: bool,

    /// Pretty-print the metadata JSON
    #[arg(short, long)]
    pub pretty: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Process files even if output exists
    #[arg(long)]
    pub no_skip: bool,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Grid parameters from the tile flags
    pub const fn grid_params(&self) -> GridParams {
        GridParams {
            tile_width: self.tile_width,
            tile_height: self.tile_height,
            spacing: self.spacing,
            margin: self.margin,
        }
    }

    /// Analysis configuration from the segmentation flags
    pub fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            min_region_size: self.min_region_size,
            merge_padding: self.merge_padding,
            ..AnalysisConfig::default()
        }
    }
}

/// What happened to one asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// Full metadata written
    Analysed,
    /// Analysis did not finish in time; numeric-only metadata written
    Minimal,
}

/// Counts for a finished batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Assets with full metadata
    pub analysed: usize,
    /// Assets that fell back to numeric-only metadata
    pub minimal: usize,
    /// Assets skipped because their metadata already exists
    pub skipped: usize,
    /// Assets that could not be analysed at all
    pub failed: usize,
}

impl BatchSummary {
    /// Whether every asset produced metadata
    pub const fn succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Orchestrates batch analysis of image files with progress tracking
pub struct FileProcessor {
    cli: Cli,
    analyzer: Arc<TilesetAnalyzer>,
    overrides: Vec<ManualOverride>,
    progress_manager: Option<ProgressManager>,
}

impl FileProcessor {
    /// Create a new file processor with the given CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if the overrides file cannot be read or parsed.
    pub fn new(cli: Cli) -> Result<Self> {
        let overrides = match &cli.overrides {
            Some(path) => read_overrides(path)?,
            None => Vec::new(),
        };
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);
        let analyzer = Arc::new(TilesetAnalyzer::new(cli.analysis_config()));

        Ok(Self {
            cli,
            analyzer,
            overrides,
            progress_manager,
        })
    }

    /// Process files according to CLI arguments
    ///
    /// Per-asset failures are logged and counted; they do not stop the batch.
    ///
    /// # Errors
    ///
    /// Returns an error if the target is not a supported image or directory,
    /// or if the async runtime cannot be started.
    pub fn process(&mut self) -> Result<BatchSummary> {
        let (files, skipped) = self.collect_files()?;
        let mut summary = BatchSummary {
            skipped,
            ..BatchSummary::default()
        };
        if files.is_empty() {
            return Ok(summary);
        }

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_time()
            .build()
            .map_err(|source| AnalysisError::Runtime {
                reason: source.to_string(),
            })?;

        if let Some(pm) = &mut self.progress_manager {
            pm.initialize(files.len());
        }

        runtime.block_on(async {
            for (index, file) in files.iter().enumerate() {
                let start = Instant::now();
                match self.process_file(file, index).await {
                    Ok(FileOutcome::Analysed) => summary.analysed += 1,
                    Ok(FileOutcome::Minimal) => summary.minimal += 1,
                    Err(error) => {
                        error!(file = %file.display(), "{error}");
                        summary.failed += 1;
                    }
                }
                info!(
                    file = %file.display(),
                    elapsed_ms = start.elapsed().as_millis(),
                    "finished asset"
                );
            }
        });
        // Timed-out analyses may still be running on blocking threads
        runtime.shutdown_background();

        if let Some(pm) = &self.progress_manager {
            pm.finish();
        }
        info!(
            analysed = summary.analysed,
            minimal = summary.minimal,
            skipped = summary.skipped,
            failed = summary.failed,
            "batch complete"
        );
        Ok(summary)
    }

    fn collect_files(&self) -> Result<(Vec<PathBuf>, usize)> {
        let target = &self.cli.target;
        let candidates = if target.is_file() {
            if !is_supported_image(target) {
                return Err(invalid_parameter(
                    "target",
                    &target.display(),
                    &format!("file must be one of: {}", SUPPORTED_EXTENSIONS.join(", ")),
                ));
            }
            vec![target.clone()]
        } else if target.is_dir() {
            let entries = fs::read_dir(target).map_err(|source| AnalysisError::FileSystem {
                path: target.clone(),
                operation: "read directory",
                source,
            })?;
            let mut files = Vec::new();
            for entry in entries {
                let path = entry?.path();
                if path.is_file() && is_supported_image(&path) {
                    files.push(path);
                }
            }
            files.sort();
            files
        } else {
            return Err(invalid_parameter(
                "target",
                &target.display(),
                &"must be an image file or directory",
            ));
        };

        let total = candidates.len();
        let files: Vec<PathBuf> = candidates
            .into_iter()
            .filter(|path| self.should_process_file(path))
            .collect();
        let skipped = total - files.len();
        Ok((files, skipped))
    }

    fn should_process_file(&self, input_path: &Path) -> bool {
        if !self.cli.skip_existing() {
            return true;
        }
        let output_path = metadata_path(input_path);
        if output_path.exists() {
            info!(file = %input_path.display(), "skipping (metadata exists)");
            false
        } else {
            true
        }
    }

    async fn process_file(&mut self, input_path: &Path, index: usize) -> Result<FileOutcome> {
        self.enter_stage(index, input_path, "decode");
        let image = Arc::new(load_raster(input_path)?);

        self.enter_stage(index, input_path, "analyse");
        let request = AnalysisRequest::new(self.asset_name(input_path))
            .with_grid(self.cli.grid_params())
            .with_overrides(self.overrides.clone());
        let (metadata, outcome) = self.analyze_with_timeout(&image, request).await?;

        self.enter_stage(index, input_path, "write");
        write_metadata(&metadata, &metadata_path(input_path), self.cli.pretty)?;

        if self.cli.export_tiles {
            self.enter_stage(index, input_path, "export");
            let tiles = slice_tiles(&metadata.grid, image.width(), image.height())?;
            let base = input_path
                .file_stem()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();
            export_tiles(&image, &tiles, &tiles_directory(input_path), &base)?;
        }

        if let Some(pm) = &mut self.progress_manager {
            pm.complete_file(
                index,
                match outcome {
                    FileOutcome::Analysed => "done",
                    FileOutcome::Minimal => "minimal",
                },
            );
        }
        Ok(outcome)
    }

    // Runs the analysis on a blocking thread under the per-asset soft timeout
    async fn analyze_with_timeout(
        &self,
        image: &Arc<RasterImage>,
        request: AnalysisRequest,
    ) -> Result<(TilesetMetadata, FileOutcome)> {
        let analyzer = Arc::clone(&self.analyzer);
        let shared = Arc::clone(image);
        let asset = request.asset_name.clone();
        let params = request.grid;
        let task = tokio::task::spawn_blocking(move || analyzer.analyze(&shared, &request));

        let limit = Duration::from_secs(self.cli.timeout);
        let reason = match tokio::time::timeout(limit, task).await {
            Ok(Ok(analysed)) => {
                return analysed.map(|outcome| (outcome.metadata, FileOutcome::Analysed));
            }
            Ok(Err(join_error)) => format!("analysis aborted: {join_error}"),
            Err(_elapsed) => format!(
                "analysis exceeded {}s; only numeric metadata is available",
                self.cli.timeout
            ),
        };

        warn!(asset = %asset, "{reason}");
        let grid = resolve_grid(image, &params)?.spec;
        Ok((
            TilesetMetadata::minimal(image.width(), image.height(), grid, &reason),
            FileOutcome::Minimal,
        ))
    }

    fn asset_name(&self, input_path: &Path) -> String {
        self.cli.name.clone().unwrap_or_else(|| {
            input_path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string()
        })
    }

    fn enter_stage(&mut self, index: usize, input_path: &Path, stage: &str) {
        if let Some(pm) = &mut self.progress_manager {
            if stage == "decode" {
                pm.start_file(index, input_path);
            } else {
                pm.enter_stage(index, stage);
            }
        }
    }
}

/// Directory exported tiles are written to, `<stem>_tiles/` next to the input
pub fn tiles_directory(input_path: &Path) -> PathBuf {
    let stem = input_path.file_stem().unwrap_or_default();
    let directory = format!("{}_tiles", stem.to_string_lossy());
    input_path
        .parent()
        .map_or_else(|| PathBuf::from(&directory), |parent| parent.join(&directory))
}

/// Whether the path has an extension the batch processor picks up
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| supported.eq_ignore_ascii_case(extension))
        })
}

/// Read a JSON array of manual overrides
///
/// # Errors
///
/// Returns `FileSystem` if the file cannot be read, or `Serialization` if it
/// is not a valid override list.
pub fn read_overrides(path: &Path) -> Result<Vec<ManualOverride>> {
    let contents = fs::read_to_string(path).map_err(|source| AnalysisError::FileSystem {
        path: path.to_path_buf(),
        operation: "read overrides",
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| AnalysisError::Serialization {
        path: path.to_path_buf(),
        source,
    })
}

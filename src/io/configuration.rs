//! Analysis constants and runtime configuration defaults

// Grid auto-detection search space
/// Square tile sizes tried during grid auto-detection
pub const CANDIDATE_TILE_SIZES: [u32; 7] = [8, 16, 24, 32, 48, 64, 128];
/// Inter-tile spacings tried during grid auto-detection
pub const CANDIDATE_SPACINGS: [u32; 3] = [0, 1, 2];
/// Outer margins tried during grid auto-detection
pub const CANDIDATE_MARGINS: [u32; 2] = [0, 1];

/// Weight of tile area coverage in the grid candidate score
pub const COVERAGE_WEIGHT: f64 = 0.6;
/// Weight of unused leftover pixels in the grid candidate score
pub const LEFTOVER_WEIGHT: f64 = 0.3;
/// Weight of dark separator lines in the grid candidate score
pub const SEPARATOR_WEIGHT: f64 = 0.1;
/// Mean RGB below which a gutter pixel counts as a separator line
pub const SEPARATOR_DARKNESS: f64 = 100.0;
/// Best candidate score under which auto-detection falls back to divisors
pub const MIN_AUTO_DETECT_SCORE: f64 = 0.5;
/// Smallest tile edge considered by the divisor fallback
pub const MIN_DIVISOR_TILE: u32 = 8;
/// Largest tile edge considered by the divisor fallback
pub const MAX_DIVISOR_TILE: u32 = 128;
/// Tile edge used when no common divisor exists
pub const DEFAULT_TILE_SIZE: u32 = 32;
/// Confidence reported for grids resolved by the divisor fallback
pub const FALLBACK_GRID_CONFIDENCE: f64 = 0.3;
/// Tile dimensions are expected to be multiples of this
pub const PREFERRED_TILE_MULTIPLE: u32 = 8;

// Region segmentation
/// Alpha above which a pixel counts as occupied
pub const OCCUPANCY_ALPHA: u8 = 10;
/// Default minimum region edge in pixels
pub const DEFAULT_MIN_REGION_SIZE: u32 = 8;
/// Default padding used when merging nearby regions
pub const DEFAULT_MERGE_PADDING: u32 = 2;
/// Grid that surviving regions are snapped outward to
pub const DEFAULT_SNAP_SIZE: u32 = 8;
/// Minimum number of regions before a layout can be called grid-like
pub const GRID_LIKE_MIN_REGIONS: usize = 4;
/// Maximum relative size spread of grid-like regions
pub const GRID_LIKE_MAX_VARIATION: f64 = 0.15;
/// Fraction of implied rows x cols that must be filled to be grid-like
pub const GRID_LIKE_MIN_FILL: f64 = 0.8;

// Pattern classification
/// Similarity below which the blob16 corner tiles count as dissimilar
pub const BLOB16_CORNER_DISSIMILARITY: f64 = 0.5;
/// Similarity above which parallel edge tiles count as matching
pub const BLOB16_EDGE_SIMILARITY: f64 = 0.6;
/// Similarity above which interior tiles count as consistent
pub const BLOB16_INTERIOR_SIMILARITY: f64 = 0.8;
/// Score added when corner tiles are dissimilar
pub const BLOB16_CORNER_SCORE: f64 = 0.3;
/// Score added when parallel edges match
pub const BLOB16_EDGE_SCORE: f64 = 0.3;
/// Score added when interior tiles are consistent
pub const BLOB16_INTERIOR_SCORE: f64 = 0.4;
/// Window confidence under which blob16 reports no match
pub const BLOB16_MIN_CONFIDENCE: f64 = 0.3;
/// Pattern confidence required before its names are merged
pub const PATTERN_MERGE_THRESHOLD: f64 = 0.6;

// Color classification
/// Byte stride between sampled pixels (every 4th RGBA pixel)
pub const COLOR_SAMPLE_STRIDE_BYTES: usize = 16;
/// Alpha below which a sampled pixel is ignored
pub const COLOR_MIN_ALPHA: u8 = 128;
/// Number of 10 degree hue bins
pub const HUE_BINS: usize = 36;
/// Number of saturation bins
pub const SATURATION_BINS: usize = 10;
/// Number of lightness bins
pub const LIGHTNESS_BINS: usize = 10;

// Seam validation
/// Euclidean RGB distance above which opposite edges count as a seam
pub const SEAM_DISTANCE_THRESHOLD: f64 = 50.0;

// Name catalog
/// Confidence attached to a vendor naming convention match
pub const CATALOG_MATCH_CONFIDENCE: f64 = 0.9;
/// Material used when no keyword matches
pub const FALLBACK_MATERIAL: &str = "tile";
/// Prefix for pattern-derived names when no color material was detected
///
/// Kept distinct from the `tile_<index>` fallback names so the two never share a group.
pub const PATTERN_FALLBACK_MATERIAL: &str = "terrain";

// Renaming
/// Number of renamed selections echoed in a rename summary
pub const RENAME_SAMPLE_SIZE: usize = 5;

// Batch processing
/// Number of files shown with individual progress bars
pub const MAX_INDIVIDUAL_PROGRESS_BARS: usize = 5;
/// Default soft timeout per asset in seconds
pub const DEFAULT_ASSET_TIMEOUT_SECS: u64 = 30;
/// Suffix added to metadata output filenames
pub const OUTPUT_SUFFIX: &str = "_metadata";
/// Image extensions picked up when processing a directory
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["png", "gif", "bmp", "webp"];

/// Runtime knobs for a single tileset analysis
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnalysisConfig {
    /// Regions narrower or shorter than this are discarded
    pub min_region_size: u32,
    /// Padding applied when testing regions for merging
    pub merge_padding: u32,
    /// Grid detected regions are snapped outward to
    pub snap_size: u32,
    /// Pattern confidence required to merge pattern names
    pub pattern_merge_threshold: f64,
    /// RGB distance above which seams are reported
    pub seam_distance_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_region_size: DEFAULT_MIN_REGION_SIZE,
            merge_padding: DEFAULT_MERGE_PADDING,
            snap_size: DEFAULT_SNAP_SIZE,
            pattern_merge_threshold: PATTERN_MERGE_THRESHOLD,
            seam_distance_threshold: SEAM_DISTANCE_THRESHOLD,
        }
    }
}

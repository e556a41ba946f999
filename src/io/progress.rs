//! Batch progress display with a rolling window of per-file stage bars

use crate::io::configuration::MAX_INDIVIDUAL_PROGRESS_BARS;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;

/// Stages every asset goes through, in order
pub const ASSET_STAGES: [&str; 4] = ["decode", "analyse", "write", "export"];

/// Display state of one file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileState {
    /// File name shown as the bar prefix
    pub name: String,
    /// Completed stages
    pub completed: usize,
    /// Label of the current stage
    pub stage: String,
}

/// Coordinates progress display for batch analysis
///
/// Small batches get one bar per file; larger ones add an overall file bar and
/// only the most recent files keep a stage bar.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    file_bars: Vec<ProgressBar>,
    file_states: Vec<FileState>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

static STAGE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{prefix:>24} [{bar:20.cyan/blue}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Assets: [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            file_bars: Vec::new(),
            file_states: Vec::new(),
        }
    }

    /// Progress manager that draws nothing, for tests and quiet runs
    pub fn hidden() -> Self {
        Self {
            multi_progress: MultiProgress::with_draw_target(indicatif::ProgressDrawTarget::hidden()),
            ..Self::new()
        }
    }

    /// Create bars for `file_count` files
    pub fn initialize(&mut self, file_count: usize) {
        if file_count > MAX_INDIVIDUAL_PROGRESS_BARS + 1 {
            let batch_bar = ProgressBar::new(file_count as u64);
            batch_bar.set_style(BATCH_STYLE.clone());
            self.batch_bar = Some(self.multi_progress.add(batch_bar));
        }

        for _ in 0..file_count.min(MAX_INDIVIDUAL_PROGRESS_BARS) {
            let bar = ProgressBar::new(ASSET_STAGES.len() as u64);
            bar.set_style(STAGE_STYLE.clone());
            self.file_bars.push(self.multi_progress.add(bar));
        }
    }

    /// Begin tracking a file
    pub fn start_file(&mut self, index: usize, path: &Path) {
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        if index >= self.file_states.len() {
            self.file_states.resize(index + 1, FileState::default());
        }
        if let Some(state) = self.file_states.get_mut(index) {
            *state = FileState {
                name,
                completed: 0,
                stage: ASSET_STAGES.first().copied().unwrap_or_default().to_string(),
            };
        }
        self.update_bars();
    }

    /// Record that a file moved on to `stage`
    pub fn enter_stage(&mut self, index: usize, stage: &str) {
        if let Some(state) = self.file_states.get_mut(index) {
            if let Some(position) = ASSET_STAGES.iter().position(|known| *known == stage) {
                state.completed = position;
            }
            state.stage = stage.to_string();
        }
        self.update_bars();
    }

    /// Mark a file as done and advance the batch bar
    pub fn complete_file(&mut self, index: usize, outcome: &str) {
        if let Some(batch_bar) = &self.batch_bar {
            batch_bar.inc(1);
        }
        if let Some(state) = self.file_states.get_mut(index) {
            state.completed = ASSET_STAGES.len();
            state.stage = outcome.to_string();
        }
        self.update_bars();
    }

    /// Tracked state of a file
    pub fn file_state(&self, index: usize) -> Option<&FileState> {
        self.file_states.get(index)
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(batch_bar) = &self.batch_bar {
            batch_bar.finish_with_message("All assets processed");
        }
        let _ = self.multi_progress.clear();
    }

    // Show the most recently started files on the available bars
    fn update_bars(&self) {
        let active: Vec<&FileState> = self
            .file_states
            .iter()
            .filter(|state| !state.name.is_empty())
            .collect();
        let start = active.len().saturating_sub(MAX_INDIVIDUAL_PROGRESS_BARS);
        let visible = active.get(start..).unwrap_or(&[]);

        for (bar_index, state) in visible.iter().enumerate() {
            if let Some(bar) = self.file_bars.get(bar_index) {
                bar.set_position(state.completed as u64);
                bar.set_message(state.stage.clone());
                bar.set_prefix(state.name.clone());
            }
        }

        for bar in self.file_bars.iter().skip(visible.len()) {
            bar.set_position(0);
            bar.set_message(String::new());
            bar.set_prefix(String::new());
        }
    }
}

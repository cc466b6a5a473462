//! Per-cell progress display for moodboard composition

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock};

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Cells: [{bar:30.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Tracks how many cells of one export have been rendered
///
/// Cloning shares the same underlying bar.
#[derive(Clone)]
pub struct ProgressManager {
    bar: ProgressBar,
    failed: Arc<AtomicUsize>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Progress bar drawn to the terminal
    pub fn new() -> Self {
        Self::with_bar(ProgressBar::new(0))
    }

    /// Progress tracking without any terminal output
    pub fn hidden() -> Self {
        Self::with_bar(ProgressBar::hidden())
    }

    fn with_bar(bar: ProgressBar) -> Self {
        bar.set_style(PROGRESS_STYLE.clone());
        Self {
            bar,
            failed: Arc::default(),
        }
    }

    /// Reset for an export of `cells` cells
    pub fn begin(&self, cells: usize) {
        self.bar.reset();
        self.bar.set_length(cells as u64);
        self.bar.set_message(String::new());
        self.failed.store(0, Ordering::Relaxed);
    }

    /// Report the cell about to be loaded
    pub fn start_cell(&self, position: usize, tag: &str) {
        self.bar.set_message(format!("#{position} {tag}"));
    }

    /// Report that a cell settled, loaded or not
    pub fn complete_cell(&self, loaded: bool) {
        if !loaded {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
        self.bar.inc(1);
    }

    /// Close the bar with a summary
    pub fn finish(&self) {
        let failed = self.failed_cells();
        if failed == 0 {
            self.bar.finish_with_message("all images loaded");
        } else {
            self.bar
                .finish_with_message(format!("{failed} cell(s) used placeholders"));
        }
    }

    /// Cells settled so far
    pub fn completed_cells(&self) -> u64 {
        self.bar.position()
    }

    /// Cells that fell back to a placeholder so far
    pub fn failed_cells(&self) -> usize {
        self.failed.load(Ordering::Relaxed)
    }
}

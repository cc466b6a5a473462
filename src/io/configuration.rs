//! Board, fetch and composition constants and runtime defaults

use std::time::Duration;

// Board sizing
/// Number of slots created by `initialize`
pub const DEFAULT_SLOT_COUNT: usize = 7;
/// Smallest collection size; `remove_slot` is a no-op at this floor
pub const MIN_SLOTS: usize = 1;
/// Largest collection size; `add_slot` is a no-op at this ceiling
pub const MAX_SLOTS: usize = 12;

// Timing
/// Upper bound on a single Fetch Adapter call
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
/// Hard cutoff for loading one cell's image during composition
pub const IMAGE_LOAD_TIMEOUT: Duration = Duration::from_secs(5);
/// Pause before a regenerate starts fetching, letting a loading state commit
pub const SETTLE_DELAY: Duration = Duration::from_millis(300);

// Similarity
/// Candidate count when a seed tag belongs to no known category
pub const RELATED_SAMPLE_SIZE: usize = 10;

// Local fallback set
/// Number of bundled placeholder images (`sample1.png` … `sampleN.png`)
pub const FALLBACK_IMAGE_COUNT: usize = 7;
/// Default directory of the placeholder images, relative to the working directory
pub const FALLBACK_DIRECTORY: &str = "assets";

// Canvas
/// Default export width in pixels
pub const DEFAULT_CANVAS_WIDTH: u32 = 1200;
/// Default export height in pixels
pub const DEFAULT_CANVAS_HEIGHT: u32 = 900;
// Caps a single RGBA surface at 1 GiB
/// Largest accepted canvas dimension
pub const MAX_CANVAS_DIMENSION: u32 = 16_384;
/// Space between neighbouring cells in pixels
pub const DEFAULT_GUTTER: u32 = 10;

// Reproducibility
/// Fixed seed for reproducible tag draws
pub const DEFAULT_SEED: u64 = 42;

// Output settings
/// Prefix of generated export file names
pub const EXPORT_PREFIX: &str = "moodboard";
/// Label drawn in a cell whose image could not be loaded
pub const UNAVAILABLE_LABEL: &str = "Image unavailable";

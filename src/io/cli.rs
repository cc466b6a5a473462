//! Command-line interface: runs one scripted board session and exports the result

use crate::board::state::LockPolicy;
use crate::board::store::{BoardConfig, BoardStore, LockOutcome};
use crate::compose::engine::Composer;
use crate::compose::layout::CanvasSize;
use crate::fetch::fallback::FallbackImages;
use crate::fetch::loader::DefaultImageLoader;
use crate::fetch::source::{DirectoryImageSource, HttpImageSource, ImageSource};
use crate::io::configuration::{
    DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, DEFAULT_SEED, DEFAULT_SLOT_COUNT,
    FALLBACK_DIRECTORY, FALLBACK_IMAGE_COUNT,
};
use crate::io::error::Result;
use crate::io::logging::Verbosity;
use crate::io::progress::ProgressManager;
use crate::similarity::taxonomy::Taxonomy;
use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

/// One `FROM:TO` reorder step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotMove {
    /// Index of the slot to move
    pub from: usize,
    /// Index it should end up at
    pub to: usize,
}

impl FromStr for SlotMove {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (from, to) = s
            .split_once(':')
            .ok_or_else(|| format!("expected FROM:TO, got '{s}'"))?;
        let parse = |part: &str| {
            part.trim()
                .parse::<usize>()
                .map_err(|e| format!("invalid index '{part}': {e}"))
        };
        Ok(Self {
            from: parse(from)?,
            to: parse(to)?,
        })
    }
}

#[derive(Parser)]
#[command(name = "moodboard")]
#[command(
    author,
    version,
    about = "Build a moodboard from an image search and export it as one PNG"
)]
/// Command-line arguments for a moodboard session
// Verbosity and lock-mode switches are independent boolean flags
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Search images in this local folder (file names are matched against the query)
    #[arg(short = 'd', long, value_name = "DIR", conflicts_with = "endpoint")]
    pub source_dir: Option<PathBuf>,

    /// Search images through this HTTP endpoint (`?query=&count=` -> `{"images": [...]}`)
    #[arg(short, long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Search query; empty means unfiltered
    #[arg(short, long, default_value = "")]
    pub query: String,

    /// Number of slots on the initial board
    #[arg(short = 'n', long, default_value_t = DEFAULT_SLOT_COUNT)]
    pub count: usize,

    /// Lock the slot at this index after loading (repeatable)
    #[arg(short, long = "lock", value_name = "INDEX")]
    pub locks: Vec<usize>,

    /// Move a slot, `FROM:TO`, after locking (repeatable)
    #[arg(short, long = "move", value_name = "FROM:TO")]
    pub moves: Vec<SlotMove>,

    /// Append this many slots before regenerating
    #[arg(short, long, default_value_t = 0)]
    pub add: usize,

    /// Regenerate the unlocked slots this many times
    #[arg(short, long, default_value_t = 0)]
    pub regenerate: usize,

    /// Canvas width in pixels
    #[arg(short = 'W', long, default_value_t = DEFAULT_CANVAS_WIDTH)]
    pub width: u32,

    /// Canvas height in pixels
    #[arg(short = 'H', long, default_value_t = DEFAULT_CANVAS_HEIGHT)]
    pub height: u32,

    /// Directory receiving the exported PNG
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Random seed for tag draws and placeholder labels
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Directory holding the `sample1.png` … placeholder images; relative paths
    /// resolve against the working directory
    #[arg(long, value_name = "DIR", default_value = FALLBACK_DIRECTORY)]
    pub fallback_dir: PathBuf,

    /// JSON taxonomy file (`[{"name": ..., "tags": [...]}]`) replacing the built-in one
    #[arg(short, long, value_name = "FILE")]
    pub taxonomy: Option<PathBuf>,

    /// Allow several locked slots at once; locking no longer regenerates
    #[arg(long)]
    pub multi_lock: bool,

    /// Only log warnings and hide the progress bar
    #[arg(long)]
    pub quiet: bool,

    /// Log per-slot detail
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,
}

impl Cli {
    /// Logging verbosity requested by the flags
    pub const fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Lock cardinality requested by the flags
    pub const fn lock_policy(&self) -> LockPolicy {
        if self.multi_lock {
            LockPolicy::Multi
        } else {
            LockPolicy::Single
        }
    }

    /// Target canvas
    pub const fn canvas(&self) -> CanvasSize {
        CanvasSize::new(self.width, self.height)
    }
}

/// Runs the scripted session: initialize, lock, move, add, regenerate, export
pub struct SessionProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl SessionProcessor {
    /// Create a processor for the given arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);
        Self {
            cli,
            progress_manager,
        }
    }

    /// Build the store described by the arguments
    ///
    /// # Errors
    ///
    /// Returns an error if the taxonomy file cannot be loaded or the slot count is
    /// out of range
    pub fn build_store(&self) -> Result<BoardStore> {
        let taxonomy = match &self.cli.taxonomy {
            Some(path) => Taxonomy::from_json_file(path)?,
            None => Taxonomy::builtin(),
        };

        let source: Arc<dyn ImageSource> = match (&self.cli.endpoint, &self.cli.source_dir) {
            (Some(endpoint), _) => Arc::new(HttpImageSource::new(endpoint.clone())),
            (None, Some(dir)) => Arc::new(DirectoryImageSource::new(dir.clone(), self.cli.seed)),
            (None, None) => Arc::new(DirectoryImageSource::new(
                self.cli.fallback_dir.clone(),
                self.cli.seed,
            )),
        };

        let config = BoardConfig {
            slot_count: self.cli.count,
            lock_policy: self.cli.lock_policy(),
            seed: self.cli.seed,
            fallback: FallbackImages::new(self.cli.fallback_dir.clone(), FALLBACK_IMAGE_COUNT),
            ..BoardConfig::default()
        };
        BoardStore::new(source, Arc::new(taxonomy), config)
    }

    /// Run the session and write the moodboard; returns the written file
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be built, no surface is available for
    /// the canvas, or the file cannot be written
    pub async fn process(&self) -> Result<PathBuf> {
        let store = self.build_store()?;
        store.initialize(&self.cli.query).await;

        for &index in &self.cli.locks {
            let Some(slot) = store.snapshot().into_iter().nth(index) else {
                warn!(index, "no slot at index; lock skipped");
                continue;
            };
            match store.toggle_lock(slot.id).await {
                LockOutcome::Locked { regenerated } => {
                    info!(index, tag = %slot.tag, ?regenerated, "locked");
                }
                outcome => info!(index, ?outcome, "lock toggled"),
            }
        }

        for slot_move in &self.cli.moves {
            if !store.reorder(slot_move.from, slot_move.to).await {
                warn!(from = slot_move.from, to = slot_move.to, "move skipped");
            }
        }

        for _ in 0..self.cli.add {
            if store.add_slot(&self.cli.query).await.is_none() {
                warn!("board is full; no more slots added");
                break;
            }
        }

        for round in 1..=self.cli.regenerate {
            let outcome = store.regenerate(&self.cli.query).await;
            info!(round, ?outcome, "regenerated");
        }

        let slots = store.snapshot();
        let mut composer = Composer::new(Arc::new(DefaultImageLoader::new()));
        if let Some(progress) = &self.progress_manager {
            composer = composer.with_progress(progress.clone());
        }
        let composition = composer.compose(&slots, self.cli.canvas()).await?;
        let path = composition.save_to(&self.cli.output)?;
        info!(
            path = %path.display(),
            cells = composition.cells.len(),
            failed = composition.failed_cells(),
            "moodboard saved"
        );
        Ok(path)
    }
}

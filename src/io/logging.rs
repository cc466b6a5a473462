//! Tracing subscriber setup for the command-line tool

use tracing_subscriber::EnvFilter;

/// Verbosity requested on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Warnings and errors only
    Quiet,
    /// Lifecycle events
    #[default]
    Normal,
    /// Per-slot and per-cell detail
    Verbose,
}

impl Verbosity {
    /// Verbosity from the `--quiet`/`--verbose` flags; quiet wins
    pub const fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    /// Filter directive applied when `RUST_LOG` is unset
    pub const fn directive(self) -> &'static str {
        match self {
            Self::Quiet => "warn",
            Self::Normal => "info",
            Self::Verbose => "debug",
        }
    }
}

/// Filter honoring `RUST_LOG`, falling back to `verbosity`
pub fn env_filter(verbosity: Verbosity) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_missing| EnvFilter::new(verbosity.directive()))
}

/// Install the global subscriber writing to stderr
///
/// Returns false if a subscriber was already installed.
pub fn init(verbosity: Verbosity) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbosity))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

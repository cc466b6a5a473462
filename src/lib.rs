//! Lock-preserving moodboard state and grid composition engine
//!
//! A board holds an ordered collection of image slots filled from an image search.
//! Locked slots survive regeneration and seed related-tag searches for the rest;
//! the finished board is rendered into a single PNG grid.

#![forbid(unsafe_code)]

/// Slot collection state and the store that serializes its mutations
pub mod board;
/// Grid layout and rendering of the board into an image
pub mod compose;
/// Image search adapters, placeholder images and image loading
pub mod fetch;
/// Command-line interface, configuration, errors, logging and progress display
pub mod io;
/// Tag taxonomy and related-tag resolution
pub mod similarity;

pub use board::slot::{ImageSlot, SlotId};
pub use board::store::{BoardConfig, BoardStore, LockOutcome, RegenerateOutcome};
pub use compose::engine::{Composer, Composition};
pub use io::error::{MoodboardError, Result};

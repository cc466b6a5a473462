/// Local placeholder image set
pub mod fallback;
/// Image loading for composition
pub mod loader;
/// Image search adapters
pub mod source;

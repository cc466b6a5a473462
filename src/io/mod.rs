/// Command-line interface and the scripted board session it runs
pub mod cli;
/// Default values and limits
pub mod configuration;
/// Error types
pub mod error;
/// Tracing subscriber setup
pub mod logging;
/// Terminal progress for composition
pub mod progress;

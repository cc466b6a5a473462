//! Error types for board, fetch, load and export operations

use std::fmt;
use std::path::PathBuf;

/// Main error type for operations that can fail as a whole
///
/// Per-image problems never show up here: a failed fetch falls back to local
/// placeholders and a failed cell load falls back to a placeholder cell.
#[derive(Debug)]
pub enum MoodboardError {
    /// No drawable surface could be obtained for the requested canvas
    SurfaceUnavailable {
        /// Requested canvas width
        width: u32,
        /// Requested canvas height
        height: u32,
        /// Why the surface could not be created
        reason: String,
    },

    /// Failed to encode the composed canvas
    Encode {
        /// Underlying image encoding error
        source: image::ImageError,
    },

    /// Configuration or argument validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Taxonomy data could not be parsed
    TaxonomyParse {
        /// File the taxonomy was read from
        path: PathBuf,
        /// Underlying JSON error
        source: serde_json::Error,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for MoodboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SurfaceUnavailable {
                width,
                height,
                reason,
            } => {
                write!(
                    f,
                    "Unable to create a {width}x{height} drawing surface: {reason}"
                )
            }
            Self::Encode { source } => {
                write!(f, "Failed to encode moodboard image: {source}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::TaxonomyParse { path, source } => {
                write!(f, "Failed to parse taxonomy '{}': {source}", path.display())
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for MoodboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Encode { source } => Some(source),
            Self::TaxonomyParse { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::SurfaceUnavailable { .. } | Self::InvalidParameter { .. } => None,
        }
    }
}

impl From<image::ImageError> for MoodboardError {
    fn from(err: image::ImageError) -> Self {
        Self::Encode { source: err }
    }
}

/// Convenience type alias for moodboard results
pub type Result<T> = std::result::Result<T, MoodboardError>;

/// Why a Fetch Adapter call produced no usable locations
///
/// Always recovered by the board store; never surfaced to its callers.
#[derive(Debug)]
pub enum FetchError {
    /// Transport-level HTTP failure
    Http(reqwest::Error),
    /// Upstream answered with a non-success status
    Status(u16),
    /// Payload did not have the expected shape
    Payload(String),
    /// Local source could not be read
    Io(std::io::Error),
    /// No answer within the fetch timeout
    Timeout,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(source) => write!(f, "image search request failed: {source}"),
            Self::Status(code) => write!(f, "image search returned status {code}"),
            Self::Payload(reason) => write!(f, "malformed image search payload: {reason}"),
            Self::Io(source) => write!(f, "image source unreadable: {source}"),
            Self::Timeout => write!(f, "image search timed out"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(source) => Some(source),
            Self::Io(source) => Some(source),
            Self::Status(_) | Self::Payload(_) | Self::Timeout => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err)
    }
}

impl From<std::io::Error> for FetchError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Why a single cell's image could not be loaded during composition
#[derive(Debug)]
pub enum LoadError {
    /// Local file could not be read
    Io {
        /// Location that was requested
        location: String,
        /// Underlying I/O error
        source: std::io::Error,
    },
    /// Remote image could not be downloaded
    Http {
        /// Location that was requested
        location: String,
        /// Underlying HTTP error
        source: reqwest::Error,
    },
    /// Remote image answered with a non-success status
    Status {
        /// Location that was requested
        location: String,
        /// HTTP status code
        code: u16,
    },
    /// Bytes were fetched but are not a decodable image
    Decode {
        /// Location that was requested
        location: String,
        /// Underlying decoder error
        source: image::ImageError,
    },
    /// Background decode task panicked or was cancelled
    Task {
        /// Location that was requested
        location: String,
        /// Join failure of the blocking task
        source: tokio::task::JoinError,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { location, source } => write!(f, "cannot read '{location}': {source}"),
            Self::Http { location, source } => {
                write!(f, "cannot download '{location}': {source}")
            }
            Self::Status { location, code } => {
                write!(f, "'{location}' answered with status {code}")
            }
            Self::Decode { location, source } => {
                write!(f, "cannot decode '{location}': {source}")
            }
            Self::Task { location, source } => {
                write!(f, "decoding '{location}' did not finish: {source}")
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Http { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
            Self::Task { source, .. } => Some(source),
            Self::Status { .. } => None,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> MoodboardError {
    MoodboardError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a surface acquisition error
pub fn surface_unavailable(width: u32, height: u32, reason: &impl ToString) -> MoodboardError {
    MoodboardError::SurfaceUnavailable {
        width,
        height,
        reason: reason.to_string(),
    }
}

//! Image resource loading for composition

use crate::board::slot::is_remote_location;
use crate::io::error::LoadError;
use async_trait::async_trait;
use image::DynamicImage;

/// Loads and decodes the image behind a slot location
#[async_trait]
pub trait ImageLoader: Send + Sync {
    /// Load and decode the image at `location`
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] when the resource cannot be read or decoded
    async fn load(&self, location: &str) -> Result<DynamicImage, LoadError>;
}

fn decode(location: &str, bytes: &[u8]) -> Result<DynamicImage, LoadError> {
    image::load_from_memory(bytes).map_err(|source| LoadError::Decode {
        location: location.to_string(),
        source,
    })
}

/// Run a read-and-decode job on the blocking pool
///
/// Decoding is CPU-bound. Off the async worker, a caller's timeout can fire
/// while the decode is still running.
async fn run_blocking<F>(location: &str, job: F) -> Result<DynamicImage, LoadError>
where
    F: FnOnce() -> Result<DynamicImage, LoadError> + Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|source| LoadError::Task {
            location: location.to_string(),
            source,
        })?
}

/// Reads images from the local file system
///
/// Accepts plain paths and `file://` URIs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsImageLoader;

#[async_trait]
impl ImageLoader for FsImageLoader {
    async fn load(&self, location: &str) -> Result<DynamicImage, LoadError> {
        let owned = location.to_string();
        run_blocking(location, move || {
            let path = owned.strip_prefix("file://").unwrap_or(owned.as_str());
            let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
                location: owned.clone(),
                source,
            })?;
            decode(&owned, &bytes)
        })
        .await
    }
}

/// Downloads images over HTTP
#[derive(Debug, Clone, Default)]
pub struct HttpImageLoader {
    client: reqwest::Client,
}

impl HttpImageLoader {
    /// Loader using a caller-configured client
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageLoader for HttpImageLoader {
    async fn load(&self, location: &str) -> Result<DynamicImage, LoadError> {
        let http_error = |source| LoadError::Http {
            location: location.to_string(),
            source,
        };
        let response = self.client.get(location).send().await.map_err(http_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                location: location.to_string(),
                code: status.as_u16(),
            });
        }
        let bytes = response.bytes().await.map_err(http_error)?;
        let owned = location.to_string();
        run_blocking(location, move || decode(&owned, &bytes)).await
    }
}

/// Routes `http(s)://` locations to HTTP and everything else to the file system
#[derive(Debug, Clone, Default)]
pub struct DefaultImageLoader {
    fs: FsImageLoader,
    http: HttpImageLoader,
}

impl DefaultImageLoader {
    /// Router with a default HTTP client
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ImageLoader for DefaultImageLoader {
    async fn load(&self, location: &str) -> Result<DynamicImage, LoadError> {
        if is_remote_location(location) {
            self.http.load(location).await
        } else {
            self.fs.load(location).await
        }
    }
}

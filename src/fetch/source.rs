//! Fetch Adapter: "give me N image locations for a query"

use crate::io::error::FetchError;
use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// File extensions the directory source treats as images
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Opaque asynchronous image search capability
///
/// Implementations may return fewer locations than requested; callers pad the
/// difference. An empty `query` asks for unfiltered results.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Fetch up to `count` image locations matching `query`
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] when the upstream cannot be reached or answers with
    /// something other than a list of locations
    async fn fetch_images(&self, query: &str, count: usize) -> Result<Vec<String>, FetchError>;
}

#[derive(Debug, Deserialize)]
struct SearchPayload {
    images: Vec<String>,
}

/// Image search over HTTP
///
/// Issues `GET {endpoint}?query=<q>&count=<n>` and expects `{"images": [...]}`.
#[derive(Debug, Clone)]
pub struct HttpImageSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpImageSource {
    /// Source querying `endpoint` with a default client
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    /// Source querying `endpoint` with a caller-configured client
    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// The search endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch_images(&self, query: &str, count: usize) -> Result<Vec<String>, FetchError> {
        let count_param = count.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("query", query), ("count", count_param.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let payload: SearchPayload = response
            .json()
            .await
            .map_err(|e| FetchError::Payload(e.to_string()))?;

        Ok(payload
            .images
            .into_iter()
            .filter(|location| !location.trim().is_empty())
            .take(count)
            .collect())
    }
}

/// Offline image search over a local folder
///
/// A file matches when its stem contains any comma-separated query term,
/// ignoring case and treating `-`/`_` as spaces. Matches are shuffled with a
/// seeded generator so repeated searches vary but stay reproducible.
#[derive(Debug)]
pub struct DirectoryImageSource {
    root: PathBuf,
    rng: Mutex<StdRng>,
}

impl DirectoryImageSource {
    /// Source over the images directly inside `root`
    pub fn new(root: impl Into<PathBuf>, seed: u64) -> Self {
        Self {
            root: root.into(),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Folder searched by this source
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn matches(path: &Path, terms: &[String]) -> bool {
        if terms.is_empty() {
            return true;
        }
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_lowercase().replace(['-', '_'], " "))
            .unwrap_or_default();
        terms.iter().any(|term| stem.contains(term.as_str()))
    }
}

/// Whether a path carries one of [`IMAGE_EXTENSIONS`]
pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

#[async_trait]
impl ImageSource for DirectoryImageSource {
    async fn fetch_images(&self, query: &str, count: usize) -> Result<Vec<String>, FetchError> {
        let terms: Vec<String> = query
            .split(',')
            .map(|term| term.trim().to_lowercase())
            .filter(|term| !term.is_empty())
            .collect();

        let mut entries = tokio::fs::read_dir(&self.root).await?;
        let mut matches = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_file = entry.file_type().await?.is_file();
            if is_file && has_image_extension(&path) && Self::matches(&path, &terms) {
                matches.push(path);
            }
        }
        matches.sort();

        {
            let mut rng = self
                .rng
                .lock()
                .map_err(|_poisoned| FetchError::Payload("directory source rng poisoned".into()))?;
            matches.shuffle(&mut *rng);
        }

        Ok(matches
            .into_iter()
            .take(count)
            .map(|path| path.to_string_lossy().into_owned())
            .collect())
    }
}

//! Contract with the data-fetch collaborator.
//!
//! The console never retries; a failed fetch is recorded verbatim next to
//! the last good data, and the caller decides when to `refetch`.

use async_trait::async_trait;
use estate_model::Snapshot;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use tracing::warn;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    #[error("failed to decode snapshot: {0}")]
    Decode(String),

    #[error("upstream error: {0}")]
    Upstream(String),
}

/// What the view layer sees of one collection.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchState<T> {
    pub data: Option<T>,
    pub is_loading: bool,
    pub error: Option<FetchError>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            data: None,
            is_loading: false,
            error: None,
        }
    }
}

impl<T> FetchState<T> {
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            ..Self::default()
        }
    }

    pub fn ready(data: T) -> Self {
        Self {
            data: Some(data),
            ..Self::default()
        }
    }

    pub fn failed(error: FetchError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }
}

#[async_trait]
pub trait CollectionFetcher<P, T>: Send + Sync
where
    P: Send + Sync,
{
    async fn fetch(&self, params: &P) -> Result<T, FetchError>;
}

/// One fetched collection plus its parameters.
pub struct Collection<P, T> {
    fetcher: Arc<dyn CollectionFetcher<P, T>>,
    params: P,
    state: FetchState<T>,
}

impl<P, T> Collection<P, T>
where
    P: Send + Sync,
    T: Send,
{
    pub fn new(fetcher: Arc<dyn CollectionFetcher<P, T>>, params: P) -> Self {
        Self {
            fetcher,
            params,
            state: FetchState::default(),
        }
    }

    pub fn state(&self) -> &FetchState<T> {
        &self.state
    }

    pub fn params(&self) -> &P {
        &self.params
    }

    pub fn set_params(&mut self, params: P) {
        self.params = params;
    }

    /// Fetch again. On failure the previous data stays in place and the
    /// error is recorded as returned.
    pub async fn refetch(&mut self) -> &FetchState<T> {
        self.state.is_loading = true;
        match self.fetcher.fetch(&self.params).await {
            Ok(data) => {
                self.state.data = Some(data);
                self.state.error = None;
            }
            Err(err) => {
                warn!("fetch failed: {err}");
                self.state.error = Some(err);
            }
        }
        self.state.is_loading = false;
        &self.state
    }
}

/// Reads a [`Snapshot`] from a JSON file.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonFileFetcher;

#[async_trait]
impl CollectionFetcher<PathBuf, Snapshot> for JsonFileFetcher {
    async fn fetch(&self, path: &PathBuf) -> Result<Snapshot, FetchError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|err| FetchError::Io {
                path: path.display().to_string(),
                message: err.to_string(),
            })?;
        let snapshot: Snapshot =
            serde_json::from_str(&raw).map_err(|err| FetchError::Decode(err.to_string()))?;
        info!(
            path = %path.display(),
            sites = snapshot.sites.len(),
            buildings = snapshot.buildings.len(),
            "snapshot loaded"
        );
        Ok(snapshot)
    }
}

//! One-shot spec loading: remote URL first, local file as fallback, cached on success.

use crate::config::{ApiServerConfig, DEFAULT_SPEC_FETCH_TIMEOUT};
use crate::error::{OpenApiToolsError, Result};
use crate::index::list_summaries;
use crate::spec::{Spec, parse_spec};
use apidocs_http_tools::safety::sanitize_reqwest_error;
use reqwest::Client;
use reqwest::header::ACCEPT;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

/// `Accept` header sent with the remote fetch.
pub const SPEC_ACCEPT: &str =
    "application/yaml, application/x-yaml, text/yaml, application/json, text/plain";

/// Loads the spec at most once per process.
///
/// Concurrent first callers share a single load. A failed load is not cached, so the next caller
/// tries again.
#[derive(Debug)]
pub struct SpecLoader {
    spec_url: Option<String>,
    local_path: PathBuf,
    fetch_timeout: Duration,
    client: Client,
    cache: OnceCell<Arc<Spec>>,
}

impl SpecLoader {
    #[must_use]
    pub fn new(spec_url: Option<String>, local_path: impl Into<PathBuf>, client: Client) -> Self {
        Self {
            spec_url: spec_url.filter(|u| !u.trim().is_empty()),
            local_path: local_path.into(),
            fetch_timeout: DEFAULT_SPEC_FETCH_TIMEOUT,
            client,
            cache: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn from_config(config: &ApiServerConfig, client: Client) -> Self {
        Self::new(
            config.spec_url.clone(),
            config.local_spec_path.clone(),
            client,
        )
        .with_fetch_timeout(config.spec_fetch_timeout)
    }

    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    #[must_use]
    pub fn spec_url(&self) -> Option<&str> {
        self.spec_url.as_deref()
    }

    #[must_use]
    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    /// The cached spec, if a load has already succeeded.
    #[must_use]
    pub fn cached(&self) -> Option<Arc<Spec>> {
        self.cache.get().cloned()
    }

    /// Return the cached spec, loading it first if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote fetch fails (or is disabled) and the local file cannot be
    /// read, or if the content that was obtained parses as neither YAML nor JSON.
    pub async fn load(&self) -> Result<Arc<Spec>> {
        self.cache
            .get_or_try_init(|| self.load_uncached())
            .await
            .cloned()
    }

    async fn load_uncached(&self) -> Result<Arc<Spec>> {
        let (content, location) = self.read_content().await?;
        let spec = parse_spec(&content, &location)?;
        tracing::info!(
            "Loaded OpenAPI spec from {} ({} endpoints)",
            location,
            list_summaries(&spec).len()
        );
        Ok(Arc::new(spec))
    }

    async fn read_content(&self) -> Result<(String, String)> {
        if let Some(url) = self.spec_url.as_deref() {
            match self.fetch(url).await {
                Ok(content) => return Ok((content, url.to_string())),
                Err(e) => tracing::warn!(
                    "Failed to fetch OpenAPI spec, falling back to {}: {}",
                    self.local_path.display(),
                    e
                ),
            }
        }

        let content = self.read_local().await?;
        Ok((content, self.local_path.display().to_string()))
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        tracing::info!("Fetching OpenAPI spec from {}", url);
        let fetch_error = |message: String| OpenApiToolsError::OpenApiSpecFetch {
            url: url.to_string(),
            message,
        };

        let resp = self
            .client
            .get(url)
            .header(ACCEPT, SPEC_ACCEPT)
            .timeout(self.fetch_timeout)
            .send()
            .await
            .map_err(|e| fetch_error(sanitize_reqwest_error(&e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP {status}")));
        }

        resp.text()
            .await
            .map_err(|e| fetch_error(sanitize_reqwest_error(&e)))
    }

    async fn read_local(&self) -> Result<String> {
        tracing::info!("Loading OpenAPI spec from {}", self.local_path.display());
        tokio::fs::read_to_string(&self.local_path)
            .await
            .map_err(|e| OpenApiToolsError::OpenApiSpecReadFile {
                path: self.local_path.display().to_string(),
                source: e,
            })
    }
}

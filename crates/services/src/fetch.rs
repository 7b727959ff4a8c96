use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use serde_json::Value;
use url::Url;

use crate::error::FetchError;

/// Read-only access to remote documents (data files, proxied pages).
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Fetch the body of `url` as text, bypassing caches.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` on transport failures or non-success statuses.
    async fn fetch_text(&self, url: &Url) -> Result<String, FetchError>;

    /// Fetch `url` and parse the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Decode` when the body is not JSON, or any error
    /// from [`DocumentFetcher::fetch_text`].
    async fn fetch_json(&self, url: &Url) -> Result<Value, FetchError> {
        let body = self.fetch_text(url).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// `reqwest`-backed fetcher.
#[derive(Clone, Debug, Default)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .header(CACHE_CONTROL, "no-store")
            .header(PRAGMA, "no-cache")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status()));
        }

        Ok(response.text().await?)
    }
}

/// In-memory fetcher for tests and offline play.
///
/// Serves registered documents by URL and records every request it receives.
#[derive(Clone, Debug, Default)]
pub struct InMemoryFetcher {
    documents: Arc<Mutex<HashMap<String, String>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl InMemoryFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_document(self, url: &str, body: impl Into<String>) -> Self {
        self.insert(url, body);
        self
    }

    pub fn insert(&self, url: &str, body: impl Into<String>) {
        if let Ok(mut guard) = self.documents.lock() {
            guard.insert(normalize_key(url), body.into());
        }
    }

    /// URLs requested so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentFetcher for InMemoryFetcher {
    async fn fetch_text(&self, url: &Url) -> Result<String, FetchError> {
        if let Ok(mut guard) = self.requests.lock() {
            guard.push(url.to_string());
        }
        let guard = self
            .documents
            .lock()
            .map_err(|_| FetchError::NotFound(url.to_string()))?;
        guard
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| FetchError::NotFound(url.to_string()))
    }
}

fn normalize_key(url: &str) -> String {
    Url::parse(url).map_or_else(|_| url.to_owned(), String::from)
}

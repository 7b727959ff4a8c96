//! Shared error types for the services crate.

use thiserror::Error;

/// Errors emitted while fetching a remote document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    #[error("invalid url {raw:?}: {source}")]
    InvalidUrl {
        raw: String,
        #[source]
        source: url::ParseError,
    },
    #[error("request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("no document at {0}")]
    NotFound(String),
}

/// Errors emitted by `ItemSourceResolver`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SourceError {
    #[error("no data source yielded paintings ({attempted} candidates tried)")]
    DataUnavailable { attempted: usize },
}

/// Errors emitted by `GameSession`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no paintings available for session")]
    Empty,
}

/// Errors emitted by `GameController` while loading a session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Errors reported by a `HostBridge` capability.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BridgeError {
    #[error("host does not support {0}")]
    Unsupported(&'static str),
    #[error("host capability failed: {0}")]
    Failed(String),
}

/// Errors emitted while reading `GameConfig`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid base url {raw:?}: {source}")]
    InvalidBaseUrl {
        raw: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid duration {raw:?}: expected milliseconds")]
    InvalidDelay { raw: String },
}

use std::env;
use std::time::Duration;

use url::Url;

use crate::error::ConfigError;
use crate::image::{DEFAULT_IMAGE_TIMEOUT, DEFAULT_PROXY_PREFIX};
use crate::share::DEFAULT_SHARE_LINK;
use crate::source::DEFAULT_SOURCES;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/";

/// Pause between an answer and the next round.
pub const DEFAULT_FEEDBACK_DELAY: Duration = Duration::from_millis(450);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub base_url: Url,
    pub sources: Vec<String>,
    pub proxy_prefix: String,
    pub feedback_delay: Duration,
    /// Limit on resolving one round's image.
    pub image_timeout: Duration,
    pub share_link: String,
}

impl GameConfig {
    /// Defaults for everything but the base URL.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            sources: DEFAULT_SOURCES.iter().map(|s| (*s).to_owned()).collect(),
            proxy_prefix: DEFAULT_PROXY_PREFIX.to_owned(),
            feedback_delay: DEFAULT_FEEDBACK_DELAY,
            image_timeout: DEFAULT_IMAGE_TIMEOUT,
            share_link: DEFAULT_SHARE_LINK.to_owned(),
        }
    }

    /// Read `QUIZ_*` environment variables over the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an unparseable base URL or delay.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`GameConfig::from_env`] with an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an unparseable base URL or delay.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = parse_base_url(&value("QUIZ_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into()))?;
        let mut config = Self::new(base_url);

        if let Some(sources) = value("QUIZ_SOURCES") {
            config.sources = split_sources(&sources);
        }
        if let Some(prefix) = value("QUIZ_PROXY_PREFIX") {
            config.proxy_prefix = prefix;
        }
        if let Some(raw) = value("QUIZ_FEEDBACK_DELAY_MS") {
            config.feedback_delay = parse_millis(&raw)?;
        }
        if let Some(raw) = value("QUIZ_IMAGE_TIMEOUT_MS") {
            config.image_timeout = parse_millis(&raw)?;
        }
        if let Some(link) = value("QUIZ_SHARE_LINK") {
            config.share_link = link;
        }

        Ok(config)
    }
}

/// Parse a base URL, treating it as a directory so relative sources resolve
/// beneath it.
///
/// # Errors
///
/// Returns `ConfigError::InvalidBaseUrl` when `raw` is not an absolute URL.
pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let mut url = Url::parse(trimmed).map_err(|source| ConfigError::InvalidBaseUrl {
        raw: raw.to_owned(),
        source,
    })?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn parse_millis(raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse()
        .map(Duration::from_millis)
        .map_err(|_| ConfigError::InvalidDelay { raw: raw.to_owned() })
}

fn split_sources(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_without_env() {
        let config = GameConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.sources.len(), DEFAULT_SOURCES.len());
        assert_eq!(config.feedback_delay, Duration::from_millis(450));
        assert_eq!(config.proxy_prefix, DEFAULT_PROXY_PREFIX);
        assert_eq!(config.image_timeout, DEFAULT_IMAGE_TIMEOUT);
    }

    #[test]
    fn env_overrides_defaults() {
        let config = GameConfig::from_lookup(lookup(&[
            ("QUIZ_BASE_URL", "https://quiz.example/game"),
            ("QUIZ_SOURCES", " a.json, ,b/c.json "),
            ("QUIZ_FEEDBACK_DELAY_MS", "0"),
            ("QUIZ_IMAGE_TIMEOUT_MS", "1500"),
            ("QUIZ_SHARE_LINK", "https://t.me/other?startapp="),
        ]))
        .unwrap();

        assert_eq!(config.base_url.as_str(), "https://quiz.example/game/");
        assert_eq!(config.sources, vec!["a.json".to_owned(), "b/c.json".to_owned()]);
        assert_eq!(config.feedback_delay, Duration::ZERO);
        assert_eq!(config.image_timeout, Duration::from_millis(1500));
        assert_eq!(config.share_link, "https://t.me/other?startapp=");
    }

    #[test]
    fn invalid_values_are_reported() {
        let err = GameConfig::from_lookup(lookup(&[("QUIZ_BASE_URL", "not a url")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));

        let err = GameConfig::from_lookup(lookup(&[("QUIZ_FEEDBACK_DELAY_MS", "soon")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidDelay { raw: "soon".into() });

        let err = GameConfig::from_lookup(lookup(&[("QUIZ_IMAGE_TIMEOUT_MS", "-1")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidDelay { raw: "-1".into() });
    }
}

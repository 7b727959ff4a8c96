use std::sync::{Arc, LazyLock};
use std::time::Duration;

use regex::Regex;
use tracing::debug;
use url::Url;

use crate::error::FetchError;
use crate::fetch::DocumentFetcher;

/// Prefix-style HTML-to-text proxy used to read landing pages.
pub const DEFAULT_PROXY_PREFIX: &str = "https://r.jina.ai/";

/// Upper bound on a landing-page lookup before the round shows no image.
pub const DEFAULT_IMAGE_TIMEOUT: Duration = Duration::from_secs(8);

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "avif"];

static OG_IMAGE_PATTERNS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(
            r#"(?is)<meta\b[^>]*?(?:property|name)\s*=\s*["']og:image(?::url)?["'][^>]*?content\s*=\s*["']([^"']+)["']"#,
        )
        .expect("og:image pattern is valid"),
        Regex::new(
            r#"(?is)<meta\b[^>]*?content\s*=\s*["']([^"']+)["'][^>]*?(?:property|name)\s*=\s*["']og:image(?::url)?["']"#,
        )
        .expect("og:image pattern is valid"),
    ]
});

/// Turns a painting's stored URL into something an `<img>` can render.
#[derive(Clone)]
pub struct ImageResolver {
    fetcher: Arc<dyn DocumentFetcher>,
    proxy_prefix: String,
    timeout: Duration,
}

impl ImageResolver {
    #[must_use]
    pub fn new(fetcher: Arc<dyn DocumentFetcher>, proxy_prefix: impl Into<String>) -> Self {
        Self {
            fetcher,
            proxy_prefix: proxy_prefix.into(),
            timeout: DEFAULT_IMAGE_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Best-effort renderable URL for `raw`, or `""` when there is nothing to show.
    ///
    /// Direct image URLs are returned untouched. Known landing pages are read
    /// through the proxy and their Open Graph image extracted; any failure
    /// there, including a lookup slower than the timeout, yields `""`. Everything else is returned as a last-resort guess.
    pub async fn resolve(&self, raw: &str) -> String {
        let raw = raw.trim();
        if raw.is_empty() {
            return String::new();
        }
        if is_direct_image(raw) {
            return raw.to_owned();
        }
        if !is_landing_page(raw) {
            return raw.to_owned();
        }

        match tokio::time::timeout(self.timeout, self.scrape_og_image(raw)).await {
            Err(_) => {
                debug!(page = raw, timeout = ?self.timeout, "landing page lookup timed out");
                String::new()
            }
            Ok(Ok(Some(image))) => image,
            Ok(Ok(None)) => {
                debug!(page = raw, "landing page has no og:image");
                String::new()
            }
            Ok(Err(err)) => {
                debug!(page = raw, %err, "could not read landing page");
                String::new()
            }
        }
    }

    async fn scrape_og_image(&self, page: &str) -> Result<Option<String>, FetchError> {
        let proxied = format!("{}{page}", self.proxy_prefix);
        let url = Url::parse(&proxied).map_err(|source| FetchError::InvalidUrl {
            raw: proxied.clone(),
            source,
        })?;
        let markup = self.fetcher.fetch_text(&url).await?;
        Ok(extract_og_image(&markup))
    }
}

/// Returns true for URLs that can be rendered without a secondary fetch.
#[must_use]
pub fn is_direct_image(raw: &str) -> bool {
    let raw = raw.trim();
    if raw
        .get(..11)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:image/"))
    {
        return raw.contains(";base64,");
    }

    match Url::parse(raw) {
        Ok(url) => url.host_str().is_some_and(is_image_cdn) || has_image_extension(url.path()),
        Err(_) => has_image_extension(raw),
    }
}

/// Returns true for gallery detail pages that embed their image in metadata.
#[must_use]
pub fn is_landing_page(raw: &str) -> bool {
    let Ok(url) = Url::parse(raw.trim()) else {
        return false;
    };
    let path = url.path();
    match url.host_str() {
        Some("artsandculture.google.com") => path.starts_with("/asset/"),
        Some("my.tretyakov.ru") => path.starts_with("/app/masterpiece/"),
        _ => false,
    }
}

/// Content of the first Open Graph image meta-tag in `markup`.
#[must_use]
pub fn extract_og_image(markup: &str) -> Option<String> {
    OG_IMAGE_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(markup))
        .and_then(|captures| captures.get(1))
        .map(|content| content.as_str().trim().replace("&amp;", "&"))
        .filter(|content| !content.is_empty())
}

fn is_image_cdn(host: &str) -> bool {
    host == "upload.wikimedia.org"
        || host.ends_with(".googleusercontent.com")
        || host.ends_with(".ggpht.com")
}

fn has_image_extension(path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    path.rsplit_once('.').is_some_and(|(_, ext)| {
        IMAGE_EXTENSIONS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::fetch::InMemoryFetcher;

    /// Never answers, like a proxy that accepts the connection and stalls.
    struct StalledFetcher;

    #[async_trait]
    impl DocumentFetcher for StalledFetcher {
        async fn fetch_text(&self, _url: &Url) -> Result<String, FetchError> {
            std::future::pending().await
        }
    }

    const ASSET_PAGE: &str = "https://artsandculture.google.com/asset/the-rooks-have-come-back/kQHvRbz0Hq3Tvw";

    fn resolver(fetcher: &InMemoryFetcher) -> ImageResolver {
        ImageResolver::new(Arc::new(fetcher.clone()), DEFAULT_PROXY_PREFIX)
    }

    #[test]
    fn direct_images_are_detected() {
        assert!(is_direct_image("https://example.org/art/rooks.JPG"));
        assert!(is_direct_image("https://example.org/art/rooks.webp?w=800#top"));
        assert!(is_direct_image("images/rooks.avif"));
        assert!(is_direct_image("https://upload.wikimedia.org/wikipedia/commons/x/rooks"));
        assert!(is_direct_image("https://lh3.googleusercontent.com/ci/AL18g"));
        assert!(is_direct_image("data:image/png;base64,iVBORw0KGgo="));
        assert!(!is_direct_image("data:image/svg+xml,<svg/>"));
        assert!(!is_direct_image(ASSET_PAGE));
        assert!(!is_direct_image("https://example.org/art/rooks.html"));
    }

    #[test]
    fn landing_pages_are_detected() {
        assert!(is_landing_page(ASSET_PAGE));
        assert!(is_landing_page("https://my.tretyakov.ru/app/masterpiece/8313"));
        assert!(!is_landing_page("https://artsandculture.google.com/story/abc"));
        assert!(!is_landing_page("not a url"));
    }

    #[test]
    fn og_image_is_extracted_in_either_attribute_order() {
        let markup = r#"<head><meta property="og:image" content="https://lh3.ggpht.com/a.jpg?x=1&amp;y=2"></head>"#;
        assert_eq!(
            extract_og_image(markup).as_deref(),
            Some("https://lh3.ggpht.com/a.jpg?x=1&y=2")
        );

        let markup = r#"<META content='https://cdn.example/b.png' name='og:image:url' />"#;
        assert_eq!(
            extract_og_image(markup).as_deref(),
            Some("https://cdn.example/b.png")
        );

        assert!(extract_og_image("<meta property=\"og:title\" content=\"x\">").is_none());
    }

    #[tokio::test]
    async fn direct_and_unknown_urls_skip_the_network() {
        let fetcher = InMemoryFetcher::new();
        let images = resolver(&fetcher);

        assert_eq!(images.resolve("").await, "");
        assert_eq!(images.resolve("   ").await, "");
        assert_eq!(
            images.resolve("https://example.org/a.png").await,
            "https://example.org/a.png"
        );
        assert_eq!(
            images.resolve("https://example.org/painting/42").await,
            "https://example.org/painting/42"
        );
        assert!(fetcher.requests().is_empty());
    }

    #[tokio::test]
    async fn landing_pages_resolve_through_the_proxy() {
        let fetcher = InMemoryFetcher::new().with_document(
            &format!("{DEFAULT_PROXY_PREFIX}{ASSET_PAGE}"),
            r#"<html><meta property="og:image" content="https://lh3.googleusercontent.com/rooks"></html>"#,
        );
        let images = resolver(&fetcher);

        assert_eq!(
            images.resolve(ASSET_PAGE).await,
            "https://lh3.googleusercontent.com/rooks"
        );
        assert_eq!(fetcher.requests().len(), 1);
    }

    #[tokio::test]
    async fn landing_page_failures_yield_empty() {
        let fetcher = InMemoryFetcher::new().with_document(
            &format!("{DEFAULT_PROXY_PREFIX}https://my.tretyakov.ru/app/masterpiece/1"),
            "<html>no metadata here</html>",
        );
        let images = resolver(&fetcher);

        assert_eq!(
            images.resolve("https://my.tretyakov.ru/app/masterpiece/1").await,
            ""
        );
        assert_eq!(
            images.resolve("https://my.tretyakov.ru/app/masterpiece/2").await,
            ""
        );
    }

    #[tokio::test]
    async fn stalled_landing_page_times_out_empty() {
        let images = ImageResolver::new(Arc::new(StalledFetcher), DEFAULT_PROXY_PREFIX)
            .with_timeout(Duration::from_millis(20));

        assert_eq!(images.resolve(ASSET_PAGE).await, "");
        assert_eq!(
            images.resolve("https://example.org/a.png").await,
            "https://example.org/a.png"
        );
    }
}

use serde::Serialize;
use serde_json::{Map, Value};

//
// ─── SOURCE KEY PRECEDENCE ─────────────────────────────────────────────────────
//

/// Source keys that may carry a painting title, highest priority first.
pub const TITLE_KEYS: &[&str] = &["title", "name", "painting", "caption"];
pub const ARTIST_KEYS: &[&str] = &["artist", "author", "painter", "creator"];
pub const YEAR_KEYS: &[&str] = &["year", "date", "created", "when"];
pub const MUSEUM_KEYS: &[&str] = &["museum", "collection", "gallery"];
pub const IMAGE_KEYS: &[&str] = &["image_url", "image", "img", "url", "photo"];

//
// ─── PAINTING ──────────────────────────────────────────────────────────────────
//

/// Canonical painting shown in a round.
///
/// Every field is a plain string and defaults to `""`, so callers never have to
/// branch on absence. `year` and `museum` are free-form text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaintingRecord {
    title: String,
    artist: String,
    year: String,
    museum: String,
    image_url: String,
}

impl PaintingRecord {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        year: impl Into<String>,
        museum: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            year: year.into(),
            museum: museum.into(),
            image_url: image_url.into(),
        }
    }

    /// Normalize an arbitrary JSON record into a painting.
    ///
    /// For each field the first present, truthy value among its alternate keys
    /// wins. Missing fields and non-object input produce empty strings; nothing
    /// here ever fails.
    #[must_use]
    pub fn from_raw(raw: &Value) -> Self {
        let Some(fields) = raw.as_object() else {
            return Self::default();
        };

        Self {
            title: pick(fields, TITLE_KEYS),
            artist: pick(fields, ARTIST_KEYS),
            year: pick(fields, YEAR_KEYS),
            museum: pick(fields, MUSEUM_KEYS),
            image_url: pick(fields, IMAGE_KEYS),
        }
    }

    /// Returns true when `raw` is an object carrying at least one title-like,
    /// artist-like or image-like key.
    #[must_use]
    pub fn looks_like_painting(raw: &Value) -> bool {
        raw.as_object().is_some_and(|fields| {
            [TITLE_KEYS, ARTIST_KEYS, IMAGE_KEYS]
                .iter()
                .flat_map(|keys| keys.iter())
                .any(|key| fields.contains_key(*key))
        })
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn artist(&self) -> &str {
        &self.artist
    }

    #[must_use]
    pub fn year(&self) -> &str {
        &self.year
    }

    #[must_use]
    pub fn museum(&self) -> &str {
        &self.museum
    }

    #[must_use]
    pub fn image_url(&self) -> &str {
        &self.image_url
    }
}

fn pick(fields: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| fields.get(*key))
        .find_map(truthy_text)
        .unwrap_or_default()
}

/// Text of a JSON value, or `None` for falsy values (`null`, `false`, `0`, `""`).
fn truthy_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("true".to_owned()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn canonical_keys_are_taken_as_is() {
        let raw = json!({
            "title": "Morning in a Pine Forest",
            "artist": "Ivan Shishkin",
            "year": "1889",
            "museum": "Третьяковская галерея",
            "image_url": "https://upload.wikimedia.org/pine.jpg"
        });

        let painting = PaintingRecord::from_raw(&raw);

        assert_eq!(painting.title(), "Morning in a Pine Forest");
        assert_eq!(painting.artist(), "Ivan Shishkin");
        assert_eq!(painting.year(), "1889");
        assert_eq!(painting.museum(), "Третьяковская галерея");
        assert_eq!(painting.image_url(), "https://upload.wikimedia.org/pine.jpg");
    }

    #[test]
    fn alternate_keys_follow_priority_order() {
        let raw = json!({
            "caption": "ignored, lower priority",
            "name": "The Ninth Wave",
            "painter": "Ivan Aivazovsky",
            "when": "1850",
            "gallery": "Русский музей",
            "photo": "https://example.org/photo.png",
            "img": "https://example.org/img.png"
        });

        let painting = PaintingRecord::from_raw(&raw);

        assert_eq!(painting.title(), "The Ninth Wave");
        assert_eq!(painting.artist(), "Ivan Aivazovsky");
        assert_eq!(painting.year(), "1850");
        assert_eq!(painting.museum(), "Русский музей");
        assert_eq!(painting.image_url(), "https://example.org/img.png");
    }

    #[test]
    fn falsy_values_fall_through_to_next_key() {
        let raw = json!({
            "title": "",
            "name": null,
            "painting": "Bogatyrs",
            "year": 0,
            "date": 1898,
            "artist": false,
            "author": "Viktor Vasnetsov"
        });

        let painting = PaintingRecord::from_raw(&raw);

        assert_eq!(painting.title(), "Bogatyrs");
        assert_eq!(painting.year(), "1898");
        assert_eq!(painting.artist(), "Viktor Vasnetsov");
    }

    #[test]
    fn missing_fields_default_to_empty_strings() {
        let painting = PaintingRecord::from_raw(&json!({ "unrelated": "value" }));
        assert_eq!(painting, PaintingRecord::default());
        assert_eq!(painting.museum(), "");
        assert_eq!(painting.image_url(), "");

        let from_scalar = PaintingRecord::from_raw(&json!("just a string"));
        assert_eq!(from_scalar, PaintingRecord::default());
    }

    #[test]
    fn painting_shape_detection_uses_title_artist_and_image_keys() {
        assert!(PaintingRecord::looks_like_painting(&json!({ "caption": "x" })));
        assert!(PaintingRecord::looks_like_painting(&json!({ "creator": "x" })));
        assert!(PaintingRecord::looks_like_painting(&json!({ "photo": "x" })));
        assert!(!PaintingRecord::looks_like_painting(&json!({ "museum": "x" })));
        assert!(!PaintingRecord::looks_like_painting(&json!(["title"])));
    }
}

use serde::Serialize;
use thiserror::Error;
use url::Url;

use super::score::accuracy_percent;

/// Query parameters that may carry a shared payload, in lookup order.
pub const SHARE_QUERY_KEYS: &[&str] = &["startapp", "start_param"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SharedPayloadError {
    #[error("shared payload is not `<correct>_<total>`: {raw:?}")]
    Malformed { raw: String },

    #[error("shared payload has a zero total")]
    ZeroTotal,
}

/// A friend's finished game, decoded from a deep link.
///
/// Read-only display data; never merged into a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SharedResult {
    correct_count: u32,
    total: u32,
    accuracy_percent: u32,
}

impl SharedResult {
    /// Parse a `<correct>_<total>` payload.
    ///
    /// Counts too large for `u32` saturate at `u32::MAX`; `correct` is then
    /// clamped to `total`.
    ///
    /// # Errors
    ///
    /// Returns `SharedPayloadError::Malformed` unless the payload is exactly two
    /// ASCII-digit groups joined by `_`, and `SharedPayloadError::ZeroTotal` when
    /// the total is zero.
    pub fn parse(raw: &str) -> Result<Self, SharedPayloadError> {
        let malformed = || SharedPayloadError::Malformed {
            raw: raw.to_owned(),
        };

        let (correct, total) = raw.split_once('_').ok_or_else(malformed)?;
        let correct = parse_digits(correct).ok_or_else(malformed)?;
        let total = parse_digits(total).ok_or_else(malformed)?;
        if total == 0 {
            return Err(SharedPayloadError::ZeroTotal);
        }

        let correct_count = correct.min(total);
        Ok(Self {
            correct_count,
            total,
            accuracy_percent: accuracy_percent(correct_count, total),
        })
    }

    /// Lenient variant of [`SharedResult::parse`]: malformed payloads are absent.
    #[must_use]
    pub fn decode(raw: &str) -> Option<Self> {
        Self::parse(raw).ok()
    }

    /// Decode the payload carried by a launch URL, if any.
    #[must_use]
    pub fn from_launch_url(url: &Url) -> Option<Self> {
        start_param_from_url(url).and_then(|raw| Self::decode(&raw))
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn accuracy_percent(&self) -> u32 {
        self.accuracy_percent
    }

    /// Payload that decodes back to this result.
    #[must_use]
    pub fn payload(&self) -> String {
        encode_payload(self.correct_count, self.total)
    }
}

/// Encode a finished game as `<correct>_<total>`.
#[must_use]
pub fn encode_payload(correct: u32, total: u32) -> String {
    format!("{correct}_{total}")
}

/// First non-empty `startapp` / `start_param` query value of `url`.
#[must_use]
pub fn start_param_from_url(url: &Url) -> Option<String> {
    SHARE_QUERY_KEYS.iter().find_map(|wanted| {
        url.query_pairs()
            .find(|(key, value)| key == *wanted && !value.is_empty())
            .map(|(_, value)| value.into_owned())
    })
}

fn parse_digits(raw: &str) -> Option<u32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Only overflow can fail past the digit check.
    Some(raw.parse().unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_well_formed_payload() {
        let shared = SharedResult::decode("7_10").unwrap();
        assert_eq!(shared.correct_count(), 7);
        assert_eq!(shared.total(), 10);
        assert_eq!(shared.accuracy_percent(), 70);
    }

    #[test]
    fn correct_count_is_clamped_to_total() {
        let shared = SharedResult::decode("10_7").unwrap();
        assert_eq!(shared.correct_count(), 7);
        assert_eq!(shared.total(), 7);
        assert_eq!(shared.accuracy_percent(), 100);

        let shared = SharedResult::decode("4294967296_10").unwrap();
        assert_eq!(shared.correct_count(), 10);
        assert_eq!(shared.total(), 10);
        assert_eq!(shared.accuracy_percent(), 100);
    }

    #[test]
    fn oversized_total_saturates() {
        let shared = SharedResult::decode("3_99999999999").unwrap();
        assert_eq!(shared.correct_count(), 3);
        assert_eq!(shared.total(), u32::MAX);
        assert_eq!(shared.accuracy_percent(), 0);
    }

    #[test]
    fn zero_total_is_rejected() {
        assert_eq!(SharedResult::parse("5_0"), Err(SharedPayloadError::ZeroTotal));
        assert!(SharedResult::decode("0_0").is_none());
    }

    #[test]
    fn malformed_payloads_are_absent() {
        for raw in ["abc", "", "7", "7_", "_10", "7_10_3", "+7_10", "7_-1", " 7_10", "7.5_10"] {
            assert!(SharedResult::decode(raw).is_none(), "{raw:?} should not decode");
        }
        assert!(matches!(
            SharedResult::parse("abc"),
            Err(SharedPayloadError::Malformed { .. })
        ));
    }

    #[test]
    fn payload_encodes_correct_then_total() {
        assert_eq!(encode_payload(3, 12), "3_12");
        assert_eq!(SharedResult::decode("10_7").unwrap().payload(), "7_7");
    }

    #[test]
    fn launch_url_prefers_startapp_then_start_param() {
        let url = Url::parse("https://quiz.example/?start_param=1_2&startapp=4_5").unwrap();
        assert_eq!(start_param_from_url(&url).as_deref(), Some("4_5"));

        let url = Url::parse("https://quiz.example/?startapp=&start_param=1_2").unwrap();
        let shared = SharedResult::from_launch_url(&url).unwrap();
        assert_eq!(shared.correct_count(), 1);
        assert_eq!(shared.accuracy_percent(), 50);

        let url = Url::parse("https://quiz.example/index.html").unwrap();
        assert!(SharedResult::from_launch_url(&url).is_none());
    }
}

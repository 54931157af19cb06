// Event normalization: one pure mapping per (vendor, event family) pair.
// No I/O, no side effects. Everything downstream of this module speaks
// canonical events only.

pub mod clockify;
pub mod jira;

use chrono::{DateTime, FixedOffset};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("unsupported event type: {0}")]
    UnsupportedEvent(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

/// Jira sends RFC 3339 with a colon-less offset (`+0000`); Clockify sends
/// plain RFC 3339. Accept both.
pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>, NormalizeError> {
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .map_err(|_| NormalizeError::InvalidTimestamp(value.to_string()))
}

#[cfg(test)]
mod parse_timestamp_tests {
    use rstest::rstest;

    use super::parse_timestamp;

    #[rstest]
    #[case("2024-01-01T09:00:00Z")]
    #[case("2024-01-01T09:00:00+02:00")]
    #[case("2024-01-01T09:00:00.000+0000")]
    fn it_should_accept_both_offset_spellings(#[case] value: &str) {
        assert!(parse_timestamp(value).is_ok());
    }

    #[rstest]
    fn it_should_reject_garbage() {
        assert!(parse_timestamp("yesterday at noon").is_err());
    }
}

//! Column encoding shared by the repositories.
//!
//! Timestamps are stored as fixed-width RFC 3339 text with nanoseconds so
//! that string comparison in SQL matches chronological order.

use std::str::FromStr;

use chrono::SecondsFormat;
use serde::de::DeserializeOwned;

use autoflow_domain::time::Timestamp;

pub(crate) fn encode_ts(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub(crate) fn decode_ts(value: &str) -> Result<Timestamp, sqlx::Error> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.to_utc())
        .map_err(|err| sqlx::Error::Decode(Box::new(err)))
}

pub(crate) fn decode_json<T: DeserializeOwned>(value: &str) -> Result<T, sqlx::Error> {
    serde_json::from_str(value).map_err(|err| sqlx::Error::Decode(Box::new(err)))
}

pub(crate) fn decode_enum<T>(value: &str) -> Result<T, sqlx::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    T::from_str(value).map_err(|err| sqlx::Error::Decode(Box::new(err)))
}

/// `SQLite` integers are signed; counters and durations never get near the
/// limit, so clamp rather than fail.
pub(crate) fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

pub(crate) fn to_u64(value: i64) -> Result<u64, sqlx::Error> {
    u64::try_from(value).map_err(|err| sqlx::Error::Decode(Box::new(err)))
}

pub(crate) fn limit(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_round_trip_timestamp_exactly() {
        let ts = autoflow_domain::time::now();
        assert_eq!(decode_ts(&encode_ts(ts)).unwrap(), ts);
    }

    #[test]
    fn should_sort_encoded_timestamps_chronologically() {
        let earlier = chrono::DateTime::parse_from_rfc3339("2025-01-01T10:00:05Z")
            .unwrap()
            .to_utc();
        let later = earlier + chrono::Duration::milliseconds(500);
        assert!(encode_ts(earlier) < encode_ts(later));
        assert_eq!(encode_ts(earlier).len(), encode_ts(later).len());
    }

    #[test]
    fn should_reject_negative_counter() {
        assert!(to_u64(-1).is_err());
        assert_eq!(to_u64(4).unwrap(), 4);
    }
}

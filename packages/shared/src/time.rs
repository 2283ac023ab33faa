//! Time-related utilities with clock abstraction for testability.
//!
//! Every timestamp in the relay is UTC and rendered with a fixed
//! microsecond precision, e.g. `2024-05-01T12:00:00.123456+00:00`.

use chrono::{DateTime, SecondsFormat, Utc};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Current point in time (UTC)
    fn now(&self) -> DateTime<Utc>;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Render a UTC timestamp as ISO-8601 with microsecond precision.
pub fn format_utc_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, false)
}

/// Parse an RFC 3339 timestamp in any offset and normalize it to UTC.
pub fn parse_utc_timestamp(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc))
}

//! Time and timestamp helpers.

use chrono::{DateTime, TimeDelta, Utc};

/// UTC timestamp used for creation times, login times, token issuance, etc.
pub type Timestamp = DateTime<Utc>;

/// Lifetime of access tokens issued for the integration's system identity.
#[must_use]
pub fn access_token_lifetime() -> TimeDelta {
    TimeDelta::days(365 * 10)
}

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Rebuild a timestamp from whole seconds since the Unix epoch.
///
/// Returns `None` when `secs` is outside the representable range.
#[must_use]
pub fn from_unix(secs: i64) -> Option<Timestamp> {
    DateTime::from_timestamp(secs, 0)
}

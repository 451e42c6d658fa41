//! Conversions between domain values and their `SQLite` column representation.

use std::str::FromStr;

use vaultlink_domain::time::{self, Timestamp};

pub(crate) fn parse_id<T>(value: &str) -> Result<T, sqlx::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    T::from_str(value).map_err(|err| sqlx::Error::Decode(Box::new(err)))
}

pub(crate) fn parse_timestamp(secs: i64) -> Result<Timestamp, sqlx::Error> {
    time::from_unix(secs).ok_or_else(|| sqlx::Error::Decode(format!("timestamp {secs} out of range").into()))
}

pub(crate) fn parse_json<T: serde::de::DeserializeOwned>(value: &str) -> Result<T, sqlx::Error> {
    serde_json::from_str(value).map_err(|err| sqlx::Error::Decode(Box::new(err)))
}

pub(crate) fn parse_u32(value: i64) -> Result<u32, sqlx::Error> {
    u32::try_from(value).map_err(|err| sqlx::Error::Decode(Box::new(err)))
}

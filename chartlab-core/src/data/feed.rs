//! Upstream price-feed records and their conversion to ticks.
//!
//! The feed delivers JSON arrays of `{ "contractRate", "contractQuantity", "time" }`
//! where `time` is a Unix epoch in either seconds or milliseconds. Ticks are
//! stamped in exchange-local time (UTC+05:45 by default).

use chrono::{DateTime, Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::provider::DataError;
use crate::domain::Tick;

/// Default exchange offset from UTC, in minutes (+05:45).
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 345;

/// Epoch values above this are milliseconds.
const MILLIS_THRESHOLD: i64 = 9_999_999_999;

/// One trade record as delivered by the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScripPrice {
    pub contract_rate: f64,
    #[serde(default)]
    pub contract_quantity: Option<f64>,
    pub time: i64,
}

impl ScripPrice {
    /// Convert to a tick in local time. Missing quantity counts as zero.
    pub fn to_tick(&self, utc_offset_minutes: i32) -> Result<Tick, DataError> {
        let timestamp = local_time(self.time, utc_offset_minutes).ok_or_else(|| {
            DataError::FeedFormat(format!("epoch {} is out of range", self.time))
        })?;
        Ok(Tick {
            timestamp,
            price: self.contract_rate,
            quantity: self.contract_quantity.unwrap_or(0.0),
        })
    }
}

/// Resolve an epoch (seconds or milliseconds) into naive local time.
///
/// `None` when the epoch, or the epoch shifted by the offset, falls outside
/// chrono's range.
pub fn local_time(epoch: i64, utc_offset_minutes: i32) -> Option<NaiveDateTime> {
    let utc = if epoch > MILLIS_THRESHOLD {
        DateTime::from_timestamp_millis(epoch)
    } else {
        DateTime::from_timestamp(epoch, 0)
    }?;
    utc.naive_utc()
        .checked_add_signed(Duration::minutes(i64::from(utc_offset_minutes)))
}

/// Decode a feed payload into ticks, preserving feed order.
pub fn decode_ticks(json: &str, utc_offset_minutes: i32) -> Result<Vec<Tick>, DataError> {
    let records: Vec<ScripPrice> =
        serde_json::from_str(json).map_err(|e| DataError::FeedFormat(e.to_string()))?;
    records
        .iter()
        .map(|r| r.to_tick(utc_offset_minutes))
        .collect()
}

//! Tick: a single executed trade from the upstream price feed.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One trade: local timestamp, price and traded quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub timestamp: NaiveDateTime,
    pub price: f64,
    pub quantity: f64,
}

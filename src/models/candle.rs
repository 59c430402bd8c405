//! Price candle models

use serde::{Deserialize, Serialize};

/// A single OHLC bar. `time` is the bar open in epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

/// Body of `GET /api/candles`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandlesResponse {
    #[serde(default)]
    pub symbol: Option<String>,
    pub candles: Vec<Candle>,
}

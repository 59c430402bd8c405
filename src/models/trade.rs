//! Trade history models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// When a trade closed. Backtests report epoch milliseconds, the live bot
/// reports ISO text, so both are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TradeTime {
    Millis(i64),
    Text(String),
}

impl fmt::Display for TradeTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeTime::Millis(ms) => match DateTime::<Utc>::from_timestamp_millis(*ms) {
                Some(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S")),
                None => write!(f, "{}", ms),
            },
            TradeTime::Text(text) => write!(f, "{}", text),
        }
    }
}

/// A closed trade as reported by the backend.
///
/// Every field is optional: rows with missing values still render, the
/// missing cells are simply left empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Trade {
    pub time: Option<TradeTime>,
    pub symbol: Option<String>,
    pub side: Option<String>,
    pub entry: Option<f64>,
    pub exit: Option<f64>,
    pub profit: Option<f64>,
    pub balance_after: Option<f64>,
    pub reason: Option<String>,
}

impl Trade {
    /// `Some(true)` for profit >= 0, `Some(false)` for a loss, `None` when
    /// the profit is missing or not a number.
    pub fn is_profitable(&self) -> Option<bool> {
        self.profit.filter(|p| p.is_finite()).map(|p| p >= 0.0)
    }
}

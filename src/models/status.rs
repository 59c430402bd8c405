//! Live status snapshot models

use serde::{Deserialize, Serialize};
use super::trade::Trade;

/// Aggregate performance of the live bot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveStats {
    pub trades: u64,
    pub wins: u64,
    pub losses: u64,
    pub profit_usd: f64,
}

/// Body of `GET /api/status`. Replaced wholesale on every poll.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusSnapshot {
    pub balance: f64,
    pub symbols: Vec<String>,
    pub stats: LiveStats,
    pub trades: Vec<Trade>,
}

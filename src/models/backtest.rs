//! Backtest request/result models

use serde::{Deserialize, Serialize};
use super::trade::Trade;

/// Body of `POST /api/backtest`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestRequest {
    pub symbol: String,
    pub months: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_balance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_per_trade: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
}

impl BacktestRequest {
    pub fn new(symbol: impl Into<String>, months: u32) -> Self {
        Self {
            symbol: symbol.into(),
            months,
            initial_balance: None,
            risk_per_trade: None,
            stop_loss_pct: None,
            interval: None,
        }
    }

    /// Reject requests the backend would only fail on later
    pub fn validate(&self) -> Result<(), String> {
        if self.symbol.trim().is_empty() {
            return Err("Symbol cannot be empty".to_string());
        }
        if self.months == 0 {
            return Err("Months must be at least 1".to_string());
        }
        if let Some(risk) = self.risk_per_trade {
            if !(risk > 0.0 && risk <= 1.0) {
                return Err(format!("Risk per trade must be in (0, 1], got {}", risk));
            }
        }
        if let Some(stop) = self.stop_loss_pct {
            if !(0.0..1.0).contains(&stop) {
                return Err(format!("Stop loss must be in [0, 1), got {}", stop));
            }
        }
        if let Some(initial) = self.initial_balance {
            if !(initial > 0.0) {
                return Err("Initial balance must be positive".to_string());
            }
        }
        Ok(())
    }
}

/// Summary of a simulation run. `win_rate` is a percentage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestStats {
    pub initial_balance: f64,
    pub final_balance: f64,
    pub profit_usd: Option<f64>,
    pub trades: u64,
    pub wins: u64,
    pub losses: u64,
    pub win_rate: f64,
}

/// Successful body of `POST /api/backtest`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub stats: BacktestStats,
    #[serde(default)]
    pub trades: Vec<Trade>,
}

//! Data models exchanged with the trading backend
//!
//! Everything here is read-only to the monitor: snapshots and results are
//! produced by the backend and replaced wholesale on every fetch.

pub mod backtest;
pub mod candle;
pub mod selection;
pub mod status;
pub mod trade;

// Re-export commonly used types for convenience
pub use backtest::{BacktestRequest, BacktestResult, BacktestStats};
pub use candle::{Candle, CandlesResponse};
pub use selection::{Selection, SymbolChoice};
pub use status::{LiveStats, StatusSnapshot};
pub use trade::{Trade, TradeTime};

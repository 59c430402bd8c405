//! In-memory backend that replays queued responses, for orchestrator tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use super::client::TradingBackend;
use super::models::ApiError;
use crate::models::{BacktestRequest, BacktestResult, Candle, StatusSnapshot};

/// A queued reply, optionally held back to simulate a slow response
pub struct Reply<T> {
    pub result: Result<T, ApiError>,
    pub delay: Duration,
}

impl<T> Reply<T> {
    pub fn ok(value: T) -> Self {
        Self { result: Ok(value), delay: Duration::ZERO }
    }

    pub fn err(error: ApiError) -> Self {
        Self { result: Err(error), delay: Duration::ZERO }
    }

    pub fn after(mut self, millis: u64) -> Self {
        self.delay = Duration::from_millis(millis);
        self
    }
}

#[derive(Default)]
pub struct ScriptedBackend {
    statuses: Mutex<VecDeque<Reply<StatusSnapshot>>>,
    candles: Mutex<VecDeque<Reply<Vec<Candle>>>>,
    backtests: Mutex<VecDeque<Reply<BacktestResult>>>,
    /// Every call in arrival order, e.g. `candles ETHUSD 200`
    calls: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_status(&self, reply: Reply<StatusSnapshot>) {
        self.statuses.lock().unwrap().push_back(reply);
    }

    pub fn push_candles(&self, reply: Reply<Vec<Candle>>) {
        self.candles.lock().unwrap().push_back(reply);
    }

    pub fn push_backtest(&self, reply: Reply<BacktestResult>) {
        self.backtests.lock().unwrap().push_back(reply);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    async fn next<T>(queue: &Mutex<VecDeque<Reply<T>>>, what: &str) -> Result<T, ApiError> {
        let reply = queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Reply::err(ApiError::Request(format!("no scripted {} reply", what))));
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        reply.result
    }
}

#[async_trait]
impl TradingBackend for ScriptedBackend {
    async fn get_status(&self) -> Result<StatusSnapshot, ApiError> {
        self.record("status".to_string());
        Self::next(&self.statuses, "status").await
    }

    async fn get_candles(&self, symbol: &str, limit: u32) -> Result<Vec<Candle>, ApiError> {
        self.record(format!("candles {} {}", symbol, limit));
        Self::next(&self.candles, "candles").await
    }

    async fn run_backtest(&self, request: &BacktestRequest) -> Result<BacktestResult, ApiError> {
        self.record(format!("backtest {} {}", request.symbol, request.months));
        Self::next(&self.backtests, "backtest").await
    }
}

/// Candles with a recognisable close price sequence
pub fn candles(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Candle {
            time: 1_700_000_000_000 + i as i64 * 60_000,
            open: close - 1.0,
            high: close + 2.0,
            low: close - 2.0,
            close,
            volume: Some(10.0),
        })
        .collect()
}

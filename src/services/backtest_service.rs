//! Backtest console: submit a simulation, show its stats and trades, then
//! chart a fixed candle window for the same symbol.

use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::api::backend::{ApiError, TradingBackend};
use crate::models::BacktestRequest;
use crate::services::view_service;
use crate::utils::page::Page;

/// Bars fetched for the chart after a successful backtest
pub const BACKTEST_CANDLE_WINDOW: u32 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BacktestState {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// How a run ended
#[derive(Debug, Clone, PartialEq)]
pub enum BacktestOutcome {
    /// Stats and trades rendered; `charted` tells whether the chart followed
    Succeeded { trades: usize, charted: bool },
    /// The request was rejected before submission or by the backend
    Rejected(String),
    /// Transport failure; the stats surface was restored
    Failed(ApiError),
}

pub struct BacktestRunner {
    backend: Arc<dyn TradingBackend>,
    page: Arc<Mutex<Page>>,
    candle_window: u32,
    state: StdMutex<BacktestState>,
}

impl BacktestRunner {
    pub fn new(backend: Arc<dyn TradingBackend>, page: Arc<Mutex<Page>>, candle_window: u32) -> Self {
        Self {
            backend,
            page,
            candle_window,
            state: StdMutex::new(BacktestState::Idle),
        }
    }

    pub fn state(&self) -> BacktestState {
        self.state.lock().map(|s| *s).unwrap_or(BacktestState::Idle)
    }

    fn set_state(&self, next: BacktestState) {
        if let Ok(mut state) = self.state.lock() {
            *state = next;
        }
    }

    /// Run one backtest. Always returns the runner to Idle.
    pub async fn run(&self, request: BacktestRequest) -> BacktestOutcome {
        let outcome = self.submit(request).await;
        let terminal = match outcome {
            BacktestOutcome::Succeeded { .. } => BacktestState::Succeeded,
            _ => BacktestState::Failed,
        };
        self.set_state(terminal);
        info!("Backtest finished: {:?}", terminal);
        self.set_state(BacktestState::Idle);
        outcome
    }

    async fn submit(&self, request: BacktestRequest) -> BacktestOutcome {
        if let Err(message) = request.validate() {
            warn!("Rejected backtest request: {}", message);
            let mut page = self.page.lock().await;
            page.stats.replace(view_service::render_message(&message));
            return BacktestOutcome::Rejected(message);
        }

        self.set_state(BacktestState::Submitting);

        let previous_stats = {
            let mut page = self.page.lock().await;
            let previous = page.stats.content().to_string();
            let running = format!(
                "{} {} ({}m)...",
                page.labels().running_backtest,
                request.symbol,
                request.months
            );
            page.stats.replace(view_service::render_message(&running));
            previous
        };

        info!("Submitting backtest for {} over {} months", request.symbol, request.months);

        let result = match self.backend.run_backtest(&request).await {
            Ok(result) => result,
            Err(ApiError::Domain(message)) => {
                warn!("Backtest for {} failed: {}", request.symbol, message);
                let mut page = self.page.lock().await;
                page.stats.replace(view_service::render_message(&message));
                return BacktestOutcome::Rejected(message);
            }
            Err(e) => {
                error!("Backtest request for {} failed: {}", request.symbol, e);
                let mut page = self.page.lock().await;
                page.stats.replace(previous_stats);
                return BacktestOutcome::Failed(e);
            }
        };

        {
            let mut page = self.page.lock().await;
            page.apply_backtest(&result);
        }

        // Stats and trades stay rendered whatever happens to the chart
        let charted = match self.backend.get_candles(&request.symbol, self.candle_window).await {
            Ok(candles) => {
                let mut page = self.page.lock().await;
                match page.chart.render_candles(&candles) {
                    Ok(_) => true,
                    Err(e) => {
                        error!("Backtest chart rebuild failed: {}", e);
                        false
                    }
                }
            }
            Err(e) => {
                warn!("Backtest chart fetch for {} failed, chart left as is: {}", request.symbol, e);
                false
            }
        };

        BacktestOutcome::Succeeded {
            trades: result.trades.len(),
            charted,
        }
    }
}

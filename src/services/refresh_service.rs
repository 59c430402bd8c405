//! Live-mode refresh cycle: status -> views -> candles -> chart.
//!
//! Cycles may overlap (a timer tick can fire while a manual refresh is still
//! waiting on the backend). Each cycle takes a sequence token; after every
//! suspension point a cycle that is no longer the latest one drops its
//! response, so the page always converges on the most recently issued cycle.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::api::backend::{ApiError, TradingBackend};
use crate::utils::page::Page;

/// What started a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    InitialLoad,
    Timer,
    Manual,
    SelectionChanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    Idle,
    Refreshing,
}

/// How a cycle ended
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// Views and chart were updated
    Completed { symbol: String, limit: u32, candles: usize },
    /// Status fetch failed, nothing was touched
    StatusFailed(ApiError),
    /// Views were updated, the chart was left as it was
    CandlesFailed(ApiError),
    /// Views were updated and candles fetched, but the chart could not be redrawn
    ChartFailed(String),
    /// Views were updated but there is no symbol to chart
    NoSymbols,
    /// A newer cycle was issued while this one waited; its data was dropped
    Superseded,
}

/// Decrements the in-flight counter on every exit path
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        InFlight(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct LiveRefresher {
    backend: Arc<dyn TradingBackend>,
    page: Arc<Mutex<Page>>,
    issued: AtomicU64,
    in_flight: AtomicUsize,
}

impl LiveRefresher {
    pub fn new(backend: Arc<dyn TradingBackend>, page: Arc<Mutex<Page>>) -> Self {
        Self {
            backend,
            page,
            issued: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
        }
    }

    pub fn state(&self) -> RefreshState {
        if self.in_flight.load(Ordering::SeqCst) > 0 {
            RefreshState::Refreshing
        } else {
            RefreshState::Idle
        }
    }

    fn is_latest(&self, token: u64) -> bool {
        self.issued.load(Ordering::SeqCst) == token
    }

    /// Run one full cycle. Never fails: errors are logged and reported in the
    /// outcome, and the refresher is Idle again once this returns.
    pub async fn refresh(&self, trigger: Trigger) -> RefreshOutcome {
        let token = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = InFlight::enter(&self.in_flight);
        debug!("Refresh #{} started ({:?})", token, trigger);

        let status = match self.backend.get_status().await {
            Ok(status) => status,
            Err(e) => {
                error!("Refresh #{}: status fetch failed: {}", token, e);
                return RefreshOutcome::StatusFailed(e);
            }
        };

        if !self.is_latest(token) {
            debug!("Refresh #{} superseded after status fetch", token);
            return RefreshOutcome::Superseded;
        }

        // Balance, stats, trades and selectors all come from this one snapshot
        let target = {
            let mut page = self.page.lock().await;
            page.apply_status(&status)
        };

        let target = match target {
            Some(target) => target,
            None => {
                warn!("Refresh #{}: no symbols available, chart left as is", token);
                return RefreshOutcome::NoSymbols;
            }
        };

        let candles = match self.backend.get_candles(&target.symbol, target.limit).await {
            Ok(candles) => candles,
            Err(e) => {
                error!(
                    "Refresh #{}: candles for {} ({}) failed: {}",
                    token, target.symbol, target.limit, e
                );
                return RefreshOutcome::CandlesFailed(e);
            }
        };

        if !self.is_latest(token) {
            debug!("Refresh #{} superseded after candle fetch", token);
            return RefreshOutcome::Superseded;
        }

        let mut page = self.page.lock().await;
        if let Err(e) = page.chart.render_candles(&candles) {
            error!("Refresh #{}: chart rebuild failed: {}", token, e);
            return RefreshOutcome::ChartFailed(e.to_string());
        }

        info!(
            "Refresh #{} done: {} x{} ({} candles)",
            token, target.symbol, target.limit, candles.len()
        );
        RefreshOutcome::Completed {
            symbol: target.symbol,
            limit: target.limit,
            candles: candles.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::backend::scripted::{candles, Reply, ScriptedBackend};
    use crate::models::{LiveStats, StatusSnapshot, Trade};
    use crate::utils::locale::Locale;

    fn setup() -> (Arc<ScriptedBackend>, Arc<Mutex<Page>>, LiveRefresher) {
        let backend = Arc::new(ScriptedBackend::new());
        let page = Arc::new(Mutex::new(Page::new(
            Locale::English,
            200,
            (320, 200),
            "http://bot/download_trades".to_string(),
        )));
        let refresher = LiveRefresher::new(backend.clone(), page.clone());
        (backend, page, refresher)
    }

    fn status(symbols: &[&str], balance: f64) -> StatusSnapshot {
        StatusSnapshot {
            balance,
            symbols: symbols.iter().map(|s| s.to_string()).collect(),
            stats: LiveStats { trades: 2, wins: 1, losses: 1, profit_usd: 0.5 },
            trades: vec![Trade::default(), Trade::default()],
        }
    }

    fn chart_closes(page: &Page) -> Vec<f64> {
        page.chart
            .current()
            .map(|c| c.points().iter().map(|p| p.c).collect())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn first_symbol_is_used_without_a_selection() {
        let (backend, page, refresher) = setup();
        backend.push_status(Reply::ok(status(&["ETHUSD", "BTCUSD"], 10.0)));
        backend.push_candles(Reply::ok(candles(&[1.0, 2.0])));

        let outcome = refresher.refresh(Trigger::InitialLoad).await;

        assert_eq!(
            outcome,
            RefreshOutcome::Completed { symbol: "ETHUSD".to_string(), limit: 200, candles: 2 }
        );
        assert_eq!(backend.calls(), vec!["status", "candles ETHUSD 200"]);
        let page = page.lock().await;
        assert_eq!(page.balance.content(), "Balance: $10.000000");
        assert_eq!(chart_closes(&page), vec![1.0, 2.0]);
        assert_eq!(refresher.state(), RefreshState::Idle);
    }

    #[tokio::test]
    async fn explicit_selection_drives_the_candle_fetch() {
        let (backend, page, refresher) = setup();
        {
            let mut page = page.lock().await;
            page.selection.symbol = Some("BTCUSD".to_string());
            page.selection.limit = Some(500);
        }
        backend.push_status(Reply::ok(status(&["ETHUSD", "BTCUSD"], 10.0)));
        backend.push_candles(Reply::ok(candles(&[3.0])));

        refresher.refresh(Trigger::SelectionChanged).await;

        assert_eq!(backend.calls(), vec!["status", "candles BTCUSD 500"]);
    }

    #[tokio::test]
    async fn back_to_back_cycles_show_only_the_later_dataset() {
        let (backend, page, refresher) = setup();
        backend.push_status(Reply::ok(status(&["ETHUSD"], 10.0)));
        backend.push_candles(Reply::ok(candles(&[1.0, 2.0, 3.0])));
        backend.push_status(Reply::ok(status(&["ETHUSD"], 11.0)));
        backend.push_candles(Reply::ok(candles(&[7.0, 8.0])));

        refresher.refresh(Trigger::Manual).await;
        refresher.refresh(Trigger::Timer).await;

        let page = page.lock().await;
        assert_eq!(chart_closes(&page), vec![7.0, 8.0]);
        assert_eq!(page.chart.surface().live_instances(), 1);
        assert_eq!(page.chart.surface().disposed_count(), 1);
        assert_eq!(page.balance.content(), "Balance: $11.000000");
    }

    #[tokio::test]
    async fn slow_older_cycle_cannot_overwrite_a_newer_one() {
        let (backend, page, refresher) = setup();
        // Cycle 1: fast status, slow candles
        backend.push_status(Reply::ok(status(&["ETHUSD"], 10.0)));
        // Cycle 2: status arrives while cycle 1 waits on candles
        backend.push_status(Reply::ok(status(&["ETHUSD"], 11.0)).after(20));
        backend.push_candles(Reply::ok(candles(&[1.0, 1.0])).after(150));
        backend.push_candles(Reply::ok(candles(&[9.0])));

        let (first, second) = tokio::join!(
            refresher.refresh(Trigger::Manual),
            refresher.refresh(Trigger::Timer),
        );

        assert_eq!(first, RefreshOutcome::Superseded);
        assert!(matches!(second, RefreshOutcome::Completed { candles: 1, .. }));
        let page = page.lock().await;
        assert_eq!(chart_closes(&page), vec![9.0]);
        assert_eq!(page.balance.content(), "Balance: $11.000000");
        assert_eq!(refresher.state(), RefreshState::Idle);
    }

    #[tokio::test]
    async fn status_failure_leaves_views_untouched() {
        let (backend, page, refresher) = setup();
        backend.push_status(Reply::ok(status(&["ETHUSD"], 10.0)));
        backend.push_candles(Reply::ok(candles(&[1.0])));
        refresher.refresh(Trigger::InitialLoad).await;
        let before = page.lock().await.render_document();

        backend.push_status(Reply::err(ApiError::Request("connection refused".to_string())));
        let outcome = refresher.refresh(Trigger::Timer).await;

        assert!(matches!(outcome, RefreshOutcome::StatusFailed(ApiError::Request(_))));
        assert_eq!(page.lock().await.render_document(), before);
        assert_eq!(refresher.state(), RefreshState::Idle);
    }

    #[tokio::test]
    async fn candle_domain_error_keeps_the_previous_chart() {
        let (backend, page, refresher) = setup();
        backend.push_status(Reply::ok(status(&["ETHUSD"], 10.0)));
        backend.push_candles(Reply::ok(candles(&[4.0, 5.0])));
        refresher.refresh(Trigger::InitialLoad).await;

        backend.push_status(Reply::ok(status(&["ETHUSD"], 12.0)));
        backend.push_candles(Reply::err(ApiError::Domain("Invalid symbol".to_string())));
        let outcome = refresher.refresh(Trigger::Manual).await;

        assert_eq!(outcome, RefreshOutcome::CandlesFailed(ApiError::Domain("Invalid symbol".to_string())));
        let page = page.lock().await;
        assert_eq!(chart_closes(&page), vec![4.0, 5.0]);
        assert_eq!(page.balance.content(), "Balance: $12.000000");
        // Live-mode domain errors are logged only
        assert!(!page.stats.content().contains("Invalid symbol"));
    }

    #[tokio::test]
    async fn empty_symbol_list_skips_the_candle_fetch() {
        let (backend, _page, refresher) = setup();
        backend.push_status(Reply::ok(status(&[], 10.0)));

        assert_eq!(refresher.refresh(Trigger::Timer).await, RefreshOutcome::NoSymbols);
        assert_eq!(backend.calls(), vec!["status"]);
    }
}

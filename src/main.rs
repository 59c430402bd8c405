use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod commands;
mod config;
mod models;
mod services;
mod utils;

use api::backend::{BackendClient, TradingBackend};
use commands::{Controls, Flow};
use config::{Mode, Settings};
use services::backtest_service::BacktestRunner;
use services::refresh_service::{LiveRefresher, RefreshOutcome, Trigger};
use utils::Page;

/// Initial load, then one cycle per tick. Each cycle runs on its own task and
/// publishes the page when it ends, so a request that never returns cannot
/// hold up the next tick.
async fn run_timer(controls: Arc<Controls>, every: Duration) {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut trigger = Trigger::InitialLoad;

    loop {
        // The first tick completes immediately and carries the initial load
        ticker.tick().await;
        let cycle = controls.clone();
        tokio::spawn(async move {
            let outcome = cycle.refresher.refresh(trigger).await;
            log_outcome(trigger, &outcome);
            cycle.publish().await;
        });
        trigger = Trigger::Timer;
    }
}

fn log_outcome(trigger: Trigger, outcome: &RefreshOutcome) {
    match outcome {
        RefreshOutcome::Completed { .. } | RefreshOutcome::Superseded => {
            debug!("{:?} cycle: {:?}", trigger, outcome)
        }
        RefreshOutcome::NoSymbols => warn!("{:?} cycle found no symbols to chart", trigger),
        RefreshOutcome::StatusFailed(e) | RefreshOutcome::CandlesFailed(e) => {
            warn!("{:?} cycle incomplete: {}", trigger, e)
        }
        RefreshOutcome::ChartFailed(e) => warn!("{:?} cycle could not redraw the chart: {}", trigger, e),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env()
            .add_directive("trade_monitor=debug".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap()))
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("📈 Starting trade monitor...");

    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };
    info!(
        "Backend {} | mode {:?} | output {}",
        settings.backend_url,
        settings.mode,
        settings.output_path.display()
    );

    let client = Arc::new(BackendClient::new(settings.backend_url.clone()));
    let download_url = client.download_url();
    let backend: Arc<dyn TradingBackend> = client;

    let page = Arc::new(Mutex::new(Page::new(
        settings.locale,
        settings.default_limit,
        (settings.chart_width, settings.chart_height),
        download_url.clone(),
    )));

    let controls = Arc::new(Controls {
        mode: settings.mode,
        page: page.clone(),
        refresher: Arc::new(LiveRefresher::new(backend.clone(), page.clone())),
        backtester: Arc::new(BacktestRunner::new(backend, page, settings.backtest_candle_limit)),
        output_path: settings.output_path.clone(),
        download_url,
    });

    controls.publish().await;

    if settings.mode == Mode::Live {
        let timer_controls = controls.clone();
        let every = settings.refresh_interval;
        tokio::spawn(async move { run_timer(timer_controls, every).await });
        info!("Polling every {}s", settings.refresh_interval.as_secs());
    }

    println!("{}", commands::help::text(settings.mode));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut input_open = true;

    loop {
        tokio::select! {
            line = lines.next_line(), if input_open => match line {
                Ok(Some(line)) => {
                    if commands::handle_line(&controls, &line).await == Flow::Quit {
                        break;
                    }
                }
                Ok(None) => {
                    if settings.mode == Mode::Live {
                        info!("Input closed, still polling. Press Ctrl-C to stop.");
                        input_open = false;
                    } else {
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to read input: {}", e);
                    if settings.mode == Mode::Backtest {
                        break;
                    }
                    input_open = false;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }

    info!("👋 Trade monitor stopped");
}

pub mod backtest;
pub mod help;
pub mod refresh;
pub mod select;

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::config::Mode;
use crate::services::backtest_service::BacktestRunner;
use crate::services::refresh_service::LiveRefresher;
use crate::utils::page::Page;

/// Everything a control command can drive
pub struct Controls {
    pub mode: Mode,
    pub page: Arc<Mutex<Page>>,
    pub refresher: Arc<LiveRefresher>,
    pub backtester: Arc<BacktestRunner>,
    pub output_path: PathBuf,
    pub download_url: String,
}

impl Controls {
    /// Write the current page to the dashboard file. The page lock is only
    /// held while the document is rendered.
    pub async fn publish(&self) {
        let document = self.page.lock().await.render_document();
        match tokio::fs::write(&self.output_path, document).await {
            Ok(()) => debug!("Published dashboard to {}", self.output_path.display()),
            Err(e) => error!("Failed to write {}: {}", self.output_path.display(), e),
        }
    }
}

/// Whether the input loop should keep reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Dispatch one line of user input and print the reply
pub async fn handle_line(controls: &Controls, line: &str) -> Flow {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.is_empty() {
        return Flow::Continue;
    }

    let command = parts[0].to_lowercase();
    let args = &parts[1..];

    let result = match command.as_str() {
        "refresh" | "r" => refresh::execute(controls).await,
        "symbol" | "sym" => select::execute_symbol(controls, args).await,
        "limit" | "period" => select::execute_limit(controls, args).await,
        "backtest" | "bt" => backtest::execute(controls, args).await,
        "download" => Ok(format!("📥 Trade export: {}", controls.download_url)),
        "help" | "?" => Ok(help::text(controls.mode)),
        "quit" | "exit" => return Flow::Quit,
        other => Err(format!("Unknown command '{}'. Type `help` for the list.", other)),
    };

    match result {
        Ok(reply) => {
            info!("Command {} handled", command);
            println!("{}", reply);
        }
        Err(e) => {
            error!("Error executing command {}: {}", command, e);
            println!("❌ {}", e);
        }
    }

    controls.publish().await;
    Flow::Continue
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::backend::scripted::ScriptedBackend;
    use crate::services::backtest_service::BACKTEST_CANDLE_WINDOW;
    use crate::utils::locale::Locale;

    pub fn controls(mode: Mode, backend: Arc<ScriptedBackend>, output: PathBuf) -> Controls {
        let page = Arc::new(Mutex::new(Page::new(
            Locale::English,
            200,
            (320, 200),
            "http://bot/download_trades".to_string(),
        )));
        Controls {
            mode,
            page: page.clone(),
            refresher: Arc::new(LiveRefresher::new(backend.clone(), page.clone())),
            backtester: Arc::new(BacktestRunner::new(backend, page, BACKTEST_CANDLE_WINDOW)),
            output_path: output,
            download_url: "http://bot/download_trades".to_string(),
        }
    }

    #[tokio::test]
    async fn quit_stops_the_loop_and_blank_lines_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let controls = controls(Mode::Live, Arc::new(ScriptedBackend::new()), dir.path().join("d.html"));
        assert_eq!(handle_line(&controls, "   ").await, Flow::Continue);
        assert_eq!(handle_line(&controls, "quit").await, Flow::Quit);
    }

    #[tokio::test]
    async fn publish_writes_the_rendered_document() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("dashboard.html");
        let controls = controls(Mode::Live, Arc::new(ScriptedBackend::new()), output.clone());

        controls.publish().await;
        let written = std::fs::read_to_string(&output).unwrap();
        // The lock is free again once publishing is done
        let page = controls.page.try_lock().unwrap();
        assert_eq!(written, page.render_document());
    }

    #[tokio::test]
    async fn every_command_republishes_the_page() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("dashboard.html");
        let controls = controls(Mode::Live, Arc::new(ScriptedBackend::new()), output.clone());

        assert_eq!(handle_line(&controls, "bogus").await, Flow::Continue);
        let html = std::fs::read_to_string(&output).unwrap();
        assert!(html.contains("<div id=\"balance\"></div>"));
    }
}

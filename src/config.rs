//! Runtime settings, read from the environment (and `.env` via dotenv)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::models::selection::{DEFAULT_LIMIT, MAX_LIMIT};
use crate::services::backtest_service::BACKTEST_CANDLE_WINDOW;
use crate::utils::locale::Locale;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
    #[error("{0}")]
    Validation(String),
}

/// Which orchestrator drives the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Live,
    Backtest,
}

impl FromStr for Mode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "live" => Ok(Mode::Live),
            "backtest" | "simulation" => Ok(Mode::Backtest),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub backend_url: String,
    pub mode: Mode,
    pub refresh_interval: Duration,
    pub default_limit: u32,
    pub backtest_candle_limit: u32,
    pub output_path: PathBuf,
    pub chart_width: u32,
    pub chart_height: u32,
    pub locale: Locale,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:8000".to_string(),
            mode: Mode::Live,
            refresh_interval: Duration::from_secs(60),
            default_limit: DEFAULT_LIMIT,
            backtest_candle_limit: BACKTEST_CANDLE_WINDOW,
            output_path: PathBuf::from("dashboard.html"),
            chart_width: 960,
            chart_height: 420,
            locale: Locale::English,
        }
    }
}

impl Settings {
    /// Build settings from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        if let Some(url) = lookup("BACKEND_URL") {
            settings.backend_url = url.trim_end_matches('/').to_string();
        }
        if let Some(mode) = lookup("DASHBOARD_MODE") {
            settings.mode = mode.parse().map_err(|_| ConfigError::Invalid {
                key: "DASHBOARD_MODE",
                value: mode.clone(),
            })?;
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "REFRESH_INTERVAL_SECS")? {
            settings.refresh_interval = Duration::from_secs(secs);
        }
        if let Some(limit) = parse_var(&lookup, "DEFAULT_LIMIT")? {
            settings.default_limit = limit;
        }
        if let Some(limit) = parse_var(&lookup, "BACKTEST_CANDLE_LIMIT")? {
            settings.backtest_candle_limit = limit;
        }
        if let Some(path) = lookup("DASHBOARD_OUTPUT") {
            settings.output_path = PathBuf::from(path);
        }
        if let Some(width) = parse_var(&lookup, "CHART_WIDTH")? {
            settings.chart_width = width;
        }
        if let Some(height) = parse_var(&lookup, "CHART_HEIGHT")? {
            settings.chart_height = height;
        }
        if let Some(code) = lookup("DASHBOARD_LOCALE") {
            settings.locale = Locale::parse(&code).map_err(|_| ConfigError::Invalid {
                key: "DASHBOARD_LOCALE",
                value: code.clone(),
            })?;
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend_url.is_empty() {
            return Err(ConfigError::Validation("BACKEND_URL cannot be empty".to_string()));
        }
        if self.refresh_interval.is_zero() {
            return Err(ConfigError::Validation("REFRESH_INTERVAL_SECS must be > 0".to_string()));
        }
        for (key, limit) in [
            ("DEFAULT_LIMIT", self.default_limit),
            ("BACKTEST_CANDLE_LIMIT", self.backtest_candle_limit),
        ] {
            if limit == 0 || limit > MAX_LIMIT {
                return Err(ConfigError::Validation(format!(
                    "{} must be between 1 and {}",
                    key, MAX_LIMIT
                )));
            }
        }
        if self.chart_width == 0 || self.chart_height == 0 {
            return Err(ConfigError::Validation("Chart size must be non-zero".to_string()));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

use super::Controls;
use crate::config::Mode;
use crate::models::BacktestRequest;
use crate::services::backtest_service::BacktestOutcome;
use crate::utils::errors::user_message;

const USAGE: &str = "Usage: `backtest <SYMBOL> <MONTHS> [initial=<f>] [risk=<f>] [stop=<f>] [interval=<s>]`";

/// Parse `backtest` arguments into a request
pub fn parse_request(args: &[&str]) -> Result<BacktestRequest, String> {
    if args.len() < 2 {
        return Err(USAGE.to_string());
    }

    let months: u32 = args[1]
        .parse()
        .map_err(|_| format!("Invalid month count '{}'. {}", args[1], USAGE))?;
    let mut request = BacktestRequest::new(args[0].trim().to_uppercase(), months);

    for option in &args[2..] {
        let (key, value) = option
            .split_once('=')
            .ok_or_else(|| format!("Expected key=value, got '{}'", option))?;
        let number = || {
            value
                .parse::<f64>()
                .map_err(|_| format!("Invalid number for {}: '{}'", key, value))
        };
        match key.to_lowercase().as_str() {
            "initial" | "initial_balance" => request.initial_balance = Some(number()?),
            "risk" | "risk_per_trade" => request.risk_per_trade = Some(number()?),
            "stop" | "stop_loss_pct" => request.stop_loss_pct = Some(number()?),
            "interval" => request.interval = Some(value.to_string()),
            other => return Err(format!("Unknown option '{}'. {}", other, USAGE)),
        }
    }

    Ok(request)
}

/// Backtest run trigger
pub async fn execute(controls: &Controls, args: &[&str]) -> Result<String, String> {
    if controls.mode != Mode::Backtest {
        return Err("The backtest console is only available in backtest mode".to_string());
    }

    let request = parse_request(args)?;
    tracing::info!("🧪 Backtest requested: {:?}", request);

    match controls.backtester.run(request).await {
        BacktestOutcome::Succeeded { trades, charted: true } => {
            Ok(format!("✅ Backtest done: {} trades", trades))
        }
        BacktestOutcome::Succeeded { trades, charted: false } => {
            Ok(format!("✅ Backtest done: {} trades (chart unavailable)", trades))
        }
        BacktestOutcome::Rejected(message) => Err(message),
        BacktestOutcome::Failed(e) => Err(user_message(&e)),
    }
}

use super::Controls;
use crate::config::Mode;
use crate::services::refresh_service::{RefreshOutcome, Trigger};
use crate::utils::errors::user_message;

/// Manual refresh trigger
pub async fn execute(controls: &Controls) -> Result<String, String> {
    if controls.mode != Mode::Live {
        return Err("Refresh is only available in live mode".to_string());
    }

    tracing::info!("🔄 Manual refresh requested");
    describe(controls.refresher.refresh(Trigger::Manual).await)
}

/// Turn a cycle outcome into a reply line
pub fn describe(outcome: RefreshOutcome) -> Result<String, String> {
    match outcome {
        RefreshOutcome::Completed { symbol, limit, candles } => {
            Ok(format!("✅ Refreshed: {} ({} of {} candles)", symbol, candles, limit))
        }
        RefreshOutcome::NoSymbols => Ok("✅ Refreshed: the backend offers no symbols to chart".to_string()),
        RefreshOutcome::Superseded => Ok("A newer refresh took over".to_string()),
        RefreshOutcome::StatusFailed(e) => Err(user_message(&e)),
        RefreshOutcome::CandlesFailed(e) => Err(format!("Views refreshed, chart kept: {}", user_message(&e))),
        RefreshOutcome::ChartFailed(e) => Err(format!("Views refreshed, chart kept: {}", e)),
    }
}

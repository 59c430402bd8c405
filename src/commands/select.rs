use super::Controls;
use crate::commands::refresh::describe;
use crate::config::Mode;
use crate::models::selection::parse_limit;
use crate::services::refresh_service::Trigger;

/// `symbol <SYMBOL>` picks a symbol, bare `symbol` clears the choice
pub async fn execute_symbol(controls: &Controls, args: &[&str]) -> Result<String, String> {
    let chosen = args.first().map(|s| s.trim().to_uppercase());

    {
        let mut page = controls.page.lock().await;
        if let Some(symbol) = &chosen {
            if !page.symbols.is_empty() && !page.symbols.contains(symbol) {
                return Err(format!(
                    "Symbol '{}' is not offered. Available: {}",
                    symbol,
                    page.symbols.join(", ")
                ));
            }
        }
        page.selection.symbol = chosen.clone();
    }

    tracing::info!("Symbol selection set to {:?}", chosen);
    after_selection(controls, match &chosen {
        Some(symbol) => format!("Symbol set to {}", symbol),
        None => "Symbol selection cleared, first available symbol will be used".to_string(),
    })
    .await
}

/// `limit <N>` picks the candle window
pub async fn execute_limit(controls: &Controls, args: &[&str]) -> Result<String, String> {
    let raw = args
        .first()
        .ok_or_else(|| "Usage: `limit <N>` (for example `limit 500`)".to_string())?;
    let limit = parse_limit(raw)?;

    controls.page.lock().await.selection.limit = Some(limit);

    tracing::info!("Limit selection set to {}", limit);
    after_selection(controls, format!("Limit set to {}", limit)).await
}

async fn after_selection(controls: &Controls, confirmation: String) -> Result<String, String> {
    if controls.mode != Mode::Live {
        return Ok(confirmation);
    }

    let outcome = controls.refresher.refresh(Trigger::SelectionChanged).await;
    describe(outcome).map(|reply| format!("{}\n{}", confirmation, reply))
}

//! View updaters: pure mappings from backend data to surface markup.
//!
//! Each function returns the complete new content of one surface; callers
//! replace the surface wholesale so no stale rows survive a refresh.

use crate::models::selection::LIMIT_CHOICES;
use crate::models::{BacktestStats, LiveStats, Trade};
use crate::utils::html::{decimal, escape};
use crate::utils::locale::Labels;
use crate::utils::table::{Cell, Table};

pub const POSITIVE: &str = "green";
pub const NEGATIVE: &str = "red";

/// Balance line, 6 decimals
pub fn render_balance(amount: f64, labels: &Labels) -> String {
    format!("{}: ${}", labels.balance, decimal(Some(amount)))
}

/// Live stats line with wins/losses styled
pub fn render_stats(stats: &LiveStats, labels: &Labels) -> String {
    format!(
        "{}: {} — {}: <span class=\"{}\">{}</span> — {}: <span class=\"{}\">{}</span> — {}: {}",
        labels.total_trades,
        stats.trades,
        labels.wins,
        POSITIVE,
        stats.wins,
        labels.losses,
        NEGATIVE,
        stats.losses,
        labels.profit,
        decimal(Some(stats.profit_usd)),
    )
}

/// Backtest summary: balances, win/loss counts, win rate
pub fn render_backtest_stats(stats: &BacktestStats, labels: &Labels) -> String {
    let mut line = format!(
        "{}: ${} — {}: ${} — {}: {} — {}: <span class=\"{}\">{}</span> — {}: <span class=\"{}\">{}</span> — {}: {:.2}%",
        labels.initial_balance,
        decimal(Some(stats.initial_balance)),
        labels.final_balance,
        decimal(Some(stats.final_balance)),
        labels.total_trades,
        stats.trades,
        labels.wins,
        POSITIVE,
        stats.wins,
        labels.losses,
        NEGATIVE,
        stats.losses,
        labels.win_rate,
        stats.win_rate,
    );
    if let Some(profit) = stats.profit_usd {
        line.push_str(&format!(" — {}: {}", labels.profit, decimal(Some(profit))));
    }
    line
}

/// A plain message in place of the stats line (running notice, errors)
pub fn render_message(message: &str) -> String {
    escape(message)
}

fn profit_class(trade: &Trade) -> Option<&'static str> {
    trade
        .is_profitable()
        .map(|profitable| if profitable { POSITIVE } else { NEGATIVE })
}

/// Build the trade table, newest first
pub fn trade_table(trades: &[Trade], labels: &Labels) -> Table {
    let mut table = Table::new(&labels.trade_headers);
    for trade in trades.iter().rev() {
        table.add_row(vec![
            Cell::new(trade.time.as_ref().map(|t| t.to_string()).unwrap_or_default()),
            Cell::new(trade.symbol.clone().unwrap_or_default()),
            Cell::new(decimal(trade.entry)),
            Cell::new(decimal(trade.exit)),
            Cell::styled(decimal(trade.profit), profit_class(trade)),
            Cell::new(decimal(trade.balance_after)),
            Cell::new(trade.reason.clone().unwrap_or_default()),
        ]);
    }
    table
}

/// Trade table body rows, newest first
pub fn render_trades(trades: &[Trade], labels: &Labels) -> String {
    trade_table(trades, labels).render_body()
}

/// `<option>` list for the symbol selector
pub fn render_symbol_options(symbols: &[String], selected: Option<&str>) -> String {
    symbols
        .iter()
        .map(|s| {
            let marker = if selected == Some(s.as_str()) { " selected" } else { "" };
            format!("<option value=\"{0}\"{1}>{0}</option>", escape(s), marker)
        })
        .collect()
}

/// `<option>` list for the limit selector
pub fn render_limit_options(selected: u32) -> String {
    LIMIT_CHOICES
        .iter()
        .map(|limit| {
            let marker = if *limit == selected { " selected" } else { "" };
            format!("<option value=\"{0}\"{1}>{0}</option>", limit, marker)
        })
        .collect()
}

/// Notice shown when the chosen symbol vanished from the list
pub fn render_stale_notice(previous: &str, fallback: &str, labels: &Labels) -> String {
    format!(
        "{} {}; {} {}",
        escape(previous),
        labels.no_longer_offered,
        labels.showing,
        escape(fallback)
    )
}

use tracing::warn;

use crate::models::selection::{resolve_limit, resolve_symbol};
use crate::models::{BacktestResult, Selection, StatusSnapshot, SymbolChoice};
use crate::services::chart_service::ChartRenderer;
use crate::services::view_service;
use crate::utils::html::escape;
use crate::utils::locale::{Labels, Locale};

/// One replaceable region of the page
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Surface {
    content: String,
}

impl Surface {
    /// Replace the whole content; there is no partial update
    pub fn replace(&mut self, markup: String) {
        self.content = markup;
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// What a status snapshot resolved the selectors to
#[derive(Debug, Clone, PartialEq)]
pub struct CandleTarget {
    pub symbol: String,
    pub limit: u32,
}

/// The dashboard document: every rendering surface plus the selector state
pub struct Page {
    pub balance: Surface,
    pub stats: Surface,
    pub trades: Surface,
    pub notice: Surface,
    pub symbol_options: Surface,
    pub symbols: Vec<String>,
    pub chart: ChartRenderer,
    pub selection: Selection,
    pub download_href: Option<String>,
    locale: Locale,
    default_limit: u32,
    download_url: String,
}

impl Page {
    pub fn new(locale: Locale, default_limit: u32, chart_size: (u32, u32), download_url: String) -> Self {
        Page {
            balance: Surface::default(),
            stats: Surface::default(),
            trades: Surface::default(),
            notice: Surface::default(),
            symbol_options: Surface::default(),
            symbols: Vec::new(),
            chart: ChartRenderer::new("chart", chart_size.0, chart_size.1),
            selection: Selection::default(),
            download_href: None,
            locale,
            default_limit,
            download_url,
        }
    }

    pub fn labels(&self) -> &'static Labels {
        self.locale.labels()
    }

    /// Limit the next candle fetch will use
    pub fn effective_limit(&self) -> u32 {
        resolve_limit(self.selection.limit, self.default_limit)
    }

    /// Render balance, stats, trades and the symbol selector from one snapshot
    /// and resolve which candles should be shown next.
    ///
    /// A stale explicit symbol is cleared and a notice is rendered. Returns
    /// `None` when the backend offers no symbols.
    pub fn apply_status(&mut self, status: &StatusSnapshot) -> Option<CandleTarget> {
        let labels = self.labels();
        self.balance.replace(view_service::render_balance(status.balance, labels));
        self.stats.replace(view_service::render_stats(&status.stats, labels));
        self.show_trades(&status.trades);

        let choice = resolve_symbol(self.selection.symbol.as_deref(), &status.symbols);
        match &choice {
            SymbolChoice::Stale { previous, fallback } => {
                warn!("Selected symbol {} is no longer offered, falling back to {}", previous, fallback);
                self.selection.symbol = None;
                self.notice
                    .replace(view_service::render_stale_notice(previous, fallback, labels));
            }
            SymbolChoice::Unavailable => {
                warn!("Backend offers no symbols");
                self.notice.replace(String::new());
            }
            _ => self.notice.replace(String::new()),
        }

        let symbol = choice.symbol().map(str::to_string);
        self.symbols = status.symbols.clone();
        self.symbol_options
            .replace(view_service::render_symbol_options(&status.symbols, symbol.as_deref()));

        symbol.map(|symbol| CandleTarget {
            symbol,
            limit: self.effective_limit(),
        })
    }

    /// Replace the trade table and expose the export link
    pub fn show_trades(&mut self, trades: &[crate::models::Trade]) {
        self.trades
            .replace(view_service::render_trades(trades, self.labels()));
        self.download_href = Some(self.download_url.clone());
    }

    /// Render a successful backtest's stats and trades
    pub fn apply_backtest(&mut self, result: &BacktestResult) {
        self.stats
            .replace(view_service::render_backtest_stats(&result.stats, self.labels()));
        self.show_trades(&result.trades);
    }

    /// Serialize the page to a standalone HTML document
    pub fn render_document(&self) -> String {
        let labels = self.labels();
        let download = match &self.download_href {
            Some(href) => format!("<a id=\"download\" href=\"{}\">{}</a>", escape(href), labels.download),
            None => String::new(),
        };
        let head = view_service::trade_table(&[], labels).render_head();

        format!(
            r#"<!DOCTYPE html>
<html lang="{lang}" dir="{dir}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
{css}
    </style>
</head>
<body>
    <header>
        <h1>{title}</h1>
        <label>{symbol_label} <select id="symbolSelect">{symbols}</select></label>
        <label>{limit_label} <select id="limitSelect">{limits}</select></label>
    </header>
    <div id="balance">{balance}</div>
    <div id="stats">{stats}</div>
    <div id="notice">{notice}</div>
    <div id="{chart_id}">{chart}</div>
    <table id="tradesTable">
        <thead>{head}</thead>
        <tbody>
{trades}        </tbody>
    </table>
    {download}
</body>
</html>
"#,
            lang = labels.lang,
            dir = labels.dir,
            title = labels.title,
            css = STYLES,
            symbol_label = labels.symbol,
            symbols = self.symbol_options.content(),
            limit_label = labels.limit,
            limits = view_service::render_limit_options(self.effective_limit()),
            balance = self.balance.content(),
            stats = self.stats.content(),
            notice = self.notice.content(),
            chart_id = self.chart.surface().id(),
            chart = self.chart.surface().markup(),
            head = head,
            trades = self.trades.content(),
            download = download,
        )
    }
}

const STYLES: &str = r#"        body { font-family: sans-serif; margin: 1.5rem; background: #fafafa; }
        header { display: flex; gap: 1rem; align-items: center; }
        .green { color: #1a7f37; }
        .red { color: #cf222e; }
        #notice { color: #9a6700; }
        table { border-collapse: collapse; width: 100%; margin-top: 1rem; }
        th, td { border-bottom: 1px solid #ddd; padding: 0.3rem 0.6rem; text-align: start; }"#;

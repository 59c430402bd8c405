use crate::config::Mode;

/// Command reference for the current mode
pub fn text(mode: Mode) -> String {
    let mut lines = vec!["📖 Commands"];
    match mode {
        Mode::Live => lines.extend([
            "  refresh              reload status, trades and chart",
            "  symbol [SYMBOL]      chart SYMBOL (no argument: first available)",
            "  limit <N>            candles to chart (1-1000)",
        ]),
        Mode::Backtest => lines.extend([
            "  backtest <SYMBOL> <MONTHS> [initial=<f>] [risk=<f>] [stop=<f>] [interval=<s>]",
            "  symbol [SYMBOL]      preset the selector",
            "  limit <N>            preset the selector",
        ]),
    }
    lines.extend([
        "  download             show the trade export link",
        "  help                 this list",
        "  quit                 stop the monitor",
    ]);
    lines.join("\n")
}

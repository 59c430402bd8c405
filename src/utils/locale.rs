//! Localized labels for the dashboard surfaces

/// Languages the dashboard can be rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    English,
    Arabic,
}

impl Locale {
    /// Parse a locale code such as `en` or `ar`
    pub fn parse(code: &str) -> Result<Self, String> {
        match code.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Locale::English),
            "ar" | "arabic" => Ok(Locale::Arabic),
            other => Err(format!("Unknown locale '{}'. Supported: en, ar", other)),
        }
    }

    pub fn labels(&self) -> &'static Labels {
        match self {
            Locale::English => &ENGLISH,
            Locale::Arabic => &ARABIC,
        }
    }
}

pub struct Labels {
    pub lang: &'static str,
    pub dir: &'static str,
    pub title: &'static str,
    pub balance: &'static str,
    pub total_trades: &'static str,
    pub wins: &'static str,
    pub losses: &'static str,
    pub profit: &'static str,
    pub initial_balance: &'static str,
    pub final_balance: &'static str,
    pub win_rate: &'static str,
    pub running_backtest: &'static str,
    pub download: &'static str,
    pub symbol: &'static str,
    pub limit: &'static str,
    pub no_longer_offered: &'static str,
    pub showing: &'static str,
    pub trade_headers: [&'static str; 7],
}

static ENGLISH: Labels = Labels {
    lang: "en",
    dir: "ltr",
    title: "Trading Bot Monitor",
    balance: "Balance",
    total_trades: "Total trades",
    wins: "Wins",
    losses: "Losses",
    profit: "Profit $",
    initial_balance: "Initial balance",
    final_balance: "Final balance",
    win_rate: "Win rate",
    running_backtest: "Running backtest",
    download: "Download trades",
    symbol: "Symbol",
    limit: "Candles",
    no_longer_offered: "is no longer offered",
    showing: "showing",
    trade_headers: ["Time", "Symbol", "Entry", "Exit", "Profit", "Balance after", "Reason"],
};

static ARABIC: Labels = Labels {
    lang: "ar",
    dir: "rtl",
    title: "مراقب بوت التداول",
    balance: "الرصيد",
    total_trades: "إجمالي الصفقات",
    wins: "فوز",
    losses: "خسارة",
    profit: "ربح $",
    initial_balance: "الرصيد الابتدائي",
    final_balance: "الرصيد النهائي",
    win_rate: "نسبة الفوز",
    running_backtest: "جاري تشغيل الاختبار",
    download: "تحميل الصفقات",
    symbol: "الرمز",
    limit: "الشموع",
    no_longer_offered: "لم يعد متاحًا",
    showing: "يتم عرض",
    trade_headers: ["الوقت", "الرمز", "الدخول", "الخروج", "الربح", "الرصيد بعد", "السبب"],
};

pub mod backtest_service;
pub mod chart_service;
pub mod refresh_service;
pub mod view_service;

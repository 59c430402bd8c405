pub mod client;
pub mod models;

#[cfg(test)]
pub mod scripted;

pub use client::{BackendClient, TradingBackend};
pub use models::ApiError;

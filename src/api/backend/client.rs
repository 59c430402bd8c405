use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::models::{domain_error, ApiError, Method};
use crate::models::{BacktestRequest, BacktestResult, Candle, CandlesResponse, StatusSnapshot};

/// The calls the orchestrators need from the backend
#[async_trait]
pub trait TradingBackend: Send + Sync {
    /// GET /api/status
    async fn get_status(&self) -> Result<StatusSnapshot, ApiError>;

    /// GET /api/candles?symbol=<s>&limit=<n>
    async fn get_candles(&self, symbol: &str, limit: u32) -> Result<Vec<Candle>, ApiError>;

    /// POST /api/backtest
    async fn run_backtest(&self, request: &BacktestRequest) -> Result<BacktestResult, ApiError>;
}

/// HTTP client for the trading bot's dashboard API
pub struct BackendClient {
    http_client: HttpClient,
    base_url: String,
}

impl BackendClient {
    /// Create a new client for the backend at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Link to the trade export. The monitor only exposes it, never fetches it.
    pub fn download_url(&self) -> String {
        format!("{}/download_trades", self.base_url)
    }

    fn create_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("trade-monitor/1.1"));
        headers
    }

    /// Issue one request and normalize the outcome.
    ///
    /// A single attempt: no retries, no timeout. An `error` field in the body
    /// becomes [`ApiError::Domain`] whatever the status code was.
    pub async fn call(
        &self,
        path: &str,
        method: Method,
        body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("{:?} {}", method, url);

        let mut request = match method {
            Method::Get => self.http_client.get(&url),
            Method::Post => self.http_client.post(&url),
        }
        .headers(Self::create_headers());

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Request(format!("Request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Request(format!("Failed to read response: {}", e)))?;

        let parsed = serde_json::from_str::<serde_json::Value>(&text);

        if let Ok(json) = &parsed {
            if let Some(message) = domain_error(json) {
                debug!("Backend reported error on {} ({}): {}", path, status, message);
                return Err(ApiError::Domain(message));
            }
        }

        if !status.is_success() {
            warn!("Backend returned {} for {}", status, path);
            return Err(ApiError::Http(status.as_u16(), text));
        }

        parsed.map_err(|e| ApiError::Deserialization(format!("Failed to parse response: {}", e)))
    }

    async fn call_typed<T: DeserializeOwned>(
        &self,
        path: &str,
        method: Method,
        body: Option<&serde_json::Value>,
    ) -> Result<T, ApiError> {
        let json = self.call(path, method, body).await?;
        serde_json::from_value(json)
            .map_err(|e| ApiError::Deserialization(format!("Unexpected response shape: {}", e)))
    }
}

/// Path and query for a candle window
pub fn candles_path(symbol: &str, limit: u32) -> String {
    let symbol: String = symbol
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();
    format!("/api/candles?symbol={}&limit={}", symbol, limit)
}

#[async_trait]
impl TradingBackend for BackendClient {
    async fn get_status(&self) -> Result<StatusSnapshot, ApiError> {
        self.call_typed("/api/status", Method::Get, None).await
    }

    async fn get_candles(&self, symbol: &str, limit: u32) -> Result<Vec<Candle>, ApiError> {
        let response: CandlesResponse = self
            .call_typed(&candles_path(symbol, limit), Method::Get, None)
            .await?;
        if let Some(echoed) = response.symbol.as_deref() {
            if !echoed.eq_ignore_ascii_case(symbol) {
                warn!("Asked for {} candles, backend answered for {}", symbol, echoed);
            }
        }
        Ok(response.candles)
    }

    async fn run_backtest(&self, request: &BacktestRequest) -> Result<BacktestResult, ApiError> {
        let body = serde_json::to_value(request)
            .map_err(|e| ApiError::Deserialization(format!("Failed to encode request: {}", e)))?;
        self.call_typed("/api/backtest", Method::Post, Some(&body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on a local port and return its base URL
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = vec![0u8; 4096];
            let _ = socket.read(&mut request).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn success_body_is_returned_as_json() {
        let client = BackendClient::new(serve_once("200 OK", r#"{"balance": 10.5}"#).await);
        let json = client.call("/api/status", Method::Get, None).await.unwrap();
        assert_eq!(json["balance"], 10.5);
    }

    #[tokio::test]
    async fn error_field_on_success_is_a_domain_error() {
        let client = BackendClient::new(serve_once("200 OK", r#"{"error": "Invalid symbol"}"#).await);
        let err = client.call("/api/candles", Method::Get, None).await.unwrap_err();
        assert_eq!(err, ApiError::Domain("Invalid symbol".to_string()));
    }

    #[tokio::test]
    async fn error_field_on_server_error_is_a_domain_error() {
        let client = BackendClient::new(
            serve_once("500 Internal Server Error", r#"{"error": "insufficient data"}"#).await,
        );
        let body = serde_json::json!({"symbol": "BTCUSD", "months": 3});
        let err = client.call("/api/backtest", Method::Post, Some(&body)).await.unwrap_err();
        assert_eq!(err, ApiError::Domain("insufficient data".to_string()));
    }

    #[tokio::test]
    async fn server_error_without_json_is_an_http_error() {
        let client = BackendClient::new(serve_once("500 Internal Server Error", "boom").await);
        let err = client.call("/api/status", Method::Get, None).await.unwrap_err();
        assert_eq!(err, ApiError::Http(500, "boom".to_string()));
    }

    #[tokio::test]
    async fn success_without_json_is_a_deserialization_error() {
        let client = BackendClient::new(serve_once("200 OK", "<html>").await);
        let err = client.call("/api/status", Method::Get, None).await.unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[tokio::test]
    async fn candles_are_unwrapped_from_the_response() {
        let client = BackendClient::new(
            serve_once(
                "200 OK",
                r#"{"symbol": "ETHUSD", "candles": [{"time": 1700000000000, "open": 1.0, "high": 2.0, "low": 0.5, "close": 1.5}]}"#,
            )
            .await,
        );
        let candles = client.get_candles("ETHUSD", 200).await.unwrap();
        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0].close, 1.5);
        assert_eq!(candles[0].volume, None);
    }

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let client = BackendClient::new("http://localhost:8000/");
        assert_eq!(client.download_url(), "http://localhost:8000/download_trades");
    }

    #[test]
    fn candles_path_carries_symbol_and_limit() {
        assert_eq!(candles_path("ETHUSD", 200), "/api/candles?symbol=ETHUSD&limit=200");
        assert_eq!(candles_path("BTC&x=1", 5), "/api/candles?symbol=BTCx1&limit=5");
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        // Port 9 (discard) on localhost is closed in test environments
        let client = BackendClient::new("http://127.0.0.1:9");
        let err = client.get_status().await.unwrap_err();
        assert!(matches!(err, ApiError::Request(_)));
    }
}

use thiserror::Error;

/// HTTP verbs the monitor issues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Comprehensive error type for backend calls
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Network/request error
    #[error("Request Error: {0}")]
    Request(String),
    /// Body was not the JSON we expected
    #[error("Deserialization Error: {0}")]
    Deserialization(String),
    /// Non-success status without an error field
    #[error("HTTP Error ({0}): {1}")]
    Http(u16, String),
    /// The backend answered with an explicit `error` field
    #[error("{0}")]
    Domain(String),
}

/// Pull the `error` field out of a JSON body, if there is one
pub fn domain_error(body: &serde_json::Value) -> Option<String> {
    match body.get("error")? {
        serde_json::Value::Null => None,
        serde_json::Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}

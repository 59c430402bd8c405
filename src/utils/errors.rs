use crate::api::backend::ApiError;

/// Turn a backend error into the line shown to the user.
///
/// Domain errors are shown verbatim; transport problems get a generic hint
/// instead of the raw reqwest message.
pub fn user_message(error: &ApiError) -> String {
    match error {
        ApiError::Domain(message) => message.clone(),
        ApiError::Request(_) => "⚠️ Network Error: the trading backend is unreachable. Please try again.".to_string(),
        ApiError::Http(code, _) => format!("⚠️ Backend Error: the trading backend answered with status {}.", code),
        ApiError::Deserialization(_) => "⚠️ Backend Error: unexpected response from the trading backend.".to_string(),
    }
}

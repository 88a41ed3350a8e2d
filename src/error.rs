//! Error taxonomy for calls against the REST backends.
//!
//! Client-side validation failures are not represented here; they live in
//! the form and registration validators as per-field messages.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, timeout).
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The backend answered with a non-2xx status or `success: false`.
    #[error("server rejected request ({status}): {}", message.as_deref().unwrap_or("no message"))]
    Server { status: u16, message: Option<String> },

    /// The body could not be decoded into the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("{0}")]
    NotFound(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Message supplied by the backend, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Server { message, .. } => message.as_deref(),
            ApiError::NotFound(message) => Some(message),
            _ => None,
        }
    }

    /// Text to show the user: the backend's own message, or `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(fallback)
            .to_string()
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Server { status: 401, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = ApiError::Server {
            status: 400,
            message: Some("Date already booked".to_string()),
        };
        assert_eq!(err.user_message("An error occurred"), "Date already booked");
    }

    #[test]
    fn test_user_message_falls_back() {
        let err = ApiError::Server {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message("An error occurred"), "An error occurred");

        let err = ApiError::Decode("bad json".to_string());
        assert_eq!(err.user_message("Failed to load tasks"), "Failed to load tasks");
    }

    #[test]
    fn test_blank_server_message_uses_fallback() {
        let err = ApiError::Server {
            status: 422,
            message: Some("  ".to_string()),
        };
        assert_eq!(err.user_message("fallback"), "fallback");
    }
}

//! REST clients for the booking, task and auth backends.
//!
//! Every backend is reached through an [`ApiClient`]: a `reqwest` client bound
//! to one base URL and the shared bearer token. All response bodies pass
//! through [`interpret`], the single envelope rule set: a non-2xx status or a
//! body with `success: false` is a rejection carrying the body's `message`,
//! else its `error`.

pub mod auth;
pub mod bookings;
pub mod tasks;

pub use auth::AuthApi;
pub use bookings::BookingsApi;
pub use tasks::TasksApi;

use crate::error::ApiError;
use crate::state::session::SharedToken;
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Longest plain-text error body surfaced as a message.
const MAX_TEXT_MESSAGE: usize = 200;

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
    token: SharedToken,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration, token: SharedToken) -> Result<Self, ApiError> {
        let base = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("frontdesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Network)?;
        Ok(Self { http, base, token })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn token(&self) -> &SharedToken {
        &self.token
    }

    /// Base URL extended by path segments; each segment is percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Endpoint with query pairs appended in order.
    pub fn endpoint_with_query(
        &self,
        segments: &[&str],
        pairs: &[(&str, String)],
    ) -> Result<Url, ApiError> {
        let mut url = self.endpoint(segments)?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in pairs {
                query.append_pair(key, value);
            }
        }
        Ok(url)
    }

    pub async fn get(&self, url: Url) -> Result<Value, ApiError> {
        self.send(Method::GET, url, None).await
    }

    pub async fn post(&self, url: Url, body: &Value) -> Result<Value, ApiError> {
        self.send(Method::POST, url, Some(body)).await
    }

    pub async fn put(&self, url: Url, body: &Value) -> Result<Value, ApiError> {
        self.send(Method::PUT, url, Some(body)).await
    }

    pub async fn delete(&self, url: Url) -> Result<Value, ApiError> {
        self.send(Method::DELETE, url, None).await
    }

    /// Send with the shared token, if one is held.
    pub async fn send(&self, method: Method, url: Url, body: Option<&Value>) -> Result<Value, ApiError> {
        let token = self.token.get();
        self.send_as(method, url, body, token.as_deref()).await
    }

    /// Send with an explicit token instead of the shared one.
    pub async fn send_as(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> Result<Value, ApiError> {
        debug!(authorized = token.is_some(), "{} {}", method, url);

        let mut request = self.http.request(method.clone(), url.clone());
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!("{} {} failed: {}", method, url, e);
            ApiError::Network(e)
        })?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(ApiError::Network)?;
        debug!(status, bytes = text.len(), "{} {} answered", method, url);

        interpret(status, parse_body(status, &text)?)
    }
}

/// Parse a response body. Empty bodies become `null`; a non-JSON body is an
/// error for successful responses and kept as text otherwise.
fn parse_body(status: u16, text: &str) -> Result<Value, ApiError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(_) if !is_success(status) => Ok(Value::String(text.trim().to_string())),
        Err(e) => Err(ApiError::Decode(format!("invalid JSON body: {}", e))),
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Apply the envelope rules to a decoded body.
pub fn interpret(status: u16, body: Value) -> Result<Value, ApiError> {
    let refused = body.get("success").and_then(Value::as_bool) == Some(false);
    if is_success(status) && !refused {
        return Ok(body);
    }
    Err(ApiError::Server {
        status,
        message: error_message(&body),
    })
}

/// The body's `message`, else its `error`, else a short plain-text body.
pub fn error_message(body: &Value) -> Option<String> {
    match body {
        Value::Object(map) => ["message", "error"]
            .iter()
            .filter_map(|key| map.get(*key))
            .find_map(|v| match v {
                Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
                Value::Object(inner) => inner
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                _ => None,
            }),
        Value::String(text) if text.len() <= MAX_TEXT_MESSAGE => Some(text.clone()),
        _ => None,
    }
}

/// The `data` member of a single-record body, or the body itself.
pub fn unwrap_data(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

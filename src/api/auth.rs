use super::{decode, ApiClient};
use crate::error::ApiError;
use crate::models::User;
use crate::state::session::{AuthBackend, AuthGrant};
use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};

/// `/auth/*` routes.
///
/// Password recovery lives on the booking backend, so it goes through a
/// separate client.
#[derive(Clone)]
pub struct AuthApi {
    client: ApiClient,
    recovery: ApiClient,
}

#[derive(Debug, Deserialize)]
struct GrantBody {
    user: Option<User>,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VerifyBody {
    user: Option<User>,
}

impl AuthApi {
    pub fn new(client: ApiClient, recovery: ApiClient) -> Self {
        Self { client, recovery }
    }

    async fn grant(&self, route: &str, email: &str, password: &str) -> Result<AuthGrant, ApiError> {
        let url = self.client.endpoint(&["auth", route])?;
        let body = json!({ "email": email, "password": password });
        let reply: GrantBody = decode(self.client.post(url, &body).await?)?;
        match (reply.user, reply.token) {
            (Some(user), Some(token)) if !token.is_empty() => Ok(AuthGrant { user, token }),
            _ => Err(ApiError::Decode(format!(
                "/auth/{} response lacks user or token",
                route
            ))),
        }
    }
}

#[async_trait]
impl AuthBackend for AuthApi {
    async fn login(&self, email: &str, password: &str) -> Result<AuthGrant, ApiError> {
        self.grant("login", email, password).await
    }

    async fn register(&self, email: &str, password: &str) -> Result<AuthGrant, ApiError> {
        self.grant("register", email, password).await
    }

    async fn verify(&self, token: &str) -> Result<User, ApiError> {
        let url = self.client.endpoint(&["auth", "verify"])?;
        let reply: VerifyBody = decode(
            self.client
                .send_as(Method::GET, url, None, Some(token))
                .await?,
        )?;
        reply
            .user
            .ok_or_else(|| ApiError::Decode("/auth/verify response lacks user".to_string()))
    }

    async fn forgot_password(&self, email: &str) -> Result<(), ApiError> {
        let url = self.recovery.endpoint(&["auth", "forgot-password"])?;
        let body: Value = json!({ "email": email });
        self.recovery.post(url, &body).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grant_body_accepts_backend_shape() {
        let reply: GrantBody = decode(json!({
            "success": true,
            "user": { "_id": "u1", "email": "jane@example.com" },
            "token": "abc"
        }))
        .unwrap();
        assert_eq!(reply.user.unwrap().id, "u1");
        assert_eq!(reply.token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_verify_body_without_user() {
        let reply: VerifyBody = decode(json!({ "success": true })).unwrap();
        assert!(reply.user.is_none());
    }
}

//! Authenticated user session.
//!
//! The session holds the signed-in user and the bearer token. The token is
//! shared with the HTTP clients through a [`SharedToken`] handle and persisted
//! through a [`TokenStore`] so a later run can hydrate it with [`AuthSession::init`].

use crate::error::ApiError;
use crate::models::User;
use crate::state::route::Route;
use crate::utils::validation::Registration;
use crate::utils::write_private_file;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::{debug, info, warn};

/// Bearer token handle shared by the session and every API client.
#[derive(Clone, Default)]
pub struct SharedToken(Arc<RwLock<Option<String>>>);

impl SharedToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<String> {
        self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn set(&self, token: impl Into<String>) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = Some(token.into());
    }

    pub fn clear(&self) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn is_set(&self) -> bool {
        self.0.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }
}

impl fmt::Debug for SharedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(token) => write!(f, "SharedToken({})", mask_token(&token)),
            None => f.write_str("SharedToken(None)"),
        }
    }
}

/// Short preview of a token for logs.
pub fn mask_token(token: &str) -> String {
    let prefix: String = token.chars().take(4).collect();
    format!("{}…({} chars)", prefix, token.chars().count())
}

/// Durable client-side storage for the bearer token.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, token: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Token kept in a single 0600 file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read token file: {:?}", self.path))?;
        let token = content.trim();
        Ok((!token.is_empty()).then(|| token.to_string()))
    }

    fn save(&self, token: &str) -> Result<()> {
        write_private_file(&self.path, token)
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove token file: {:?}", self.path))?;
        }
        Ok(())
    }
}

/// In-process token storage; clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore(Arc<Mutex<Option<String>>>);

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self(Arc::new(Mutex::new(Some(token.to_string()))))
    }

    pub fn peek(&self) -> Option<String> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.peek())
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// User and token returned by a successful login or registration.
#[derive(Debug, Clone)]
pub struct AuthGrant {
    pub user: User,
    pub token: String,
}

/// Calls against the auth backend.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<AuthGrant, ApiError>;
    async fn register(&self, email: &str, password: &str) -> Result<AuthGrant, ApiError>;
    /// Resolve the user a token belongs to
    async fn verify(&self, token: &str) -> Result<User, ApiError>;
    async fn forgot_password(&self, email: &str) -> Result<(), ApiError>;
}

/// Why a login or registration did not go through.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AuthFailure {
    pub message: String,
    /// Individual validation messages, empty for server rejections
    pub details: Vec<String>,
}

impl AuthFailure {
    fn server(err: &ApiError, fallback: &str) -> Self {
        Self {
            message: err.user_message(fallback),
            details: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Granted,
    Redirect(Route),
}

pub struct AuthSession<B: AuthBackend, T: TokenStore> {
    backend: B,
    store: T,
    token: SharedToken,
    user: Option<User>,
}

impl<B: AuthBackend, T: TokenStore> AuthSession<B, T> {
    pub fn new(backend: B, store: T, token: SharedToken) -> Self {
        Self {
            backend,
            store,
            token,
            user: None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn token(&self) -> &SharedToken {
        &self.token
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Hydrate from durable storage. A stored token is verified; a rejected
    /// one is discarded. Returns whether a user is signed in afterwards.
    pub async fn init(&mut self) -> bool {
        let stored = match self.store.load() {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Could not read stored session: {:#}", e);
                None
            }
        };
        let Some(token) = stored else {
            debug!("No stored session");
            return false;
        };

        self.token.set(token.clone());
        match self.backend.verify(&token).await {
            Ok(user) => {
                info!(token = %mask_token(&token), "Restored session for {}", user.email);
                self.user = Some(user);
                true
            }
            Err(e) => {
                warn!("Stored token rejected: {}", e);
                self.forget();
                false
            }
        }
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<&User, AuthFailure> {
        match self.backend.login(email.trim(), password).await {
            Ok(grant) => Ok(self.accept(grant)),
            Err(e) => {
                warn!("Login failed for {}: {}", email, e);
                Err(AuthFailure::server(&e, "Login failed. Please try again."))
            }
        }
    }

    /// Validate the form client side, then register.
    pub async fn register(&mut self, form: &Registration) -> Result<&User, AuthFailure> {
        let problems = form.validate();
        if let Some(first) = problems.first() {
            return Err(AuthFailure {
                message: first.clone(),
                details: problems,
            });
        }
        match self.backend.register(form.email.trim(), &form.password).await {
            Ok(grant) => Ok(self.accept(grant)),
            Err(e) => {
                warn!("Registration failed for {}: {}", form.email, e);
                Err(AuthFailure::server(&e, "Registration failed"))
            }
        }
    }

    pub async fn forgot_password(&self, email: &str) -> Result<(), ApiError> {
        self.backend.forgot_password(email.trim()).await
    }

    pub fn logout(&mut self) {
        if let Some(user) = &self.user {
            info!("Signing out {}", user.email);
        }
        self.forget();
    }

    /// Protected routes need a signed-in user.
    pub fn guard(&self, route: &Route) -> Access {
        if route.requires_auth() && !self.is_authenticated() {
            Access::Redirect(Route::Login)
        } else {
            Access::Granted
        }
    }

    fn accept(&mut self, grant: AuthGrant) -> &User {
        if let Err(e) = self.store.save(&grant.token) {
            // The session still works for this run.
            warn!("Could not persist session token: {:#}", e);
        }
        info!(token = %mask_token(&grant.token), "Signed in as {}", grant.user.email);
        self.token.set(grant.token);
        self.user.insert(grant.user)
    }

    fn forget(&mut self) {
        if let Err(e) = self.store.clear() {
            warn!("Could not remove stored session token: {:#}", e);
        }
        self.token.clear();
        self.user = None;
    }
}

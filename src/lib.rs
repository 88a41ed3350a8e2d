//! Frontdesk - terminal client for a car-wash booking service and a personal task manager
//!
//! This library provides the REST clients for both backends, the list, form
//! and session controllers that drive them, and the terminal browser built
//! on top of those controllers.

// Core modules
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod pricing;
pub mod state;
pub mod styles;
pub mod tui;
pub mod utils;
pub mod widgets;

// Re-exports for convenience
pub use api::{ApiClient, AuthApi, BookingsApi, TasksApi};
pub use config::Config;
pub use error::ApiError;
pub use state::{AuthSession, FormController, ListController};

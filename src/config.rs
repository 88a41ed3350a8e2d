use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Backend endpoints
    #[serde(default)]
    pub api: ApiConfig,
    /// Paging and interaction settings for list views
    #[serde(default)]
    pub lists: ListConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL serving `/auth/*`
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    /// Base URL serving `/tasks`
    #[serde(default = "default_tasks_url")]
    pub tasks_url: String,
    /// Base URL serving `/bookings`
    #[serde(default = "default_bookings_url")]
    pub bookings_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListConfig {
    #[serde(default = "default_bookings_page_size")]
    pub bookings_page_size: u32,
    #[serde(default = "default_tasks_page_size")]
    pub tasks_page_size: u32,
    /// Quiet period before a search edit triggers a fetch
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    /// How long a notice stays on screen
    #[serde(default = "default_notice_secs")]
    pub notice_secs: u64,
}

fn default_auth_url() -> String {
    "https://user-backend-ten.vercel.app/api".to_string()
}

fn default_tasks_url() -> String {
    "https://user-backend-eta.vercel.app/api".to_string()
}

fn default_bookings_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_bookings_page_size() -> u32 {
    8
}

fn default_tasks_page_size() -> u32 {
    10
}

fn default_search_debounce_ms() -> u64 {
    300
}

fn default_notice_secs() -> u64 {
    3
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            auth_url: default_auth_url(),
            tasks_url: default_tasks_url(),
            bookings_url: default_bookings_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            bookings_page_size: default_bookings_page_size(),
            tasks_page_size: default_tasks_page_size(),
            search_debounce_ms: default_search_debounce_ms(),
            notice_secs: default_notice_secs(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ListConfig {
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn notice_ttl(&self) -> Duration {
        Duration::from_secs(self.notice_secs)
    }
}

impl Config {
    /// Load configuration from file or create (and save) the default one
    pub fn load_or_create(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
            let config: Config =
                toml::from_str(&content).with_context(|| "Failed to parse config file")?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save(config_path)?;
            Ok(config)
        }
    }

    /// Save configuration to file with secure permissions
    pub fn save(&self, config_path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize config")?;
        crate::utils::write_private_file(config_path, &content)
    }

    /// Reject settings the clients cannot work with.
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("api.auth_url", &self.api.auth_url),
            ("api.tasks_url", &self.api.tasks_url),
            ("api.bookings_url", &self.api.bookings_url),
        ] {
            Url::parse(url).with_context(|| format!("{} is not a valid URL: {}", name, url))?;
        }
        if self.lists.bookings_page_size == 0 || self.lists.tasks_page_size == 0 {
            anyhow::bail!("Page sizes in [lists] must be greater than zero");
        }
        if self.api.timeout_secs == 0 {
            anyhow::bail!("api.timeout_secs must be greater than zero");
        }
        Ok(())
    }
}

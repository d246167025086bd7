//! Configuration management for verity using the prefer crate.

use serde::{Deserialize, Serialize};

/// Default history service location (the development server address).
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the analysis service.
    pub base_url: String,
    /// Request timeout in seconds.
    pub request_timeout: u64,
    /// User agent for HTTP requests.
    pub user_agent: String,
    /// Session cookie sent with every request (`name=value`).
    pub session_cookie: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: 30,
            user_agent: format!("verity/{}", env!("CARGO_PKG_VERSION")),
            session_cookie: None,
        }
    }
}

impl Settings {
    /// Create settings pointing at a specific service.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the session cookie.
    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the analysis service.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Request timeout in seconds.
    #[serde(default)]
    pub request_timeout: Option<u64>,
    /// User agent string.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Session cookie (`name=value`).
    #[serde(default)]
    pub session_cookie: Option<String>,
}

impl Config {
    /// Load configuration using prefer crate.
    /// Automatically discovers verity config files in standard locations.
    pub async fn load() -> Self {
        match prefer::load("verity").await {
            Ok(pref_config) => {
                let base_url: Option<String> = pref_config.get("base_url").ok();
                let request_timeout: Option<u64> = pref_config.get("request_timeout").ok();
                let user_agent: Option<String> = pref_config.get("user_agent").ok();
                let session_cookie: Option<String> =
                    pref_config.get("session_cookie").ok();

                Config {
                    base_url,
                    request_timeout,
                    user_agent,
                    session_cookie,
                }
            }
            Err(_) => {
                tracing::debug!("No verity config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref base_url) = self.base_url {
            settings.base_url = base_url.clone();
        }
        if let Some(timeout) = self.request_timeout {
            settings.request_timeout = timeout;
        }
        if let Some(ref user_agent) = self.user_agent {
            settings.user_agent = user_agent.clone();
        }
        if let Some(ref cookie) = self.session_cookie {
            settings.session_cookie = Some(cookie.clone());
        }
    }
}

/// Load settings from configuration files.
pub async fn load_settings() -> Settings {
    let config = Config::load().await;
    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings);
    settings
}

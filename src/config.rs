//! Application configuration loaded from environment variables.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Oracle Credentials ===
    /// Gemini API key. When absent the tracker runs in offline mode with
    /// placeholder snapshots.
    #[serde(default)]
    pub gemini_api_key: Option<String>,

    /// Gemini API base URL.
    #[serde(default = "default_gemini_api_url")]
    pub gemini_api_url: String,

    /// Gemini model used for score search.
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    // === Polling Parameters ===
    /// Spacing enforced after each initial-load oracle call (milliseconds).
    #[serde(default = "default_initial_spacing_ms")]
    pub initial_spacing_ms: u64,

    /// Background refresh period (seconds).
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    // === HTTP Client ===
    /// Oracle request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,

    /// Connection pool size per host.
    #[serde(default = "default_http_pool_size")]
    pub http_pool_size: usize,

    // === Server Configuration ===
    /// HTTP server port for the slip API and health/metrics endpoints.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,
}

fn default_gemini_api_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_gemini_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_initial_spacing_ms() -> u64 {
    1000
}

fn default_refresh_interval_secs() -> u64 {
    60
}

fn default_http_timeout_ms() -> u64 {
    15_000
}

fn default_http_pool_size() -> usize {
    10
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.refresh_interval_secs == 0 {
            return Err("REFRESH_INTERVAL_SECS must be at least 1".to_string());
        }

        if self.http_timeout_ms == 0 {
            return Err("HTTP_TIMEOUT_MS must be at least 1".to_string());
        }

        if self.gemini_api_url.is_empty() {
            return Err("GEMINI_API_URL must not be empty".to_string());
        }

        if let Some(key) = &self.gemini_api_key {
            if key.is_empty() {
                return Err("GEMINI_API_KEY is set but empty".to_string());
            }
        }

        Ok(())
    }

    /// Check if a score oracle is configured (offline mode otherwise).
    pub fn has_oracle(&self) -> bool {
        self.gemini_api_key.is_some()
    }

    /// Initial-load spacing as a Duration.
    pub fn initial_spacing(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.initial_spacing_ms)
    }

    /// Background refresh period as a Duration.
    pub fn refresh_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.refresh_interval_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_api_url: default_gemini_api_url(),
            gemini_model: default_gemini_model(),
            initial_spacing_ms: default_initial_spacing_ms(),
            refresh_interval_secs: default_refresh_interval_secs(),
            http_timeout_ms: default_http_timeout_ms(),
            http_pool_size: default_http_pool_size(),
            port: default_port(),
            rust_log: default_log_level(),
            verbose: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values_are_sensible() {
        assert_eq!(default_initial_spacing_ms(), 1000);
        assert_eq!(default_refresh_interval_secs(), 60);
        assert_eq!(default_port(), 8080);
        assert_eq!(default_gemini_model(), "gemini-1.5-flash");
    }

    #[test]
    fn default_config_is_offline_and_valid() {
        let config = Config::default();
        assert!(!config.has_oracle());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_refresh_interval() {
        let config = Config {
            refresh_interval_secs: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_api_key() {
        let config = Config {
            gemini_api_key: Some(String::new()),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}

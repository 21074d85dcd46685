//! Service configuration
//!
//! Values are layered: built-in defaults, an optional `config.toml`,
//! `DASHBOARD__SECTION__KEY` environment variables and finally the
//! legacy `LM_STUDIO_URL` / `LM_STUDIO_MODEL` / `INJECT_SYNTHETIC_DATA`
//! variables the frontend tooling already sets.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::Result;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub assistant: AssistantConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub google: GoogleConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from `config.toml` (or `$DASHBOARD_CONFIG`) and the environment
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let file = std::env::var("DASHBOARD_CONFIG").unwrap_or_else(|_| "config".to_string());
        Self::from_file(&file)
    }

    /// Load configuration from a specific file (extension optional) plus the environment
    pub fn from_file(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("DASHBOARD").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        Ok(config.from_env())
    }

    /// Apply the legacy environment overrides
    pub fn from_env(mut self) -> Self {
        if let Ok(val) = std::env::var("LM_STUDIO_URL") {
            self.assistant.base_url = val;
        }

        if let Ok(val) = std::env::var("LM_STUDIO_MODEL") {
            self.assistant.model = val;
        }

        if let Ok(val) = std::env::var("INJECT_SYNTHETIC_DATA") {
            self.data.inject_synthetic = parse_flag(&val);
        }

        self
    }
}

/// Truthy strings accepted for boolean toggles
pub fn parse_flag(value: &str) -> bool {
    let v = value.trim().to_ascii_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed by CORS (the dashboard frontend)
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8000 }
fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://127.0.0.1:3000".to_string(),
    ]
}
fn default_max_body_bytes() -> usize { 64 * 1024 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Local completion service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// OpenAI-compatible base URL, including the `/v1` suffix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Timeout for the health probe
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_base_url() -> String { "http://localhost:1234/v1".to_string() }
fn default_model() -> String { "qwen2.5-7b-instruct-1m".to_string() }
fn default_timeout_secs() -> u64 { 60 }
fn default_probe_timeout_secs() -> u64 { 3 }
fn default_temperature() -> f32 { 0.7 }
fn default_max_tokens() -> u32 { 300 }

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            probe_timeout_secs: default_probe_timeout_secs(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl AssistantConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

/// Per-identity data storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Merge the selected fixture bundle's canned records into every snapshot
    #[serde(default)]
    pub inject_synthetic: bool,
}

fn default_data_dir() -> PathBuf { PathBuf::from("data") }

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            inject_synthetic: false,
        }
    }
}

/// Google Calendar / Gmail collaborator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    /// OAuth client file downloaded from the Google Cloud Console
    #[serde(default = "default_credentials_path")]
    pub credentials_path: PathBuf,

    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,

    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    #[serde(default = "default_token_url")]
    pub token_url: String,

    #[serde(default = "default_calendar_api")]
    pub calendar_api: String,

    #[serde(default = "default_gmail_api")]
    pub gmail_api: String,

    #[serde(default = "default_calendar_days_back")]
    pub calendar_days_back: i64,

    #[serde(default = "default_calendar_days_forward")]
    pub calendar_days_forward: i64,

    #[serde(default = "default_calendar_max_results")]
    pub calendar_max_results: u32,

    #[serde(default = "default_gmail_max_results")]
    pub gmail_max_results: u32,

    #[serde(default = "default_gmail_days_back")]
    pub gmail_days_back: i64,

    #[serde(default = "default_google_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_credentials_path() -> PathBuf { PathBuf::from("credentials.json") }
fn default_redirect_uri() -> String { "http://localhost:8000/api/google/callback".to_string() }
fn default_auth_url() -> String { "https://accounts.google.com/o/oauth2/v2/auth".to_string() }
fn default_token_url() -> String { "https://oauth2.googleapis.com/token".to_string() }
fn default_calendar_api() -> String { "https://www.googleapis.com/calendar/v3".to_string() }
fn default_gmail_api() -> String { "https://gmail.googleapis.com/gmail/v1".to_string() }
fn default_calendar_days_back() -> i64 { 7 }
fn default_calendar_days_forward() -> i64 { 14 }
fn default_calendar_max_results() -> u32 { 100 }
fn default_gmail_max_results() -> u32 { 50 }
fn default_gmail_days_back() -> i64 { 7 }
fn default_google_timeout_secs() -> u64 { 30 }

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            credentials_path: default_credentials_path(),
            redirect_uri: default_redirect_uri(),
            auth_url: default_auth_url(),
            token_url: default_token_url(),
            calendar_api: default_calendar_api(),
            gmail_api: default_gmail_api(),
            calendar_days_back: default_calendar_days_back(),
            calendar_days_forward: default_calendar_days_forward(),
            calendar_max_results: default_calendar_max_results(),
            gmail_max_results: default_gmail_max_results(),
            gmail_days_back: default_gmail_days_back(),
            timeout_secs: default_google_timeout_secs(),
        }
    }
}

impl GoogleConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,

    /// `pretty` or `json`
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_level() -> String { "info".to_string() }
fn default_format() -> String { "pretty".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.assistant.base_url, "http://localhost:1234/v1");
        assert_eq!(config.assistant.model, "qwen2.5-7b-instruct-1m");
        assert_eq!(config.assistant.timeout(), Duration::from_secs(60));
        assert!(!config.data.inject_synthetic);
        assert_eq!(config.google.gmail_max_results, 50);
        assert_eq!(config.server.cors_origins.len(), 2);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(parse_flag(" YES "));
        assert!(parse_flag("on"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_config_from_env() {
        std::env::set_var("LM_STUDIO_URL", "http://10.0.0.5:1234/v1");
        std::env::set_var("LM_STUDIO_MODEL", "llama-3-8b");
        std::env::set_var("INJECT_SYNTHETIC_DATA", "1");

        let config = Config::default().from_env();

        assert_eq!(config.assistant.base_url, "http://10.0.0.5:1234/v1");
        assert_eq!(config.assistant.model, "llama-3-8b");
        assert!(config.data.inject_synthetic);

        // Cleanup
        std::env::remove_var("LM_STUDIO_URL");
        std::env::remove_var("LM_STUDIO_MODEL");
        std::env::remove_var("INJECT_SYNTHETIC_DATA");
    }

    #[test]
    fn test_bind_address() {
        let server = ServerConfig::default();
        assert_eq!(server.bind_address(), "0.0.0.0:8000");
    }
}

//! Configuration module for the IoT lock client.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;

use crate::models::DevicePlatform;

/// Backend used when `IOTLOCK_API_BASE_URL` is not set.
pub const DEFAULT_API_BASE_URL: &str = "https://iot-lock-backend.onrender.com";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the lock backend, without a trailing slash
    pub api_base_url: String,
    /// API key for the enrollment endpoints (upload, visitor creation)
    pub api_key: Option<String>,
    /// Path to the SQLite file holding the persisted session
    pub session_db_path: PathBuf,
    /// Platform reported when registering a push token
    pub platform: DevicePlatform,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_base_url = normalize_base_url(
            &env::var("IOTLOCK_API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
        );

        let api_key = env::var("IOTLOCK_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        let session_db_path = env::var("IOTLOCK_SESSION_DB")
            .unwrap_or_else(|_| "./data/session.sqlite".to_string())
            .into();

        let platform = match env::var("IOTLOCK_PLATFORM") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!("Unknown IOTLOCK_PLATFORM {:?}, using android", raw);
                DevicePlatform::Android
            }),
            Err(_) => DevicePlatform::Android,
        };

        let log_level = env::var("IOTLOCK_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_format = match env::var("IOTLOCK_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Self {
            api_base_url,
            api_key,
            session_db_path,
            platform,
            log_level,
            log_format,
        }
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        env::remove_var("IOTLOCK_API_BASE_URL");
        env::remove_var("IOTLOCK_API_KEY");
        env::remove_var("IOTLOCK_SESSION_DB");
        env::remove_var("IOTLOCK_PLATFORM");
        env::remove_var("IOTLOCK_LOG_LEVEL");
        env::remove_var("IOTLOCK_LOG_FORMAT");

        let config = Config::from_env();

        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert!(config.api_key.is_none());
        assert_eq!(
            config.session_db_path,
            PathBuf::from("./data/session.sqlite")
        );
        assert_eq!(config.platform, DevicePlatform::Android);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        assert_eq!(
            normalize_base_url(" http://10.0.0.2:8000/ "),
            "http://10.0.0.2:8000"
        );
    }
}

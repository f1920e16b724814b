use std::net::SocketAddr;
use std::path::PathBuf;

use crate::triage::TriageConfig;

/// Application-level constants
pub const APP_NAME: &str = "Radassist";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the application data directory (~/Radassist/ on all platforms)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Radassist")
}

/// Directory for stored uploaded report files
pub fn uploads_dir() -> PathBuf {
    app_data_dir().join("uploads")
}

/// Default database path
pub fn default_db_path() -> PathBuf {
    app_data_dir().join("radassist.db")
}

pub fn default_log_filter() -> &'static str {
    "radassist=info,tower_http=info"
}

/// Runtime configuration, resolved from the environment once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub db_path: PathBuf,
    pub uploads_dir: PathBuf,
    /// Set the Secure attribute on session cookies (behind TLS).
    pub cookie_secure: bool,
    /// Base URL of the external segmentation inference service.
    pub segmentation_url: String,
    /// Base URL of the LLM service used for report comparison.
    pub llm_url: String,
    /// Model name requested from the LLM service.
    pub llm_model: String,
    /// Request timeout for external service calls, in seconds.
    pub service_timeout_secs: u64,
    pub triage: TriageConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: ([127, 0, 0, 1], 5000).into(),
            db_path: default_db_path(),
            uploads_dir: uploads_dir(),
            cookie_secure: false,
            segmentation_url: "http://localhost:8500".into(),
            llm_url: "http://localhost:11434".into(),
            llm_model: "llama3.2".into(),
            service_timeout_secs: 120,
            triage: TriageConfig::default(),
        }
    }
}

impl AppConfig {
    /// Resolve configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: std::env::var("BIND_ADDR")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.bind_addr),
            db_path: std::env::var("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            uploads_dir: std::env::var("UPLOAD_FOLDER")
                .map(PathBuf::from)
                .unwrap_or(defaults.uploads_dir),
            cookie_secure: std::env::var("COOKIE_SECURE")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.cookie_secure),
            segmentation_url: std::env::var("SEGMENTATION_URL").unwrap_or(defaults.segmentation_url),
            llm_url: std::env::var("LLM_URL").unwrap_or(defaults.llm_url),
            llm_model: std::env::var("LLM_MODEL").unwrap_or(defaults.llm_model),
            service_timeout_secs: std::env::var("SERVICE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.service_timeout_secs),
            triage: defaults.triage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("Radassist"));
    }

    #[test]
    fn uploads_dir_under_app_data() {
        assert!(uploads_dir().starts_with(app_data_dir()));
    }

    #[test]
    fn defaults_are_local() {
        let config = AppConfig::default();
        assert_eq!(config.bind_addr.port(), 5000);
        assert!(!config.cookie_secure);
        assert_eq!(config.triage.elderly_age, 65);
    }
}

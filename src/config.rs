//! Command-line and environment configuration

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::constants::{API_BASE_URL_ENV, APP_NAME, DEFAULT_LOG_FILE};

/// Browse an OpenAPI document in the terminal and try its endpoints
#[derive(Parser, Debug, Clone)]
#[command(name = APP_NAME, version, about, long_about = None)]
pub struct Config {
    /// OpenAPI document (JSON or YAML)
    pub document: PathBuf,

    /// Endpoint to open on startup, e.g. `get-users-{id}`
    #[arg(short, long, value_name = "TOKEN")]
    pub endpoint: Option<String>,

    /// API base URL used when the document declares no server
    #[arg(long, env = API_BASE_URL_ENV, value_name = "URL")]
    pub base_url: Option<String>,

    /// Give up on a test request after this many seconds (waits forever when unset)
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Where tracing output is written
    #[arg(long, default_value = DEFAULT_LOG_FILE, value_name = "PATH")]
    pub log_file: PathBuf,
}

impl Config {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Settings the app layer needs, detached from the CLI surface
    pub fn app_settings(&self) -> AppSettings {
        AppSettings {
            configured_base_url: self.base_url.clone().filter(|u| !u.trim().is_empty()),
            initial_fragment: self.endpoint.clone(),
        }
    }
}

/// Runtime settings handed to the app actor
#[derive(Debug, Clone, Default)]
pub struct AppSettings {
    /// Externally configured API base (`--base-url` / `API_BASE_URL`)
    pub configured_base_url: Option<String>,
    /// Deep link attempted once on startup
    pub initial_fragment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_args() {
        let config = Config::try_parse_from(["apidoc", "openapi.json"]).unwrap();
        assert_eq!(config.document, PathBuf::from("openapi.json"));
        assert_eq!(config.log_file, PathBuf::from(DEFAULT_LOG_FILE));
        assert!(config.request_timeout().is_none());
    }

    #[test]
    fn test_parse_deep_link_and_timeout() {
        let config = Config::try_parse_from([
            "apidoc",
            "api.yaml",
            "--endpoint",
            "get-users-{id}",
            "--timeout-secs",
            "5",
            "--base-url",
            "https://api.example.com",
        ])
        .unwrap();

        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
        let settings = config.app_settings();
        assert_eq!(settings.initial_fragment.as_deref(), Some("get-users-{id}"));
        assert_eq!(settings.configured_base_url.as_deref(), Some("https://api.example.com"));
    }

    #[test]
    fn test_blank_base_url_is_ignored() {
        let config =
            Config::try_parse_from(["apidoc", "api.json", "--base-url", "  "]).unwrap();
        assert!(config.app_settings().configured_base_url.is_none());
    }
}

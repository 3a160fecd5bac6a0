//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Base URL used when neither the document nor the environment provides one
pub const FALLBACK_BASE_URL: &str = "http://localhost:3000";

/// Environment variable consulted for the API base URL
pub const API_BASE_URL_ENV: &str = "API_BASE_URL";

/// Default log file (the terminal is in raw mode, so logs never go to stdout)
pub const DEFAULT_LOG_FILE: &str = "apidoc.log";

/// Content type seeded into every request draft
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Application name
pub const APP_NAME: &str = "apidoc";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

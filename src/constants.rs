//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Default base URL of the finance tracker API
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Environment variable that overrides the API base URL
pub const API_URL_ENV: &str = "TALLY_API_URL";

/// File name of the persisted bearer token inside the config directory
pub const TOKEN_FILE: &str = "token";

/// Config directory name under the user's home
pub const CONFIG_DIR: &str = ".tally";

/// Application name
#[allow(dead_code)]
pub const APP_NAME: &str = "Tally TUI";

/// Application version
#[allow(dead_code)]
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

//! Environment-driven configuration
//!
//! Every setting has a development default so the server boots without
//! any environment at all. Production deployments override these.

use std::path::PathBuf;

pub fn data_dir() -> PathBuf {
    std::env::var("SD_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(".sd-data"))
}

pub fn port() -> u16 {
    std::env::var("SD_PORT")
        .ok()
        .and_then(|raw| raw.parse::<u16>().ok())
        .unwrap_or(3001)
}

pub fn jwt_secret() -> String {
    std::env::var("SD_JWT_SECRET").unwrap_or_else(|_| "dev-jwt-secret-change-me".to_string())
}

pub fn encryption_key() -> String {
    std::env::var("SD_ENCRYPTION_KEY").unwrap_or_else(|_| "default-key".to_string())
}

/// True when running under `SD_ENV=production`; toggles the secure
/// flag on the session cookie.
pub fn is_production() -> bool {
    std::env::var("SD_ENV")
        .map(|value| value.eq_ignore_ascii_case("production"))
        .unwrap_or(false)
}

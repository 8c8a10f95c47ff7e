use chrono::NaiveDate;

use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid. Every variable
/// has a default, so a bare environment is a valid one.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup
/// function. Decoupled from the real environment so tests can drive it
/// with a plain closure instead of `set_var`/`remove_var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    // The original deployment listened on 9622; keep that default.
    let bind_addr = parse_addr("PLAYCRAWL_BIND_ADDR", "0.0.0.0:9622")?;
    let log_level = or_default("PLAYCRAWL_LOG_LEVEL", "info");
    let base_url = or_default("PLAYCRAWL_BASE_URL", "https://play.google.com");
    let request_timeout_secs = parse_u64("PLAYCRAWL_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("PLAYCRAWL_USER_AGENT", "playcrawl/0.1 (app-page-crawler)");

    let capture_date = match lookup("PLAYCRAWL_CAPTURE_DATE") {
        Ok(raw) => Some(
            NaiveDate::parse_from_str(&raw, "%Y%m%d").map_err(|e| ConfigError::InvalidEnvVar {
                var: "PLAYCRAWL_CAPTURE_DATE".to_string(),
                reason: e.to_string(),
            })?,
        ),
        Err(_) => None,
    };

    Ok(AppConfig {
        bind_addr,
        log_level,
        base_url,
        request_timeout_secs,
        user_agent,
        capture_date,
    })
}

use std::net::SocketAddr;

use chrono::NaiveDate;

/// Process-wide configuration, read from the environment at startup and
/// passed down explicitly — the crawler itself holds no global state.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Storefront root, e.g. `https://play.google.com`. Overridable so
    /// tests can point the crawler at a local mock server.
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Fixed capture date for deterministic runs; `None` means "today".
    pub capture_date: Option<NaiveDate>,
}

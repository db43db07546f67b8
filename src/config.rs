//! Configuration module for irdash.
//!
//! Loads configuration from environment variables with sensible defaults.

use std::env;

/// Dashboard configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// HTTP port for the local web bridge (default: 8080)
    pub http_port: u16,
    /// Base URL of the event backend (default: "http://localhost:3000")
    pub api_base_url: String,
    /// `limit` sent with list and detail requests (default: 50)
    pub list_limit: u32,
    /// `limit` sent with each overview request (default: 50)
    pub overview_limit: u32,
    /// Discard completions from superseded loads (default: false)
    pub guard_stale_responses: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            http_port: 8080,
            api_base_url: "http://localhost:3000".to_string(),
            list_limit: 50,
            overview_limit: 50,
            guard_stale_responses: false,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `IRDASH_HTTP_PORT`: HTTP port (default: 8080)
    /// - `IRDASH_API_BASE_URL`: backend base URL (default: "http://localhost:3000")
    /// - `IRDASH_LIST_LIMIT`: list fetch limit (default: 50)
    /// - `IRDASH_OVERVIEW_LIMIT`: overview fetch limit (default: 50)
    /// - `IRDASH_GUARD_STALE`: "true"/"1" to discard stale completions (default: false)
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(port) = lookup("IRDASH_HTTP_PORT").and_then(|s| s.parse().ok()) {
            cfg.http_port = port;
        }

        if let Some(url) = lookup("IRDASH_API_BASE_URL").filter(|s| !s.trim().is_empty()) {
            cfg.api_base_url = url.trim().to_string();
        }

        if let Some(limit) = lookup("IRDASH_LIST_LIMIT").and_then(|s| s.parse().ok()) {
            cfg.list_limit = limit;
        }

        if let Some(limit) = lookup("IRDASH_OVERVIEW_LIMIT").and_then(|s| s.parse().ok()) {
            cfg.overview_limit = limit;
        }

        if let Some(flag) = lookup("IRDASH_GUARD_STALE") {
            cfg.guard_stale_responses = matches!(flag.trim(), "1" | "true" | "yes");
        }

        cfg
    }
}

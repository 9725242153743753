use std::env;

use anyhow::Result;

use crate::booru::client::DEFAULT_TIMEOUT_SECS;

/// Central configuration loaded from environment variables.
///
/// Credentials come from env vars (never hardcoded). The .env file is
/// loaded at binary startup via dotenvy.
pub struct Config {
    /// Base URL of the booru instance, e.g. https://gelbooru.com
    pub base_url: String,
    /// Optional credential pair. The API wants both or neither; a half-
    /// configured pair is treated as absent.
    pub api_key: Option<String>,
    pub api_user_id: Option<String>,
    pub db_path: String,
    pub http_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables. Only the base URL
    /// is required, and only for commands that actually hit the API.
    pub fn load() -> Result<Self> {
        let http_timeout_secs = env::var("SEPIA_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            base_url: env::var("BOORU_BASE_URL").unwrap_or_default(),
            api_key: env::var("BOORU_API_KEY").ok().filter(|v| !v.is_empty()),
            api_user_id: env::var("BOORU_USER_ID").ok().filter(|v| !v.is_empty()),
            db_path: env::var("SEPIA_DB_PATH").unwrap_or_else(|_| "./sepia.db".to_string()),
            http_timeout_secs,
        })
    }

    /// Check that the booru base URL is configured.
    /// Call this before any operation that talks to the API.
    pub fn require_base_url(&self) -> Result<()> {
        if self.base_url.is_empty() {
            anyhow::bail!(
                "BOORU_BASE_URL not set. Add it to your .env file, e.g.\n\
                 BOORU_BASE_URL=https://gelbooru.com"
            );
        }
        Ok(())
    }
}

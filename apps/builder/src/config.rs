use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend serving PDF generation, extraction, analysis and saves.
    pub backend_url: String,
    /// Identity used to tag the local cache. Unset means an anonymous session.
    pub session_owner: Option<String>,
    pub cache_dir: PathBuf,
    pub download_dir: PathBuf,
    pub port: u16,
    pub rust_log: String,
    pub save_debounce: Duration,
    pub autosave_interval: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let backend_url = lookup("BACKEND_URL")
            .filter(|v| !v.trim().is_empty())
            .context("Required environment variable 'BACKEND_URL' is not set")?;

        Ok(Config {
            backend_url,
            session_owner: lookup("SESSION_OWNER").filter(|v| !v.trim().is_empty()),
            cache_dir: lookup("CACHE_DIR")
                .unwrap_or_else(|| ".resume-cache".to_string())
                .into(),
            download_dir: lookup("DOWNLOAD_DIR")
                .unwrap_or_else(|| ".".to_string())
                .into(),
            port: lookup("PORT")
                .unwrap_or_else(|| "8090".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            save_debounce: Duration::from_millis(
                lookup("SAVE_DEBOUNCE_MS")
                    .unwrap_or_else(|| "2000".to_string())
                    .parse::<u64>()
                    .context("SAVE_DEBOUNCE_MS must be a whole number of milliseconds")?,
            ),
            autosave_interval: Duration::from_secs(
                lookup("AUTOSAVE_INTERVAL_SECS")
                    .unwrap_or_else(|| "10".to_string())
                    .parse::<u64>()
                    .context("AUTOSAVE_INTERVAL_SECS must be a whole number of seconds")?,
            ),
        })
    }
}

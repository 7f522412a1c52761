// src/config/app.rs
use anyhow::{bail, Result};
use std::{env, path::PathBuf, time::Duration};

use crate::dedup::DEFAULT_MAX_BATCH;
use crate::store::DEFAULT_SEEN_PATH;

fn default_timeout_secs() -> u64 {
    20
}

pub const DEFAULT_APP_NAME: &str = "binance-alerts";

/// Runtime settings, read from the environment (after `.env` is loaded).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub tg_token: String,
    pub tg_chat_id: String,
    pub seen_path: PathBuf,
    pub max_batch: usize,
    pub http_timeout: Duration,
    /// Label used in the status and batch messages.
    pub app_name: String,
}

impl AppConfig {
    /// Fails only when the Telegram credential pair is missing; everything
    /// else falls back to defaults.
    pub fn from_env() -> Result<Self> {
        let tg_token = env_trimmed("TELEGRAM_BOT_TOKEN").unwrap_or_default();
        let tg_chat_id = env_trimmed("TELEGRAM_CHAT_ID").unwrap_or_default();
        if tg_token.is_empty() || tg_chat_id.is_empty() {
            bail!("Missing TELEGRAM_BOT_TOKEN / TELEGRAM_CHAT_ID in environment or .env");
        }

        let seen_path = env_trimmed("SEEN_STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SEEN_PATH));

        // Sanitize numbers: unparsable or zero means default
        let max_batch = env_trimmed("MAX_BATCH")
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|n| *n >= 1)
            .unwrap_or(DEFAULT_MAX_BATCH);
        let timeout_secs = env_trimmed("HTTP_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|n| *n >= 1)
            .unwrap_or_else(default_timeout_secs);

        let app_name =
            env_trimmed("APP_NAME").unwrap_or_else(|| DEFAULT_APP_NAME.to_string());

        Ok(Self {
            tg_token,
            tg_chat_id,
            seen_path,
            max_batch,
            http_timeout: Duration::from_secs(timeout_secs),
            app_name,
        })
    }
}

fn env_trimmed(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

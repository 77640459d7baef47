// src/config.rs

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{env, fs, path::Path};
use tracing::{debug, info};

const QUESTION_SHEET_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vQw9qbxyj6z7z88VGTMXOtXMFU09MuE3U7ekxOToeA9axoovVZLHrJMEIQcz30rWHqLUVlToyOYvQBl/pub?gid=239825276&single=true&output=csv";
const IMAGE_SHEET_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vQw9qbxyj6z7z88VGTMXOtXMFU09MuE3U7ekxOToeA9axoovVZLHrJMEIQcz30rWHqLUVlToyOYvQBl/pub?gid=1006383495&single=true&output=csv";

pub const CONFIG_ENV: &str = "BANQUET_CONFIG";
pub const QUESTION_URL_ENV: &str = "BANQUET_QUESTION_URL";
pub const IMAGE_URL_ENV: &str = "BANQUET_IMAGE_URL";
pub const MAX_RETRIES_ENV: &str = "BANQUET_MAX_RETRIES";

/// Where the sheets live and how hard to try fetching them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub question_sheet_url: String,
    pub image_sheet_url: String,
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    /// Upper bound for a single retry delay.
    pub max_backoff_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            question_sheet_url: QUESTION_SHEET_URL.to_string(),
            image_sheet_url: IMAGE_SHEET_URL.to_string(),
            max_retries: 3,
            initial_backoff_ms: 500,
            max_backoff_ms: 10_000,
            request_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Defaults, then the YAML file named by `BANQUET_CONFIG`, then env overrides.
    pub fn load() -> Result<Self> {
        let mut cfg = match env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        cfg.apply_env()?;
        info!(
            question = %cfg.question_sheet_url,
            images = %cfg.image_sheet_url,
            retries = cfg.max_retries,
            "config loaded"
        );
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let cfg: Config = serde_yaml::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        debug!(path = %path.display(), "read config file");
        Ok(cfg)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(url) = env::var(QUESTION_URL_ENV) {
            self.question_sheet_url = url;
        }
        if let Ok(url) = env::var(IMAGE_URL_ENV) {
            self.image_sheet_url = url;
        }
        if let Ok(n) = env::var(MAX_RETRIES_ENV) {
            self.max_retries = n
                .trim()
                .parse()
                .with_context(|| format!("{} must be an integer, got {:?}", MAX_RETRIES_ENV, n))?;
        }
        Ok(())
    }
}

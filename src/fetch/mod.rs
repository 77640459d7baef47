// src/fetch/mod.rs

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::config::Config;

/// Raw CSV text of both published sheets, fetched in the same pass.
#[derive(Debug, Clone)]
pub struct Sheets {
    pub questions: String,
    pub images: String,
}

/// How often and how patiently a sheet download is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            max_retries: cfg.max_retries,
            initial_backoff: Duration::from_millis(cfg.initial_backoff_ms),
            max_backoff: Duration::from_millis(cfg.max_backoff_ms),
        }
    }

    /// Delay before retry number `attempt` (1-based): doubles each time,
    /// never above `max_backoff`.
    pub fn delay(&self, attempt: u32) -> Duration {
        2u32.checked_pow(attempt.saturating_sub(1))
            .and_then(|factor| self.initial_backoff.checked_mul(factor))
            .map_or(self.max_backoff, |d| d.min(self.max_backoff))
    }
}

pub fn build_client(cfg: &Config) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(cfg.request_timeout_secs))
        .build()
        .context("building HTTP client")
}

/// Append a `t=<millis>` query parameter so caches in front of the published
/// sheet never serve a stale export.
pub fn cache_busted(url: &str, millis: i64) -> Result<Url> {
    let mut url = Url::parse(url).with_context(|| format!("parsing sheet URL {}", url))?;
    url.query_pairs_mut().append_pair("t", &millis.to_string());
    Ok(url)
}

async fn download_csv(client: &Client, sheet: &str, url: &Url) -> Result<String> {
    debug!(sheet, %url, "downloading sheet");
    let resp = client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("GET {} sheet", sheet))?
        .error_for_status()
        .with_context(|| format!("{} sheet answered with an error status", sheet))?;
    resp.text()
        .await
        .with_context(|| format!("reading {} sheet body", sheet))
}

async fn download_with_retry(
    client: &Client,
    sheet: &str,
    url: &Url,
    policy: &RetryPolicy,
) -> Result<String> {
    let mut attempt = 0;
    loop {
        match download_csv(client, sheet, url).await {
            Ok(text) => return Ok(text),
            Err(e) if attempt < policy.max_retries => {
                attempt += 1;
                let delay = policy.delay(attempt);
                warn!(sheet, attempt, delay_ms = delay.as_millis() as u64, error = %e, "sheet download failed, retrying");
                sleep(delay).await;
            }
            Err(e) => {
                error!(sheet, attempts = attempt + 1, error = %e, "giving up on sheet");
                return Err(e);
            }
        }
    }
}

/// Download one sheet with a fresh cache-buster, retrying per `policy`.
pub async fn fetch_sheet(
    client: &Client,
    policy: &RetryPolicy,
    sheet: &str,
    sheet_url: &str,
) -> Result<String> {
    let url = cache_busted(sheet_url, Utc::now().timestamp_millis())?;
    download_with_retry(client, sheet, &url, policy).await
}

/// Download both sheets concurrently. Either failure fails the whole fetch.
#[instrument(level = "info", skip(client, cfg))]
pub async fn fetch_sheets(client: &Client, cfg: &Config) -> Result<Sheets> {
    let policy = RetryPolicy::from_config(cfg);
    let (questions, images) = futures::try_join!(
        async {
            fetch_sheet(client, &policy, "question", &cfg.question_sheet_url)
                .await
                .context("fetching question sheet")
        },
        async {
            fetch_sheet(client, &policy, "image", &cfg.image_sheet_url)
                .await
                .context("fetching image sheet")
        },
    )?;
    info!(
        question_bytes = questions.len(),
        image_bytes = images.len(),
        "sheets fetched"
    );
    Ok(Sheets { questions, images })
}

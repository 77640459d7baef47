use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info};

use super::Guide;
use crate::config::Config;
use crate::fetch::{self, Sheets};
use crate::images::ImageIndex;
use crate::process::build_guide_from_csv;

/// Everything one successful refresh produced.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub guide: Guide,
    pub images: ImageIndex,
    pub refreshed_at: DateTime<Utc>,
    pub generation: u64,
}

impl Snapshot {
    /// Parse both sheets. Nothing is returned unless both parse.
    pub fn from_sheets(sheets: &Sheets, generation: u64) -> Result<Self> {
        let images = ImageIndex::from_csv(&sheets.images)?;
        let guide = build_guide_from_csv(&sheets.questions)?;
        Ok(Self {
            guide,
            images,
            refreshed_at: Utc::now(),
            generation,
        })
    }
}

/// Holds the latest published guide and serializes refreshes.
///
/// A refresh requested while another is running waits for it, so completed
/// passes are published in request order. A failed refresh keeps the
/// previous snapshot.
pub struct GuideStore {
    client: Client,
    config: Config,
    refresh_lock: Mutex<()>,
    current: RwLock<Option<Arc<Snapshot>>>,
    generation: AtomicU64,
}

impl GuideStore {
    pub fn new(config: Config) -> Result<Self> {
        let client = fetch::build_client(&config)?;
        Ok(Self {
            client,
            config,
            refresh_lock: Mutex::new(()),
            current: RwLock::new(None),
            generation: AtomicU64::new(0),
        })
    }

    pub async fn current(&self) -> Option<Arc<Snapshot>> {
        self.current.read().await.clone()
    }

    /// Fetch both sheets, rebuild from scratch, and publish the result.
    pub async fn refresh(&self) -> Result<Arc<Snapshot>> {
        let _guard = self.refresh_lock.lock().await;
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let built = async {
            let sheets = fetch::fetch_sheets(&self.client, &self.config).await?;
            Snapshot::from_sheets(&sheets, generation)
        }
        .await
        .with_context(|| format!("refresh #{} failed", generation));

        match built {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                *self.current.write().await = Some(Arc::clone(&snapshot));
                info!(
                    generation,
                    records = snapshot.guide.records().len(),
                    characters = snapshot
                        .guide
                        .categories()
                        .values()
                        .map(Vec::len)
                        .sum::<usize>(),
                    "published guide"
                );
                Ok(snapshot)
            }
            Err(e) => {
                let reason = format!("{:#}", e);
                error!(generation, error = %reason, "keeping previous guide");
                Err(e)
            }
        }
    }
}

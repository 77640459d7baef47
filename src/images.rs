use anyhow::{Context, Result};
use std::collections::HashMap;
use tracing::debug;

use crate::process::{parse_rows, RawRow};

/// Character name → portrait link, from the image sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageIndex {
    links: HashMap<String, String>,
}

impl ImageIndex {
    /// Every row counts, the first one included; later rows win.
    pub fn from_rows(rows: &[RawRow]) -> Self {
        let links = rows
            .iter()
            .filter_map(|row| Some((row.cell(0)?.to_string(), row.cell(1)?.to_string())))
            .collect();
        Self { links }
    }

    pub fn from_csv(text: &str) -> Result<Self> {
        let rows = parse_rows(text).context("parsing image sheet")?;
        let index = Self::from_rows(&rows);
        debug!(images = index.len(), "image index built");
        Ok(index)
    }

    /// Link for `name`; `None` means the caller shows a placeholder.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.links.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

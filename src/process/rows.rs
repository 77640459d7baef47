use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::io::Cursor;
use tracing::{debug, trace};

/// One line of the exported sheet, cells untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    cells: Vec<String>,
}

impl RawRow {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    /// Number of physical cells, including empty ones.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Trimmed value of cell `idx`, or `None` when the cell is absent or blank.
    pub fn cell(&self, idx: usize) -> Option<&str> {
        self.cells
            .get(idx)
            .map(|s| trim_cell(s))
            .filter(|s| !s.is_empty())
    }

    fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| trim_cell(c).is_empty())
    }
}

/// Strip surrounding whitespace and byte-order marks; sheet exports sometimes
/// carry a U+FEFF that `str::trim` leaves in place.
fn trim_cell(cell: &str) -> &str {
    cell.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

impl<S: Into<String>> FromIterator<S> for RawRow {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// Split exported CSV text into rows.
///
/// Rows may be ragged. Lines whose cells are all blank are dropped here, so
/// they never count as the header row downstream.
pub fn parse_rows(text: &str) -> Result<Vec<RawRow>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(Cursor::new(text.as_bytes()));

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for (idx, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("CSV parse error at record {}", idx))?;
        let row: RawRow = record.iter().collect();
        if row.is_blank() {
            trace!(record = idx, "skipping blank line");
            skipped += 1;
            continue;
        }
        rows.push(row);
    }

    debug!(rows = rows.len(), skipped, "parsed CSV rows");
    Ok(rows)
}

use serde::Serialize;

use super::rows::RawRow;

/// Column positions in the question sheet export.
pub mod column {
    pub const CHARACTER: usize = 0;
    pub const QUESTION: usize = 1;
    pub const ANSWER: usize = 2;
    pub const SCORE: usize = 3;
    pub const CATEGORY: usize = 4;
}

/// Category used until the sheet names one.
pub const DEFAULT_CATEGORY: &str = "기타";

/// Rows with fewer physical cells than this are skipped.
pub const MIN_CELLS: usize = 2;

/// Forward-filled values of the merged-cell columns.
///
/// A field only changes when a row supplies a non-blank value for its column,
/// so once set it never goes back to empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CarryForward {
    pub character: String,
    pub category: String,
    pub question: String,
}

impl Default for CarryForward {
    fn default() -> Self {
        Self {
            character: String::new(),
            category: DEFAULT_CATEGORY.to_string(),
            question: String::new(),
        }
    }
}

impl CarryForward {
    /// Fold one data row into the state. Returns `false` (leaving the state
    /// untouched) when the row is structurally invalid.
    pub fn advance(&mut self, row: &RawRow) -> bool {
        if row.len() < MIN_CELLS {
            return false;
        }
        fill(&mut self.character, row.cell(column::CHARACTER));
        fill(&mut self.category, row.cell(column::CATEGORY));
        fill(&mut self.question, row.cell(column::QUESTION));
        true
    }
}

fn fill(slot: &mut String, value: Option<&str>) {
    if let Some(v) = value {
        if slot.as_str() != v {
            *slot = v.to_string();
        }
    }
}

/// A data row together with the effective state after it was folded in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconstructedRow<'a> {
    /// Position in the source sequence (the header is 0).
    pub position: usize,
    pub state: CarryForward,
    pub row: &'a RawRow,
}

/// Walk every data row in order and report the effective carried values.
///
/// The first row is the header and never touches the state; invalid rows are
/// left out of the result.
pub fn reconstruct(rows: &[RawRow]) -> Vec<ReconstructedRow<'_>> {
    let mut state = CarryForward::default();
    rows.iter()
        .enumerate()
        .skip(1)
        .filter_map(|(position, row)| {
            state.advance(row).then(|| ReconstructedRow {
                position,
                state: state.clone(),
                row,
            })
        })
        .collect()
}

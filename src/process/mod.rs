// src/process/mod.rs
pub mod groups;
pub mod project;
pub mod reconstruct;
pub mod rows;

use anyhow::{Context, Result};
use std::time::Instant;
use tracing::{debug, info, instrument};

use crate::guide::Guide;

pub use groups::{CategoryIndex, GroupIndexer};
pub use project::AnswerRecord;
pub use reconstruct::{reconstruct, CarryForward, ReconstructedRow};
pub use rows::{parse_rows, RawRow};

/// State of one reconstruction pass over the question sheet.
///
/// Built fresh for every pass and consumed by [`Pass::finish`]; nothing
/// survives from one pass to the next.
#[derive(Debug, Default)]
pub struct Pass {
    state: CarryForward,
    records: Vec<AnswerRecord>,
    groups: GroupIndexer,
    seen_header: bool,
    skipped: usize,
}

impl Pass {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next row in source order.
    pub fn step(&mut self, row: &RawRow) {
        if !self.seen_header {
            self.seen_header = true;
            return;
        }
        if !self.state.advance(row) {
            self.skipped += 1;
            return;
        }

        // membership does not depend on having a qualifying answer
        self.groups
            .register(&self.state.category, &self.state.character);

        if let Some(record) = project::project(&self.state, row) {
            self.records.push(record);
        }
    }

    #[cfg(test)]
    pub(crate) fn groups(&self) -> &GroupIndexer {
        &self.groups
    }

    pub fn finish(self) -> Guide {
        debug!(
            records = self.records.len(),
            skipped = self.skipped,
            "pass finished"
        );
        Guide::new(self.records, self.groups.finish())
    }
}

/// Run a full pass over `rows` (header first) and return the queryable guide.
pub fn build_guide(rows: &[RawRow]) -> Guide {
    rows.iter()
        .fold(Pass::new(), |mut pass, row| {
            pass.step(row);
            pass
        })
        .finish()
}

/// Parse exported CSV text and run a full pass over it.
#[instrument(level = "info", skip(text), fields(bytes = text.len()))]
pub fn build_guide_from_csv(text: &str) -> Result<Guide> {
    let start = Instant::now();
    let rows = parse_rows(text).context("parsing question sheet")?;
    let guide = build_guide(&rows);
    info!(
        rows = rows.len(),
        records = guide.records().len(),
        categories = guide.categories().len(),
        elapsed = ?start.elapsed(),
        "guide rebuilt"
    );
    Ok(guide)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,banquet_guide::process=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    fn rows(data: &[&[&str]]) -> Vec<RawRow> {
        data.iter().map(|r| r.iter().copied().collect()).collect()
    }

    fn record(character: &str, question: &str, answer: &str, category: &str) -> AnswerRecord {
        AnswerRecord {
            character: character.into(),
            question: question.into(),
            answer: answer.into(),
            category: category.into(),
        }
    }

    #[test]
    fn carried_name_and_top_score_filter() {
        let guide = build_guide(&rows(&[
            &["name", "question", "answer", "score", "type"],
            &["Alice", "Q1", "A-low", "1", "Cool"],
            &["", "Q1", "A-high", "3", "Cool"],
            &["Bob", "Q2", "B-ans", "3", "Hot"],
        ]));
        assert_eq!(
            guide.records(),
            &[
                record("Alice", "Q1", "A-high", "Cool"),
                record("Bob", "Q2", "B-ans", "Hot"),
            ]
        );
        let cats = guide.categories();
        assert_eq!(cats.len(), 2);
        assert_eq!(cats["Cool"], vec!["Alice"]);
        assert_eq!(cats["Hot"], vec!["Bob"]);
    }

    #[test]
    fn empty_answer_still_registers_character() {
        let guide = build_guide(&rows(&[
            &["h", "h", "h", "h", "h"],
            &["Carol", "Q3", "", "3", "Mix"],
        ]));
        assert!(guide.records().is_empty());
        assert_eq!(guide.categories()["Mix"], vec!["Carol"]);
    }

    #[test]
    fn carried_name_lands_in_every_category_it_was_tagged_with() {
        let guide = build_guide(&rows(&[
            &["h", "h"],
            &["Dana", "Q1", "x", "2", "Cool"],
            &["", "Q2", "y", "2", "Hot"],
        ]));
        assert_eq!(guide.categories()["Cool"], vec!["Dana"]);
        assert_eq!(guide.categories()["Hot"], vec!["Dana"]);
    }

    #[test]
    fn header_row_contributes_nothing() {
        let guide = build_guide(&rows(&[&["Eve", "HQ", "HA", "3", "HeaderType"]]));
        assert!(guide.records().is_empty());
        assert!(guide.categories().is_empty());

        let guide = build_guide(&rows(&[
            &["Eve", "HQ", "HA", "3", "HeaderType"],
            &["", "", "orphan", "3", ""],
        ]));
        assert!(guide.records().is_empty());
        assert!(guide.categories().is_empty());
    }

    #[test]
    fn duplicate_top_answers_are_all_kept() {
        let guide = build_guide(&rows(&[
            &["h", "h"],
            &["Fay", "Q1", "first", "3", "Cool"],
            &["", "", "second", "3", ""],
            &["", "", "third", " 3 ", ""],
        ]));
        let answers: Vec<&str> = guide
            .records_for("Fay")
            .map(|r| r.answer.as_str())
            .collect();
        assert_eq!(answers, vec!["first", "second", "third"]);
    }

    #[test]
    fn character_without_name_until_later_rows() {
        let guide = build_guide(&rows(&[
            &["h", "h"],
            &["", "Q0", "lost", "3", "Cool"],
            &["Gus", "", "kept", "3", ""],
        ]));
        assert_eq!(guide.records(), &[record("Gus", "Q0", "kept", "Cool")]);
        assert_eq!(guide.categories()["Cool"], vec!["Gus"]);
    }

    #[test]
    fn category_sets_never_shrink_during_a_pass() {
        let data = rows(&[
            &["h", "h"],
            &["A", "Q1", "x", "3", "T1"],
            &["B", "Q2", "y", "1"],
            &["x"],
            &["", "", "z", "3", "T2"],
            &["A", "Q3", "w", "3", "T1"],
            &["C", "Q4", "v", "3"],
        ]);
        let mut pass = Pass::new();
        let mut last = 0;
        for row in &data {
            pass.step(row);
            let now = pass.groups().count("T1");
            assert!(now >= last);
            last = now;
        }
        let guide = pass.finish();
        assert_eq!(guide.categories()["T1"], vec!["A", "B", "C"]);
        assert_eq!(guide.categories()["T2"], vec!["B"]);
    }

    #[test]
    fn build_from_csv_text() -> Result<()> {
        init_test_logging();
        let text = "사도,대사,선택지,점수,타입\n\
                    에르핀,안녕?,반가워,3,활발\n\
                    ,,무시한다,1,\n\
                    \n\
                    ,뭐 해?,\"같이 놀자, 응?\",3,\n";
        let guide = build_guide_from_csv(text)?;
        assert_eq!(
            guide.records(),
            &[
                record("에르핀", "안녕?", "반가워", "활발"),
                record("에르핀", "뭐 해?", "같이 놀자, 응?", "활발"),
            ]
        );
        assert_eq!(guide.categories()["활발"], vec!["에르핀"]);
        Ok(())
    }

    #[test]
    fn byte_order_marks_do_not_hide_top_scores() -> Result<()> {
        let text = "\u{feff}사도,대사,선택지,점수,타입\n\
                    \u{feff}에르핀,안녕?,반가워,\u{feff}3,활발\u{feff}\n";
        let guide = build_guide_from_csv(text)?;
        assert_eq!(guide.records(), &[record("에르핀", "안녕?", "반가워", "활발")]);
        assert_eq!(guide.categories()["활발"], vec!["에르핀"]);
        Ok(())
    }
}

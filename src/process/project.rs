use serde::Serialize;

use super::reconstruct::{column, CarryForward};
use super::rows::RawRow;

/// Score marking the recommended response.
pub const TOP_SCORE: &str = "3";

/// A top-scoring answer for one character's question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerRecord {
    pub character: String,
    pub question: String,
    pub answer: String,
    pub category: String,
}

/// True when the row's score cell is exactly the top score after trimming.
pub fn is_top_score(row: &RawRow) -> bool {
    row.cell(column::SCORE) == Some(TOP_SCORE)
}

/// Project a reconstructed row into a record, if it qualifies.
///
/// Every qualifying row yields its own record; several top answers under the
/// same question are all kept.
pub fn project(state: &CarryForward, row: &RawRow) -> Option<AnswerRecord> {
    if !is_top_score(row) || state.question.is_empty() || state.character.is_empty() {
        return None;
    }
    let answer = row.cell(column::ANSWER)?;
    Some(AnswerRecord {
        character: state.character.clone(),
        question: state.question.clone(),
        answer: answer.to_string(),
        category: state.category.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> RawRow {
        cells.iter().copied().collect()
    }

    fn state(character: &str, question: &str, category: &str) -> CarryForward {
        CarryForward {
            character: character.into(),
            question: question.into(),
            category: category.into(),
        }
    }

    #[test]
    fn score_must_be_exactly_three_after_trim() {
        let s = state("Alice", "Q1", "Cool");
        for score in ["3", " 3 ", "3 ", "\t3"] {
            assert!(project(&s, &row(&["", "", "ans", score])).is_some(), "{score:?}");
        }
        for score in ["1", "2", "", "30", "-3", "3.0", "three"] {
            assert!(project(&s, &row(&["", "", "ans", score])).is_none(), "{score:?}");
        }
        assert!(project(&s, &row(&["", "", "ans"])).is_none());
    }

    #[test]
    fn requires_answer_question_and_character() {
        let r = row(&["", "", "ans", "3"]);
        assert!(project(&state("", "Q1", "Cool"), &r).is_none());
        assert!(project(&state("Alice", "", "Cool"), &r).is_none());
        assert!(project(&state("Alice", "Q1", "Cool"), &row(&["", "", "  ", "3"])).is_none());
    }

    #[test]
    fn projection_uses_carried_values_and_trimmed_answer() {
        let rec = project(&state("Alice", "Q1", "Cool"), &row(&["", "", "  hi  ", "3"]))
            .expect("qualifying row");
        assert_eq!(
            rec,
            AnswerRecord {
                character: "Alice".into(),
                question: "Q1".into(),
                answer: "hi".into(),
                category: "Cool".into(),
            }
        );
    }
}

// src/review/draft.rs

use serde::Serialize;

use super::ReviewError;
use crate::extraction::ExtractedQuestion;
use crate::models::question::NewQuestion;
use crate::utils::html::clean_html;

/// One candidate question under review.
///
/// The correct answer is held as an index into `choices`, not a copy of
/// the choice string: editing a choice's text therefore moves the
/// selection with it and cannot leave a stale reference behind. `None`
/// means the extractor's answer did not match any choice; publish
/// validation rejects such entries until the operator selects one.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DraftQuestion {
    pub question_text: String,
    pub choices: Vec<String>,
    pub correct: Option<usize>,
    pub bloom_level: String,
}

impl DraftQuestion {
    fn from_extracted(q: ExtractedQuestion) -> Self {
        let correct = q.choices.iter().position(|c| *c == q.correct_answer);
        DraftQuestion {
            question_text: q.question_text,
            choices: q.choices,
            correct,
            bloom_level: q.bloom_level,
        }
    }
}

/// An ordered batch of draft questions produced by one extraction call.
///
/// Edits perform no validation; invariants are re-checked as a whole at
/// publish time, so intermediate states may be transiently invalid while
/// the operator types.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewDraft {
    entries: Vec<DraftQuestion>,
}

impl ReviewDraft {
    pub fn from_extracted(questions: Vec<ExtractedQuestion>) -> Self {
        ReviewDraft {
            entries: questions.into_iter().map(DraftQuestion::from_extracted).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[DraftQuestion] {
        &self.entries
    }

    fn entry_mut(&mut self, index: usize) -> Result<&mut DraftQuestion, ReviewError> {
        let len = self.entries.len();
        self.entries
            .get_mut(index)
            .ok_or(ReviewError::OutOfRange { index, len })
    }

    /// Replaces the question text at `index`.
    pub fn edit_text(&mut self, index: usize, value: String) -> Result<(), ReviewError> {
        self.entry_mut(index)?.question_text = value;
        Ok(())
    }

    /// Marks the choice at `choice_index` as the correct answer.
    pub fn select_correct(&mut self, index: usize, choice_index: usize) -> Result<(), ReviewError> {
        let entry = self.entry_mut(index)?;
        if choice_index >= entry.choices.len() {
            return Err(ReviewError::OutOfRange {
                index: choice_index,
                len: entry.choices.len(),
            });
        }
        entry.correct = Some(choice_index);
        Ok(())
    }

    /// Replaces one choice string. The correct-answer selection is an
    /// index, so it keeps pointing at the edited choice.
    pub fn edit_choice(
        &mut self,
        index: usize,
        choice_index: usize,
        value: String,
    ) -> Result<(), ReviewError> {
        let entry = self.entry_mut(index)?;
        let len = entry.choices.len();
        let choice = entry
            .choices
            .get_mut(choice_index)
            .ok_or(ReviewError::OutOfRange { index: choice_index, len })?;
        *choice = value;
        Ok(())
    }

    /// Removes the entry at `index`; later entries shift down by one.
    pub fn remove(&mut self, index: usize) -> Result<DraftQuestion, ReviewError> {
        let len = self.entries.len();
        if index >= len {
            return Err(ReviewError::OutOfRange { index, len });
        }
        Ok(self.entries.remove(index))
    }

    /// Re-validates every entry and converts the batch into its durable
    /// form, sanitizing operator-supplied text on the way out.
    ///
    /// Validation is never assumed from earlier edits: the correct answer
    /// must address an existing choice and the question text must be
    /// non-empty at this moment, for every entry, or the whole batch is
    /// rejected naming the first offender.
    pub fn to_publishable(&self) -> Result<Vec<NewQuestion>, ReviewError> {
        let mut batch = Vec::with_capacity(self.entries.len());

        for (index, entry) in self.entries.iter().enumerate() {
            if entry.question_text.trim().is_empty() {
                return Err(ReviewError::ValidationFailed {
                    index,
                    reason: "question text is empty".to_string(),
                });
            }
            if entry.choices.is_empty() {
                return Err(ReviewError::ValidationFailed {
                    index,
                    reason: "question has no choices".to_string(),
                });
            }
            let correct = match entry.correct {
                Some(i) if i < entry.choices.len() => i,
                _ => {
                    return Err(ReviewError::ValidationFailed {
                        index,
                        reason: "correct answer is not one of the choices".to_string(),
                    });
                }
            };

            let choices: Vec<String> = entry.choices.iter().map(|c| clean_html(c)).collect();
            batch.push(NewQuestion {
                question_text: clean_html(&entry.question_text),
                correct_answer: choices[correct].clone(),
                choices,
                bloom_level: entry.bloom_level.clone(),
            });
        }

        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extracted(text: &str, choices: &[&str], correct: &str) -> ExtractedQuestion {
        ExtractedQuestion {
            question_text: text.to_string(),
            choices: choices.iter().map(|c| c.to_string()).collect(),
            correct_answer: correct.to_string(),
            bloom_level: "Remember".to_string(),
        }
    }

    #[test]
    fn from_extracted_resolves_correct_answer_to_index() {
        let draft = ReviewDraft::from_extracted(vec![extracted("2+2?", &["3", "4", "5"], "4")]);
        assert_eq!(draft.entries()[0].correct, Some(1));
    }

    #[test]
    fn from_extracted_leaves_unmatched_answer_unselected() {
        let draft = ReviewDraft::from_extracted(vec![extracted("2+2?", &["A", "B"], "C")]);
        assert_eq!(draft.entries()[0].correct, None);
    }

    #[test]
    fn edit_choice_moves_the_selection_with_the_text() {
        let mut draft = ReviewDraft::from_extracted(vec![extracted("2+2?", &["3", "4"], "4")]);
        draft.edit_choice(0, 1, "four".to_string()).unwrap();

        let batch = draft.to_publishable().unwrap();
        assert_eq!(batch[0].correct_answer, "four");
    }

    #[test]
    fn edits_past_the_end_are_out_of_range() {
        let mut draft = ReviewDraft::from_extracted(vec![extracted("q", &["a"], "a")]);
        assert_eq!(
            draft.edit_text(3, "x".to_string()),
            Err(ReviewError::OutOfRange { index: 3, len: 1 })
        );
        assert_eq!(
            draft.select_correct(0, 5),
            Err(ReviewError::OutOfRange { index: 5, len: 1 })
        );
        assert_eq!(
            draft.edit_choice(0, 2, "x".to_string()),
            Err(ReviewError::OutOfRange { index: 2, len: 1 })
        );
    }

    #[test]
    fn remove_shifts_later_entries_down() {
        let mut draft = ReviewDraft::from_extracted(vec![
            extracted("first", &["a"], "a"),
            extracted("second", &["b"], "b"),
            extracted("third", &["c"], "c"),
        ]);
        draft.remove(1).unwrap();

        assert_eq!(draft.len(), 2);
        assert_eq!(draft.entries()[1].question_text, "third");
    }

    #[test]
    fn validation_names_the_first_offending_entry() {
        let mut draft = ReviewDraft::from_extracted(vec![
            extracted("fine", &["a", "b"], "a"),
            extracted("broken", &["A", "B"], "C"),
        ]);
        // Entry 0 also made invalid, to confirm the first offender wins.
        draft.edit_text(0, "   ".to_string()).unwrap();

        match draft.to_publishable() {
            Err(ReviewError::ValidationFailed { index: 0, reason }) => {
                assert!(reason.contains("empty"));
            }
            other => panic!("expected ValidationFailed at 0, got {:?}", other),
        }
    }

    #[test]
    fn publishable_batch_preserves_order_and_fields() {
        let draft = ReviewDraft::from_extracted(vec![
            extracted("q1", &["a", "b"], "b"),
            extracted("q2", &["x", "y", "z"], "x"),
        ]);
        let batch = draft.to_publishable().unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].question_text, "q1");
        assert_eq!(batch[0].correct_answer, "b");
        assert_eq!(batch[1].choices, vec!["x", "y", "z"]);
        assert_eq!(batch[1].correct_answer, "x");
    }
}

// src/review/sessions.rs

use std::collections::HashMap;
use std::sync::Mutex;

use serde::Serialize;

use super::{ReviewError, ReviewDraft};
use crate::extraction::ExtractedQuestion;
use crate::models::material::NewMaterial;
use crate::models::question::NewQuestion;
use crate::review::draft::DraftQuestion;

/// One educator's review session: the draft batch plus the material
/// reference that will be recorded when the batch is published.
#[derive(Debug)]
struct ReviewSession {
    course_id: i64,
    material: NewMaterial,
    draft: ReviewDraft,
}

/// Serializable view of a session, returned to the operator after every
/// mutation so the client never has to track draft state itself.
#[derive(Debug, Serialize, PartialEq)]
pub struct DraftSnapshot {
    pub course_id: i64,
    pub file_name: String,
    pub file_path: String,
    pub questions: Vec<DraftQuestion>,
}

/// In-memory store of review sessions, keyed by educator.
///
/// A session exists while its educator is in Reviewing mode; absence is
/// Idle. One session per educator: beginning a new review replaces any
/// previous draft with no effect on the question bank. The workflow
/// assumes a single operator per draft; a plain mutex around the map is
/// the only coordination.
#[derive(Debug, Default)]
pub struct ReviewSessions {
    inner: Mutex<HashMap<i64, ReviewSession>>,
}

impl ReviewSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a review session over a freshly extracted batch, replacing
    /// any session the educator already had.
    pub fn begin(
        &self,
        educator_id: i64,
        course_id: i64,
        material: NewMaterial,
        questions: Vec<ExtractedQuestion>,
    ) -> DraftSnapshot {
        let session = ReviewSession {
            course_id,
            material,
            draft: ReviewDraft::from_extracted(questions),
        };
        let snapshot = Self::snapshot_of(&session);

        let mut inner = self.inner.lock().unwrap();
        if inner.insert(educator_id, session).is_some() {
            tracing::info!(educator_id, course_id, "Previous draft replaced by new review");
        }
        snapshot
    }

    /// Current draft state, or `NotReviewing` if no session is open for
    /// this educator and course.
    pub fn snapshot(&self, educator_id: i64, course_id: i64) -> Result<DraftSnapshot, ReviewError> {
        self.with_session(educator_id, course_id, |s| Ok(Self::snapshot_of(s)))
    }

    pub fn edit_text(
        &self,
        educator_id: i64,
        course_id: i64,
        index: usize,
        value: String,
    ) -> Result<DraftSnapshot, ReviewError> {
        self.with_session(educator_id, course_id, |s| {
            s.draft.edit_text(index, value)?;
            Ok(Self::snapshot_of(s))
        })
    }

    pub fn select_correct(
        &self,
        educator_id: i64,
        course_id: i64,
        index: usize,
        choice_index: usize,
    ) -> Result<DraftSnapshot, ReviewError> {
        self.with_session(educator_id, course_id, |s| {
            s.draft.select_correct(index, choice_index)?;
            Ok(Self::snapshot_of(s))
        })
    }

    pub fn edit_choice(
        &self,
        educator_id: i64,
        course_id: i64,
        index: usize,
        choice_index: usize,
        value: String,
    ) -> Result<DraftSnapshot, ReviewError> {
        self.with_session(educator_id, course_id, |s| {
            s.draft.edit_choice(index, choice_index, value)?;
            Ok(Self::snapshot_of(s))
        })
    }

    /// Removes one draft entry. Irreversible, so the caller must send an
    /// explicit confirmation token.
    pub fn delete_question(
        &self,
        educator_id: i64,
        course_id: i64,
        index: usize,
        confirm: bool,
    ) -> Result<DraftSnapshot, ReviewError> {
        if !confirm {
            return Err(ReviewError::ConfirmationRequired);
        }
        self.with_session(educator_id, course_id, |s| {
            s.draft.remove(index)?;
            Ok(Self::snapshot_of(s))
        })
    }

    /// Abandons the whole draft. No durable effect.
    pub fn discard(&self, educator_id: i64, course_id: i64, confirm: bool) -> Result<(), ReviewError> {
        if !confirm {
            return Err(ReviewError::ConfirmationRequired);
        }
        let mut inner = self.inner.lock().unwrap();
        let reviewing = inner
            .get(&educator_id)
            .is_some_and(|s| s.course_id == course_id);
        if !reviewing {
            return Err(ReviewError::NotReviewing);
        }
        inner.remove(&educator_id);
        tracing::info!(educator_id, course_id, "Draft discarded");
        Ok(())
    }

    /// Validates the draft and builds the write-set for the store.
    ///
    /// The session itself is left untouched: it is only cleared by
    /// `clear` after the durable write succeeds, which is what keeps a
    /// failed publish retryable.
    pub(crate) fn prepare_publish(
        &self,
        educator_id: i64,
        course_id: i64,
    ) -> Result<(NewMaterial, Vec<NewQuestion>), ReviewError> {
        self.with_session(educator_id, course_id, |s| {
            if s.draft.is_empty() {
                return Err(ReviewError::EmptyDraft);
            }
            let batch = s.draft.to_publishable()?;
            Ok((s.material.clone(), batch))
        })
    }

    /// Ends the session after a successful publish.
    pub(crate) fn clear(&self, educator_id: i64) {
        self.inner.lock().unwrap().remove(&educator_id);
    }

    fn with_session<T>(
        &self,
        educator_id: i64,
        course_id: i64,
        f: impl FnOnce(&mut ReviewSession) -> Result<T, ReviewError>,
    ) -> Result<T, ReviewError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.get_mut(&educator_id) {
            Some(session) if session.course_id == course_id => f(session),
            _ => Err(ReviewError::NotReviewing),
        }
    }

    fn snapshot_of(session: &ReviewSession) -> DraftSnapshot {
        DraftSnapshot {
            course_id: session.course_id,
            file_name: session.material.file_name.clone(),
            file_path: session.material.file_path.clone(),
            questions: session.draft.entries().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn material() -> NewMaterial {
        NewMaterial {
            file_name: "notes.pdf".to_string(),
            file_path: "1700000000_notes.pdf".to_string(),
        }
    }

    fn extracted(text: &str) -> ExtractedQuestion {
        ExtractedQuestion {
            question_text: text.to_string(),
            choices: vec!["a".to_string(), "b".to_string()],
            correct_answer: "a".to_string(),
            bloom_level: "Understand".to_string(),
        }
    }

    #[test]
    fn begin_replaces_previous_draft() {
        let sessions = ReviewSessions::new();
        sessions.begin(7, 1, material(), vec![extracted("old")]);
        sessions.begin(7, 2, material(), vec![extracted("new")]);

        // The old course's session is gone; only the new one answers.
        assert_eq!(sessions.snapshot(7, 1), Err(ReviewError::NotReviewing));
        let snap = sessions.snapshot(7, 2).unwrap();
        assert_eq!(snap.questions[0].question_text, "new");
    }

    #[test]
    fn operations_without_a_session_report_not_reviewing() {
        let sessions = ReviewSessions::new();
        assert_eq!(
            sessions.edit_text(1, 1, 0, "x".to_string()),
            Err(ReviewError::NotReviewing)
        );
        assert_eq!(sessions.prepare_publish(1, 1).unwrap_err(), ReviewError::NotReviewing);
    }

    #[test]
    fn delete_and_discard_require_confirmation() {
        let sessions = ReviewSessions::new();
        sessions.begin(1, 1, material(), vec![extracted("q")]);

        assert_eq!(
            sessions.delete_question(1, 1, 0, false).unwrap_err(),
            ReviewError::ConfirmationRequired
        );
        assert_eq!(
            sessions.discard(1, 1, false).unwrap_err(),
            ReviewError::ConfirmationRequired
        );
        // Still reviewing after both refusals.
        assert!(sessions.snapshot(1, 1).is_ok());
    }

    #[test]
    fn discard_ends_the_session() {
        let sessions = ReviewSessions::new();
        sessions.begin(1, 1, material(), vec![extracted("q")]);
        sessions.discard(1, 1, true).unwrap();
        assert_eq!(sessions.snapshot(1, 1), Err(ReviewError::NotReviewing));
    }

    #[test]
    fn sessions_are_isolated_per_educator() {
        let sessions = ReviewSessions::new();
        sessions.begin(1, 10, material(), vec![extracted("mine")]);
        sessions.begin(2, 10, material(), vec![extracted("theirs")]);

        sessions.edit_text(1, 10, 0, "edited".to_string()).unwrap();
        assert_eq!(sessions.snapshot(2, 10).unwrap().questions[0].question_text, "theirs");
    }
}

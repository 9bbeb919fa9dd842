// src/review/mod.rs
//
// The review-and-publish workflow: a draft batch of extracted questions
// lives in transient memory, gets curated by one educator, and is either
// discarded without trace or committed whole to the question bank.

pub mod draft;
pub mod sessions;

use std::fmt;

pub use draft::{DraftQuestion, ReviewDraft};
pub use sessions::{DraftSnapshot, ReviewSessions};

use crate::error::AppError;
use crate::stores::{PublishedBatch, QuestionStore};

/// Failure conditions of the review workflow.
#[derive(Debug, PartialEq, Eq)]
pub enum ReviewError {
    /// A caller addressed a draft position that does not exist.
    /// Programming/integration error, not operator-recoverable.
    OutOfRange { index: usize, len: usize },

    /// A draft entry violated a publish invariant. The whole batch is
    /// rejected; the index locates the first offending entry.
    ValidationFailed { index: usize, reason: String },

    /// Publish or discard was requested while no draft batch exists.
    NotReviewing,

    /// Publish was requested on a draft with no surviving entries.
    EmptyDraft,

    /// An irreversible operation was called without its confirmation token.
    ConfirmationRequired,

    /// A durable write failed. The draft is preserved untouched so the
    /// operator can retry without re-running extraction.
    PublishFailed(String),
}

impl fmt::Display for ReviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewError::OutOfRange { index, len } => {
                write!(f, "Draft position {} is out of range (draft has {} entries)", index, len)
            }
            ReviewError::ValidationFailed { index, reason } => {
                write!(f, "Question {} failed validation: {}", index + 1, reason)
            }
            ReviewError::NotReviewing => write!(f, "No review in progress for this course"),
            ReviewError::EmptyDraft => write!(f, "The draft has no questions left to publish"),
            ReviewError::ConfirmationRequired => {
                write!(f, "This operation is irreversible and requires confirmation")
            }
            ReviewError::PublishFailed(msg) => {
                write!(f, "Publish failed, the draft was kept for retry: {}", msg)
            }
        }
    }
}

impl std::error::Error for ReviewError {}

impl From<ReviewError> for AppError {
    fn from(err: ReviewError) -> Self {
        match &err {
            ReviewError::OutOfRange { .. } => AppError::BadRequest(err.to_string()),
            ReviewError::ValidationFailed { .. } => AppError::ValidationFailed(err.to_string()),
            ReviewError::NotReviewing => AppError::NotFound(err.to_string()),
            ReviewError::EmptyDraft => AppError::BadRequest(err.to_string()),
            ReviewError::ConfirmationRequired => AppError::BadRequest(err.to_string()),
            // The question store is an external collaborator; its write
            // failures surface as an upstream condition, not a masked 500.
            ReviewError::PublishFailed(_) => AppError::UpstreamError(err.to_string()),
        }
    }
}

/// Commits the educator's current draft batch for `course_id`.
///
/// Re-validates every entry, then hands the material record and the
/// surviving questions to the store as one logical write. On any store
/// failure the session is left exactly as it was (still Reviewing), so a
/// retry is safe; on success the session is cleared.
pub async fn publish(
    sessions: &ReviewSessions,
    store: &dyn QuestionStore,
    educator_id: i64,
    course_id: i64,
) -> Result<PublishedBatch, ReviewError> {
    let (material, questions) = sessions.prepare_publish(educator_id, course_id)?;

    let batch = store
        .publish_batch(course_id, material, questions)
        .await
        .map_err(|e| {
            tracing::error!("Publish write failed for course {}: {}", course_id, e);
            ReviewError::PublishFailed(e.to_string())
        })?;

    sessions.clear(educator_id);

    tracing::info!(
        course_id,
        material_id = batch.material_id,
        question_count = batch.question_ids.len(),
        "Draft batch published"
    );

    Ok(batch)
}

// src/stores/mod.rs

pub mod postgres;

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::AppError;
use crate::models::material::NewMaterial;
use crate::models::question::{NewQuestion, Question};

pub use postgres::PgQuestionStore;

/// Failure conditions of the question store.
#[derive(Debug)]
pub enum StoreError {
    NotFound,
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound => write!(f, "record not found"),
            StoreError::Backend(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            other => StoreError::Backend(other.to_string()),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::NotFound("Question not found".to_string()),
            StoreError::Backend(msg) => AppError::InternalServerError(msg),
        }
    }
}

/// Receipt of a committed publish: the recorded material and the ids of
/// the inserted questions, in draft order.
#[derive(Debug, Clone, Serialize)]
pub struct PublishedBatch {
    pub material_id: i64,
    pub question_ids: Vec<i64>,
}

/// The durable question bank, as the workflow sees it.
///
/// Once a batch is committed the store owns those records outright; the
/// review workflow has no further claim on them. `publish_batch` is the
/// only multi-row write and must behave as one logical unit: either the
/// material record and every question land, or none do.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    async fn publish_batch(
        &self,
        course_id: i64,
        material: NewMaterial,
        questions: Vec<NewQuestion>,
    ) -> Result<PublishedBatch, StoreError>;

    async fn list_by_course(&self, course_id: i64) -> Result<Vec<Question>, StoreError>;

    async fn get(&self, id: i64) -> Result<Option<Question>, StoreError>;

    /// Overwrites the four content fields of one record.
    async fn update(&self, id: i64, fields: NewQuestion) -> Result<(), StoreError>;

    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    /// Up to `limit` questions of a course in random order, for the
    /// student review feed.
    async fn random_for_course(&self, course_id: i64, limit: i64) -> Result<Vec<Question>, StoreError>;
}

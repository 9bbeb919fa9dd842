// src/models/material.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'learning_materials' table: one row per source document
/// that produced a published question batch.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct LearningMaterial {
    pub id: i64,
    pub course_id: i64,
    pub file_name: String,
    pub file_path: String,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Material reference awaiting publish, carried by a review session.
/// Written to the store only when the draft batch is committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMaterial {
    pub file_name: String,
    pub file_path: String,
}

// src/handlers/lookup.rs

use axum::{Json, extract::State, response::IntoResponse};
use sqlx::PgPool;

use crate::{error::AppError, models::profile::LookupEntry};

/// Lists academic levels for the setup and course-creation dropdowns.
pub async fn list_levels(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let levels = sqlx::query_as::<_, LookupEntry>(
        "SELECT id, name FROM academic_levels ORDER BY id",
    )
    .fetch_all(&pool)
    .await?;

    Ok(Json(levels))
}

/// Lists programs for the setup and course-creation dropdowns.
pub async fn list_programs(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let programs =
        sqlx::query_as::<_, LookupEntry>("SELECT id, name FROM programs ORDER BY id")
            .fetch_all(&pool)
            .await?;

    Ok(Json(programs))
}

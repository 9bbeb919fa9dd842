// src/handlers/profile.rs

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::AppError,
    models::profile::{MeResponse, UpsertProfileRequest},
    utils::jwt::Claims,
};

/// Get the current user's profile, joined with its lookup names.
pub async fn get_me(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id();

    let me = sqlx::query_as::<_, MeResponse>(
        r#"
        SELECT
            u.id AS user_id, u.email, p.full_name, p.role,
            al.name AS academic_level, pr.name AS program,
            p.created_at
        FROM users u
        JOIN profiles p ON p.user_id = u.id
        LEFT JOIN academic_levels al ON p.academic_level_id = al.id
        LEFT JOIN programs pr ON p.program_id = pr.id
        WHERE u.id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Profile not set up yet".to_string()))?;

    Ok(Json(me))
}

/// Create or replace the current user's profile (the setup flow).
///
/// Students must carry an academic level and a program, since those two
/// fields are what enrolls them into matching courses. Educators carry
/// neither.
pub async fn upsert_me(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpsertProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    if payload.role == "student"
        && (payload.academic_level_id.is_none() || payload.program_id.is_none())
    {
        return Err(AppError::BadRequest(
            "Students must select an academic level and a program".to_string(),
        ));
    }

    let user_id = claims.user_id();

    sqlx::query(
        r#"
        INSERT INTO profiles (user_id, full_name, role, academic_level_id, program_id)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (user_id) DO UPDATE SET
            full_name = EXCLUDED.full_name,
            role = EXCLUDED.role,
            academic_level_id = EXCLUDED.academic_level_id,
            program_id = EXCLUDED.program_id
        "#,
    )
    .bind(user_id)
    .bind(&payload.full_name)
    .bind(&payload.role)
    .bind(payload.academic_level_id)
    .bind(payload.program_id)
    .execute(&pool)
    .await
    .map_err(|e| {
        // Postgres error code for foreign key violation is 23503
        if e.to_string().contains("foreign key") || e.to_string().contains("23503") {
            AppError::BadRequest("Unknown academic level or program".to_string())
        } else {
            tracing::error!("Failed to upsert profile: {:?}", e);
            AppError::from(e)
        }
    })?;

    // The JWT still carries the old role; clients log in again after
    // setup to pick up the new role claim.
    Ok((
        StatusCode::OK,
        Json(serde_json::json!({
            "message": "Profile saved",
            "role": payload.role
        })),
    ))
}

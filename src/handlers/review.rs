// src/handlers/review.rs
//
// HTTP surface of the review/publish workflow. Handlers stay thin: the
// draft semantics live in `crate::review`, durable writes behind
// `crate::stores`.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    error::AppError,
    handlers::course::require_course_owner,
    models::material::NewMaterial,
    review,
    state::AppState,
    utils::jwt::Claims,
};

/// DTO to open a review over an already-uploaded material.
#[derive(Debug, Deserialize, Validate)]
pub struct BeginReviewRequest {
    #[validate(length(min = 1, max = 255))]
    pub file_name: String,
    #[validate(length(min = 1, max = 1024))]
    pub file_path: String,
}

/// DTO for editing one draft entry. Optional fields are applied in order,
/// mirroring the incremental edits an operator makes while reviewing.
#[derive(Debug, Deserialize)]
pub struct EditDraftQuestionRequest {
    pub question_text: Option<String>,
    /// Position of the choice to mark correct.
    pub correct_choice: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct EditDraftChoiceRequest {
    pub value: String,
}

/// Explicit intent token for irreversible operations.
#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmParams {
    #[serde(default)]
    pub confirm: bool,
}

/// Opens a review session: downloads the material, runs extraction, and
/// holds the resulting batch as an editable draft.
///
/// Extraction is a blocking prerequisite; no draft exists until it has
/// returned. Its failures are surfaced unchanged and leave no session
/// behind. Any previous draft of this educator is replaced.
pub async fn begin_review(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<i64>,
    Json(payload): Json<BeginReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    require_course_owner(&state.pool, course_id, claims.user_id()).await?;

    let material_bytes = state.storage.fetch(&payload.file_path).await?;

    let extracted = state.extractor.extract(&material_bytes).await?;

    if extracted.is_empty() {
        return Err(AppError::UpstreamError(
            "The extraction service returned no questions for this material".to_string(),
        ));
    }

    let material = NewMaterial {
        file_name: payload.file_name,
        file_path: payload.file_path,
    };

    let snapshot = state
        .sessions
        .begin(claims.user_id(), course_id, material, extracted);

    Ok((StatusCode::CREATED, Json(snapshot)))
}

/// Current draft for this educator and course.
pub async fn get_draft(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = state.sessions.snapshot(claims.user_id(), course_id)?;
    Ok(Json(snapshot))
}

/// Edits one draft entry: question text and/or the correct-choice mark.
/// No validation happens here; invariants are re-checked at publish.
pub async fn edit_draft_question(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((course_id, index)): Path<(i64, usize)>,
    Json(payload): Json<EditDraftQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let educator_id = claims.user_id();

    if let Some(text) = payload.question_text {
        state.sessions.edit_text(educator_id, course_id, index, text)?;
    }

    if let Some(choice) = payload.correct_choice {
        state
            .sessions
            .select_correct(educator_id, course_id, index, choice)?;
    }

    let snapshot = state.sessions.snapshot(educator_id, course_id)?;
    Ok(Json(snapshot))
}

/// Replaces one choice string. The correct-answer selection follows the
/// edited choice rather than going stale.
pub async fn edit_draft_choice(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((course_id, index, choice)): Path<(i64, usize, usize)>,
    Json(payload): Json<EditDraftChoiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = state.sessions.edit_choice(
        claims.user_id(),
        course_id,
        index,
        choice,
        payload.value,
    )?;
    Ok(Json(snapshot))
}

/// Removes one entry from the draft. Requires `?confirm=true`.
pub async fn delete_draft_question(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((course_id, index)): Path<(i64, usize)>,
    Query(params): Query<ConfirmParams>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot =
        state
            .sessions
            .delete_question(claims.user_id(), course_id, index, params.confirm)?;
    Ok(Json(snapshot))
}

/// Commits the surviving draft entries to the question bank.
pub async fn publish_draft(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    require_course_owner(&state.pool, course_id, claims.user_id()).await?;

    let batch = review::publish(
        &state.sessions,
        state.questions.as_ref(),
        claims.user_id(),
        course_id,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(batch)))
}

/// Abandons the draft without publishing anything.
pub async fn discard_draft(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<i64>,
    Json(payload): Json<ConfirmRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .sessions
        .discard(claims.user_id(), course_id, payload.confirm)?;

    Ok(Json(serde_json::json!({ "message": "Draft discarded" })))
}

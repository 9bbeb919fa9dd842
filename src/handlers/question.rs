// src/handlers/question.rs
//
// Editing of already-published questions: one record at a time, straight
// against the question store, separate from the draft workflow.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    handlers::course::require_course_owner,
    handlers::review::ConfirmParams,
    models::question::{NewQuestion, UpdateQuestionRequest},
    state::AppState,
    utils::{html::clean_html, jwt::Claims},
};

/// Lists the full question bank of a course, answers included.
/// Educator-only; students get the public feed instead.
pub async fn list_course_questions(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    require_course_owner(&state.pool, course_id, claims.user_id()).await?;

    let questions = state.questions.list_by_course(course_id).await?;

    Ok(Json(questions))
}

/// Overwrites one published question.
///
/// The same correct-answer-membership invariant publish enforces is
/// re-checked here against the incoming record; the write only happens
/// when the whole record is valid, so a success response is the caller's
/// signal to clear its unsaved-changes marker.
pub async fn update_question(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    if !payload.correct_answer_is_member() {
        return Err(AppError::ValidationFailed(
            "The correct answer must be one of the choices".to_string(),
        ));
    }

    let question = state
        .questions
        .get(id)
        .await?
        .ok_or(AppError::NotFound("Question not found".to_string()))?;

    require_course_owner(&state.pool, question.course_id, claims.user_id()).await?;

    let fields = NewQuestion {
        question_text: clean_html(&payload.question_text),
        choices: payload.choices.iter().map(|c| clean_html(c)).collect(),
        correct_answer: clean_html(&payload.correct_answer),
        bloom_level: payload.bloom_level,
    };

    state.questions.update(id, fields).await?;

    Ok(StatusCode::OK)
}

/// Deletes one published question. Requires `?confirm=true`.
///
/// Removal is unconditional; any attempt history referencing the record
/// is left to its own cleanup.
pub async fn delete_question(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Query(params): Query<ConfirmParams>,
) -> Result<impl IntoResponse, AppError> {
    if !params.confirm {
        return Err(AppError::BadRequest(
            "Deleting a question is irreversible and requires confirmation".to_string(),
        ));
    }

    let question = state
        .questions
        .get(id)
        .await?
        .ok_or(AppError::NotFound("Question not found".to_string()))?;

    require_course_owner(&state.pool, question.course_id, claims.user_id()).await?;

    state.questions.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

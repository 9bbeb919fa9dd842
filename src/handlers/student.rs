// src/handlers/student.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Deserialize;
use sqlx::PgPool;

use crate::{
    config::REVIEW_FEED_SIZE,
    error::AppError,
    models::{course::CourseSummary, profile::Profile, question::PublicQuestion},
    state::AppState,
    utils::jwt::Claims,
};

/// Reads the student's academic context once per request.
/// Enrollment is nothing more than a profile matching a course on its
/// academic level and program.
async fn enrollment_of(pool: &PgPool, user_id: i64) -> Result<(i64, i64), AppError> {
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        SELECT user_id, full_name, role, academic_level_id, program_id, created_at
        FROM profiles
        WHERE user_id = $1 AND role = 'student'
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("Profile not set up yet".to_string()))?;

    match (profile.academic_level_id, profile.program_id) {
        (Some(level), Some(program)) => Ok((level, program)),
        _ => Err(AppError::BadRequest(
            "Complete your profile before reviewing courses".to_string(),
        )),
    }
}

/// Lists the courses the current student is enrolled in: every course
/// whose academic level and program match the student's profile.
pub async fn list_courses(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let (level_id, program_id) = enrollment_of(&pool, claims.user_id()).await?;

    let courses = sqlx::query_as::<_, CourseSummary>(
        r#"
        SELECT
            c.id, c.course_name,
            al.name AS academic_level,
            pr.name AS program
        FROM courses c
        JOIN academic_levels al ON c.academic_level_id = al.id
        JOIN programs pr ON c.program_id = pr.id
        WHERE c.academic_level_id = $1 AND c.program_id = $2
        ORDER BY c.created_at DESC
        "#,
    )
    .bind(level_id)
    .bind(program_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(courses))
}

/// A batch of published questions for one review session, in random
/// order with the correct answers hidden. Only the durable question bank
/// is ever read here; drafts are invisible to students.
pub async fn review_feed(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let (level_id, program_id) = enrollment_of(&state.pool, claims.user_id()).await?;

    let enrolled: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM courses WHERE id = $1 AND academic_level_id = $2 AND program_id = $3",
    )
    .bind(course_id)
    .bind(level_id)
    .bind(program_id)
    .fetch_optional(&state.pool)
    .await?;

    if enrolled.is_none() {
        return Err(AppError::NotFound("Course not found".to_string()));
    }

    let questions = state
        .questions
        .random_for_course(course_id, REVIEW_FEED_SIZE)
        .await?;

    let feed: Vec<PublicQuestion> = questions.into_iter().map(PublicQuestion::from).collect();

    Ok(Json(feed))
}

/// DTO for answering one question during review.
#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    pub answer: String,
}

/// Checks a student's answer against the stored key.
/// Simple strict string matching; the correct answer is revealed in the
/// response so the client can show it after the attempt.
pub async fn submit_answer(
    State(state): State<AppState>,
    Path(question_id): Path<i64>,
    Json(payload): Json<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let question = state
        .questions
        .get(question_id)
        .await?
        .ok_or(AppError::NotFound("Question not found".to_string()))?;

    let correct = payload.answer == question.correct_answer;

    Ok(Json(serde_json::json!({
        "correct": correct,
        "correct_answer": question.correct_answer,
        "bloom_level": question.bloom_level
    })))
}

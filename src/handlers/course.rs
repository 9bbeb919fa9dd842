// src/handlers/course.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        course::{Course, CourseDetail, CourseSummary, CreateCourseRequest},
        material::LearningMaterial,
    },
    utils::jwt::Claims,
};

/// Fetches `course_id` if it belongs to `educator_id`.
/// Courses an educator does not own are indistinguishable from absent.
pub async fn require_course_owner(
    pool: &PgPool,
    course_id: i64,
    educator_id: i64,
) -> Result<Course, AppError> {
    let course = sqlx::query_as::<_, Course>(
        r#"
        SELECT id, educator_id, course_name, academic_level_id, program_id, created_at
        FROM courses
        WHERE id = $1 AND educator_id = $2
        "#,
    )
    .bind(course_id)
    .bind(educator_id)
    .fetch_optional(pool)
    .await?;

    course.ok_or(AppError::NotFound("Course not found".to_string()))
}

/// Creates a new course owned by the current educator.
pub async fn create_course(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateCourseRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO courses (educator_id, course_name, academic_level_id, program_id)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(claims.user_id())
    .bind(&payload.course_name)
    .bind(payload.academic_level_id)
    .bind(payload.program_id)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        if e.to_string().contains("foreign key") || e.to_string().contains("23503") {
            AppError::BadRequest("Unknown academic level or program".to_string())
        } else {
            tracing::error!("Failed to create course: {:?}", e);
            AppError::from(e)
        }
    })?;

    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": id }))))
}

/// Lists the current educator's courses with their lookup names.
pub async fn list_my_courses(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let courses = sqlx::query_as::<_, CourseSummary>(
        r#"
        SELECT
            c.id, c.course_name,
            al.name AS academic_level,
            pr.name AS program
        FROM courses c
        JOIN academic_levels al ON c.academic_level_id = al.id
        JOIN programs pr ON c.program_id = pr.id
        WHERE c.educator_id = $1
        ORDER BY c.created_at DESC
        "#,
    )
    .bind(claims.user_id())
    .fetch_all(&pool)
    .await?;

    Ok(Json(courses))
}

/// Course management header: names plus the enrolled-student count.
/// A student is enrolled when their profile matches the course's
/// academic level and program.
pub async fn get_course(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let course = sqlx::query_as::<_, CourseDetail>(
        r#"
        SELECT
            c.id, c.educator_id, c.course_name,
            c.academic_level_id, c.program_id,
            al.name AS academic_level,
            pr.name AS program,
            (SELECT COUNT(*) FROM profiles p
             WHERE p.role = 'student'
               AND p.academic_level_id = c.academic_level_id
               AND p.program_id = c.program_id) AS student_count
        FROM courses c
        JOIN academic_levels al ON c.academic_level_id = al.id
        JOIN programs pr ON c.program_id = pr.id
        WHERE c.id = $1 AND c.educator_id = $2
        "#,
    )
    .bind(course_id)
    .bind(claims.user_id())
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Course not found".to_string()))?;

    Ok(Json(course))
}

/// Lists the source materials recorded for a course.
pub async fn list_materials(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    require_course_owner(&pool, course_id, claims.user_id()).await?;

    let materials = sqlx::query_as::<_, LearningMaterial>(
        r#"
        SELECT id, course_id, file_name, file_path, created_at
        FROM learning_materials
        WHERE course_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(course_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(materials))
}

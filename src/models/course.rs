// src/models/course.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'courses' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub educator_id: i64,
    pub course_name: String,
    pub academic_level_id: i64,
    pub program_id: i64,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Course row joined with its lookup names, as shown on dashboards.
#[derive(Debug, Serialize, FromRow)]
pub struct CourseSummary {
    pub id: i64,
    pub course_name: String,
    pub academic_level: String,
    pub program: String,
}

/// Full course header for the management page, including the enrolled
/// student count (profiles matching the course's level and program).
#[derive(Debug, Serialize, FromRow)]
pub struct CourseDetail {
    pub id: i64,
    pub educator_id: i64,
    pub course_name: String,
    pub academic_level_id: i64,
    pub program_id: i64,
    pub academic_level: String,
    pub program: String,
    pub student_count: i64,
}

/// DTO for creating a new course.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCourseRequest {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Course name must be between 1 and 200 characters."
    ))]
    pub course_name: String,
    pub academic_level_id: i64,
    pub program_id: i64,
}

// src/models/profile.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'profiles' table: who a user is inside the platform.
/// One row per user, created during the setup flow after registration.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: i64,
    pub full_name: String,

    /// 'student' or 'educator'.
    pub role: String,

    /// Academic context. Required for students, absent for educators.
    pub academic_level_id: Option<i64>,
    pub program_id: Option<i64>,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Aggregated profile data for the current user, joined with lookup names.
#[derive(Debug, Serialize, FromRow)]
pub struct MeResponse {
    pub user_id: i64,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub academic_level: Option<String>,
    pub program: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for creating or replacing the current user's profile.
#[derive(Debug, Deserialize, Validate)]
pub struct UpsertProfileRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Full name must be between 1 and 100 characters."
    ))]
    pub full_name: String,

    #[validate(custom(function = validate_role))]
    pub role: String,

    pub academic_level_id: Option<i64>,
    pub program_id: Option<i64>,
}

/// Restricts the role to 'student' or 'educator'.
fn validate_role(role: &str) -> Result<(), validator::ValidationError> {
    if role != "student" && role != "educator" {
        return Err(validator::ValidationError::new("invalid_role"));
    }
    Ok(())
}

/// A reference-table row ('academic_levels' or 'programs').
#[derive(Debug, Serialize, FromRow)]
pub struct LookupEntry {
    pub id: i64,
    pub name: String,
}

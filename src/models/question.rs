// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::Validate;

/// Represents the 'questions' table in the database: the durable,
/// student-visible question bank.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,

    pub course_id: i64,

    /// Source document that produced this question.
    /// NULL for manually created questions.
    pub material_id: Option<i64>,

    /// The text content of the question.
    pub question_text: String,

    /// Ordered list of answer choices.
    /// Stored as a JSON array in the database.
    pub choices: Json<Vec<String>>,

    /// The choice string that is the correct answer.
    pub correct_answer: String,

    /// Bloom's taxonomy tag (e.g., "Remember", "Analyze"). Open taxonomy.
    pub bloom_level: String,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for sending a question to students (excludes the correct answer).
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub question_text: String,
    pub choices: Json<Vec<String>>,
    pub bloom_level: String,
}

impl From<Question> for PublicQuestion {
    fn from(q: Question) -> Self {
        PublicQuestion {
            id: q.id,
            question_text: q.question_text,
            choices: q.choices,
            bloom_level: q.bloom_level,
        }
    }
}

/// A validated question ready to be inserted by a publish commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub question_text: String,
    pub choices: Vec<String>,
    pub correct_answer: String,
    pub bloom_level: String,
}

/// DTO for overwriting one published question.
/// All four content fields are replaced in a single write.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateQuestionRequest {
    #[validate(length(min = 1, max = 2000, message = "Question text cannot be empty."))]
    pub question_text: String,
    #[validate(custom(function = validate_choices))]
    pub choices: Vec<String>,
    #[validate(length(min = 1, max = 500))]
    pub correct_answer: String,
    #[validate(length(min = 1, max = 50))]
    pub bloom_level: String,
}

impl UpdateQuestionRequest {
    /// The same membership invariant publish enforces, applied to a single
    /// record: the correct answer must equal exactly one of the choices.
    pub fn correct_answer_is_member(&self) -> bool {
        self.choices.iter().any(|c| c == &self.correct_answer)
    }
}

fn validate_choices(choices: &[String]) -> Result<(), validator::ValidationError> {
    if choices.is_empty() {
        return Err(validator::ValidationError::new("choices_cannot_be_empty"));
    }
    for choice in choices {
        if choice.is_empty() || choice.len() > 500 {
            return Err(validator::ValidationError::new("choice_length_invalid"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(choices: &[&str], correct: &str) -> UpdateQuestionRequest {
        UpdateQuestionRequest {
            question_text: "What is 2+2?".to_string(),
            choices: choices.iter().map(|c| c.to_string()).collect(),
            correct_answer: correct.to_string(),
            bloom_level: "Remember".to_string(),
        }
    }

    #[test]
    fn membership_accepts_exact_match() {
        assert!(request(&["3", "4", "5"], "4").correct_answer_is_member());
    }

    #[test]
    fn membership_rejects_missing_answer() {
        assert!(!request(&["A", "B"], "C").correct_answer_is_member());
    }

    #[test]
    fn membership_is_case_sensitive() {
        assert!(!request(&["Paris", "London"], "paris").correct_answer_is_member());
    }

    #[test]
    fn empty_choices_fail_validation() {
        let req = request(&[], "4");
        assert!(req.validate().is_err());
    }
}

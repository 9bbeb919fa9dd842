// tests/common/mod.rs
//
// In-process doubles for the external collaborators, so the review
// workflow can be exercised end-to-end without a database or network.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use sqlx::types::Json;

use reminded_backend::extraction::ExtractedQuestion;
use reminded_backend::models::material::NewMaterial;
use reminded_backend::models::question::{NewQuestion, Question};
use reminded_backend::stores::{PublishedBatch, QuestionStore, StoreError};

/// In-memory question store. `publish_batch` is all-or-nothing like the
/// real transaction: an injected failure writes no rows at all.
#[derive(Default)]
pub struct MemoryQuestionStore {
    inner: Mutex<Inner>,
    fail_next_publish: AtomicBool,
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    materials: Vec<(i64, i64, NewMaterial)>,
    questions: Vec<Question>,
}

impl MemoryQuestionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next publish fail after the fashion of a dropped
    /// connection; subsequent calls succeed again.
    pub fn fail_next_publish(&self) {
        self.fail_next_publish.store(true, Ordering::SeqCst);
    }

    pub fn questions(&self) -> Vec<Question> {
        self.inner.lock().unwrap().questions.clone()
    }

    pub fn material_count(&self) -> usize {
        self.inner.lock().unwrap().materials.len()
    }
}

#[async_trait]
impl QuestionStore for MemoryQuestionStore {
    async fn publish_batch(
        &self,
        course_id: i64,
        material: NewMaterial,
        questions: Vec<NewQuestion>,
    ) -> Result<PublishedBatch, StoreError> {
        if self.fail_next_publish.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Backend("injected write failure".to_string()));
        }

        let mut inner = self.inner.lock().unwrap();

        inner.next_id += 1;
        let material_id = inner.next_id;
        inner.materials.push((material_id, course_id, material));

        let mut question_ids = Vec::with_capacity(questions.len());
        for q in questions {
            inner.next_id += 1;
            let id = inner.next_id;
            question_ids.push(id);
            inner.questions.push(Question {
                id,
                course_id,
                material_id: Some(material_id),
                question_text: q.question_text,
                choices: Json(q.choices),
                correct_answer: q.correct_answer,
                bloom_level: q.bloom_level,
                created_at: None,
            });
        }

        Ok(PublishedBatch {
            material_id,
            question_ids,
        })
    }

    async fn list_by_course(&self, course_id: i64) -> Result<Vec<Question>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .questions
            .iter()
            .filter(|q| q.course_id == course_id)
            .cloned()
            .collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Question>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .questions
            .iter()
            .find(|q| q.id == id)
            .cloned())
    }

    async fn update(&self, id: i64, fields: NewQuestion) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let question = inner
            .questions
            .iter_mut()
            .find(|q| q.id == id)
            .ok_or(StoreError::NotFound)?;

        question.question_text = fields.question_text;
        question.choices = Json(fields.choices);
        question.correct_answer = fields.correct_answer;
        question.bloom_level = fields.bloom_level;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.questions.len();
        inner.questions.retain(|q| q.id != id);
        if inner.questions.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn random_for_course(
        &self,
        course_id: i64,
        limit: i64,
    ) -> Result<Vec<Question>, StoreError> {
        let mut questions = self.list_by_course(course_id).await?;
        questions.truncate(limit as usize);
        Ok(questions)
    }
}

/// Builds an extracted question the way the extraction service returns
/// them: the correct answer as a string value.
pub fn extracted(text: &str, choices: &[&str], correct: &str) -> ExtractedQuestion {
    ExtractedQuestion {
        question_text: text.to_string(),
        choices: choices.iter().map(|c| c.to_string()).collect(),
        correct_answer: correct.to_string(),
        bloom_level: "Remember".to_string(),
    }
}

pub fn material(name: &str) -> NewMaterial {
    NewMaterial {
        file_name: name.to_string(),
        file_path: format!("1700000000_{}", name),
    }
}

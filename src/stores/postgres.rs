// src/stores/postgres.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, types::Json};

use super::{PublishedBatch, QuestionStore, StoreError};
use crate::models::material::NewMaterial;
use crate::models::question::{NewQuestion, Question};

const QUESTION_COLUMNS: &str =
    "id, course_id, material_id, question_text, choices, correct_answer, bloom_level, created_at";

/// Postgres-backed question store.
#[derive(Clone)]
pub struct PgQuestionStore {
    pool: PgPool,
}

impl PgQuestionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuestionStore for PgQuestionStore {
    /// Records the material reference and inserts the whole batch inside
    /// one transaction, so a failed publish never leaves the material row
    /// committed alone.
    async fn publish_batch(
        &self,
        course_id: i64,
        material: NewMaterial,
        questions: Vec<NewQuestion>,
    ) -> Result<PublishedBatch, StoreError> {
        let mut tx = self.pool.begin().await?;

        let material_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO learning_materials (course_id, file_name, file_path)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(course_id)
        .bind(&material.file_name)
        .bind(&material.file_path)
        .fetch_one(&mut *tx)
        .await?;

        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO questions \
             (course_id, material_id, question_text, choices, correct_answer, bloom_level) ",
        );
        builder.push_values(questions.iter(), |mut row, q| {
            row.push_bind(course_id)
                .push_bind(material_id)
                .push_bind(&q.question_text)
                .push_bind(Json(&q.choices))
                .push_bind(&q.correct_answer)
                .push_bind(&q.bloom_level);
        });
        builder.push(" RETURNING id");

        let question_ids: Vec<i64> = builder
            .build_query_scalar()
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(PublishedBatch {
            material_id,
            question_ids,
        })
    }

    async fn list_by_course(&self, course_id: i64) -> Result<Vec<Question>, StoreError> {
        let questions = sqlx::query_as::<_, Question>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions \
             WHERE course_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    async fn get(&self, id: i64) -> Result<Option<Question>, StoreError> {
        let question = sqlx::query_as::<_, Question>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(question)
    }

    async fn update(&self, id: i64, fields: NewQuestion) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE questions
            SET question_text = $1, choices = $2, correct_answer = $3, bloom_level = $4
            WHERE id = $5
            "#,
        )
        .bind(&fields.question_text)
        .bind(Json(&fields.choices))
        .bind(&fields.correct_answer)
        .bind(&fields.bloom_level)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn random_for_course(
        &self,
        course_id: i64,
        limit: i64,
    ) -> Result<Vec<Question>, StoreError> {
        let questions = sqlx::query_as::<_, Question>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions \
             WHERE course_id = $1 ORDER BY RANDOM() LIMIT $2"
        ))
        .bind(course_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }
}

//! Answer table mapping and attempt numbering.

use std::collections::HashMap;

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};

use super::reviews::ReviewFilter;
use super::table::{decode_enum, Entity, Filter, RowValues, Table};
use crate::errors::AppError;
use crate::models::{Answer, AnswerStatus, AnswerWithReviews, Review, UpdateAnswerRequest};

#[derive(Debug, Default, Clone)]
pub struct AnswerFilter {
    pub question_id: Option<String>,
}

impl Filter for AnswerFilter {
    fn push_conditions(&self, query: &mut QueryBuilder<'static, Sqlite>) {
        if let Some(question_id) = &self.question_id {
            query.push(" AND question_id = ").push_bind(question_id.clone());
        }
    }
}

impl Entity for Answer {
    const TABLE: &'static str = "answers";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "question_id",
        "content",
        "code_snippet",
        "language",
        "key_points",
        "attempt_number",
        "status",
        "created_at",
        "updated_at",
    ];
    const ORDER_BY: &'static str = "created_at DESC, rowid DESC";

    type Filter = AnswerFilter;
    type Patch = UpdateAnswerRequest;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Answer {
            id: row.try_get("id")?,
            question_id: row.try_get("question_id")?,
            content: row.try_get("content")?,
            code_snippet: row.try_get("code_snippet")?,
            language: row.try_get("language")?,
            key_points: row.try_get("key_points")?,
            attempt_number: row.try_get("attempt_number")?,
            status: decode_enum(row, "status", AnswerStatus::parse)?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn bind_values(&self, row: &mut RowValues<'_>) {
        row.push_bind(self.id.clone())
            .push_bind(self.question_id.clone())
            .push_bind(self.content.clone())
            .push_bind(self.code_snippet.clone())
            .push_bind(self.language.clone())
            .push_bind(self.key_points.clone())
            .push_bind(self.attempt_number)
            .push_bind(self.status.as_str())
            .push_bind(self.created_at.clone())
            .push_bind(self.updated_at.clone());
    }

    fn apply_patch(&mut self, patch: &UpdateAnswerRequest) -> Result<(), AppError> {
        self.apply(patch)
    }

    fn touch(&mut self, now: String) {
        self.updated_at = now;
    }
}

impl Table<'_, Answer> {
    /// Attempt number for the next answer to `question_id`.
    ///
    /// Not atomic with the insert; two concurrent posts may receive the same number.
    pub async fn next_attempt_number(&self, question_id: &str) -> Result<i64, AppError> {
        let next: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(attempt_number), 0) + 1 FROM answers WHERE question_id = ?",
        )
        .bind(question_id)
        .fetch_one(self.pool)
        .await?;
        Ok(next)
    }

    /// Answers to a question, newest first, each with its reviews.
    pub async fn list_with_reviews(
        &self,
        question_id: &str,
    ) -> Result<Vec<AnswerWithReviews>, AppError> {
        let answers = self
            .find_many(&AnswerFilter {
                question_id: Some(question_id.to_string()),
            })
            .await?;

        let reviews = Table::<Review>::new(self.pool)
            .find_many(&ReviewFilter {
                question_id: Some(question_id.to_string()),
                ..Default::default()
            })
            .await?;

        let mut by_answer: HashMap<String, Vec<Review>> = HashMap::new();
        for review in reviews {
            by_answer
                .entry(review.answer_id.clone())
                .or_default()
                .push(review);
        }

        Ok(answers
            .into_iter()
            .map(|answer| {
                let reviews = by_answer.remove(&answer.id).unwrap_or_default();
                AnswerWithReviews { answer, reviews }
            })
            .collect())
    }

    /// One answer with its reviews, failing with `NotFound`.
    pub async fn get_with_reviews(&self, id: &str) -> Result<AnswerWithReviews, AppError> {
        let answer = self.get(id).await?;
        let reviews = Table::<Review>::new(self.pool)
            .find_many(&ReviewFilter {
                answer_id: Some(id.to_string()),
                ..Default::default()
            })
            .await?;
        Ok(AnswerWithReviews { answer, reviews })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::temp_repository;
    use crate::db::Repository;
    use crate::models::{CreateAnswerRequest, CreateQuestionRequest, CreateReviewRequest, Question};

    async fn seed_question(repo: &Repository) -> Question {
        let request: CreateQuestionRequest = serde_json::from_value(serde_json::json!({
            "title": "Binary Search",
            "description": "Find an element in a sorted array",
            "category": "Algorithms",
            "difficulty": "medium"
        }))
        .unwrap();
        repo.questions().create(Question::new(request).unwrap()).await.unwrap()
    }

    async fn add_answer(repo: &Repository, question_id: &str, content: &str) -> Answer {
        let attempt = repo.answers().next_attempt_number(question_id).await.unwrap();
        let request: CreateAnswerRequest =
            serde_json::from_value(serde_json::json!({ "content": content })).unwrap();
        repo.answers()
            .create(Answer::new(question_id, attempt, request).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_attempt_numbers_count_up_per_question() {
        let (_dir, repo) = temp_repository().await;
        let q1 = seed_question(&repo).await;
        let q2 = seed_question(&repo).await;

        assert_eq!(add_answer(&repo, &q1.id, "first").await.attempt_number, 1);
        assert_eq!(add_answer(&repo, &q1.id, "second").await.attempt_number, 2);
        assert_eq!(add_answer(&repo, &q2.id, "other").await.attempt_number, 1);
        assert_eq!(repo.answers().next_attempt_number(&q1.id).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_list_with_reviews_groups_by_answer() {
        let (_dir, repo) = temp_repository().await;
        let question = seed_question(&repo).await;
        let first = add_answer(&repo, &question.id, "first").await;
        let second = add_answer(&repo, &question.id, "second").await;

        let review = Review::new(
            &first.id,
            CreateReviewRequest {
                self_evaluation: Some(4),
                ..Default::default()
            },
        )
        .unwrap();
        repo.reviews().create(review).await.unwrap();

        let listed = repo.answers().list_with_reviews(&question.id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].answer.id, second.id);
        assert!(listed[0].reviews.is_empty());
        assert_eq!(listed[1].answer.id, first.id);
        assert_eq!(listed[1].reviews.len(), 1);
        assert_eq!(listed[1].reviews[0].self_evaluation, Some(4));

        assert!(repo.answers().list_with_reviews("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_answer_requires_existing_question() {
        let (_dir, repo) = temp_repository().await;
        let request: CreateAnswerRequest =
            serde_json::from_value(serde_json::json!({ "content": "orphan" })).unwrap();
        let result = repo
            .answers()
            .create(Answer::new("missing", 1, request).unwrap())
            .await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }
}

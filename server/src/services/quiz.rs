//! Quiz service: question storage, submissions, and auto-grading.
//!
//! DESIGN
//! ======
//! Question lists live as JSONB on the quiz row. Grading is a pure function
//! over the question list and a student's answer map; the submission and the
//! released mark are written from its result.

use std::collections::HashMap;

use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    #[error("quiz not found: {0}")]
    NotFound(Uuid),
    #[error("malformed question data: {0}")]
    BadQuestions(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// One multiple-choice question.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Question {
    /// Stable key answers refer to.
    pub id: String,
    pub prompt: String,
    pub options: Vec<String>,
    /// Index into `options` of the correct answer.
    pub answer_index: usize,
    pub points: f64,
}

#[derive(Debug, Clone)]
pub struct QuizRow {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub title: String,
    pub questions: Vec<Question>,
    pub duration_mins: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct QuizSummaryRow {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub title: String,
    pub question_count: i64,
    pub duration_mins: Option<i32>,
}

/// Grade an answer map against the question list.
///
/// Unanswered and out-of-range answers score zero for that question; answers
/// to unknown question ids are ignored. Returns `(score, max_score)`.
#[must_use]
pub fn grade(questions: &[Question], answers: &HashMap<String, usize>) -> (f64, f64) {
    let mut score = 0.0;
    let mut max_score = 0.0;
    for question in questions {
        max_score += question.points;
        if answers.get(&question.id) == Some(&question.answer_index) {
            score += question.points;
        }
    }
    (score, max_score)
}

/// Create a quiz on a unit.
pub async fn create_quiz(
    pool: &PgPool,
    unit_id: Uuid,
    title: &str,
    questions: &[Question],
    duration_mins: Option<i32>,
) -> Result<QuizRow, QuizError> {
    let id = Uuid::new_v4();
    let questions_json =
        serde_json::to_value(questions).map_err(|e| QuizError::BadQuestions(e.to_string()))?;

    sqlx::query(
        "INSERT INTO quizzes (id, unit_id, title, questions, duration_mins) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(id)
    .bind(unit_id)
    .bind(title)
    .bind(&questions_json)
    .bind(duration_mins)
    .execute(pool)
    .await?;

    Ok(QuizRow {
        id,
        unit_id,
        title: title.to_owned(),
        questions: questions.to_vec(),
        duration_mins,
    })
}

/// Quiz summaries for a unit (question bodies stay server-side).
pub async fn list_quiz_summaries(
    pool: &PgPool,
    unit_id: Uuid,
) -> Result<Vec<QuizSummaryRow>, QuizError> {
    let rows = sqlx::query(
        r"SELECT id, unit_id, title, jsonb_array_length(questions) AS question_count, duration_mins
          FROM quizzes WHERE unit_id = $1 ORDER BY created_at",
    )
    .bind(unit_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| QuizSummaryRow {
            id: row.get("id"),
            unit_id: row.get("unit_id"),
            title: row.get("title"),
            question_count: i64::from(row.get::<i32, _>("question_count")),
            duration_mins: row.get("duration_mins"),
        })
        .collect())
}

/// Fetch a quiz with its full question list.
pub async fn get_quiz(pool: &PgPool, quiz_id: Uuid) -> Result<QuizRow, QuizError> {
    let row = sqlx::query(
        "SELECT id, unit_id, title, questions, duration_mins FROM quizzes WHERE id = $1",
    )
    .bind(quiz_id)
    .fetch_optional(pool)
    .await?
    .ok_or(QuizError::NotFound(quiz_id))?;

    let questions_json: serde_json::Value = row.get("questions");
    let questions: Vec<Question> = serde_json::from_value(questions_json)
        .map_err(|e| QuizError::BadQuestions(e.to_string()))?;

    Ok(QuizRow {
        id: row.get("id"),
        unit_id: row.get("unit_id"),
        title: row.get("title"),
        questions,
        duration_mins: row.get("duration_mins"),
    })
}

/// Record (or replace) a student's submission, auto-graded.
/// Returns `(score, max_score)`.
pub async fn submit_quiz(
    pool: &PgPool,
    quiz: &QuizRow,
    user_id: Uuid,
    answers: &HashMap<String, usize>,
) -> Result<(f64, f64), QuizError> {
    let (score, max_score) = grade(&quiz.questions, answers);
    let answers_json =
        serde_json::to_value(answers).map_err(|e| QuizError::BadQuestions(e.to_string()))?;

    sqlx::query(
        r"INSERT INTO quiz_submissions (id, quiz_id, user_id, answers, score, max_score)
          VALUES ($1, $2, $3, $4, $5, $6)
          ON CONFLICT (quiz_id, user_id)
          DO UPDATE SET answers = EXCLUDED.answers, score = EXCLUDED.score,
                        max_score = EXCLUDED.max_score, submitted_at = now()",
    )
    .bind(Uuid::new_v4())
    .bind(quiz.id)
    .bind(user_id)
    .bind(&answers_json)
    .bind(score)
    .bind(max_score)
    .execute(pool)
    .await?;

    Ok((score, max_score))
}

#[cfg(test)]
#[path = "quiz_test.rs"]
mod tests;

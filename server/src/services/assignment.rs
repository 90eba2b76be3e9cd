//! Assignment service: definitions, submissions, and marking.

use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::services::session::{Role, SessionUser};

#[derive(Debug, thiserror::Error)]
pub enum AssignmentError {
    #[error("assignment not found: {0}")]
    NotFound(Uuid),
    #[error("submission not found: {0}")]
    SubmissionNotFound(Uuid),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone)]
pub struct AssignmentRow {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub unit_code: Option<String>,
    pub title: String,
    pub instructions: Option<String>,
    pub due_at: Option<time::OffsetDateTime>,
}

#[derive(Debug, Clone)]
pub struct SubmissionRow {
    pub id: Uuid,
    pub assignment_id: Uuid,
    pub user_id: Uuid,
    pub body: Option<String>,
    pub upload_id: Option<Uuid>,
    pub submitted_at: time::OffsetDateTime,
    pub mark: Option<f64>,
    pub feedback: Option<String>,
}

fn row_to_assignment(row: &sqlx::postgres::PgRow) -> AssignmentRow {
    AssignmentRow {
        id: row.get("id"),
        unit_id: row.get("unit_id"),
        unit_code: row.try_get("unit_code").ok(),
        title: row.get("title"),
        instructions: row.get("instructions"),
        due_at: row.get("due_at"),
    }
}

fn row_to_submission(row: &sqlx::postgres::PgRow) -> SubmissionRow {
    SubmissionRow {
        id: row.get("id"),
        assignment_id: row.get("assignment_id"),
        user_id: row.get("user_id"),
        body: row.get("body"),
        upload_id: row.get("upload_id"),
        submitted_at: row.get("submitted_at"),
        mark: row.get("mark"),
        feedback: row.get("feedback"),
    }
}

/// Create an assignment on a unit.
pub async fn create_assignment(
    pool: &PgPool,
    unit_id: Uuid,
    title: &str,
    instructions: Option<&str>,
    due_at: Option<time::OffsetDateTime>,
) -> Result<AssignmentRow, AssignmentError> {
    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO assignments (id, unit_id, title, instructions, due_at) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(id)
    .bind(unit_id)
    .bind(title)
    .bind(instructions)
    .bind(due_at)
    .execute(pool)
    .await?;

    Ok(AssignmentRow {
        id,
        unit_id,
        unit_code: None,
        title: title.to_owned(),
        instructions: instructions.map(ToOwned::to_owned),
        due_at,
    })
}

/// Assignments for a single unit, oldest first.
pub async fn list_for_unit(pool: &PgPool, unit_id: Uuid) -> Result<Vec<AssignmentRow>, AssignmentError> {
    let rows = sqlx::query(
        r"SELECT a.id, a.unit_id, u.code AS unit_code, a.title, a.instructions, a.due_at
          FROM assignments a JOIN units u ON u.id = a.unit_id
          WHERE a.unit_id = $1 ORDER BY a.created_at",
    )
    .bind(unit_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(row_to_assignment).collect())
}

/// Assignments across every unit the user can see, due-date order.
pub async fn list_for_user(
    pool: &PgPool,
    user: &SessionUser,
) -> Result<Vec<AssignmentRow>, AssignmentError> {
    let rows = match user.role {
        Role::Admin => {
            sqlx::query(
                r"SELECT a.id, a.unit_id, u.code AS unit_code, a.title, a.instructions, a.due_at
                  FROM assignments a JOIN units u ON u.id = a.unit_id
                  ORDER BY a.due_at NULLS LAST, a.created_at",
            )
            .fetch_all(pool)
            .await?
        }
        Role::Teacher => {
            sqlx::query(
                r"SELECT a.id, a.unit_id, u.code AS unit_code, a.title, a.instructions, a.due_at
                  FROM assignments a JOIN units u ON u.id = a.unit_id
                  WHERE u.teacher_id = $1
                  ORDER BY a.due_at NULLS LAST, a.created_at",
            )
            .bind(user.id)
            .fetch_all(pool)
            .await?
        }
        Role::Student => {
            sqlx::query(
                r"SELECT a.id, a.unit_id, u.code AS unit_code, a.title, a.instructions, a.due_at
                  FROM assignments a
                  JOIN units u ON u.id = a.unit_id
                  JOIN enrolments e ON e.unit_id = a.unit_id
                  WHERE e.user_id = $1
                  ORDER BY a.due_at NULLS LAST, a.created_at",
            )
            .bind(user.id)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(rows.iter().map(row_to_assignment).collect())
}

/// Fetch one assignment.
pub async fn get_assignment(pool: &PgPool, assignment_id: Uuid) -> Result<AssignmentRow, AssignmentError> {
    let row = sqlx::query(
        r"SELECT a.id, a.unit_id, u.code AS unit_code, a.title, a.instructions, a.due_at
          FROM assignments a JOIN units u ON u.id = a.unit_id
          WHERE a.id = $1",
    )
    .bind(assignment_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AssignmentError::NotFound(assignment_id))?;

    Ok(row_to_assignment(&row))
}

/// Record (or replace) the student's submission.
pub async fn submit(
    pool: &PgPool,
    assignment_id: Uuid,
    user_id: Uuid,
    body: Option<&str>,
    upload_id: Option<Uuid>,
) -> Result<SubmissionRow, AssignmentError> {
    let row = sqlx::query(
        r"INSERT INTO assignment_submissions (id, assignment_id, user_id, body, upload_id)
          VALUES ($1, $2, $3, $4, $5)
          ON CONFLICT (assignment_id, user_id)
          DO UPDATE SET body = EXCLUDED.body, upload_id = EXCLUDED.upload_id,
                        submitted_at = now(), mark = NULL, feedback = NULL
          RETURNING id, assignment_id, user_id, body, upload_id, submitted_at, mark, feedback",
    )
    .bind(Uuid::new_v4())
    .bind(assignment_id)
    .bind(user_id)
    .bind(body)
    .bind(upload_id)
    .fetch_one(pool)
    .await?;

    Ok(row_to_submission(&row))
}

/// The caller's own submission, if any.
pub async fn my_submission(
    pool: &PgPool,
    assignment_id: Uuid,
    user_id: Uuid,
) -> Result<Option<SubmissionRow>, AssignmentError> {
    let row = sqlx::query(
        r"SELECT id, assignment_id, user_id, body, upload_id, submitted_at, mark, feedback
          FROM assignment_submissions WHERE assignment_id = $1 AND user_id = $2",
    )
    .bind(assignment_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(row_to_submission))
}

/// Fetch one submission by id.
pub async fn get_submission(
    pool: &PgPool,
    submission_id: Uuid,
) -> Result<SubmissionRow, AssignmentError> {
    let row = sqlx::query(
        r"SELECT id, assignment_id, user_id, body, upload_id, submitted_at, mark, feedback
          FROM assignment_submissions WHERE id = $1",
    )
    .bind(submission_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AssignmentError::SubmissionNotFound(submission_id))?;

    Ok(row_to_submission(&row))
}

/// All submissions for an assignment (marking view).
pub async fn list_submissions(
    pool: &PgPool,
    assignment_id: Uuid,
) -> Result<Vec<SubmissionRow>, AssignmentError> {
    let rows = sqlx::query(
        r"SELECT id, assignment_id, user_id, body, upload_id, submitted_at, mark, feedback
          FROM assignment_submissions WHERE assignment_id = $1 ORDER BY submitted_at",
    )
    .bind(assignment_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(row_to_submission).collect())
}

/// Record a mark and feedback on a submission, returning the updated row.
pub async fn mark_submission(
    pool: &PgPool,
    submission_id: Uuid,
    mark: f64,
    feedback: Option<&str>,
) -> Result<SubmissionRow, AssignmentError> {
    let row = sqlx::query(
        r"UPDATE assignment_submissions
          SET mark = $2, feedback = $3
          WHERE id = $1
          RETURNING id, assignment_id, user_id, body, upload_id, submitted_at, mark, feedback",
    )
    .bind(submission_id)
    .bind(mark)
    .bind(feedback)
    .fetch_optional(pool)
    .await?
    .ok_or(AssignmentError::SubmissionNotFound(submission_id))?;

    Ok(row_to_submission(&row))
}

//! Released-marks service.
//!
//! Marks are denormalized per `(unit, student, component)` so the marks page
//! is a single query; quiz submissions and assignment marking upsert into
//! this table as components complete.

use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum MarkError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone)]
pub struct MarkRowRecord {
    pub unit_code: String,
    pub component: String,
    pub score: f64,
    pub max_score: f64,
}

/// Insert or replace one component mark for a student.
pub async fn upsert_mark(
    pool: &PgPool,
    unit_id: Uuid,
    user_id: Uuid,
    component: &str,
    score: f64,
    max_score: f64,
    graded_by: Option<Uuid>,
) -> Result<(), MarkError> {
    sqlx::query(
        r"INSERT INTO marks (id, unit_id, user_id, component, score, max_score, graded_by)
          VALUES ($1, $2, $3, $4, $5, $6, $7)
          ON CONFLICT (unit_id, user_id, component)
          DO UPDATE SET score = EXCLUDED.score, max_score = EXCLUDED.max_score,
                        graded_by = EXCLUDED.graded_by, graded_at = now()",
    )
    .bind(Uuid::new_v4())
    .bind(unit_id)
    .bind(user_id)
    .bind(component)
    .bind(score)
    .bind(max_score)
    .bind(graded_by)
    .execute(pool)
    .await?;
    Ok(())
}

/// All mark rows for a student, unit order then component order.
pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<MarkRowRecord>, MarkError> {
    let rows = sqlx::query(
        r"SELECT u.code AS unit_code, m.component, m.score, m.max_score
          FROM marks m JOIN units u ON u.id = m.unit_id
          WHERE m.user_id = $1
          ORDER BY u.code, m.component",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| MarkRowRecord {
            unit_code: row.get("unit_code"),
            component: row.get("component"),
            score: row.get("score"),
            max_score: row.get("max_score"),
        })
        .collect())
}

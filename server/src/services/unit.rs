//! Unit service: CRUD, lessons, enrolments, and access rules.
//!
//! DESIGN
//! ======
//! Access is role-shaped: admins see everything, teachers see units they
//! own, students see units they are enrolled in. Handlers call `ensure_*`
//! before touching unit-scoped rows so every route applies the same rules.

use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::services::session::{Role, SessionUser};

#[derive(Debug, thiserror::Error)]
pub enum UnitError {
    #[error("unit not found: {0}")]
    NotFound(Uuid),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("unit code already exists")]
    CodeTaken,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Row returned from unit queries.
#[derive(Debug, Clone)]
pub struct UnitRow {
    pub id: Uuid,
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub teacher_id: Uuid,
    pub teacher_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LessonRow {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub position: i32,
}

fn row_to_unit(row: &sqlx::postgres::PgRow) -> UnitRow {
    UnitRow {
        id: row.get("id"),
        code: row.get("code"),
        title: row.get("title"),
        description: row.get("description"),
        teacher_id: row.get("teacher_id"),
        teacher_name: row.try_get("teacher_name").ok(),
    }
}

// =============================================================================
// CRUD
// =============================================================================

/// Create a new unit owned by `teacher_id`.
///
/// # Errors
///
/// `CodeTaken` when the handbook code is already in use.
pub async fn create_unit(
    pool: &PgPool,
    code: &str,
    title: &str,
    description: Option<&str>,
    teacher_id: Uuid,
) -> Result<UnitRow, UnitError> {
    let id = Uuid::new_v4();
    let inserted = sqlx::query(
        r"INSERT INTO units (id, code, title, description, teacher_id)
          VALUES ($1, $2, $3, $4, $5)
          ON CONFLICT (code) DO NOTHING",
    )
    .bind(id)
    .bind(code)
    .bind(title)
    .bind(description)
    .bind(teacher_id)
    .execute(pool)
    .await?;

    if inserted.rows_affected() == 0 {
        return Err(UnitError::CodeTaken);
    }

    Ok(UnitRow {
        id,
        code: code.to_owned(),
        title: title.to_owned(),
        description: description.map(ToOwned::to_owned),
        teacher_id,
        teacher_name: None,
    })
}

/// List units visible to `user`, role-shaped.
pub async fn list_units(pool: &PgPool, user: &SessionUser) -> Result<Vec<UnitRow>, UnitError> {
    let rows = match user.role {
        Role::Admin => {
            sqlx::query(
                r"SELECT u.id, u.code, u.title, u.description, u.teacher_id, t.name AS teacher_name
                  FROM units u JOIN users t ON t.id = u.teacher_id
                  ORDER BY u.code",
            )
            .fetch_all(pool)
            .await?
        }
        Role::Teacher => {
            sqlx::query(
                r"SELECT u.id, u.code, u.title, u.description, u.teacher_id, t.name AS teacher_name
                  FROM units u JOIN users t ON t.id = u.teacher_id
                  WHERE u.teacher_id = $1
                  ORDER BY u.code",
            )
            .bind(user.id)
            .fetch_all(pool)
            .await?
        }
        Role::Student => {
            sqlx::query(
                r"SELECT u.id, u.code, u.title, u.description, u.teacher_id, t.name AS teacher_name
                  FROM units u
                  JOIN users t ON t.id = u.teacher_id
                  JOIN enrolments e ON e.unit_id = u.id
                  WHERE e.user_id = $1
                  ORDER BY u.code",
            )
            .bind(user.id)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(rows.iter().map(row_to_unit).collect())
}

/// Fetch one unit.
pub async fn get_unit(pool: &PgPool, unit_id: Uuid) -> Result<UnitRow, UnitError> {
    let row = sqlx::query(
        r"SELECT u.id, u.code, u.title, u.description, u.teacher_id, t.name AS teacher_name
          FROM units u JOIN users t ON t.id = u.teacher_id
          WHERE u.id = $1",
    )
    .bind(unit_id)
    .fetch_optional(pool)
    .await?
    .ok_or(UnitError::NotFound(unit_id))?;

    Ok(row_to_unit(&row))
}

// =============================================================================
// ACCESS RULES
// =============================================================================

/// Require view access: admin, owning teacher, or enrolled student.
pub async fn ensure_unit_access(
    pool: &PgPool,
    unit_id: Uuid,
    user: &SessionUser,
) -> Result<UnitRow, UnitError> {
    let unit = get_unit(pool, unit_id).await?;
    match user.role {
        Role::Admin => Ok(unit),
        Role::Teacher if unit.teacher_id == user.id => Ok(unit),
        Role::Student => {
            let enrolled = sqlx::query(
                "SELECT 1 AS present FROM enrolments WHERE unit_id = $1 AND user_id = $2",
            )
            .bind(unit_id)
            .bind(user.id)
            .fetch_optional(pool)
            .await?
            .is_some();
            if enrolled {
                Ok(unit)
            } else {
                Err(UnitError::Forbidden("not enrolled in this unit".to_owned()))
            }
        }
        _ => Err(UnitError::Forbidden("not your unit".to_owned())),
    }
}

/// Require manage access: admin or the owning teacher.
pub async fn ensure_unit_staff(
    pool: &PgPool,
    unit_id: Uuid,
    user: &SessionUser,
) -> Result<UnitRow, UnitError> {
    let unit = get_unit(pool, unit_id).await?;
    let allowed = user.role == Role::Admin || (user.role == Role::Teacher && unit.teacher_id == user.id);
    if allowed {
        Ok(unit)
    } else {
        Err(UnitError::Forbidden("unit staff only".to_owned()))
    }
}

// =============================================================================
// LESSONS & ENROLMENTS
// =============================================================================

/// Lessons for a unit, in position order.
pub async fn list_lessons(pool: &PgPool, unit_id: Uuid) -> Result<Vec<LessonRow>, UnitError> {
    let rows = sqlx::query(
        "SELECT id, unit_id, title, content, position FROM lessons WHERE unit_id = $1 ORDER BY position, created_at",
    )
    .bind(unit_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| LessonRow {
            id: row.get("id"),
            unit_id: row.get("unit_id"),
            title: row.get("title"),
            content: row.get("content"),
            position: row.get("position"),
        })
        .collect())
}

/// Append a lesson at the end of the unit.
pub async fn create_lesson(
    pool: &PgPool,
    unit_id: Uuid,
    title: &str,
    content: Option<&str>,
) -> Result<LessonRow, UnitError> {
    let id = Uuid::new_v4();
    let row = sqlx::query(
        r"INSERT INTO lessons (id, unit_id, title, content, position)
          SELECT $1, $2, $3, $4, COALESCE(MAX(position) + 1, 0) FROM lessons WHERE unit_id = $2
          RETURNING position",
    )
    .bind(id)
    .bind(unit_id)
    .bind(title)
    .bind(content)
    .fetch_one(pool)
    .await?;

    Ok(LessonRow {
        id,
        unit_id,
        title: title.to_owned(),
        content: content.map(ToOwned::to_owned),
        position: row.get("position"),
    })
}

/// Enrol a student into a unit. Idempotent.
pub async fn enrol_user(pool: &PgPool, unit_id: Uuid, user_id: Uuid) -> Result<(), UnitError> {
    sqlx::query(
        "INSERT INTO enrolments (unit_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(unit_id)
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(())
}

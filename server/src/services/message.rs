//! Direct-message service.

use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("message not found: {0}")]
    NotFound(Uuid),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone)]
pub struct MessageRow {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub sender_name: String,
    pub recipient_id: Uuid,
    pub body: String,
    pub sent_at: time::OffsetDateTime,
    pub read_at: Option<time::OffsetDateTime>,
}

fn row_to_message(row: &sqlx::postgres::PgRow) -> MessageRow {
    MessageRow {
        id: row.get("id"),
        sender_id: row.get("sender_id"),
        sender_name: row.get("sender_name"),
        recipient_id: row.get("recipient_id"),
        body: row.get("body"),
        sent_at: row.get("sent_at"),
        read_at: row.get("read_at"),
    }
}

/// Send a message, returning the stored row with the sender's name joined.
pub async fn send(
    pool: &PgPool,
    sender_id: Uuid,
    recipient_id: Uuid,
    body: &str,
) -> Result<MessageRow, MessageError> {
    let id = Uuid::new_v4();
    let row = sqlx::query(
        r"INSERT INTO messages (id, sender_id, recipient_id, body)
          VALUES ($1, $2, $3, $4)
          RETURNING id, sender_id,
                    (SELECT name FROM users WHERE id = $2) AS sender_name,
                    recipient_id, body, sent_at, read_at",
    )
    .bind(id)
    .bind(sender_id)
    .bind(recipient_id)
    .bind(body)
    .fetch_one(pool)
    .await?;

    Ok(row_to_message(&row))
}

/// Inbox and sent mail for a user, newest first.
pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<MessageRow>, MessageError> {
    let rows = sqlx::query(
        r"SELECT m.id, m.sender_id, s.name AS sender_name, m.recipient_id, m.body, m.sent_at, m.read_at
          FROM messages m JOIN users s ON s.id = m.sender_id
          WHERE m.sender_id = $1 OR m.recipient_id = $1
          ORDER BY m.sent_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(row_to_message).collect())
}

/// Mark a received message as read. Only the recipient may do this; marking
/// an already-read message is a no-op.
pub async fn mark_read(
    pool: &PgPool,
    message_id: Uuid,
    recipient_id: Uuid,
) -> Result<(), MessageError> {
    let updated = sqlx::query(
        r"UPDATE messages SET read_at = COALESCE(read_at, now())
          WHERE id = $1 AND recipient_id = $2",
    )
    .bind(message_id)
    .bind(recipient_id)
    .execute(pool)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(MessageError::NotFound(message_id));
    }
    Ok(())
}

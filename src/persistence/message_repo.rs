//! Chat message repository for `SQLite` persistence.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::models::message::ChatMessage;
use crate::models::principal::Role;
use crate::{AppError, Result};

use super::db::Database;

/// Repository for chat message records.
#[derive(Clone)]
pub struct MessageRepo {
    db: Arc<Database>,
}

/// Internal row struct for `SQLite` deserialization.
#[derive(sqlx::FromRow)]
struct MessageRow {
    id: String,
    shipment_id: String,
    pool_id: Option<String>,
    sender_id: String,
    sender_role: String,
    receiver_id: String,
    body: String,
    created_at: String,
    read: i64,
    read_at: Option<String>,
}

const MESSAGE_COLUMNS: &str = "id, shipment_id, pool_id, sender_id, sender_role, receiver_id,
     body, created_at, read, read_at";

impl MessageRow {
    fn into_message(self) -> Result<ChatMessage> {
        let sender_role = Role::parse(&self.sender_role)
            .ok_or_else(|| AppError::Db(format!("invalid sender_role: {}", self.sender_role)))?;
        let created_at = parse_timestamp(&self.created_at)?;
        let read_at = self.read_at.as_deref().map(parse_timestamp).transpose()?;

        Ok(ChatMessage {
            id: self.id,
            shipment_id: self.shipment_id,
            pool_id: self.pool_id,
            sender_id: self.sender_id,
            sender_role,
            receiver_id: self.receiver_id,
            body: self.body,
            created_at,
            read: self.read != 0,
            read_at,
        })
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| AppError::Db(format!("invalid timestamp: {e}")))
}

impl MessageRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Insert a new chat message record.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the database insert fails.
    pub async fn insert(&self, msg: &ChatMessage) -> Result<ChatMessage> {
        let created_at = msg.created_at.to_rfc3339();
        let read_at = msg.read_at.map(|ts| ts.to_rfc3339());

        sqlx::query(
            "INSERT INTO chat_message (id, shipment_id, pool_id, sender_id, sender_role,
                 receiver_id, body, created_at, read, read_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(&msg.id)
        .bind(&msg.shipment_id)
        .bind(&msg.pool_id)
        .bind(&msg.sender_id)
        .bind(msg.sender_role.as_str())
        .bind(&msg.receiver_id)
        .bind(&msg.body)
        .bind(&created_at)
        .bind(i64::from(msg.read))
        .bind(&read_at)
        .execute(self.db.as_ref())
        .await?;

        Ok(msg.clone())
    }

    /// Fetch the complete history of a shipment's thread, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn fetch_by_shipment(&self, shipment_id: &str, cap: u32) -> Result<Vec<ChatMessage>> {
        let rows: Vec<MessageRow> = sqlx::query_as(&format!(
            "SELECT {MESSAGE_COLUMNS}
             FROM chat_message
             WHERE shipment_id = ?1
             ORDER BY created_at ASC, id ASC
             LIMIT ?2",
        ))
        .bind(shipment_id)
        .bind(i64::from(cap))
        .fetch_all(self.db.as_ref())
        .await?;

        rows.into_iter().map(MessageRow::into_message).collect()
    }

    /// Fetch all pool messages where `principal_id` is sender or receiver,
    /// oldest first, across every member sub-thread.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn fetch_pool_for_participant(
        &self,
        pool_id: &str,
        principal_id: &str,
        cap: u32,
    ) -> Result<Vec<ChatMessage>> {
        let rows: Vec<MessageRow> = sqlx::query_as(&format!(
            "SELECT {MESSAGE_COLUMNS}
             FROM chat_message
             WHERE pool_id = ?1 AND (sender_id = ?2 OR receiver_id = ?2)
             ORDER BY created_at ASC, id ASC
             LIMIT ?3",
        ))
        .bind(pool_id)
        .bind(principal_id)
        .bind(i64::from(cap))
        .fetch_all(self.db.as_ref())
        .await?;

        rows.into_iter().map(MessageRow::into_message).collect()
    }

    /// Mark as read every unread message addressed to `receiver_id` in the
    /// given shipment thread, stamping `read_at` with `now`.
    ///
    /// Returns the number of rows updated. Idempotent: already-read rows
    /// are left untouched, so a second invocation updates zero rows.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the update fails.
    pub async fn mark_read_shipment(
        &self,
        shipment_id: &str,
        receiver_id: &str,
        now: DateTime<Utc>,
    ) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE chat_message SET read = 1, read_at = ?1
             WHERE shipment_id = ?2 AND receiver_id = ?3 AND read = 0",
        )
        .bind(now.to_rfc3339())
        .bind(shipment_id)
        .bind(receiver_id)
        .execute(self.db.as_ref())
        .await?;
        Ok(result.rows_affected())
    }

    /// Mark as read every unread message addressed to `receiver_id` across
    /// all sub-threads of a pool, stamping `read_at` with `now`.
    ///
    /// Returns the number of rows updated.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the update fails.
    pub async fn mark_read_pool(
        &self,
        pool_id: &str,
        receiver_id: &str,
        now: DateTime<Utc>,
    ) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE chat_message SET read = 1, read_at = ?1
             WHERE pool_id = ?2 AND receiver_id = ?3 AND read = 0",
        )
        .bind(now.to_rfc3339())
        .bind(pool_id)
        .bind(receiver_id)
        .execute(self.db.as_ref())
        .await?;
        Ok(result.rows_affected())
    }

    /// Count unread messages addressed to `receiver_id` across all threads.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn count_unread(&self, receiver_id: &str) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM chat_message WHERE receiver_id = ?1 AND read = 0",
        )
        .bind(receiver_id)
        .fetch_one(self.db.as_ref())
        .await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// Count unread messages addressed to `receiver_id` in one shipment thread.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn count_unread_shipment(&self, shipment_id: &str, receiver_id: &str) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM chat_message
             WHERE shipment_id = ?1 AND receiver_id = ?2 AND read = 0",
        )
        .bind(shipment_id)
        .bind(receiver_id)
        .fetch_one(self.db.as_ref())
        .await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    /// Count unread messages addressed to `receiver_id` across a pool.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn count_unread_pool(&self, pool_id: &str, receiver_id: &str) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM chat_message
             WHERE pool_id = ?1 AND receiver_id = ?2 AND read = 0",
        )
        .bind(pool_id)
        .bind(receiver_id)
        .fetch_one(self.db.as_ref())
        .await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}

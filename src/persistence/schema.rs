//! `SQLite` schema bootstrap logic.
//!
//! All table definitions use `CREATE TABLE IF NOT EXISTS` — safe to
//! re-run on every server startup. Produces a convergent result.

use sqlx::SqlitePool;

use crate::Result;

/// Apply all table definitions to the connected `SQLite` database.
///
/// The shipment, pool, and profile tables mirror the booking system's
/// directory; the routing engine only reads them. Only `chat_message`
/// is written by this crate.
///
/// # Errors
///
/// Returns `AppError::Db` if any DDL statement fails.
pub async fn bootstrap_schema(pool: &SqlitePool) -> Result<()> {
    let ddl = r"
CREATE TABLE IF NOT EXISTS shipment (
    id              TEXT PRIMARY KEY NOT NULL,
    tracking_code   TEXT NOT NULL,
    customer_id     TEXT,
    agent_id        TEXT,
    pool_id         TEXT
);

CREATE TABLE IF NOT EXISTS shipment_pool (
    id                TEXT PRIMARY KEY NOT NULL,
    code              TEXT NOT NULL,
    pickup_agent_id   TEXT,
    delivery_agent_id TEXT
);

CREATE TABLE IF NOT EXISTS profile (
    principal_id    TEXT NOT NULL,
    role            TEXT NOT NULL CHECK(role IN ('customer','agent')),
    display_name    TEXT NOT NULL,
    avatar_url      TEXT,
    PRIMARY KEY (principal_id, role)
);

CREATE TABLE IF NOT EXISTS chat_message (
    id              TEXT PRIMARY KEY NOT NULL,
    shipment_id     TEXT NOT NULL,
    pool_id         TEXT,
    sender_id       TEXT NOT NULL,
    sender_role     TEXT NOT NULL CHECK(sender_role IN ('customer','agent')),
    receiver_id     TEXT NOT NULL,
    body            TEXT NOT NULL,
    created_at      TEXT NOT NULL,
    read            INTEGER NOT NULL DEFAULT 0,
    read_at         TEXT
);

CREATE INDEX IF NOT EXISTS idx_shipment_pool ON shipment(pool_id);
CREATE INDEX IF NOT EXISTS idx_message_shipment ON chat_message(shipment_id);
CREATE INDEX IF NOT EXISTS idx_message_pool ON chat_message(pool_id);
CREATE INDEX IF NOT EXISTS idx_message_receiver_unread ON chat_message(receiver_id, read);
";

    sqlx::raw_sql(ddl).execute(pool).await?;
    Ok(())
}

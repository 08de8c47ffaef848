//! Pool directory lookups (read-only).

use std::sync::Arc;

use crate::models::shipment::{Pool, Shipment};
use crate::{AppError, Result};

use super::db::Database;

/// Read-only repository over the booking system's pool table.
#[derive(Clone)]
pub struct PoolRepo {
    db: Arc<Database>,
}

/// Internal row struct for `SQLite` deserialization.
#[derive(sqlx::FromRow)]
struct PoolRow {
    id: String,
    code: String,
    pickup_agent_id: Option<String>,
    delivery_agent_id: Option<String>,
}

impl PoolRow {
    fn into_pool(self) -> Pool {
        Pool {
            id: self.id,
            code: self.code,
            pickup_agent_id: self.pickup_agent_id,
            delivery_agent_id: self.delivery_agent_id,
        }
    }
}

#[derive(sqlx::FromRow)]
struct MemberRow {
    id: String,
    tracking_code: String,
    customer_id: Option<String>,
    agent_id: Option<String>,
    pool_id: Option<String>,
}

impl PoolRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Look up a pool by id.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no pool with that id exists, or
    /// `AppError::Db` if the query fails.
    pub async fn get(&self, pool_id: &str) -> Result<Pool> {
        let row: Option<PoolRow> = sqlx::query_as(
            "SELECT id, code, pickup_agent_id, delivery_agent_id
             FROM shipment_pool WHERE id = ?1",
        )
        .bind(pool_id)
        .fetch_optional(self.db.as_ref())
        .await?;

        row.map(PoolRow::into_pool)
            .ok_or_else(|| AppError::NotFound(format!("pool {pool_id}")))
    }

    /// List the member shipments of a pool, in stable id order.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` if the query fails.
    pub async fn member_shipments(&self, pool_id: &str) -> Result<Vec<Shipment>> {
        let rows: Vec<MemberRow> = sqlx::query_as(
            "SELECT id, tracking_code, customer_id, agent_id, pool_id
             FROM shipment WHERE pool_id = ?1
             ORDER BY id ASC",
        )
        .bind(pool_id)
        .fetch_all(self.db.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| Shipment {
                id: row.id,
                tracking_code: row.tracking_code,
                customer_id: row.customer_id,
                agent_id: row.agent_id,
                pool_id: row.pool_id,
            })
            .collect())
    }
}

//! Shipment directory lookups (read-only).

use std::sync::Arc;

use crate::models::shipment::Shipment;
use crate::{AppError, Result};

use super::db::Database;

/// Read-only repository over the booking system's shipment table.
#[derive(Clone)]
pub struct ShipmentRepo {
    db: Arc<Database>,
}

/// Internal row struct for `SQLite` deserialization.
#[derive(sqlx::FromRow)]
struct ShipmentRow {
    id: String,
    tracking_code: String,
    customer_id: Option<String>,
    agent_id: Option<String>,
    pool_id: Option<String>,
}

impl ShipmentRow {
    fn into_shipment(self) -> Shipment {
        Shipment {
            id: self.id,
            tracking_code: self.tracking_code,
            customer_id: self.customer_id,
            agent_id: self.agent_id,
            pool_id: self.pool_id,
        }
    }
}

impl ShipmentRepo {
    /// Create a new repository instance.
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Look up a shipment by id.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if no shipment with that id exists, or
    /// `AppError::Db` if the query fails.
    pub async fn get(&self, shipment_id: &str) -> Result<Shipment> {
        let row: Option<ShipmentRow> = sqlx::query_as(
            "SELECT id, tracking_code, customer_id, agent_id, pool_id
             FROM shipment WHERE id = ?1",
        )
        .bind(shipment_id)
        .fetch_optional(self.db.as_ref())
        .await?;

        row.map(ShipmentRow::into_shipment)
            .ok_or_else(|| AppError::NotFound(format!("shipment {shipment_id}")))
    }
}

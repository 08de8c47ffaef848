//! Shared test helpers for router-level integration tests.
//!
//! Provides reusable construction of the in-memory database, directory
//! fixture rows, and a recording notifier so individual test modules can
//! focus on behaviour rather than boilerplate.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use courier_chat::chat::router::ChatRouter;
use courier_chat::notify::{Notification, Notifier};
use courier_chat::persistence::db::{self, Database};
use courier_chat::{AppError, Result};

/// Open an in-memory database with the schema applied.
pub async fn test_db() -> Arc<Database> {
    Arc::new(db::connect_memory().await.expect("in-memory db"))
}

/// Insert a shipment directory row.
pub async fn insert_shipment(
    db: &Database,
    id: &str,
    tracking_code: &str,
    customer_id: Option<&str>,
    agent_id: Option<&str>,
    pool_id: Option<&str>,
) {
    sqlx::query(
        "INSERT INTO shipment (id, tracking_code, customer_id, agent_id, pool_id)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(id)
    .bind(tracking_code)
    .bind(customer_id)
    .bind(agent_id)
    .bind(pool_id)
    .execute(db)
    .await
    .expect("insert shipment");
}

/// Insert a pool directory row.
pub async fn insert_pool(
    db: &Database,
    id: &str,
    code: &str,
    pickup_agent_id: Option<&str>,
    delivery_agent_id: Option<&str>,
) {
    sqlx::query(
        "INSERT INTO shipment_pool (id, code, pickup_agent_id, delivery_agent_id)
         VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(id)
    .bind(code)
    .bind(pickup_agent_id)
    .bind(delivery_agent_id)
    .execute(db)
    .await
    .expect("insert pool");
}

/// Insert a display profile row.
pub async fn insert_profile(db: &Database, principal_id: &str, role: &str, display_name: &str) {
    sqlx::query(
        "INSERT INTO profile (principal_id, role, display_name, avatar_url)
         VALUES (?1, ?2, ?3, NULL)",
    )
    .bind(principal_id)
    .bind(role)
    .bind(display_name)
    .execute(db)
    .await
    .expect("insert profile");
}

/// Simulate the booking system assigning an agent to a shipment.
pub async fn assign_agent(db: &Database, shipment_id: &str, agent_id: &str) {
    sqlx::query("UPDATE shipment SET agent_id = ?1 WHERE id = ?2")
        .bind(agent_id)
        .bind(shipment_id)
        .execute(db)
        .await
        .expect("assign agent");
}

/// Notifier that records every dispatched notification.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    /// Snapshot of everything dispatched so far.
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().expect("notifier lock").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(
        &self,
        notification: Notification,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        self.sent.lock().expect("notifier lock").push(notification);
        Box::pin(async { Ok(()) })
    }
}

/// Notifier that always fails, for verifying best-effort dispatch.
#[derive(Clone, Copy, Default)]
pub struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn notify(
        &self,
        _notification: Notification,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async { Err(AppError::Notify("delivery channel down".into())) })
    }
}

/// Build a router over `db` with a recording notifier.
pub fn test_router(db: &Arc<Database>) -> (ChatRouter, RecordingNotifier) {
    let notifier = RecordingNotifier::default();
    let router = ChatRouter::new(Arc::clone(db), Arc::new(notifier.clone()), 500);
    (router, notifier)
}

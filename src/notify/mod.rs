//! Outbound notification abstraction.
//!
//! The [`Notifier`] trait decouples the routing core from the delivery
//! channel (push, email, SMS gateway). Dispatch is fire-and-forget from
//! the router's perspective: a failed delivery is logged and swallowed,
//! never surfaced to the sender.

pub mod webhook;

use std::future::Future;
use std::pin::Pin;

use serde::Serialize;

use crate::Result;

/// Payload handed to the delivery channel.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Notification {
    /// Account id of the principal being notified.
    pub recipient_id: String,
    /// Short title, names the sender.
    pub title: String,
    /// Body excerpt of the triggering message.
    pub body: String,
    /// Notification category for client-side routing.
    pub category: String,
    /// Human reference the client can deep-link on (tracking or pool code).
    pub link_ref: String,
}

/// Channel-agnostic notification dispatch interface.
pub trait Notifier: Send + Sync {
    /// Dispatch one notification.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Notify`](crate::AppError::Notify) if delivery
    /// fails; callers treat the outcome as best-effort.
    fn notify(
        &self,
        notification: Notification,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// No-op notifier used when no delivery channel is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(
        &self,
        _notification: Notification,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async { Ok(()) })
    }
}

//! Conversation message model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::principal::Role;

/// Addressable conversation thread.
///
/// A pooled conversation has no group-wide thread; each member customer's
/// exchange with the pool agents is its own sub-thread keyed by their
/// shipment id. The `shipment_id` inside `Pooled` is the optional
/// sub-thread selector (required when an agent sends, optional when
/// listing).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConversationRef {
    /// A single-shipment thread.
    Single {
        /// Shipment identifier.
        shipment_id: String,
    },
    /// A pooled-shipment thread, optionally scoped to one member sub-thread.
    Pooled {
        /// Pool identifier.
        pool_id: String,
        /// Member shipment sub-thread selector.
        shipment_id: Option<String>,
    },
}

/// A persisted chat message.
///
/// Immutable once created except for read state: the sender and receiver
/// are resolved at send time and never recomputed, even if the underlying
/// agent assignment later changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    /// Unique record identifier (UUID v4 prefixed `msg:`).
    pub id: String,
    /// Shipment the message belongs to (always set for single threads,
    /// identifies the sub-thread for pooled ones).
    pub shipment_id: String,
    /// Pool the message belongs to, when sent in a pooled conversation.
    pub pool_id: Option<String>,
    /// Sending principal's account id.
    pub sender_id: String,
    /// Sending principal's role at send time.
    pub sender_role: Role,
    /// Resolved counterparty's account id.
    pub receiver_id: String,
    /// Message body text.
    pub body: String,
    /// Server-assigned creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Whether the receiver has read the message.
    pub read: bool,
    /// When the receiver read the message (set once, never cleared).
    pub read_at: Option<DateTime<Utc>>,
}

impl ChatMessage {
    /// Construct a new unread message with a generated identifier.
    #[must_use]
    pub fn new(
        shipment_id: String,
        pool_id: Option<String>,
        sender_id: String,
        sender_role: Role,
        receiver_id: String,
        body: String,
    ) -> Self {
        Self {
            id: format!("msg:{}", Uuid::new_v4()),
            shipment_id,
            pool_id,
            sender_id,
            sender_role,
            receiver_id,
            body,
            created_at: Utc::now(),
            read: false,
            read_at: None,
        }
    }
}

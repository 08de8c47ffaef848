//! Shipment and pool directory records.
//!
//! These are read-only views of the booking system's data. The routing
//! engine never mutates them; assignment changes arrive through the
//! directory tables between requests.

use serde::{Deserialize, Serialize};

/// One parcel with at most one customer and one agent directly assigned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Shipment {
    /// Unique shipment identifier.
    pub id: String,
    /// Human-facing tracking code used in notification texts.
    pub tracking_code: String,
    /// Owning customer account id (unset only transiently after booking).
    pub customer_id: Option<String>,
    /// Directly assigned agent account id.
    pub agent_id: Option<String>,
    /// Owning pool id when the shipment travels in a pooled transport.
    pub pool_id: Option<String>,
}

/// A pooled transport grouping several shipments under shared agents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pool {
    /// Unique pool identifier.
    pub id: String,
    /// Human-facing pool code used in notification texts.
    pub code: String,
    /// Agent responsible for the pickup phase.
    pub pickup_agent_id: Option<String>,
    /// Agent responsible for the delivery phase.
    pub delivery_agent_id: Option<String>,
}

impl Pool {
    /// Whether `agent_id` holds either of the pool's agent roles.
    #[must_use]
    pub fn has_agent(&self, agent_id: &str) -> bool {
        self.pickup_agent_id.as_deref() == Some(agent_id)
            || self.delivery_agent_id.as_deref() == Some(agent_id)
    }
}

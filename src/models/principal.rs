//! Authenticated principal model.

use serde::{Deserialize, Serialize};

/// Role tag carried by every message sender and receiver.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Shipment owner.
    Customer,
    /// Pickup or delivery agent.
    Agent,
}

impl Role {
    /// Storage string for the role tag.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Agent => "agent",
        }
    }

    /// Parse a storage string back into a role tag.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "customer" => Some(Self::Customer),
            "agent" => Some(Self::Agent),
            _ => None,
        }
    }
}

/// An authenticated actor, immutable for the lifetime of a request.
///
/// Represented as a tagged union so that access evaluation and receiver
/// resolution can match exhaustively on the role instead of consulting a
/// separate role field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "role", content = "id", rename_all = "snake_case")]
pub enum Principal {
    /// A customer principal with their stable account id.
    Customer(String),
    /// An agent principal with their stable account id.
    Agent(String),
}

impl Principal {
    /// Stable account identifier of the principal.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Customer(id) | Self::Agent(id) => id,
        }
    }

    /// Role tag of the principal.
    #[must_use]
    pub fn role(&self) -> Role {
        match self {
            Self::Customer(_) => Role::Customer,
            Self::Agent(_) => Role::Agent,
        }
    }
}

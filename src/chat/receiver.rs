//! Receiver resolution: computing the counterparty of a new message.
//!
//! Deterministic and side-effect-free. Fallback chains are written as
//! explicit ordered candidate lists evaluated front-to-back, keeping the
//! delivery-before-pickup tie-break visible and testable in isolation.

use crate::models::principal::{Principal, Role};
use crate::models::shipment::{Pool, Shipment};
use crate::{AppError, Result};

/// The resolved counterparty of a new message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receiver {
    /// Counterparty's account id.
    pub id: String,
    /// Counterparty's role.
    pub role: Role,
}

/// Return the first assigned candidate from a priority-ordered list.
fn first_assigned<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates.iter().find_map(|c| *c)
}

/// Resolve the receiver for a send in a single-shipment conversation.
///
/// Customer sends route to the assigned agent, falling back to the owning
/// pool's delivery agent, then its pickup agent. Delivery takes priority
/// because delivery-phase communication supersedes pickup-phase once both
/// are assigned. Agent sends route to the shipment's customer.
///
/// # Errors
///
/// Returns `AppError::NoCounterparty` when no candidate is assigned.
pub fn resolve_single(
    shipment: &Shipment,
    pool: Option<&Pool>,
    sender: &Principal,
) -> Result<Receiver> {
    match sender {
        Principal::Customer(_) => {
            let candidates = [
                shipment.agent_id.as_deref(),
                pool.and_then(|p| p.delivery_agent_id.as_deref()),
                pool.and_then(|p| p.pickup_agent_id.as_deref()),
            ];
            first_assigned(&candidates)
                .map(|id| Receiver {
                    id: id.to_owned(),
                    role: Role::Agent,
                })
                .ok_or_else(|| {
                    AppError::NoCounterparty(format!(
                        "no agent assigned yet for shipment {}",
                        shipment.id
                    ))
                })
        }
        Principal::Agent(_) => shipment
            .customer_id
            .as_deref()
            .map(|id| Receiver {
                id: id.to_owned(),
                role: Role::Customer,
            })
            .ok_or_else(|| {
                AppError::NoCounterparty(format!("shipment {} has no customer", shipment.id))
            }),
    }
}

/// Resolve the receiver for a send in a pooled conversation.
///
/// An agent must name a target member sub-thread (`target`), whose customer
/// becomes the receiver: a pool has many customers, so the counterparty
/// cannot be implied. A customer's send routes to the pool's delivery
/// agent, falling back to the pickup agent.
///
/// The caller is responsible for looking up `target` and verifying pool
/// membership before resolution.
///
/// # Errors
///
/// Returns `AppError::MissingTarget` when an agent sends without a target,
/// and `AppError::NoCounterparty` when the resolved slot is unassigned.
pub fn resolve_pooled(
    pool: &Pool,
    target: Option<&Shipment>,
    sender: &Principal,
) -> Result<Receiver> {
    match sender {
        Principal::Agent(_) => {
            let Some(member) = target else {
                return Err(AppError::MissingTarget(
                    "specify which customer to message".into(),
                ));
            };
            member
                .customer_id
                .as_deref()
                .map(|id| Receiver {
                    id: id.to_owned(),
                    role: Role::Customer,
                })
                .ok_or_else(|| {
                    AppError::NoCounterparty(format!("shipment {} has no customer", member.id))
                })
        }
        Principal::Customer(_) => {
            let candidates = [
                pool.delivery_agent_id.as_deref(),
                pool.pickup_agent_id.as_deref(),
            ];
            first_assigned(&candidates)
                .map(|id| Receiver {
                    id: id.to_owned(),
                    role: Role::Agent,
                })
                .ok_or_else(|| {
                    AppError::NoCounterparty(format!("pool {} has no agents assigned", pool.id))
                })
        }
    }
}

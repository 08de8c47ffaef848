//! Conversation access evaluation.
//!
//! Boolean authorization gate, evaluated before any read or write on a
//! conversation. Pure over loaded directory records so the rules can be
//! tested without a database.

use crate::models::principal::Principal;
use crate::models::shipment::{Pool, Shipment};
use crate::{AppError, Result};

/// The capacity in which access was granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
    /// Principal is the conversation's customer.
    Customer,
    /// Principal is a directly assigned or pool-level agent.
    Agent,
}

/// Evaluate access to a single-shipment conversation.
///
/// A customer is authorized iff they own the shipment. An agent is
/// authorized iff they are directly assigned, falling through to the
/// owning pool's pickup or delivery agent: pooled shipments are serviced
/// by the pool's agents collectively, so a per-shipment assignment is not
/// required.
///
/// # Errors
///
/// Returns `AppError::AccessDenied` if neither authorization holds.
pub fn check_shipment_access(
    shipment: &Shipment,
    pool: Option<&Pool>,
    principal: &Principal,
) -> Result<Grant> {
    match principal {
        Principal::Customer(id) => {
            if shipment.customer_id.as_deref() == Some(id) {
                return Ok(Grant::Customer);
            }
        }
        Principal::Agent(id) => {
            if shipment.agent_id.as_deref() == Some(id) {
                return Ok(Grant::Agent);
            }
            if pool.is_some_and(|p| p.has_agent(id)) {
                return Ok(Grant::Agent);
            }
        }
    }

    Err(AppError::AccessDenied(format!(
        "principal {} is not a participant of shipment {}",
        principal.id(),
        shipment.id
    )))
}

/// Evaluate access to a pooled conversation at the pool level.
///
/// Used when listing without a specific sub-thread. An agent is authorized
/// iff they hold one of the pool's two agent roles; a customer iff they
/// own at least one member shipment.
///
/// # Errors
///
/// Returns `AppError::AccessDenied` if neither authorization holds.
pub fn check_pool_access(
    pool: &Pool,
    members: &[Shipment],
    principal: &Principal,
) -> Result<Grant> {
    match principal {
        Principal::Agent(id) => {
            if pool.has_agent(id) {
                return Ok(Grant::Agent);
            }
        }
        Principal::Customer(id) => {
            if members
                .iter()
                .any(|s| s.customer_id.as_deref() == Some(id))
            {
                return Ok(Grant::Customer);
            }
        }
    }

    Err(AppError::AccessDenied(format!(
        "principal {} is not a participant of pool {}",
        principal.id(),
        pool.id
    )))
}

/// Evaluate access to one member sub-thread of a pooled conversation.
///
/// Sub-threads are private to the member customer and the pool's agents:
/// another customer of the same pool passes pool-level access but must not
/// see this sub-thread's history.
///
/// # Errors
///
/// Returns `AppError::AccessDenied` if the principal is neither a pool
/// agent nor the sub-thread's own customer.
pub fn check_subthread_access(
    pool: &Pool,
    member: &Shipment,
    principal: &Principal,
) -> Result<Grant> {
    match principal {
        Principal::Agent(id) => {
            if pool.has_agent(id) || member.agent_id.as_deref() == Some(id) {
                return Ok(Grant::Agent);
            }
        }
        Principal::Customer(id) => {
            if member.customer_id.as_deref() == Some(id) {
                return Ok(Grant::Customer);
            }
        }
    }

    Err(AppError::AccessDenied(format!(
        "principal {} may not view the thread of shipment {}",
        principal.id(),
        member.id
    )))
}

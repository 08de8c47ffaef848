//! Message router: orchestrates access evaluation, receiver resolution,
//! persistence, and notification dispatch.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::chat::{access, identity::IdentityResolver, receiver};
use crate::models::message::{ChatMessage, ConversationRef};
use crate::models::principal::Principal;
use crate::models::shipment::{Pool, Shipment};
use crate::notify::{Notification, Notifier};
use crate::persistence::db::Database;
use crate::persistence::message_repo::MessageRepo;
use crate::persistence::pool_repo::PoolRepo;
use crate::persistence::profile_repo::ProfileRepo;
use crate::persistence::shipment_repo::ShipmentRepo;
use crate::{AppError, Result};

/// Category tag attached to every chat notification.
const NOTIFY_CATEGORY: &str = "chat_message";

/// Maximum characters of message body quoted in a notification.
const EXCERPT_CHARS: usize = 120;

/// Orchestrator for the four conversation operations.
///
/// Holds the directory and message repositories, the identity resolver,
/// and the notification channel. One instance is shared across requests.
#[derive(Clone)]
pub struct ChatRouter {
    shipments: ShipmentRepo,
    pools: PoolRepo,
    messages: MessageRepo,
    identity: IdentityResolver,
    notifier: Arc<dyn Notifier>,
    list_page_cap: u32,
}

impl ChatRouter {
    /// Create a router over the shared database and notification channel.
    #[must_use]
    pub fn new(db: Arc<Database>, notifier: Arc<dyn Notifier>, list_page_cap: u32) -> Self {
        Self {
            shipments: ShipmentRepo::new(Arc::clone(&db)),
            pools: PoolRepo::new(Arc::clone(&db)),
            messages: MessageRepo::new(Arc::clone(&db)),
            identity: IdentityResolver::new(ProfileRepo::new(db)),
            notifier,
            list_page_cap,
        }
    }

    /// List the messages of a conversation, oldest first.
    ///
    /// Single-shipment threads return their complete history. A pooled
    /// conversation without a sub-thread selector returns only messages
    /// where the principal is sender or receiver; with a selector it
    /// returns the sub-thread's complete history, which is restricted to
    /// the pool's agents and the sub-thread's own customer.
    ///
    /// # Errors
    ///
    /// Returns `AppError::AccessDenied` if the principal may not view the
    /// conversation, `AppError::NotFound` for unknown ids, or
    /// `AppError::Db` on query failure.
    pub async fn list_messages(
        &self,
        conversation: &ConversationRef,
        principal: &Principal,
    ) -> Result<Vec<ChatMessage>> {
        match conversation {
            ConversationRef::Single { shipment_id } => {
                let (shipment, pool) = self.load_shipment_with_pool(shipment_id).await?;
                access::check_shipment_access(&shipment, pool.as_ref(), principal)?;
                self.messages
                    .fetch_by_shipment(&shipment.id, self.list_page_cap)
                    .await
            }
            ConversationRef::Pooled {
                pool_id,
                shipment_id: None,
            } => {
                let (pool, members) = self.load_pool_with_members(pool_id).await?;
                access::check_pool_access(&pool, &members, principal)?;
                self.messages
                    .fetch_pool_for_participant(&pool.id, principal.id(), self.list_page_cap)
                    .await
            }
            ConversationRef::Pooled {
                pool_id,
                shipment_id: Some(target_id),
            } => {
                let (pool, members) = self.load_pool_with_members(pool_id).await?;
                let member = find_member(&members, target_id, &pool.id)?;
                access::check_subthread_access(&pool, member, principal)?;
                self.messages
                    .fetch_by_shipment(&member.id, self.list_page_cap)
                    .await
            }
        }
    }

    /// Send a message into a conversation.
    ///
    /// Verifies access, resolves the counterparty, persists the message,
    /// then dispatches a best-effort notification to the receiver. The
    /// persisted message is authoritative even when notification delivery
    /// fails.
    ///
    /// # Errors
    ///
    /// Returns `AppError::AccessDenied`, `AppError::NotFound`,
    /// `AppError::MissingTarget`, or `AppError::NoCounterparty` as client
    /// errors, and `AppError::Db` when persistence fails.
    pub async fn send(
        &self,
        conversation: &ConversationRef,
        principal: &Principal,
        body: String,
    ) -> Result<ChatMessage> {
        match conversation {
            ConversationRef::Single { shipment_id } => {
                let (shipment, pool) = self.load_shipment_with_pool(shipment_id).await?;
                access::check_shipment_access(&shipment, pool.as_ref(), principal)?;
                let counterparty = receiver::resolve_single(&shipment, pool.as_ref(), principal)?;

                let message = ChatMessage::new(
                    shipment.id.clone(),
                    shipment.pool_id.clone(),
                    principal.id().to_owned(),
                    principal.role(),
                    counterparty.id,
                    body,
                );
                let saved = self.messages.insert(&message).await?;
                info!(message_id = %saved.id, shipment_id = %shipment.id, "message sent");
                self.dispatch_notification(&saved, principal, &shipment.tracking_code)
                    .await;
                Ok(saved)
            }
            ConversationRef::Pooled {
                pool_id,
                shipment_id,
            } => {
                let (pool, members) = self.load_pool_with_members(pool_id).await?;
                access::check_pool_access(&pool, &members, principal)?;

                let target =
                    resolve_subthread(&pool, &members, shipment_id.as_deref(), principal)?;
                let counterparty = receiver::resolve_pooled(&pool, target, principal)?;

                let thread = thread_shipment(&members, target, principal)?;
                let message = ChatMessage::new(
                    thread.id.clone(),
                    Some(pool.id.clone()),
                    principal.id().to_owned(),
                    principal.role(),
                    counterparty.id,
                    body,
                );
                let saved = self.messages.insert(&message).await?;
                info!(message_id = %saved.id, pool_id = %pool.id, shipment_id = %thread.id, "pooled message sent");
                self.dispatch_notification(&saved, principal, &pool.code)
                    .await;
                Ok(saved)
            }
        }
    }

    /// Mark as read all unread messages addressed to the principal in the
    /// conversation. Idempotent: a second invocation updates zero rows.
    ///
    /// Returns the number of messages transitioned to read.
    ///
    /// # Errors
    ///
    /// Returns `AppError::AccessDenied` if the principal may not view the
    /// conversation, `AppError::NotFound` for unknown ids, or
    /// `AppError::Db` on update failure.
    pub async fn mark_read(
        &self,
        conversation: &ConversationRef,
        principal: &Principal,
    ) -> Result<u64> {
        let now = Utc::now();
        match conversation {
            ConversationRef::Single { shipment_id } => {
                let (shipment, pool) = self.load_shipment_with_pool(shipment_id).await?;
                access::check_shipment_access(&shipment, pool.as_ref(), principal)?;
                self.messages
                    .mark_read_shipment(&shipment.id, principal.id(), now)
                    .await
            }
            ConversationRef::Pooled {
                pool_id,
                shipment_id: None,
            } => {
                let (pool, members) = self.load_pool_with_members(pool_id).await?;
                access::check_pool_access(&pool, &members, principal)?;
                self.messages
                    .mark_read_pool(&pool.id, principal.id(), now)
                    .await
            }
            ConversationRef::Pooled {
                pool_id,
                shipment_id: Some(target_id),
            } => {
                let (pool, members) = self.load_pool_with_members(pool_id).await?;
                let member = find_member(&members, target_id, &pool.id)?;
                access::check_subthread_access(&pool, member, principal)?;
                self.messages
                    .mark_read_shipment(&member.id, principal.id(), now)
                    .await
            }
        }
    }

    /// Count unread messages addressed to the principal across all threads.
    ///
    /// Returns zero for principals with no messages.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` on query failure.
    pub async fn unread_count(&self, principal: &Principal) -> Result<u64> {
        self.messages.count_unread(principal.id()).await
    }

    /// Count unread messages addressed to the principal in one shipment thread.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` on query failure.
    pub async fn unread_count_for_shipment(
        &self,
        shipment_id: &str,
        principal: &Principal,
    ) -> Result<u64> {
        self.messages
            .count_unread_shipment(shipment_id, principal.id())
            .await
    }

    /// Count unread messages addressed to the principal across a pool.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` on query failure.
    pub async fn unread_count_for_pool(
        &self,
        pool_id: &str,
        principal: &Principal,
    ) -> Result<u64> {
        self.messages
            .count_unread_pool(pool_id, principal.id())
            .await
    }

    /// Load a shipment and, when it belongs to a pool, the pool record.
    async fn load_shipment_with_pool(
        &self,
        shipment_id: &str,
    ) -> Result<(Shipment, Option<Pool>)> {
        let shipment = self.shipments.get(shipment_id).await?;
        let pool = match shipment.pool_id.as_deref() {
            Some(pool_id) => Some(self.pools.get(pool_id).await?),
            None => None,
        };
        Ok((shipment, pool))
    }

    /// Load a pool together with its member shipments.
    async fn load_pool_with_members(&self, pool_id: &str) -> Result<(Pool, Vec<Shipment>)> {
        let pool = self.pools.get(pool_id).await?;
        let members = self.pools.member_shipments(&pool.id).await?;
        Ok((pool, members))
    }

    /// Best-effort notification dispatch after a successful send.
    ///
    /// Delivery failure is logged and swallowed; the persisted message is
    /// already authoritative.
    async fn dispatch_notification(
        &self,
        message: &ChatMessage,
        sender: &Principal,
        link_ref: &str,
    ) {
        let display = self.identity.resolve_display(sender).await;
        let notification = Notification {
            recipient_id: message.receiver_id.clone(),
            title: format!("New message from {}", display.name),
            body: excerpt(&message.body),
            category: NOTIFY_CATEGORY.to_owned(),
            link_ref: link_ref.to_owned(),
        };

        if let Err(err) = self.notifier.notify(notification).await {
            warn!(
                message_id = %message.id,
                recipient = %message.receiver_id,
                %err,
                "notification dispatch failed; message already persisted"
            );
        }
    }
}

/// Validate an optional sub-thread selector for a pooled send.
///
/// Agents may target any member sub-thread. A customer may only post
/// into their own sub-thread, so an explicit selector owned by someone
/// else is denied.
fn resolve_subthread<'a>(
    pool: &Pool,
    members: &'a [Shipment],
    target_id: Option<&str>,
    principal: &Principal,
) -> Result<Option<&'a Shipment>> {
    let Some(target_id) = target_id else {
        return Ok(None);
    };
    let member = find_member(members, target_id, &pool.id)?;

    if let Principal::Customer(id) = principal {
        if member.customer_id.as_deref() != Some(id) {
            return Err(AppError::AccessDenied(format!(
                "customer {id} may not post into the thread of shipment {}",
                member.id
            )));
        }
    }

    Ok(Some(member))
}

/// Find a member shipment within a pool's member list.
///
/// An id that is unknown or belongs to a different pool resolves to the
/// same error: from the caller's view the sub-thread does not exist here.
fn find_member<'a>(members: &'a [Shipment], target_id: &str, pool_id: &str) -> Result<&'a Shipment> {
    members
        .iter()
        .find(|s| s.id == target_id)
        .ok_or_else(|| AppError::NotFound(format!("shipment {target_id} in pool {pool_id}")))
}

/// Determine which sub-thread a pooled message belongs to.
///
/// Agents always send into the validated target. Customers send into
/// their own member sub-thread, located by ownership when no explicit
/// selector was supplied.
fn thread_shipment<'a>(
    members: &'a [Shipment],
    target: Option<&'a Shipment>,
    principal: &Principal,
) -> Result<&'a Shipment> {
    if let Some(member) = target {
        return Ok(member);
    }
    match principal {
        Principal::Customer(id) => members
            .iter()
            .find(|s| s.customer_id.as_deref() == Some(id))
            .ok_or_else(|| {
                AppError::AccessDenied(format!("customer {id} owns no shipment in this pool"))
            }),
        // Unreachable in practice: resolve_pooled already rejected
        // agent sends without a target.
        Principal::Agent(_) => Err(AppError::MissingTarget(
            "specify which customer to message".into(),
        )),
    }
}

/// Quote at most [`EXCERPT_CHARS`] characters of a message body.
fn excerpt(body: &str) -> String {
    if body.chars().count() <= EXCERPT_CHARS {
        body.to_owned()
    } else {
        let mut short: String = body.chars().take(EXCERPT_CHARS).collect();
        short.push('…');
        short
    }
}

//! Conversation routing core.
//!
//! The modules here decide, for any authenticated principal, whether they
//! may view or post to a conversation ([`access`]), who the implicit
//! counterparty of a new message is ([`receiver`]), and how the send, list,
//! mark-read, and unread-count operations compose ([`router`]). Access
//! evaluation and receiver resolution are pure functions over loaded
//! directory records; all I/O happens in the router.

pub mod access;
pub mod identity;
pub mod receiver;
pub mod router;

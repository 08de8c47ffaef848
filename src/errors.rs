//! Error types shared across the application.

use std::fmt::{Display, Formatter};

/// Shared application result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error enumeration covering all domain failure modes.
#[derive(Debug)]
pub enum AppError {
    /// Configuration parsing or validation failure.
    Config(String),
    /// Persistence failure when interacting with `SQLite`.
    Db(String),
    /// Requested shipment, pool, or message does not exist.
    NotFound(String),
    /// Principal is not a participant of the conversation.
    AccessDenied(String),
    /// A send cannot be routed because no counterparty is assigned.
    NoCounterparty(String),
    /// A pooled send by an agent did not name a target member shipment.
    MissingTarget(String),
    /// Notification dispatch failure (recovered locally by the router).
    Notify(String),
    /// File-system or I/O operation failure.
    Io(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Db(msg) => write!(f, "db: {msg}"),
            Self::NotFound(msg) => write!(f, "not found: {msg}"),
            Self::AccessDenied(msg) => write!(f, "access denied: {msg}"),
            Self::NoCounterparty(msg) => write!(f, "no counterparty: {msg}"),
            Self::MissingTarget(msg) => write!(f, "missing target: {msg}"),
            Self::Notify(msg) => write!(f, "notify: {msg}"),
            Self::Io(msg) => write!(f, "io: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::Db(err.to_string())
    }
}

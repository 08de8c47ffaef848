#![forbid(unsafe_code)]

pub mod api;
pub mod chat;
pub mod config;
pub mod errors;
pub mod models;
pub mod notify;
pub mod persistence;

pub use config::GlobalConfig;
pub use errors::{AppError, Result};

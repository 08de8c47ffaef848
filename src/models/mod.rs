//! Domain model module declarations.

pub mod message;
pub mod principal;
pub mod shipment;

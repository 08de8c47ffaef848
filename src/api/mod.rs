//! HTTP presentation surface.

pub mod routes;

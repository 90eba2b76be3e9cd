//! Domain services over the shared `PgPool`.
//!
//! Routes stay thin: permission checks and SQL live here, and each service
//! exposes a `thiserror` enum the route layer maps onto status codes.

pub mod assignment;
pub mod auth;
pub mod mark;
pub mod message;
pub mod quiz;
pub mod session;
pub mod unit;
pub mod upload;

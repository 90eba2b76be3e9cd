//! Networking modules for the REST API surface.
//!
//! SYSTEM CONTEXT
//! ==============
//! `http` owns the request pipeline (transport seam + 401 recovery),
//! `refresh` owns single-flight refresh-token coordination, `api` exposes
//! typed endpoint helpers, and `types` defines the shared wire schema.

pub mod api;
pub mod http;
pub mod refresh;
#[cfg(test)]
pub(crate) mod testing;
pub mod types;

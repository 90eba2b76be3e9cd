//! Shared reactive state modules.
//!
//! ARCHITECTURE
//! ============
//! Each module defines a plain state struct; `app` wraps them in `RwSignal`s
//! and provides them via context. Keeping the structs signal-free means the
//! transition logic tests natively.

pub mod assignments;
pub mod auth;
pub mod marks;
pub mod messages;
pub mod units;

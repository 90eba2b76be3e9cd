//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page installs the route guard, owns its fetch orchestration, and
//! delegates rendering details to `components`.

pub mod assignments;
pub mod dashboard;
pub mod login;
pub mod marks;
pub mod messages;
pub mod unit;

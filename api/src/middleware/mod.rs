//! HTTP middleware: session gate, role guards and CORS.

pub mod auth;
pub mod cors;
pub mod roles;

pub use auth::{AuthContext, SessionGate};
pub use roles::{require_admin, require_moderator, require_role};

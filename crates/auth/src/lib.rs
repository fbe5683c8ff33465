//! `ratedesk-auth`: admin authentication boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it checks
//! credentials, issues opaque session tokens and validates them.

pub mod credentials;
pub mod session;

pub use credentials::AdminCredentials;
pub use session::{AdminSession, AdminSessions, AuthError, SessionToken};

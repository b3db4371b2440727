//! `postpilot-core` — shared foundation for the web tier.
//!
//! Identifiers and the error model used across the auth/session/gateway
//! crates. Pure types only; no I/O lives here.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::UserId;

//! `postpilot-session` — the in-client session store and backend client.
//!
//! A [`SessionService`] is the single in-memory source of truth for "who
//! is the current user". It owns the HTTP client (with the backend's
//! HTTP-only session cookie in its cookie store), the single-flight
//! token refresh guard, the background refresh interval, and the
//! client-side half of the route gate. One explicitly constructed
//! instance per page lifetime: `new → initialize → dispose`.

pub mod backend;
pub mod config;
pub mod error;
pub mod principal;
pub mod refresh;
pub mod service;
pub mod state;

pub use config::SessionConfig;
pub use error::SessionError;
pub use principal::{Principal, ProfilePatch};
pub use service::SessionService;
pub use state::AuthState;

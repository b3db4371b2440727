//! `postpilot-gateway` — the edge half of the route gate.
//!
//! Runs before any page code: per request it inspects the opaque
//! session cookie (presence only) and the plaintext role mirror, and
//! passes or redirects using the same decision function the in-client
//! gate uses. Coarse and non-authoritative by design; the session
//! service re-validates with the confirmed principal.

pub mod app;
pub mod config;
pub mod middleware;

pub use app::build_app;
pub use config::GatewayConfig;

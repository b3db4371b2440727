//! `postpilot-auth` — pure RBAC policy for the dashboard web tier.
//!
//! Role table, namespace routing decisions and path conventions, with
//! zero I/O. Both enforcement points (the edge gateway and the in-client
//! session service) consume the same decision function from this crate,
//! so the allow/redirect rule cannot drift between them.

pub mod gate;
pub mod locale;
pub mod namespace;
pub mod role;
pub mod role_cookie;
pub mod table;

pub use gate::{GateAction, GateDecision, RequestedPath, decide};
pub use locale::Locale;
pub use namespace::Namespace;
pub use role::Role;
pub use table::{PolicyError, RoleTable, login_path};

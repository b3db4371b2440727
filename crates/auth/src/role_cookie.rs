//! The plaintext role mirror cookie.
//!
//! A non-secret routing hint only: the edge gateway reads it to make a
//! fast redirect guess without a network round trip. It is never an
//! authorization input; the backend session and the authenticated `/me`
//! principal remain the sole sources of truth.

use crate::role::Role;

/// Cookie name shared by the session service (writer) and the edge
/// gateway (reader).
pub const ROLE_COOKIE: &str = "role";

const MAX_AGE_SECS: u64 = 7 * 24 * 60 * 60;

/// `Set-Cookie` value mirroring the given role for seven days.
pub fn set_value(role: &Role) -> String {
    format!(
        "{}={}; Path=/; Max-Age={}; SameSite=Lax",
        ROLE_COOKIE,
        role.as_str(),
        MAX_AGE_SECS
    )
}

/// `Set-Cookie` value expiring the mirror immediately.
pub fn clear_value() -> String {
    format!("{}=; Path=/; Max-Age=0; SameSite=Lax", ROLE_COOKIE)
}

/// Interpret a raw cookie value as a role. Empty values mean "no mirror";
/// anything else is handed to the role table, which fails closed on
/// values it does not know.
pub fn parse(value: &str) -> Option<Role> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(Role::new(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_value_carries_role_and_attributes() {
        let v = set_value(&Role::MANAGER);
        assert!(v.starts_with("role=manager;"));
        assert!(v.contains("Max-Age=604800"));
        assert!(v.contains("SameSite=Lax"));
        assert!(v.contains("Path=/"));
    }

    #[test]
    fn clear_value_expires_immediately() {
        assert!(clear_value().contains("Max-Age=0"));
    }

    #[test]
    fn parse_handles_empty_and_unknown() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("  "), None);
        assert_eq!(parse("manager"), Some(Role::MANAGER));
        // Unknown strings still parse; the table denies them later.
        assert_eq!(parse("ghost"), Some(Role::new("ghost")));
    }
}

use serde::{Deserialize, Serialize};

/// Top-level dashboard area a role may be routed into.
///
/// Namespaces are a closed set: every dashboard route lives under
/// `/{locale}/{namespace}/...`, and anything that does not match one of
/// these prefixes is not a dashboard route at all.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Namespace {
    User,
    Manager,
    Admin,
}

impl Namespace {
    pub const ALL: [Namespace; 3] = [Namespace::User, Namespace::Manager, Namespace::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::User => "user",
            Namespace::Manager => "manager",
            Namespace::Admin => "admin",
        }
    }

    /// Parse a path segment into a namespace. Anything else is not a
    /// dashboard namespace.
    pub fn parse(segment: &str) -> Option<Self> {
        match segment {
            "user" => Some(Namespace::User),
            "manager" => Some(Namespace::Manager),
            "admin" => Some(Namespace::Admin),
            _ => None,
        }
    }
}

impl core::fmt::Display for Namespace {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role identifier used for RBAC.
///
/// Roles are opaque strings at this layer so the table stays data-driven:
/// the four platform roles are provided as constants, and a value outside
/// the table simply resolves to deny-all (see [`crate::table::RoleTable`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const USER: Role = Role(Cow::Borrowed("user"));
    pub const MANAGER: Role = Role(Cow::Borrowed("manager"));
    pub const ADMIN: Role = Role(Cow::Borrowed("admin"));
    pub const SUPER_ADMIN: Role = Role(Cow::Borrowed("super_admin"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Self(Cow::Owned(value.to_string()))
    }
}

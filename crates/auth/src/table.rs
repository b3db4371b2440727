//! Role table: explicit allow-lists per role.
//!
//! Access is decided by per-role allow-lists, not by comparing hierarchy
//! levels. The levels are carried as informational ordering only; the
//! allow-lists encode deliberate exceptions (`super_admin` and `admin`
//! share an access set despite different levels) that a numeric `>=`
//! rule would get wrong.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::locale::Locale;
use crate::namespace::Namespace;
use crate::role::Role;

static EMPTY_ACCESS: BTreeSet<Namespace> = BTreeSet::new();

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// A role's default namespace must be a member of its own access set.
    #[error("role '{role}' has default namespace '{default}' outside its access set")]
    DefaultOutsideAccessSet { role: Role, default: Namespace },

    #[error("role '{0}' is already defined")]
    DuplicateRole(Role),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RoleEntry {
    level: u8,
    access: BTreeSet<Namespace>,
    default: Namespace,
}

/// Per-role routing policy: hierarchy level, accessible namespaces and the
/// home ("default") namespace each role lands on.
///
/// Lookups for a role not in the table fail closed: empty access set,
/// `user` default. They never widen to allow-all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleTable {
    entries: BTreeMap<Role, RoleEntry>,
}

impl RoleTable {
    /// The fixed platform table: `user`, `manager`, `admin`, `super_admin`.
    pub fn standard() -> Self {
        let table = Self {
            entries: BTreeMap::new(),
        };
        // The unwraps hold by construction: each default is in its access set.
        table
            .with_role(Role::USER, 1, [Namespace::User], Namespace::User)
            .and_then(|t| {
                t.with_role(
                    Role::MANAGER,
                    2,
                    [Namespace::User, Namespace::Manager],
                    Namespace::Manager,
                )
            })
            .and_then(|t| {
                t.with_role(
                    Role::ADMIN,
                    3,
                    [Namespace::User, Namespace::Manager, Namespace::Admin],
                    Namespace::Admin,
                )
            })
            .and_then(|t| {
                t.with_role(
                    Role::SUPER_ADMIN,
                    4,
                    [Namespace::User, Namespace::Manager, Namespace::Admin],
                    Namespace::Admin,
                )
            })
            .unwrap_or_else(|_| unreachable!("standard table is self-consistent"))
    }

    /// Add a role to the table, consuming and returning it builder-style.
    ///
    /// Rejects a default namespace outside the access set (table
    /// self-consistency) and redefinition of an existing role.
    pub fn with_role(
        mut self,
        role: Role,
        level: u8,
        access: impl IntoIterator<Item = Namespace>,
        default: Namespace,
    ) -> Result<Self, PolicyError> {
        let access: BTreeSet<Namespace> = access.into_iter().collect();
        if !access.contains(&default) {
            return Err(PolicyError::DefaultOutsideAccessSet { role, default });
        }
        if self.entries.contains_key(&role) {
            return Err(PolicyError::DuplicateRole(role));
        }
        self.entries.insert(
            role,
            RoleEntry {
                level,
                access,
                default,
            },
        );
        Ok(self)
    }

    /// Namespaces the role may view. Unknown role: empty set (deny-all).
    pub fn accessible_namespaces(&self, role: &Role) -> &BTreeSet<Namespace> {
        match self.entries.get(role) {
            Some(entry) => &entry.access,
            None => &EMPTY_ACCESS,
        }
    }

    /// The namespace the role lands on after login and is bounced back to.
    /// Unknown role: `user`, the most restrictive home.
    pub fn default_namespace(&self, role: &Role) -> Namespace {
        match self.entries.get(role) {
            Some(entry) => entry.default,
            None => {
                tracing::debug!(role = %role, "unknown role, failing closed to user namespace");
                Namespace::User
            }
        }
    }

    /// Informational hierarchy ordering. Not consulted by [`Self::can_access`].
    pub fn level(&self, role: &Role) -> Option<u8> {
        self.entries.get(role).map(|e| e.level)
    }

    pub fn can_access(&self, role: &Role, namespace: Namespace) -> bool {
        self.accessible_namespaces(role).contains(&namespace)
    }

    /// Where a role is sent when it lands outside its home namespace:
    /// `/{locale}/{default}/dashboard`.
    pub fn redirect_target(&self, role: &Role, locale: Locale) -> String {
        format!("/{}/{}/dashboard", locale, self.default_namespace(role))
    }

    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.entries.keys()
    }
}

impl Default for RoleTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Locale-prefixed login path: `/{locale}/auth/login`.
pub fn login_path(locale: Locale) -> String {
    format!("/{}/auth/login", locale)
}

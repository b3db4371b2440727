//! The per-navigation gate decision.
//!
//! One pure function decides pass-or-redirect for a requested path. The
//! edge gateway calls it with the (non-authoritative) role mirrored into
//! a cookie; the session service calls it again with the authoritative
//! role from the confirmed principal. Keeping a single decision function
//! is what prevents the two enforcement points from drifting apart.

use crate::locale::Locale;
use crate::namespace::Namespace;
use crate::role::Role;
use crate::table::RoleTable;

/// A navigation target, decomposed against the path conventions:
/// `/{locale}/{namespace}/...` for dashboard routes, `/{locale}/...`
/// for everything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedPath {
    pub locale: Locale,
    /// The dashboard namespace the path addresses, if any. Paths without
    /// a locale prefix are never classified as dashboard routes; the
    /// application router re-prefixes them before they reach a gate.
    pub namespace: Option<Namespace>,
    segments: Vec<String>,
}

impl RequestedPath {
    pub fn parse(path: &str) -> Self {
        let mut segments: Vec<String> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        let locale = segments.first().and_then(|s| Locale::parse(s));
        let namespace = match locale {
            Some(_) => {
                segments.remove(0);
                segments.first().and_then(|s| Namespace::parse(s))
            }
            None => None,
        };

        Self {
            locale: locale.unwrap_or_default(),
            namespace,
            segments,
        }
    }

    /// Whether the path is reachable without a session: the bare locale
    /// root, the login page, and any configured extra public prefixes
    /// (matched against the locale-stripped remainder).
    pub fn is_public(&self, extra_prefixes: &[String]) -> bool {
        let remainder = self.segments.join("/");
        remainder.is_empty()
            || remainder == "auth/login"
            || extra_prefixes.iter().any(|p| {
                let p = p.trim_matches('/');
                remainder == p || remainder.starts_with(&format!("{}/", p))
            })
    }
}

/// Outcome of classifying one navigation for one role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// The path addresses no dashboard namespace; the gate has no say.
    NotDashboardRoute,
    /// The role's own home namespace: the happy path.
    AllowedAndHome,
    /// Accessible but not home. Policy is "always land on your home
    /// namespace", so this still bounces.
    AllowedNotHome { target: String },
    /// Outside the role's access set.
    Forbidden { target: String },
}

/// What an enforcement point should do with a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateAction {
    Pass,
    Redirect(String),
}

impl GateDecision {
    pub fn action(&self) -> GateAction {
        match self {
            GateDecision::NotDashboardRoute | GateDecision::AllowedAndHome => GateAction::Pass,
            GateDecision::AllowedNotHome { target } | GateDecision::Forbidden { target } => {
                GateAction::Redirect(target.clone())
            }
        }
    }
}

/// Decide pass-or-redirect for `role` requesting `path`.
///
/// Both redirect states compute the identical target, the role's home
/// dashboard. From the outside "forbidden" and "allowed but not home"
/// are indistinguishable; the distinction is kept for logging.
pub fn decide(table: &RoleTable, role: &Role, path: &str) -> GateDecision {
    let requested = RequestedPath::parse(path);
    let Some(namespace) = requested.namespace else {
        return GateDecision::NotDashboardRoute;
    };

    if !table.can_access(role, namespace) {
        return GateDecision::Forbidden {
            target: table.redirect_target(role, requested.locale),
        };
    }

    if namespace != table.default_namespace(role) {
        return GateDecision::AllowedNotHome {
            target: table.redirect_target(role, requested.locale),
        };
    }

    GateDecision::AllowedAndHome
}

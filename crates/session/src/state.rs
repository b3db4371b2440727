use crate::principal::Principal;

/// Three-state session lifecycle.
///
/// `is_authenticated` is defined as "this state holds a principal";
/// there is no separate boolean that could desynchronize from it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    /// Initial identity fetch has not settled yet.
    #[default]
    Unknown,
    Authenticated(Principal),
    Anonymous,
}

impl AuthState {
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            AuthState::Authenticated(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal().is_some()
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, AuthState::Unknown)
    }
}

use thiserror::Error;

/// Failures surfaced by the session service.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The backend rejected the request. The message is the backend's
    /// own, passed through verbatim for display.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Session refresh failed; the session has been torn down. Distinct
    /// from business errors so callers can route the user to login.
    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SessionError {
    pub fn status(&self) -> Option<u16> {
        match self {
            SessionError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

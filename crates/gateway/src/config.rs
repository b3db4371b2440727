use postpilot_auth::RoleTable;

/// Gateway configuration, read from the environment in `main`.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub listen_addr: String,
    /// Name of the backend-issued session cookie. Only its presence is
    /// checked here; the value is opaque to the gateway.
    pub session_cookie: String,
    /// Locale-stripped path prefixes reachable without a session, on top
    /// of the built-in allow-list (locale root, login page).
    pub public_prefixes: Vec<String>,
    pub table: RoleTable,
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        let listen_addr = std::env::var("PP_LISTEN_ADDR").unwrap_or_else(|_| {
            tracing::warn!("PP_LISTEN_ADDR not set; using 0.0.0.0:8080");
            "0.0.0.0:8080".to_string()
        });

        let session_cookie =
            std::env::var("PP_SESSION_COOKIE").unwrap_or_else(|_| "pp_session".to_string());

        let public_prefixes = std::env::var("PP_PUBLIC_PREFIXES")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            listen_addr,
            session_cookie,
            public_prefixes,
            table: RoleTable::standard(),
        }
    }
}

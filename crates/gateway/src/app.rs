use std::sync::Arc;

use axum::Router;
use axum::extract::OriginalUri;
use axum::http::StatusCode;
use axum::middleware::from_fn_with_state;
use axum::response::IntoResponse;
use tower::ServiceBuilder;

use crate::config::GatewayConfig;
use crate::middleware::{GateState, edge_gate};

/// Build the gateway router. Every path funnels through the edge gate;
/// whatever passes is answered by the shell handler.
pub fn build_app(config: GatewayConfig) -> Router {
    let state = GateState {
        table: Arc::new(config.table),
        session_cookie: Arc::from(config.session_cookie.as_str()),
        public_prefixes: Arc::new(config.public_prefixes),
    };

    Router::new()
        .fallback(shell)
        .layer(ServiceBuilder::new().layer(from_fn_with_state(state, edge_gate)))
}

/// Stand-in for the application shell: the dashboards themselves are
/// rendered client-side and are not this subsystem's concern. Anything
/// the gate lets through gets a 200.
async fn shell(OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    (StatusCode::OK, format!("postpilot {}", uri.path()))
}

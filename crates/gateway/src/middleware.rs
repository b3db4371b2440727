use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;

use postpilot_auth::{GateAction, RequestedPath, RoleTable, gate, login_path, role_cookie};

/// Shared state for the edge gate.
#[derive(Clone)]
pub struct GateState {
    pub table: Arc<RoleTable>,
    pub session_cookie: Arc<str>,
    pub public_prefixes: Arc<Vec<String>>,
}

/// Per-request enforcement at the edge.
///
/// Without a session cookie, anything outside the public allow-list is
/// sent to the locale-prefixed login page. With one, the role mirrored
/// into the plaintext cookie drives the shared gate decision. A missing
/// mirror passes through: the edge cannot classify the request, and the
/// client gate re-validates with the authoritative role anyway.
pub async fn edge_gate(
    State(state): State<GateState>,
    jar: CookieJar,
    req: Request<Body>,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();

    if jar.get(state.session_cookie.as_ref()).is_none() {
        let requested = RequestedPath::parse(&path);
        if requested.is_public(&state.public_prefixes) {
            return next.run(req).await;
        }
        let login = login_path(requested.locale);
        tracing::debug!(%path, target = %login, "no session, redirecting to login");
        return Redirect::temporary(&login).into_response();
    }

    let Some(role) = jar
        .get(role_cookie::ROLE_COOKIE)
        .and_then(|c| role_cookie::parse(c.value()))
    else {
        return next.run(req).await;
    };

    match gate::decide(&state.table, &role, &path).action() {
        // Never redirect a request to the path it is already on; a stale
        // mirror must not trap the browser in a loop.
        GateAction::Redirect(target) if target != path => {
            tracing::debug!(%path, role = %role, %target, "edge gate redirect");
            Redirect::temporary(&target).into_response()
        }
        _ => next.run(req).await,
    }
}

//! The session service: auth state, authed requests, refresh lifecycle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use reqwest::{Method, StatusCode};
use tokio::task::JoinHandle;

use postpilot_auth::{GateAction, Locale, Role, RoleTable, gate, login_path, role_cookie};

use crate::backend::{BackendClient, endpoints, into_json};
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::principal::{Principal, ProfilePatch};
use crate::refresh::{RefreshOutcome, SingleFlight};
use crate::state::AuthState;

/// In-memory source of truth for the current user, plus the machinery
/// that keeps the backend session alive.
///
/// All mutable state is owned by the instance; there are no module-level
/// singletons, so tests (and login/logout cycles) tear down cleanly.
pub struct SessionService {
    backend: BackendClient,
    table: RoleTable,
    locale: Locale,
    refresh_interval: Duration,

    state: RwLock<AuthState>,
    /// Role mirrored into the plaintext cookie for the edge gate. Routing
    /// hint only, never an authorization input.
    mirrored_role: RwLock<Option<Role>>,
    refresh_flight: SingleFlight,
    refresh_task: Mutex<Option<JoinHandle<()>>>,
    initialized: AtomicBool,
}

impl SessionService {
    pub fn new(config: SessionConfig) -> Result<Arc<Self>, SessionError> {
        Ok(Arc::new(Self {
            backend: BackendClient::new(config.base_url)?,
            table: config.table,
            locale: config.locale,
            refresh_interval: config.refresh_interval,
            state: RwLock::new(AuthState::Unknown),
            mirrored_role: RwLock::new(None),
            refresh_flight: SingleFlight::new(),
            refresh_task: Mutex::new(None),
            initialized: AtomicBool::new(false),
        }))
    }

    pub fn state(&self) -> AuthState {
        self.state.read().unwrap().clone()
    }

    pub fn principal(&self) -> Option<Principal> {
        self.state.read().unwrap().principal().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().unwrap().is_authenticated()
    }

    /// `Set-Cookie` header value the host should apply for the role
    /// mirror: the current role, or an immediate expiry when none.
    pub fn role_cookie_header(&self) -> String {
        match self.mirrored_role.read().unwrap().as_ref() {
            Some(role) => role_cookie::set_value(role),
            None => role_cookie::clear_value(),
        }
    }

    /// Confirm identity with the backend using the ambient session
    /// cookie. Runs at most once per service lifetime; any failure
    /// settles the state to anonymous rather than erroring.
    pub async fn initialize(self: &Arc<Self>) {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return;
        }

        match self
            .request_json::<Principal>(Method::GET, endpoints::ME, None)
            .await
        {
            Ok(principal) => {
                self.set_authenticated(principal);
                self.start_refresh_interval();
            }
            Err(err) => {
                tracing::debug!(error = %err, "initial identity fetch failed, settling anonymous");
                *self.state.write().unwrap() = AuthState::Anonymous;
            }
        }
    }

    /// Authenticate and return the role-based redirect target. Backend
    /// failures are propagated with their message unchanged.
    pub async fn login(
        self: &Arc<Self>,
        email: &str,
        password: &str,
    ) -> Result<String, SessionError> {
        let body = serde_json::json!({ "email": email, "password": password });
        self.authenticate(endpoints::LOGIN, &body).await
    }

    /// Register a new account; same contract as [`Self::login`].
    pub async fn signup(
        self: &Arc<Self>,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<String, SessionError> {
        let body = serde_json::json!({ "name": name, "email": email, "password": password });
        self.authenticate(endpoints::REGISTER, &body).await
    }

    // Login and signup go straight to the backend rather than through the
    // refresh-aware path: a 401 here means bad credentials, not an
    // expired session.
    async fn authenticate(
        self: &Arc<Self>,
        endpoint: &str,
        body: &serde_json::Value,
    ) -> Result<String, SessionError> {
        let resp = self.backend.send(Method::POST, endpoint, Some(body)).await?;
        let principal: Principal = into_json(resp).await?;
        let target = self.table.redirect_target(&principal.role, self.locale);

        tracing::info!(user = %principal.id, role = %principal.role, "session established");
        self.set_authenticated(principal);
        self.start_refresh_interval();
        Ok(target)
    }

    /// End the session and return the login path. The backend call is
    /// best-effort; locally the session is always cleared, so the client
    /// can never be left looking authenticated. Idempotent.
    pub async fn logout(&self) -> String {
        if let Err(err) = self.backend.send(Method::POST, endpoints::LOGOUT, None).await {
            tracing::debug!(error = %err, "logout call failed, clearing local session anyway");
        }
        self.clear_session();
        login_path(self.locale)
    }

    /// Local-only merge into the current principal, after a profile edit
    /// the backend has already confirmed. No network. No-op when not
    /// authenticated.
    pub fn update_user(&self, patch: &ProfilePatch) {
        let mut state = self.state.write().unwrap();
        if let AuthState::Authenticated(principal) = &mut *state {
            principal.apply(patch);
        }
    }

    /// Re-fetch the current user and store the fresh record.
    pub async fn me(self: &Arc<Self>) -> Result<Principal, SessionError> {
        let principal: Principal = self
            .request_json(Method::GET, endpoints::ME, None)
            .await?;
        self.set_authenticated(principal.clone());
        self.start_refresh_interval();
        Ok(principal)
    }

    /// Persist a profile edit, then store the record the backend returns.
    pub async fn save_profile(
        self: &Arc<Self>,
        patch: &ProfilePatch,
    ) -> Result<Principal, SessionError> {
        let body = serde_json::to_value(patch)?;
        let principal: Principal = self
            .request_json(Method::PUT, endpoints::ME, Some(&body))
            .await?;
        self.set_authenticated(principal.clone());
        Ok(principal)
    }

    /// The shared authed request path every backend call uses.
    ///
    /// Non-401 outcomes are returned or surfaced unchanged. A 401 runs
    /// the single-flight refresh and retries exactly once; if the retry
    /// fails too, that failure is surfaced, never looped. Refresh
    /// failure is the one path that tears the session down.
    pub async fn request_json<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<T, SessionError> {
        let resp = self.backend.send(method.clone(), path, body).await?;
        if resp.status() != StatusCode::UNAUTHORIZED {
            return into_json(resp).await;
        }

        match self.refresh().await {
            RefreshOutcome::Succeeded => {
                let retry = self.backend.send(method, path, body).await?;
                into_json(retry).await
            }
            RefreshOutcome::Failed => {
                self.clear_session();
                Err(SessionError::AuthenticationFailed)
            }
        }
    }

    /// Client-side half of the route gate. A no-op until the identity is
    /// confirmed: never redirects while the state is unknown or
    /// anonymous (that is the edge gate's and the login page's job).
    pub fn gate_navigation(&self, path: &str) -> Option<String> {
        let state = self.state.read().unwrap();
        let principal = state.principal()?;
        match gate::decide(&self.table, &principal.role, path).action() {
            GateAction::Redirect(target) if target != path => {
                tracing::debug!(%path, %target, role = %principal.role, "client gate redirect");
                Some(target)
            }
            _ => None,
        }
    }

    /// Tear down background work. Also runs on drop.
    pub fn dispose(&self) {
        self.stop_refresh_interval();
    }

    async fn refresh(&self) -> RefreshOutcome {
        self.refresh_flight
            .run(|| async {
                match self.backend.send(Method::POST, endpoints::REFRESH, None).await {
                    Ok(resp) if resp.status().is_success() => RefreshOutcome::Succeeded,
                    Ok(resp) => {
                        tracing::warn!(status = %resp.status(), "session refresh rejected");
                        RefreshOutcome::Failed
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "session refresh failed");
                        RefreshOutcome::Failed
                    }
                }
            })
            .await
    }

    fn set_authenticated(&self, principal: Principal) {
        *self.mirrored_role.write().unwrap() = Some(principal.role.clone());
        *self.state.write().unwrap() = AuthState::Authenticated(principal);
    }

    fn clear_session(&self) {
        *self.state.write().unwrap() = AuthState::Anonymous;
        *self.mirrored_role.write().unwrap() = None;
        self.stop_refresh_interval();
    }

    /// Start the proactive refresh timer, at most once per authenticated
    /// session. The task holds only a weak reference, so dropping the
    /// service stops it; logout aborts it explicitly.
    fn start_refresh_interval(self: &Arc<Self>) {
        let mut task = self.refresh_task.lock().unwrap();
        if task.is_some() {
            return;
        }

        let service = Arc::downgrade(self);
        let period = self.refresh_interval;
        *task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately; skip it.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(service) = service.upgrade() else {
                    break;
                };
                if !service.is_authenticated() {
                    break;
                }
                if service.refresh().await == RefreshOutcome::Failed {
                    tracing::warn!("proactive refresh failed, tearing session down");
                    service.clear_session();
                    break;
                }
            }
        }));
    }

    fn stop_refresh_interval(&self) {
        if let Some(handle) = self.refresh_task.lock().unwrap().take() {
            handle.abort();
        }
    }
}

impl Drop for SessionService {
    fn drop(&mut self) {
        self.stop_refresh_interval();
    }
}

impl std::fmt::Debug for SessionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionService")
            .field("state", &self.state.read().unwrap())
            .field("locale", &self.locale)
            .finish_non_exhaustive()
    }
}

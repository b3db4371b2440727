//! Thin HTTP boundary to the platform backend.
//!
//! Every call attaches credentials: the backend's HTTP-only session
//! cookie lives in the client's cookie store and is sent automatically.
//! Non-2xx responses are expected to carry a JSON body with a `message`
//! (or `error`) field, surfaced verbatim.

use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::SessionError;

/// Backend endpoint paths. Exact paths matter for compatibility.
pub mod endpoints {
    pub const LOGIN: &str = "/api/v1/auth/login";
    pub const REGISTER: &str = "/api/v1/auth/register";
    pub const LOGOUT: &str = "/api/v1/auth/logout";
    pub const REFRESH: &str = "/api/v1/auth/refresh";
    pub const ME: &str = "/api/v1/auth/me";
}

#[derive(Debug)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, SessionError> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Issue one request with cookies attached. Fails only on transport
    /// errors; HTTP status handling is the caller's.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Response, SessionError> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http.request(method, url);
        if let Some(body) = body {
            req = req.json(body);
        }
        Ok(req.send().await?)
    }
}

/// Parse a 2xx body as JSON, or turn a non-2xx response into an
/// [`SessionError::Api`] carrying the backend's message.
pub async fn into_json<T: DeserializeOwned>(resp: Response) -> Result<T, SessionError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json::<T>().await?);
    }
    Err(api_error(status, resp).await)
}

async fn api_error(status: StatusCode, resp: Response) -> SessionError {
    let message = resp
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|body| {
            body.get("message")
                .or_else(|| body.get("error"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("request failed with status {}", status.as_u16()));

    SessionError::Api {
        status: status.as_u16(),
        message,
    }
}

//! HTTP request pipeline with credential-aware retry.
//!
//! ARCHITECTURE
//! ============
//! Every REST call goes through [`ApiClient::send`], which owns the
//! expired-access-token recovery path: the first `401` on a request defers to
//! the [`RefreshCoordinator`](crate::net::refresh::RefreshCoordinator) and
//! then re-issues the request exactly once. `403` and `5xx` are terminal for
//! the caller and never touch the coordinator.
//!
//! The actual network I/O sits behind the [`Transport`] trait so the pipeline
//! runs natively under test with a scripted transport; the `gloo-net`
//! implementation is compiled only for the browser (`csr`).

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::net::refresh::RefreshCoordinator;

/// HTTP method subset used by the API surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// An outgoing request descriptor.
#[derive(Clone, Debug)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
    /// Whether a `401` may be recovered via the refresh protocol. Auth
    /// endpoints themselves opt out: a rejected login is a credential error,
    /// not an expired session.
    pub auth_retry: bool,
}

impl Request {
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self { method: Method::Get, path: path.into(), body: None, auth_retry: true }
    }

    #[must_use]
    pub fn post(path: impl Into<String>, body: Option<serde_json::Value>) -> Self {
        Self { method: Method::Post, path: path.into(), body, auth_retry: true }
    }

    #[must_use]
    pub fn patch(path: impl Into<String>, body: Option<serde_json::Value>) -> Self {
        Self { method: Method::Patch, path: path.into(), body, auth_retry: true }
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self { method: Method::Delete, path: path.into(), body: None, auth_retry: true }
    }

    /// Disable the 401-refresh-retry path for this request.
    #[must_use]
    pub fn without_auth_retry(mut self) -> Self {
        self.auth_retry = false;
        self
    }
}

/// A response as seen by the pipeline: status plus parsed JSON body
/// (`Null` when the body is empty or not JSON).
#[derive(Clone, Debug)]
pub struct Response {
    pub status: u16,
    pub body: serde_json::Value,
}

impl Response {
    /// Whether the status is in the 2xx range.
    #[must_use]
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Deserialize the body into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_value(self.body.clone()).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Error taxonomy for API calls, mirroring how each class is handled:
/// only `SessionExpired` implies a forced logout; everything else is
/// surfaced to the calling page untouched.
#[derive(Clone, Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(String),
    /// The refresh protocol ran and failed; the session is gone.
    #[error("session expired")]
    SessionExpired,
    /// `403`: authenticated but not allowed. Never retried.
    #[error("access denied")]
    Forbidden,
    /// `5xx`: server-side failure. Not retried automatically.
    #[error("server error ({status})")]
    Server { status: u16 },
    /// Any other non-2xx status a helper chose to surface as an error.
    #[error("request failed with status {0}")]
    Status(u16),
    /// 2xx response whose body did not match the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),
}

/// Object-safe async transport seam between the pipeline and the network.
/// Implementations are `Send + Sync` (context values must be), but the
/// returned futures need not be; they run on the browser's local executor.
#[async_trait::async_trait(?Send)]
pub trait Transport: Send + Sync {
    /// Execute one HTTP exchange. `Err` means no HTTP response was produced.
    async fn execute(&self, req: &Request) -> Result<Response, String>;
}

/// Shared API client: one per application session, handed to pages via
/// Leptos context.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    refresh: RefreshCoordinator,
}

impl ApiClient {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, refresh: RefreshCoordinator) -> Self {
        Self { transport, refresh }
    }

    /// Issue a request through the recovery pipeline.
    ///
    /// Non-2xx statuses other than `403`/`5xx` (for example a `404`, or a
    /// `401` that survived the one permitted retry) are returned as an `Ok`
    /// response for the caller to inspect.
    ///
    /// # Errors
    ///
    /// [`ApiError::Network`] on transport failure, [`ApiError::SessionExpired`]
    /// when the refresh protocol fails, [`ApiError::Forbidden`] on `403`, and
    /// [`ApiError::Server`] on `5xx`.
    pub async fn send(&self, req: &Request) -> Result<Response, ApiError> {
        let first = self
            .transport
            .execute(req)
            .await
            .map_err(ApiError::Network)?;

        let resp = if first.status == 401 && req.auth_retry {
            // Single retry: one refresh cycle (possibly shared with other
            // in-flight requests), then re-issue the original request once.
            self.refresh
                .refresh(self.transport.as_ref())
                .await
                .map_err(|_| ApiError::SessionExpired)?;
            self.transport
                .execute(req)
                .await
                .map_err(ApiError::Network)?
        } else {
            first
        };

        match resp.status {
            403 => Err(ApiError::Forbidden),
            status if status >= 500 => Err(ApiError::Server { status }),
            _ => Ok(resp),
        }
    }

}

/// Transport for non-browser builds: these endpoints are only meaningful in
/// the browser, so every exchange fails the way an offline network would.
pub struct UnavailableTransport;

#[async_trait::async_trait(?Send)]
impl Transport for UnavailableTransport {
    async fn execute(&self, _req: &Request) -> Result<Response, String> {
        Err("not available outside the browser".to_owned())
    }
}

/// Browser transport over `gloo-net`. Cookies ride along automatically for
/// same-origin requests, which is how the access token travels.
#[cfg(feature = "csr")]
pub struct GlooTransport;

#[cfg(feature = "csr")]
#[async_trait::async_trait(?Send)]
impl Transport for GlooTransport {
    async fn execute(&self, req: &Request) -> Result<Response, String> {
        let builder = match req.method {
            Method::Get => gloo_net::http::Request::get(&req.path),
            Method::Post => gloo_net::http::Request::post(&req.path),
            Method::Patch => gloo_net::http::Request::patch(&req.path),
            Method::Delete => gloo_net::http::Request::delete(&req.path),
        };

        let resp = match &req.body {
            Some(body) => builder
                .json(body)
                .map_err(|e| e.to_string())?
                .send()
                .await,
            None => builder.send().await,
        }
        .map_err(|e| e.to_string())?;

        let status = resp.status();
        // Empty or non-JSON bodies (e.g. 204 on logout) become Null.
        let body = resp
            .json::<serde_json::Value>()
            .await
            .unwrap_or(serde_json::Value::Null);

        Ok(Response { status, body })
    }
}

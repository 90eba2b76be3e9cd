//! Single-flight coordination for the refresh-token call.
//!
//! DESIGN
//! ======
//! When several in-flight requests hit an expired access token at once, only
//! the first may call `POST /api/auth/refresh-token`; the rest park on a FIFO
//! waiter queue and share the outcome. The coordinator is an owned object
//! constructed once per application session; its flag and queue are private,
//! so no other component can start a competing refresh. The flight state
//! lives in a `Mutex` to satisfy the reactive runtime's `Send` bounds, but
//! the browser runtime is single-threaded: the `refreshing` flag is the real
//! mutual-exclusion mechanism, and the lock is never contended.
//!
//! ERROR HANDLING
//! ==============
//! A failed refresh (rejected or network error) is terminal for every caller
//! in the cycle: all waiters receive the error, `on_expired` fires exactly
//! once, and nothing re-queues. A 401 arriving after the cycle has resolved
//! starts a new, independent cycle.

#[cfg(test)]
#[path = "refresh_test.rs"]
mod refresh_test;

use std::sync::{Arc, Mutex, PoisonError};

use futures::channel::oneshot;

use crate::net::http::{Request, Transport};
use crate::net::types::{RefreshResponse, User};

/// Endpoint the coordinator owns. No other code path may call it.
pub const REFRESH_ENDPOINT: &str = "/api/auth/refresh-token";

/// Why a refresh cycle failed.
#[derive(Clone, Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("refresh request failed: {0}")]
    Network(String),
    #[error("refresh rejected ({0})")]
    Rejected(u16),
}

struct Flight {
    refreshing: bool,
    waiters: Vec<oneshot::Sender<Result<(), RefreshError>>>,
}

/// Shared single-flight refresh state plus session hooks.
///
/// Cloning produces another handle to the same flight state, so every
/// [`ApiClient`](crate::net::http::ApiClient) clone still shares one queue.
#[derive(Clone)]
pub struct RefreshCoordinator {
    inner: Arc<Mutex<Flight>>,
    /// Fires once per successful cycle with the user the server returned
    /// (if any) so the auth store can update.
    on_refreshed: Arc<dyn Fn(Option<User>) + Send + Sync>,
    /// Fires exactly once per failed cycle: clears the session and navigates
    /// to the login entry point.
    on_expired: Arc<dyn Fn() + Send + Sync>,
}

impl RefreshCoordinator {
    pub fn new(
        on_refreshed: impl Fn(Option<User>) + Send + Sync + 'static,
        on_expired: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Flight { refreshing: false, waiters: Vec::new() })),
            on_refreshed: Arc::new(on_refreshed),
            on_expired: Arc::new(on_expired),
        }
    }

    fn flight(&self) -> std::sync::MutexGuard<'_, Flight> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether a refresh call is currently in flight.
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.flight().refreshing
    }

    /// Join the current refresh cycle, starting one if none is in flight.
    ///
    /// The runtime is single-threaded, so the check-and-set on the flag is
    /// atomic within one turn of the event loop.
    ///
    /// # Errors
    ///
    /// Returns the cycle's [`RefreshError`]; shared verbatim by the leader
    /// and every queued waiter.
    pub async fn refresh(&self, transport: &dyn Transport) -> Result<(), RefreshError> {
        let parked = {
            let mut flight = self.flight();
            if flight.refreshing {
                let (tx, rx) = oneshot::channel();
                flight.waiters.push(tx);
                Some(rx)
            } else {
                flight.refreshing = true;
                None
            }
        };

        if let Some(rx) = parked {
            // Waiter path: the leader resolves us. A dropped sender means the
            // page tore the session down mid-cycle; treat it as failure.
            return rx
                .await
                .unwrap_or_else(|_| Err(RefreshError::Network("refresh abandoned".to_owned())));
        }

        // Leader path: run the network call, then drain waiters in FIFO
        // enqueue order with the shared outcome.
        let result = self.run_refresh(transport).await;
        let waiters = {
            let mut flight = self.flight();
            flight.refreshing = false;
            std::mem::take(&mut flight.waiters)
        };
        for waiter in waiters {
            let _ = waiter.send(result.clone());
        }
        result
    }

    async fn run_refresh(&self, transport: &dyn Transport) -> Result<(), RefreshError> {
        let req = Request::post(REFRESH_ENDPOINT, None).without_auth_retry();

        let outcome = match transport.execute(&req).await {
            Ok(resp) if resp.ok() => {
                let user = resp
                    .json::<RefreshResponse>()
                    .ok()
                    .and_then(|body| body.user);
                Ok(user)
            }
            Ok(resp) => Err(RefreshError::Rejected(resp.status)),
            Err(e) => Err(RefreshError::Network(e)),
        };

        match outcome {
            Ok(user) => {
                (self.on_refreshed)(user);
                Ok(())
            }
            Err(e) => {
                (self.on_expired)();
                Err(e)
            }
        }
    }
}

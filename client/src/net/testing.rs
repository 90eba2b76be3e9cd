//! Scripted transport for exercising the request pipeline natively.
//!
//! Each `execute` call parks on a oneshot channel and records itself in a
//! pending queue; tests drain the queue with explicit statuses. This makes
//! interleavings deterministic: a test can hold several requests in flight,
//! answer them 401 one at a time, and observe exactly when the refresh call
//! appears.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use futures::channel::oneshot;

use crate::net::http::{Request, Response, Transport};

struct PendingExchange {
    method_path: String,
    respond: oneshot::Sender<Result<Response, String>>,
}

struct MockInner {
    pending: VecDeque<PendingExchange>,
    seen: Vec<String>,
}

pub(crate) struct MockTransport {
    inner: Mutex<MockInner>,
}

impl MockTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(MockInner { pending: VecDeque::new(), seen: Vec::new() }),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every request observed so far, oldest first, as `"METHOD path"`.
    pub(crate) fn seen(&self) -> Vec<String> {
        self.lock().seen.clone()
    }

    /// How many observed requests mention `needle`.
    pub(crate) fn seen_count(&self, needle: &str) -> usize {
        self.lock()
            .seen
            .iter()
            .filter(|line| line.contains(needle))
            .count()
    }

    pub(crate) fn pending_len(&self) -> usize {
        self.lock().pending.len()
    }

    /// Outstanding (unanswered) requests, oldest first.
    pub(crate) fn pending_paths(&self) -> Vec<String> {
        self.lock()
            .pending
            .iter()
            .map(|p| p.method_path.clone())
            .collect()
    }

    /// Answer the oldest outstanding request.
    pub(crate) fn resolve_next(&self, status: u16, body: serde_json::Value) {
        let exchange = self
            .lock()
            .pending
            .pop_front()
            .expect("no pending exchange to resolve");
        let _ = exchange.respond.send(Ok(Response { status, body }));
    }

    /// Fail the oldest outstanding request before any HTTP response.
    pub(crate) fn resolve_next_network_error(&self, message: &str) {
        let exchange = self
            .lock()
            .pending
            .pop_front()
            .expect("no pending exchange to resolve");
        let _ = exchange.respond.send(Err(message.to_owned()));
    }
}

#[async_trait::async_trait(?Send)]
impl Transport for MockTransport {
    async fn execute(&self, req: &Request) -> Result<Response, String> {
        let (tx, rx) = oneshot::channel();
        {
            let mut inner = self.lock();
            let line = format!("{} {}", req.method.as_str(), req.path);
            inner.seen.push(line.clone());
            inner
                .pending
                .push_back(PendingExchange { method_path: line, respond: tx });
        }
        rx.await
            .unwrap_or_else(|_| Err("mock transport dropped".to_owned()))
    }
}

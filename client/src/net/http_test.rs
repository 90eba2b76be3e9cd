use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::executor::LocalPool;
use futures::task::LocalSpawnExt;
use serde_json::json;

use super::*;
use crate::net::refresh::{REFRESH_ENDPOINT, RefreshCoordinator};
use crate::net::testing::MockTransport;

// =============================================================================
// Harness
// =============================================================================

fn coordinator_with_counters() -> (RefreshCoordinator, Arc<AtomicUsize>, Arc<AtomicUsize>) {
    let refreshed = Arc::new(AtomicUsize::new(0));
    let expired = Arc::new(AtomicUsize::new(0));
    let refreshed_hook = refreshed.clone();
    let expired_hook = expired.clone();
    let coordinator = RefreshCoordinator::new(
        move |_user| {
            refreshed_hook.fetch_add(1, Ordering::SeqCst);
        },
        move || {
            expired_hook.fetch_add(1, Ordering::SeqCst);
        },
    );
    (coordinator, refreshed, expired)
}

fn client_over(mock: &Arc<MockTransport>, coordinator: RefreshCoordinator) -> ApiClient {
    let transport: Arc<dyn Transport> = mock.clone();
    ApiClient::new(transport, coordinator)
}

type Outcome = (String, Result<u16, ApiError>);

fn spawn_get(
    pool: &LocalPool,
    client: &ApiClient,
    path: &str,
    outcomes: &Rc<RefCell<Vec<Outcome>>>,
) {
    let client = client.clone();
    let outcomes = outcomes.clone();
    let path = path.to_owned();
    pool.spawner()
        .spawn_local(async move {
            let result = client.send(&Request::get(&path)).await;
            outcomes
                .borrow_mut()
                .push((path, result.map(|resp| resp.status)));
        })
        .expect("spawn failed");
}

// =============================================================================
// Three concurrent 401s share one refresh and replay FIFO; a later 401
// starts a fresh cycle.
// =============================================================================

#[test]
fn concurrent_401s_share_one_refresh_and_replay_in_order() {
    let mut pool = LocalPool::new();
    let mock = MockTransport::new();
    let (coordinator, refreshed, expired) = coordinator_with_counters();
    let client = client_over(&mock, coordinator);
    let outcomes: Rc<RefCell<Vec<Outcome>>> = Rc::new(RefCell::new(Vec::new()));

    for path in ["/api/a", "/api/b", "/api/c"] {
        spawn_get(&pool, &client, path, &outcomes);
    }
    pool.run_until_stalled();
    assert_eq!(mock.pending_len(), 3, "all three requests should be in flight");

    // Expire them one at a time: the first becomes the refresh leader, the
    // other two must enqueue instead of starting their own refresh.
    mock.resolve_next(401, json!({}));
    pool.run_until_stalled();
    mock.resolve_next(401, json!({}));
    pool.run_until_stalled();
    mock.resolve_next(401, json!({}));
    pool.run_until_stalled();

    assert_eq!(mock.seen_count(REFRESH_ENDPOINT), 1, "exactly one refresh call for three expiries");
    assert_eq!(mock.pending_paths(), vec![format!("POST {REFRESH_ENDPOINT}")]);

    // Refresh succeeds: all three originals are replayed once each, in the
    // order they arrived.
    mock.resolve_next(200, json!({ "token": "T2" }));
    pool.run_until_stalled();
    assert_eq!(
        mock.pending_paths(),
        vec!["GET /api/a", "GET /api/b", "GET /api/c"],
        "replays follow enqueue order",
    );
    assert_eq!(refreshed.load(Ordering::SeqCst), 1);
    assert_eq!(expired.load(Ordering::SeqCst), 0);

    mock.resolve_next(200, json!({ "which": "a" }));
    mock.resolve_next(200, json!({ "which": "b" }));
    mock.resolve_next(200, json!({ "which": "c" }));
    pool.run_until_stalled();

    {
        let outcomes_now = outcomes.borrow();
        assert_eq!(outcomes_now.len(), 3);
        let order: Vec<&str> = outcomes_now.iter().map(|(path, _)| path.as_str()).collect();
        assert_eq!(order, vec!["/api/a", "/api/b", "/api/c"], "completion follows enqueue order");
        for (_, result) in outcomes_now.iter() {
            assert_eq!(*result.as_ref().unwrap(), 200);
        }
    }

    // A fourth call expiring after the cycle resolved starts a new cycle
    // rather than reusing the drained queue.
    spawn_get(&pool, &client, "/api/d", &outcomes);
    pool.run_until_stalled();
    mock.resolve_next(401, json!({}));
    pool.run_until_stalled();
    assert_eq!(mock.seen_count(REFRESH_ENDPOINT), 2, "separate second cycle");

    mock.resolve_next(200, json!({ "token": "T3" }));
    pool.run_until_stalled();
    mock.resolve_next(200, json!({}));
    pool.run_until_stalled();
    assert_eq!(outcomes.borrow().len(), 4);
    assert_eq!(refreshed.load(Ordering::SeqCst), 2);
}

// =============================================================================
// Refresh failure is terminal: every queued caller fails, logout fires
// once, and nothing loops back into another refresh.
// =============================================================================

#[test]
fn refresh_failure_fails_all_queued_callers_and_logs_out_once() {
    let mut pool = LocalPool::new();
    let mock = MockTransport::new();
    let (coordinator, refreshed, expired) = coordinator_with_counters();
    let client = client_over(&mock, coordinator);
    let outcomes: Rc<RefCell<Vec<Outcome>>> = Rc::new(RefCell::new(Vec::new()));

    for path in ["/api/a", "/api/b", "/api/c"] {
        spawn_get(&pool, &client, path, &outcomes);
    }
    pool.run_until_stalled();
    mock.resolve_next(401, json!({}));
    mock.resolve_next(401, json!({}));
    mock.resolve_next(401, json!({}));
    pool.run_until_stalled();
    assert_eq!(mock.seen_count(REFRESH_ENDPOINT), 1);

    // The refresh call itself is rejected.
    mock.resolve_next(401, json!({ "error": "refresh token expired" }));
    pool.run_until_stalled();

    assert_eq!(expired.load(Ordering::SeqCst), 1, "logout triggered exactly once");
    assert_eq!(refreshed.load(Ordering::SeqCst), 0);
    assert_eq!(mock.seen_count(REFRESH_ENDPOINT), 1, "no second refresh attempt");
    assert_eq!(mock.pending_len(), 0, "no replays after a failed refresh");

    let outcomes_now = outcomes.borrow();
    assert_eq!(outcomes_now.len(), 3);
    for (_, result) in outcomes_now.iter() {
        assert!(matches!(result, Err(ApiError::SessionExpired)));
    }
}

#[test]
fn refresh_network_error_is_also_terminal() {
    let mut pool = LocalPool::new();
    let mock = MockTransport::new();
    let (coordinator, _refreshed, expired) = coordinator_with_counters();
    let client = client_over(&mock, coordinator);
    let outcomes: Rc<RefCell<Vec<Outcome>>> = Rc::new(RefCell::new(Vec::new()));

    spawn_get(&pool, &client, "/api/a", &outcomes);
    pool.run_until_stalled();
    mock.resolve_next(401, json!({}));
    pool.run_until_stalled();
    mock.resolve_next_network_error("connection reset");
    pool.run_until_stalled();

    assert_eq!(expired.load(Ordering::SeqCst), 1);
    let outcomes_now = outcomes.borrow();
    assert!(matches!(outcomes_now[0].1, Err(ApiError::SessionExpired)));
}

// =============================================================================
// 403 bypasses the refresh coordinator entirely.
// =============================================================================

#[test]
fn forbidden_is_surfaced_without_refresh() {
    let mut pool = LocalPool::new();
    let mock = MockTransport::new();
    let (coordinator, refreshed, expired) = coordinator_with_counters();
    let client = client_over(&mock, coordinator);
    let outcomes: Rc<RefCell<Vec<Outcome>>> = Rc::new(RefCell::new(Vec::new()));

    spawn_get(&pool, &client, "/api/admin/settings", &outcomes);
    pool.run_until_stalled();
    mock.resolve_next(403, json!({ "error": "staff only" }));
    pool.run_until_stalled();

    assert_eq!(mock.seen_count(REFRESH_ENDPOINT), 0, "403 must not touch the refresh path");
    assert_eq!(refreshed.load(Ordering::SeqCst), 0);
    assert_eq!(expired.load(Ordering::SeqCst), 0);
    assert!(matches!(outcomes.borrow()[0].1, Err(ApiError::Forbidden)));
}

// =============================================================================
// 5xx: surfaced, not retried.
// =============================================================================

#[test]
fn server_errors_are_not_retried() {
    let mut pool = LocalPool::new();
    let mock = MockTransport::new();
    let (coordinator, _refreshed, _expired) = coordinator_with_counters();
    let client = client_over(&mock, coordinator);
    let outcomes: Rc<RefCell<Vec<Outcome>>> = Rc::new(RefCell::new(Vec::new()));

    spawn_get(&pool, &client, "/api/units", &outcomes);
    pool.run_until_stalled();
    mock.resolve_next(500, json!({}));
    pool.run_until_stalled();

    assert_eq!(mock.seen(), vec!["GET /api/units"], "exactly one attempt");
    assert!(matches!(outcomes.borrow()[0].1, Err(ApiError::Server { status: 500 })));
}

// =============================================================================
// Retry-once cap: a 401 that survives the refreshed replay is returned as-is.
// =============================================================================

#[test]
fn second_401_after_refresh_is_not_retried_again() {
    let mut pool = LocalPool::new();
    let mock = MockTransport::new();
    let (coordinator, refreshed, _expired) = coordinator_with_counters();
    let client = client_over(&mock, coordinator);
    let outcomes: Rc<RefCell<Vec<Outcome>>> = Rc::new(RefCell::new(Vec::new()));

    spawn_get(&pool, &client, "/api/a", &outcomes);
    pool.run_until_stalled();
    mock.resolve_next(401, json!({}));
    pool.run_until_stalled();
    mock.resolve_next(200, json!({ "token": "T2" }));
    pool.run_until_stalled();
    // The replay also comes back 401; no loop, result passes through.
    mock.resolve_next(401, json!({}));
    pool.run_until_stalled();

    assert_eq!(mock.seen_count(REFRESH_ENDPOINT), 1);
    assert_eq!(refreshed.load(Ordering::SeqCst), 1);
    assert_eq!(*outcomes.borrow()[0].1.as_ref().unwrap(), 401);
}

// =============================================================================
// Opted-out requests (login itself) never enter the refresh path.
// =============================================================================

#[test]
fn auth_retry_opt_out_passes_401_through() {
    let mut pool = LocalPool::new();
    let mock = MockTransport::new();
    let (coordinator, _refreshed, expired) = coordinator_with_counters();
    let client = client_over(&mock, coordinator);
    let outcome: Rc<RefCell<Option<Result<u16, ApiError>>>> = Rc::new(RefCell::new(None));

    let task_client = client.clone();
    let task_outcome = outcome.clone();
    pool.spawner()
        .spawn_local(async move {
            let req = Request::post("/api/auth/login", Some(json!({ "email": "x", "password": "y" })))
                .without_auth_retry();
            let result = task_client.send(&req).await;
            *task_outcome.borrow_mut() = Some(result.map(|resp| resp.status));
        })
        .expect("spawn failed");
    pool.run_until_stalled();
    mock.resolve_next(401, json!({ "error": "bad credentials" }));
    pool.run_until_stalled();

    assert_eq!(mock.seen_count(REFRESH_ENDPOINT), 0);
    assert_eq!(expired.load(Ordering::SeqCst), 0);
    assert_eq!(*outcome.borrow().as_ref().unwrap().as_ref().unwrap(), 401);
}

// =============================================================================
// Plumbing
// =============================================================================

#[test]
fn response_ok_covers_2xx_only() {
    assert!(Response { status: 200, body: json!({}) }.ok());
    assert!(Response { status: 204, body: json!(null) }.ok());
    assert!(!Response { status: 199, body: json!({}) }.ok());
    assert!(!Response { status: 301, body: json!({}) }.ok());
    assert!(!Response { status: 401, body: json!({}) }.ok());
}

#[test]
fn response_json_decodes_into_target() {
    let resp = Response { status: 200, body: json!({ "token": "T1" }) };
    let parsed: crate::net::types::RefreshResponse = resp.json().unwrap();
    assert_eq!(parsed.token, "T1");
}

#[test]
fn response_json_decode_failure_is_typed() {
    let resp = Response { status: 200, body: json!({ "nope": true }) };
    let parsed = resp.json::<crate::net::types::RefreshResponse>();
    assert!(matches!(parsed, Err(ApiError::Decode(_))));
}

#[test]
fn method_as_str() {
    assert_eq!(Method::Get.as_str(), "GET");
    assert_eq!(Method::Post.as_str(), "POST");
    assert_eq!(Method::Patch.as_str(), "PATCH");
    assert_eq!(Method::Delete.as_str(), "DELETE");
}

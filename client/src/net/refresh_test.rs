use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use futures::executor::LocalPool;
use futures::task::LocalSpawnExt;
use serde_json::json;

use super::*;
use crate::net::testing::MockTransport;
use crate::net::types::User;

fn hooks() -> (
    Arc<Mutex<Vec<Option<String>>>>,
    Arc<AtomicUsize>,
    RefreshCoordinator,
) {
    let refreshed_users: Arc<Mutex<Vec<Option<String>>>> = Arc::new(Mutex::new(Vec::new()));
    let expired = Arc::new(AtomicUsize::new(0));
    let users_hook = refreshed_users.clone();
    let expired_hook = expired.clone();
    let coordinator = RefreshCoordinator::new(
        move |user: Option<User>| {
            users_hook.lock().unwrap().push(user.map(|u| u.name));
        },
        move || {
            expired_hook.fetch_add(1, Ordering::SeqCst);
        },
    );
    (refreshed_users, expired, coordinator)
}

// =============================================================================
// Leader path
// =============================================================================

#[test]
fn leader_posts_refresh_endpoint_and_reports_user() {
    let mut pool = LocalPool::new();
    let mock = MockTransport::new();
    let (users, expired, coordinator) = hooks();
    let done = Rc::new(Cell::new(false));

    let task_mock = mock.clone();
    let task_coordinator = coordinator.clone();
    let task_done = done.clone();
    pool.spawner()
        .spawn_local(async move {
            task_coordinator
                .refresh(task_mock.as_ref())
                .await
                .expect("refresh should succeed");
            task_done.set(true);
        })
        .expect("spawn failed");

    pool.run_until_stalled();
    assert!(coordinator.is_refreshing());
    assert_eq!(mock.seen(), vec![format!("POST {REFRESH_ENDPOINT}")]);

    mock.resolve_next(
        200,
        json!({
            "token": "T2",
            "user": { "id": "u1", "name": "Ada", "email": "ada@example.com", "role": "teacher" }
        }),
    );
    pool.run_until_stalled();

    assert!(done.get());
    assert!(!coordinator.is_refreshing());
    assert_eq!(users.lock().unwrap().as_slice(), [Some("Ada".to_owned())]);
    assert_eq!(expired.load(Ordering::SeqCst), 0);
}

#[test]
fn success_without_user_payload_reports_none() {
    let mut pool = LocalPool::new();
    let mock = MockTransport::new();
    let (users, _expired, coordinator) = hooks();

    let task_mock = mock.clone();
    let task_coordinator = coordinator.clone();
    pool.spawner()
        .spawn_local(async move {
            let _ = task_coordinator.refresh(task_mock.as_ref()).await;
        })
        .expect("spawn failed");
    pool.run_until_stalled();
    mock.resolve_next(200, json!({ "token": "T2" }));
    pool.run_until_stalled();

    assert_eq!(users.lock().unwrap().as_slice(), [None]);
}

// =============================================================================
// Waiter path; joiners share the in-flight cycle instead of starting one.
// =============================================================================

#[test]
fn joiners_share_the_cycle_and_wake_in_enqueue_order() {
    let mut pool = LocalPool::new();
    let mock = MockTransport::new();
    let (_users, _expired, coordinator) = hooks();
    let wake_order: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));

    for label in ["first", "second", "third"] {
        let task_mock = mock.clone();
        let task_coordinator = coordinator.clone();
        let task_order = wake_order.clone();
        pool.spawner()
            .spawn_local(async move {
                task_coordinator
                    .refresh(task_mock.as_ref())
                    .await
                    .expect("refresh should succeed");
                task_order.borrow_mut().push(label);
            })
            .expect("spawn failed");
    }

    pool.run_until_stalled();
    // One network call for three concurrent callers.
    assert_eq!(mock.seen_count(REFRESH_ENDPOINT), 1);

    mock.resolve_next(200, json!({ "token": "T2" }));
    pool.run_until_stalled();
    assert_eq!(wake_order.borrow().as_slice(), ["first", "second", "third"]);
}

#[test]
fn failure_is_shared_with_every_waiter_and_expires_once() {
    let mut pool = LocalPool::new();
    let mock = MockTransport::new();
    let (users, expired, coordinator) = hooks();
    let errors: Rc<RefCell<Vec<RefreshError>>> = Rc::new(RefCell::new(Vec::new()));

    for _ in 0..3 {
        let task_mock = mock.clone();
        let task_coordinator = coordinator.clone();
        let task_errors = errors.clone();
        pool.spawner()
            .spawn_local(async move {
                if let Err(e) = task_coordinator.refresh(task_mock.as_ref()).await {
                    task_errors.borrow_mut().push(e);
                }
            })
            .expect("spawn failed");
    }

    pool.run_until_stalled();
    mock.resolve_next(401, json!({ "error": "expired" }));
    pool.run_until_stalled();

    assert_eq!(errors.borrow().len(), 3);
    for error in errors.borrow().iter() {
        assert!(matches!(error, RefreshError::Rejected(401)));
    }
    assert_eq!(expired.load(Ordering::SeqCst), 1, "on_expired fires once, not per waiter");
    assert!(users.lock().unwrap().is_empty());
    assert!(!coordinator.is_refreshing());
}

// =============================================================================
// Cycle isolation: a later call starts over.
// =============================================================================

#[test]
fn next_call_after_resolution_starts_a_new_cycle() {
    let mut pool = LocalPool::new();
    let mock = MockTransport::new();
    let (_users, _expired, coordinator) = hooks();

    for _ in 0..2 {
        let task_mock = mock.clone();
        let task_coordinator = coordinator.clone();
        pool.spawner()
            .spawn_local(async move {
                let _ = task_coordinator.refresh(task_mock.as_ref()).await;
            })
            .expect("spawn failed");
        pool.run_until_stalled();
        mock.resolve_next(200, json!({ "token": "T" }));
        pool.run_until_stalled();
    }

    assert_eq!(mock.seen_count(REFRESH_ENDPOINT), 2);
}

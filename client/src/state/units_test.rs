use super::*;
use crate::net::types::Unit;

fn unit(id: &str, code: &str) -> Unit {
    Unit {
        id: id.to_owned(),
        code: code.to_owned(),
        title: "Intro".to_owned(),
        description: None,
        teacher_name: None,
    }
}

#[test]
fn loaded_replaces_items_and_clears_error() {
    let mut state = UnitsState { loading: true, error: Some("old".into()), ..Default::default() };
    state.set_loaded(vec![unit("a", "COMP1010")]);
    assert_eq!(state.items.len(), 1);
    assert!(!state.loading);
    assert!(state.error.is_none());
}

#[test]
fn failed_keeps_previous_items() {
    let mut state = UnitsState::default();
    state.set_loaded(vec![unit("a", "COMP1010")]);
    state.set_failed("server error (500)");
    assert_eq!(state.items.len(), 1, "stale list beats an empty screen");
    assert_eq!(state.error.as_deref(), Some("server error (500)"));
}

#[test]
fn upsert_prepends_new_and_replaces_existing() {
    let mut state = UnitsState::default();
    state.set_loaded(vec![unit("a", "COMP1010")]);

    state.upsert(unit("b", "COMP2020"));
    assert_eq!(state.items[0].code, "COMP2020");

    let mut replacement = unit("a", "COMP1010");
    replacement.title = "Intro (revised)".to_owned();
    state.upsert(replacement);
    assert_eq!(state.items.len(), 2);
    assert_eq!(state.items[1].title, "Intro (revised)");
}

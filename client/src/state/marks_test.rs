use super::*;
use crate::net::types::MarkRow;

fn row(unit: &str, component: &str, score: f64, max: f64) -> MarkRow {
    MarkRow {
        unit_code: unit.to_owned(),
        component: component.to_owned(),
        score,
        max_score: max,
    }
}

#[test]
fn unit_totals_sums_components_per_unit() {
    let mut state = MarksState::default();
    state.set_loaded(vec![
        row("COMP1010", "Quiz 1", 8.0, 10.0),
        row("COMP1010", "Assignment 1", 15.0, 20.0),
        row("MATH1002", "Quiz 1", 6.0, 10.0),
    ]);

    let totals = state.unit_totals();
    assert_eq!(totals.len(), 2);
    assert_eq!(
        totals[0],
        UnitTotal { unit_code: "COMP1010".to_owned(), score: 23.0, max_score: 30.0 }
    );
    assert_eq!(totals[1].unit_code, "MATH1002");
}

#[test]
fn unit_totals_preserves_first_seen_order() {
    let mut state = MarksState::default();
    state.set_loaded(vec![
        row("MATH1002", "Quiz 1", 1.0, 10.0),
        row("COMP1010", "Quiz 1", 2.0, 10.0),
        row("MATH1002", "Quiz 2", 3.0, 10.0),
    ]);
    let codes: Vec<_> = state.unit_totals().into_iter().map(|t| t.unit_code).collect();
    assert_eq!(codes, vec!["MATH1002", "COMP1010"]);
}

#[test]
fn empty_rows_give_empty_totals() {
    let state = MarksState::default();
    assert!(state.unit_totals().is_empty());
}

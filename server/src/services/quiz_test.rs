use super::*;

use std::collections::HashMap;

fn question(id: &str, answer_index: usize, points: f64) -> Question {
    Question {
        id: id.to_owned(),
        prompt: format!("Question {id}"),
        options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
        answer_index,
        points,
    }
}

// =============================================================================
// grade
// =============================================================================

#[test]
fn full_marks_for_all_correct() {
    let questions = vec![question("q1", 0, 2.0), question("q2", 3, 3.0)];
    let answers = HashMap::from([("q1".to_owned(), 0), ("q2".to_owned(), 3)]);
    assert_eq!(grade(&questions, &answers), (5.0, 5.0));
}

#[test]
fn wrong_answers_score_zero_for_that_question() {
    let questions = vec![question("q1", 0, 2.0), question("q2", 3, 3.0)];
    let answers = HashMap::from([("q1".to_owned(), 1), ("q2".to_owned(), 3)]);
    assert_eq!(grade(&questions, &answers), (3.0, 5.0));
}

#[test]
fn unanswered_questions_still_count_toward_max() {
    let questions = vec![question("q1", 0, 2.0), question("q2", 3, 3.0)];
    let answers = HashMap::from([("q1".to_owned(), 0)]);
    assert_eq!(grade(&questions, &answers), (2.0, 5.0));
}

#[test]
fn answers_to_unknown_questions_are_ignored() {
    let questions = vec![question("q1", 0, 2.0)];
    let answers = HashMap::from([("q1".to_owned(), 0), ("ghost".to_owned(), 0)]);
    assert_eq!(grade(&questions, &answers), (2.0, 2.0));
}

#[test]
fn out_of_range_answer_is_just_wrong() {
    let questions = vec![question("q1", 0, 2.0)];
    let answers = HashMap::from([("q1".to_owned(), 99)]);
    assert_eq!(grade(&questions, &answers), (0.0, 2.0));
}

#[test]
fn empty_quiz_grades_to_zero_of_zero() {
    let answers = HashMap::new();
    assert_eq!(grade(&[], &answers), (0.0, 0.0));
}

// =============================================================================
// Question serde; the JSONB wire shape.
// =============================================================================

#[test]
fn question_round_trips_through_json() {
    let original = question("q1", 2, 1.5);
    let json = serde_json::to_value(&original).unwrap();
    let restored: Question = serde_json::from_value(json).unwrap();
    assert_eq!(restored, original);
}

#[test]
fn question_rejects_missing_answer_index() {
    let result = serde_json::from_value::<Question>(serde_json::json!({
        "id": "q1",
        "prompt": "?",
        "options": ["A"],
        "points": 1.0
    }));
    assert!(result.is_err());
}

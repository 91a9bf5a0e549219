use serde_json::json;

use form_spec::{AnswerSet, AnswerValue};

#[test]
fn checkbox_toggle_on_then_off_restores_prior_value() {
    let mut answers = AnswerSet::new();
    let before = answers.clone();
    assert!(answers.toggle_choice("coverage", "Theft"));
    assert!(!answers.toggle_choice("coverage", "Theft"));
    assert_eq!(answers, before);

    answers.insert("coverage", ["Glass"]);
    let before = answers.clone();
    answers.toggle_choice("coverage", "Collision");
    answers.toggle_choice("coverage", "Collision");
    assert_eq!(answers, before);
}

#[test]
fn choices_are_order_insensitive() {
    let mut left = AnswerSet::new();
    left.toggle_choice("coverage", "Theft");
    left.toggle_choice("coverage", "Glass");
    let mut right = AnswerSet::new();
    right.toggle_choice("coverage", "Glass");
    right.toggle_choice("coverage", "Theft");
    assert_eq!(left, right);
}

#[test]
fn serializes_as_a_flat_map() {
    let mut answers: AnswerSet = [("age", "30"), ("country", "US")].into_iter().collect();
    answers.toggle_choice("coverage", "Theft");
    assert_eq!(
        answers.to_json(),
        json!({ "age": "30", "country": "US", "coverage": ["Theft"] })
    );

    let decoded: AnswerSet = serde_json::from_value(answers.to_json()).expect("decode");
    assert_eq!(decoded.get("coverage"), Some(&AnswerValue::from(["Theft"])));
}

#[test]
fn merge_overwrites_existing_answers() {
    let mut answers: AnswerSet = [("age", "30")].into_iter().collect();
    answers.merge([("age", "31"), ("country", "US")].into_iter().collect());
    assert_eq!(answers.text("age"), Some("31"));
    assert_eq!(answers.len(), 2);
}

use serde_json::json;

use form_spec::{AnswerSet, DynamicOptionsCache, FormSchema, validate};

fn car_form() -> FormSchema {
    serde_json::from_value(json!({
        "formId": "car_insurance_application",
        "title": "Car Insurance Application",
        "fields": [
            {
                "id": "personal_info",
                "label": "Personal Information",
                "type": "group",
                "fields": [
                    { "id": "first_name", "label": "First Name", "type": "text", "required": true,
                      "validation": { "pattern": "^[A-Za-z ]+$" } },
                    { "id": "age", "label": "Age", "type": "number", "required": true,
                      "validation": { "min": 18, "max": 99 } },
                    { "id": "dob", "label": "Date of Birth", "type": "date", "required": false },
                    { "id": "coverage", "label": "Coverage", "type": "checkbox", "required": false,
                      "options": ["Collision", "Theft", "Glass"] }
                ]
            },
            {
                "id": "vehicle_info",
                "label": "Vehicle Information",
                "type": "group",
                "fields": [
                    { "id": "has_accidents", "label": "Any accidents?", "type": "radio", "required": true,
                      "options": ["Yes", "No"] },
                    { "id": "accident_count", "label": "How many?", "type": "number", "required": true,
                      "visibility": { "dependsOn": "has_accidents", "condition": "equals", "value": "Yes" } }
                ]
            }
        ]
    }))
    .expect("fixture should deserialize")
}

fn complete_answers() -> AnswerSet {
    [("first_name", "Ada"), ("age", "30"), ("has_accidents", "No")]
        .into_iter()
        .collect()
}

#[test]
fn complete_answers_are_valid() {
    let report = validate(&car_form(), &complete_answers(), &DynamicOptionsCache::new());
    assert!(report.valid, "{:?}", report);
    assert!(report.messages().is_empty());
}

#[test]
fn hidden_required_field_does_not_block() {
    let report = validate(&car_form(), &complete_answers(), &DynamicOptionsCache::new());
    assert!(!report.missing_required.contains(&"accident_count".to_string()));
}

#[test]
fn visible_required_field_blocks_when_empty() {
    let mut answers = complete_answers();
    answers.insert("has_accidents", "Yes");
    let report = validate(&car_form(), &answers, &DynamicOptionsCache::new());
    assert!(!report.valid);
    assert_eq!(report.missing_required, vec!["accident_count".to_string()]);

    answers.insert("accident_count", "   ");
    let report = validate(&car_form(), &answers, &DynamicOptionsCache::new());
    assert_eq!(report.missing_required, vec!["accident_count".to_string()]);
}

#[test]
fn number_bounds_and_format_are_enforced() {
    let mut answers = complete_answers();
    answers.insert("age", "12");
    let report = validate(&car_form(), &answers, &DynamicOptionsCache::new());
    assert_eq!(report.issues[0].code, "min");

    answers.insert("age", "thirty");
    let report = validate(&car_form(), &answers, &DynamicOptionsCache::new());
    assert_eq!(report.issues[0].code, "number_format");
}

#[test]
fn pattern_and_date_are_enforced() {
    let mut answers = complete_answers();
    answers.insert("first_name", "R2-D2");
    answers.insert("dob", "05/01/1990");
    let report = validate(&car_form(), &answers, &DynamicOptionsCache::new());
    let codes: Vec<_> = report.issues.iter().map(|issue| issue.code.as_str()).collect();
    assert_eq!(codes, ["pattern_mismatch", "date_format"]);

    answers.insert("first_name", "Ada");
    answers.insert("dob", "1990-01-05");
    assert!(validate(&car_form(), &answers, &DynamicOptionsCache::new()).valid);
}

#[test]
fn choices_must_come_from_the_option_list() {
    let mut answers = complete_answers();
    answers.insert("has_accidents", "Maybe");
    answers.toggle_choice("coverage", "Theft");
    answers.toggle_choice("coverage", "Flood");
    let report = validate(&car_form(), &answers, &DynamicOptionsCache::new());
    let flagged: Vec<_> = report.issues.iter().map(|issue| issue.field_id.as_str()).collect();
    assert_eq!(flagged, ["coverage", "has_accidents"]);
}

#[test]
fn unknown_answers_are_reported_but_do_not_block() {
    let mut answers = complete_answers();
    answers.insert("legacy_field", "x");
    let report = validate(&car_form(), &answers, &DynamicOptionsCache::new());
    assert!(report.valid);
    assert_eq!(report.unknown_fields, vec!["legacy_field".to_string()]);
}

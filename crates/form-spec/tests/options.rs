use serde_json::json;

use form_spec::{AnswerSet, DynamicOptionsCache, FormSchema, HttpMethod};

fn address_form() -> FormSchema {
    serde_json::from_value(json!({
        "formId": "health_insurance_application",
        "title": "Health Insurance Application",
        "fields": [{
            "id": "address",
            "label": "Address",
            "type": "group",
            "fields": [
                { "id": "country", "label": "Country", "type": "select", "required": true,
                  "options": ["USA", "Canada"] },
                { "id": "state", "label": "State", "type": "select", "required": true,
                  "options": ["Unknown"],
                  "dynamicOptions": { "dependsOn": "country", "endpoint": "/api/getStates", "method": "GET" } }
            ]
        }]
    }))
    .expect("fixture should deserialize")
}

#[test]
fn first_value_issues_a_request() {
    let form = address_form();
    let mut cache = DynamicOptionsCache::new();
    let answers: AnswerSet = [("country", "USA")].into_iter().collect();

    let requests = cache.requests_for(&form, "country", &answers);
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].field_id, "state");
    assert_eq!(requests[0].value, "USA");
    assert_eq!(requests[0].endpoint, "/api/getStates");
    assert_eq!(requests[0].method, HttpMethod::Get);
}

#[test]
fn settled_value_is_not_refetched() {
    let form = address_form();
    let mut cache = DynamicOptionsCache::new();
    let answers: AnswerSet = [("country", "USA")].into_iter().collect();

    assert_eq!(cache.requests_for(&form, "country", &answers).len(), 1);
    assert!(cache.requests_for(&form, "country", &answers).is_empty());
}

#[test]
fn blank_dependency_issues_nothing() {
    let form = address_form();
    let mut cache = DynamicOptionsCache::new();
    let answers: AnswerSet = [("country", "  ")].into_iter().collect();
    assert!(cache.requests_for(&form, "country", &answers).is_empty());
    assert!(cache.requests_for(&form, "state", &answers).is_empty());
}

#[test]
fn superseded_response_is_discarded() {
    let form = address_form();
    let mut cache = DynamicOptionsCache::new();

    let us = cache
        .requests_for(&form, "country", &[("country", "USA")].into_iter().collect())
        .remove(0);
    let ca = cache
        .requests_for(&form, "country", &[("country", "Canada")].into_iter().collect())
        .remove(0);

    assert!(cache.complete(&ca, vec!["Ontario".into(), "Quebec".into()]));
    assert!(!cache.complete(&us, vec!["California".into()]));

    let state = form.field("state").expect("state field");
    assert_eq!(cache.effective(state), ["Ontario", "Quebec"]);
}

#[test]
fn failure_keeps_previous_options_and_allows_retry() {
    let form = address_form();
    let state = form.field("state").expect("state field");
    let mut cache = DynamicOptionsCache::new();
    assert_eq!(cache.effective(state), ["Unknown"]);

    let answers: AnswerSet = [("country", "USA")].into_iter().collect();
    let request = cache.requests_for(&form, "country", &answers).remove(0);
    cache.fail(&request);

    assert_eq!(cache.effective(state), ["Unknown"]);
    assert_eq!(cache.requests_for(&form, "country", &answers).len(), 1);
}

#[test]
fn clearing_the_dependency_discards_in_flight_response() {
    let form = address_form();
    let mut cache = DynamicOptionsCache::new();
    let answers: AnswerSet = [("country", "USA")].into_iter().collect();
    let usa = cache.requests_for(&form, "country", &answers).remove(0);

    let cleared: AnswerSet = [("country", "")].into_iter().collect();
    assert!(cache.requests_for(&form, "country", &cleared).is_empty());
    assert_eq!(cache.requested_value("state"), None);

    assert!(!cache.complete(&usa, vec!["California".into()]));
    assert_eq!(cache.get("state"), None);

    // picking the same value again fetches afresh
    assert_eq!(cache.requests_for(&form, "country", &answers).len(), 1);
}

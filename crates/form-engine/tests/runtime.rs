use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use form_client::{ApiRequest, SchemaRepository, SubmissionGateway, Transport, TransportError};
use form_engine::{
    DraftSlot, EngineConfig, FormRuntime, MemoryDraftStore, SessionError, SessionState,
};
use serde_json::{Value, json};

struct FakeApi {
    sent: Mutex<Vec<ApiRequest>>,
}

#[async_trait]
impl Transport for FakeApi {
    async fn send(&self, request: ApiRequest) -> Result<Value, TransportError> {
        self.sent.lock().expect("lock").push(request.clone());
        match request.target.as_str() {
            "/forms" => Ok(json!([
                {
                    "formId": "home",
                    "title": "Home Insurance",
                    "fields": [{
                        "id": "address",
                        "label": "Address",
                        "type": "group",
                        "fields": [
                            { "id": "country", "label": "Country", "type": "select", "options": ["USA", "Canada"], "required": true },
                            {
                                "id": "state",
                                "label": "State",
                                "type": "select",
                                "dynamicOptions": { "dependsOn": "country", "endpoint": "/getStates", "method": "GET" }
                            }
                        ]
                    }]
                }
            ])),
            "/getStates" => {
                let country = request
                    .query
                    .iter()
                    .find(|(key, _)| key == "country")
                    .map(|(_, value)| value.as_str());
                match country {
                    Some("USA") => Ok(json!({ "country": "USA", "states": ["California", "Texas"] })),
                    Some("Canada") => Ok(json!({ "country": "Canada", "states": ["Ontario"] })),
                    Some("Atlantis") => panic!("no such country"),
                    _ => Err(TransportError::Status {
                        url: "/getStates".into(),
                        status: 404,
                    }),
                }
            }
            "/forms/submit" => Ok(json!({ "status": "ok" })),
            other => Err(TransportError::Unavailable(other.to_string())),
        }
    }
}

struct Fixture {
    api: Arc<FakeApi>,
    store: Arc<MemoryDraftStore>,
    runtime: FormRuntime,
}

async fn start(store: Arc<MemoryDraftStore>) -> Fixture {
    let api = Arc::new(FakeApi {
        sent: Mutex::new(Vec::new()),
    });
    let repository = Arc::new(SchemaRepository::new(api.clone()));
    let gateway = Arc::new(SubmissionGateway::new(api.clone()));
    let slot = Arc::new(DraftSlot::new(store.clone()));
    let config = EngineConfig {
        autosave_interval_secs: 1,
        ..EngineConfig::default()
    };
    let runtime = FormRuntime::start(repository, gateway, slot, &config)
        .await
        .expect("runtime starts");
    Fixture { api, store, runtime }
}

#[tokio::test]
async fn dependent_options_are_fetched_and_applied() {
    let Fixture { api, runtime: mut rt, .. } = start(Arc::new(MemoryDraftStore::default())).await;
    rt.select_schema("home").unwrap();
    rt.set_answer("country", "USA").unwrap();
    assert_eq!(rt.settle_options().await, 1);

    let state = rt.session().schema().unwrap().field("state").unwrap().clone();
    assert_eq!(rt.session().effective_options(&state), ["California", "Texas"]);

    rt.set_answer("country", "Canada").unwrap();
    rt.settle_options().await;
    assert_eq!(rt.session().effective_options(&state), ["Ontario"]);

    let fetches = api
        .sent
        .lock()
        .unwrap()
        .iter()
        .filter(|request| request.target == "/getStates")
        .count();
    assert_eq!(fetches, 2);
    rt.shutdown().await;
}

#[tokio::test]
async fn failed_option_fetch_keeps_the_form_usable() {
    let Fixture { runtime: mut rt, .. } = start(Arc::new(MemoryDraftStore::default())).await;
    rt.select_schema("home").unwrap();
    rt.set_answer("country", "Mexico").unwrap();
    assert_eq!(rt.settle_options().await, 0);
    assert_eq!(rt.session().options().get("state"), None);

    rt.set_answer("country", "USA").unwrap();
    assert_eq!(rt.settle_options().await, 1);
    rt.shutdown().await;
}

#[tokio::test]
async fn panicking_fetch_still_reports_an_outcome() {
    let Fixture { runtime: mut rt, .. } = start(Arc::new(MemoryDraftStore::default())).await;
    rt.select_schema("home").unwrap();
    rt.set_answer("country", "Atlantis").unwrap();

    let applied = tokio::time::timeout(Duration::from_secs(5), rt.settle_options())
        .await
        .expect("settling must not hang");
    assert_eq!(applied, 0);
    assert_eq!(rt.session().options().requested_value("state"), None);

    rt.set_answer("country", "USA").unwrap();
    assert_eq!(rt.settle_options().await, 1);
    rt.shutdown().await;
}

#[tokio::test]
async fn stored_draft_is_restored_with_eager_option_fetch() {
    let store = Arc::new(MemoryDraftStore::with_contents(
        json!({ "formId": "home", "answers": { "country": "Canada" } }).to_string(),
    ));
    let Fixture { runtime: mut rt, .. } = start(store).await;

    assert_eq!(rt.session().state(), SessionState::Editing);
    assert_eq!(rt.session().answers().text("country"), Some("Canada"));
    rt.settle_options().await;
    assert_eq!(
        rt.session().options().get("state"),
        Some(&["Ontario".to_string()][..])
    );
    rt.shutdown().await;
}

#[tokio::test]
async fn autosave_persists_edits_until_submission_clears_them() {
    let Fixture { store, runtime: mut rt, .. } = start(Arc::new(MemoryDraftStore::default())).await;
    rt.select_schema("home").unwrap();
    rt.set_answer("country", "USA").unwrap();
    rt.settle_options().await;

    tokio::time::sleep(Duration::from_millis(1300)).await;
    let saved = store.contents().await.expect("autosaved draft");
    assert!(saved.contains("\"country\":\"USA\""));

    rt.submit().await.unwrap();
    assert_eq!(store.contents().await, None);

    tokio::time::sleep(Duration::from_millis(1100)).await;
    assert_eq!(store.contents().await, None);
    rt.shutdown().await;
}

#[tokio::test]
async fn submission_requires_visible_required_answers() {
    let Fixture { api, runtime: mut rt, .. } = start(Arc::new(MemoryDraftStore::default())).await;
    rt.select_schema("home").unwrap();

    let err = rt.submit().await.unwrap_err();
    assert!(matches!(err, SessionError::Validation(report) if report.missing_required == ["country"]));
    assert!(
        !api.sent
            .lock()
            .unwrap()
            .iter()
            .any(|request| request.target == "/forms/submit")
    );
    rt.shutdown().await;
}

use assert_cmd::Command;
use form_engine::{EngineConfig, FormSession};
use form_spec::FormCatalog;
use insurance_forms::AppConfig;
use insurance_forms::cmd::fill::parse_answer;
use insurance_forms::cmd::submissions::{SubmissionsArgs, configure};
use insurance_forms::render;
use predicates::prelude::*;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use submission_table::TableView;

#[test]
fn help_lists_commands() {
    Command::cargo_bin("insurance-forms")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("fill"))
        .stdout(predicate::str::contains("submissions"));
}

#[test]
fn schema_command_prints_json_schema() {
    Command::cargo_bin("insurance-forms")
        .unwrap()
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"array\""));
}

#[test]
fn missing_explicit_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("insurance-forms")
        .unwrap()
        .args(["--config"])
        .arg(dir.path().join("absent.toml"))
        .arg("forms")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config"));
}

#[test]
fn config_tables_override_defaults() {
    let config = AppConfig::from_toml_str(
        r#"
        [client]
        base_url = "http://localhost:8080/api"

        [engine]
        autosave_interval_secs = 2
        "#,
    )
    .unwrap();
    assert_eq!(config.client.base_url, "http://localhost:8080/api");
    assert_eq!(config.client.timeout_secs, 30);
    assert_eq!(config.engine.autosave_interval_secs, 2);
    assert_eq!(config.engine.draft_key, EngineConfig::default().draft_key);

    assert_eq!(AppConfig::from_toml_str("").unwrap(), AppConfig::default());
}

#[test]
fn answers_parse_as_id_value_pairs() {
    assert_eq!(
        parse_answer("country=United States").unwrap(),
        ("country".to_string(), "United States".to_string())
    );
    assert_eq!(parse_answer("note=").unwrap().1, "");
    assert!(parse_answer("country").is_err());
    assert!(parse_answer("=US").is_err());
}

fn records() -> Vec<Map<String, Value>> {
    serde_json::from_value(json!([
        { "id": "1", "Full Name": "Bea", "Age": 41, "Insurance Type": "Health" },
        { "id": "2", "Full Name": "al", "Age": 29, "Insurance Type": "Car" },
        { "id": "3", "Full Name": "Cy", "Age": 35, "Insurance Type": "Home" }
    ]))
    .expect("fixture should deserialize")
}

fn columns() -> Vec<String> {
    ["Full Name", "Age", "Insurance Type"]
        .map(str::to_string)
        .to_vec()
}

#[test]
fn table_shows_requested_columns_sorted() {
    let mut view = TableView::new(columns(), &records());
    let args = SubmissionsArgs {
        columns: vec!["Age".into(), "Full Name".into()],
        sort: Some("Age".into()),
        desc: true,
    };
    configure(&mut view, &args).unwrap();

    let rendered = render::table(&view);
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("Age ▼"));
    assert!(lines[0].ends_with("Full Name"));
    assert!(lines[1].starts_with("41"));
    assert!(lines[3].starts_with("29"));
}

#[test]
fn unknown_table_column_is_rejected() {
    let mut view = TableView::new(columns(), &records());
    let args = SubmissionsArgs {
        columns: vec!["Premium".into()],
        ..SubmissionsArgs::default()
    };
    assert!(configure(&mut view, &args).is_err());
}

#[test]
fn form_rendering_hides_invisible_fields() {
    let catalog: FormCatalog = serde_json::from_value(json!([{
        "formId": "pet",
        "title": "Pet Insurance",
        "fields": [{
            "id": "pet",
            "label": "Pet",
            "type": "group",
            "fields": [
                { "id": "species", "label": "Species", "type": "radio", "options": ["Dog", "Cat"], "required": true },
                {
                    "id": "breed",
                    "label": "Breed",
                    "type": "text",
                    "visibility": { "dependsOn": "species", "condition": "equals", "value": "Dog" }
                }
            ]
        }]
    }]))
    .expect("fixture should deserialize");

    let mut session = FormSession::new(Arc::new(catalog));
    session.select_schema("pet").unwrap();
    let rendered = render::form(&session);
    assert!(rendered.contains("## Pet"));
    assert!(rendered.contains("Species* [species] (radio): -"));
    assert!(rendered.contains("options: Dog | Cat"));
    assert!(!rendered.contains("Breed"));

    session.set_answer("species", "Dog").unwrap();
    assert!(render::form(&session).contains("Breed [breed] (text): -"));

    let report = session.validate().unwrap();
    assert_eq!(render::report(&report), "ready to submit\n");
}

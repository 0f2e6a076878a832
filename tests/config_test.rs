use std::fs;

use formplate::config::{get_document, parse_document};
use formplate::error::Error;
use formplate::schema::FieldType;
use tempfile::TempDir;

const JSON_DOCUMENT: &str = r#"{
    "formName": "Bug report",
    "schema": {
        "title": "bug",
        "display": "form",
        "type": "form",
        "components": [
            {"type": "textfield", "key": "SUMMARY", "label": "Summary"},
            {"type": "button", "key": "submit", "action": "submit"}
        ]
    },
    "template": "&lt;b&gt;{SUMMARY}&lt;/b&gt;",
    "templateTitle": "[Bug] {SUMMARY}",
    "enableTemplateTitle": true,
    "templateLink": "https://example.com/bugs",
    "enableTemplateLink": false,
    "formWidth": 640
}"#;

const YAML_DOCUMENT: &str = r#"
schema:
  title: survey
  components:
    - type: survey
      key: SAT
      questions:
        - label: Speed
          value: speed
template: "{SAT_speed1}"
templateTitle: "unused {SAT_speed1}"
"#;

#[test]
fn test_json_document() {
    let document = parse_document(JSON_DOCUMENT).unwrap();
    assert_eq!(document.name(), "Bug report");
    assert_eq!(document.schema.components.len(), 2);
    assert_eq!(document.title_template(), Some("[Bug] {SUMMARY}"));
    assert_eq!(document.link(), None);
    assert_eq!(document.form_width, Some(640));
    assert_eq!(
        document.raw_schema["components"][0]["key"],
        serde_json::json!("SUMMARY")
    );
}

#[test]
fn test_yaml_document_from_directory() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("form.yml"), YAML_DOCUMENT).unwrap();

    let document = get_document(temp_dir.path()).unwrap();
    assert_eq!(document.name(), "survey");
    assert_eq!(document.schema.components[0].field_type, FieldType::Survey);
    assert_eq!(document.template, "{SAT_speed1}");
    // Title stays off unless enabled
    assert_eq!(document.title_template(), None);
}

#[test]
fn test_json_preferred_over_yaml_in_directory() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("form.json"), JSON_DOCUMENT).unwrap();
    fs::write(temp_dir.path().join("form.yaml"), YAML_DOCUMENT).unwrap();

    let document = get_document(temp_dir.path()).unwrap();
    assert_eq!(document.name(), "Bug report");
}

#[test]
fn test_document_file_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("custom.json");
    fs::write(&path, JSON_DOCUMENT).unwrap();
    assert!(get_document(&path).is_ok());
}

#[test]
fn test_missing_document() {
    let temp_dir = TempDir::new().unwrap();
    match get_document(temp_dir.path()) {
        Err(Error::ConfigError(message)) => assert!(message.contains("form.json")),
        other => panic!("expected ConfigError, got {:?}", other.map(|d| d.form_name)),
    }
}

#[test]
fn test_document_without_schema() {
    assert!(matches!(
        parse_document(r#"{"template": "{A}"}"#),
        Err(Error::ConfigError(_))
    ));
    assert!(matches!(
        parse_document("- just\n- a list\n"),
        Err(Error::ConfigError(_))
    ));
}

use formplate::normalize::{normalize, NormalizedValue, SubmissionRecord};
use formplate::schema::FormSchema;
use serde_json::{json, Value};

fn schema(value: Value) -> FormSchema {
    serde_json::from_value(value).unwrap()
}

fn submission(value: Value) -> SubmissionRecord {
    match value {
        Value::Object(record) => record,
        _ => panic!("submission fixture must be an object"),
    }
}

#[test]
fn test_survey_answers_get_both_keys() {
    let schema = schema(json!({
        "components": [{"type": "survey", "key": "SAT"}]
    }));
    let record = normalize(
        &schema,
        &submission(json!({
            "SAT": {
                "How was the service today?": "good",
                "Skipped": "",
                "Would you return": "yes"
            }
        })),
    );

    assert_eq!(
        record.display("SAT_How was the service today?").as_deref(),
        Some("good")
    );
    assert_eq!(record.display("SAT_Howwastheser1").as_deref(), Some("good"));
    assert_eq!(record.display("SAT_Wouldyouretur3").as_deref(), Some("yes"));
    assert!(!record.contains_key("SAT_Skipped"));
    assert!(!record.contains_key("SAT_Skipped2"));
    assert_eq!(record.display("SAT").as_deref(), Some(""));
}

#[test]
fn test_single_select_takes_its_value() {
    let record = normalize(
        &FormSchema::default(),
        &submission(json!({"CITY": {"value": "paris", "label": "Paris"}})),
    );
    assert_eq!(record.get("CITY"), Some(&NormalizedValue::text("paris")));
    assert!(!record.contains_key("CITY_label"));
}

#[test]
fn test_checkbox_uses_configured_strings() {
    let schema = schema(json!({
        "components": [
            {"type": "enhancedCheckbox", "key": "AGREE", "positiveValue": "Yes", "negativeValue": "No"},
            {"type": "checkbox", "key": "PLAIN"}
        ]
    }));
    let record = normalize(&schema, &submission(json!({"AGREE": false, "PLAIN": true})));
    assert_eq!(record.display("AGREE").as_deref(), Some("No"));
    assert_eq!(record.display("PLAIN").as_deref(), Some("true"));
}

#[test]
fn test_text_case_rules() {
    let schema = schema(json!({
        "components": [
            {"type": "textfield", "key": "NAME", "case": "autogrammar"},
            {"type": "textfield", "key": "CODE", "case": "uppercase"}
        ]
    }));
    let record = normalize(&schema, &submission(json!({"NAME": "hELLO there", "CODE": "ab1"})));
    assert_eq!(record.display("NAME").as_deref(), Some("Hello there"));
    assert_eq!(record.display("CODE").as_deref(), Some("AB1"));
}

#[test]
fn test_multi_field_list_is_packaged() {
    let schema = schema(json!({
        "components": [{"type": "textfield", "key": "TAGS", "isMulti": true}]
    }));
    let record = normalize(&schema, &submission(json!({"TAGS": ["x", "", "y"]})));
    assert_eq!(
        record.get("TAGS"),
        Some(&NormalizedValue::Multi(vec!["x".to_string(), "y".to_string()]))
    );
    assert_eq!(record.display("TAGS").as_deref(), Some("x, y"));
}

#[test]
fn test_rows_are_kept_untouched() {
    let schema = schema(json!({
        "components": [{"type": "datagrid", "key": "ROWS", "components": [{"type": "textfield", "key": "N"}]}]
    }));
    let rows = json!([{"N": "hidden"}, {"N": "a"}]);
    let record = normalize(&schema, &submission(json!({"ROWS": rows.clone()})));
    assert_eq!(record.get("ROWS").map(NormalizedValue::to_json), Some(rows));
    assert_eq!(record.display("ROWS").as_deref(), Some(""));
}

#[test]
fn test_option_with_spaces_gets_sanitized_alias() {
    let record = normalize(
        &FormSchema::default(),
        &submission(json!({"OPTS": {"two words": true, "none": false}})),
    );
    assert_eq!(record.display("OPTS").as_deref(), Some("two words"));
    assert_eq!(record.display("OPTS_two words").as_deref(), Some("two words"));
    assert_eq!(record.display("OPTS_twowords").as_deref(), Some("two words"));
    assert_eq!(record.display("OPTS_none").as_deref(), Some(""));
}

#[test]
fn test_scalars_keep_their_json_text() {
    let record = normalize(
        &FormSchema::default(),
        &submission(json!({"N": 42, "F": 1.5, "B": false, "Z": null})),
    );
    assert_eq!(record.display("N").as_deref(), Some("42"));
    assert_eq!(record.display("F").as_deref(), Some("1.5"));
    assert_eq!(record.display("B").as_deref(), Some("false"));
    assert_eq!(record.display("Z").as_deref(), Some(""));
}

#[test_log::test]
fn test_derived_keys_win_over_submitted_keys() {
    let record = normalize(
        &FormSchema::default(),
        &submission(json!({"C_red": "typed", "C": {"red": true}})),
    );
    assert_eq!(record.display("C_red").as_deref(), Some("red"));

    let keys: Vec<&String> = record.iter().map(|(key, _)| key).collect();
    assert_eq!(keys, vec!["C_red", "C"]);
}

#[test]
fn test_derived_keys_follow_submitted_keys() {
    let record = normalize(
        &FormSchema::default(),
        &submission(json!({"A": {"x": true}, "B": "b"})),
    );
    let keys: Vec<&String> = record.iter().map(|(key, _)| key).collect();
    assert_eq!(keys, vec!["A", "B", "A_x"]);
}

#[test]
fn test_declared_survey_numbers_by_question_position() {
    let schema = schema(json!({
        "components": [{"type": "survey", "key": "SAT", "questions": [
            {"label": "Speed", "value": "speed"},
            {"label": "No value"},
            {"label": "Food", "value": "food"}
        ]}]
    }));
    let record = normalize(
        &schema,
        &submission(json!({"SAT": {"food": "bad", "speed": "good"}})),
    );
    assert_eq!(record.display("SAT_speed1").as_deref(), Some("good"));
    assert_eq!(record.display("SAT_food3").as_deref(), Some("bad"));
    assert!(!record.contains_key("SAT_food1"));

    // Answers to questions the schema does not list keep their answer position
    let record = normalize(&schema, &submission(json!({"SAT": {"speed": "ok", "extra": "x"}})));
    assert_eq!(record.display("SAT_extra2").as_deref(), Some("x"));
}

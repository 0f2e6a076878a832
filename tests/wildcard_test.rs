use formplate::schema::FormSchema;
use formplate::wildcard::{extract, extract_wildcards, Wildcard};
use serde_json::json;

fn builder_schema() -> FormSchema {
    serde_json::from_value(json!({
        "title": "Report",
        "display": "form",
        "type": "form",
        "components": [
            {"type": "columns", "key": "columns1", "columns": [
                {"components": [{"type": "textfield", "key": "NAME_1ABCD", "label": "Name"}]},
                {"components": [{"type": "day", "key": "DATE_2EFGH"}]}
            ]},
            {"type": "survey", "key": "SAT", "questions": [
                {"label": "Service", "value": "How was the service today?"},
                {"label": "Broken"},
                {"label": "Food", "value": "food"}
            ], "values": [{"label": "Good", "value": "good"}]},
            {"type": "selectboxes", "key": "COLORS", "values": [
                {"label": "Red", "value": "red"},
                {"label": "Empty", "value": ""},
                {"label": "Light blue", "value": "light blue"}
            ]},
            {"type": "table", "rows": [[{"components": [{"type": "email", "key": "MAIL"}]}]]},
            {"type": "textfield", "label": "No key"},
            {"type": "button", "key": "submit", "action": "submit"}
        ]
    }))
    .unwrap()
}

#[test_log::test]
fn test_extract_builder_schema() {
    let schema = builder_schema();
    assert_eq!(
        extract_wildcards(&schema.components),
        vec![
            "NAME_1ABCD",
            "DATE_2EFGH",
            "SAT_Howwastheser1",
            "SAT_food3",
            "COLORS_red",
            "COLORS_lightblue",
            "MAIL",
        ]
    );
}

#[test]
fn test_multi_field_keeps_flat_key() {
    let schema: FormSchema = serde_json::from_value(json!({
        "components": [{"type": "textfield", "key": "TAGS", "isMulti": true}]
    }))
    .unwrap();
    assert_eq!(
        extract(&schema.components),
        vec![Wildcard::Flat("TAGS".to_string())]
    );
}

#[test]
fn test_nested_repeating_groups() {
    let schema: FormSchema = serde_json::from_value(json!({
        "components": [
            {"type": "datagrid", "key": "OUTER", "components": [
                {"type": "textfield", "key": "A"},
                {"type": "editgrid", "key": "INNER", "components": [{"type": "textfield", "key": "B"}]}
            ]}
        ]
    }))
    .unwrap();
    assert_eq!(
        extract_wildcards(&schema.components),
        vec![
            "@START_OUTER@",
            "@END_OUTER@",
            "A",
            "@START_INNER@",
            "@END_INNER@",
            "B"
        ]
    );
}

#[test]
fn test_wildcard_keys() {
    let wildcards = extract(&builder_schema().components);
    assert!(wildcards.iter().all(|wildcard| !wildcard.is_dataset()));
    assert_eq!(wildcards[2].key(), "SAT_Howwastheser1");
}

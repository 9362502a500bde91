use chrono::{Local, NaiveDateTime, TimeZone, Utc};
use fncall::capabilities::{
    apply_parameters, current_datetime_at, generate_todo_list, get_current_datetime,
    CapabilityRegistry, ParamKind, ParameterSpec, DEFAULT_TODO_ITEMS,
};
use fncall::error::FncallError;
use fncall::models::FunctionCall;
use regex::Regex;
use serde_json::json;

fn call(name: &str, arguments: &str) -> FunctionCall {
    FunctionCall {
        name: name.to_string(),
        arguments: arguments.to_string(),
    }
}

#[test]
fn test_todo_list_items_are_numbered_in_order() {
    for count in [0u32, 1, 5, 17] {
        let list = generate_todo_list("gardening", count);
        assert_eq!(list.topic, "gardening");
        assert_eq!(list.items.len(), count as usize);
        for (index, item) in list.items.iter().enumerate() {
            assert_eq!(item, &format!("Task {} for gardening", index + 1));
        }
    }
}

#[test]
fn test_datetime_formats() {
    let now = get_current_datetime();
    assert!(Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap().is_match(&now.date));
    assert!(Regex::new(r"^\d{2}:\d{2}:\d{2}$").unwrap().is_match(&now.time));
}

#[test]
fn test_datetime_matches_system_clock() {
    let before = Local::now();
    let reported = get_current_datetime();
    let after = Local::now();

    let parsed = NaiveDateTime::parse_from_str(
        &format!("{} {}", reported.date, reported.time),
        "%Y-%m-%d %H:%M:%S",
    )
    .unwrap();
    let parsed = Local.from_local_datetime(&parsed).earliest().unwrap();

    // Formatting drops sub-second precision.
    assert!(parsed >= before - chrono::Duration::seconds(1));
    assert!(parsed <= after);
}

#[test]
fn test_datetime_at_fixed_instant() {
    let instant = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 3).unwrap();
    let formatted = current_datetime_at(&instant);
    assert_eq!(formatted.date, "2024-03-09");
    assert_eq!(formatted.time, "07:05:03");
}

#[test]
fn test_registry_order_and_schema() {
    let registry = CapabilityRegistry::builtin();
    assert_eq!(
        registry.names(),
        vec!["get_current_datetime", "generate_todo_list"]
    );

    let specs = registry.to_function_specs();
    assert_eq!(
        specs[0].parameters,
        json!({ "type": "object", "properties": {} })
    );
    assert_eq!(specs[1].parameters["required"], json!(["topic"]));
    assert_eq!(
        specs[1].parameters["properties"]["num_items"]["default"],
        json!(5)
    );
    assert_eq!(
        specs[1].parameters["properties"]["num_items"]["type"],
        json!("integer")
    );
}

#[test]
fn test_dispatch_todo_list_uses_default_count() {
    let registry = CapabilityRegistry::builtin();
    let result = registry
        .dispatch(&call("generate_todo_list", r#"{"topic": "cooking"}"#))
        .unwrap();

    assert_eq!(result["topic"], json!("cooking"));
    let items = result["items"].as_array().unwrap();
    assert_eq!(items.len(), DEFAULT_TODO_ITEMS as usize);
    assert_eq!(items[4], json!("Task 5 for cooking"));
}

#[test]
fn test_dispatch_todo_list_coerces_numeric_strings_and_floats() {
    let registry = CapabilityRegistry::builtin();

    let from_string = registry
        .dispatch(&call(
            "generate_todo_list",
            r#"{"topic": "travel", "num_items": "3"}"#,
        ))
        .unwrap();
    assert_eq!(from_string["items"].as_array().unwrap().len(), 3);

    let from_float = registry
        .dispatch(&call(
            "generate_todo_list",
            r#"{"topic": "travel", "num_items": 2.0}"#,
        ))
        .unwrap();
    assert_eq!(from_float["items"].as_array().unwrap().len(), 2);
}

#[test]
fn test_dispatch_todo_list_zero_items() {
    let registry = CapabilityRegistry::builtin();
    let result = registry
        .dispatch(&call(
            "generate_todo_list",
            r#"{"topic": "nothing", "num_items": 0}"#,
        ))
        .unwrap();
    assert_eq!(result["items"], json!([]));
}

#[test]
fn test_dispatch_rejects_bad_counts() {
    let registry = CapabilityRegistry::builtin();

    for bad in [r#"-1"#, r#"2.5"#, r#""many""#, r#"101"#] {
        let arguments = format!(r#"{{"topic": "x", "num_items": {}}}"#, bad);
        let result = registry.dispatch(&call("generate_todo_list", &arguments));
        assert!(
            matches!(result, Err(FncallError::InvalidArguments { .. })),
            "num_items {} should be rejected",
            bad
        );
    }
}

#[test]
fn test_dispatch_missing_topic() {
    let registry = CapabilityRegistry::builtin();
    let result = registry.dispatch(&call("generate_todo_list", r#"{"num_items": 2}"#));

    match result {
        Err(FncallError::InvalidArguments {
            capability,
            message,
        }) => {
            assert_eq!(capability, "generate_todo_list");
            assert!(message.contains("topic"));
        }
        other => panic!("expected InvalidArguments, got {:?}", other),
    }
}

#[test]
fn test_dispatch_blank_topic() {
    let registry = CapabilityRegistry::builtin();
    let result = registry.dispatch(&call("generate_todo_list", r#"{"topic": "   "}"#));
    assert!(matches!(result, Err(FncallError::InvalidArguments { .. })));
}

#[test]
fn test_dispatch_datetime_accepts_empty_arguments() {
    let registry = CapabilityRegistry::builtin();
    let result = registry.dispatch(&call("get_current_datetime", "")).unwrap();
    assert!(result.contains_key("date"));
    assert!(result.contains_key("time"));
    assert_eq!(result.len(), 2);
}

#[test]
fn test_dispatch_unknown_capability() {
    let registry = CapabilityRegistry::builtin();
    let result = registry.dispatch(&call("send_email", r#"{"to": "a@b.c"}"#));
    assert!(matches!(result, Err(FncallError::UnknownCapability(name)) if name == "send_email"));
}

#[test]
fn test_dispatch_arguments_not_json() {
    let registry = CapabilityRegistry::builtin();
    let result = registry.dispatch(&call("generate_todo_list", "{topic: cooking"));
    assert!(matches!(result, Err(FncallError::MalformedResponse(_))));
}

#[test]
fn test_dispatch_arguments_not_an_object() {
    let registry = CapabilityRegistry::builtin();
    let result = registry.dispatch(&call("generate_todo_list", r#"["cooking"]"#));
    assert!(matches!(result, Err(FncallError::InvalidArguments { .. })));
}

#[test]
fn test_prepare_arguments_drops_undeclared_fields() {
    let registry = CapabilityRegistry::builtin();
    let prepared = registry
        .prepare_arguments(
            "generate_todo_list",
            &json!({ "topic": "art", "priority": "high" }),
        )
        .unwrap();
    assert_eq!(prepared, json!({ "topic": "art", "num_items": 5 }));
}

#[test]
fn test_number_and_boolean_parameters_are_coerced() {
    let params = vec![
        ParameterSpec::required("ratio", ParamKind::Number, "A ratio"),
        ParameterSpec::optional("strict", ParamKind::Boolean, "Strict mode", json!(false)),
        ParameterSpec::optional("label", ParamKind::String, "A label", json!("none")),
    ];

    let prepared = apply_parameters(
        "tune",
        &params,
        &json!({ "ratio": " 0.25 ", "strict": "TRUE", "label": "x" }),
    )
    .unwrap();
    assert_eq!(prepared, json!({ "ratio": 0.25, "strict": true, "label": "x" }));

    let defaults = apply_parameters("tune", &params, &json!({ "ratio": 2 })).unwrap();
    assert_eq!(defaults, json!({ "ratio": 2, "strict": false, "label": "none" }));
}

#[test]
fn test_uncoercible_values_pass_through_unchanged() {
    let params = vec![
        ParameterSpec::required("ratio", ParamKind::Number, "A ratio"),
        ParameterSpec::required("strict", ParamKind::Boolean, "Strict mode"),
    ];

    let prepared = apply_parameters(
        "tune",
        &params,
        &json!({ "ratio": "a lot", "strict": "maybe" }),
    )
    .unwrap();
    assert_eq!(prepared, json!({ "ratio": "a lot", "strict": "maybe" }));
}

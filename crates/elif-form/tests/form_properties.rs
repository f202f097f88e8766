//! Behavioural properties of form runs

use elif_form::{
    field, form, FieldPipeline, Filter, FormConfig, FormRequest, OperationStep, Rule, StepOutcome,
};
use serde_json::{json, Value};

async fn run(fields: Vec<FieldPipeline>, body: Value) -> elif_form::FormResult {
    let mut request = FormRequest::new().with_body(body);
    form(fields)
        .with_config(FormConfig::default())
        .run(&mut request, None)
        .await
        .expect("form run");
    request.take_form().expect("form result")
}

fn tag(label: &'static str) -> OperationStep {
    OperationStep::sync(move |value, _| {
        StepOutcome::Replace(json!(format!("{}{}", value.as_str().unwrap_or_default(), label)))
    })
}

#[tokio::test]
async fn fields_without_steps_copy_their_value() {
    let input = json!({
        "name": "dan",
        "age": 42,
        "flags": { "admin": false }
    });

    let result = run(vec![field("name"), field("age"), field("flags.admin")], input).await;

    assert_eq!(result.data(), &json!({ "name": "dan", "age": 42, "flags": { "admin": false } }));
    assert!(result.is_valid());
}

#[tokio::test]
async fn steps_apply_in_registration_order() {
    let forward = run(
        vec![field("x").add(tag("1")).add(tag("2")).add(tag("3"))],
        json!({ "x": "" }),
    )
    .await;
    assert_eq!(forward.get("x"), json!("123"));

    let reversed = run(
        vec![field("x").add(tag("3")).add(tag("2")).add(tag("1"))],
        json!({ "x": "" }),
    )
    .await;
    assert_eq!(reversed.get("x"), json!("321"));
}

#[tokio::test]
async fn array_mode_round_trips_and_fans_out() {
    let result = run(
        vec![field("list").to_array(), field("single").to_array()],
        json!({ "list": ["a", "b", "c"], "single": "x" }),
    )
    .await;

    assert_eq!(result.get("list"), json!(["a", "b", "c"]));
    assert_eq!(result.get("single"), json!(["x"]));
}

#[tokio::test]
async fn empty_array_mode_default() {
    let result = run(
        vec![
            field("defaulted").to_array().filter(Filter::Default(json!("none"))),
            field("missing").to_array(),
            field("empty").to_array(),
        ],
        json!({ "empty": [] }),
    )
    .await;

    assert_eq!(result.get("defaulted"), json!(["none"]));
    assert_eq!(result.data()["missing"], json!([]));
    assert_eq!(result.data()["empty"], json!([]));
}

#[tokio::test]
async fn optional_fields_without_value_suppress_errors() {
    let result = run(
        vec![
            field("email").is_email().is_not_empty().check(Rule::MinLength(3)),
            field("website").is_url(),
        ],
        json!({ "email": "" }),
    )
    .await;

    assert!(result.is_valid());
    assert!(result.errors().is_empty());
}

#[tokio::test]
async fn required_fields_report_exactly_the_required_error() {
    let result = run(
        vec![field("email").is_required().is_email().check(Rule::MinLength(3))],
        json!({}),
    )
    .await;

    assert_eq!(result.errors(), ["email is required"]);
}

#[tokio::test]
async fn required_fields_keep_later_step_errors() {
    let result = run(
        vec![field("nick").is_required().is_not_empty()],
        json!({ "nick": "" }),
    )
    .await;

    assert_eq!(
        result.errors(),
        ["nick is required", "nick has no value or is only whitespace"]
    );
}

#[tokio::test]
async fn is_valid_matches_error_count() {
    let empty = run(Vec::new(), json!({ "anything": 1 })).await;
    assert!(empty.is_valid());
    assert!(empty.errors().is_empty());

    let failing = run(vec![field("n").is_int()], json!({ "n": "x" })).await;
    assert_eq!(failing.is_valid(), failing.errors().is_empty());
    assert!(!failing.is_valid());
}

#[tokio::test]
async fn dot_and_bracket_paths_address_the_same_slot() {
    let input = json!({ "a": { "b": { "c": "  deep " } } });

    let dotted = run(vec![field("a.b.c").trim()], input.clone()).await;
    let bracketed = run(vec![field("a[b][c]").trim()], input).await;

    assert_eq!(dotted.data(), bracketed.data());
    assert_eq!(dotted.data(), &json!({ "a": { "b": { "c": "deep" } } }));
}

#[tokio::test]
async fn per_field_errors_are_grouped() {
    let result = run(
        vec![
            field("a").is_int().check(Rule::MinLength(5)),
            field("b").is_email(),
            field("c").trim(),
        ],
        json!({ "a": "x", "b": "y", "c": "z" }),
    )
    .await;

    assert_eq!(
        result.errors(),
        ["a is not an integer", "a is too short", "b is not an email address"]
    );
    assert_eq!(result.field_errors("a").len(), 2);
    assert_eq!(result.get_errors().len(), 2);
    assert!(result.field_errors("c").is_empty());
}

#[tokio::test]
async fn serialized_result_contains_only_output() {
    let result = run(vec![field("name").is_email()], json!({ "name": "dan" })).await;

    assert!(!result.is_valid());
    assert_eq!(serde_json::to_value(&result).unwrap(), json!({ "name": "dan" }));
}

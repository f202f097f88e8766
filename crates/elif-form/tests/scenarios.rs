//! End-to-end request scenarios

use elif_form::{
    field, field_with_label, form, AsyncFieldRule, FormConfig, FormError, FormRequest, FormResponse,
    MiddlewarePipeline, Rule, StepContext, StepError,
};
use serde_json::{json, Value};
use std::time::Duration;

#[tokio::test]
async fn trims_then_matches_username() {
    let signup = form(vec![field("username").trim().is("^[a-z]+$", "").unwrap()])
        .with_config(FormConfig::default());
    let mut request = FormRequest::new().with_body(json!({ "username": "  dan " }));

    signup.run(&mut request, None).await.unwrap();

    let result = request.form().unwrap();
    assert_eq!(result.get("username"), json!("dan"));
    assert!(result.is_valid());
}

#[tokio::test]
async fn rejects_invalid_email() {
    let contact = form(vec![field("field").is_email()]).with_config(FormConfig::default());
    let mut request = FormRequest::new().with_body(json!({ "field": "fail" }));

    contact.run(&mut request, None).await.unwrap();

    let result = request.form().unwrap();
    assert_eq!(result.errors(), ["field is not an email address"]);
    assert!(!result.is_valid());
}

#[tokio::test]
async fn flags_one_element_of_an_array() {
    let numbers = form(vec![field("field").array_mode().is_int()]).with_config(FormConfig::default());
    let mut request = FormRequest::new().with_body(json!({ "field": [1, 2, "f"] }));

    numbers.run(&mut request, None).await.unwrap();

    let result = request.form().unwrap();
    assert_eq!(result.errors(), ["field is not an integer"]);
    assert_eq!(result.get("field"), json!([1, 2, "f"]));
}

#[tokio::test]
async fn async_rejection_is_reported() {
    let checks = form(vec![
        field("field1").custom_async(|_, _| async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            Err(StepError::new("Invalid %s"))
        }),
        field("field2").trim(),
    ])
    .with_config(FormConfig::default());
    let mut request = FormRequest::new().with_body(json!({ "field1": "a", "field2": " b " }));

    checks.run(&mut request, None).await.unwrap();

    let result = request.form().unwrap();
    assert!(!result.is_valid());
    assert_eq!(result.errors(), ["Invalid field1"]);
    assert_eq!(result.get("field2"), json!("b"));
}

#[tokio::test]
async fn merges_sources_in_configured_order() {
    let lookup = form(vec![field("id"), field("page"), field("token")]).with_config(
        FormConfig::default().with_sources(["body", "query", "params", "cookies"]),
    );
    let mut request = FormRequest::new()
        .with_body(json!({ "id": "from-body", "page": "1" }))
        .with_query(json!({ "page": "2" }))
        .with_params(json!({ "id": "from-params" }))
        .with_source("cookies", json!({ "token": "abc" }));

    lookup.run(&mut request, None).await.unwrap();

    assert_eq!(
        request.form().unwrap().data(),
        &json!({ "id": "from-params", "page": "2", "token": "abc" })
    );
}

#[tokio::test]
async fn confirms_password_against_another_field() {
    let password = form(vec![
        field("password").is_required(),
        field_with_label("confirm", "Password confirmation")
            .check_with(Rule::Equals(json!("field::password")), "%s must match"),
    ])
    .with_config(FormConfig::default());

    let mut request = FormRequest::new().with_body(json!({ "password": "s3cret", "confirm": "other" }));
    password.run(&mut request, None).await.unwrap();
    assert_eq!(request.form().unwrap().errors(), ["Password confirmation must match"]);

    let mut request = FormRequest::new().with_body(json!({ "password": "s3cret", "confirm": "s3cret" }));
    password.run(&mut request, None).await.unwrap();
    assert!(request.form().unwrap().is_valid());
}

#[tokio::test]
async fn sanitizes_a_profile() {
    let profile = form(vec![
        field("name").trim().to_upper(),
        field("age").to_int().check(Rule::Int { min: Some(0), max: Some(150) }),
        field("bio").to_escape().to_truncate(14),
        field("newsletter").to_boolean(),
        field("country").to_default(json!("NO")),
        field("range").check(Rule::DateRange),
    ])
    .with_config(FormConfig::default());

    let mut request = FormRequest::new().with_body(json!({
        "name": " ada ",
        "age": "36 years",
        "bio": "<b>hello</b> world",
        "newsletter": "yes",
        "range": "2024-01-01 to 2024-01-31"
    }));

    profile.run(&mut request, None).await.unwrap();

    let result = request.form().unwrap();
    assert!(result.is_valid());
    assert_eq!(
        result.data(),
        &json!({
            "name": "ADA",
            "age": 36,
            "bio": "&lt;b&gt;he...",
            "newsletter": true,
            "country": "NO",
            "range": { "min": "2024-01-01 00:00:00", "max": "2024-01-31 23:59:59" }
        })
    );
}

struct UniqueUsername {
    taken: Vec<&'static str>,
}

#[async_trait::async_trait]
impl AsyncFieldRule for UniqueUsername {
    async fn check(&self, value: &Value, _context: &StepContext) -> Result<Option<Value>, StepError> {
        tokio::task::yield_now().await;
        match value.as_str() {
            Some(name) if self.taken.contains(&name) => Err(StepError::new("%s is already taken")),
            _ => Ok(None),
        }
    }

    fn rule_name(&self) -> &'static str {
        "unique_username"
    }
}

#[tokio::test]
async fn async_rule_runs_inside_middleware() {
    let pipeline = MiddlewarePipeline::new().add(
        form(vec![field("username")
            .trim()
            .rule(UniqueUsername { taken: vec!["admin"] })])
        .with_config(FormConfig::default()),
    );

    let (request, response) = pipeline
        .execute(
            FormRequest::new().with_body(json!({ "username": " admin " })),
            FormResponse::new(),
            |request, response| async move { Ok((request, response)) },
        )
        .await
        .unwrap();

    assert_eq!(request.form().unwrap().errors(), ["username is already taken"]);
    assert_eq!(response.error("username"), Some("username is already taken"));
}

#[test]
fn malformed_patterns_fail_while_building() {
    let error = field("code").is("[a-z", "").unwrap_err();
    assert!(matches!(error, FormError::InvalidPattern { ref field, .. } if field == "code"));
    assert!(!error.is_runner_fault());
}

//! The form runner
//!
//! A [`Form`] owns a list of field pipelines. Each run merges the configured
//! request sources, polls every pipeline concurrently on the current task and
//! folds their errors, in registration order, into a [`FormReport`].

use crate::config::{current_config, FormConfig};
use crate::error::{FormError, FormOutcome};
use crate::field::FieldPipeline;
use crate::request::{FormReport, FormRequest, FormResponse, FormResult};
use crate::step::{panic_message, StepContext};
use futures::future::join_all;
use futures::FutureExt;
use serde_json::{Map, Value};
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex};
use tracing::{debug, trace, warn};

/// Build a form from its field pipelines
pub fn form<I>(fields: I) -> Form
where
    I: IntoIterator<Item = FieldPipeline>,
{
    Form::new(fields)
}

/// A reusable, cheaply clonable form handler
#[derive(Debug, Clone)]
pub struct Form {
    fields: Arc<Vec<FieldPipeline>>,
    config: Option<FormConfig>,
}

impl Form {
    pub fn new<I>(fields: I) -> Self
    where
        I: IntoIterator<Item = FieldPipeline>,
    {
        Self {
            fields: Arc::new(fields.into_iter().collect()),
            config: None,
        }
    }

    /// Pin a configuration instead of reading the process-wide default
    pub fn with_config(mut self, config: FormConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn fields(&self) -> &[FieldPipeline] {
        &self.fields
    }

    pub fn config(&self) -> Option<&FormConfig> {
        self.config.as_ref()
    }

    /// Process `request`, attaching a [`FormResult`] to it.
    ///
    /// When a response is given and the run succeeds, its `locals.errors` map
    /// is created if missing and receives the latest error per field. An `Err`
    /// means a pipeline failed to execute; in that case nothing is attached.
    pub async fn run(
        &self,
        request: &mut FormRequest,
        response: Option<&mut FormResponse>,
    ) -> FormOutcome<()> {
        let config = match &self.config {
            Some(config) => config.clone(),
            None => current_config(),
        };

        let source = request.merge_sources(&config.sources);
        let locals = match response.as_deref() {
            Some(response) => response.locals.clone(),
            None => Value::Object(Map::new()),
        };

        let context = StepContext::new(source, locals);
        let output = Mutex::new(Value::Object(Map::new()));

        debug!(
            "Running form with {} fields over sources {:?}",
            self.fields.len(),
            config.sources
        );

        let results = join_all(
            self.fields
                .iter()
                .map(|field| AssertUnwindSafe(field.run(&context, &output, &config)).catch_unwind()),
        )
        .await;

        let mut report = FormReport::new();
        let mut recorded = Vec::new();
        let mut fault = None;

        for (field, result) in self.fields.iter().zip(results) {
            match result {
                Ok(Ok(errors)) => {
                    if !errors.is_empty() {
                        trace!("Field '{}' recorded {} error(s)", field.path(), errors.len());
                    }
                    recorded.extend(errors.iter().map(|error| (field.path(), error.clone())));
                    report.record(field.path(), errors);
                }
                Ok(Err(error)) => {
                    fault.get_or_insert(error);
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref())
                        .unwrap_or_else(|| "unknown panic".to_string());
                    fault.get_or_insert(FormError::runner(format!(
                        "field '{}' panicked: {}",
                        field.path(),
                        message
                    )));
                }
            }
        }

        if let Some(error) = fault {
            warn!("Form run aborted: {}", error);
            return Err(error);
        }

        let data = output.into_inner().map_err(|_| FormError::OutputPoisoned)?;

        if let Some(response) = response {
            response.ensure_errors();
            for (path, error) in &recorded {
                response.record_error(path, error);
            }
        }

        debug!(
            "Form run finished: valid={}, errors={}",
            report.is_valid(),
            report.errors.len()
        );

        request.attach_form(FormResult::new(data, report));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StepError;
    use crate::field::field;
    use crate::rules::Rule;
    use serde_json::json;
    use tracing_test::traced_test;

    fn pinned() -> FormConfig {
        FormConfig::default()
    }

    #[tokio::test]
    async fn test_run_attaches_result() {
        let signup = form(vec![
            field("username").trim().is_required(),
            field("email").trim().is_email(),
        ])
        .with_config(pinned());

        let mut request = FormRequest::new().with_body(json!({
            "username": "  dan ",
            "email": "not-an-email",
            "ignored": true
        }));

        signup.run(&mut request, None).await.unwrap();

        let result = request.form().unwrap();
        assert_eq!(result.data(), &json!({ "username": "dan", "email": "not-an-email" }));
        assert!(!result.is_valid());
        assert_eq!(result.errors(), ["email is not an email address"]);
        assert_eq!(result.field_errors("email").len(), 1);
        assert!(result.field_errors("username").is_empty());
    }

    #[tokio::test]
    async fn test_zero_fields_is_valid() {
        let empty = form(Vec::new()).with_config(pinned());
        let mut request = FormRequest::new().with_body(json!({ "a": 1 }));

        empty.run(&mut request, None).await.unwrap();

        let result = request.form().unwrap();
        assert!(result.is_valid());
        assert_eq!(result.data(), &json!({}));
    }

    #[tokio::test]
    async fn test_errors_follow_registration_order() {
        let slow_first = form(vec![
            field("a").custom_async(|_, _| async {
                tokio::task::yield_now().await;
                Err(StepError::new("%s slow"))
            }),
            field("b").check_with(Rule::Required(None), "%s fast"),
        ])
        .with_config(pinned());

        let mut request = FormRequest::new();
        slow_first.run(&mut request, None).await.unwrap();

        assert_eq!(request.form().unwrap().errors(), ["a slow", "b fast"]);
    }

    #[tokio::test]
    async fn test_response_locals_errors() {
        let checks = form(vec![field("age").check_with(Rule::Int { min: None, max: None }, "first")
            .check_with(Rule::Int { min: Some(100), max: None }, "second")])
        .with_config(pinned());

        let mut request = FormRequest::new().with_body(json!({ "age": "x" }));
        let mut response = FormResponse::new().with_locals(json!({ "errors": { "other": "kept" } }));

        checks.run(&mut request, Some(&mut response)).await.unwrap();

        assert_eq!(response.error("age"), Some("second"));
        assert_eq!(response.error("other"), Some("kept"));
    }

    async fn lost_connection(_: Value, _: StepContext) -> Result<Option<Value>, StepError> {
        panic!("lost connection")
    }

    #[tokio::test]
    async fn test_panicking_async_step_is_a_runner_fault() {
        let broken = form(vec![
            field("ok").trim(),
            field("boom").custom_async(lost_connection),
        ])
        .with_config(pinned());

        let mut request = FormRequest::new();
        let mut response = FormResponse::new().with_locals(json!({ "user": "dan" }));
        let error = broken.run(&mut request, Some(&mut response)).await.unwrap_err();

        assert!(error.is_runner_fault());
        assert_eq!(
            error,
            FormError::runner("field 'boom' panicked: lost connection")
        );
        assert!(request.form().is_none());
        assert_eq!(response.locals(), &json!({ "user": "dan" }));
    }

    #[tokio::test]
    async fn test_sources_follow_pinned_config() {
        let query_only = form(vec![field("page")])
            .with_config(FormConfig::default().with_sources(["query"]));

        let mut request = FormRequest::new()
            .with_body(json!({ "page": "body" }))
            .with_query(json!({ "page": "2" }));

        query_only.run(&mut request, None).await.unwrap();
        assert_eq!(request.form().unwrap().get("page"), json!("2"));
    }

    #[tokio::test]
    async fn test_steps_see_context() {
        let taken = form(vec![field("username").custom_async(|value, context| async move {
            let reserved = context.locals().get("reserved").cloned().unwrap_or(Value::Null);
            if value == reserved {
                Err(StepError::new("%s is reserved"))
            } else {
                Ok(None)
            }
        })])
        .with_config(pinned());

        let mut request = FormRequest::new().with_body(json!({ "username": "root" }));
        let mut response = FormResponse::new().with_locals(json!({ "reserved": "root" }));

        taken.run(&mut request, Some(&mut response)).await.unwrap();
        assert_eq!(request.form().unwrap().errors(), ["username is reserved"]);
    }

    #[traced_test]
    #[tokio::test]
    async fn test_run_is_logged() {
        let checks = form(vec![field("email").is_email()]).with_config(pinned());
        let mut request = FormRequest::new().with_body(json!({ "email": "nope" }));

        checks.run(&mut request, None).await.unwrap();

        assert!(logs_contain("Running form with 1 fields"));
        assert!(logs_contain("Field 'email' recorded 1 error(s)"));
        assert!(logs_contain("Form run finished: valid=false, errors=1"));
    }
}

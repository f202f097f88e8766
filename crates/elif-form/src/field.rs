//! Field pipelines
//!
//! A [`FieldPipeline`] holds the ordered steps for one input field. Steps run
//! sequentially and unconditionally: a failing validator records its message
//! and the next step still sees the current value.

use crate::config::FormConfig;
use crate::error::{FormError, FormOutcome, StepError};
use crate::filters::Filter;
use crate::path::{get_prop, set_prop};
use crate::rules::{compile_pattern, Rule};
use crate::step::{invoke_sync, AsyncFieldRule, OperationStep, StepContext, StepOutcome};
use crate::value::{coerce, has_value};
use elif_form_primitives as primitives;
use regex::Regex;
use serde_json::Value;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tracing::trace;

/// Start a pipeline for `path`, labelled with the path itself
pub fn field<P: Into<String>>(path: P) -> FieldPipeline {
    FieldPipeline::new(path)
}

/// Start a pipeline for `path` with a human readable label for messages
pub fn field_with_label<P: Into<String>, L: Into<String>>(path: P, label: L) -> FieldPipeline {
    FieldPipeline::with_label(path, label)
}

/// Alias of [`field`] for pipelines that only sanitize
pub fn filter<P: Into<String>>(path: P) -> FieldPipeline {
    FieldPipeline::new(path)
}

/// Alias of [`field`] for pipelines that only validate
pub fn validate<P: Into<String>>(path: P) -> FieldPipeline {
    FieldPipeline::new(path)
}

/// Ordered filters and validators for one field
#[derive(Debug)]
pub struct FieldPipeline {
    path: String,
    label: String,
    steps: Vec<OperationStep>,
    array_mode: bool,
    required: bool,
    auto_trimmed: AtomicBool,
}

impl FieldPipeline {
    pub fn new<P: Into<String>>(path: P) -> Self {
        let path = path.into();
        Self {
            label: path.clone(),
            path,
            steps: Vec::new(),
            array_mode: false,
            required: false,
            auto_trimmed: AtomicBool::new(false),
        }
    }

    pub fn with_label<P: Into<String>, L: Into<String>>(path: P, label: L) -> Self {
        let mut pipeline = Self::new(path);
        let label = label.into();
        if !label.is_empty() {
            pipeline.label = label;
        }
        pipeline
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn steps(&self) -> &[OperationStep] {
        &self.steps
    }

    pub fn is_array_mode(&self) -> bool {
        self.array_mode
    }

    /// Whether errors are recorded even when the field has no value
    pub fn requires_value(&self) -> bool {
        self.required
    }

    /// Append a step
    pub fn add<S: Into<OperationStep>>(mut self, step: S) -> Self {
        self.steps.push(step.into());
        self
    }

    /// Treat the field as a list: scalars are wrapped, every element runs
    /// through the steps
    pub fn to_array(mut self) -> Self {
        self.array_mode = true;
        self
    }

    pub fn array_mode(self) -> Self {
        self.to_array()
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn filter(self, filter: Filter) -> Self {
        self.add(filter.into_step())
    }

    pub fn check(self, rule: Rule) -> Self {
        self.push_rule(rule, None)
    }

    /// Add a rule with a custom message; `%s` is replaced by the label
    pub fn check_with<M: Into<String>>(self, rule: Rule, message: M) -> Self {
        self.push_rule(rule, Some(message.into()))
    }

    fn push_rule(mut self, rule: Rule, message: Option<String>) -> Self {
        if rule.marks_required() {
            self.required = true;
        }
        self.add(rule.into_step(message))
    }

    pub fn trim(self) -> Self {
        self.filter(Filter::Trim(None))
    }

    pub fn to_upper(self) -> Self {
        self.filter(Filter::Upper)
    }

    pub fn to_lower(self) -> Self {
        self.filter(Filter::Lower)
    }

    pub fn to_int(self) -> Self {
        self.filter(Filter::Int { radix: 10 })
    }

    pub fn to_float(self) -> Self {
        self.filter(Filter::Float)
    }

    pub fn to_boolean(self) -> Self {
        self.filter(Filter::Boolean { strict: false })
    }

    pub fn to_default(self, value: Value) -> Self {
        self.filter(Filter::Default(value))
    }

    pub fn to_truncate(self, length: usize) -> Self {
        self.filter(Filter::Truncate(length))
    }

    pub fn to_escape(self) -> Self {
        self.filter(Filter::Escape)
    }

    pub fn is_email(self) -> Self {
        self.check(Rule::Email)
    }

    pub fn is_url(self) -> Self {
        self.check(Rule::Url)
    }

    pub fn is_ip(self) -> Self {
        self.check(Rule::Ip(None))
    }

    pub fn is_int(self) -> Self {
        self.check(Rule::Int { min: None, max: None })
    }

    pub fn is_float(self) -> Self {
        self.check(Rule::Float { min: None, max: None })
    }

    pub fn is_numeric(self) -> Self {
        self.check(Rule::Numeric)
    }

    pub fn is_alpha(self) -> Self {
        self.check(Rule::Alpha)
    }

    pub fn is_alphanumeric(self) -> Self {
        self.check(Rule::Alphanumeric)
    }

    pub fn is_required(self) -> Self {
        self.check(Rule::Required(None))
    }

    pub fn is_min_length(self, min: usize) -> Self {
        self.check(Rule::MinLength(min))
    }

    pub fn is_max_length(self, max: usize) -> Self {
        self.check(Rule::MaxLength(max))
    }

    pub fn is_length(self, min: usize, max: Option<usize>) -> Self {
        self.check(Rule::Length { min, max })
    }

    pub fn is_in<I, S>(self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.check(Rule::In(options.into_iter().map(Into::into).collect()))
    }

    pub fn is_equals(self, expected: Value) -> Self {
        self.check(Rule::Equals(expected))
    }

    pub fn is_not_empty(self) -> Self {
        self.check(Rule::NotEmpty)
    }

    /// Require the value to match `pattern`, compiled with JavaScript-style
    /// `flags`. Fails here, not at run time, when the pattern is malformed.
    pub fn is(self, pattern: &str, flags: &str) -> FormOutcome<Self> {
        let regex = compile_pattern(pattern, flags)
            .map_err(|message| FormError::invalid_pattern(self.path.clone(), message))?;
        Ok(self.check(Rule::Is(regex)))
    }

    /// Reject values matching `pattern`
    pub fn is_not(self, pattern: &str, flags: &str) -> FormOutcome<Self> {
        let regex = compile_pattern(pattern, flags)
            .map_err(|message| FormError::invalid_pattern(self.path.clone(), message))?;
        Ok(self.check(Rule::IsNot(regex)))
    }

    pub fn matches(self, regex: Regex) -> Self {
        self.check(Rule::Matches(regex))
    }

    /// Add a synchronous user step, see [`OperationStep::custom`]
    pub fn custom<F>(self, step: F) -> Self
    where
        F: Fn(&Value, &StepContext) -> Result<Option<Value>, StepError> + Send + Sync + 'static,
    {
        self.add(OperationStep::custom(step, None))
    }

    /// Like [`custom`](Self::custom), failing with `message` instead of the
    /// step's own error text
    pub fn custom_with<F, M>(self, step: F, message: M) -> Self
    where
        F: Fn(&Value, &StepContext) -> Result<Option<Value>, StepError> + Send + Sync + 'static,
        M: Into<String>,
    {
        self.add(OperationStep::custom(step, Some(message.into())))
    }

    /// Add an asynchronous user step, see [`OperationStep::custom_async`]
    pub fn custom_async<F, Fut>(self, step: F) -> Self
    where
        F: Fn(Value, StepContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<Value>, StepError>> + Send + 'static,
    {
        self.add(OperationStep::custom_async(step, None))
    }

    pub fn custom_async_with<F, Fut, M>(self, step: F, message: M) -> Self
    where
        F: Fn(Value, StepContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<Value>, StepError>> + Send + 'static,
        M: Into<String>,
    {
        self.add(OperationStep::custom_async(step, Some(message.into())))
    }

    pub fn rule<R: AsyncFieldRule + 'static>(self, rule: R) -> Self {
        self.add(OperationStep::from_rule(rule))
    }

    /// Run the pipeline against the shared output object and return the
    /// error messages it recorded, already labelled.
    ///
    /// The output lock is only held while reading the starting value and
    /// while writing the result, never across a step.
    pub async fn run(
        &self,
        context: &StepContext,
        output: &Mutex<Value>,
        config: &FormConfig,
    ) -> FormOutcome<Vec<String>> {
        let value = {
            let guard = output.lock().map_err(|_| FormError::OutputPoisoned)?;
            let current = get_prop(&self.path, &guard);
            if has_value(&current) {
                current
            } else {
                get_prop(&self.path, context.source())
            }
        };

        if config.auto_trim && value.is_string() && !self.auto_trimmed.swap(true, Ordering::SeqCst) {
            trace!("Auto-trim enabled for field '{}'", self.path);
        }
        let trim = self.auto_trimmed.load(Ordering::SeqCst);

        let field_has_value = has_value(&value);
        let mut errors = Vec::new();

        let result = if self.array_mode {
            let items = match value {
                missing if !has_value(&missing) => Vec::new(),
                Value::Array(items) => items,
                other => vec![other],
            };

            if items.is_empty() {
                match self
                    .run_stack(Value::Null, context, trim, field_has_value, &mut errors)
                    .await
                {
                    Value::Null => Value::Array(Vec::new()),
                    single => Value::Array(vec![single]),
                }
            } else {
                let mut results = Vec::with_capacity(items.len());
                for item in items {
                    results.push(
                        self.run_stack(item, context, trim, field_has_value, &mut errors)
                            .await,
                    );
                }
                Value::Array(results)
            }
        } else {
            let head = match value {
                Value::Array(items) => items.into_iter().next().unwrap_or(Value::Null),
                other => other,
            };
            self.run_stack(head, context, trim, field_has_value, &mut errors)
                .await
        };

        let mut guard = output.lock().map_err(|_| FormError::OutputPoisoned)?;
        set_prop(&self.path, &mut guard, result);

        Ok(errors)
    }

    async fn run_stack(
        &self,
        mut value: Value,
        context: &StepContext,
        trim: bool,
        field_has_value: bool,
        errors: &mut Vec<String>,
    ) -> Value {
        if trim && !value.is_null() {
            value = Value::String(primitives::trim(&coerce(&value), None));
        }

        for step in &self.steps {
            match step {
                OperationStep::Sync(step) => match invoke_sync(step.as_ref(), &value, context) {
                    StepOutcome::Valid | StepOutcome::NoOpUndefined => {}
                    StepOutcome::Replace(replacement) => value = replacement,
                    StepOutcome::Error(message) => {
                        if field_has_value || self.required {
                            errors.push(self.labelled(&message));
                        } else {
                            trace!("Suppressed error on empty optional field '{}'", self.path);
                        }
                    }
                },
                OperationStep::Async(step) => match step(value.clone(), context.clone()).await {
                    Ok(Some(replacement)) => value = replacement,
                    Ok(None) => {}
                    Err(error) => errors.push(self.labelled(&error.message)),
                },
            }
        }

        value
    }

    fn labelled(&self, message: &str) -> String {
        message.replacen("%s", &self.label, 1)
    }
}

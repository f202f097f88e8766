//! The unit of work in a field pipeline
//!
//! A step is either synchronous, returning a [`StepOutcome`] immediately, or
//! asynchronous, returning a future that resolves to the replacement value
//! (if any) or a [`StepError`].

use crate::error::StepError;
use async_trait::async_trait;
use futures::future::BoxFuture;
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::warn;

/// Message used when a failing step supplies none of its own
pub const DEFAULT_STEP_MESSAGE: &str = "%s is invalid";

/// Signature of a synchronous step
pub type SyncStepFn = dyn Fn(&Value, &StepContext) -> StepOutcome + Send + Sync;

/// Signature of an asynchronous step
pub type AsyncStepFn =
    dyn Fn(Value, StepContext) -> BoxFuture<'static, Result<Option<Value>, StepError>> + Send + Sync;

/// Read-only context handed to every step
#[derive(Debug, Clone)]
pub struct StepContext {
    /// Merged request input
    pub source: Arc<Value>,
    /// Snapshot of the response locals
    pub locals: Arc<Value>,
}

impl StepContext {
    pub fn new(source: Value, locals: Value) -> Self {
        Self {
            source: Arc::new(source),
            locals: Arc::new(locals),
        }
    }

    pub fn empty() -> Self {
        Self::new(Value::Object(Default::default()), Value::Object(Default::default()))
    }

    pub fn source(&self) -> &Value {
        &self.source
    }

    pub fn locals(&self) -> &Value {
        &self.locals
    }
}

/// Result of a synchronous step
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// The value passed
    Valid,
    /// The value failed; the message may contain a `%s` label placeholder
    Error(String),
    /// Replace the running value
    Replace(Value),
    /// Nothing to check, leave the value alone
    NoOpUndefined,
}

impl StepOutcome {
    pub fn error<T: Into<String>>(message: T) -> Self {
        StepOutcome::Error(message.into())
    }

    /// `Valid` when `passed`, otherwise an error carrying `message`
    pub fn check(passed: bool, message: &str) -> Self {
        if passed {
            StepOutcome::Valid
        } else {
            StepOutcome::Error(message.to_string())
        }
    }
}

/// One filter or validator operation
#[derive(Clone)]
pub enum OperationStep {
    Sync(Arc<SyncStepFn>),
    Async(Arc<AsyncStepFn>),
}

impl OperationStep {
    /// Wrap a synchronous step function
    pub fn sync<F>(step: F) -> Self
    where
        F: Fn(&Value, &StepContext) -> StepOutcome + Send + Sync + 'static,
    {
        OperationStep::Sync(Arc::new(step))
    }

    /// Wrap an asynchronous step function
    pub fn asynchronous<F, Fut>(step: F) -> Self
    where
        F: Fn(Value, StepContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<Value>, StepError>> + Send + 'static,
    {
        OperationStep::Async(Arc::new(move |value: Value, context: StepContext| {
            Box::pin(step(value, context)) as BoxFuture<'static, _>
        }))
    }

    /// User-defined synchronous step.
    ///
    /// `Ok(Some(v))` replaces the value, `Ok(None)` passes and `Err` fails
    /// with `message`, falling back to the error's own text.
    pub fn custom<F>(step: F, message: Option<String>) -> Self
    where
        F: Fn(&Value, &StepContext) -> Result<Option<Value>, StepError> + Send + Sync + 'static,
    {
        Self::sync(move |value, context| match step(value, context) {
            Ok(Some(replacement)) => StepOutcome::Replace(replacement),
            Ok(None) => StepOutcome::Valid,
            Err(error) => StepOutcome::Error(failure_message(message.as_deref(), &error)),
        })
    }

    /// User-defined asynchronous step with the same contract as [`custom`](Self::custom)
    pub fn custom_async<F, Fut>(step: F, message: Option<String>) -> Self
    where
        F: Fn(Value, StepContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<Value>, StepError>> + Send + 'static,
    {
        let step = Arc::new(step);
        let message: Option<Arc<str>> = message.map(Arc::from);

        OperationStep::Async(Arc::new(move |value: Value, context: StepContext| {
            let step = Arc::clone(&step);
            let message = message.clone();
            Box::pin(async move {
                step(value, context)
                    .await
                    .map_err(|error| StepError::new(failure_message(message.as_deref(), &error)))
            }) as BoxFuture<'static, _>
        }))
    }

    /// Adapt an [`AsyncFieldRule`] implementation into a step
    pub fn from_rule<R: AsyncFieldRule + 'static>(rule: R) -> Self {
        let rule: Arc<dyn AsyncFieldRule> = Arc::new(rule);

        OperationStep::Async(Arc::new(move |value: Value, context: StepContext| {
            let rule = Arc::clone(&rule);
            Box::pin(async move { rule.check(&value, &context).await }) as BoxFuture<'static, _>
        }))
    }

    pub fn is_async(&self) -> bool {
        matches!(self, OperationStep::Async(_))
    }
}

impl fmt::Debug for OperationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationStep::Sync(_) => f.write_str("OperationStep::Sync"),
            OperationStep::Async(_) => f.write_str("OperationStep::Async"),
        }
    }
}

/// Asynchronous rule with access to the step context, e.g. a uniqueness
/// lookup against a database
#[async_trait]
pub trait AsyncFieldRule: Send + Sync {
    /// `Ok(Some(v))` replaces the value, `Ok(None)` passes, `Err` fails
    async fn check(&self, value: &Value, context: &StepContext) -> Result<Option<Value>, StepError>;

    fn rule_name(&self) -> &'static str;
}

fn failure_message(message: Option<&str>, error: &StepError) -> String {
    match message {
        Some(message) if !message.is_empty() => message.to_string(),
        _ if !error.message.is_empty() => error.message.clone(),
        _ => DEFAULT_STEP_MESSAGE.to_string(),
    }
}

/// Invoke a synchronous step, turning a panic into an error outcome
pub(crate) fn invoke_sync(step: &SyncStepFn, value: &Value, context: &StepContext) -> StepOutcome {
    match catch_unwind(AssertUnwindSafe(|| step(value, context))) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let message = panic_message(payload.as_ref())
                .unwrap_or_else(|| DEFAULT_STEP_MESSAGE.to_string());
            warn!("Synchronous form step panicked: {}", message);
            StepOutcome::Error(message)
        }
    }
}

/// Text carried by a panic payload, if it is a non-empty string
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> Option<String> {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .filter(|s| !s.is_empty())
}

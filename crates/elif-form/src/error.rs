//! Error types for form processing
//!
//! Validation failures are not errors at this level: they are plain messages
//! collected into a [`FormReport`](crate::FormReport). [`FormError`] covers the
//! hard failures: a broken run, a malformed pipeline definition, or bad
//! configuration.

use thiserror::Error;

/// Result alias for fallible form operations
pub type FormOutcome<T> = Result<T, FormError>;

/// Hard failures raised while building or running a form
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// A field pipeline panicked while holding the shared output object
    #[error("Form output was poisoned by a panicking field pipeline")]
    OutputPoisoned,

    #[error("Form runner failed: {message}")]
    Runner { message: String },

    /// Raised at construction time, never at run time
    #[error("Invalid pattern for field '{field}': {message}")]
    InvalidPattern { field: String, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value for {field}: '{value}', expected {expected}")]
    InvalidConfigValue {
        field: String,
        value: String,
        expected: String,
    },
}

impl FormError {
    pub fn runner<T: Into<String>>(message: T) -> Self {
        FormError::Runner {
            message: message.into(),
        }
    }

    pub fn invalid_pattern<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        FormError::InvalidPattern {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn config<T: Into<String>>(message: T) -> Self {
        FormError::Config {
            message: message.into(),
        }
    }

    pub fn invalid_config_value<F, V, E>(field: F, value: V, expected: E) -> Self
    where
        F: Into<String>,
        V: Into<String>,
        E: Into<String>,
    {
        FormError::InvalidConfigValue {
            field: field.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }

    /// Whether this error was raised by the runner itself, as opposed to a
    /// construction or configuration mistake
    pub fn is_runner_fault(&self) -> bool {
        matches!(self, FormError::OutputPoisoned | FormError::Runner { .. })
    }
}

/// Failure reported by a single step.
///
/// The message may contain a `%s` placeholder which is replaced by the field
/// label when the error is recorded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct StepError {
    pub message: String,
}

impl StepError {
    pub fn new<T: Into<String>>(message: T) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<&str> for StepError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for StepError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

//! Built-in sanitizers
//!
//! Each [`Filter`] turns into a synchronous [`OperationStep`] that replaces
//! the running value. String transforms coerce their input first and leave
//! a missing value alone.

use crate::step::{OperationStep, StepOutcome};
use crate::value::{coerce, has_value};
use elif_form_primitives as primitives;
use serde_json::{Number, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Trim the given characters, or whitespace, from both ends
    Trim(Option<String>),
    TrimLeft(Option<String>),
    TrimRight(Option<String>),
    /// Remove every listed character
    Blacklist(String),
    /// Keep only the listed characters
    Whitelist(String),
    Escape,
    Unescape,
    /// Canonical lowercase address, or `false` when not an email
    NormalizeEmail,
    StripLow { keep_new_lines: bool },
    Boolean { strict: bool },
    /// RFC 3339 UTC timestamp, or null when unparseable
    Date,
    Float,
    Int { radix: u32 },
    /// Replace a missing or empty value
    Default(Value),
    Upper,
    Lower,
    /// Cut to at most `n` characters, ending in `...` when shortened
    Truncate(usize),
    /// Strip unsafe markup
    Html,
}

impl Filter {
    pub fn name(&self) -> &'static str {
        match self {
            Filter::Trim(_) => "trim",
            Filter::TrimLeft(_) => "trim_left",
            Filter::TrimRight(_) => "trim_right",
            Filter::Blacklist(_) => "blacklist",
            Filter::Whitelist(_) => "whitelist",
            Filter::Escape => "escape",
            Filter::Unescape => "unescape",
            Filter::NormalizeEmail => "normalize_email",
            Filter::StripLow { .. } => "strip_low",
            Filter::Boolean { .. } => "boolean",
            Filter::Date => "date",
            Filter::Float => "float",
            Filter::Int { .. } => "int",
            Filter::Default(_) => "default",
            Filter::Upper => "upper",
            Filter::Lower => "lower",
            Filter::Truncate(_) => "truncate",
            Filter::Html => "html",
        }
    }

    pub fn into_step(self) -> OperationStep {
        match self {
            Filter::Trim(chars) => string_transform(move |s| primitives::trim(s, chars.as_deref())),
            Filter::TrimLeft(chars) => {
                string_transform(move |s| primitives::ltrim(s, chars.as_deref()))
            }
            Filter::TrimRight(chars) => {
                string_transform(move |s| primitives::rtrim(s, chars.as_deref()))
            }
            Filter::Blacklist(chars) => string_transform(move |s| primitives::blacklist(s, &chars)),
            Filter::Whitelist(chars) => string_transform(move |s| primitives::whitelist(s, &chars)),
            Filter::Escape => string_transform(primitives::escape),
            Filter::Unescape => string_transform(primitives::unescape),
            Filter::StripLow { keep_new_lines } => {
                string_transform(move |s| primitives::strip_low(s, keep_new_lines))
            }
            Filter::Upper => string_transform(|s| s.to_uppercase()),
            Filter::Lower => string_transform(|s| s.to_lowercase()),
            Filter::Truncate(length) => string_transform(move |s| truncate(s, length)),
            Filter::NormalizeEmail => value_transform(|s| match primitives::normalize_email(s) {
                Some(email) => Value::String(email),
                None => Value::Bool(false),
            }),
            Filter::Float => value_transform(|s| {
                primitives::to_float(s)
                    .and_then(Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }),
            Filter::Int { radix } => value_transform(move |s| {
                primitives::to_int(s, radix).map_or(Value::Null, |n| Value::Number(n.into()))
            }),
            Filter::Boolean { strict } => OperationStep::sync(move |value, _| match value {
                Value::Bool(_) => StepOutcome::Valid,
                other => {
                    StepOutcome::Replace(Value::Bool(primitives::to_boolean(&coerce(other), strict)))
                }
            }),
            Filter::Date => OperationStep::sync(|value, _| {
                if !has_value(value) {
                    return StepOutcome::NoOpUndefined;
                }
                StepOutcome::Replace(
                    primitives::to_date(&coerce(value)).map_or(Value::Null, Value::String),
                )
            }),
            Filter::Default(replacement) => OperationStep::sync(move |value, _| {
                if has_value(value) {
                    StepOutcome::Valid
                } else {
                    StepOutcome::Replace(replacement.clone())
                }
            }),
            Filter::Html => OperationStep::sync(|value, _| match value {
                Value::Bool(false) => StepOutcome::NoOpUndefined,
                other if !has_value(other) => StepOutcome::NoOpUndefined,
                other => StepOutcome::Replace(Value::String(primitives::sanitize_html(&coerce(other)))),
            }),
        }
    }
}

impl From<Filter> for OperationStep {
    fn from(filter: Filter) -> Self {
        filter.into_step()
    }
}

fn string_transform<F>(transform: F) -> OperationStep
where
    F: Fn(&str) -> String + Send + Sync + 'static,
{
    value_transform(move |s| Value::String(transform(s)))
}

fn value_transform<F>(transform: F) -> OperationStep
where
    F: Fn(&str) -> Value + Send + Sync + 'static,
{
    OperationStep::sync(move |value, _| {
        if value.is_null() {
            return StepOutcome::NoOpUndefined;
        }
        StepOutcome::Replace(transform(&coerce(value)))
    })
}

fn truncate(value: &str, length: usize) -> String {
    let count = value.chars().count();
    if count <= length {
        return value.to_string();
    }
    if length <= 3 {
        return "...".to_string();
    }
    let head: String = value.chars().take(length - 3).collect();
    format!("{}...", head)
}

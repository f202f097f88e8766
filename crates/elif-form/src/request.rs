//! Request and response shapes seen by the form middleware, and the result
//! attached to a request after a run

use crate::path::get_prop;
use crate::value::merge_sources;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Request-like input to a form run.
///
/// `body`, `query` and `params` are the standard sources; any other named
/// source can be registered with [`with_source`](Self::with_source).
#[derive(Debug, Clone, Default)]
pub struct FormRequest {
    pub body: Value,
    pub query: Value,
    pub params: Value,
    sources: HashMap<String, Value>,
    form: Option<FormResult>,
}

impl FormRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    pub fn with_query(mut self, query: Value) -> Self {
        self.query = query;
        self
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }

    /// Register an additional named source, e.g. `"cookies"` or `"headers"`
    pub fn with_source<S: Into<String>>(mut self, name: S, value: Value) -> Self {
        self.sources.insert(name.into(), value);
        self
    }

    /// Look a source up by name
    pub fn source(&self, name: &str) -> Option<&Value> {
        match name {
            "body" => Some(&self.body),
            "query" => Some(&self.query),
            "params" => Some(&self.params),
            other => self.sources.get(other),
        }
    }

    /// Merge the named sources, in order, into one object; unknown names are
    /// skipped
    pub fn merge_sources<S: AsRef<str>>(&self, names: &[S]) -> Value {
        merge_sources(names.iter().filter_map(|name| self.source(name.as_ref())))
    }

    /// Result of the most recent form run, if any
    pub fn form(&self) -> Option<&FormResult> {
        self.form.as_ref()
    }

    pub fn take_form(&mut self) -> Option<FormResult> {
        self.form.take()
    }

    pub(crate) fn attach_form(&mut self, result: FormResult) {
        self.form = Some(result);
    }
}

/// Response-like companion to [`FormRequest`].
///
/// After a run, `locals.errors` maps each failing field to its most recent
/// error message.
#[derive(Debug, Clone)]
pub struct FormResponse {
    pub locals: Value,
}

impl Default for FormResponse {
    fn default() -> Self {
        Self {
            locals: Value::Object(Map::new()),
        }
    }
}

impl FormResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_locals(mut self, locals: Value) -> Self {
        self.locals = locals;
        self
    }

    pub fn locals(&self) -> &Value {
        &self.locals
    }

    /// The `locals.errors` map, if a run has initialised it
    pub fn errors(&self) -> Option<&Map<String, Value>> {
        self.locals.get("errors").and_then(Value::as_object)
    }

    /// Last recorded error message for `field`
    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors()
            .and_then(|errors| errors.get(field))
            .and_then(Value::as_str)
    }

    /// Make sure `locals.errors` exists as an object, keeping any entries
    /// already present
    pub(crate) fn ensure_errors(&mut self) {
        if !self.locals.is_object() {
            self.locals = Value::Object(Map::new());
        }
        if let Value::Object(locals) = &mut self.locals {
            let errors = locals
                .entry("errors")
                .or_insert_with(|| Value::Object(Map::new()));
            if !errors.is_object() {
                *errors = Value::Object(Map::new());
            }
        }
    }

    pub(crate) fn record_error(&mut self, field: &str, message: &str) {
        self.ensure_errors();
        if let Some(Value::Object(errors)) = self.locals.get_mut("errors") {
            errors.insert(field.to_string(), Value::String(message.to_string()));
        }
    }
}

/// Validation bookkeeping for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormReport {
    /// Every recorded error, in field registration order
    pub errors: Vec<String>,
    /// Errors grouped by field path
    pub fields: HashMap<String, Vec<String>>,
}

impl FormReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record<I>(&mut self, field: &str, errors: I)
    where
        I: IntoIterator<Item = String>,
    {
        for error in errors {
            self.errors.push(error.clone());
            self.fields.entry(field.to_string()).or_default().push(error);
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors for one field; empty when the field had none
    pub fn field_errors(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Sanitized output of a form run plus its [`FormReport`].
///
/// Serializes as the output tree alone, so the bookkeeping never leaks into
/// a serialized form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormResult {
    data: Value,
    report: FormReport,
}

impl FormResult {
    pub fn new(data: Value, report: FormReport) -> Self {
        Self { data, report }
    }

    /// The sanitized output tree
    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn into_data(self) -> Value {
        self.data
    }

    /// Read a field from the output tree by dot or bracket path
    pub fn get(&self, path: &str) -> Value {
        get_prop(path, &self.data)
    }

    pub fn errors(&self) -> &[String] {
        &self.report.errors
    }

    /// All per-field error lists
    pub fn get_errors(&self) -> &HashMap<String, Vec<String>> {
        &self.report.fields
    }

    pub fn field_errors(&self, field: &str) -> &[String] {
        self.report.field_errors(field)
    }

    pub fn is_valid(&self) -> bool {
        self.report.is_valid()
    }

    pub fn report(&self) -> &FormReport {
        &self.report
    }
}

impl Serialize for FormResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.data.serialize(serializer)
    }
}

//! # elif-form
//!
//! Form-data validation and sanitization middleware for the elif framework.
//! Declare a pipeline of filters and validators per field, combine the
//! pipelines into a [`Form`], and run it against a request. The sanitized
//! output and the collected error messages are attached to the request.
//!
//! ```
//! use elif_form::{field, field_with_label, form, FormRequest};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let signup = form(vec![
//!     field("username").trim().is_required().is("^[a-z]+$", "")?,
//!     field_with_label("email", "E-mail").trim().is_email(),
//! ]);
//!
//! let mut request = FormRequest::new().with_body(json!({ "username": " dan " }));
//! signup.run(&mut request, None).await?;
//!
//! let result = request.form().expect("form result attached");
//! assert!(result.is_valid());
//! assert_eq!(result.get("username"), json!("dan"));
//! # Ok::<(), elif_form::FormError>(())
//! # }).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod field;
pub mod filters;
pub mod form;
pub mod middleware;
pub mod path;
pub mod request;
pub mod rules;
pub mod step;
pub mod value;

// Re-exports for easy access
pub use config::{configure, current_config, reset_config, FormConfig, FormDefaults, FormOptions};
pub use error::{FormError, FormOutcome, StepError};
pub use field::{field, field_with_label, filter, validate, FieldPipeline};
pub use filters::Filter;
pub use form::{form, Form};
pub use middleware::{Middleware, MiddlewarePipeline, Next, NextFuture};
pub use request::{FormReport, FormRequest, FormResponse, FormResult};
pub use rules::{compile_pattern, Rule};
pub use step::{AsyncFieldRule, OperationStep, StepContext, StepOutcome};

pub use elif_form_primitives as primitives;
pub use elif_form_primitives::HashAlgorithm;

//! Form processing configuration
//!
//! A [`FormConfig`] can be pinned on a single form with
//! [`Form::with_config`](crate::Form::with_config). Forms without one read the
//! process-wide default at the start of every run; that default changes only
//! through [`configure`].

use crate::error::{FormError, FormOutcome};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

/// Default configuration values
pub struct FormDefaults;

impl FormDefaults {
    pub const AUTO_TRIM: bool = false;
    pub const SOURCES: &'static [&'static str] = &["body", "query", "params"];
}

/// Settings read by the form runner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormConfig {
    /// Trim string values before any other step runs
    pub auto_trim: bool,
    /// Request sources merged, in order, into the form input
    pub sources: Vec<String>,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            auto_trim: FormDefaults::AUTO_TRIM,
            sources: FormDefaults::SOURCES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl FormConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_auto_trim(mut self, auto_trim: bool) -> Self {
        self.auto_trim = auto_trim;
        self
    }

    pub fn with_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources = sources.into_iter().map(Into::into).collect();
        self
    }

    /// Load configuration from `FORM_AUTO_TRIM` and `FORM_SOURCES`
    /// (comma-separated), falling back to the defaults
    pub fn from_env() -> FormOutcome<Self> {
        let auto_trim = get_env_or_default("FORM_AUTO_TRIM", &FormDefaults::AUTO_TRIM.to_string())
            .parse::<bool>()
            .map_err(|_| {
                FormError::invalid_config_value(
                    "auto_trim",
                    env::var("FORM_AUTO_TRIM").unwrap_or_default(),
                    "true or false",
                )
            })?;

        let sources = match env::var("FORM_SOURCES") {
            Ok(raw) => raw
                .split(',')
                .map(|source| source.trim().to_string())
                .filter(|source| !source.is_empty())
                .collect::<Vec<_>>(),
            Err(_) => FormDefaults::SOURCES.iter().map(|s| s.to_string()).collect(),
        };

        if sources.is_empty() {
            return Err(FormError::invalid_config_value(
                "sources",
                env::var("FORM_SOURCES").unwrap_or_default(),
                "comma-separated list of request source names",
            ));
        }

        let config = FormConfig { auto_trim, sources };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> FormOutcome<()> {
        if self.sources.is_empty() {
            return Err(FormError::config("At least one input source is required"));
        }

        if self.sources.iter().any(|source| source.trim().is_empty()) {
            return Err(FormError::config("Input source names must not be blank"));
        }

        Ok(())
    }

    /// Apply a partial update, leaving unset options untouched
    pub fn apply(&mut self, options: FormOptions) {
        if let Some(auto_trim) = options.auto_trim {
            self.auto_trim = auto_trim;
        }
        if let Some(sources) = options.sources {
            self.sources = sources;
        }
    }
}

/// Partial update for the process-wide configuration.
///
/// Deserializes from JSON such as `{"autoTrim": true}` or
/// `{"auto_trim": true, "sources": ["body"]}`; unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormOptions {
    #[serde(default, alias = "autoTrim", skip_serializing_if = "Option::is_none")]
    pub auto_trim: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<String>>,
}

impl FormOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn auto_trim(mut self, auto_trim: bool) -> Self {
        self.auto_trim = Some(auto_trim);
        self
    }

    pub fn sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources = Some(sources.into_iter().map(Into::into).collect());
        self
    }
}

static GLOBAL_CONFIG: Lazy<RwLock<FormConfig>> = Lazy::new(|| RwLock::new(FormConfig::default()));

/// Merge `options` into the process-wide default configuration.
///
/// Affects runs that start afterwards; runs already in flight keep the
/// snapshot they took.
pub fn configure(options: FormOptions) {
    let mut config = GLOBAL_CONFIG.write().unwrap_or_else(PoisonError::into_inner);
    config.apply(options);
    debug!(
        "Form configuration updated: auto_trim={}, sources={:?}",
        config.auto_trim, config.sources
    );
}

/// Snapshot of the process-wide default configuration
pub fn current_config() -> FormConfig {
    GLOBAL_CONFIG
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Restore the process-wide configuration to its defaults
pub fn reset_config() {
    *GLOBAL_CONFIG.write().unwrap_or_else(PoisonError::into_inner) = FormConfig::default();
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

//! Built-in validators
//!
//! Each [`Rule`] turns into a synchronous [`OperationStep`] that reports
//! `Valid` or an error message. Unless noted otherwise a rule skips a value
//! that is missing or empty; making such a field mandatory is the job of
//! [`Rule::Required`].

use crate::path::get_prop;
use crate::step::{OperationStep, StepOutcome};
use crate::value::{coerce, has_value};
use elif_form_primitives::{
    self as primitives, FloatOptions, FqdnOptions, HashAlgorithm, IntOptions, UrlOptions,
};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde_json::{json, Value};

static DATE_RANGE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[0-9]{4}-[0-9]{2}-[0-9]{2} to [0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap()
});

static DATE_RANGE_SEPARATOR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i) [a-z-]{1,2} ").unwrap());

const TOO_SHORT: &str = "%s is too short";
const TOO_LONG: &str = "%s is too long";

#[derive(Debug, Clone)]
pub enum Rule {
    /// Element count (or character count for strings) within `min..=max`;
    /// checked even when the value is empty
    ArrayLength { min: usize, max: usize },
    Contains(String),
    NotContains(String),
    /// Loose equality; a `"field::path"` string compares against another
    /// input field. Checked even when the value is empty
    Equals(Value),
    Length { min: usize, max: Option<usize> },
    ByteLength { min: usize, max: Option<usize> },
    MinLength(usize),
    MaxLength(usize),
    /// Fails on whitespace-only input; checked even when the value is empty
    NotEmpty,
    Empty,
    In(Vec<String>),
    Whitelisted(String),

    Alpha,
    Alphanumeric,
    Ascii,
    Lowercase,
    Uppercase,
    FullWidth,
    HalfWidth,
    VariableWidth,
    Multibyte,
    SurrogatePair,

    Int { min: Option<i64>, max: Option<i64> },
    /// Float syntax with an optional inclusive range
    Float { min: Option<f64>, max: Option<f64> },
    /// Plain decimal syntax, no exponent
    Decimal,
    Numeric,
    Finite,
    DivisibleBy(f64),
    Hexadecimal,
    Port,
    Boolean,

    Email,
    Url,
    Ip(Option<u8>),
    Fqdn,
    MacAddress,
    DataUri,
    MimeType,
    Base64,
    CreditCard,
    Hash(HashAlgorithm),
    HexColor,
    Isbn(Option<u8>),
    Issn,
    Isin,
    Isrc,
    Json,
    LatLong,
    Md5,
    MongoId,
    Uuid(Option<usize>),

    Date,
    Iso8601,
    /// Later than the given date, or than now
    After(Option<String>),
    /// Earlier than the given date, or than now
    Before(Option<String>),
    /// `YYYY-MM-DD to YYYY-MM-DD`, replaced by a `{min, max}` object
    DateRange,

    Matches(Regex),
    Is(Regex),
    /// Fails when the pattern matches; checked even when the value is empty
    IsNot(Regex),
    /// Fails when the value is missing or loosely equals the placeholder.
    /// Marks the field as required.
    Required(Option<Value>),
    String,
}

impl Rule {
    pub fn name(&self) -> &'static str {
        match self {
            Rule::ArrayLength { .. } => "array_length",
            Rule::Contains(_) => "contains",
            Rule::NotContains(_) => "not_contains",
            Rule::Equals(_) => "equals",
            Rule::Length { .. } => "length",
            Rule::ByteLength { .. } => "byte_length",
            Rule::MinLength(_) => "min_length",
            Rule::MaxLength(_) => "max_length",
            Rule::NotEmpty => "not_empty",
            Rule::Empty => "empty",
            Rule::In(_) => "in",
            Rule::Whitelisted(_) => "whitelisted",
            Rule::Alpha => "alpha",
            Rule::Alphanumeric => "alphanumeric",
            Rule::Ascii => "ascii",
            Rule::Lowercase => "lowercase",
            Rule::Uppercase => "uppercase",
            Rule::FullWidth => "full_width",
            Rule::HalfWidth => "half_width",
            Rule::VariableWidth => "variable_width",
            Rule::Multibyte => "multibyte",
            Rule::SurrogatePair => "surrogate_pair",
            Rule::Int { .. } => "int",
            Rule::Float { .. } => "float",
            Rule::Decimal => "decimal",
            Rule::Numeric => "numeric",
            Rule::Finite => "finite",
            Rule::DivisibleBy(_) => "divisible_by",
            Rule::Hexadecimal => "hexadecimal",
            Rule::Port => "port",
            Rule::Boolean => "boolean",
            Rule::Email => "email",
            Rule::Url => "url",
            Rule::Ip(_) => "ip",
            Rule::Fqdn => "fqdn",
            Rule::MacAddress => "mac_address",
            Rule::DataUri => "data_uri",
            Rule::MimeType => "mime_type",
            Rule::Base64 => "base64",
            Rule::CreditCard => "credit_card",
            Rule::Hash(_) => "hash",
            Rule::HexColor => "hex_color",
            Rule::Isbn(_) => "isbn",
            Rule::Issn => "issn",
            Rule::Isin => "isin",
            Rule::Isrc => "isrc",
            Rule::Json => "json",
            Rule::LatLong => "lat_long",
            Rule::Md5 => "md5",
            Rule::MongoId => "mongo_id",
            Rule::Uuid(_) => "uuid",
            Rule::Date => "date",
            Rule::Iso8601 => "iso8601",
            Rule::After(_) => "after",
            Rule::Before(_) => "before",
            Rule::DateRange => "date_range",
            Rule::Matches(_) => "matches",
            Rule::Is(_) => "is",
            Rule::IsNot(_) => "is_not",
            Rule::Required(_) => "required",
            Rule::String => "string",
        }
    }

    /// Message used when none is supplied; `%s` stands for the field label
    pub fn default_message(&self) -> &'static str {
        match self {
            Rule::ArrayLength { .. } | Rule::MinLength(_) => TOO_SHORT,
            Rule::MaxLength(_) => TOO_LONG,
            Rule::Contains(_) => "%s does not contain required characters",
            Rule::NotContains(_) => "%s contains invalid characters",
            Rule::Equals(_) => "%s does not equal the expected value",
            Rule::NotEmpty => "%s has no value or is only whitespace",
            Rule::Alpha => "%s contains non-letter characters",
            Rule::Alphanumeric => "%s contains non alpha-numeric characters",
            Rule::Ascii => "%s contains non ascii characters",
            Rule::Lowercase => "%s contains uppercase letters",
            Rule::Uppercase => "%s contains lowercase letters",
            Rule::Int { .. } => "%s is not an integer",
            Rule::Decimal => "%s is not a decimal",
            Rule::Numeric | Rule::Finite => "%s is not a number",
            Rule::Email => "%s is not an email address",
            Rule::Url => "%s is not a URL",
            Rule::Ip(_) => "%s is not an IP address",
            Rule::Date => "%s is not a date",
            Rule::DateRange => "%s invalid date range, check the format.",
            Rule::Is(_) | Rule::IsNot(_) => "%s has invalid characters",
            Rule::Required(_) => "%s is required",
            Rule::String => "%s is not a string",
            _ => "%s is invalid",
        }
    }

    /// Whether adding this rule makes the field required
    pub fn marks_required(&self) -> bool {
        matches!(self, Rule::Required(_))
    }

    /// Build the step, overriding the default message when `message` is set
    pub fn into_step(self, message: Option<String>) -> OperationStep {
        let fixed = message
            .clone()
            .unwrap_or_else(|| self.default_message().to_string());

        match self {
            Rule::ArrayLength { min, max } => OperationStep::sync(move |value, _| {
                let len = match value {
                    Value::Null => return StepOutcome::NoOpUndefined,
                    Value::Array(items) => items.len(),
                    other => coerce(other).chars().count(),
                };
                if len < min {
                    StepOutcome::Error(message.clone().unwrap_or_else(|| TOO_SHORT.to_string()))
                } else if len > max {
                    StepOutcome::Error(message.clone().unwrap_or_else(|| TOO_LONG.to_string()))
                } else {
                    StepOutcome::Valid
                }
            }),
            Rule::Equals(other) => OperationStep::sync(move |value, context| {
                let expected = match other.as_str().and_then(|s| s.strip_prefix("field::")) {
                    Some(path) => get_prop(path, context.source()),
                    None => other.clone(),
                };
                if loose_equals(value, &expected) {
                    StepOutcome::Valid
                } else {
                    StepOutcome::Error(
                        message
                            .clone()
                            .unwrap_or_else(|| format!("%s does not equal {}", coerce(&expected))),
                    )
                }
            }),
            Rule::NotEmpty => OperationStep::sync(move |value, _| {
                let trimmed = primitives::trim(&coerce(value), None);
                StepOutcome::check(!trimmed.is_empty(), &fixed)
            }),
            Rule::IsNot(regex) => OperationStep::sync(move |value, _| {
                StepOutcome::check(!regex.is_match(&coerce(value)), &fixed)
            }),
            Rule::Required(placeholder) => OperationStep::sync(move |value, _| {
                let missing = !has_value(value)
                    || placeholder
                        .as_ref()
                        .map_or(false, |placeholder| loose_equals(value, placeholder));
                StepOutcome::check(!missing, &fixed)
            }),
            Rule::Finite => OperationStep::sync(move |value, _| {
                if !has_value(value) {
                    return StepOutcome::NoOpUndefined;
                }
                StepOutcome::check(is_finite_value(value), &fixed)
            }),
            Rule::String => OperationStep::sync(move |value, _| {
                if !has_value(value) {
                    return StepOutcome::NoOpUndefined;
                }
                StepOutcome::check(value.is_string(), &fixed)
            }),
            Rule::DateRange => date_range_step(message),

            Rule::Contains(seed) => predicate(fixed, move |s| primitives::contains(s, &seed)),
            Rule::NotContains(seed) => predicate(fixed, move |s| !primitives::contains(s, &seed)),
            Rule::Length { min, max } => predicate(fixed, move |s| primitives::is_length(s, min, max)),
            Rule::ByteLength { min, max } => {
                predicate(fixed, move |s| primitives::is_byte_length(s, min, max))
            }
            Rule::MinLength(min) => predicate(fixed, move |s| s.chars().count() >= min),
            Rule::MaxLength(max) => predicate(fixed, move |s| s.chars().count() <= max),
            Rule::Empty => predicate(fixed, primitives::is_empty),
            Rule::In(options) => predicate(fixed, move |s| primitives::is_in(s, &options)),
            Rule::Whitelisted(chars) => {
                predicate(fixed, move |s| primitives::is_whitelisted(s, &chars))
            }

            Rule::Alpha => predicate(fixed, primitives::is_alpha),
            Rule::Alphanumeric => predicate(fixed, primitives::is_alphanumeric),
            Rule::Ascii => predicate(fixed, primitives::is_ascii),
            Rule::Lowercase => predicate(fixed, primitives::is_lowercase),
            Rule::Uppercase => predicate(fixed, primitives::is_uppercase),
            Rule::FullWidth => predicate(fixed, primitives::is_full_width),
            Rule::HalfWidth => predicate(fixed, primitives::is_half_width),
            Rule::VariableWidth => predicate(fixed, primitives::is_variable_width),
            Rule::Multibyte => predicate(fixed, primitives::is_multibyte),
            Rule::SurrogatePair => predicate(fixed, primitives::is_surrogate_pair),

            Rule::Int { min, max } => {
                let options = IntOptions::range(min, max);
                predicate(fixed, move |s| primitives::is_int(s, &options))
            }
            Rule::Float { min, max } => {
                let options = FloatOptions { min, max };
                predicate(fixed, move |s| primitives::is_float(s, &options))
            }
            Rule::Decimal => predicate(fixed, primitives::is_decimal),
            Rule::Numeric => predicate(fixed, primitives::is_numeric),
            Rule::DivisibleBy(divisor) => {
                predicate(fixed, move |s| primitives::is_divisible_by(s, divisor))
            }
            Rule::Hexadecimal => predicate(fixed, primitives::is_hexadecimal),
            Rule::Port => predicate(fixed, primitives::is_port),
            Rule::Boolean => predicate(fixed, primitives::is_boolean),

            Rule::Email => predicate(fixed, primitives::is_email),
            Rule::Url => {
                let options = UrlOptions::default();
                predicate(fixed, move |s| primitives::is_url(s, &options))
            }
            Rule::Ip(version) => predicate(fixed, move |s| primitives::is_ip(s, version)),
            Rule::Fqdn => {
                let options = FqdnOptions::default();
                predicate(fixed, move |s| primitives::is_fqdn(s, &options))
            }
            Rule::MacAddress => predicate(fixed, primitives::is_mac_address),
            Rule::DataUri => predicate(fixed, primitives::is_data_uri),
            Rule::MimeType => predicate(fixed, primitives::is_mime_type),
            Rule::Base64 => predicate(fixed, primitives::is_base64),
            Rule::CreditCard => predicate(fixed, primitives::is_credit_card),
            Rule::Hash(algorithm) => predicate(fixed, move |s| primitives::is_hash(s, algorithm)),
            Rule::HexColor => predicate(fixed, primitives::is_hex_color),
            Rule::Isbn(version) => predicate(fixed, move |s| primitives::is_isbn(s, version)),
            Rule::Issn => predicate(fixed, primitives::is_issn),
            Rule::Isin => predicate(fixed, primitives::is_isin),
            Rule::Isrc => predicate(fixed, primitives::is_isrc),
            Rule::Json => predicate(fixed, primitives::is_json),
            Rule::LatLong => predicate(fixed, primitives::is_lat_long),
            Rule::Md5 => predicate(fixed, primitives::is_md5),
            Rule::MongoId => predicate(fixed, primitives::is_mongo_id),
            Rule::Uuid(version) => predicate(fixed, move |s| primitives::is_uuid(s, version)),

            Rule::Date => predicate(fixed, primitives::is_date),
            Rule::Iso8601 => predicate(fixed, primitives::is_iso8601),
            Rule::After(reference) => {
                predicate(fixed, move |s| primitives::is_after(s, reference.as_deref()))
            }
            Rule::Before(reference) => {
                predicate(fixed, move |s| primitives::is_before(s, reference.as_deref()))
            }

            Rule::Matches(regex) | Rule::Is(regex) => predicate(fixed, move |s| regex.is_match(s)),
        }
    }
}

impl From<Rule> for OperationStep {
    fn from(rule: Rule) -> Self {
        rule.into_step(None)
    }
}

/// Compile a pattern with JavaScript-style flags.
///
/// `i`, `m` and `s` map onto the regex flags of the same meaning; `g`, `y`
/// and `u` have no effect on a single match and are accepted. Any other flag
/// is rejected.
pub fn compile_pattern(pattern: &str, flags: &str) -> Result<Regex, String> {
    let mut builder = RegexBuilder::new(pattern);
    for flag in flags.chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            'g' | 'y' | 'u' => {}
            other => return Err(format!("unsupported flag '{}'", other)),
        }
    }
    builder.build().map_err(|e| e.to_string())
}

/// Skip missing values, coerce the rest and test them
fn predicate<F>(message: String, test: F) -> OperationStep
where
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    OperationStep::sync(move |value, _| {
        if !has_value(value) {
            return StepOutcome::NoOpUndefined;
        }
        StepOutcome::check(test(&coerce(value)), &message)
    })
}

/// Numbers compare numerically, values of the same kind structurally and
/// anything else by string form
fn loose_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Value::Number(n), other) | (other, Value::Number(n)) => {
            coerce(other).trim().parse::<f64>().ok() == n.as_f64()
        }
        _ if std::mem::discriminant(left) == std::mem::discriminant(right) => left == right,
        _ => coerce(left) == coerce(right),
    }
}

fn is_finite_value(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.as_f64().map_or(false, f64::is_finite),
        Value::Bool(_) => true,
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed.is_empty() || trimmed.parse::<f64>().map_or(false, f64::is_finite)
        }
        _ => false,
    }
}

fn date_range_step(message: Option<String>) -> OperationStep {
    OperationStep::sync(move |value, _| {
        if !has_value(value) {
            return StepOutcome::Replace(json!({ "min": null, "max": null }));
        }

        let fail = |default: &str| {
            StepOutcome::Error(message.clone().unwrap_or_else(|| default.to_string()))
        };

        let text = coerce(value);
        if !DATE_RANGE_REGEX.is_match(&text) {
            return fail("%s invalid date range, check the format.");
        }

        let mut parts = DATE_RANGE_SEPARATOR_REGEX.splitn(&text, 2);
        let min = format!("{} 00:00:00", parts.next().unwrap_or_default());
        let max = format!("{} 23:59:59", parts.next().unwrap_or_default());

        let Some(start) = primitives::parse_date(&min) else {
            return fail("%s invalid date range, check start date.");
        };
        let Some(end) = primitives::parse_date(&max) else {
            return fail("%s invalid date range, check ending date.");
        };
        if end < start {
            return fail("%s invalid date range, ending date is before starting date.");
        }

        StepOutcome::Replace(json!({ "min": min, "max": max }))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::StepContext;

    fn check_with(rule: Rule, value: Value, context: &StepContext) -> StepOutcome {
        match rule.into_step(None) {
            OperationStep::Sync(step) => step(&value, context),
            OperationStep::Async(_) => panic!("rules are synchronous"),
        }
    }

    fn check(rule: Rule, value: Value) -> StepOutcome {
        check_with(rule, value, &StepContext::empty())
    }

    fn valid(rule: Rule, value: Value) -> bool {
        check(rule, value) == StepOutcome::Valid
    }

    #[test]
    fn test_default_messages() {
        assert_eq!(check(Rule::Email, json!("fail")), StepOutcome::error("%s is not an email address"));
        assert_eq!(
            check(Rule::Int { min: None, max: None }, json!("f")),
            StepOutcome::error("%s is not an integer")
        );
        assert_eq!(check(Rule::Url, json!("nope")), StepOutcome::error("%s is not a URL"));
        assert_eq!(check(Rule::Alpha, json!("a1")), StepOutcome::error("%s contains non-letter characters"));
        assert_eq!(check(Rule::Base64, json!("*")), StepOutcome::error("%s is invalid"));
    }

    #[test]
    fn test_message_override() {
        let step = Rule::Email.into_step(Some("bad address for %s".to_string()));
        let OperationStep::Sync(step) = step else {
            panic!("rules are synchronous");
        };
        assert_eq!(
            step(&json!("fail"), &StepContext::empty()),
            StepOutcome::error("bad address for %s")
        );
    }

    #[test]
    fn test_rules_skip_missing_values() {
        assert_eq!(check(Rule::Email, json!("")), StepOutcome::NoOpUndefined);
        assert_eq!(check(Rule::Alpha, Value::Null), StepOutcome::NoOpUndefined);
        assert_eq!(check(Rule::MinLength(3), json!("")), StepOutcome::NoOpUndefined);
    }

    #[test]
    fn test_rules_coerce_non_strings() {
        assert!(valid(Rule::Int { min: None, max: None }, json!(12)));
        assert!(valid(Rule::Int { min: Some(1), max: Some(10) }, json!(5)));
        assert!(!valid(Rule::Int { min: Some(1), max: Some(10) }, json!(50)));
        assert!(valid(Rule::Numeric, json!(7)));
        assert!(valid(Rule::MaxLength(3), json!(123)));
    }

    #[test]
    fn test_required_rule() {
        let required = || Rule::Required(None);
        assert!(required().marks_required());
        assert_eq!(check(required(), json!("")), StepOutcome::error("%s is required"));
        assert_eq!(check(required(), Value::Null), StepOutcome::error("%s is required"));
        assert!(valid(required(), json!(0)));

        let placeholder = Rule::Required(Some(json!("choose one")));
        assert_eq!(check(placeholder, json!("choose one")), StepOutcome::error("%s is required"));
    }

    #[test]
    fn test_equals_rule() {
        assert!(valid(Rule::Equals(json!("abc")), json!("abc")));
        assert!(valid(Rule::Equals(json!(5)), json!("5")));
        assert_eq!(
            check(Rule::Equals(json!("abc")), json!("xyz")),
            StepOutcome::error("%s does not equal abc")
        );

        let context = StepContext::new(json!({ "password": "s3cret" }), json!({}));
        let confirm = || Rule::Equals(json!("field::password"));
        assert_eq!(check_with(confirm(), json!("s3cret"), &context), StepOutcome::Valid);
        assert_eq!(
            check_with(confirm(), json!("other"), &context),
            StepOutcome::error("%s does not equal s3cret")
        );
    }

    #[test]
    fn test_length_rules() {
        assert!(valid(Rule::MinLength(3), json!("abc")));
        assert_eq!(check(Rule::MinLength(4), json!("abc")), StepOutcome::error(TOO_SHORT));
        assert_eq!(check(Rule::MaxLength(2), json!("abc")), StepOutcome::error(TOO_LONG));
        assert!(valid(Rule::Length { min: 2, max: Some(4) }, json!("abc")));
        assert!(!valid(Rule::ByteLength { min: 0, max: Some(3) }, json!("héllo")));

        let array_length = || Rule::ArrayLength { min: 1, max: 2 };
        assert_eq!(check(array_length(), json!([])), StepOutcome::error(TOO_SHORT));
        assert!(valid(array_length(), json!([1, 2])));
        assert_eq!(check(array_length(), json!([1, 2, 3])), StepOutcome::error(TOO_LONG));
    }

    #[test]
    fn test_not_empty_rule() {
        let message = StepOutcome::error("%s has no value or is only whitespace");
        assert_eq!(check(Rule::NotEmpty, json!("   ")), message);
        assert_eq!(check(Rule::NotEmpty, Value::Null), message);
        assert!(valid(Rule::NotEmpty, json!(" x ")));
    }

    #[test]
    fn test_content_rules() {
        assert!(valid(Rule::Contains("@".into()), json!("a@b")));
        assert!(!valid(Rule::Contains("@".into()), json!("ab")));
        assert!(valid(Rule::NotContains("<".into()), json!("ab")));
        assert!(valid(Rule::In(vec!["red".into(), "blue".into()]), json!("red")));
        assert!(!valid(Rule::In(vec!["red".into()]), json!("green")));
        assert!(valid(Rule::Whitelisted("abc".into()), json!("cab")));
    }

    #[test]
    fn test_number_rules() {
        assert!(valid(Rule::Float { min: None, max: None }, json!("1.5")));
        assert!(!valid(Rule::Float { min: Some(2.0), max: None }, json!("1.5")));
        assert!(valid(Rule::Decimal, json!("0.25")));
        assert_eq!(check(Rule::Decimal, json!("1e3")), StepOutcome::error("%s is not a decimal"));
        assert!(valid(Rule::Finite, json!("12.5")));
        assert_eq!(check(Rule::Finite, json!("abc")), StepOutcome::error("%s is not a number"));
        assert!(valid(Rule::DivisibleBy(3.0), json!(9)));
        assert!(valid(Rule::Port, json!("443")));
        assert!(valid(Rule::Boolean, json!(true)));
    }

    #[test]
    fn test_format_rules() {
        assert!(valid(Rule::Ip(None), json!("10.0.0.1")));
        assert_eq!(check(Rule::Ip(Some(6)), json!("10.0.0.1")), StepOutcome::error("%s is not an IP address"));
        assert!(valid(Rule::Uuid(Some(4)), json!("a3bb189e-8bf9-4888-9912-ace4e6543002")));
        assert!(valid(Rule::Hash(HashAlgorithm::Md5), json!("d41d8cd98f00b204e9800998ecf8427e")));
        assert!(valid(Rule::Json, json!(r#"{"ok":true}"#)));
        assert!(valid(Rule::CreditCard, json!("4111-1111-1111-1111")));
        assert!(!valid(Rule::MongoId, json!("xyz")));
    }

    #[test]
    fn test_string_rule() {
        assert!(valid(Rule::String, json!("text")));
        assert_eq!(check(Rule::String, json!(5)), StepOutcome::error("%s is not a string"));
    }

    #[test]
    fn test_date_rules() {
        assert!(valid(Rule::Date, json!("2024-01-15")));
        assert_eq!(check(Rule::Date, json!("someday")), StepOutcome::error("%s is not a date"));
        assert!(valid(Rule::After(Some("2020-01-01".into())), json!("2024-01-15")));
        assert!(!valid(Rule::Before(Some("2020-01-01".into())), json!("2024-01-15")));
        assert!(valid(Rule::Iso8601, json!("2024-01-15T10:00:00Z")));
    }

    #[test]
    fn test_date_range_rule() {
        assert_eq!(
            check(Rule::DateRange, json!("2024-01-01 to 2024-01-31")),
            StepOutcome::Replace(json!({ "min": "2024-01-01 00:00:00", "max": "2024-01-31 23:59:59" }))
        );
        assert_eq!(
            check(Rule::DateRange, json!("")),
            StepOutcome::Replace(json!({ "min": null, "max": null }))
        );
        assert_eq!(
            check(Rule::DateRange, json!("January")),
            StepOutcome::error("%s invalid date range, check the format.")
        );
        assert_eq!(
            check(Rule::DateRange, json!("2024-13-01 to 2024-01-31")),
            StepOutcome::error("%s invalid date range, check start date.")
        );
        assert_eq!(
            check(Rule::DateRange, json!("2024-02-01 to 2024-01-31")),
            StepOutcome::error("%s invalid date range, ending date is before starting date.")
        );
    }

    #[test]
    fn test_pattern_rules() {
        let lower = compile_pattern("^[a-z]+$", "").unwrap();
        assert!(valid(Rule::Is(lower.clone()), json!("dan")));
        assert_eq!(check(Rule::Is(lower), json!("Dan")), StepOutcome::error("%s has invalid characters"));

        let insensitive = compile_pattern("^[a-z]+$", "gi").unwrap();
        assert!(valid(Rule::Matches(insensitive), json!("Dan")));

        let digits = compile_pattern(r"\d", "").unwrap();
        assert!(valid(Rule::IsNot(digits.clone()), json!("abc")));
        assert_eq!(check(Rule::IsNot(digits), json!("a1")), StepOutcome::error("%s has invalid characters"));
    }

    #[test]
    fn test_compile_pattern_errors() {
        assert!(compile_pattern("(unclosed", "").is_err());
        assert_eq!(compile_pattern("abc", "q").unwrap_err(), "unsupported flag 'q'");
    }

    #[test]
    fn test_loose_equals() {
        assert!(loose_equals(&json!(1), &json!(1.0)));
        assert!(loose_equals(&json!("1"), &json!(1)));
        assert!(loose_equals(&json!(["a", "b"]), &json!("a,b")));
        assert!(!loose_equals(&Value::Null, &json!("")));
        assert!(!loose_equals(&json!("a"), &json!("b")));
    }
}

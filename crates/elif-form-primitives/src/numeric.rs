//! Numeric predicates and number/boolean conversions

use once_cell::sync::Lazy;
use regex::Regex;

static INT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-+]?[0-9]+$").unwrap());

static INT_NO_LEADING_ZEROES_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-+]?(?:0|[1-9][0-9]*)$").unwrap());

static FLOAT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[-+]?(?:[0-9]+)?(?:\.[0-9]*)?(?:[eE][-+]?[0-9]+)?$").unwrap()
});

static DECIMAL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-+]?(?:[0-9]+)?(?:\.[0-9]+)?$").unwrap());

static NUMERIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-+]?[0-9]+$").unwrap());

static HEXADECIMAL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:0[xXhH])?[0-9a-fA-F]+$").unwrap());

static LEADING_FLOAT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[-+]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][-+]?[0-9]+)?").unwrap()
});

static LAT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(?[-+]?(?:[1-8]?\d(?:\.\d+)?|90(?:\.0+)?)$").unwrap());

static LONG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s?[-+]?(?:180(?:\.0+)?|1[0-7]\d(?:\.\d+)?|\d{1,2}(?:\.\d+)?)\)?$").unwrap()
});

/// Options for [`is_int`]
#[derive(Debug, Clone, PartialEq)]
pub struct IntOptions {
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub allow_leading_zeroes: bool,
}

impl Default for IntOptions {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
            allow_leading_zeroes: true,
        }
    }
}

impl IntOptions {
    pub fn range(min: Option<i64>, max: Option<i64>) -> Self {
        Self {
            min,
            max,
            ..Self::default()
        }
    }
}

/// Options for [`is_float`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FloatOptions {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

pub fn is_int(value: &str, options: &IntOptions) -> bool {
    let shape = if options.allow_leading_zeroes {
        &*INT_REGEX
    } else {
        &*INT_NO_LEADING_ZEROES_REGEX
    };
    if !shape.is_match(value) {
        return false;
    }

    // Values beyond i64 still count as integers; range checks fall back to f64.
    match value.parse::<i64>() {
        Ok(number) => {
            options.min.map_or(true, |min| number >= min)
                && options.max.map_or(true, |max| number <= max)
        }
        Err(_) => match value.parse::<f64>() {
            Ok(number) => {
                options.min.map_or(true, |min| number >= min as f64)
                    && options.max.map_or(true, |max| number <= max as f64)
            }
            Err(_) => false,
        },
    }
}

pub fn is_float(value: &str, options: &FloatOptions) -> bool {
    if value.is_empty() || value == "." || value == "-" || value == "+" {
        return false;
    }
    if !FLOAT_REGEX.is_match(value) {
        return false;
    }

    match value.parse::<f64>() {
        Ok(number) => {
            options.min.map_or(true, |min| number >= min)
                && options.max.map_or(true, |max| number <= max)
        }
        // Shapes like "5." are accepted by the pattern but not by the parser.
        Err(_) => value
            .trim_end_matches('.')
            .parse::<f64>()
            .map(|number| {
                options.min.map_or(true, |min| number >= min)
                    && options.max.map_or(true, |max| number <= max)
            })
            .unwrap_or(false),
    }
}

pub fn is_decimal(value: &str) -> bool {
    !value.is_empty()
        && value != "-"
        && value != "+"
        && value != "."
        && DECIMAL_REGEX.is_match(value)
}

pub fn is_numeric(value: &str) -> bool {
    NUMERIC_REGEX.is_match(value)
}

pub fn is_hexadecimal(value: &str) -> bool {
    HEXADECIMAL_REGEX.is_match(value)
}

pub fn is_divisible_by(value: &str, divisor: f64) -> bool {
    if divisor == 0.0 {
        return false;
    }
    match value.trim().parse::<f64>() {
        Ok(number) => number % divisor == 0.0,
        Err(_) => false,
    }
}

/// TCP/UDP port number, 0 through 65535
pub fn is_port(value: &str) -> bool {
    is_int(
        value,
        &IntOptions {
            min: Some(0),
            max: Some(65535),
            allow_leading_zeroes: false,
        },
    )
}

/// `"lat,long"` pair, optionally wrapped in parentheses
pub fn is_lat_long(value: &str) -> bool {
    let Some((lat, long)) = value.split_once(',') else {
        return false;
    };
    if value.starts_with('(') != value.ends_with(')') {
        return false;
    }
    LAT_REGEX.is_match(lat) && LONG_REGEX.is_match(long)
}

pub fn is_boolean(value: &str) -> bool {
    matches!(value, "true" | "false" | "1" | "0")
}

/// Parse the leading integer of a string in the given radix, ignoring any
/// trailing garbage. Returns `None` when no digits lead the string.
pub fn to_int(value: &str, radix: u32) -> Option<i64> {
    let radix = if (2..=36).contains(&radix) { radix } else { 10 };
    let trimmed = value.trim_start();

    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let rest = if radix == 16 {
        rest.strip_prefix("0x")
            .or_else(|| rest.strip_prefix("0X"))
            .unwrap_or(rest)
    } else {
        rest
    };

    let digits: String = rest.chars().take_while(|c| c.is_digit(radix)).collect();
    if digits.is_empty() {
        return None;
    }

    let magnitude = i64::from_str_radix(&digits, radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Parse the leading float of a string, ignoring trailing garbage
pub fn to_float(value: &str) -> Option<f64> {
    let trimmed = value.trim_start();
    let matched = LEADING_FLOAT_REGEX.find(trimmed)?;
    matched
        .as_str()
        .trim_end_matches('.')
        .parse::<f64>()
        .ok()
}

/// Interpret a string as a boolean.
///
/// Strict mode accepts only `"1"` and `"true"` as true; otherwise anything
/// except `"0"`, `"false"` and `""` is true.
pub fn to_boolean(value: &str, strict: bool) -> bool {
    if strict {
        value == "1" || value == "true"
    } else {
        value != "0" && value != "false" && !value.is_empty()
    }
}

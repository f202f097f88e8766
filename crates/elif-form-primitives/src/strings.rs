//! Whitespace, character-set and HTML transforms plus string-shape predicates

use crate::network::is_email;
use once_cell::sync::Lazy;
use regex::Regex;

static HALF_WIDTH_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\x{0020}-\x{007E}\x{FF61}-\x{FF9F}\x{FFA0}-\x{FFDC}\x{FFE8}-\x{FFEE}0-9a-zA-Z]")
        .unwrap()
});

static FULL_WIDTH_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\x{0020}-\x{007E}\x{FF61}-\x{FF9F}\x{FFA0}-\x{FFDC}\x{FFE8}-\x{FFEE}0-9a-zA-Z]")
        .unwrap()
});

static ALPHA_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z]+$").unwrap());

static ALPHANUMERIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9A-Za-z]+$").unwrap());

/// Trim `chars` from both ends, or whitespace when `chars` is `None`
pub fn trim(value: &str, chars: Option<&str>) -> String {
    rtrim(&ltrim(value, chars), chars)
}

/// Trim `chars` (or whitespace) from the start of the string
pub fn ltrim(value: &str, chars: Option<&str>) -> String {
    match chars {
        Some(chars) => value.trim_start_matches(|c: char| chars.contains(c)).to_string(),
        None => value.trim_start().to_string(),
    }
}

/// Trim `chars` (or whitespace) from the end of the string
pub fn rtrim(value: &str, chars: Option<&str>) -> String {
    match chars {
        Some(chars) => value.trim_end_matches(|c: char| chars.contains(c)).to_string(),
        None => value.trim_end().to_string(),
    }
}

/// Remove every character that appears in `chars`
pub fn blacklist(value: &str, chars: &str) -> String {
    value.chars().filter(|c| !chars.contains(*c)).collect()
}

/// Keep only the characters that appear in `chars`
pub fn whitelist(value: &str, chars: &str) -> String {
    value.chars().filter(|c| chars.contains(*c)).collect()
}

/// Replace `&`, `<`, `>`, `"`, `'` and `/` with HTML entities
pub fn escape(value: &str) -> String {
    html_escape::encode_safe(value).into_owned()
}

/// Reverse of [`escape`], decoding HTML entities
pub fn unescape(value: &str) -> String {
    html_escape::decode_html_entities(value).into_owned()
}

/// Remove ASCII control characters; `\n` and `\r` survive when `keep_new_lines` is set
pub fn strip_low(value: &str, keep_new_lines: bool) -> String {
    value
        .chars()
        .filter(|c| {
            let code = *c as u32;
            let is_low = code <= 0x1F || code == 0x7F;
            !is_low || (keep_new_lines && (*c == '\n' || *c == '\r'))
        })
        .collect()
}

/// Canonicalize an email address.
///
/// The whole address is lowercased. Gmail addresses additionally lose dots and
/// `+tag` suffixes in the local part and `googlemail.com` becomes `gmail.com`.
/// Returns `None` when the input is not an email address.
pub fn normalize_email(value: &str) -> Option<String> {
    if !is_email(value) {
        return None;
    }

    let (local, domain) = value.rsplit_once('@')?;
    let mut local = local.to_lowercase();
    let mut domain = domain.to_lowercase();

    if domain == "gmail.com" || domain == "googlemail.com" {
        if let Some((head, _tag)) = local.split_once('+') {
            local = head.to_string();
        }
        local = local.replace('.', "");
        domain = "gmail.com".to_string();
    }

    Some(format!("{}@{}", local, domain))
}

/// Strip disallowed tags and attributes from an HTML fragment
pub fn sanitize_html(value: &str) -> String {
    ammonia::clean(value)
}

pub fn contains(value: &str, seed: &str) -> bool {
    value.contains(seed)
}

pub fn is_empty(value: &str) -> bool {
    value.is_empty()
}

/// Character count within `min..=max` (`max` unbounded when `None`)
pub fn is_length(value: &str, min: usize, max: Option<usize>) -> bool {
    let len = value.chars().count();
    len >= min && max.map_or(true, |max| len <= max)
}

/// UTF-8 byte count within `min..=max` (`max` unbounded when `None`)
pub fn is_byte_length(value: &str, min: usize, max: Option<usize>) -> bool {
    let len = value.len();
    len >= min && max.map_or(true, |max| len <= max)
}

pub fn is_lowercase(value: &str) -> bool {
    value == value.to_lowercase()
}

pub fn is_uppercase(value: &str) -> bool {
    value == value.to_uppercase()
}

pub fn is_ascii(value: &str) -> bool {
    !value.is_empty() && value.is_ascii()
}

pub fn is_alpha(value: &str) -> bool {
    ALPHA_REGEX.is_match(value)
}

pub fn is_alphanumeric(value: &str) -> bool {
    ALPHANUMERIC_REGEX.is_match(value)
}

/// Contains at least one full-width character
pub fn is_full_width(value: &str) -> bool {
    FULL_WIDTH_REGEX.is_match(value)
}

/// Contains at least one half-width character
pub fn is_half_width(value: &str) -> bool {
    HALF_WIDTH_REGEX.is_match(value)
}

/// Mixes full-width and half-width characters
pub fn is_variable_width(value: &str) -> bool {
    is_full_width(value) && is_half_width(value)
}

/// Contains at least one non-ASCII character
pub fn is_multibyte(value: &str) -> bool {
    value.chars().any(|c| !c.is_ascii())
}

/// Contains a character outside the Basic Multilingual Plane, which UTF-16
/// encodes as a surrogate pair
pub fn is_surrogate_pair(value: &str) -> bool {
    value.chars().any(|c| c.len_utf16() == 2)
}

/// Every character appears in `chars`
pub fn is_whitelisted(value: &str, chars: &str) -> bool {
    value.chars().all(|c| chars.contains(c))
}

pub fn is_in<S: AsRef<str>>(value: &str, options: &[S]) -> bool {
    options.iter().any(|option| option.as_ref() == value)
}

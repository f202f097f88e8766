//! Identifier, hash, checksum and encoding predicates

use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;

static HYPHENATED_UUID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .unwrap()
});

static HEX_COLOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#?(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").unwrap()
});

static ISSN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?i)\d{4}-?\d{3}[\dX]$").unwrap());

static ISIN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{2}[0-9A-Z]{9}[0-9]$").unwrap());

static ISRC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{2}[0-9A-Z]{3}\d{2}\d{5}$").unwrap());

/// Digest algorithms recognised by [`is_hash`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Md4,
    Md5,
    Sha1,
    Sha256,
    Sha384,
    Sha512,
    Ripemd128,
    Ripemd160,
    Tiger128,
    Tiger160,
    Tiger192,
    Crc32,
    Crc32b,
}

impl HashAlgorithm {
    /// Look an algorithm up by its conventional lowercase name
    pub fn from_name(name: &str) -> Option<Self> {
        let algorithm = match name.to_ascii_lowercase().as_str() {
            "md4" => Self::Md4,
            "md5" => Self::Md5,
            "sha1" => Self::Sha1,
            "sha256" => Self::Sha256,
            "sha384" => Self::Sha384,
            "sha512" => Self::Sha512,
            "ripemd128" => Self::Ripemd128,
            "ripemd160" => Self::Ripemd160,
            "tiger128" => Self::Tiger128,
            "tiger160" => Self::Tiger160,
            "tiger192" => Self::Tiger192,
            "crc32" => Self::Crc32,
            "crc32b" => Self::Crc32b,
            _ => return None,
        };
        Some(algorithm)
    }

    /// Length of the hex-encoded digest
    pub fn hex_len(self) -> usize {
        match self {
            Self::Crc32 | Self::Crc32b => 8,
            Self::Md4 | Self::Md5 | Self::Ripemd128 | Self::Tiger128 => 32,
            Self::Sha1 | Self::Ripemd160 | Self::Tiger160 => 40,
            Self::Tiger192 => 48,
            Self::Sha256 => 64,
            Self::Sha384 => 96,
            Self::Sha512 => 128,
        }
    }
}

fn is_hex_of_len(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Hyphenated UUID; `version` restricts to 1 through 5
pub fn is_uuid(value: &str, version: Option<usize>) -> bool {
    if !HYPHENATED_UUID_REGEX.is_match(value) {
        return false;
    }
    let Ok(parsed) = uuid::Uuid::parse_str(value) else {
        return false;
    };

    match version {
        None => true,
        Some(version) => {
            parsed.get_version_num() == version
                && parsed.get_variant() == uuid::Variant::RFC4122
        }
    }
}

pub fn is_mongo_id(value: &str) -> bool {
    is_hex_of_len(value, 24)
}

pub fn is_md5(value: &str) -> bool {
    is_hex_of_len(value, 32)
}

pub fn is_hash(value: &str, algorithm: HashAlgorithm) -> bool {
    is_hex_of_len(value, algorithm.hex_len())
}

pub fn is_hex_color(value: &str) -> bool {
    HEX_COLOR_REGEX.is_match(value)
}

/// Standard-alphabet, padded base64
pub fn is_base64(value: &str) -> bool {
    if value.is_empty() || value.len() % 4 != 0 {
        return false;
    }
    base64::engine::general_purpose::STANDARD.decode(value).is_ok()
}

/// JSON text whose top-level value is an object or array
pub fn is_json(value: &str) -> bool {
    matches!(
        serde_json::from_str::<serde_json::Value>(value),
        Ok(serde_json::Value::Object(_)) | Ok(serde_json::Value::Array(_))
    )
}

fn luhn_valid(digits: &[u32]) -> bool {
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(index, digit)| {
            if index % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                *digit
            }
        })
        .sum();
    sum % 10 == 0
}

/// Card number of 13 to 19 digits passing the Luhn check; spaces and hyphens are ignored
pub fn is_credit_card(value: &str) -> bool {
    let sanitized: String = value.chars().filter(|c| *c != ' ' && *c != '-').collect();
    if sanitized.len() < 13 || sanitized.len() > 19 {
        return false;
    }
    let Some(digits) = sanitized
        .chars()
        .map(|c| c.to_digit(10))
        .collect::<Option<Vec<u32>>>()
    else {
        return false;
    };
    luhn_valid(&digits)
}

/// ISBN-10 or ISBN-13 (`version` restricts to one of them)
pub fn is_isbn(value: &str, version: Option<u8>) -> bool {
    let sanitized: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    match version {
        Some(10) => is_isbn10(&sanitized),
        Some(13) => is_isbn13(&sanitized),
        Some(_) => false,
        None => is_isbn10(&sanitized) || is_isbn13(&sanitized),
    }
}

fn is_isbn10(value: &str) -> bool {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() != 10 {
        return false;
    }

    let mut checksum = 0;
    for (index, c) in chars.iter().enumerate() {
        let digit = match (index, c) {
            (9, 'X') | (9, 'x') => 10,
            _ => match c.to_digit(10) {
                Some(digit) => digit,
                None => return false,
            },
        };
        checksum += (10 - index as u32) * digit;
    }
    checksum % 11 == 0
}

fn is_isbn13(value: &str) -> bool {
    if value.len() != 13 {
        return false;
    }
    let Some(digits) = value
        .chars()
        .map(|c| c.to_digit(10))
        .collect::<Option<Vec<u32>>>()
    else {
        return false;
    };

    let checksum: u32 = digits
        .iter()
        .enumerate()
        .map(|(index, digit)| if index % 2 == 0 { *digit } else { digit * 3 })
        .sum();
    checksum % 10 == 0
}

/// International Standard Serial Number with its mod-11 check digit
pub fn is_issn(value: &str) -> bool {
    if !ISSN_REGEX.is_match(value) {
        return false;
    }

    let digits: Vec<char> = value.chars().filter(|c| *c != '-').collect();
    let checksum: u32 = digits
        .iter()
        .enumerate()
        .map(|(index, c)| {
            let digit = match c {
                'X' | 'x' => 10,
                _ => c.to_digit(10).unwrap_or(0),
            };
            digit * (8 - index as u32)
        })
        .sum();
    checksum % 11 == 0
}

/// International Securities Identification Number with its Luhn check digit
pub fn is_isin(value: &str) -> bool {
    if !ISIN_REGEX.is_match(value) {
        return false;
    }

    // Letters expand to two digits (A = 10 .. Z = 35) before the Luhn pass.
    let mut digits = Vec::with_capacity(value.len() * 2);
    for c in value.chars() {
        let Some(number) = c.to_digit(36) else {
            return false;
        };
        if number >= 10 {
            digits.push(number / 10);
            digits.push(number % 10);
        } else {
            digits.push(number);
        }
    }
    luhn_valid(&digits)
}

/// International Standard Recording Code
pub fn is_isrc(value: &str) -> bool {
    ISRC_REGEX.is_match(value)
}

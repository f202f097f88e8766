//! # elif-form-primitives
//!
//! Pure string predicates (`is_*`) and transforms (`to_*`, trim, escape) used by
//! the elif-form field pipelines. Every function here is side-effect free and
//! operates on `&str`; callers coerce non-string input before calling in.

pub mod dates;
pub mod identifiers;
pub mod network;
pub mod numeric;
pub mod strings;

pub use dates::{is_after, is_before, is_date, is_iso8601, parse_date, to_date};
pub use identifiers::{
    is_base64, is_credit_card, is_hash, is_hex_color, is_isbn, is_isin, is_isrc, is_issn,
    is_json, is_md5, is_mongo_id, is_uuid, HashAlgorithm,
};
pub use network::{
    is_data_uri, is_email, is_fqdn, is_ip, is_mac_address, is_mime_type, is_url, FqdnOptions,
    UrlOptions,
};
pub use numeric::{
    is_boolean, is_decimal, is_divisible_by, is_float, is_hexadecimal, is_int, is_lat_long,
    is_numeric, is_port, to_boolean, to_float, to_int, FloatOptions, IntOptions,
};
pub use strings::{
    blacklist, contains, escape, is_alpha, is_alphanumeric, is_ascii, is_byte_length, is_empty,
    is_full_width, is_half_width, is_in, is_length, is_lowercase, is_multibyte,
    is_surrogate_pair, is_uppercase, is_variable_width, is_whitelisted, ltrim,
    normalize_email, rtrim, sanitize_html, strip_low, trim, unescape, whitelist,
};

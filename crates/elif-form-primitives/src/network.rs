//! Email, URL, host and address predicates

use once_cell::sync::Lazy;
use regex::Regex;
use std::net::{Ipv4Addr, Ipv6Addr};

static EMAIL_LOCAL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+$").unwrap());

static FQDN_LABEL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z\x{00a1}-\x{ffff}0-9-]+$").unwrap());

static FQDN_LABEL_UNDERSCORE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z\x{00a1}-\x{ffff}0-9_-]+$").unwrap());

static TLD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i:[a-z\x{00a1}-\x{ffff}]{2,}|xn[a-z0-9-]{2,})$").unwrap()
});

static MAC_COLON_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9a-fA-F]{2}(?::[0-9a-fA-F]{2}){5}$").unwrap());

static MAC_HYPHEN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9a-fA-F]{2}(?:-[0-9a-fA-F]{2}){5}$").unwrap());

static MAC_BARE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9a-fA-F]{12}$").unwrap());

static DATA_URI_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^data:([a-z]+/[a-z0-9.+-]+(;[a-z-]+=[a-z0-9.-]+)*)?(;base64)?,[a-z0-9!$&',()*+;=._~:@/?%\s-]*$",
    )
    .unwrap()
});

static MIME_TYPE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(application|audio|font|image|message|model|multipart|text|video)/[a-z0-9.+_-]{1,100}(;\s*[a-z0-9-]+=[a-z0-9.+_-]+)*$",
    )
    .unwrap()
});

/// Options for [`is_fqdn`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FqdnOptions {
    pub require_tld: bool,
    pub allow_underscores: bool,
    pub allow_trailing_dot: bool,
}

impl Default for FqdnOptions {
    fn default() -> Self {
        Self {
            require_tld: true,
            allow_underscores: false,
            allow_trailing_dot: false,
        }
    }
}

/// Options for [`is_url`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlOptions {
    pub protocols: Vec<String>,
    pub require_protocol: bool,
    pub require_tld: bool,
}

impl Default for UrlOptions {
    fn default() -> Self {
        Self {
            protocols: vec!["http".to_string(), "https".to_string(), "ftp".to_string()],
            require_protocol: false,
            require_tld: true,
        }
    }
}

/// Email address with a dotted domain
pub fn is_email(value: &str) -> bool {
    if value.is_empty() || value.len() > 254 {
        return false;
    }

    let Some((local, domain)) = value.rsplit_once('@') else {
        return false;
    };

    // Local part (RFC 5321 limit of 64 octets)
    if local.is_empty() || local.len() > 64 {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    if !EMAIL_LOCAL_REGEX.is_match(local) {
        return false;
    }

    is_fqdn(domain, &FqdnOptions::default())
}

/// Fully qualified domain name
pub fn is_fqdn(value: &str, options: &FqdnOptions) -> bool {
    let host = if options.allow_trailing_dot {
        value.strip_suffix('.').unwrap_or(value)
    } else {
        value
    };

    if host.is_empty() || host.len() > 253 {
        return false;
    }

    let labels: Vec<&str> = host.split('.').collect();

    if options.require_tld {
        if labels.len() < 2 {
            return false;
        }
        match labels.last() {
            Some(tld) if TLD_REGEX.is_match(tld) => {}
            _ => return false,
        }
    }

    let label_regex = if options.allow_underscores {
        &*FQDN_LABEL_UNDERSCORE_REGEX
    } else {
        &*FQDN_LABEL_REGEX
    };

    labels.iter().all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && label_regex.is_match(label)
            && !label.starts_with('-')
            && !label.ends_with('-')
    })
}

/// URL whose scheme is one of the allowed protocols and whose host is a
/// domain or IP literal. The scheme may be omitted unless `require_protocol`.
pub fn is_url(value: &str, options: &UrlOptions) -> bool {
    if value.is_empty() || value.len() >= 2083 || value.chars().any(char::is_whitespace) {
        return false;
    }

    let candidate = if value.contains("://") {
        value.to_string()
    } else if options.require_protocol {
        return false;
    } else {
        format!("http://{}", value.trim_start_matches("//"))
    };

    let Ok(parsed) = url::Url::parse(&candidate) else {
        return false;
    };

    if !options
        .protocols
        .iter()
        .any(|protocol| protocol.eq_ignore_ascii_case(parsed.scheme()))
    {
        return false;
    }

    match parsed.host() {
        Some(url::Host::Domain(domain)) => is_fqdn(
            domain,
            &FqdnOptions {
                require_tld: options.require_tld,
                allow_underscores: false,
                allow_trailing_dot: true,
            },
        ),
        Some(url::Host::Ipv4(_)) | Some(url::Host::Ipv6(_)) => true,
        None => false,
    }
}

/// IP address; `version` restricts to 4 or 6
pub fn is_ip(value: &str, version: Option<u8>) -> bool {
    match version {
        Some(4) => value.parse::<Ipv4Addr>().is_ok(),
        Some(6) => value.parse::<Ipv6Addr>().is_ok(),
        Some(_) => false,
        None => value.parse::<Ipv4Addr>().is_ok() || value.parse::<Ipv6Addr>().is_ok(),
    }
}

pub fn is_mac_address(value: &str) -> bool {
    MAC_COLON_REGEX.is_match(value) || MAC_HYPHEN_REGEX.is_match(value) || MAC_BARE_REGEX.is_match(value)
}

pub fn is_data_uri(value: &str) -> bool {
    DATA_URI_REGEX.is_match(value)
}

pub fn is_mime_type(value: &str) -> bool {
    MIME_TYPE_REGEX.is_match(value)
}

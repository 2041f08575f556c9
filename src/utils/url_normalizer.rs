//! URL normalization and validation.
//!
//! Normalization is intentionally light: surrounding whitespace is trimmed and
//! `https://` is prepended when the input has no scheme. The result is stored
//! verbatim; the parsed [`Url`] is only used to decide whether the string is
//! well-formed.

use url::{Host, Url};

/// Scheme assumed for inputs such as `example.com/page`.
pub const DEFAULT_SCHEME_PREFIX: &str = "https://";

/// Errors that can occur during URL normalization.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("URL is empty")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL has no host")]
    MissingHost,

    #[error("Invalid host: {0}")]
    InvalidHost(String),
}

/// Trims, defaults the scheme and validates a user supplied URL.
///
/// # Rules
///
/// 1. Leading and trailing whitespace is removed; an empty result is rejected
/// 2. Input without a `<scheme>:` prefix gets `https://` prepended
/// 3. The result must parse as an absolute URL
/// 4. Only `http` and `https` are accepted
/// 5. The host must be an IP address, `localhost`, or a dotted domain name
///
/// # Errors
///
/// Returns [`UrlNormalizationError::Empty`] for blank input and one of the
/// other variants when the normalized string is not a usable web URL.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_url("  example.com ").unwrap(), "https://example.com");
/// assert_eq!(normalize_url("http://example.com/a").unwrap(), "http://example.com/a");
/// assert!(normalize_url("not a url").is_err());
/// ```
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlNormalizationError::Empty);
    }

    let normalized = if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("{DEFAULT_SCHEME_PREFIX}{trimmed}")
    };

    validate_url(&normalized)?;

    Ok(normalized)
}

/// Returns true if `input` starts with `<scheme>:`.
///
/// A scheme is an ASCII letter followed by letters, digits, `+`, `-` or `.`.
/// A colon followed by a digit is read as a port, so `localhost:3000/x` and
/// `example.com:8080` have no scheme while `mailto:a@b.com` does.
pub fn has_scheme(input: &str) -> bool {
    let Some((scheme, rest)) = input.split_once(':') else {
        return false;
    };

    if rest.starts_with(|c: char| c.is_ascii_digit()) {
        return false;
    }

    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn validate_url(candidate: &str) -> Result<(), UrlNormalizationError> {
    let url =
        Url::parse(candidate).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlNormalizationError::UnsupportedProtocol),
    }

    match url.host() {
        None => Err(UrlNormalizationError::MissingHost),
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => Ok(()),
        Some(Host::Domain(domain)) if is_plausible_domain(domain) => Ok(()),
        Some(Host::Domain(domain)) => Err(UrlNormalizationError::InvalidHost(domain.to_string())),
    }
}

/// Accepts `localhost` and names like `example.com` or `xn--mnchen-3ya.de`.
fn is_plausible_domain(domain: &str) -> bool {
    let domain = domain.strip_suffix('.').unwrap_or(domain);
    if domain.eq_ignore_ascii_case("localhost") {
        return true;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let labels_ok = labels.iter().all(|label| {
        !label.is_empty() && label.len() <= 63 && !label.starts_with('-') && !label.ends_with('-')
    });
    if !labels_ok {
        return false;
    }

    let tld = labels[labels.len() - 1];
    tld.len() >= 2 && (tld.chars().all(|c| c.is_ascii_alphabetic()) || tld.starts_with("xn--"))
}

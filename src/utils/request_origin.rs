//! Public origin derivation from HTTP request metadata.
//!
//! The origin is not persisted; every response that shows a short URL
//! recomputes it from the request being served.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, Uri, header, request::Parts};

use crate::state::AppState;

const FORWARDED_PROTO: &str = "x-forwarded-proto";
const FORWARDED_HOST: &str = "x-forwarded-host";

/// Origin (`scheme://host[:port]`) the current request was served under.
///
/// Extracting it never fails: when the request carries no usable host the
/// configured public URL is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOrigin(pub String);

impl RequestOrigin {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromRequestParts<AppState> for RequestOrigin {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(resolve_origin(
            &parts.headers,
            &parts.uri,
            state.behind_proxy,
            &state.public_url,
        )))
    }
}

/// Derives the origin of a request.
///
/// Host priority:
/// 1. `X-Forwarded-Host` (only when `behind_proxy`)
/// 2. `Host` header, port preserved
/// 3. Authority of an absolute request URI
/// 4. `fallback`
///
/// Scheme is `X-Forwarded-Proto` when `behind_proxy`, else the URI scheme, else `http`.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert(header::HOST, "s.example.com:8080".parse().unwrap());
///
/// let origin = resolve_origin(&headers, &Uri::from_static("/"), false, "http://localhost:3000");
/// assert_eq!(origin, "http://s.example.com:8080");
/// ```
pub fn resolve_origin(headers: &HeaderMap, uri: &Uri, behind_proxy: bool, fallback: &str) -> String {
    let forwarded_host = if behind_proxy {
        first_header_value(headers, FORWARDED_HOST)
    } else {
        None
    };

    let host = forwarded_host
        .or_else(|| first_header_value(headers, header::HOST.as_str()))
        .or_else(|| {
            uri.authority()
                .and_then(|authority| authority.as_str().rsplit('@').next())
                .map(str::to_string)
        })
        .filter(|host| is_valid_host(host));

    let Some(host) = host else {
        return fallback.trim_end_matches('/').to_string();
    };

    let forwarded_proto = if behind_proxy {
        first_header_value(headers, FORWARDED_PROTO)
    } else {
        None
    };

    let scheme = forwarded_proto
        .map(|proto| proto.to_ascii_lowercase())
        .filter(|proto| proto == "http" || proto == "https")
        .or_else(|| uri.scheme_str().map(str::to_string))
        .unwrap_or_else(|| "http".to_string());

    format!("{scheme}://{host}")
}

/// First entry of a possibly comma separated header.
fn first_header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)?
        .to_str()
        .ok()?
        .split(',')
        .next()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Hostnames, IPv4, bracketed IPv6, each with an optional port.
fn is_valid_host(host: &str) -> bool {
    !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ':' | '[' | ']'))
}

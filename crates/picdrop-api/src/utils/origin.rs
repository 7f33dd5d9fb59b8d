//! Public origin of the current request, used for absolute upload links

use axum::http::{header, HeaderMap, Uri};
use picdrop_core::Config;

const FORWARDED_PROTO: &str = "x-forwarded-proto";
const FORWARDED_HOST: &str = "x-forwarded-host";

fn first_header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// `{scheme}://{host}` of the request.
///
/// `PUBLIC_BASE_URL` wins when configured. Forwarded headers are only read when
/// the proxy is trusted.
pub fn request_base_url(headers: &HeaderMap, uri: &Uri, config: &Config) -> String {
    if let Some(base) = config.public_base_url() {
        return base.trim_end_matches('/').to_string();
    }

    let forwarded = |name: &str| {
        if config.trust_proxy() {
            first_header_value(headers, name)
        } else {
            None
        }
    };

    let scheme = forwarded(FORWARDED_PROTO)
        .or_else(|| uri.scheme_str())
        .unwrap_or("http");

    let host = forwarded(FORWARDED_HOST)
        .or_else(|| first_header_value(headers, header::HOST.as_str()))
        .or_else(|| uri.authority().map(|a| a.as_str()))
        .unwrap_or("localhost");

    format!("{}://{}", scheme, host)
}

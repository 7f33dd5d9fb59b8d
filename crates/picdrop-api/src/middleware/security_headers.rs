use axum::http::{header, HeaderValue};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Security headers configuration
#[derive(Clone)]
pub struct SecurityHeadersConfig {
    pub is_production: bool,
}

impl SecurityHeadersConfig {
    pub fn new(is_production: bool) -> Self {
        Self { is_production }
    }

    /// Content-Security-Policy for the upload page and the served images
    fn build_csp(&self) -> String {
        [
            "default-src 'self'",
            "img-src 'self' data:",
            "style-src 'self'",
            "form-action 'self'",
            "frame-ancestors 'none'",
        ]
        .join("; ")
    }
}

/// Security headers middleware
/// Adds security headers to all HTTP responses
pub async fn security_headers_middleware(
    State(config): State<Arc<SecurityHeadersConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();

    // Stored files are served with the extension's content type only
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );

    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));

    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    if config.is_production {
        headers.insert(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        );
    }

    if let Ok(header_value) = HeaderValue::from_str(&config.build_csp()) {
        headers.insert(header::CONTENT_SECURITY_POLICY, header_value);
    }

    // File responses set their own long-lived caching
    if !headers.contains_key(header::CACHE_CONTROL) {
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    }

    response
}

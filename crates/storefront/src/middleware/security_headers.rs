//! Response headers for the storefront: isolation, CSP and caching.
//!
//! Pages are server-rendered from the session cart and the live release
//! state, so they are never cached. Files under `/static` are.

use axum::{
    extract::Request,
    http::{
        HeaderName, HeaderValue,
        header::{
            CACHE_CONTROL, CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
            X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};

/// Product images and hero videos come from the Sanity CDN. The countdown
/// stream and the cart badge are fetched from this origin.
const CONTENT_SECURITY_POLICY_VALUE: &str = "default-src 'none'; \
     script-src 'self'; \
     style-src 'self'; \
     font-src 'self'; \
     img-src 'self' https://cdn.sanity.io; \
     media-src 'self' https://cdn.sanity.io; \
     connect-src 'self'; \
     object-src 'none'; \
     base-uri 'self'; \
     form-action 'self'; \
     frame-ancestors 'none'; \
     upgrade-insecure-requests";

const PERMISSIONS_POLICY_VALUE: &str = "camera=(), geolocation=(), microphone=(), \
     payment=(), usb=(), browsing-topics=(), interest-cohort=()";

const PAGE_CACHE_CONTROL: &str = "no-store, max-age=0";
const STATIC_CACHE_CONTROL: &str = "public, max-age=3600";

/// Headers set on every response.
const SECURITY_HEADERS: [(HeaderName, &str); 9] = [
    (X_FRAME_OPTIONS, "DENY"),
    (X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (REFERRER_POLICY, "no-referrer"),
    (CONTENT_SECURITY_POLICY, CONTENT_SECURITY_POLICY_VALUE),
    (
        HeaderName::from_static("permissions-policy"),
        PERMISSIONS_POLICY_VALUE,
    ),
    (
        HeaderName::from_static("cross-origin-opener-policy"),
        "same-origin",
    ),
    (
        HeaderName::from_static("cross-origin-resource-policy"),
        "same-origin",
    ),
    // Sanity's CDN sends no CORP header.
    (
        HeaderName::from_static("cross-origin-embedder-policy"),
        "credentialless",
    ),
    (HeaderName::from_static("x-dns-prefetch-control"), "off"),
];

/// Add the storefront's security and caching headers to every response.
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let cache_control = cache_control_for(request.uri().path());

    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    for (name, value) in SECURITY_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(cache_control));

    response
}

fn cache_control_for(path: &str) -> &'static str {
    if path.starts_with("/static/") {
        STATIC_CACHE_CONTROL
    } else {
        PAGE_CACHE_CONTROL
    }
}

//! # Security Headers and CORS Middleware
//!
//! Hardening headers for every response plus a minimal single-origin CORS
//! layer driven by `PRAXIS_CORS_ORIGIN`.

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Adds standard security headers to every response.
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    insert_header(
        headers,
        "Content-Security-Policy",
        "default-src 'none'; frame-ancestors 'none'",
    );
    insert_header(headers, "X-Frame-Options", "DENY");
    insert_header(headers, "X-Content-Type-Options", "nosniff");
    insert_header(
        headers,
        "Referrer-Policy",
        "strict-origin-when-cross-origin",
    );
    insert_header(
        headers,
        "Cache-Control",
        "no-store, no-cache, must-revalidate, private",
    );

    response
}

/// CORS middleware for a single configured origin.
///
/// Handles preflight (OPTIONS) requests and mirrors the origin back only
/// when it matches the configuration.
pub async fn cors_middleware(request: Request, next: Next, allowed_origin: Option<String>) -> Response {
    let Some(allowed) = allowed_origin else {
        return next.run(request).await;
    };

    let origin = request
        .headers()
        .get("Origin")
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);

    let origin_allowed = origin
        .as_deref()
        .map(|o| allowed == "*" || o == allowed)
        .unwrap_or(false);

    if request.method() == Method::OPTIONS {
        if !origin_allowed {
            return StatusCode::NO_CONTENT.into_response();
        }
        let mut response = (StatusCode::NO_CONTENT, Body::empty()).into_response();
        let headers = response.headers_mut();
        if let Some(ref o) = origin {
            insert_header(headers, "Access-Control-Allow-Origin", o);
        }
        insert_header(
            headers,
            "Access-Control-Allow-Methods",
            "GET, POST, PATCH, DELETE, OPTIONS",
        );
        insert_header(
            headers,
            "Access-Control-Allow-Headers",
            "Authorization, Content-Type",
        );
        insert_header(headers, "Access-Control-Max-Age", "600");
        return response;
    }

    let mut response = next.run(request).await;
    if origin_allowed {
        if let Some(ref o) = origin {
            insert_header(response.headers_mut(), "Access-Control-Allow-Origin", o);
        }
    }
    response
}

fn insert_header(headers: &mut axum::http::HeaderMap, name: &'static str, value: &str) {
    if let Ok(value) = HeaderValue::from_str(value) {
        headers.insert(name, value);
    }
}

#[cfg(test)]
mod tests {
    use axum::{middleware, routing::get, Router};
    use tower::ServiceExt;

    use super::*;

    fn app(origin: Option<String>) -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(middleware::from_fn(move |req, next| {
                cors_middleware(req, next, origin.clone())
            }))
            .layer(middleware::from_fn(security_headers_middleware))
    }

    #[tokio::test]
    async fn test_security_headers_present() {
        let response = app(None)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(
            response.headers().get("X-Frame-Options").unwrap(),
            "DENY"
        );
        assert_eq!(
            response.headers().get("X-Content-Type-Options").unwrap(),
            "nosniff"
        );
    }

    #[tokio::test]
    async fn test_cors_mirrors_allowed_origin() {
        let response = app(Some("https://app.example.com".to_string()))
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("Origin", "https://app.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response
                .headers()
                .get("Access-Control-Allow-Origin")
                .unwrap(),
            "https://app.example.com"
        );
    }

    #[tokio::test]
    async fn test_cors_ignores_unknown_origin() {
        let response = app(Some("https://app.example.com".to_string()))
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("Origin", "https://evil.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response
            .headers()
            .get("Access-Control-Allow-Origin")
            .is_none());
    }
}

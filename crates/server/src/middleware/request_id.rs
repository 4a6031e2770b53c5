//! # Request ID Middleware
//!
//! Tags every request with a [`RequestId`], records it on the request span
//! and echoes it back in the `x-request-id` header.

use std::time::Instant;

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use logging::{log_api_request, request_id::REQUEST_ID_HEADER, RequestId};
use tracing::Instrument;

/// Request id middleware.
///
/// A well-formed incoming `x-request-id` is kept so ids can be traced across
/// services; anything else is replaced with a fresh one.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let incoming = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok());
    let request_id = RequestId::from_header_or_new(incoming);

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    request.extensions_mut().insert(request_id.clone());

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %path,
        user_id = tracing::field::Empty
    );
    let started = Instant::now();
    let mut response = next.run(request).instrument(span).await;

    log_api_request!(
        request_id,
        method,
        path,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );

    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request as HttpRequest, middleware, routing::get, Router};
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        Router::new()
            .route("/ping", get(|| async { "pong" }))
            .layer(middleware::from_fn(request_id_middleware))
    }

    #[tokio::test]
    async fn test_response_carries_new_request_id() {
        let response = app()
            .oneshot(HttpRequest::get("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let id = response.headers().get(REQUEST_ID_HEADER).unwrap();
        assert!(!id.is_empty());
    }

    #[tokio::test]
    async fn test_valid_incoming_id_is_kept() {
        let response = app()
            .oneshot(
                HttpRequest::get("/ping")
                    .header(REQUEST_ID_HEADER, "abcdef0123456789abcd")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(REQUEST_ID_HEADER).unwrap(),
            "abcdef0123456789abcd"
        );
    }
}

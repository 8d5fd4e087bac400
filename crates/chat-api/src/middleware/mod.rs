//! Middleware stack for the API server
//!
//! Request IDs, tracing, timeouts and CORS.

use axum::{
    body::Body,
    http::{header, HeaderValue, Method, Request, StatusCode},
    Router,
};
use chat_common::CorsConfig;
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Header name for request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Requests taking longer than this get 503
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Apply the middleware stack with configured CORS
pub fn apply_middleware<S>(router: Router<S>, cors: &CorsConfig, is_production: bool) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    // Layers wrap outward: request id runs first, CORS last
    router
        .layer(create_cors_layer(cors, is_production))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::SERVICE_UNAVAILABLE,
            REQUEST_TIMEOUT,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get(REQUEST_ID_HEADER)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("unknown");

                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id,
                    )
                })
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(PropagateRequestIdLayer::new(header::HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        .layer(SetRequestIdLayer::new(
            header::HeaderName::from_static(REQUEST_ID_HEADER),
            MakeRequestUuid,
        ))
}

/// Create CORS layer from configuration
///
/// An empty origin list allows any origin outside production.
fn create_cors_layer(config: &CorsConfig, is_production: bool) -> CorsLayer {
    let base_layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([header::HeaderName::from_static(REQUEST_ID_HEADER)]);

    if config.allowed_origins.is_empty() {
        if is_production {
            tracing::warn!("CORS: No allowed origins configured in production mode");
            return base_layer.allow_origin(AllowOrigin::list(Vec::<HeaderValue>::new()));
        }
        tracing::warn!("CORS: Allowing any origin (development mode)");
        return base_layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    tracing::info!("CORS: Allowing {} configured origins", origins.len());
    base_layer.allow_origin(AllowOrigin::list(origins))
}

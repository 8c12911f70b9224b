use crate::api::cors::{CorsPolicy, apply_cors};
use crate::api::rate_limit::log_rate_limit_events;
use crate::config::Config;
use crate::services::feedback_service::FeedbackService;
use crate::services::health_service::HealthService;
use crate::services::rate_limit_service::RateLimitService;
use axum::body::Body;
use axum::http::Request;
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Duration;
use tower_governor::GovernorLayer;
use tower_governor::governor::GovernorConfigBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub mod callable;
pub mod cors;
pub mod feedback;
pub mod health;
pub mod middleware;
pub mod rate_limit;
pub mod schemas;

const FEEDBACK_ALLOWED_HEADERS: &str = "Content-Type";
const CALLABLE_ALLOWED_HEADERS: &str = "Content-Type, Authorization";

#[derive(Clone, Debug)]
pub struct AppState {
    pub feedback_service: FeedbackService,
    pub rate_limit_service: RateLimitService,
}

#[derive(Clone, Debug)]
pub struct MgmtState {
    pub health_service: HealthService,
}

#[derive(Debug)]
pub struct ServiceContainer {
    pub feedback_service: FeedbackService,
    pub rate_limit_service: RateLimitService,
}

/// Configures and returns the public API router.
///
/// # Errors
/// Returns an error if the rate limiter configuration cannot be constructed.
pub fn app_router(config: &Config, services: ServiceContainer) -> anyhow::Result<Router> {
    let interval_ns = 1_000_000_000 / config.rate_limit.per_second.max(1);
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_nanosecond(u64::from(interval_ns))
            .burst_size(config.rate_limit.burst.max(1))
            .key_extractor(services.rate_limit_service.extractor.clone())
            .finish()
            .ok_or_else(|| anyhow::anyhow!("invalid rate limiter configuration"))?,
    );

    let state =
        AppState { feedback_service: services.feedback_service, rate_limit_service: services.rate_limit_service };

    let origins = &config.cors.allowed_origins;

    // Only POST spends tokens; preflights stay free. CORS wraps everything so
    // throttled responses stay readable by the browser.
    let feedback_routes = Router::new()
        .route(
            "/feedback",
            post(feedback::submit_feedback)
                .layer(GovernorLayer::new(Arc::clone(&governor_conf)))
                .options(feedback::preflight)
                .fallback(feedback::method_not_allowed),
        )
        .layer(from_fn_with_state(CorsPolicy::new(origins, FEEDBACK_ALLOWED_HEADERS), apply_cors));

    let callable_routes = Router::new()
        .route(
            "/callable/submitFeedback",
            post(callable::submit_feedback)
                .layer(GovernorLayer::new(governor_conf))
                .options(feedback::preflight)
                .fallback(feedback::method_not_allowed),
        )
        .layer(from_fn_with_state(CorsPolicy::new(origins, CALLABLE_ALLOWED_HEADERS), apply_cors));

    #[allow(deprecated)]
    let timeout = TimeoutLayer::new(Duration::from_secs(config.server.request_timeout_secs));

    let router = Router::new()
        .nest("/v1", feedback_routes.merge(callable_routes))
        .layer(timeout)
        .layer(from_fn_with_state(state.clone(), log_rate_limit_events))
        .layer(PropagateRequestIdLayer::new(axum::http::HeaderName::from_static("x-request-id")))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(move |request: &Request<Body>| {
                    let request_id = request
                        .extensions()
                        .get::<tower_http::request_id::RequestId>()
                        .map(|id| id.header_value().to_str().unwrap_or_default())
                        .unwrap_or_default()
                        .to_string();

                    tracing::info_span!(
                        "request",
                        "request_id" = %request_id,
                        "http.request.method" = %request.method(),
                        "url.path" = %request.uri().path(),
                        "http.response.status_code" = tracing::field::Empty,
                        "otel.kind" = "server",
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, _span: &tracing::Span| {
                        let status = response.status();
                        tracing::Span::current().record("http.response.status_code", status.as_u16());

                        tracing::info!(
                            latency_ms = %latency.as_millis(),
                            status = %status.as_u16(),
                            "request completed"
                        );
                    },
                )
                .on_failure(|error, _latency, _span: &tracing::Span| {
                    tracing::error!(error = %error, "request failed");
                }),
        )
        .layer(SetRequestIdLayer::new(
            axum::http::HeaderName::from_static("x-request-id"),
            middleware::MakeRequestUuid,
        ))
        .with_state(state);

    Ok(router)
}

pub fn mgmt_router(state: MgmtState) -> Router {
    Router::new().route("/livez", get(health::livez)).route("/readyz", get(health::readyz)).with_state(state)
}

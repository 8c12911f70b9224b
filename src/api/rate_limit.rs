use crate::api::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// Records every rate limit decision made by the governor layer beneath it.
pub async fn log_rate_limit_events(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let response = next.run(request).await;

    let ratelimit_after = response.headers().get("x-ratelimit-after").and_then(|v| v.to_str().ok());
    state.rate_limit_service.log_decision(response.status(), ratelimit_after);

    response
}

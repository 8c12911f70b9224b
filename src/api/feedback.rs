use crate::api::AppState;
use crate::api::schemas::feedback::{FeedbackRequest, FeedbackResponse};
use crate::error::{AppError, Result};
use axum::{Json, body::Bytes, extract::State, http::StatusCode};

/// Relays a feedback submission posted by a browser client.
///
/// The body is read leniently: anything that is not a JSON feedback object is
/// treated as an empty submission and rejected by validation.
///
/// # Errors
/// Returns `AppError::Relay` carrying the reason the submission was not relayed.
pub async fn submit_feedback(State(state): State<AppState>, body: Bytes) -> Result<Json<FeedbackResponse>> {
    let request: FeedbackRequest = if body.is_empty() {
        FeedbackRequest::default()
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Unparseable feedback body, treating as empty");
            FeedbackRequest::default()
        })
    };

    state.feedback_service.submit(request.into()).await?;

    Ok(Json(FeedbackResponse::success()))
}

/// CORS preflight. Headers are added by the CORS middleware.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

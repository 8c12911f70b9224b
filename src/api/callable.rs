use crate::api::AppState;
use crate::api::schemas::callable::{
    CallableCode, CallableErrorBody, CallableErrorDetail, CallableRequest, CallableResponse, FeedbackAck,
};
use crate::api::schemas::feedback::FeedbackRequest;
use crate::error::RelayError;
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(Debug)]
pub struct CallableError {
    pub code: CallableCode,
    pub message: String,
}

impl CallableError {
    fn new(code: CallableCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

impl From<RelayError> for CallableError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::ShortMessage => Self::new(CallableCode::InvalidArgument, "Message too short"),
            RelayError::MissingCredentials => {
                Self::new(CallableCode::FailedPrecondition, "Email delivery is not configured")
            }
            RelayError::SendFailed => Self::new(CallableCode::Internal, "Failed to send feedback"),
        }
    }
}

impl IntoResponse for CallableError {
    fn into_response(self) -> Response {
        let status = match self.code {
            CallableCode::InvalidArgument => {
                tracing::debug!(message = %self.message, "Callable rejected");
                StatusCode::BAD_REQUEST
            }
            CallableCode::FailedPrecondition => {
                tracing::error!(message = %self.message, "Callable precondition failed");
                StatusCode::BAD_REQUEST
            }
            CallableCode::Internal => {
                tracing::error!(message = %self.message, "Callable failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = CallableErrorBody { error: CallableErrorDetail { status: self.code, message: self.message } };
        (status, Json(body)).into_response()
    }
}

/// Callable RPC variant of the feedback endpoint.
///
/// # Errors
/// Returns `CallableError` with `INVALID_ARGUMENT` for a malformed envelope or a short
/// message, `FAILED_PRECONDITION` when delivery is unconfigured and `INTERNAL` when the
/// provider fails.
pub async fn submit_feedback(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CallableResponse<FeedbackAck>>, CallableError> {
    let request: CallableRequest<FeedbackRequest> = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(error = %e, "Malformed callable envelope");
        CallableError::new(CallableCode::InvalidArgument, "Bad Request")
    })?;

    state.feedback_service.submit(request.data.into()).await?;

    Ok(Json(CallableResponse { result: FeedbackAck { ok: true } }))
}

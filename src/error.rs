use crate::api::schemas::feedback::FeedbackResponse;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Failure outcomes of a single feedback submission.
///
/// Every variant is terminal for the request. The relay never retries.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayError {
    #[error("Message must be at least 10 characters long")]
    ShortMessage,
    #[error("Email provider API key is not configured")]
    MissingCredentials,
    #[error("Failed to send feedback email")]
    SendFailed,
}

impl RelayError {
    /// Stable machine-readable code returned by the HTTP entry point.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ShortMessage => "short_message",
            Self::MissingCredentials => "missing_resend_api_key",
            Self::SendFailed => "send_failed",
        }
    }

    /// Label used for the submissions counter.
    #[must_use]
    pub const fn outcome(self) -> &'static str {
        match self {
            Self::ShortMessage => "short_message",
            Self::MissingCredentials => "missing_credentials",
            Self::SendFailed => "send_failed",
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Relay(#[from] RelayError),
    #[error("Method not allowed")]
    MethodNotAllowed,
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Relay(e) => e.code(),
            Self::MethodNotAllowed => "method_not_allowed",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Relay(RelayError::ShortMessage) => {
                tracing::debug!("Rejected feedback with short message");
                StatusCode::BAD_REQUEST
            }
            Self::Relay(RelayError::MissingCredentials) => {
                tracing::error!("Email provider API key is not configured");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Relay(RelayError::SendFailed) => {
                tracing::error!("Feedback delivery failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::MethodNotAllowed => {
                tracing::debug!("Method not allowed");
                StatusCode::METHOD_NOT_ALLOWED
            }
        };

        (status, Json(FeedbackResponse::failure(self.code()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::from(RelayError::ShortMessage), StatusCode::BAD_REQUEST),
            (AppError::from(RelayError::MissingCredentials), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::from(RelayError::SendFailed), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::MethodNotAllowed, StatusCode::METHOD_NOT_ALLOWED),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_wire_codes() {
        assert_eq!(RelayError::ShortMessage.code(), "short_message");
        assert_eq!(RelayError::MissingCredentials.code(), "missing_resend_api_key");
        assert_eq!(RelayError::SendFailed.code(), "send_failed");
        assert_eq!(AppError::MethodNotAllowed.code(), "method_not_allowed");
    }
}

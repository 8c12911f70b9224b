use serde::{Deserialize, Serialize};

/// Request envelope used by callable RPC clients.
#[derive(Debug, Deserialize)]
pub struct CallableRequest<T> {
    pub data: T,
}

/// Success envelope used by callable RPC clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct CallableResponse<T> {
    pub result: T,
}

/// Canonical status names; client SDKs map them to their own error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CallableCode {
    InvalidArgument,
    FailedPrecondition,
    Internal,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CallableErrorBody {
    pub error: CallableErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CallableErrorDetail {
    pub status: CallableCode,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FeedbackAck {
    pub ok: bool,
}

use crate::domain::feedback::FeedbackSubmission;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Feedback fields as sent by clients.
///
/// A field with the wrong JSON type is read as absent, so one bad optional
/// value never discards the rest of the submission.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    #[serde(default, deserialize_with = "lenient")]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub user_email: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub user_agent: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub timestamp: Option<i64>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl From<FeedbackRequest> for FeedbackSubmission {
    fn from(request: FeedbackRequest) -> Self {
        Self {
            subject: request.subject,
            message: request.message,
            sender_email: request.user_email,
            user_agent: request.user_agent,
            timestamp_ms: request.timestamp,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedbackResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FeedbackResponse {
    #[must_use]
    pub const fn success() -> Self {
        Self { ok: true, error: None }
    }

    #[must_use]
    pub fn failure(code: &str) -> Self {
        Self { ok: false, error: Some(code.to_string()) }
    }
}

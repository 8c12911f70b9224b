use crate::error::RelayError;
use time::OffsetDateTime;

pub const DEFAULT_SUBJECT: &str = "Feedback";
pub const ANONYMOUS_SENDER: &str = "anon@smarthome.local";
pub const MIN_MESSAGE_CHARS: usize = 10;
pub const SUBJECT_PREFIX: &str = "[Smarthome Feedback] ";

/// A feedback submission exactly as the caller sent it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackSubmission {
    pub subject: Option<String>,
    pub message: Option<String>,
    pub sender_email: Option<String>,
    pub user_agent: Option<String>,
    /// Epoch milliseconds as reported by the client.
    pub timestamp_ms: Option<i64>,
}

/// A validated submission with every default resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub subject: String,
    pub message: String,
    pub sender_email: String,
    pub user_agent: String,
    pub submitted_at: OffsetDateTime,
}

impl FeedbackSubmission {
    /// Checks the message length and fills in defaults.
    ///
    /// `received_at` stands in for the submission time when the client did not
    /// send one, or sent one that cannot be represented as a calendar date.
    ///
    /// # Errors
    /// Returns `RelayError::ShortMessage` if the message is missing or shorter
    /// than ten characters after trimming.
    pub fn validate(self, received_at: OffsetDateTime) -> Result<Feedback, RelayError> {
        let message = self.message.as_deref().map(str::trim).unwrap_or_default();
        if message.chars().count() < MIN_MESSAGE_CHARS {
            return Err(RelayError::ShortMessage);
        }

        let submitted_at = self.timestamp_ms.and_then(from_epoch_millis).unwrap_or(received_at);

        Ok(Feedback {
            subject: non_blank(self.subject).unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
            message: message.to_string(),
            sender_email: non_blank(self.sender_email).unwrap_or_else(|| ANONYMOUS_SENDER.to_string()),
            user_agent: self.user_agent.unwrap_or_default(),
            submitted_at,
        })
    }
}

impl Feedback {
    #[must_use]
    pub fn email_subject(&self) -> String {
        format!("{SUBJECT_PREFIX}{}", self.subject)
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.sender_email == ANONYMOUS_SENDER
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn from_epoch_millis(ms: i64) -> Option<OffsetDateTime> {
    match OffsetDateTime::from_unix_timestamp_nanos(i128::from(ms) * 1_000_000) {
        Ok(at) => Some(at),
        Err(e) => {
            tracing::debug!(timestamp_ms = ms, error = %e, "Ignoring out-of-range client timestamp");
            None
        }
    }
}

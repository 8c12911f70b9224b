use crate::config::MailConfig;
use crate::domain::feedback::{Feedback, FeedbackSubmission};
use crate::error::RelayError;
use crate::services::mail::{MailProvider, OutboundEmail, render_feedback_html};
use opentelemetry::{KeyValue, global, metrics::Counter};
use std::sync::Arc;
use time::OffsetDateTime;

#[derive(Clone, Debug)]
pub struct Metrics {
    pub submissions_total: Counter<u64>,
}

impl Metrics {
    #[must_use]
    pub(crate) fn new() -> Self {
        let meter = global::meter("feedback-relay");
        Self {
            submissions_total: meter
                .u64_counter("feedback_submissions_total")
                .with_description("Feedback submissions by outcome")
                .build(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Validates feedback, renders it and hands it to the mail provider.
///
/// Holds no per-request state; clones share the provider client.
#[derive(Clone, Debug)]
pub struct FeedbackService {
    provider: Arc<dyn MailProvider>,
    config: MailConfig,
    metrics: Metrics,
}

impl FeedbackService {
    #[must_use]
    pub fn new(provider: Arc<dyn MailProvider>, config: MailConfig) -> Self {
        Self { provider, config, metrics: Metrics::new() }
    }

    /// Relays a single submission to the configured recipients.
    ///
    /// # Errors
    /// Returns `RelayError::MissingCredentials` if no provider API key is configured.
    /// Returns `RelayError::ShortMessage` if the message fails validation.
    /// Returns `RelayError::SendFailed` if the email could not be rendered or the provider refused it.
    #[tracing::instrument(err(level = "warn"), skip_all)]
    pub async fn submit(&self, submission: FeedbackSubmission) -> Result<(), RelayError> {
        let received_at = OffsetDateTime::now_utc();
        let result = self.relay(submission, received_at).await;

        let outcome = match &result {
            Ok(()) => "ok",
            Err(e) => e.outcome(),
        };
        self.metrics.submissions_total.add(1, &[KeyValue::new("outcome", outcome)]);

        result
    }

    async fn relay(&self, submission: FeedbackSubmission, received_at: OffsetDateTime) -> Result<(), RelayError> {
        // Checked ahead of validation so a misconfigured deployment is reported for every request.
        let api_key = self.config.api_key().ok_or(RelayError::MissingCredentials)?;

        let feedback = submission.validate(received_at)?;
        let email = self.compose(&feedback)?;

        if let Err(e) = self.provider.send(api_key, &email).await {
            tracing::error!(error = %e, "Mail provider refused feedback email");
            return Err(RelayError::SendFailed);
        }

        tracing::info!(subject = %feedback.subject, anonymous = feedback.is_anonymous(), "Feedback relayed");
        Ok(())
    }

    fn compose(&self, feedback: &Feedback) -> Result<OutboundEmail, RelayError> {
        let html = render_feedback_html(feedback).map_err(|e| {
            tracing::error!(error = %e, "Failed to render feedback email");
            RelayError::SendFailed
        })?;

        Ok(OutboundEmail {
            from: self.config.from.clone(),
            to: self.config.to.clone(),
            subject: feedback.email_subject(),
            html,
            reply_to: (!feedback.is_anonymous()).then(|| feedback.sender_email.clone()),
        })
    }
}

use crate::config::MailConfig;
use crate::services::mail::{MailError, MailProvider, OutboundEmail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

#[derive(Deserialize)]
struct SendEmailResponse {
    id: String,
}

/// Delivers mail through the Resend REST API.
#[derive(Clone, Debug)]
pub struct ResendMailProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl ResendMailProvider {
    /// Builds the shared HTTP client for the provider.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be initialized.
    pub fn new(config: &MailConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, endpoint: format!("{}/emails", config.api_url.trim_end_matches('/')) })
    }
}

#[async_trait]
impl MailProvider for ResendMailProvider {
    async fn send(&self, api_key: &str, email: &OutboundEmail) -> Result<(), MailError> {
        let body = SendEmailRequest {
            from: &email.from,
            to: &email.to,
            subject: &email.subject,
            html: &email.html,
            reply_to: email.reply_to.as_deref(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| MailError::Other(e.into()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected { status: status.as_u16(), body });
        }

        match response.json::<SendEmailResponse>().await {
            Ok(ack) => tracing::debug!(email_id = %ack.id, "Email accepted by provider"),
            Err(e) => tracing::debug!(error = %e, "Email accepted by provider with unexpected response body"),
        }

        Ok(())
    }
}

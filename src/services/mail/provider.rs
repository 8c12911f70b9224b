use async_trait::async_trait;
use thiserror::Error;

/// A fully rendered message ready to hand to a delivery provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    pub reply_to: Option<String>,
}

#[derive(Error, Debug)]
pub enum MailError {
    #[error("Provider rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("External service error: {0}")]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait MailProvider: Send + Sync + std::fmt::Debug {
    /// Submits a message for delivery.
    ///
    /// Returns once the provider has accepted the message, which says nothing
    /// about whether it has reached the recipient yet.
    ///
    /// # Errors
    /// Returns `MailError::Rejected` if the provider answered with a non-success
    /// status, or `MailError::Other` if it could not be reached.
    async fn send(&self, api_key: &str, email: &OutboundEmail) -> Result<(), MailError>;
}

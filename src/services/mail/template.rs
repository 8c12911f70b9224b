use crate::domain::feedback::Feedback;
use askama::Template;
use thiserror::Error;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

/// UTC timestamp with millisecond precision, e.g. `2023-11-14T22:13:20.123Z`.
const ISO_8601_MILLIS: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z");

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to format timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
    #[error("Failed to render template: {0}")]
    Template(#[from] askama::Error),
}

// Askama escapes every interpolated value because the template is `.html`.
// The message is escaped explicitly before its newlines become `<br/>`.
#[derive(Template)]
#[template(path = "feedback_email.html")]
struct FeedbackEmail<'a> {
    subject: &'a str,
    sender_email: &'a str,
    submitted_at: &'a str,
    message: &'a str,
    user_agent: &'a str,
}

/// Renders the HTML body for a validated submission.
///
/// # Errors
/// Returns `RenderError` if the timestamp cannot be formatted or the template fails.
pub fn render_feedback_html(feedback: &Feedback) -> Result<String, RenderError> {
    let submitted_at = feedback.submitted_at.to_offset(time::UtcOffset::UTC).format(ISO_8601_MILLIS)?;

    let html = FeedbackEmail {
        subject: &feedback.subject,
        sender_email: &feedback.sender_email,
        submitted_at: &submitted_at,
        message: &feedback.message,
        user_agent: &feedback.user_agent,
    }
    .render()?;

    Ok(html)
}

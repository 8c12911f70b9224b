pub mod provider;
pub mod template;

pub use provider::{MailError, MailProvider, OutboundEmail};
pub use template::{RenderError, render_feedback_html};

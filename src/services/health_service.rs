use crate::config::MailConfig;
use opentelemetry::{KeyValue, global, metrics::Gauge};

#[derive(Clone, Debug)]
pub struct Metrics {
    pub status: Gauge<i64>,
}

impl Metrics {
    #[must_use]
    pub(crate) fn new() -> Self {
        let meter = global::meter("feedback-relay");
        Self {
            status: meter
                .i64_gauge("feedback_health_status")
                .with_description("Status of health checks (1 for ok, 0 for error)")
                .build(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
pub struct HealthService {
    mail: MailConfig,
    metrics: Metrics,
}

impl HealthService {
    #[must_use]
    pub fn new(mail: MailConfig) -> Self {
        Self { mail, metrics: Metrics::new() }
    }

    /// Checks that the mail provider can be called at all.
    ///
    /// The provider is not contacted; a missing API key is the only condition
    /// under which every submission is guaranteed to fail.
    ///
    /// # Errors
    /// Returns a string describing the failure if no API key is configured.
    pub fn check_mail(&self) -> Result<(), String> {
        if self.mail.api_key().is_some() {
            self.metrics.status.record(1, &[KeyValue::new("component", "mail")]);
            Ok(())
        } else {
            self.metrics.status.record(0, &[KeyValue::new("component", "mail")]);
            Err("Email provider API key is not configured".to_string())
        }
    }
}

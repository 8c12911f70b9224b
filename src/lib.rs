#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::panic)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(unreachable_pub)]
#![warn(missing_debug_implementations)]
#![warn(unused_qualifications)]
#![deny(unused_must_use)]

pub mod adapters;
pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;
pub mod telemetry;

use crate::adapters::mail::resend::ResendMailProvider;
use crate::api::ServiceContainer;
use crate::config::Config;
use crate::services::feedback_service::FeedbackService;
use crate::services::health_service::HealthService;
use crate::services::mail::MailProvider;
use crate::services::rate_limit_service::RateLimitService;
use std::sync::Arc;
use tokio::sync::watch;

/// Fully wired application, ready to be handed to the routers.
#[derive(Debug)]
pub struct App {
    pub services: ServiceContainer,
    pub health_service: HealthService,
}

/// Wires the application services from configuration.
///
/// Every client is constructed here exactly once and shared by cloning the
/// service handles; nothing is initialized lazily.
#[derive(Debug)]
pub struct AppBuilder {
    config: Config,
    mail_provider: Option<Arc<dyn MailProvider>>,
}

impl AppBuilder {
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config, mail_provider: None }
    }

    /// Overrides the mail provider. Defaults to Resend built from `MailConfig`.
    #[must_use]
    pub fn with_mail_provider(mut self, provider: Arc<dyn MailProvider>) -> Self {
        self.mail_provider = Some(provider);
        self
    }

    /// Builds the service container.
    ///
    /// # Errors
    /// Returns an error if the default mail provider client cannot be created.
    pub fn build(self) -> anyhow::Result<App> {
        let mail_provider: Arc<dyn MailProvider> = match self.mail_provider {
            Some(provider) => provider,
            None => Arc::new(ResendMailProvider::new(&self.config.mail)?),
        };

        if self.config.mail.api_key().is_none() {
            tracing::warn!("RESEND_API_KEY is not set, feedback submissions will be rejected");
        }

        let feedback_service = FeedbackService::new(mail_provider, self.config.mail.clone());
        let rate_limit_service = RateLimitService::new(self.config.server.trusted_proxies.clone());
        let health_service = HealthService::new(self.config.mail);

        Ok(App { services: ServiceContainer { feedback_service, rate_limit_service }, health_service })
    }
}

/// Routes panics through `tracing` so they reach the configured log sink.
pub fn setup_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info.location().map(|l| format!("{}:{}", l.file(), l.line())).unwrap_or_default();
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown".to_string());

        tracing::error!(panic.location = %location, panic.payload = %payload, "panic occurred");
        default_hook(info);
    }));
}

/// Flips `shutdown_tx` to `true` on SIGINT or SIGTERM.
pub fn spawn_signal_handler(shutdown_tx: watch::Sender<bool>) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to listen for SIGTERM");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            () = ctrl_c => {},
            () = terminate => {},
        }

        tracing::info!("Shutdown signal received, draining connections");
        let _ = shutdown_tx.send(true);
    });
}

#![allow(dead_code, clippy::unwrap_used, clippy::missing_panics_doc, unreachable_pub, missing_debug_implementations)]

use async_trait::async_trait;
use feedback_relay::api::MgmtState;
use feedback_relay::config::{
    Config, CorsConfig, LogFormat, MailConfig, RateLimitConfig, ServerConfig, TelemetryConfig,
};
use feedback_relay::services::mail::{MailError, MailProvider, OutboundEmail};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Once};
use tokio::net::TcpListener;
use tokio::sync::watch;

static INIT: Once = Once::new();

pub const ALLOWED_ORIGIN: &str = "https://home.example.com";
pub const TEST_API_KEY: &str = "re_test_key";

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("feedback_relay=debug".parse().unwrap())
            .add_directive("tower=warn".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap());

        tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().init();
    });
}

pub fn get_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            mgmt_port: 0,
            shutdown_timeout_secs: 1,
            request_timeout_secs: 5,
            trusted_proxies: vec!["127.0.0.1/32".parse().unwrap(), "::1/128".parse().unwrap()],
        },
        cors: CorsConfig { allowed_origins: vec![ALLOWED_ORIGIN.to_string()] },
        mail: MailConfig {
            resend_api_key: Some(TEST_API_KEY.to_string()),
            from: "Smarthome Feedback <feedback@example.com>".to_string(),
            to: vec!["team@example.com".to_string()],
            api_url: "http://127.0.0.1:9".to_string(),
            connect_timeout_secs: 1,
        },
        rate_limit: RateLimitConfig { per_second: 10_000, burst: 10_000 },
        telemetry: TelemetryConfig { log_format: LogFormat::Text, otlp_endpoint: None },
    }
}

/// In-process provider that records every message it is asked to deliver.
#[derive(Debug, Default)]
pub struct RecordingMailProvider {
    fail: AtomicBool,
    sent: Mutex<Vec<(String, OutboundEmail)>>,
}

impl RecordingMailProvider {
    pub fn fail_next_sends(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<(String, OutboundEmail)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailProvider for RecordingMailProvider {
    async fn send(&self, api_key: &str, email: &OutboundEmail) -> Result<(), MailError> {
        self.sent.lock().unwrap().push((api_key.to_string(), email.clone()));
        if self.fail.load(Ordering::SeqCst) {
            return Err(MailError::Rejected { status: 500, body: "provider unavailable".to_string() });
        }
        Ok(())
    }
}

pub struct TestApp {
    pub server_url: String,
    pub mgmt_url: String,
    pub client: reqwest::Client,
    pub mailer: Arc<RecordingMailProvider>,
    pub config: Config,
    shutdown_tx: watch::Sender<bool>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_config(get_test_config()).await
    }

    pub async fn spawn_with_config(config: Config) -> Self {
        setup_tracing();

        let mailer = Arc::new(RecordingMailProvider::default());
        let provider: Arc<dyn MailProvider> = Arc::<RecordingMailProvider>::clone(&mailer);
        let app = feedback_relay::AppBuilder::new(config.clone()).with_mail_provider(provider).build().unwrap();

        let app_router = feedback_relay::api::app_router(&config, app.services).unwrap();
        let mgmt_router = feedback_relay::api::mgmt_router(MgmtState { health_service: app.health_service });

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let api_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mgmt_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let api_addr = api_listener.local_addr().unwrap();
        let mgmt_addr = mgmt_listener.local_addr().unwrap();

        let mut api_rx = shutdown_rx.clone();
        tokio::spawn(async move {
            axum::serve(api_listener, app_router.into_make_service_with_connect_info::<SocketAddr>())
                .with_graceful_shutdown(async move {
                    let _ = api_rx.wait_for(|&s| s).await;
                })
                .await
                .unwrap();
        });

        let mut mgmt_rx = shutdown_rx;
        tokio::spawn(async move {
            axum::serve(mgmt_listener, mgmt_router.into_make_service_with_connect_info::<SocketAddr>())
                .with_graceful_shutdown(async move {
                    let _ = mgmt_rx.wait_for(|&s| s).await;
                })
                .await
                .unwrap();
        });

        Self {
            server_url: format!("http://{api_addr}"),
            mgmt_url: format!("http://{mgmt_addr}"),
            client: reqwest::Client::new(),
            mailer,
            config,
            shutdown_tx,
        }
    }

    pub fn feedback_url(&self) -> String {
        format!("{}/v1/feedback", self.server_url)
    }

    pub fn callable_url(&self) -> String {
        format!("{}/v1/callable/submitFeedback", self.server_url)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
    }
}

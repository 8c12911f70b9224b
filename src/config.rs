use clap::{Args, Parser, ValueEnum};
use ipnetwork::IpNetwork;

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub cors: CorsConfig,

    #[command(flatten)]
    pub mail: MailConfig,

    #[command(flatten)]
    pub rate_limit: RateLimitConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "FEEDBACK_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port for the public API (feedback and callable endpoints)
    #[arg(long, env = "FEEDBACK_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Port for the management server (liveness and readiness probes)
    #[arg(long, env = "FEEDBACK_MGMT_PORT", default_value_t = 9090)]
    pub mgmt_port: u16,

    /// Seconds to wait for in-flight requests after a shutdown signal
    #[arg(long, env = "FEEDBACK_SHUTDOWN_TIMEOUT_SECS", default_value_t = 5)]
    pub shutdown_timeout_secs: u64,

    /// Upper bound on a single API request, enforced at the transport layer
    #[arg(long, env = "FEEDBACK_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Comma-separated list of CIDRs to trust for X-Forwarded-For IP extraction
    #[arg(
        long,
        env = "FEEDBACK_TRUSTED_PROXIES",
        default_value = "10.0.0.0/8,172.16.0.0/12,192.168.0.0/16,127.0.0.1/32",
        value_delimiter = ','
    )]
    pub trusted_proxies: Vec<IpNetwork>,
}

#[derive(Clone, Debug, Args)]
pub struct CorsConfig {
    /// Comma-separated list of origins allowed to call the API from a browser
    #[arg(
        long,
        env = "FEEDBACK_ALLOWED_ORIGINS",
        default_value = "http://localhost:5173,http://localhost:3000",
        value_delimiter = ','
    )]
    pub allowed_origins: Vec<String>,
}

#[derive(Clone, Debug, Args)]
pub struct MailConfig {
    /// API key for the email delivery provider. Submissions are rejected while unset.
    #[arg(long, env = "RESEND_API_KEY", hide_env_values = true)]
    pub resend_api_key: Option<String>,

    /// Sender address used for relayed feedback
    #[arg(long, env = "FEEDBACK_MAIL_FROM", default_value = "Smarthome Feedback <feedback@smarthome.local>")]
    pub from: String,

    /// Comma-separated list of recipients for relayed feedback
    #[arg(long, env = "FEEDBACK_MAIL_TO", default_value = "feedback@smarthome.local", value_delimiter = ',')]
    pub to: Vec<String>,

    /// Base URL of the provider's REST API
    #[arg(long, env = "FEEDBACK_RESEND_API_URL", default_value = "https://api.resend.com")]
    pub api_url: String,

    /// Connect timeout for the provider HTTP client
    #[arg(long, env = "FEEDBACK_MAIL_CONNECT_TIMEOUT_SECS", default_value_t = 10)]
    pub connect_timeout_secs: u64,
}

impl MailConfig {
    /// The configured provider API key, treating a blank value as absent.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.resend_api_key.as_deref().map(str::trim).filter(|key| !key.is_empty())
    }
}

#[derive(Clone, Debug, Args)]
pub struct RateLimitConfig {
    /// Feedback submissions per second allowed per client
    #[arg(long, env = "FEEDBACK_RATE_LIMIT_PER_SECOND", default_value_t = 1)]
    pub per_second: u32,

    /// Burst allowance per client
    #[arg(long, env = "FEEDBACK_RATE_LIMIT_BURST", default_value_t = 5)]
    pub burst: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Debug, Args)]
pub struct TelemetryConfig {
    /// Log output format
    #[arg(long, env = "FEEDBACK_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// OTLP gRPC endpoint for traces, metrics and logs. Export is disabled while unset.
    #[arg(long, env = "FEEDBACK_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
}

impl Config {
    #[must_use]
    pub fn load() -> Self {
        Self::parse()
    }
}

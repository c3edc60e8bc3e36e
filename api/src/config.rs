use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "sleep_quality_api=info";

/// Serve sleep quality predictions over HTTP.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Config {
    /// Path to the exported tree-ensemble model (JSON)
    #[arg(long, env = "SLEEP_MODEL_PATH", default_value = "sleep_quality_model.json")]
    pub model_path: PathBuf,

    /// Host address to bind to
    #[arg(long, env = "SLEEP_API_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, short = 'p', env = "SLEEP_API_PORT", default_value = "3000")]
    pub port: u16,
}

impl Config {
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Builds the log filter from `RUST_LOG`, falling back to info-level logs
/// for this crate when it is unset or unparseable.
pub fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

//! Structured logging via the tracing ecosystem.

use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, for terminals.
    Text,
    /// One JSON object per line, for log shippers.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: Level,
    pub format: LogFormat,
    /// Emit span open/close events (useful with `#[instrument]`ed
    /// engine operations, noisy in production).
    pub span_events: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Text,
            span_events: true,
        }
    }
}

impl LoggingConfig {
    /// Reads `AW_LOG_LEVEL` and `AW_LOG_FORMAT` from the environment,
    /// falling back to the default text config.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(level) = std::env::var("AW_LOG_LEVEL") {
            if let Ok(parsed) = level.parse() {
                config.level = parsed;
            }
        }
        if matches!(std::env::var("AW_LOG_FORMAT").as_deref(), Ok("json")) {
            config.format = LogFormat::Json;
            config.span_events = false;
        }
        config
    }

    /// Installs the global subscriber. `RUST_LOG`, when set, overrides
    /// the configured level.
    pub fn init(self) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "aw_core={level},aw_api={level},tower_http=info",
                level = self.level
            ))
        });
        let spans = if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        let registry = tracing_subscriber::registry().with(filter);
        match self.format {
            LogFormat::Json => registry
                .with(fmt::layer().json().with_span_events(spans))
                .init(),
            LogFormat::Text => registry
                .with(fmt::layer().with_span_events(spans))
                .init(),
        }
    }
}

//! Logging setup for the CLI.
//!
//! Output goes to stderr so stdout stays reserved for command results.
//! `RUST_LOG` wins over `PF_LOG_LEVEL`; `PF_LOG_FORMAT=json` switches to
//! structured lines.

use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

static TRACING: OnceLock<()> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub level: String,
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        let format = match std::env::var("PF_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Compact,
        };
        let level = std::env::var("RUST_LOG")
            .or_else(|_| std::env::var("PF_LOG_LEVEL"))
            .unwrap_or_else(|_| "warn".to_string());
        Self { format, level }
    }

    /// A level given on the command line replaces the environment's.
    pub fn with_level(mut self, level: Option<&str>) -> Self {
        if let Some(l) = level {
            self.level = l.to_string();
        }
        self
    }
}

/// Install the global subscriber; later calls are no-ops.
pub fn init_once(cfg: &LoggingConfig) {
    TRACING.get_or_init(|| {
        let filter = EnvFilter::try_new(&cfg.level).unwrap_or_else(|_| EnvFilter::new("warn"));
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true);
        let _ = match cfg.format {
            LogFormat::Json => builder.json().try_init(),
            LogFormat::Compact => builder.compact().try_init(),
        };
        tracing::debug!(format = ?cfg.format, level = %cfg.level, "tracing initialized");
    });
}

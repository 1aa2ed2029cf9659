// Logging setup
//
// Diagnostics go to stderr through tracing-subscriber so command output on
// stdout stays machine-readable.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Default filter when neither an explicit filter nor the environment sets one
pub const DEFAULT_LOG_FILTER: &str = "warn";

// ============================================================================
// Configuration
// ============================================================================

/// Logging configuration
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Filter directive (e.g., "info", "aspire_core=debug")
    pub filter: Option<String>,
    /// Include module targets in each line
    pub with_target: bool,
}

impl LogConfig {
    /// Create configuration from environment variables
    ///
    /// Environment variables:
    /// - `RUST_LOG` or `ASPIRE_LOG`: Log filter
    pub fn from_env() -> Self {
        Self {
            filter: std::env::var("RUST_LOG")
                .ok()
                .or_else(|| std::env::var("ASPIRE_LOG").ok()),
            ..Self::default()
        }
    }

    /// Prefer an explicit filter (e.g., from a command line flag)
    pub fn with_filter(mut self, filter: Option<&str>) -> Self {
        if let Some(filter) = filter {
            self.filter = Some(filter.to_string());
        }
        self
    }

    fn env_filter(&self) -> EnvFilter {
        self.filter
            .as_ref()
            .and_then(|f| EnvFilter::try_new(f).ok())
            .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
    }
}

// ============================================================================
// Initialization
// ============================================================================

/// Install the global subscriber
///
/// Returns false when a subscriber was already installed (tests, embedding
/// applications); the existing one is left in place.
pub fn init_logging(config: LogConfig) -> bool {
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(config.with_target)
        .with_filter(config.env_filter());

    tracing_subscriber::registry().with(layer).try_init().is_ok()
}

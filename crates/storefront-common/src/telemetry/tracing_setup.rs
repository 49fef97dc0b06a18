//! Log output for the storefront client
//!
//! `RUST_LOG` wins when set. Otherwise the configured level applies to the
//! storefront crates while the HTTP stack underneath stays at `warn`.

use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::Environment;

/// Crates whose own logging is capped at `warn` unless `RUST_LOG` says otherwise
const QUIET_DEPENDENCIES: [&str; 3] = ["hyper", "hyper_util", "reqwest"];

/// Log output options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// Level for the storefront crates
    pub level: Level,
    /// One JSON object per line instead of human-readable text
    pub json: bool,
    /// Emit an event when a span (login, send, renewal) opens and closes
    pub span_events: bool,
    /// Include source file and line
    pub file_line: bool,
    /// Include the module path of each event
    pub target: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json: false,
            span_events: false,
            file_line: false,
            target: true,
        }
    }
}

impl TracingConfig {
    /// Verbose text output for local work
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            span_events: true,
            file_line: true,
            ..Self::default()
        }
    }

    /// JSON output for log collectors
    #[must_use]
    pub fn production() -> Self {
        Self {
            json: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self::development(),
            Environment::Staging => Self::default(),
            Environment::Production => Self::production(),
        }
    }

    /// Filter used when `RUST_LOG` is not set
    #[must_use]
    pub fn default_directives(&self) -> String {
        let level = self.level.as_str().to_ascii_lowercase();
        QUIET_DEPENDENCIES
            .iter()
            .fold(level, |acc, krate| format!("{acc},{krate}=warn"))
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.default_directives()))
    }

    fn span_events(&self) -> FmtSpan {
        if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }
}

fn subscriber(config: &TracingConfig) -> impl SubscriberInitExt {
    let text = (!config.json).then(|| {
        fmt::layer()
            .with_target(config.target)
            .with_file(config.file_line)
            .with_line_number(config.file_line)
            .with_span_events(config.span_events())
    });

    let json = config.json.then(|| {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(config.target)
            .with_file(config.file_line)
            .with_line_number(config.file_line)
            .with_span_events(config.span_events())
    });

    tracing_subscriber::registry()
        .with(config.filter())
        .with(text)
        .with(json)
}

/// Install the global subscriber with default options
pub fn try_init_tracing() -> Result<(), TracingError> {
    try_init_tracing_with_config(&TracingConfig::default())
}

/// Install the global subscriber; fails if one is already installed
pub fn try_init_tracing_with_config(config: &TracingConfig) -> Result<(), TracingError> {
    subscriber(config)
        .try_init()
        .map_err(|_| TracingError::AlreadyInitialized)
}

#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("Tracing subscriber already initialized")]
    AlreadyInitialized,
}

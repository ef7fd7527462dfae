use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LogFormat, LoggingConfig};
use crate::error::{Result, ToolError};

/// Installs the global tracing subscriber. `RUST_LOG` takes precedence over
/// the configured level; `verbose` raises the crate's own level to debug.
pub fn init_logging(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| {
        let level = config.level.to_ascii_lowercase();
        let directive = if verbose {
            format!("{level},vessel_export=debug")
        } else {
            level
        };
        EnvFilter::try_new(directive)
    });
    let filter = filter.map_err(|err| ToolError::Logging(err.to_string()))?;

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match config.format {
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().with_writer(std::io::stderr).json())
            .try_init(),
    };
    installed.map_err(|err| ToolError::Logging(err.to_string()))
}

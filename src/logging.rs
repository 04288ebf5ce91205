use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::settings::LoggingSettings;

/// Where log lines go when no log file is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fallback {
    Stderr,
    /// The dashboard owns the terminal, so nothing may be written to it.
    Discard,
}

/// Install the global subscriber. `RUST_LOG` takes precedence over `logging.level`.
pub(crate) fn setup(settings: &LoggingSettings, fallback: Fallback) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .with_context(|| format!("Invalid log level: {}", settings.level))?;

    let file_log = match &settings.file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Arc::new(file)),
            )
        }
        None => None,
    };

    let terminal_log = (file_log.is_none() && fallback == Fallback::Stderr).then(|| {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_log)
        .with(terminal_log)
        .try_init()
        .context("Failed to install log subscriber")?;
    Ok(())
}

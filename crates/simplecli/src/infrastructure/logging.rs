//! `tracing` subscriber whose level can be changed after start-up.
//!
//! The usual pattern is to build the subscriber once with a fixed
//! `EnvFilter`:
//!
//! ```rust,ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
//!     .init();
//! ```
//!
//! The bootstrap only learns the wanted level after flags and configuration
//! have been read, so the filter is wrapped in a `reload` layer and the
//! handle is kept in [`TracingLogger`].  `RUST_LOG` still decides the initial
//! filter; without it the initial level is [`Severity::default`].

use simplecli_core::Severity;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

use crate::application::logger::Logger;

/// Error type for logger installation.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// A global subscriber is already installed, or installation failed.
    #[error("failed to install tracing subscriber: {0}")]
    Install(String),
}

/// Logger backed by the global `tracing` subscriber.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    handle: Option<reload::Handle<EnvFilter, Registry>>,
}

impl TracingLogger {
    /// Installs the global subscriber, writing to stderr.
    ///
    /// # Errors
    ///
    /// Returns [`LoggingError::Install`] if a global subscriber already
    /// exists.
    pub fn install() -> Result<Self, LoggingError> {
        let initial = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(Severity::default().as_str()));
        let (filter, handle) = reload::Layer::new(initial);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| LoggingError::Install(e.to_string()))?;

        Ok(Self {
            handle: Some(handle),
        })
    }

    /// A logger not connected to any subscriber.  It cannot change levels.
    pub fn detached() -> Self {
        Self { handle: None }
    }
}

impl Logger for TracingLogger {
    fn try_set_severity(&self, severity: Severity) -> bool {
        let Some(handle) = &self.handle else {
            return false;
        };

        match handle.reload(EnvFilter::new(severity.as_str())) {
            Ok(()) => {
                debug!(%severity, "log level changed");
                true
            }
            Err(_) => false,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

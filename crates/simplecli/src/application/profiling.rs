//! Profiler port.
//!
//! A profiling session is an opaque handle with one operation: stop it.  The
//! [`Profiler`] starts sessions of a requested [`ProfileMode`]; the bootstrap
//! owns at most one session at a time and is responsible for stopping it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use simplecli_core::ProfileMode;
use thiserror::Error;

/// Error type for profiler operations.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The output location could not be created or written.
    #[error("I/O error accessing profile output at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The session report could not be serialized.
    #[error("failed to serialize profile report: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// An active profiling session.
pub trait ProfileSession: Send {
    /// Ends the session and flushes whatever it collected.
    fn stop(self: Box<Self>);
}

/// Starts profiling sessions.
pub trait Profiler: Send + Sync {
    /// Begins a session of kind `mode`, writing output under `output_dir`
    /// (or a fresh temporary directory when `None`).
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError`] if the session cannot be set up.
    fn start(
        &self,
        mode: ProfileMode,
        output_dir: Option<&Path>,
    ) -> Result<Box<dyn ProfileSession>, ProfileError>;
}

impl<P: Profiler + ?Sized> Profiler for Arc<P> {
    fn start(
        &self,
        mode: ProfileMode,
        output_dir: Option<&Path>,
    ) -> Result<Box<dyn ProfileSession>, ProfileError> {
        (**self).start(mode, output_dir)
    }
}

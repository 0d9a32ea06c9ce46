//! Profiler that records session reports.
//!
//! [`SessionRecorder`] collects no samples: no CPU stacks, no allocations, no
//! lock or block events, no trace.  Every mode produces the same report, the
//! mode name, process id and wall-clock interval of the run, written as TOML
//! to `<mode>.profile.toml` when the session stops.  Plug a real sampling
//! backend in through the [`Profiler`] trait when actual profiles are needed.
//!
//! ```toml
//! mode = "cpu"
//! pid = 4242
//! started_unix_ms = 1760000000000
//! elapsed_ms = 153
//! ```
//!
//! Without an explicit output directory each session gets a fresh
//! `profile<uuid>` directory under the system temp directory.

use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use simplecli_core::ProfileMode;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::profiling::{ProfileError, ProfileSession, Profiler};

/// Contents of a `<mode>.profile.toml` report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionReport {
    pub mode: String,
    pub pid: u32,
    pub started_unix_ms: u64,
    pub elapsed_ms: u64,
}

/// Starts [`RecordedSession`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionRecorder;

impl SessionRecorder {
    pub fn new() -> Self {
        Self
    }
}

/// Path of the report a session of `mode` writes into `dir`.
pub fn report_path(dir: &Path, mode: ProfileMode) -> PathBuf {
    dir.join(format!("{mode}.profile.toml"))
}

impl Profiler for SessionRecorder {
    fn start(
        &self,
        mode: ProfileMode,
        output_dir: Option<&Path>,
    ) -> Result<Box<dyn ProfileSession>, ProfileError> {
        let dir = match output_dir {
            Some(dir) => dir.to_path_buf(),
            None => std::env::temp_dir().join(format!("profile{}", Uuid::new_v4())),
        };
        std::fs::create_dir_all(&dir).map_err(|source| ProfileError::Io {
            path: dir.clone(),
            source,
        })?;

        let path = report_path(&dir, mode);
        info!("profile: {mode} profiling enabled, {}", path.display());

        Ok(Box::new(RecordedSession {
            mode,
            path,
            started_at: SystemTime::now(),
            started: Instant::now(),
        }))
    }
}

/// An active session started by [`SessionRecorder`].
#[derive(Debug)]
pub struct RecordedSession {
    mode: ProfileMode,
    path: PathBuf,
    started_at: SystemTime,
    started: Instant,
}

impl RecordedSession {
    fn report(&self) -> SessionReport {
        let started_unix_ms = self
            .started_at
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        SessionReport {
            mode: self.mode.to_string(),
            pid: std::process::id(),
            started_unix_ms,
            elapsed_ms: self.started.elapsed().as_millis() as u64,
        }
    }

    fn write_report(&self) -> Result<(), ProfileError> {
        let content = toml::to_string_pretty(&self.report())?;
        std::fs::write(&self.path, content).map_err(|source| ProfileError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl ProfileSession for RecordedSession {
    fn stop(self: Box<Self>) {
        if let Err(e) = self.write_report() {
            warn!("profile: failed to write report: {e}");
        }
        info!(
            "profile: {} profiling disabled, {}",
            self.mode,
            self.path.display()
        );
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

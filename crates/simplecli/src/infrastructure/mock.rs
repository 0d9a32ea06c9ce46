//! Recording logger and profiler for tests.
//!
//! Both types remember every call they receive so tests can assert on the
//! bootstrap's side effects without installing a global subscriber or
//! writing profile output.

use std::path::Path;
use std::sync::{Arc, Mutex};

use simplecli_core::{ProfileMode, Severity};

use crate::application::logger::Logger;
use crate::application::profiling::{ProfileError, ProfileSession, Profiler};

/// A [`Logger`] that records each severity it is asked to apply.
#[derive(Debug)]
pub struct RecordingLogger {
    applied: Mutex<Vec<Severity>>,
    supports_levels: bool,
}

impl RecordingLogger {
    /// Creates a logger that accepts severity changes.
    pub fn new() -> Self {
        Self {
            applied: Mutex::new(Vec::new()),
            supports_levels: true,
        }
    }

    /// Creates a logger that refuses severity changes.
    pub fn without_level_control() -> Self {
        Self {
            applied: Mutex::new(Vec::new()),
            supports_levels: false,
        }
    }

    /// Severities applied so far, oldest first.
    pub fn applied(&self) -> Vec<Severity> {
        self.applied.lock().expect("lock poisoned").clone()
    }
}

impl Default for RecordingLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for RecordingLogger {
    fn try_set_severity(&self, severity: Severity) -> bool {
        if !self.supports_levels {
            return false;
        }
        self.applied.lock().expect("lock poisoned").push(severity);
        true
    }
}

/// A [`Profiler`] that records session starts and stops.
#[derive(Debug, Clone, Default)]
pub struct RecordingProfiler {
    started: Arc<Mutex<Vec<ProfileMode>>>,
    stopped: Arc<Mutex<Vec<ProfileMode>>>,
    should_fail: bool,
}

impl RecordingProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a profiler whose `start` always fails.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Modes of every session started, oldest first.
    pub fn started(&self) -> Vec<ProfileMode> {
        self.started.lock().expect("lock poisoned").clone()
    }

    /// Modes of every session stopped, oldest first.
    pub fn stopped(&self) -> Vec<ProfileMode> {
        self.stopped.lock().expect("lock poisoned").clone()
    }
}

impl Profiler for RecordingProfiler {
    fn start(
        &self,
        mode: ProfileMode,
        output_dir: Option<&Path>,
    ) -> Result<Box<dyn ProfileSession>, ProfileError> {
        if self.should_fail {
            return Err(ProfileError::Io {
                path: output_dir.map(Path::to_path_buf).unwrap_or_default(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            });
        }

        self.started.lock().expect("lock poisoned").push(mode);
        Ok(Box::new(RecordingSession {
            mode,
            stopped: Arc::clone(&self.stopped),
        }))
    }
}

struct RecordingSession {
    mode: ProfileMode,
    stopped: Arc<Mutex<Vec<ProfileMode>>>,
}

impl ProfileSession for RecordingSession {
    fn stop(self: Box<Self>) {
        self.stopped.lock().expect("lock poisoned").push(self.mode);
    }
}

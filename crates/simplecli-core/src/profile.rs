//! Recognized profiling modes.
//!
//! The `--profile` flag selects one of a fixed set of session kinds.  Parsing
//! is strict: anything outside [`ProfileMode::ALL`] is an [`UnknownProfiler`].

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A profiling session kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileMode {
    Cpu,
    Memory,
    Mutex,
    Block,
    Trace,
}

/// The `--profile` value was not one of the recognized mode names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown profiler ({0})")]
pub struct UnknownProfiler(pub String);

impl ProfileMode {
    /// Every recognized mode, in documentation order.
    pub const ALL: [ProfileMode; 5] = [
        ProfileMode::Cpu,
        ProfileMode::Memory,
        ProfileMode::Mutex,
        ProfileMode::Block,
        ProfileMode::Trace,
    ];

    /// The name accepted on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            ProfileMode::Cpu => "cpu",
            ProfileMode::Memory => "memory",
            ProfileMode::Mutex => "mutex",
            ProfileMode::Block => "block",
            ProfileMode::Trace => "trace",
        }
    }
}

impl fmt::Display for ProfileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileMode {
    type Err = UnknownProfiler;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProfileMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| UnknownProfiler(s.to_string()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

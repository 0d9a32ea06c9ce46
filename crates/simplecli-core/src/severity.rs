//! Minimum log severity.

use std::fmt;

/// Minimum severity a logger emits.  Ordered from most to least verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Severity {
    Debug,
    Info,
    /// Level in effect before `--verbose` or `--debug` raise it.
    #[default]
    Warn,
    Error,
}

impl Severity {
    /// Lower-case name, also valid as a `tracing` filter directive.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

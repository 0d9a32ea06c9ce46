//! Read-only access to environment variables.
//!
//! Rules that depend on the environment take an [`EnvSource`] instead of
//! calling `std::env::var` directly.  Production code passes [`ProcessEnv`];
//! tests pass a `HashMap<String, String>` and never touch global state.

use std::collections::{BTreeMap, HashMap};

/// A source of environment variables.
pub trait EnvSource: Send + Sync {
    /// Returns the value of `key`, or `None` when it is unset or not valid
    /// Unicode.
    fn var(&self, key: &str) -> Option<String>;

    /// Returns the value of `key` only when it is set to a non-empty string.
    fn non_empty_var(&self, key: &str) -> Option<String> {
        self.var(key).filter(|value| !value.is_empty())
    }
}

/// The environment of the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl EnvSource for BTreeMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

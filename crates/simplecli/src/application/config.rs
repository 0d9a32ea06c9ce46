//! Config store port: layered configuration values with flag binding.
//!
//! The bootstrap never reads configuration files or environment variables
//! itself.  It drives a [`ConfigStore`] through a fixed sequence (name,
//! search path or explicit file, environment overlay, read) and then asks it
//! for values.  The store resolves each key through its layers:
//!
//! 1. a bound flag that was given on the command line,
//! 2. the environment overlay `<PREFIX>_<KEY>`,
//! 3. the configuration file,
//! 4. the bound flag's default.
//!
//! The store never parses the command line.  It holds [`Flag`] snapshots for
//! the keys bound to flags, and the bootstrap refreshes those snapshots with
//! [`ConfigStore::sync_flags`] once parsing is done.

use std::path::PathBuf;

use thiserror::Error;

/// Configuration values are carried as TOML values regardless of the file
/// format they were read from.
pub use toml::Value;

/// Error type for config store operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No file named after the application exists in any search directory.
    ///
    /// This is the one recoverable outcome of [`ConfigStore::read_in_config`].
    #[error("config file \"{name}\" not found in {search_path:?}")]
    NotFound {
        name: String,
        search_path: Vec<PathBuf>,
    },

    /// A file system I/O error occurred (including a missing explicit file).
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse TOML config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The JSON content could not be parsed.
    #[error("failed to parse JSON config at {path}: {source}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A key was bound to a flag that does not exist.
    #[error("flag for \"{0}\" is not defined")]
    UnboundFlag(String),
}

impl ConfigError {
    /// Whether this is the recoverable "no config file found" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::NotFound { .. })
    }
}

/// A typed command-line flag value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    Bool(bool),
    Str(String),
}

impl FlagValue {
    /// Converts the flag value into the config store's value type.
    pub fn to_value(&self) -> Value {
        match self {
            FlagValue::Bool(b) => Value::Boolean(*b),
            FlagValue::Str(s) => Value::String(s.clone()),
        }
    }
}

/// Snapshot of a single flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flag {
    pub name: String,
    /// Current value; equal to `default` until the command line sets it.
    pub value: FlagValue,
    pub default: FlagValue,
    /// `true` only when the value came from the command line.
    pub changed: bool,
}

/// Layered configuration store.
#[cfg_attr(test, mockall::automock)]
pub trait ConfigStore {
    /// Sets the file name (without extension) searched for, e.g. `.myapp`.
    fn set_config_name(&mut self, name: &str);

    /// Sets the prefix used by the environment overlay.
    fn set_env_prefix(&mut self, prefix: &str);

    /// Replaces the directories searched for the config file.
    fn set_config_paths(&mut self, paths: Vec<PathBuf>);

    /// Uses exactly `path` instead of searching, or clears that choice.
    fn set_config_file(&mut self, path: Option<PathBuf>);

    /// Enables the `<PREFIX>_<KEY>` environment overlay.
    fn automatic_env(&mut self);

    /// Uses `flag` as the fallback source for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnboundFlag`] when `flag` is `None`.
    fn bind_flag(&mut self, key: &str, flag: Option<Flag>) -> Result<(), ConfigError>;

    /// Refreshes the snapshots of bound flags from `flags` (matched by name).
    fn sync_flags(&mut self, flags: Vec<Flag>);

    /// Locates and loads the config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] when searching found nothing, and
    /// any other variant for I/O or parse failures.
    fn read_in_config(&mut self) -> Result<(), ConfigError>;

    /// The file loaded by the last successful [`ConfigStore::read_in_config`].
    fn config_file_used(&self) -> Option<PathBuf>;

    /// Resolves `key` through every layer.
    fn get(&self, key: &str) -> Option<Value>;
}

/// Parses the boolean spellings accepted from strings (`1`, `t`, `true`, ...).
pub fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

/// Interprets a config value as a boolean; unparseable values are `false`.
pub fn value_as_bool(value: &Value) -> bool {
    match value {
        Value::Boolean(b) => *b,
        Value::String(s) => parse_bool(s).unwrap_or(false),
        Value::Integer(i) => *i != 0,
        _ => false,
    }
}

/// Renders a config value as a plain string (strings are not quoted).
pub fn value_as_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

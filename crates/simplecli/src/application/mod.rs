//! Application layer: the ports the bootstrap drives and the overrides it
//! accepts.
//!
//! Each collaborator of the bootstrap (config store, logger, profiler) is a
//! trait here; the concrete adapters live in `crate::infrastructure`.

pub mod config;
pub mod logger;
pub mod profiling;
pub mod settings;

pub use config::{ConfigError, ConfigStore, Flag, FlagValue, Value};
pub use logger::Logger;
pub use profiling::{ProfileError, ProfileSession, Profiler};
pub use settings::Setting;

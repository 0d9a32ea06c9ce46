//! # simplecli
//!
//! Bootstrap helper for command-line programs.  One call to
//! [`Cli::setup`] takes a program from "just started" to "knows its name,
//! has read its configuration, logs at the requested level":
//!
//! ```rust,no_run
//! use simplecli::{Cli, Setting};
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut cli = Cli::new()?;
//!     cli.setup([Setting::config_search_path(["/etc/myapp", "."])])?;
//!     cli.start_profile()?;
//!
//!     tracing::info!(name = %cli.application().name, "ready");
//!     cli.exit(0)
//! }
//! ```
//!
//! # Architecture overview (for beginners)
//!
//! - **`application`** – The ports: traits for the config store, logger and
//!   profiler, plus the [`Setting`] overrides a caller may pass to setup.
//!   Nothing in this layer touches the file system or the process.
//!
//! - **`infrastructure`** – The adapters: `clap` flags, a TOML/JSON config
//!   store with an environment overlay, a reloadable `tracing` subscriber,
//!   a profiler that writes session reports, and recording mocks for tests.
//!
//! - **`bootstrap`** – [`Cli`] itself, which wires one adapter to each port
//!   and runs the setup sequence.
//!
//! The pure naming rules (identity, environment prefix, search path) live in
//! the `simplecli-core` crate and are re-exported here.

pub mod application;
pub mod bootstrap;
pub mod infrastructure;

pub use application::{
    ConfigError, ConfigStore, Flag, FlagValue, Logger, ProfileError, ProfileSession, Profiler,
    Setting, Value,
};
pub use bootstrap::{BootstrapError, Cli, CliBuilder, BOUND_FLAGS};
pub use infrastructure::{FlagSet, LayeredConfig, LoggingError, SessionRecorder, TracingLogger};
pub use simplecli_core::{
    default_search_path, normalize_env_name, AppIdentity, EnvSource, ProcessEnv, ProfileMode,
    Severity, UnknownProfiler,
};

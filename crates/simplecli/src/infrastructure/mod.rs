//! Infrastructure layer: concrete adapters for the application ports.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `simplecli_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`flags`** – Command-line flag store built on `clap`'s builder API.
//!   Applications may add their own flags next to `--config`, `--debug`,
//!   `--verbose` and `--profile`.
//!
//! - **`layered_config`** – The production `ConfigStore`: TOML or JSON file,
//!   environment overlay, bound flags.
//!
//! - **`logging`** – Global `tracing` subscriber with a reloadable level filter.
//!
//! - **`profiler`** – Profiler that writes a TOML report per session.
//!
//! - **`mock`** – Recording logger and profiler for tests.

pub mod flags;
pub mod layered_config;
pub mod logging;
pub mod mock;
pub mod profiler;

pub use flags::FlagSet;
pub use layered_config::LayeredConfig;
pub use logging::{LoggingError, TracingLogger};
pub use profiler::SessionRecorder;

//! # simplecli-core
//!
//! Pure rules shared by the simplecli bootstrap: how an application names
//! itself, how that name becomes an environment-variable prefix, and where
//! configuration files are looked for by default.
//!
//! This crate performs no I/O of its own.  Environment access goes through
//! the [`EnvSource`] trait so that every rule here can be tested against an
//! in-memory map instead of the real process environment.
//!
//! # Architecture overview (for beginners)
//!
//! A command-line program usually needs the same boring setup before it can
//! do anything useful: figure out what it is called, find its configuration
//! file, read a few environment variables, and decide how chatty its logs
//! should be.  This crate holds the part of that setup that is plain
//! computation:
//!
//! - **`identity`** – Derives the application name (`myapp`) from the path it
//!   was invoked as (`/usr/local/bin/myapp.exe`).
//!
//! - **`naming`** – Turns an arbitrary name into something usable as an
//!   environment-variable prefix (`my-app` → `MY_APP`).
//!
//! - **`search_path`** – Builds the default list of directories searched for a
//!   configuration file.
//!
//! - **`profile`** / **`severity`** – Small closed vocabularies shared by the
//!   bootstrap and its collaborators.

pub mod env;
pub mod identity;
pub mod naming;
pub mod profile;
pub mod search_path;
pub mod severity;

// Re-export the most-used items at the crate root so callers can write
// `simplecli_core::AppIdentity` instead of `simplecli_core::identity::AppIdentity`.
pub use env::{EnvSource, ProcessEnv};
pub use identity::AppIdentity;
pub use naming::normalize_env_name;
pub use profile::{ProfileMode, UnknownProfiler};
pub use search_path::{default_search_path, HOME_VARIABLES};
pub use severity::Severity;

//! Caller-supplied overrides applied at the start of setup.
//!
//! Settings run before anything else in [`Cli::setup`](crate::Cli::setup),
//! in the order given, so they can replace defaults computed at construction
//! (such as the search path) before those defaults are used.

use std::path::PathBuf;

/// A single override applied by [`Cli::setup`](crate::Cli::setup).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Setting {
    /// Replaces the whole configuration search path (no merge).  An empty
    /// list disables searching.
    ConfigSearchPath(Vec<PathBuf>),
    /// Uses exactly this file instead of searching.  An empty path clears a
    /// previously chosen file.  `--config` on the command line still wins.
    ConfigFile(PathBuf),
    /// Directory profiling sessions write their output to.
    ProfilePath(PathBuf),
}

impl Setting {
    /// Builds a [`Setting::ConfigSearchPath`].
    ///
    /// ```rust
    /// use simplecli::Setting;
    ///
    /// let setting = Setting::config_search_path(["/etc/myapp", "."]);
    /// assert!(matches!(setting, Setting::ConfigSearchPath(ref p) if p.len() == 2));
    /// ```
    pub fn config_search_path<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Setting::ConfigSearchPath(paths.into_iter().map(Into::into).collect())
    }

    /// Builds a [`Setting::ConfigFile`].
    pub fn config_file(path: impl Into<PathBuf>) -> Self {
        Setting::ConfigFile(path.into())
    }

    /// Builds a [`Setting::ProfilePath`].
    pub fn profile_path(dir: impl Into<PathBuf>) -> Self {
        Setting::ProfilePath(dir.into())
    }
}

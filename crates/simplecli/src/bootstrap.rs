//! The bootstrap use case: everything a command-line program does before its
//! own work starts.
//!
//! [`Cli`] is built once at process start.  Construction derives the
//! application identity from the argument vector, computes the default
//! configuration search path, names the config file after the application
//! and derives the environment prefix from that name.  [`Cli::setup`] then
//! runs the fixed sequence:
//!
//! ```text
//! apply settings → bind flags → parse flags → resolve config file
//!     → environment overlay → read config → log level → check --profile
//! ```
//!
//! # Ownership
//!
//! `Cli` owns all of its collaborators (flag set, config store, logger,
//! profiler) and the optional profiling session.  The session is stopped by
//! [`Cli::stop_profile`], [`Cli::exit`], or when the `Cli` is dropped.
//! `std::process::exit` skips destructors, which is why [`Cli::exit`] stops
//! the session itself.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use simplecli_core::{
    default_search_path, normalize_env_name, AppIdentity, EnvSource, ProcessEnv, ProfileMode,
    Severity, UnknownProfiler,
};
use thiserror::Error;
use tracing::{debug, info};

use crate::application::config::{value_as_bool, value_as_string, ConfigError, ConfigStore, Value};
use crate::application::logger::Logger;
use crate::application::profiling::{ProfileError, ProfileSession, Profiler};
use crate::application::settings::Setting;
use crate::infrastructure::flags::{FlagSet, CONFIG_FLAG, DEBUG_FLAG, PROFILE_FLAG, VERBOSE_FLAG};
use crate::infrastructure::layered_config::LayeredConfig;
use crate::infrastructure::logging::{LoggingError, TracingLogger};
use crate::infrastructure::profiler::SessionRecorder;

/// Flags bound to config keys of the same name during setup.
pub const BOUND_FLAGS: [&str; 2] = [DEBUG_FLAG, VERBOSE_FLAG];

/// Error type for the bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The default logger could not be installed.
    #[error("failed to initialize logger: {0}")]
    Logger(#[from] LoggingError),

    /// A config key could not be bound to its flag.
    #[error("failed to bind flag \"{key}\": {source}")]
    BindFlag {
        key: String,
        #[source]
        source: ConfigError,
    },

    /// The command line was rejected (including `--help`).
    #[error("failed to parse command line: {0}")]
    ParseFlags(#[from] clap::Error),

    /// The configuration file exists but could not be read or parsed, or an
    /// explicitly chosen file is missing.
    #[error("failed to read configuration file: {0}")]
    ReadConfig(#[source] ConfigError),

    /// `--profile` named a mode that does not exist.
    #[error(transparent)]
    UnknownProfiler(#[from] UnknownProfiler),

    /// The profiler refused to start a session.
    #[error("failed to start profiler: {0}")]
    StartProfile(#[from] ProfileError),
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Builds a [`Cli`] with injectable collaborators.
///
/// Anything not supplied falls back to the production adapter: the process
/// environment, a globally installed `tracing` subscriber, a
/// [`LayeredConfig`] and a [`SessionRecorder`].
pub struct CliBuilder {
    args: Vec<String>,
    env: Option<Arc<dyn EnvSource>>,
    logger: Option<Box<dyn Logger>>,
    config: Option<Box<dyn ConfigStore>>,
    profiler: Option<Box<dyn Profiler>>,
}

impl CliBuilder {
    /// Starts a builder for the argument vector `args`, whose first element
    /// is the program path.
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            env: None,
            logger: None,
            config: None,
            profiler: None,
        }
    }

    /// Environment used for the search path and the config overlay.
    pub fn env(mut self, env: impl EnvSource + 'static) -> Self {
        self.env = Some(Arc::new(env));
        self
    }

    pub fn logger(mut self, logger: impl Logger + 'static) -> Self {
        self.logger = Some(Box::new(logger));
        self
    }

    pub fn config_store(mut self, config: impl ConfigStore + 'static) -> Self {
        self.config = Some(Box::new(config));
        self
    }

    pub fn profiler(mut self, profiler: impl Profiler + 'static) -> Self {
        self.profiler = Some(Box::new(profiler));
        self
    }

    /// Creates the [`Cli`].
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::Logger`] when no logger was supplied and the
    /// global `tracing` subscriber cannot be installed.
    pub fn build(self) -> Result<Cli, BootstrapError> {
        let logger: Box<dyn Logger> = match self.logger {
            Some(logger) => logger,
            None => Box::new(TracingLogger::install()?),
        };

        let application = AppIdentity::from_args(self.args);
        let env = self.env.unwrap_or_else(|| Arc::new(ProcessEnv));
        let config_search_path = default_search_path(&*env);

        let mut config = self
            .config
            .unwrap_or_else(|| Box::new(LayeredConfig::new(Arc::clone(&env))));
        config.set_config_name(&format!(".{}", application.name));
        config.set_env_prefix(&normalize_env_name(&application.name));

        debug!(
            name = %application.name,
            os = %application.os,
            arch = %application.arch,
            "application identity derived"
        );

        Ok(Cli {
            command_line: FlagSet::with_standard_flags(application.name.clone()),
            application,
            config_search_path,
            config_file: None,
            profile_path: None,
            debug_mode: false,
            verbose_mode: false,
            profile_mode: String::new(),
            config,
            logger,
            profiler: self
                .profiler
                .unwrap_or_else(|| Box::new(SessionRecorder::new())),
            session: None,
        })
    }
}

// ── Cli ───────────────────────────────────────────────────────────────────────

/// Bootstrap state of a command-line program.
pub struct Cli {
    application: AppIdentity,
    config_search_path: Vec<PathBuf>,
    config_file: Option<PathBuf>,
    profile_path: Option<PathBuf>,
    debug_mode: bool,
    verbose_mode: bool,
    profile_mode: String,
    command_line: FlagSet,
    config: Box<dyn ConfigStore>,
    logger: Box<dyn Logger>,
    profiler: Box<dyn Profiler>,
    session: Option<Box<dyn ProfileSession>>,
}

impl Cli {
    /// Creates a `Cli` for the running process with the production adapters.
    ///
    /// # Errors
    ///
    /// See [`CliBuilder::build`].
    pub fn new() -> Result<Self, BootstrapError> {
        let args = std::env::args_os().map(|arg| arg.to_string_lossy().into_owned());
        CliBuilder::new(args).build()
    }

    /// Runs the setup sequence.  `settings` are applied first, in order.
    ///
    /// A missing configuration file is not an error: it is logged and the
    /// sequence continues with flags, environment and defaults.
    ///
    /// # Errors
    ///
    /// Any failing step aborts the sequence; see [`BootstrapError`].
    pub fn setup(
        &mut self,
        settings: impl IntoIterator<Item = Setting>,
    ) -> Result<(), BootstrapError> {
        for setting in settings {
            self.apply(setting);
        }

        self.bind_same_name(&BOUND_FLAGS)?;

        self.command_line.parse(self.application.arguments.clone())?;
        if self.command_line.changed(CONFIG_FLAG) {
            self.config_file = self
                .command_line
                .string(CONFIG_FLAG)
                .filter(|path| !path.is_empty())
                .map(PathBuf::from);
        }
        self.config.sync_flags(self.command_line.flags());

        self.config.set_config_paths(self.config_search_path.clone());
        self.config.set_config_file(self.config_file.clone());
        self.config.automatic_env();

        match self.config.read_in_config() {
            Ok(()) => {
                if let Some(used) = self.config.config_file_used() {
                    info!(path = %used.display(), "configuration file loaded");
                    self.config_file = Some(used);
                }
            }
            Err(e) if e.is_not_found() => info!("configuration file not found"),
            Err(e) => return Err(BootstrapError::ReadConfig(e)),
        }

        self.verbose_mode = self.get_bool(VERBOSE_FLAG);
        self.debug_mode = self.get_bool(DEBUG_FLAG);
        self.profile_mode = self.command_line.string(PROFILE_FLAG).unwrap_or_default();

        self.setup_logger();
        self.check_profile_mode()
    }

    fn apply(&mut self, setting: Setting) {
        match setting {
            Setting::ConfigSearchPath(paths) => self.config_search_path = paths,
            Setting::ConfigFile(path) if path.as_os_str().is_empty() => self.config_file = None,
            Setting::ConfigFile(path) => self.config_file = Some(path),
            Setting::ProfilePath(dir) => self.profile_path = Some(dir),
        }
    }

    /// Binds each config key in `names` to the flag of the same name.
    ///
    /// Call before [`Cli::setup`] for flags added through
    /// [`Cli::command_line_mut`].
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::BindFlag`] for a name with no defined flag.
    pub fn bind_same_name(&mut self, names: &[&str]) -> Result<(), BootstrapError> {
        for name in names {
            self.config
                .bind_flag(name, self.command_line.lookup(name))
                .map_err(|source| BootstrapError::BindFlag {
                    key: name.to_string(),
                    source,
                })?;
        }
        Ok(())
    }

    fn setup_logger(&self) {
        if self.verbose_mode {
            self.set_severity(Severity::Info);
        }
        if self.debug_mode {
            self.set_severity(Severity::Debug);
        }
    }

    fn set_severity(&self, severity: Severity) {
        if !self.logger.try_set_severity(severity) {
            debug!(%severity, "logger does not support level changes");
        }
    }

    fn check_profile_mode(&self) -> Result<(), BootstrapError> {
        if self.profile_mode.is_empty() {
            return Ok(());
        }
        self.profile_mode.parse::<ProfileMode>()?;
        Ok(())
    }

    // ── Profiling ────────────────────────────────────────────────────────────

    /// Starts a profiling session of the selected mode.
    ///
    /// Does nothing when no valid mode was selected or a session is already
    /// running.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::StartProfile`] if the profiler fails.
    pub fn start_profile(&mut self) -> Result<(), BootstrapError> {
        if self.session.is_some() {
            return Ok(());
        }
        let Some(mode) = self.profile() else {
            return Ok(());
        };

        let session = self.profiler.start(mode, self.profile_path.as_deref())?;
        self.session = Some(session);
        Ok(())
    }

    /// Stops the active profiling session, if any.
    pub fn stop_profile(&mut self) {
        if let Some(session) = self.session.take() {
            session.stop();
        }
    }

    /// Whether a profiling session is running.
    pub fn is_profiling(&self) -> bool {
        self.session.is_some()
    }

    // ── Termination ──────────────────────────────────────────────────────────

    /// Stops profiling and terminates the process with `code`.
    pub fn exit(&mut self, code: i32) -> ! {
        self.stop_profile();
        std::process::exit(code)
    }

    /// Returns the value of `result`, or prints the error message (and
    /// nothing else) to stderr and exits with status 1.
    pub fn exit_on_error<T, E: fmt::Display>(&mut self, result: Result<T, E>) -> T {
        match result {
            Ok(value) => value,
            Err(e) => {
                eprintln!("{e}");
                self.exit(1)
            }
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn application(&self) -> &AppIdentity {
        &self.application
    }

    pub fn command_line(&self) -> &FlagSet {
        &self.command_line
    }

    /// Flag set, for registering application flags before [`Cli::setup`].
    pub fn command_line_mut(&mut self) -> &mut FlagSet {
        &mut self.command_line
    }

    pub fn config_search_path(&self) -> &[PathBuf] {
        &self.config_search_path
    }

    /// The config file in use: the one read during setup, or the one chosen
    /// explicitly.  `None` when neither exists.
    pub fn config_file(&self) -> Option<&PathBuf> {
        self.config_file.as_ref()
    }

    pub fn config(&self) -> &dyn ConfigStore {
        self.config.as_ref()
    }

    /// Resolves `key` through flags, environment and config file.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.config.get(key)
    }

    /// Resolves `key` as a boolean; absent or unparseable values are `false`.
    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key).is_some_and(|value| value_as_bool(&value))
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).map(|value| value_as_string(&value))
    }

    pub fn debug_mode(&self) -> bool {
        self.debug_mode
    }

    pub fn verbose_mode(&self) -> bool {
        self.verbose_mode
    }

    /// The raw `--profile` value (empty when not given).
    pub fn profile_mode(&self) -> &str {
        &self.profile_mode
    }

    /// The selected profile mode, if it is a recognized one.
    pub fn profile(&self) -> Option<ProfileMode> {
        self.profile_mode.parse().ok()
    }

    /// Positional arguments left after flag parsing.
    pub fn args(&self) -> Vec<String> {
        self.command_line.args()
    }
}

impl fmt::Debug for Cli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cli")
            .field("application", &self.application)
            .field("config_search_path", &self.config_search_path)
            .field("config_file", &self.config_file)
            .field("debug_mode", &self.debug_mode)
            .field("verbose_mode", &self.verbose_mode)
            .field("profile_mode", &self.profile_mode)
            .field("profiling", &self.session.is_some())
            .finish_non_exhaustive()
    }
}

impl Drop for Cli {
    fn drop(&mut self) {
        self.stop_profile();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

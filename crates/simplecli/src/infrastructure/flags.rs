//! Command-line flag store backed by `clap`'s builder API.
//!
//! The bootstrap defines four flags of its own (`--config`, `--debug`,
//! `--verbose`, `--profile`) and applications may register more before
//! setup runs, so the `clap::Command` is assembled at parse time from a list
//! of [`FlagSpec`]s rather than derived from a fixed struct.
//!
//! # Flag syntax
//!
//! ```text
//! --config <PATH>       string flags take a separate or `=` value
//! --debug               boolean flags may stand alone ...
//! --debug=false         ... or carry an explicit value (true/false/yes/no/1/0)
//! input.txt             anything else is collected as a positional argument
//! ```
//!
//! Every lookup reports whether the value came from the command line
//! (`changed`), which is what lets a bound config key fall back to the
//! configuration file when the flag was not given.

use std::ffi::OsString;

use clap::builder::BoolishValueParser;
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::application::config::{Flag, FlagValue};

/// `--config <path>`: explicit configuration file.
pub const CONFIG_FLAG: &str = "config";
/// `--debug`: debug output.
pub const DEBUG_FLAG: &str = "debug";
/// `--verbose`: verbose output.
pub const VERBOSE_FLAG: &str = "verbose";
/// `--profile <mode>`: profiling session kind.
pub const PROFILE_FLAG: &str = "profile";

/// Built-in `--help`; replaced when an application defines a flag of this name.
const HELP_FLAG: &str = "help";

/// Argument id collecting positional arguments.
const POSITIONAL_ID: &str = "__positional";

/// Definition of one registered flag.
#[derive(Debug, Clone)]
struct FlagSpec {
    name: String,
    help: String,
    default: FlagValue,
}

/// Named command-line flags plus the result of the last parse.
#[derive(Debug, Clone)]
pub struct FlagSet {
    program_name: String,
    specs: Vec<FlagSpec>,
    matches: Option<ArgMatches>,
}

impl FlagSet {
    /// Creates a flag set with no flags defined.
    pub fn new(program_name: impl Into<String>) -> Self {
        Self {
            program_name: program_name.into(),
            specs: Vec::new(),
            matches: None,
        }
    }

    /// Creates a flag set with the bootstrap's own flags defined.
    pub fn with_standard_flags(program_name: impl Into<String>) -> Self {
        let mut flags = Self::new(program_name);
        flags
            .add_string(CONFIG_FLAG, "", "config file")
            .add_bool(DEBUG_FLAG, false, "debug output")
            .add_bool(VERBOSE_FLAG, false, "verbose output")
            .add_string(
                PROFILE_FLAG,
                "",
                "profile mode (cpu/memory/mutex/block/trace)",
            );
        flags
    }

    /// Defines a string flag.  Redefining a name replaces the old definition.
    pub fn add_string(
        &mut self,
        name: impl Into<String>,
        default: impl Into<String>,
        help: impl Into<String>,
    ) -> &mut Self {
        self.define(FlagSpec {
            name: name.into(),
            help: help.into(),
            default: FlagValue::Str(default.into()),
        })
    }

    /// Defines a boolean flag.  Redefining a name replaces the old definition.
    pub fn add_bool(
        &mut self,
        name: impl Into<String>,
        default: bool,
        help: impl Into<String>,
    ) -> &mut Self {
        self.define(FlagSpec {
            name: name.into(),
            help: help.into(),
            default: FlagValue::Bool(default),
        })
    }

    fn is_defined(&self, name: &str) -> bool {
        self.specs.iter().any(|spec| spec.name == name)
    }

    fn define(&mut self, spec: FlagSpec) -> &mut Self {
        self.specs.retain(|existing| existing.name != spec.name);
        self.specs.push(spec);
        self
    }

    /// Parses `args` (without the program path) against the defined flags.
    ///
    /// # Errors
    ///
    /// Returns the `clap` error for unknown flags, bad values, and for
    /// `--help` (whose error kind is `DisplayHelp`).
    pub fn parse<I, S>(&mut self, args: I) -> Result<(), clap::Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString> + Clone,
    {
        let matches = self.command().try_get_matches_from(args)?;
        self.matches = Some(matches);
        Ok(())
    }

    /// Whether [`FlagSet::parse`] has succeeded at least once.
    pub fn is_parsed(&self) -> bool {
        self.matches.is_some()
    }

    /// Returns the flag named `name`, or `None` if it is not defined.
    pub fn lookup(&self, name: &str) -> Option<Flag> {
        let spec = self.specs.iter().find(|spec| spec.name == name)?;
        let (value, changed) = match &self.matches {
            Some(matches) => (
                read_value(matches, spec),
                matches.value_source(&spec.name) == Some(ValueSource::CommandLine),
            ),
            None => (spec.default.clone(), false),
        };

        Some(Flag {
            name: spec.name.clone(),
            value,
            default: spec.default.clone(),
            changed,
        })
    }

    /// Snapshots of every defined flag, in definition order.
    pub fn flags(&self) -> Vec<Flag> {
        self.specs
            .iter()
            .filter_map(|spec| self.lookup(&spec.name))
            .collect()
    }

    /// Current value of a string flag.
    pub fn string(&self, name: &str) -> Option<String> {
        match self.lookup(name)?.value {
            FlagValue::Str(s) => Some(s),
            FlagValue::Bool(_) => None,
        }
    }

    /// Current value of a boolean flag.
    pub fn bool(&self, name: &str) -> Option<bool> {
        match self.lookup(name)?.value {
            FlagValue::Bool(b) => Some(b),
            FlagValue::Str(_) => None,
        }
    }

    /// Whether `name` was given on the command line.
    pub fn changed(&self, name: &str) -> bool {
        self.lookup(name).is_some_and(|flag| flag.changed)
    }

    /// Positional arguments left after flag parsing.
    pub fn args(&self) -> Vec<String> {
        self.matches
            .as_ref()
            .and_then(|m| m.try_get_many::<String>(POSITIONAL_ID).ok().flatten())
            .map(|values| values.cloned().collect())
            .unwrap_or_default()
    }

    fn command(&self) -> Command {
        let command = Command::new(self.program_name.clone())
            .no_binary_name(true)
            .disable_help_flag(self.is_defined(HELP_FLAG))
            .args(self.specs.iter().map(build_arg));

        command.arg(
            Arg::new(POSITIONAL_ID)
                .value_name("ARGS")
                .num_args(1..)
                .action(ArgAction::Append),
        )
    }
}

fn build_arg(spec: &FlagSpec) -> Arg {
    let arg = Arg::new(spec.name.clone())
        .long(spec.name.clone())
        .help(spec.help.clone())
        .action(ArgAction::Set);

    match &spec.default {
        FlagValue::Bool(default) => arg
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true")
            .default_value(if *default { "true" } else { "false" })
            .value_parser(BoolishValueParser::new()),
        // An empty default is left unset; `read_value` falls back to it.
        FlagValue::Str(default) if default.is_empty() => arg.value_name("VALUE"),
        FlagValue::Str(default) => arg.value_name("VALUE").default_value(default.clone()),
    }
}

fn read_value(matches: &ArgMatches, spec: &FlagSpec) -> FlagValue {
    match &spec.default {
        FlagValue::Bool(default) => FlagValue::Bool(
            matches
                .try_get_one::<bool>(&spec.name)
                .ok()
                .flatten()
                .copied()
                .unwrap_or(*default),
        ),
        FlagValue::Str(default) => FlagValue::Str(
            matches
                .try_get_one::<String>(&spec.name)
                .ok()
                .flatten()
                .cloned()
                .unwrap_or_else(|| default.clone()),
        ),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

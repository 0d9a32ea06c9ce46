//! simplecli-demo: a minimal program bootstrapped with `simplecli`.
//!
//! # Usage
//!
//! ```text
//! simplecli-demo [--config <path>] [--debug] [--verbose] [--profile <mode>]
//!                [--greeting <text>] [ARGS...]
//! ```
//!
//! The greeting can also come from `SIMPLECLI_DEMO_GREETING` or from a
//! `greeting = "..."` entry in `.simplecli-demo.toml` in the current or home
//! directory.

use anyhow::Context;
use simplecli::{BootstrapError, Cli};
use tracing::info;

/// Config key (and flag) of the demo's own setting.
const GREETING_KEY: &str = "greeting";

/// Entry point.
///
/// 1. The bootstrap is built for the running process and the demo's own
///    `--greeting` flag is registered and bound.
/// 2. Setup runs.  `--help` and usage errors exit with clap's own output and
///    status; any other failure exits with status 1.
/// 3. Profiling starts when `--profile` selected a mode.
/// 4. The resolved state is logged and printed, and the process exits
///    through [`Cli::exit`] so the profiling session is closed.
fn main() -> anyhow::Result<()> {
    let mut cli = Cli::new().context("failed to create bootstrap")?;

    cli.command_line_mut()
        .add_string(GREETING_KEY, "hello", "greeting to print");
    let bound = cli.bind_same_name(&[GREETING_KEY]);
    cli.exit_on_error(bound);

    match cli.setup(Vec::new()) {
        Err(BootstrapError::ParseFlags(e)) => e.exit(),
        result => cli.exit_on_error(result),
    }

    let started = cli.start_profile();
    cli.exit_on_error(started);

    info!(
        name = %cli.application().name,
        os = %cli.application().os,
        arch = %cli.application().arch,
        "bootstrap complete"
    );

    for line in summary(&cli) {
        println!("{line}");
    }

    cli.exit(0)
}

/// Human-readable description of the resolved bootstrap state.
fn summary(cli: &Cli) -> Vec<String> {
    let config_file = cli
        .config_file()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "(none)".to_string());
    let search_path = cli
        .config_search_path()
        .iter()
        .map(|dir| dir.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let profile = match cli.profile_mode() {
        "" => "off",
        mode => mode,
    };

    vec![
        format!("{}, {}", cli.get_string(GREETING_KEY).unwrap_or_default(), cli.application().name),
        format!("config file: {config_file}"),
        format!("search path: {search_path}"),
        format!("debug: {}, verbose: {}", cli.debug_mode(), cli.verbose_mode()),
        format!("profile: {profile}"),
        format!("args: {:?}", cli.args()),
    ]
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Integration tests for the bootstrap sequence.
//!
//! These tests drive [`Cli`] through its public API with the production
//! config store and profiler, an in-memory environment, and a recording
//! logger, against configuration files written to fresh temp directories.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use simplecli::infrastructure::mock::{RecordingLogger, RecordingProfiler};
use simplecli::infrastructure::profiler::{report_path, SessionReport};
use simplecli::{BootstrapError, Cli, CliBuilder, ProfileMode, Setting, Severity, Value};
use uuid::Uuid;

// ── Helpers ───────────────────────────────────────────────────────────────────

struct Harness {
    cli: Cli,
    logger: Arc<RecordingLogger>,
    profiler: RecordingProfiler,
}

fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("simplecli_it_{}", Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn harness(args: &[&str], env_pairs: &[(&str, &str)]) -> Harness {
    let logger = Arc::new(RecordingLogger::new());
    let profiler = RecordingProfiler::new();
    let cli = CliBuilder::new(args.iter().copied())
        .env(env(env_pairs))
        .logger(Arc::clone(&logger))
        .profiler(profiler.clone())
        .build()
        .expect("build must succeed");

    Harness {
        cli,
        logger,
        profiler,
    }
}

fn search_only(dir: &Path) -> Vec<Setting> {
    vec![Setting::config_search_path([dir])]
}

// ── Config file resolution ────────────────────────────────────────────────────

#[test]
fn test_setup_without_config_file_succeeds_and_leaves_config_file_empty() {
    // Arrange
    let dir = temp_dir();
    let mut h = harness(&["/usr/local/bin/myapp"], &[]);

    // Act
    h.cli.setup(search_only(&dir)).expect("setup must succeed");

    // Assert
    assert_eq!(h.cli.config_file(), None);
    assert!(h.logger.applied().is_empty());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_setup_records_config_file_found_on_search_path() {
    // Arrange
    let empty = temp_dir();
    let dir = temp_dir();
    std::fs::write(dir.join(".myapp.toml"), "greeting = \"hello\"\n").unwrap();
    let mut h = harness(&["/usr/local/bin/myapp.exe"], &[]);

    // Act
    h.cli
        .setup([Setting::config_search_path([&empty, &dir])])
        .expect("setup must succeed");

    // Assert
    assert_eq!(h.cli.config_file(), Some(&dir.join(".myapp.toml")));
    assert_eq!(h.cli.get_string("greeting").as_deref(), Some("hello"));

    std::fs::remove_dir_all(&empty).ok();
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_missing_explicit_config_file_is_fatal_and_stays_set() {
    // Arrange
    let dir = temp_dir();
    let missing = dir.join("absent.toml");
    let mut h = harness(&["myapp"], &[]);

    // Act
    let err = h
        .cli
        .setup([Setting::config_file(&missing)])
        .unwrap_err();

    // Assert
    assert!(matches!(err, BootstrapError::ReadConfig(_)), "got {err:?}");
    assert_eq!(h.cli.config_file(), Some(&missing));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_malformed_config_file_is_fatal() {
    let dir = temp_dir();
    std::fs::write(dir.join(".myapp.toml"), "this is = = not toml").unwrap();
    let mut h = harness(&["myapp"], &[]);

    let err = h.cli.setup(search_only(&dir)).unwrap_err();

    assert!(err
        .to_string()
        .starts_with("failed to read configuration file"));
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_command_line_config_file_is_used() {
    // Arrange: JSON file passed explicitly, nothing on the search path
    let dir = temp_dir();
    let path = dir.join("settings.json");
    std::fs::write(&path, r#"{"debug": true}"#).unwrap();
    let path_arg = path.to_string_lossy().into_owned();
    let mut h = harness(&["myapp", "--config", &path_arg], &[]);

    // Act
    h.cli
        .setup([Setting::config_search_path(Vec::<PathBuf>::new())])
        .expect("setup must succeed");

    // Assert
    assert_eq!(h.cli.config_file(), Some(&path));
    assert!(h.cli.debug_mode());
    assert_eq!(h.logger.applied(), vec![Severity::Debug]);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_empty_search_path_override_finds_nothing() {
    let mut h = harness(&["myapp"], &[("HOME", "/home/someone")]);
    assert_eq!(
        h.cli.config_search_path(),
        &[PathBuf::from("."), PathBuf::from("/home/someone")]
    );

    h.cli
        .setup([Setting::config_search_path(Vec::<PathBuf>::new())])
        .expect("setup must succeed");

    assert!(h.cli.config_search_path().is_empty());
    assert_eq!(h.cli.config_file(), None);
}

// ── Value layering ────────────────────────────────────────────────────────────

#[test]
fn test_config_file_enables_debug_when_flag_not_given() {
    let dir = temp_dir();
    std::fs::write(dir.join(".myapp.toml"), "debug = true\n").unwrap();
    let mut h = harness(&["myapp"], &[]);

    h.cli.setup(search_only(&dir)).expect("setup must succeed");

    assert!(h.cli.debug_mode());
    assert_eq!(h.logger.applied(), vec![Severity::Debug]);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_command_line_flag_overrides_config_file() {
    let dir = temp_dir();
    std::fs::write(dir.join(".myapp.toml"), "verbose = true\n").unwrap();
    let mut h = harness(&["myapp", "--verbose=false"], &[]);

    h.cli.setup(search_only(&dir)).expect("setup must succeed");

    assert!(!h.cli.verbose_mode());
    assert!(h.logger.applied().is_empty());
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_environment_overlay_uses_normalized_prefix() {
    // Arrange: "my-app" normalizes to the prefix MY_APP
    let dir = temp_dir();
    std::fs::write(dir.join(".my-app.toml"), "[server]\nhost = \"file\"\n").unwrap();
    let mut h = harness(
        &["/opt/my-app.exe"],
        &[("MY_APP_SERVER_HOST", "env"), ("MY_APP_VERBOSE", "1")],
    );

    // Act
    h.cli.setup(search_only(&dir)).expect("setup must succeed");

    // Assert
    assert_eq!(h.cli.get("server.host"), Some(Value::String("env".into())));
    assert!(h.cli.verbose_mode());
    assert_eq!(h.logger.applied(), vec![Severity::Info]);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_debug_and_verbose_apply_debug_last() {
    let dir = temp_dir();
    let mut h = harness(&["myapp", "--debug", "--verbose"], &[]);

    h.cli.setup(search_only(&dir)).expect("setup must succeed");

    assert_eq!(h.logger.applied(), vec![Severity::Info, Severity::Debug]);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_user_flag_bound_before_setup_resolves_through_config() {
    // Arrange
    let dir = temp_dir();
    std::fs::write(dir.join(".myapp.toml"), "output = \"from-file.txt\"\n").unwrap();
    let mut h = harness(&["myapp", "input.txt"], &[]);
    h.cli
        .command_line_mut()
        .add_string("output", "default.txt", "output file");
    h.cli.bind_same_name(&["output"]).expect("bind must succeed");

    // Act
    h.cli.setup(search_only(&dir)).expect("setup must succeed");

    // Assert
    assert_eq!(h.cli.get_string("output").as_deref(), Some("from-file.txt"));
    assert_eq!(h.cli.args(), vec!["input.txt"]);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_binding_undefined_flag_fails() {
    let mut h = harness(&["myapp"], &[]);
    let err = h.cli.bind_same_name(&["nope"]).unwrap_err();
    assert!(matches!(err, BootstrapError::BindFlag { ref key, .. } if key == "nope"));
}

#[test]
fn test_unknown_flag_is_parse_error() {
    let dir = temp_dir();
    let mut h = harness(&["myapp", "--frobnicate"], &[]);

    let err = h.cli.setup(search_only(&dir)).unwrap_err();

    assert!(matches!(err, BootstrapError::ParseFlags(_)), "got {err:?}");
    std::fs::remove_dir_all(&dir).ok();
}

// ── Profiling ─────────────────────────────────────────────────────────────────

#[test]
fn test_unknown_profiler_fails_setup_and_starts_nothing() {
    // Arrange
    let dir = temp_dir();
    let mut h = harness(&["myapp", "--profile", "bogus"], &[]);

    // Act
    let err = h.cli.setup(search_only(&dir)).unwrap_err();

    // Assert
    assert!(err.to_string().contains("bogus"));
    assert!(!h.cli.is_profiling());
    assert!(h.profiler.started().is_empty());
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_stop_profile_without_session_is_noop() {
    let mut h = harness(&["myapp"], &[]);
    h.cli.stop_profile();
    h.cli.stop_profile();
    assert!(h.profiler.stopped().is_empty());
}

#[test]
fn test_profile_session_starts_once_and_stops_once() {
    // Arrange
    let dir = temp_dir();
    let mut h = harness(&["myapp", "--profile=block"], &[]);
    h.cli.setup(search_only(&dir)).expect("setup must succeed");

    // Act
    h.cli.start_profile().expect("start must succeed");
    h.cli.start_profile().expect("second start is a no-op");
    h.cli.stop_profile();
    h.cli.stop_profile();

    // Assert
    assert_eq!(h.profiler.started(), vec![ProfileMode::Block]);
    assert_eq!(h.profiler.stopped(), vec![ProfileMode::Block]);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_session_recorder_writes_report_to_profile_path() {
    // Arrange: production profiler
    let dir = temp_dir();
    let out = dir.join("profiles");
    let mut cli = CliBuilder::new(["myapp", "--profile", "cpu"])
        .env(env(&[]))
        .logger(RecordingLogger::new())
        .build()
        .expect("build must succeed");
    cli.setup([
        Setting::config_search_path([&dir]),
        Setting::profile_path(&out),
    ])
    .expect("setup must succeed");

    // Act
    cli.start_profile().expect("start must succeed");
    drop(cli);

    // Assert
    let content =
        std::fs::read_to_string(report_path(&out, ProfileMode::Cpu)).expect("report written");
    let report: SessionReport = toml::from_str(&content).expect("report parses");
    assert_eq!(report.mode, "cpu");

    std::fs::remove_dir_all(&dir).ok();
}

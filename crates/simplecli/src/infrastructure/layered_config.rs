//! File + environment + flag configuration store.
//!
//! [`LayeredConfig`] is the [`ConfigStore`] used in production.  It looks for
//! a file named after the application in each search directory:
//!
//! ```text
//! <dir>/.myapp.toml
//! <dir>/.myapp.json
//! ```
//!
//! and stops at the first match.  A bare `<dir>/.myapp` is never picked up by
//! the search.  When an explicit file is set it is read directly (as TOML
//! unless its extension is `.json`); a missing explicit file is an I/O error,
//! not "not found".
//!
//! # Key resolution
//!
//! Keys are case-insensitive and dots address nested tables, so `log.level`
//! matches
//!
//! ```toml
//! [Log]
//! Level = "debug"
//! ```
//!
//! With the environment overlay enabled, `log.level` is also looked up as
//! `MYAPP_LOG_LEVEL`.  See the [`crate::application::config`] module docs for
//! the order in which layers are consulted.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use simplecli_core::EnvSource;
use toml::Table;
use tracing::debug;

use crate::application::config::{ConfigError, ConfigStore, Flag, Value};

/// Extensions tried, in order, when searching for the config file.
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["toml", "json"];

/// Layered configuration store reading TOML or JSON files.
pub struct LayeredConfig {
    env: Arc<dyn EnvSource>,
    config_name: String,
    env_prefix: String,
    config_paths: Vec<PathBuf>,
    config_file: Option<PathBuf>,
    automatic_env: bool,
    /// Lower-cased key → snapshot of the flag bound to it.
    bindings: BTreeMap<String, Flag>,
    values: Table,
    used_file: Option<PathBuf>,
}

impl LayeredConfig {
    /// Creates an empty store reading environment variables from `env`.
    pub fn new(env: Arc<dyn EnvSource>) -> Self {
        Self {
            env,
            config_name: String::new(),
            env_prefix: String::new(),
            config_paths: Vec::new(),
            config_file: None,
            automatic_env: false,
            bindings: BTreeMap::new(),
            values: Table::new(),
            used_file: None,
        }
    }

    /// Environment variable consulted for `key` (already lower-cased).
    fn env_key(&self, key: &str) -> String {
        let key = key.to_uppercase().replace('.', "_");
        if self.env_prefix.is_empty() {
            key
        } else {
            format!("{}_{key}", self.env_prefix)
        }
    }

    fn locate(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.config_file {
            return Ok(path.clone());
        }

        self.config_paths
            .iter()
            .flat_map(|dir| self.candidates(dir))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| ConfigError::NotFound {
                name: self.config_name.clone(),
                search_path: self.config_paths.clone(),
            })
    }

    fn candidates(&self, dir: &Path) -> Vec<PathBuf> {
        SUPPORTED_EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{}.{ext}", self.config_name)))
            .collect()
    }
}

impl fmt::Debug for LayeredConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayeredConfig")
            .field("config_name", &self.config_name)
            .field("env_prefix", &self.env_prefix)
            .field("config_paths", &self.config_paths)
            .field("config_file", &self.config_file)
            .field("automatic_env", &self.automatic_env)
            .field("bindings", &self.bindings.keys().collect::<Vec<_>>())
            .field("used_file", &self.used_file)
            .finish_non_exhaustive()
    }
}

impl ConfigStore for LayeredConfig {
    fn set_config_name(&mut self, name: &str) {
        self.config_name = name.to_string();
    }

    fn set_env_prefix(&mut self, prefix: &str) {
        self.env_prefix = prefix.to_string();
    }

    fn set_config_paths(&mut self, paths: Vec<PathBuf>) {
        self.config_paths = paths;
    }

    fn set_config_file(&mut self, path: Option<PathBuf>) {
        self.config_file = path;
    }

    fn automatic_env(&mut self) {
        self.automatic_env = true;
    }

    fn bind_flag(&mut self, key: &str, flag: Option<Flag>) -> Result<(), ConfigError> {
        let flag = flag.ok_or_else(|| ConfigError::UnboundFlag(key.to_string()))?;
        self.bindings.insert(key.to_lowercase(), flag);
        Ok(())
    }

    fn sync_flags(&mut self, flags: Vec<Flag>) {
        for bound in self.bindings.values_mut() {
            if let Some(fresh) = flags.iter().find(|flag| flag.name == bound.name) {
                *bound = fresh.clone();
            }
        }
    }

    fn read_in_config(&mut self) -> Result<(), ConfigError> {
        let path = self.locate()?;
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;

        self.values = parse_table(&path, &content)?;
        debug!(path = %path.display(), keys = self.values.len(), "configuration file loaded");
        self.used_file = Some(path);
        Ok(())
    }

    fn config_file_used(&self) -> Option<PathBuf> {
        self.used_file.clone()
    }

    fn get(&self, key: &str) -> Option<Value> {
        let key = key.to_lowercase();
        let bound = self.bindings.get(&key);

        if let Some(flag) = bound.filter(|flag| flag.changed) {
            return Some(flag.value.to_value());
        }

        if self.automatic_env {
            if let Some(value) = self.env.non_empty_var(&self.env_key(&key)) {
                return Some(Value::String(value));
            }
        }

        if let Some(value) = lookup_path(&self.values, &key) {
            return Some(value.clone());
        }

        bound.map(|flag| flag.value.to_value())
    }
}

/// Parses `content` according to the extension of `path`; unknown or missing
/// extensions are read as TOML.
fn parse_table(path: &Path, content: &str) -> Result<Table, ConfigError> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(content).map_err(|source| ConfigError::ParseJson {
            path: path.to_path_buf(),
            source,
        })
    } else {
        toml::from_str(content).map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Walks dotted `key` through nested tables, matching names case-insensitively.
fn lookup_path<'a>(table: &'a Table, key: &str) -> Option<&'a Value> {
    let mut segments = key.split('.');
    let mut current = find_key(table, segments.next()?)?;
    for segment in segments {
        current = find_key(current.as_table()?, segment)?;
    }
    Some(current)
}

fn find_key<'a>(table: &'a Table, key: &str) -> Option<&'a Value> {
    table
        .iter()
        .find(|(name, _)| name.to_lowercase() == key)
        .map(|(_, value)| value)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use uuid::Uuid;

    use super::*;
    use crate::application::config::FlagValue;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("simplecli_test_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn store_with_env(pairs: &[(&str, &str)]) -> LayeredConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut store = LayeredConfig::new(Arc::new(env));
        store.set_config_name(".myapp");
        store.set_env_prefix("MYAPP");
        store
    }

    fn bool_flag(name: &str, value: bool, changed: bool) -> Flag {
        Flag {
            name: name.to_string(),
            value: FlagValue::Bool(value),
            default: FlagValue::Bool(false),
            changed,
        }
    }

    // ── Locating the file ─────────────────────────────────────────────────────

    #[test]
    fn test_read_reports_not_found_when_no_directory_has_the_file() {
        // Arrange
        let dir = temp_dir();
        let mut store = store_with_env(&[]);
        store.set_config_paths(vec![dir.clone()]);

        // Act
        let err = store.read_in_config().unwrap_err();

        // Assert
        assert!(err.is_not_found());
        assert_eq!(store.config_file_used(), None);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_read_with_empty_search_path_is_not_found() {
        let mut store = store_with_env(&[]);
        assert!(store.read_in_config().unwrap_err().is_not_found());
    }

    #[test]
    fn test_read_finds_toml_file_in_second_directory() {
        // Arrange: first directory empty, second holds the file
        let empty = temp_dir();
        let dir = temp_dir();
        std::fs::write(dir.join(".myapp.toml"), "greeting = \"hello\"\n").unwrap();
        let mut store = store_with_env(&[]);
        store.set_config_paths(vec![empty.clone(), dir.clone()]);

        // Act
        store.read_in_config().expect("config must load");

        // Assert
        assert_eq!(store.config_file_used(), Some(dir.join(".myapp.toml")));
        assert_eq!(store.get("greeting"), Some(Value::String("hello".into())));

        std::fs::remove_dir_all(&empty).ok();
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_earlier_directory_wins() {
        let first = temp_dir();
        let second = temp_dir();
        std::fs::write(first.join(".myapp.toml"), "origin = \"first\"\n").unwrap();
        std::fs::write(second.join(".myapp.toml"), "origin = \"second\"\n").unwrap();
        let mut store = store_with_env(&[]);
        store.set_config_paths(vec![first.clone(), second.clone()]);

        store.read_in_config().expect("config must load");

        assert_eq!(store.get("origin"), Some(Value::String("first".into())));

        std::fs::remove_dir_all(&first).ok();
        std::fs::remove_dir_all(&second).ok();
    }

    #[test]
    fn test_read_json_file() {
        let dir = temp_dir();
        std::fs::write(dir.join(".myapp.json"), r#"{"server": {"port": 8080}}"#).unwrap();
        let mut store = store_with_env(&[]);
        store.set_config_paths(vec![dir.clone()]);

        store.read_in_config().expect("config must load");

        assert_eq!(store.get("server.port"), Some(Value::Integer(8080)));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_search_ignores_extensionless_file() {
        // Arrange: a bare `.myapp` that is not TOML at all
        let dir = temp_dir();
        std::fs::write(dir.join(".myapp"), "not = = toml").unwrap();
        let mut store = store_with_env(&[]);
        store.set_config_paths(vec![dir.clone()]);

        // Act
        let err = store.read_in_config().unwrap_err();

        // Assert
        assert!(err.is_not_found(), "got {err:?}");
        assert_eq!(store.config_file_used(), None);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_explicit_extensionless_file_is_read_as_toml() {
        let dir = temp_dir();
        let path = dir.join(".myapp");
        std::fs::write(&path, "debug = true\n").unwrap();
        let mut store = store_with_env(&[]);
        store.set_config_file(Some(path.clone()));

        store.read_in_config().expect("config must load");

        assert_eq!(store.get("debug"), Some(Value::Boolean(true)));
        assert_eq!(store.config_file_used(), Some(path));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_explicit_file_bypasses_search() {
        let dir = temp_dir();
        let path = dir.join("custom.toml");
        std::fs::write(&path, "name = \"explicit\"\n").unwrap();
        let mut store = store_with_env(&[]);
        store.set_config_paths(Vec::new());
        store.set_config_file(Some(path.clone()));

        store.read_in_config().expect("config must load");

        assert_eq!(store.config_file_used(), Some(path));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_explicit_file_is_io_error_not_not_found() {
        let mut store = store_with_env(&[]);
        store.set_config_file(Some(PathBuf::from("/nonexistent/path/that/cannot/exist.toml")));

        let err = store.read_in_config().unwrap_err();

        assert!(matches!(err, ConfigError::Io { .. }), "got {err:?}");
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let dir = temp_dir();
        std::fs::write(dir.join(".myapp.toml"), "[[[ not valid toml").unwrap();
        let mut store = store_with_env(&[]);
        store.set_config_paths(vec![dir.clone()]);

        let err = store.read_in_config().unwrap_err();

        assert!(matches!(err, ConfigError::ParseToml { .. }), "got {err:?}");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let dir = temp_dir();
        std::fs::write(dir.join(".myapp.json"), "{ nope").unwrap();
        let mut store = store_with_env(&[]);
        store.set_config_paths(vec![dir.clone()]);

        let err = store.read_in_config().unwrap_err();

        assert!(matches!(err, ConfigError::ParseJson { .. }), "got {err:?}");
        std::fs::remove_dir_all(&dir).ok();
    }

    // ── Key resolution ────────────────────────────────────────────────────────

    #[test]
    fn test_nested_keys_are_case_insensitive() {
        let mut store = store_with_env(&[]);
        store.values = toml::from_str("[Log]\nLevel = \"debug\"\n").unwrap();

        assert_eq!(store.get("log.level"), Some(Value::String("debug".into())));
        assert_eq!(store.get("LOG.LEVEL"), Some(Value::String("debug".into())));
    }

    #[test]
    fn test_missing_key_is_none() {
        let store = store_with_env(&[]);
        assert_eq!(store.get("absent"), None);
    }

    #[test]
    fn test_env_overlay_requires_automatic_env() {
        let mut store = store_with_env(&[("MYAPP_GREETING", "from-env")]);
        assert_eq!(store.get("greeting"), None);

        store.automatic_env();
        assert_eq!(store.get("greeting"), Some(Value::String("from-env".into())));
    }

    #[test]
    fn test_env_overlay_maps_dots_to_underscores() {
        let mut store = store_with_env(&[("MYAPP_LOG_LEVEL", "info")]);
        store.automatic_env();
        assert_eq!(store.get("log.level"), Some(Value::String("info".into())));
    }

    #[test]
    fn test_env_overlay_beats_file_value() {
        let mut store = store_with_env(&[("MYAPP_GREETING", "from-env")]);
        store.values = toml::from_str("greeting = \"from-file\"\n").unwrap();
        store.automatic_env();

        assert_eq!(store.get("greeting"), Some(Value::String("from-env".into())));
    }

    #[test]
    fn test_empty_env_value_is_ignored() {
        let mut store = store_with_env(&[("MYAPP_GREETING", "")]);
        store.values = toml::from_str("greeting = \"from-file\"\n").unwrap();
        store.automatic_env();

        assert_eq!(store.get("greeting"), Some(Value::String("from-file".into())));
    }

    #[test]
    fn test_env_key_without_prefix() {
        let mut store = store_with_env(&[("GREETING", "bare")]);
        store.set_env_prefix("");
        store.automatic_env();
        assert_eq!(store.get("greeting"), Some(Value::String("bare".into())));
    }

    // ── Flag binding ──────────────────────────────────────────────────────────

    #[test]
    fn test_bind_missing_flag_is_error() {
        let mut store = store_with_env(&[]);
        let err = store.bind_flag("debug", None).unwrap_err();
        assert!(matches!(err, ConfigError::UnboundFlag(ref key) if key == "debug"));
    }

    #[test]
    fn test_unchanged_bound_flag_yields_to_file_value() {
        // Arrange: file says debug = true, flag left at its default
        let mut store = store_with_env(&[]);
        store.values = toml::from_str("debug = true\n").unwrap();
        store
            .bind_flag("debug", Some(bool_flag("debug", false, false)))
            .unwrap();

        // Act / Assert
        assert_eq!(store.get("debug"), Some(Value::Boolean(true)));
    }

    #[test]
    fn test_changed_bound_flag_beats_env_and_file() {
        let mut store = store_with_env(&[("MYAPP_DEBUG", "true")]);
        store.values = toml::from_str("debug = true\n").unwrap();
        store.automatic_env();
        store
            .bind_flag("debug", Some(bool_flag("debug", false, false)))
            .unwrap();

        store.sync_flags(vec![bool_flag("debug", false, true)]);

        assert_eq!(store.get("debug"), Some(Value::Boolean(false)));
    }

    #[test]
    fn test_bound_flag_default_is_last_resort() {
        let mut store = store_with_env(&[]);
        store
            .bind_flag("verbose", Some(bool_flag("verbose", false, false)))
            .unwrap();

        assert_eq!(store.get("verbose"), Some(Value::Boolean(false)));
    }

    #[test]
    fn test_sync_ignores_unbound_flags() {
        let mut store = store_with_env(&[]);
        store.sync_flags(vec![bool_flag("debug", true, true)]);
        assert_eq!(store.get("debug"), None);
    }
}

//! Application identity derived from the invocation path.
//!
//! A program learns what it is called by looking at the first element of its
//! argument vector.  [`AppIdentity`] captures that once, at start-up, together
//! with the remaining arguments and the platform the process is running on.
//!
//! The argument vector is always passed in explicitly (see
//! [`AppIdentity::from_args`]) rather than read from `std::env::args()` here,
//! so the derivation is deterministic under test.

use std::path::Path;

/// Who the running program is, as far as the bootstrap is concerned.
///
/// Computed once and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppIdentity {
    /// Executable basename without its extension (`myapp` for `/bin/myapp.exe`).
    pub name: String,
    /// The raw executable path exactly as invoked.
    pub program_name: String,
    /// Every argument after the executable path, in order.
    pub arguments: Vec<String>,
    /// Directory portion of the executable path (`"."` when there is none).
    pub directory: String,
    /// Host operating system identifier (`std::env::consts::OS`).
    pub os: String,
    /// Host architecture identifier (`std::env::consts::ARCH`).
    pub arch: String,
}

impl AppIdentity {
    /// Derives the identity from a program path and its arguments.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use simplecli_core::AppIdentity;
    ///
    /// let id = AppIdentity::derive("/usr/local/bin/myapp.exe", vec!["--debug".into()]);
    /// assert_eq!(id.name, "myapp");
    /// assert_eq!(id.directory, "/usr/local/bin");
    /// assert_eq!(id.arguments, vec!["--debug".to_string()]);
    /// ```
    pub fn derive(program_name: impl Into<String>, arguments: Vec<String>) -> Self {
        let program_name = program_name.into();
        let base = base_name(&program_name);

        Self {
            name: strip_extension(&base).to_string(),
            directory: directory_of(&program_name),
            program_name,
            arguments,
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
        }
    }

    /// Derives the identity from a full argument vector whose first element
    /// is the executable path.
    ///
    /// An empty vector yields an identity with an empty name.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);
        let program_name = args.next().unwrap_or_default();
        Self::derive(program_name, args.collect())
    }
}

/// Last path component; the path itself when it has none (e.g. `/`).
fn base_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

/// Removes everything from the last `.` onwards.
fn strip_extension(base: &str) -> &str {
    match base.rfind('.') {
        Some(idx) => &base[..idx],
        None => base,
    }
}

/// Everything up to the last separator, lexically cleaned.
fn directory_of(path: &str) -> String {
    let dir = match path.rfind(std::path::is_separator) {
        Some(idx) => &path[..=idx],
        None => "",
    };
    clean(dir)
}

/// Drops empty and `.` components and folds `..` into its parent without
/// touching the file system.  An empty result is `"."`.
fn clean(path: &str) -> String {
    let rooted = path.starts_with(std::path::is_separator);
    let mut parts: Vec<&str> = Vec::new();

    for part in path.split(std::path::is_separator) {
        match part {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                // `..` above the root is the root
                _ if rooted => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let separator = std::path::MAIN_SEPARATOR.to_string();
    let joined = parts.join(&separator);
    if rooted {
        format!("{separator}{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

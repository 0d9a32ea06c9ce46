//! Environment-variable name normalization.
//!
//! Environment variable names are conventionally limited to upper-case ASCII
//! letters, digits and `_`, and must not begin with a digit.  Application
//! names are not so tidy (`my-app`, `0install`, `ツール`), so the prefix used
//! for configuration overlays is derived with [`normalize_env_name`].

/// Converts `name` into a string usable as an environment-variable prefix.
///
/// - Each character is upper-cased.  A character whose upper-case form is
///   more than one character (such as `ß`) is left alone so the output keeps
///   one character per input character.
/// - Every character outside `A`-`Z`, `0`-`9` and `_` becomes `_`.  Multi-byte
///   characters become exactly one `_` each.
/// - A leading digit becomes `_`.
///
/// The result is idempotent: normalizing it again returns it unchanged.
///
/// # Examples
///
/// ```rust
/// use simplecli_core::normalize_env_name;
///
/// assert_eq!(normalize_env_name("test-test"), "TEST_TEST");
/// assert_eq!(normalize_env_name("0test-test"), "_TEST_TEST");
/// assert_eq!(normalize_env_name(""), "");
/// ```
pub fn normalize_env_name(name: &str) -> String {
    let mut normalized: String = name
        .chars()
        .map(upper_single)
        .map(|c| if is_env_char(c) { c } else { '_' })
        .collect();

    if normalized.starts_with(|c: char| c.is_ascii_digit()) {
        normalized.replace_range(..1, "_");
    }

    normalized
}

fn upper_single(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

fn is_env_char(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_'
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Default configuration search path.
//!
//! The search path is the ordered list of directories consulted when looking
//! for the application's configuration file.  The current directory always
//! comes first so a project-local file wins over one in the user's home.

use std::path::PathBuf;

use crate::env::EnvSource;

/// Home-directory variables appended to the search path, in checked order.
///
/// `HOME` covers Unix-like systems; `USERPROFILE` covers Windows.
pub const HOME_VARIABLES: [&str; 2] = ["HOME", "USERPROFILE"];

/// Builds the default search path: `"."` followed by the value of each
/// [`HOME_VARIABLES`] entry that is set to a non-empty string.
///
/// # Examples
///
/// ```rust
/// use std::collections::HashMap;
/// use std::path::PathBuf;
/// use simplecli_core::default_search_path;
///
/// let env: HashMap<String, String> = HashMap::new();
/// assert_eq!(default_search_path(&env), vec![PathBuf::from(".")]);
/// ```
pub fn default_search_path(env: &dyn EnvSource) -> Vec<PathBuf> {
    std::iter::once(PathBuf::from("."))
        .chain(
            HOME_VARIABLES
                .iter()
                .filter_map(|name| env.non_empty_var(name))
                .map(PathBuf::from),
        )
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

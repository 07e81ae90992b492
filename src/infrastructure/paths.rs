//! Path utilities for log and snapshot locations.
//!
//! Handles tilde expansion and the default data directory. Resolution reads the
//! environment on every call; nothing is cached.

use std::path::PathBuf;

/// Returns the data directory for rowselect snapshots and logs.
///
/// `$XDG_STATE_HOME/rowselect` when set, else `~/.local/state/rowselect`, else
/// `./.rowselect` when no home directory is known.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    if let Some(state_home) = std::env::var_os("XDG_STATE_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(state_home).join("rowselect");
    }
    home_dir().map_or_else(
        || PathBuf::from(".rowselect"),
        |home| home.join(".local").join("state").join("rowselect"),
    )
}

/// Default snapshot file inside [`get_data_dir`].
#[must_use]
pub fn default_state_file() -> PathBuf {
    get_data_dir().join("state.json")
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading tilde, or when no home directory is known, are
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use rowselect::infrastructure::expand_tilde;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_tilde("/absolute/path"), PathBuf::from("/absolute/path"));
/// assert_eq!(expand_tilde("relative/file.json"), PathBuf::from("relative/file.json"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let Some(home) = home_dir() else {
        return PathBuf::from(path);
    };
    if path == "~" {
        home
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(path)
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "costline";
const APPLICATION: &str = "costline";

/// Log file name inside the cache directory.
const LOG_FILE: &str = "costline-tui.log";

/// Previous session's log, kept for one restart.
const PREVIOUS_LOG_FILE: &str = "costline-tui.previous.log";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Get the cache directory for logs.
///
/// - Linux: `$XDG_CACHE_HOME/costline` or `~/.cache/costline`
/// - macOS: `~/Library/Caches/dev.costline.costline`
/// - Windows: `C:\Users\<User>\AppData\Local\costline\costline\cache`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Get the path to the current log file.
pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(LOG_FILE))
}

/// Move the last session's log aside and make sure the cache directory
/// exists. Call before creating the new log file.
pub fn prepare_log_dir() -> Option<PathBuf> {
    let cache = cache_dir()?;
    fs::create_dir_all(&cache).ok()?;
    rotate(&cache);
    Some(cache.join(LOG_FILE))
}

fn rotate(cache: &Path) {
    let latest = cache.join(LOG_FILE);
    if latest.exists() {
        let _ = fs::rename(&latest, cache.join(PREVIOUS_LOG_FILE));
    }
}

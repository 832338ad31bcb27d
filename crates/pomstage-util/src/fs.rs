use std::path::{Path, PathBuf};

/// Walk up from `start` looking for a file named `filename`.
/// Returns the path to the file itself, or `None`.
pub fn find_in_ancestors(start: &Path, filename: &str) -> Option<PathBuf> {
    let mut current = start;
    loop {
        let candidate = current.join(filename);
        if candidate.is_file() {
            return Some(candidate);
        }
        current = current.parent()?;
    }
}

/// The current user's home directory, from `HOME` or `USERPROFILE`.
pub fn home_dir() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home)
}

/// Expand a leading `~` or `${user.home}` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    let home = home_dir();
    if let Some(rest) = path.strip_prefix("${user.home}") {
        return join_rest(home, rest);
    }
    if path == "~" {
        return home;
    }
    if let Some(rest) = path.strip_prefix("~/") {
        return home.join(rest);
    }
    PathBuf::from(path)
}

fn join_rest(base: PathBuf, rest: &str) -> PathBuf {
    let rest = rest.trim_start_matches(['/', '\\']);
    if rest.is_empty() {
        base
    } else {
        base.join(rest)
    }
}

/// The user-level Maven settings file (`~/.m2/settings.xml`), if present.
pub fn user_settings_path() -> Option<PathBuf> {
    let path = home_dir().join(".m2").join("settings.xml");
    if path.is_file() {
        tracing::debug!("found user settings at {}", path.display());
        Some(path)
    } else {
        None
    }
}

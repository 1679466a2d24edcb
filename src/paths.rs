//! Path resolution for user-supplied file paths.
//!
//! Paths in a definition document are written by hand: `~/docs/a.pdf`,
//! `../files/b.txt` or absolute paths. They are resolved against the home
//! directory and the current working directory of the resolving process.

use crate::error::ApiError;
use std::path::{Component, Path, PathBuf};

/// Home directory of the current user.
pub fn home_dir() -> Result<PathBuf, ApiError> {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or_else(|| ApiError::PathResolution {
            path: "~".to_string(),
            reason: "failed to get home directory".to_string(),
        })
}

/// Resolve a raw path to an absolute, lexically cleaned path.
///
/// Resolution rules:
/// 1. A leading `~` is replaced by the home directory (`~/a` and `~a` both
///    join the remainder onto home)
/// 2. Relative paths are joined onto the current working directory
/// 3. `.` components are dropped and `..` pops the previous component
///
/// The filesystem is not consulted; the path does not need to exist.
pub fn resolve_path(raw: &str) -> Result<PathBuf, ApiError> {
    let expanded = match raw.strip_prefix('~') {
        Some(rest) => home_dir()?.join(rest.trim_start_matches(std::path::is_separator)),
        None => PathBuf::from(raw),
    };

    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        let cwd = std::env::current_dir().map_err(|e| ApiError::PathResolution {
            path: raw.to_string(),
            reason: format!("failed to get absolute path: {}", e),
        })?;
        cwd.join(expanded)
    };

    Ok(dunce::simplified(&clean(&absolute)).to_path_buf())
}

/// Last element of a raw path string, as used for wire filenames.
///
/// Trailing separators are ignored. An empty path yields `.` and a path made
/// only of separators yields the separator itself.
pub fn basename(raw: &str) -> String {
    if raw.is_empty() {
        return ".".to_string();
    }
    let trimmed = raw.trim_end_matches(std::path::is_separator);
    if trimmed.is_empty() {
        return std::path::MAIN_SEPARATOR.to_string();
    }
    match trimmed.rfind(std::path::is_separator) {
        Some(index) => trimmed[index + 1..].to_string(),
        None => trimmed.to_string(),
    }
}

fn clean(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => cleaned.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(cleaned.components().next_back(), Some(Component::Normal(_))) {
                    cleaned.pop();
                }
            }
            Component::Normal(name) => cleaned.push(name),
        }
    }
    cleaned
}

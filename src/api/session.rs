//! Session token persistence.
//!
//! The access token returned by login is kept in `~/.sia/.access_token`.

use crate::error::ApiError;
use crate::paths::home_dir;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const TOKEN_DIR: &str = ".sia";
pub const TOKEN_FILENAME: &str = ".access_token";

/// Access token sent as the `access_token` cookie.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// File-backed token store.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Store at the default location under the home directory.
    pub fn new() -> Result<Self, ApiError> {
        Ok(Self::at(home_dir()?.join(TOKEN_DIR).join(TOKEN_FILENAME)))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist a token, creating the directory if needed.
    pub fn save(&self, token: &str) -> Result<(), ApiError> {
        if let Some(dir) = self.path.parent() {
            if !dir.exists() {
                create_private_dir(dir).map_err(|e| {
                    ApiError::ConfigError(format!(
                        "failed to create directory {}: {}",
                        dir.display(),
                        e
                    ))
                })?;
            }
        }
        let mut file = open_private_file(&self.path).map_err(|e| {
            ApiError::ConfigError(format!("failed to save access token: {}", e))
        })?;
        file.write_all(token.as_bytes())?;
        tracing::debug!(path = %self.path.display(), "Saved access token");
        Ok(())
    }

    /// Load the stored token; a missing or blank token means login is required.
    pub fn load(&self) -> Result<AccessToken, ApiError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if !content.trim().is_empty() => {
                Ok(AccessToken::new(content.trim().to_string()))
            }
            Ok(_) => Err(ApiError::LoginRequired),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ApiError::LoginRequired),
            Err(e) => Err(ApiError::Io(e)),
        }
    }

    /// Remove the stored token. Requires an existing session.
    pub fn clear(&self) -> Result<(), ApiError> {
        self.load()?;
        std::fs::remove_file(&self.path).map_err(|e| {
            ApiError::ConfigError(format!("failed to delete access token: {}", e))
        })?;
        Ok(())
    }
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    std::fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)
}

#[cfg(unix)]
fn open_private_file(path: &Path) -> std::io::Result<std::fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private_file(path: &Path) -> std::io::Result<std::fs::File> {
    std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

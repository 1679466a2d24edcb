//! Admin session and password workflows.

use crate::api::{AgentBackend, TokenStore};
use crate::error::ApiError;
use reqwest::Url;

pub struct AuthService;

impl AuthService {
    /// Log in and persist the returned token.
    pub async fn login(
        backend: &dyn AgentBackend,
        tokens: &TokenStore,
        password: &str,
    ) -> Result<(), ApiError> {
        let token = backend.login(password).await?;
        tokens.save(&token)?;
        tracing::info!("Logged in");
        Ok(())
    }

    /// Forget the stored token. Fails with `LoginRequired` when there is none.
    pub fn logout(tokens: &TokenStore) -> Result<(), ApiError> {
        tokens.clear()?;
        tracing::info!("Logged out");
        Ok(())
    }

    /// Callers check the server with [`ensure_localhost`] before asking for
    /// passwords.
    pub async fn set_admin_password(
        backend: &dyn AgentBackend,
        password: &str,
        repeat: &str,
    ) -> Result<(), ApiError> {
        ensure_match(password, repeat)?;
        backend.set_admin_password(password).await
    }

    pub async fn change_admin_password(
        backend: &dyn AgentBackend,
        tokens: &TokenStore,
        current: &str,
        new_password: &str,
        repeat: &str,
    ) -> Result<(), ApiError> {
        ensure_match(new_password, repeat)?;
        let token = tokens.load()?;
        backend
            .change_admin_password(&token, current, new_password)
            .await
    }
}

/// Password administration is only allowed against `http(s)://localhost[:port]`.
pub fn ensure_localhost(server_url: &str) -> Result<(), ApiError> {
    let denied = || {
        ApiError::ConfigError("Access is permitted only from server console".to_string())
    };
    let url = Url::parse(server_url).map_err(|_| denied())?;
    let local = matches!(url.scheme(), "http" | "https")
        && url.host_str() == Some("localhost")
        && url.username().is_empty()
        && url.path() == "/"
        && url.query().is_none()
        && url.fragment().is_none();
    if local {
        Ok(())
    } else {
        Err(denied())
    }
}

fn ensure_match(password: &str, repeat: &str) -> Result<(), ApiError> {
    if password != repeat {
        return Err(ApiError::ConfigError("Passwords do not match.".to_string()));
    }
    Ok(())
}

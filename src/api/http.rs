//! HTTP implementation of [`AgentBackend`] using `reqwest`.

use super::backend::{AgentBackend, PushAction};
use super::session::AccessToken;
use super::types::{AgentResponse, ChatRequest, ChatResponse, ErrorDetail};
use crate::config::SiaConfig;
use crate::error::ApiError;
use crate::push::PushPayload;
use async_trait::async_trait;
use reqwest::header::COOKIE;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;

const API_KEY_HEADER: &str = "X-Requested-With";
const ACCESS_TOKEN_COOKIE: &str = "access_token";

pub struct HttpBackend {
    client: Client,
    server_url: String,
    api_key: String,
}

impl HttpBackend {
    pub fn new(server_url: &str, api_key: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            server_url: server_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn from_config(config: &SiaConfig) -> Result<Self, ApiError> {
        let (server_url, api_key) = config.require_server()?;
        Self::new(server_url, api_key, Duration::from_secs(config.timeout_secs))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.server_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header(API_KEY_HEADER, &self.api_key)
    }

    fn authed(&self, method: Method, path: &str, token: &AccessToken) -> RequestBuilder {
        self.request(method, path).header(
            COOKIE,
            format!("{}={}", ACCESS_TOKEN_COOKIE, token.as_str()),
        )
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await?;
        tracing::debug!(
            url = %response.url(),
            status = response.status().as_u16(),
            "Received response"
        );
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Err(rejection(status, &body))
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(builder).await?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| {
            ApiError::Serialization(format!("Failed to unmarshal response body: {}", e))
        })
    }
}

/// Map a non-2xx answer to `ServerRejected`, keeping the server detail verbatim.
pub fn rejection(status: u16, body: &[u8]) -> ApiError {
    let detail = serde_json::from_slice::<ErrorDetail>(body)
        .map(|d| d.detail)
        .unwrap_or_else(|_| "Server error".to_string());
    ApiError::ServerRejected { status, detail }
}

fn agent_path(name: &str) -> String {
    format!("/api/agents/{}", name)
}

#[async_trait]
impl AgentBackend for HttpBackend {
    async fn login(&self, password: &str) -> Result<String, ApiError> {
        let response = self
            .send(
                self.request(Method::POST, "/api/auth/login")
                    .json(&json!({ "password": password })),
            )
            .await?;
        let token = response
            .cookies()
            .find(|c| c.name() == ACCESS_TOKEN_COOKIE)
            .map(|c| c.value().to_string())
            .unwrap_or_default();
        if token.is_empty() {
            return Err(ApiError::Transport(
                "No access token found in login response".to_string(),
            ));
        }
        Ok(token)
    }

    async fn set_admin_password(&self, password: &str) -> Result<(), ApiError> {
        self.send(
            self.request(Method::POST, "/api/auth/set-admin-password")
                .json(&json!({ "password": password })),
        )
        .await?;
        Ok(())
    }

    async fn change_admin_password(
        &self,
        token: &AccessToken,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        self.send(
            self.authed(Method::POST, "/api/auth/update-admin-password", token)
                .json(&json!({
                    "current_password": current_password,
                    "new_password": new_password,
                })),
        )
        .await?;
        Ok(())
    }

    async fn list_agents(&self, token: &AccessToken) -> Result<Vec<AgentResponse>, ApiError> {
        let agents: Option<Vec<AgentResponse>> = self
            .send_json(self.authed(Method::GET, "/api/agents/", token))
            .await?;
        Ok(agents.unwrap_or_default())
    }

    async fn get_agent(&self, token: &AccessToken, name: &str) -> Result<AgentResponse, ApiError> {
        self.send_json(self.authed(Method::GET, &agent_path(name), token))
            .await
    }

    async fn delete_agent(&self, token: &AccessToken, name: &str) -> Result<(), ApiError> {
        self.send(self.authed(Method::DELETE, &agent_path(name), token))
            .await?;
        Ok(())
    }

    async fn push_agent(
        &self,
        token: &AccessToken,
        action: &PushAction,
        payload: PushPayload,
    ) -> Result<AgentResponse, ApiError> {
        let builder = match action {
            PushAction::Create => self.authed(Method::POST, "/api/agents/", token),
            PushAction::Update { name } => self.authed(Method::PUT, &agent_path(name), token),
        };
        self.send_json(builder.multipart(payload.into_form()?))
            .await
    }

    async fn chat(
        &self,
        agent_name: &str,
        request: &ChatRequest,
    ) -> Result<ChatResponse, ApiError> {
        self.send_json(
            self.request(Method::POST, &format!("/api/chat/{}", agent_name))
                .json(request),
        )
        .await
    }
}

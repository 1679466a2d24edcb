//! Backend port: the REST operations the CLI needs from a SIA server.

use super::session::AccessToken;
use super::types::{AgentResponse, ChatRequest, ChatResponse};
use crate::error::ApiError;
use crate::push::PushPayload;
use async_trait::async_trait;

/// Whether a push creates a new agent or updates an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushAction {
    Create,
    Update { name: String },
}

impl PushAction {
    /// Parse the `--action` value of `agent push`.
    pub fn parse(action: &str, name: &str) -> Result<Self, ApiError> {
        match action {
            "create" => Ok(PushAction::Create),
            "update" => Ok(PushAction::Update {
                name: name.to_string(),
            }),
            _ => Err(ApiError::ConfigError(
                "Action must be either 'create' or 'update'.".to_string(),
            )),
        }
    }
}

/// Operations on a SIA server. Implementations map non-2xx answers to
/// `ApiError::ServerRejected` with the server-supplied detail.
#[async_trait]
pub trait AgentBackend: Send + Sync {
    /// Log in as admin; returns the session access token.
    async fn login(&self, password: &str) -> Result<String, ApiError>;

    async fn set_admin_password(&self, password: &str) -> Result<(), ApiError>;

    async fn change_admin_password(
        &self,
        token: &AccessToken,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ApiError>;

    async fn list_agents(&self, token: &AccessToken) -> Result<Vec<AgentResponse>, ApiError>;

    async fn get_agent(&self, token: &AccessToken, name: &str) -> Result<AgentResponse, ApiError>;

    async fn delete_agent(&self, token: &AccessToken, name: &str) -> Result<(), ApiError>;

    /// Send a push payload as built by `push::build_push_payload`.
    async fn push_agent(
        &self,
        token: &AccessToken,
        action: &PushAction,
        payload: PushPayload,
    ) -> Result<AgentResponse, ApiError>;

    async fn chat(&self, agent_name: &str, request: &ChatRequest)
        -> Result<ChatResponse, ApiError>;
}

//! Wire types exchanged with the SIA server.

use crate::definition::{null_as_default, AgentDefinition, ExistingFileRef};
use serde::{Deserialize, Serialize};

/// Agent resource as returned by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentResponse {
    #[serde(rename = "ID", default)]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub instructions: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub welcome_message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub suggested_prompts: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub files: Vec<ExistingFileRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub embeddings_status: String,
    /// Unix seconds.
    #[serde(default)]
    pub created_on: i64,
    /// Unix seconds.
    #[serde(default)]
    pub updated_on: i64,
}

impl AgentResponse {
    /// Definition carrying the descriptive fields of this agent and no file
    /// changes.
    pub fn definition_shell(&self) -> AgentDefinition {
        AgentDefinition::shell(
            self.name.clone(),
            self.instructions.clone(),
            self.welcome_message.clone(),
            self.suggested_prompts.clone(),
        )
    }
}

/// Error body of a non-2xx response.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub prompt: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: String,
}

//! Interactive chat with an agent.

use crate::api::{AgentBackend, ChatMessage, ChatRequest, ChatResponse};
use crate::error::ApiError;

pub const QUIT_COMMAND: &str = "q";

/// Chat history for one session. Only the operator's prompts are kept; the
/// server receives the full list with every new prompt.
#[derive(Debug, Clone)]
pub struct ChatSession {
    agent_name: String,
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new(agent_name: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            messages: Vec::new(),
        }
    }

    pub fn agent_name(&self) -> &str {
        &self.agent_name
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_quit(input: &str) -> bool {
        input.trim() == QUIT_COMMAND
    }

    /// Record `prompt` and ask the agent for a reply.
    pub async fn send(
        &mut self,
        backend: &dyn AgentBackend,
        prompt: &str,
    ) -> Result<ChatResponse, ApiError> {
        let prompt = prompt.trim();
        self.messages.push(ChatMessage::user(prompt));
        let request = ChatRequest {
            prompt: prompt.to_string(),
            messages: self.messages.clone(),
        };
        tracing::debug!(
            agent = %self.agent_name,
            history = self.messages.len(),
            "Sending chat prompt"
        );
        backend.chat(&self.agent_name, &request).await
    }
}

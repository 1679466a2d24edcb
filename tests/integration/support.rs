//! In-memory backend and push payload helpers shared by the integration tests.

use async_trait::async_trait;
use sia::api::{
    AccessToken, AgentBackend, AgentResponse, ChatRequest, ChatResponse, PushAction,
};
use sia::definition::ExistingFileRef;
use sia::error::ApiError;
use sia::push::{PartBody, PushPayload};
use std::sync::Mutex;

pub const TOKEN: &str = "tok-1";
pub const PASSWORD: &str = "admin-pass";

#[derive(Default)]
struct State {
    agents: Vec<AgentResponse>,
    pushes: Vec<(PushAction, PushPayload)>,
    chats: Vec<ChatRequest>,
    deleted: Vec<String>,
}

/// Backend holding agents in memory and recording every push and chat.
#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<State>,
}

impl FakeBackend {
    pub fn with_agents(agents: Vec<AgentResponse>) -> Self {
        Self {
            state: Mutex::new(State {
                agents,
                ..Default::default()
            }),
        }
    }

    pub fn pushes(&self) -> Vec<(PushAction, PushPayload)> {
        self.state.lock().unwrap().pushes.clone()
    }

    pub fn chats(&self) -> Vec<ChatRequest> {
        self.state.lock().unwrap().chats.clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.state.lock().unwrap().deleted.clone()
    }

    fn authorize(token: &AccessToken) -> Result<(), ApiError> {
        if token.as_str() == TOKEN {
            Ok(())
        } else {
            Err(rejected(401, "Not authenticated"))
        }
    }
}

pub fn rejected(status: u16, detail: &str) -> ApiError {
    ApiError::ServerRejected {
        status,
        detail: detail.to_string(),
    }
}

pub fn agent(name: &str, files: &[&str]) -> AgentResponse {
    AgentResponse {
        id: 1,
        name: name.to_string(),
        instructions: "Answer questions about the handbook.\nKeep it short.\n".to_string(),
        welcome_message: "Welcome!".to_string(),
        suggested_prompts: vec!["What can you do?".to_string()],
        files: files
            .iter()
            .map(|f| ExistingFileRef {
                filename: f.to_string(),
                meta: Default::default(),
            })
            .collect(),
        status: "active".to_string(),
        embeddings_status: "done".to_string(),
        created_on: 1_700_000_000,
        updated_on: 1_700_000_000,
    }
}

#[async_trait]
impl AgentBackend for FakeBackend {
    async fn login(&self, password: &str) -> Result<String, ApiError> {
        if password == PASSWORD {
            Ok(TOKEN.to_string())
        } else {
            Err(rejected(401, "Invalid password"))
        }
    }

    async fn set_admin_password(&self, _password: &str) -> Result<(), ApiError> {
        Ok(())
    }

    async fn change_admin_password(
        &self,
        token: &AccessToken,
        current_password: &str,
        _new_password: &str,
    ) -> Result<(), ApiError> {
        Self::authorize(token)?;
        if current_password != PASSWORD {
            return Err(rejected(400, "Current password is incorrect"));
        }
        Ok(())
    }

    async fn list_agents(&self, token: &AccessToken) -> Result<Vec<AgentResponse>, ApiError> {
        Self::authorize(token)?;
        Ok(self.state.lock().unwrap().agents.clone())
    }

    async fn get_agent(&self, token: &AccessToken, name: &str) -> Result<AgentResponse, ApiError> {
        Self::authorize(token)?;
        self.state
            .lock()
            .unwrap()
            .agents
            .iter()
            .find(|a| a.name == name)
            .cloned()
            .ok_or_else(|| rejected(404, "Agent not found"))
    }

    async fn delete_agent(&self, token: &AccessToken, name: &str) -> Result<(), ApiError> {
        Self::authorize(token)?;
        let mut state = self.state.lock().unwrap();
        let before = state.agents.len();
        state.agents.retain(|a| a.name != name);
        if state.agents.len() == before {
            return Err(rejected(404, "Agent not found"));
        }
        state.deleted.push(name.to_string());
        Ok(())
    }

    async fn push_agent(
        &self,
        token: &AccessToken,
        action: &PushAction,
        payload: PushPayload,
    ) -> Result<AgentResponse, ApiError> {
        Self::authorize(token)?;
        let name = parse_parts(&payload)
            .iter()
            .find(|p| p.name == "name")
            .map(|p| p.text())
            .unwrap_or_default();
        let mut state = self.state.lock().unwrap();
        state.pushes.push((action.clone(), payload));
        Ok(agent(&name, &[]))
    }

    async fn chat(
        &self,
        agent_name: &str,
        request: &ChatRequest,
    ) -> Result<ChatResponse, ApiError> {
        self.state.lock().unwrap().chats.push(request.clone());
        Ok(ChatResponse {
            role: "assistant".to_string(),
            content: format!("{} heard: {}", agent_name, request.prompt),
        })
    }
}

/// One form part of a push, flattened for assertions.
#[derive(Debug, Clone)]
pub struct Part {
    pub name: String,
    pub filename: Option<String>,
    pub content: Vec<u8>,
}

impl Part {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.content).to_string()
    }
}

/// The parts of a push payload in send order.
pub fn parse_parts(payload: &PushPayload) -> Vec<Part> {
    payload
        .parts
        .iter()
        .map(|part| match &part.body {
            PartBody::Text(value) => Part {
                name: part.name.to_string(),
                filename: None,
                content: value.as_bytes().to_vec(),
            },
            PartBody::File { filename, content } => Part {
                name: part.name.to_string(),
                filename: Some(filename.clone()),
                content: content.clone(),
            },
        })
        .collect()
}

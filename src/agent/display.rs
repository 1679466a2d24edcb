//! Human-readable rendering of agents.

use crate::api::AgentResponse;
use crate::definition::ExistingFileRef;
use crate::error::ApiError;
use chrono::{DateTime, Utc};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::Serialize;

const DATE_FORMAT: &str = "%d-%b-%y";

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Unix seconds as `DD-Mon-YY` (UTC).
pub fn format_timestamp(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|t| t.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// Detail view of one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentDisplay {
    pub name: String,
    pub welcome_message: String,
    pub instructions: String,
    pub suggested_prompts: Vec<String>,
    pub files: Vec<ExistingFileRef>,
    pub created_on: String,
    pub updated_on: String,
}

impl From<&AgentResponse> for AgentDisplay {
    fn from(response: &AgentResponse) -> Self {
        Self {
            name: response.name.clone(),
            welcome_message: response.welcome_message.clone(),
            instructions: response.instructions.clone(),
            suggested_prompts: response.suggested_prompts.clone(),
            files: response.files.clone(),
            created_on: format_timestamp(response.created_on),
            updated_on: format_timestamp(response.updated_on),
        }
    }
}

/// One row of the agent list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSummary {
    pub srno: usize,
    pub name: String,
    pub file_count: usize,
    pub embeddings_status: String,
    pub created_on: String,
    pub updated_on: String,
}

impl AgentSummary {
    pub fn from_responses(agents: &[AgentResponse]) -> Vec<AgentSummary> {
        agents
            .iter()
            .enumerate()
            .map(|(i, agent)| AgentSummary {
                srno: i + 1,
                name: agent.name.clone(),
                file_count: agent.files.len(),
                embeddings_status: agent.embeddings_status.clone(),
                created_on: format_timestamp(agent.created_on),
                updated_on: format_timestamp(agent.updated_on),
            })
            .collect()
    }
}

pub fn format_agent_details(agent: &AgentDisplay) -> Result<String, ApiError> {
    serde_yaml::to_string(agent).map_err(|e| {
        ApiError::Serialization(format!("Failed to marshal agent details for display: {}", e))
    })
}

pub fn format_agent_table(agents: &[AgentSummary]) -> String {
    if agents.is_empty() {
        return "No agents found".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec![
        "SRNO",
        "NAME",
        "# FILES",
        "E STATUS",
        "CREATED ON",
        "UPDATED ON",
    ]);
    for agent in agents {
        table.add_row(vec![
            agent.srno.to_string(),
            agent.name.clone(),
            agent.file_count.to_string(),
            agent.embeddings_status.clone(),
            agent.created_on.clone(),
            agent.updated_on.clone(),
        ]);
    }
    table.to_string()
}

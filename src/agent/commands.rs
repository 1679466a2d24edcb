//! Agent command service: single entry point per agent CLI command variant.
//!
//! Owns all agent workflow logic; CLI parses, calls one method per variant, and formats output.

use super::display::{AgentDisplay, AgentSummary};
use crate::api::{AccessToken, AgentBackend, AgentResponse, PushAction};
use crate::definition::{
    annotate_definition, append_sample_new_files, create_template,
    derive_deleted_file_candidates, read_definition_file, AgentDefinition, SampleNewFiles,
    CREATE_TEMPLATE_FILENAME,
};
use crate::error::ApiError;
use crate::push::{build_push_payload, PushPayload};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub struct AgentCommandService;

/// Result of agent list command.
#[derive(Debug, Clone)]
pub struct AgentListResult {
    pub agents: Vec<AgentSummary>,
}

/// Result of agent view command.
#[derive(Debug, Clone)]
pub struct AgentViewResult {
    pub agent: AgentDisplay,
}

/// Result of agent delete command.
#[derive(Debug, Clone)]
pub struct AgentDeleteResult {
    pub name: String,
}

/// Result of agent create command.
#[derive(Debug, Clone)]
pub struct AgentCreateResult {
    pub path: PathBuf,
}

/// Editable document derived from a server agent, not yet written.
#[derive(Debug, Clone)]
pub struct PreparedPull {
    pub name: String,
    pub document: String,
    pub delete_candidates: usize,
}

/// Result of agent pull command.
#[derive(Debug, Clone)]
pub struct AgentPullResult {
    pub name: String,
    pub path: PathBuf,
    pub delete_candidates: usize,
}

/// Result of agent push command.
#[derive(Debug, Clone)]
pub struct AgentPushResult {
    pub action: PushAction,
    pub agent: AgentDisplay,
    pub source: PathBuf,
    /// Whether the pushed document was removed afterwards.
    pub source_removed: bool,
}

impl AgentCommandService {
    pub async fn list(
        backend: &dyn AgentBackend,
        token: &AccessToken,
    ) -> Result<AgentListResult, ApiError> {
        let agents = backend.list_agents(token).await?;
        info!(count = agents.len(), "Listed agents");
        Ok(AgentListResult {
            agents: AgentSummary::from_responses(&agents),
        })
    }

    pub async fn view(
        backend: &dyn AgentBackend,
        token: &AccessToken,
        name: &str,
    ) -> Result<AgentViewResult, ApiError> {
        let agent = backend.get_agent(token, name).await?;
        Ok(AgentViewResult {
            agent: AgentDisplay::from(&agent),
        })
    }

    pub async fn delete(
        backend: &dyn AgentBackend,
        token: &AccessToken,
        name: &str,
    ) -> Result<AgentDeleteResult, ApiError> {
        backend.delete_agent(token, name).await?;
        info!(agent = %name, "Deleted agent");
        Ok(AgentDeleteResult {
            name: name.to_string(),
        })
    }

    /// Write the commented create template into `dir`.
    pub fn create_template(dir: &Path) -> Result<AgentCreateResult, ApiError> {
        let path = dir.join(CREATE_TEMPLATE_FILENAME);
        write_document(&path, &create_template()?)?;
        info!(path = %path.display(), "Wrote create template");
        Ok(AgentCreateResult { path })
    }

    /// Turn a server agent into its editable document: every current file
    /// becomes a commented-out delete candidate and the sample new-file
    /// entries are appended.
    pub fn prepare_pull(
        agent: &AgentResponse,
        scaffold: &SampleNewFiles,
    ) -> Result<PreparedPull, ApiError> {
        let mut definition = agent.definition_shell();
        derive_deleted_file_candidates(&mut definition, &agent.files);
        append_sample_new_files(&mut definition, scaffold);
        Ok(PreparedPull {
            name: agent.name.clone(),
            document: annotate_definition(&definition)?,
            delete_candidates: definition.deleted_files.len(),
        })
    }

    /// Fetch an agent and write `<name>.yaml` into `dir`.
    pub async fn pull(
        backend: &dyn AgentBackend,
        token: &AccessToken,
        name: &str,
        dir: &Path,
    ) -> Result<AgentPullResult, ApiError> {
        let agent = backend.get_agent(token, name).await?;
        let prepared = Self::prepare_pull(&agent, &SampleNewFiles::builtin())?;
        let path = dir.join(format!("{}.yaml", name));
        write_document(&path, &prepared.document)?;
        info!(
            agent = %name,
            path = %path.display(),
            delete_candidates = prepared.delete_candidates,
            "Pulled agent"
        );
        Ok(AgentPullResult {
            name: prepared.name,
            path,
            delete_candidates: prepared.delete_candidates,
        })
    }

    /// Read, check, and encode a document for a push without sending it.
    pub fn prepare_push(file: &Path, action: &PushAction) -> Result<PushPayload, ApiError> {
        let definition = read_definition_file(file)?;
        check_push_target(&definition, action)?;
        build_push_payload(&definition)
    }

    /// Push a document, then remove it. Failure to remove is only logged.
    pub async fn push(
        backend: &dyn AgentBackend,
        token: &AccessToken,
        file: &Path,
        action: PushAction,
    ) -> Result<AgentPushResult, ApiError> {
        let payload = Self::prepare_push(file, &action)?;
        let agent = backend.push_agent(token, &action, payload).await?;
        info!(agent = %agent.name, action = ?action, "Pushed agent");

        let source_removed = match std::fs::remove_file(file) {
            Ok(()) => true,
            Err(e) => {
                warn!(path = %file.display(), error = %e, "Could not delete pushed document");
                false
            }
        };
        Ok(AgentPushResult {
            action,
            agent: AgentDisplay::from(&agent),
            source: file.to_path_buf(),
            source_removed,
        })
    }
}

fn check_push_target(definition: &AgentDefinition, action: &PushAction) -> Result<(), ApiError> {
    definition.validate()?;
    if let PushAction::Update { name } = action {
        if definition.name != *name {
            return Err(ApiError::InvalidDefinition(format!(
                "name cannot be changed: document has '{}' but agent is '{}'",
                definition.name, name
            )));
        }
    }
    Ok(())
}

fn write_document(path: &Path, content: &str) -> Result<(), ApiError> {
    std::fs::write(path, content).map_err(|e| {
        ApiError::ConfigError(format!(
            "Failed to write YAML to file {}: {}",
            path.display(),
            e
        ))
    })
}

//! Push payload builder: edited [`AgentDefinition`] -> multipart request.
//!
//! The server relates each entry of the `files` metadata array to a binary
//! `new_files` part by list position only. There is no per-file key. Both are
//! therefore emitted by [`build_push_payload`] from one walk over the same
//! list, and that function is the only place allowed to produce either.

use crate::definition::{AgentDefinition, SplitMeta};
use crate::error::ApiError;
use crate::paths::{basename, resolve_path};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;

/// Form field names of the push request.
pub mod fields {
    pub const NAME: &str = "name";
    pub const INSTRUCTIONS: &str = "instructions";
    pub const WELCOME_MESSAGE: &str = "welcome_message";
    pub const SUGGESTED_PROMPTS: &str = "suggested_prompts";
    pub const DELETED_FILES: &str = "deleted_files";
    pub const FILES: &str = "files";
    pub const NEW_FILES: &str = "new_files";
}

const FILE_CONTENT_TYPE: &str = "application/octet-stream";

/// Wire metadata for one uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDetail {
    pub filename: String,
    pub meta: SplitMeta,
}

/// Wire form of a push, derived from a definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentPushRequest {
    pub name: String,
    pub instructions: String,
    pub welcome_message: String,
    pub suggested_prompts: Vec<String>,
    pub deleted_files: Vec<String>,
    /// One entry per `new_files` entry, same order.
    pub files: Vec<FileDetail>,
}

impl AgentPushRequest {
    /// Derive the request. Wire filenames are basenames of the raw paths,
    /// taken before any path resolution.
    pub fn from_definition(definition: &AgentDefinition) -> Self {
        let files = definition
            .new_files
            .iter()
            .map(|f| FileDetail {
                filename: basename(&f.filepath),
                meta: f.meta.clone(),
            })
            .collect();

        Self {
            name: definition.name.clone(),
            instructions: definition.instructions.clone(),
            welcome_message: definition.welcome_message.clone(),
            suggested_prompts: definition.suggested_prompts.clone(),
            deleted_files: definition.deleted_files.clone(),
            files,
        }
    }
}

/// Content of one form part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartBody {
    Text(String),
    File { filename: String, content: Vec<u8> },
}

/// One form part, in the position it is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPart {
    pub name: &'static str,
    pub body: PartBody,
}

impl FormPart {
    fn text(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            body: PartBody::Text(value.into()),
        }
    }
}

/// A push ready for transport. `parts` is the exact part sequence of the
/// multipart body.
#[derive(Debug, Clone)]
pub struct PushPayload {
    pub request: AgentPushRequest,
    pub parts: Vec<FormPart>,
}

impl PushPayload {
    /// Bytes of file content carried by the payload.
    pub fn file_bytes(&self) -> usize {
        self.parts
            .iter()
            .map(|part| match &part.body {
                PartBody::File { content, .. } => content.len(),
                PartBody::Text(_) => 0,
            })
            .sum()
    }

    /// The multipart form, parts appended in payload order.
    pub fn into_form(self) -> Result<Form, ApiError> {
        self.parts
            .into_iter()
            .try_fold(Form::new(), |form, part| -> Result<Form, ApiError> {
                Ok(match part.body {
                    PartBody::Text(value) => form.text(part.name, value),
                    PartBody::File { filename, content } => form.part(
                        part.name,
                        Part::bytes(content)
                            .file_name(filename)
                            .mime_str(FILE_CONTENT_TYPE)?,
                    ),
                })
            })
    }
}

/// Build the multipart push payload for a definition.
///
/// Fails with `FileNotFound` when a staged file cannot be opened and with
/// `CopyError` when its content cannot be read. Either failure abandons the
/// whole payload.
pub fn build_push_payload(definition: &AgentDefinition) -> Result<PushPayload, ApiError> {
    let request = AgentPushRequest::from_definition(definition);

    let mut parts = vec![
        FormPart::text(fields::NAME, &request.name),
        FormPart::text(fields::INSTRUCTIONS, &request.instructions),
        FormPart::text(fields::WELCOME_MESSAGE, &request.welcome_message),
    ];
    for prompt in &request.suggested_prompts {
        parts.push(FormPart::text(fields::SUGGESTED_PROMPTS, prompt));
    }
    for deleted in &request.deleted_files {
        parts.push(FormPart::text(fields::DELETED_FILES, deleted));
    }

    let files_json = serde_json::to_string(&request.files).map_err(|e| {
        ApiError::Serialization(format!("Failed to marshal files metadata to JSON: {}", e))
    })?;
    parts.push(FormPart::text(fields::FILES, files_json));

    // Part i must carry the file described by request.files[i].
    for (detail, new_file) in request.files.iter().zip(&definition.new_files) {
        let resolved = resolve_path(&new_file.filepath)?;
        let mut file = File::open(&resolved).map_err(|e| ApiError::FileNotFound {
            path: new_file.filepath.clone(),
            source: e,
        })?;
        let mut content = Vec::new();
        file.read_to_end(&mut content)
            .map_err(|e| ApiError::CopyError {
                path: new_file.filepath.clone(),
                source: e,
            })?;
        tracing::debug!(
            filename = %detail.filename,
            path = %resolved.display(),
            bytes = content.len(),
            "Attached file part"
        );
        parts.push(FormPart {
            name: fields::NEW_FILES,
            body: PartBody::File {
                filename: detail.filename.clone(),
                content,
            },
        });
    }

    let payload = PushPayload { request, parts };
    tracing::info!(
        agent = %payload.request.name,
        files = payload.request.files.len(),
        deleted = payload.request.deleted_files.len(),
        bytes = payload.file_bytes(),
        "Built push payload"
    );
    Ok(payload)
}

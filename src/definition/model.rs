//! Agent definition document model.

use crate::error::ApiError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Maximum number of suggested prompts an agent may carry.
pub const MAX_SUGGESTED_PROMPTS: usize = 3;

/// Unit used by the server to split an attached document into chunks.
///
/// The set of units is owned by the server; unknown values are carried
/// through untouched as [`SplitBy::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SplitBy {
    Word,
    Sentence,
    Passage,
    Paragraph,
    Page,
    Line,
    Other(String),
}

impl SplitBy {
    pub fn as_str(&self) -> &str {
        match self {
            SplitBy::Word => "word",
            SplitBy::Sentence => "sentence",
            SplitBy::Passage => "passage",
            SplitBy::Paragraph => "paragraph",
            SplitBy::Page => "page",
            SplitBy::Line => "line",
            SplitBy::Other(value) => value,
        }
    }
}

impl From<String> for SplitBy {
    fn from(value: String) -> Self {
        match value.as_str() {
            "word" => SplitBy::Word,
            "sentence" => SplitBy::Sentence,
            "passage" => SplitBy::Passage,
            "paragraph" => SplitBy::Paragraph,
            "page" => SplitBy::Page,
            "line" => SplitBy::Line,
            _ => SplitBy::Other(value),
        }
    }
}

impl From<SplitBy> for String {
    fn from(value: SplitBy) -> Self {
        match value {
            SplitBy::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

/// Document splitting parameters for one file.
///
/// Nothing here is validated locally. Omitted numbers read as `0` and an
/// omitted `split_by` is written as `""`, leaving defaults to the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitMeta {
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        serialize_with = "none_as_blank"
    )]
    pub split_by: Option<SplitBy>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub split_length: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub split_overlap: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub split_threshold: i64,
}

impl SplitMeta {
    pub fn new(split_by: SplitBy, length: i64, overlap: i64, threshold: i64) -> Self {
        Self {
            split_by: Some(split_by),
            split_length: length,
            split_overlap: overlap,
            split_threshold: threshold,
        }
    }
}

/// A local file staged for upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFileRef {
    /// Local path as written by the user; may start with `~` or be relative.
    pub filepath: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta: SplitMeta,
}

impl NewFileRef {
    pub fn new(filepath: impl Into<String>, meta: SplitMeta) -> Self {
        Self {
            filepath: filepath.into(),
            meta,
        }
    }
}

/// A file already attached to the agent on the server, keyed by filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingFileRef {
    pub filename: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta: SplitMeta,
}

/// The editable agent definition document.
///
/// `new_files` is a `Vec` on purpose: its order is the order of the upload
/// metadata array and of the binary file parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDefinition {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub instructions: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub welcome_message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub suggested_prompts: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub deleted_files: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub new_files: Vec<NewFileRef>,
}

impl AgentDefinition {
    /// Definition with the descriptive fields set and both file lists empty.
    pub fn shell(
        name: impl Into<String>,
        instructions: impl Into<String>,
        welcome_message: impl Into<String>,
        suggested_prompts: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            welcome_message: welcome_message.into(),
            suggested_prompts,
            deleted_files: Vec::new(),
            new_files: Vec::new(),
        }
    }

    /// Local checks performed before a push.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::InvalidDefinition(
                "name cannot be empty".to_string(),
            ));
        }
        if self.suggested_prompts.len() > MAX_SUGGESTED_PROMPTS {
            return Err(ApiError::InvalidDefinition(format!(
                "a max of {} prompts can be given, found {}",
                MAX_SUGGESTED_PROMPTS,
                self.suggested_prompts.len()
            )));
        }
        if let Some(entry) = self.new_files.iter().find(|f| f.filepath.trim().is_empty()) {
            return Err(ApiError::InvalidDefinition(format!(
                "new_files entry has an empty filepath (meta: {:?})",
                entry.meta
            )));
        }
        Ok(())
    }
}

/// Treat an explicit YAML/JSON `null` (e.g. a key whose list items are all
/// commented out) the same as a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<SplitBy>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .filter(|v| !v.trim().is_empty())
        .map(SplitBy::from))
}

fn none_as_blank<S>(value: &Option<SplitBy>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(value.as_ref().map(SplitBy::as_str).unwrap_or(""))
}

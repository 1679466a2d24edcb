//! Comment annotator: [`AgentDefinition`] -> editable document text.
//!
//! The document is built as a small tree of annotated nodes and rendered in a
//! single pass. Each top-level field may carry leading comment lines and a
//! trailing comment; each list item may carry a trailing comment and may be
//! rendered commented out. Values themselves are encoded by `serde_yaml`.

use super::model::AgentDefinition;
use crate::error::ApiError;
use serde::Serialize;
use serde_yaml::{Mapping, Value};

pub const NAME_COMMENT: &str = "this cannot be changed";
pub const PROMPTS_COMMENT: &str = "a max of 3 prompts can be given";
pub const DELETED_FILES_COMMENT: &str = "uncomment the files you wish to delete";
pub const NEW_FILES_COMMENT: &str = "change below template as required";

const ITEM_INDENT: &str = "  ";

/// One entry of a list-valued field.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub value: Value,
    /// Rendered behind a `#` so that the default reading omits it.
    pub commented: bool,
    pub comment: Option<String>,
}

impl Item {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            commented: false,
            comment: None,
        }
    }

    pub fn commented(mut self) -> Self {
        self.commented = true;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Scalar(Value),
    Sequence(Vec<Item>),
}

/// A top-level key of the document.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: &'static str,
    pub value: FieldValue,
    pub leading: Vec<String>,
    pub comment: Option<String>,
}

impl Field {
    pub fn scalar(key: &'static str, value: Value) -> Self {
        Self {
            key,
            value: FieldValue::Scalar(value),
            leading: Vec::new(),
            comment: None,
        }
    }

    pub fn sequence(key: &'static str, items: Vec<Item>) -> Self {
        Self {
            key,
            value: FieldValue::Sequence(items),
            leading: Vec::new(),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_leading(mut self, line: impl Into<String>) -> Self {
        self.leading.push(line.into());
        self
    }
}

/// Ordered set of annotated fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    fields: Vec<Field>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Render the document. Output is deterministic for a given document.
    pub fn render(&self) -> Result<String, ApiError> {
        let mut out = String::new();
        for field in &self.fields {
            for line in &field.leading {
                out.push_str("# ");
                out.push_str(line);
                out.push('\n');
            }
            match &field.value {
                FieldValue::Scalar(value) => render_scalar(&mut out, field, value)?,
                FieldValue::Sequence(items) => render_sequence(&mut out, field, items)?,
            }
        }
        Ok(out)
    }
}

fn render_scalar(out: &mut String, field: &Field, value: &Value) -> Result<(), ApiError> {
    let mut mapping = Mapping::new();
    mapping.insert(Value::String(field.key.to_string()), value.clone());
    let text = encode(&mapping)?;
    let mut lines = text.lines();
    let first = lines.next().unwrap_or_default();
    push_line(out, first, field.comment.as_deref());
    for line in lines {
        push_line(out, line, None);
    }
    Ok(())
}

fn render_sequence(out: &mut String, field: &Field, items: &[Item]) -> Result<(), ApiError> {
    if items.is_empty() {
        push_line(out, &format!("{}: []", field.key), field.comment.as_deref());
        return Ok(());
    }
    push_line(out, &format!("{}:", field.key), field.comment.as_deref());
    for item in items {
        let marker = if item.commented { "# " } else { "" };
        let text = encode(&item.value)?;
        let mut lines = text.lines();
        let first = lines.next().unwrap_or_default();
        push_line(
            out,
            &format!("{}{}- {}", ITEM_INDENT, marker, first),
            item.comment.as_deref(),
        );
        for line in lines {
            if line.is_empty() && !item.commented {
                out.push('\n');
            } else {
                push_line(out, &format!("{}{}  {}", ITEM_INDENT, marker, line), None);
            }
        }
    }
    Ok(())
}

fn push_line(out: &mut String, line: &str, comment: Option<&str>) {
    out.push_str(line);
    if let Some(comment) = comment {
        out.push_str(" # ");
        out.push_str(comment);
    }
    out.push('\n');
}

fn encode<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_yaml::to_string(value)
        .map_err(|e| ApiError::Serialization(format!("Failed to marshal agent definition: {}", e)))
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_yaml::to_value(value)
        .map_err(|e| ApiError::Serialization(format!("Failed to marshal agent definition: {}", e)))
}

/// Build the annotated document for a definition.
///
/// Every `deleted_files` entry is rendered commented out, so the document as
/// written deletes nothing until the operator uncomments an entry.
pub fn definition_document(definition: &AgentDefinition) -> Result<Document, ApiError> {
    let mut document = Document::new();
    document.push(Field::scalar("name", to_value(&definition.name)?).with_comment(NAME_COMMENT));
    document.push(Field::scalar(
        "instructions",
        to_value(&definition.instructions)?,
    ));
    document.push(Field::scalar(
        "welcome_message",
        to_value(&definition.welcome_message)?,
    ));

    let prompts = definition
        .suggested_prompts
        .iter()
        .map(|p| to_value(p).map(Item::new))
        .collect::<Result<Vec<_>, _>>()?;
    document.push(Field::sequence("suggested_prompts", prompts).with_comment(PROMPTS_COMMENT));

    let deleted = definition
        .deleted_files
        .iter()
        .map(|f| to_value(f).map(|v| Item::new(v).commented()))
        .collect::<Result<Vec<_>, _>>()?;
    document.push(Field::sequence("deleted_files", deleted).with_comment(DELETED_FILES_COMMENT));

    let new_files = definition
        .new_files
        .iter()
        .map(|f| to_value(f).map(Item::new))
        .collect::<Result<Vec<_>, _>>()?;
    document.push(Field::sequence("new_files", new_files).with_comment(NEW_FILES_COMMENT));

    Ok(document)
}

/// Render a definition as an editable, commented document.
pub fn annotate_definition(definition: &AgentDefinition) -> Result<String, ApiError> {
    definition_document(definition)?.render()
}

//! Agent definition documents.
//!
//! The local, human-editable representation of an agent: how it is read from
//! text, how a pulled agent is reconciled into one, and how it is rendered back
//! with guidance comments.

pub mod annotate;
mod model;
pub mod reader;
pub mod reconcile;
pub mod template;

pub use annotate::{annotate_definition, definition_document, Document, Field, FieldValue, Item};
pub(crate) use model::null_as_default;
pub use model::{
    AgentDefinition, ExistingFileRef, NewFileRef, SplitBy, SplitMeta, MAX_SUGGESTED_PROMPTS,
};
pub use reader::{read_definition, read_definition_file};
pub use reconcile::{append_sample_new_files, derive_deleted_file_candidates, SampleNewFiles};
pub use template::{create_template, CREATE_TEMPLATE_FILENAME};

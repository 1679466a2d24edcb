//! Existing-file reconciliation for pulled definitions.

use super::model::{AgentDefinition, ExistingFileRef, NewFileRef, SplitBy, SplitMeta};

/// Versioned sample of `new_files` entries appended to pulled documents.
///
/// This is template data shown to the operator, never derived from server
/// state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleNewFiles {
    pub version: u32,
    pub entries: Vec<NewFileRef>,
}

impl SampleNewFiles {
    pub const BUILTIN_VERSION: u32 = 1;

    /// The scaffold shipped with the tool.
    pub fn builtin() -> Self {
        Self {
            version: Self::BUILTIN_VERSION,
            entries: vec![
                NewFileRef::new(
                    "~/docs/document1.pdf",
                    SplitMeta::new(SplitBy::Word, 200, 20, 0),
                ),
                NewFileRef::new(
                    "../files/file1.txt",
                    SplitMeta::new(SplitBy::Paragraph, 100, 10, 0),
                ),
            ],
        }
    }

    pub fn empty() -> Self {
        Self {
            version: Self::BUILTIN_VERSION,
            entries: Vec::new(),
        }
    }
}

impl Default for SampleNewFiles {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Add every current server filename to `deleted_files` as a candidate.
///
/// Candidates only become deletions if the operator keeps them uncommented
/// after annotation.
pub fn derive_deleted_file_candidates(
    definition: &mut AgentDefinition,
    server_files: &[ExistingFileRef],
) {
    definition
        .deleted_files
        .extend(server_files.iter().map(|f| f.filename.clone()));
}

/// Append the sample scaffold to `new_files`.
pub fn append_sample_new_files(definition: &mut AgentDefinition, scaffold: &SampleNewFiles) {
    definition.new_files.extend(scaffold.entries.iter().cloned());
}

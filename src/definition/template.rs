//! Template document for creating a new agent.

use super::annotate::{Document, Field, Item, NEW_FILES_COMMENT};
use super::model::{NewFileRef, SplitBy, SplitMeta};
use crate::error::ApiError;
use serde_yaml::Value;

/// Filename the create template is written to.
pub const CREATE_TEMPLATE_FILENAME: &str = "create-agent.yaml";

/// Build the annotated document handed out by `agent create`.
pub fn create_template_document() -> Result<Document, ApiError> {
    let to_value = |v: &NewFileRef| {
        serde_yaml::to_value(v).map_err(|e| ApiError::Serialization(e.to_string()))
    };

    let absolute = NewFileRef::new(
        "~/docs/document1.pdf",
        SplitMeta::new(SplitBy::Sentence, 4, 1, 0),
    );
    let relative = NewFileRef::new(
        "../files/file1.txt",
        SplitMeta::new(SplitBy::Word, 200, 0, 0),
    );

    let mut document = Document::new();
    document.push(
        Field::scalar("name", Value::String("agent-name".to_string()))
            .with_comment("A meaningful name with letters, digits, hyphen, underscore, no blanks"),
    );
    document.push(Field::scalar(
        "instructions",
        Value::String(
            "This is a sample instruction for the agent. It can be multiline.\n\nEdit it accordingly.\n"
                .to_string(),
        ),
    ));
    document.push(Field::scalar(
        "welcome_message",
        Value::String("Welcome to the Agent!".to_string()),
    ));
    document.push(
        Field::sequence(
            "suggested_prompts",
            ["What can you do?", "How do I use this agent?", "Tell me something interesting."]
                .iter()
                .map(|p| Item::new(Value::String(p.to_string())))
                .collect(),
        )
        .with_comment("A max of 3 prompts can be given"),
    );
    document.push(
        Field::sequence(
            "new_files",
            vec![
                Item::new(to_value(&absolute)?).with_comment("path under the home directory"),
                Item::new(to_value(&relative)?).with_comment("relative path to cwd"),
            ],
        )
        .with_leading("split defaults are filled in by the server for missing meta")
        .with_comment(NEW_FILES_COMMENT),
    );
    Ok(document)
}

/// Render the create template.
pub fn create_template() -> Result<String, ApiError> {
    create_template_document()?.render()
}

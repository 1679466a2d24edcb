//! Agent workflows against the in-memory backend.

use super::support::{agent, parse_parts, FakeBackend, PASSWORD, TOKEN};
use sia::agent::{AgentCommandService, ChatSession};
use sia::api::{AccessToken, PushAction, TokenStore};
use sia::auth::AuthService;
use sia::definition::{
    annotate_definition, read_definition, AgentDefinition, NewFileRef, SplitBy, SplitMeta,
};
use sia::error::ApiError;
use std::path::Path;

fn token() -> AccessToken {
    AccessToken::new(TOKEN)
}

fn stage(dir: &Path, name: &str, content: &str) -> NewFileRef {
    let path = dir.join(name);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, content).unwrap();
    NewFileRef::new(
        path.to_string_lossy().to_string(),
        SplitMeta::new(SplitBy::Paragraph, 100, 10, 0),
    )
}

fn write_document(dir: &Path, definition: &AgentDefinition) -> std::path::PathBuf {
    let path = dir.join(format!("{}.yaml", definition.name));
    std::fs::write(&path, annotate_definition(definition).unwrap()).unwrap();
    path
}

#[tokio::test]
async fn pull_writes_annotated_document() {
    let backend = FakeBackend::with_agents(vec![agent("helper", &["a.pdf", "b.txt"])]);
    let temp = tempfile::tempdir().unwrap();

    let result = AgentCommandService::pull(&backend, &token(), "helper", temp.path())
        .await
        .unwrap();
    assert_eq!(result.path, temp.path().join("helper.yaml"));
    assert_eq!(result.delete_candidates, 2);

    let text = std::fs::read_to_string(&result.path).unwrap();
    assert!(text.starts_with("name: helper # this cannot be changed\n"));
    assert!(text.contains("deleted_files: # uncomment the files you wish to delete\n  # - a.pdf\n  # - b.txt\n"));
    assert!(text.contains("~/docs/document1.pdf"));

    let definition = read_definition(&text).unwrap();
    assert!(definition.deleted_files.is_empty());
    assert_eq!(definition.new_files.len(), 2);
}

#[tokio::test]
async fn pull_of_unknown_agent_surfaces_server_detail() {
    let backend = FakeBackend::default();
    let temp = tempfile::tempdir().unwrap();
    let err = AgentCommandService::pull(&backend, &token(), "ghost", temp.path())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Agent not found");
    assert!(!temp.path().join("ghost.yaml").exists());
}

#[tokio::test]
async fn push_sends_file_parts_in_metadata_order_and_removes_document() {
    let backend = FakeBackend::default();
    let temp = tempfile::tempdir().unwrap();

    let mut definition = AgentDefinition::shell(
        "helper",
        "Answer from the handbook.",
        "Hi",
        vec!["Summarize chapter one".to_string()],
    );
    definition.new_files = vec![
        stage(temp.path(), "docs/zeta.txt", "zeta content"),
        stage(temp.path(), "alpha.txt", "alpha content"),
        stage(temp.path(), "other/zeta.txt", "second zeta"),
    ];
    let document = write_document(temp.path(), &definition);

    let result = AgentCommandService::push(&backend, &token(), &document, PushAction::Create)
        .await
        .unwrap();
    assert_eq!(result.agent.name, "helper");
    assert!(result.source_removed);
    assert!(!document.exists());

    let pushes = backend.pushes();
    assert_eq!(pushes.len(), 1);
    assert_eq!(pushes[0].0, PushAction::Create);

    let parts = parse_parts(&pushes[0].1);
    let files_json = parts.iter().find(|p| p.name == "files").unwrap().text();
    let files: Vec<serde_json::Value> = serde_json::from_str(&files_json).unwrap();
    let metadata_names: Vec<&str> = files
        .iter()
        .map(|f| f["filename"].as_str().unwrap())
        .collect();
    assert_eq!(metadata_names, ["zeta.txt", "alpha.txt", "zeta.txt"]);
    assert_eq!(files[0]["meta"]["split_by"], "paragraph");

    let file_parts: Vec<_> = parts.iter().filter(|p| p.name == "new_files").collect();
    let part_names: Vec<&str> = file_parts
        .iter()
        .map(|p| p.filename.as_deref().unwrap())
        .collect();
    assert_eq!(part_names, metadata_names);
    let contents: Vec<String> = file_parts.iter().map(|p| p.text()).collect();
    assert_eq!(contents, ["zeta content", "alpha content", "second zeta"]);
}

#[tokio::test]
async fn push_with_missing_staged_file_sends_nothing() {
    let backend = FakeBackend::default();
    let temp = tempfile::tempdir().unwrap();

    let mut definition = AgentDefinition::shell("helper", "", "", vec![]);
    definition.new_files = vec![
        stage(temp.path(), "present.txt", "here"),
        NewFileRef::new(
            temp.path().join("absent.txt").to_string_lossy().to_string(),
            SplitMeta::default(),
        ),
    ];
    let document = write_document(temp.path(), &definition);

    let err = AgentCommandService::push(&backend, &token(), &document, PushAction::Create)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::FileNotFound { .. }));
    assert!(backend.pushes().is_empty());
    assert!(document.exists());
}

#[tokio::test]
async fn update_push_keeps_agent_name_immutable() {
    let backend = FakeBackend::default();
    let temp = tempfile::tempdir().unwrap();
    let document = write_document(
        temp.path(),
        &AgentDefinition::shell("renamed", "", "", vec![]),
    );

    let err = AgentCommandService::push(
        &backend,
        &token(),
        &document,
        PushAction::Update {
            name: "helper".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::InvalidDefinition(_)));
    assert!(backend.pushes().is_empty());
}

#[tokio::test]
async fn push_rejects_more_than_three_prompts() {
    let backend = FakeBackend::default();
    let temp = tempfile::tempdir().unwrap();
    let prompts = (1..=4).map(|i| format!("prompt {}", i)).collect();
    let document = write_document(
        temp.path(),
        &AgentDefinition::shell("helper", "", "", prompts),
    );

    let err = AgentCommandService::push(&backend, &token(), &document, PushAction::Create)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidDefinition(_)));
}

#[tokio::test]
async fn list_view_and_delete() {
    let backend = FakeBackend::with_agents(vec![
        agent("helper", &["a.pdf"]),
        agent("writer", &[]),
    ]);

    let list = AgentCommandService::list(&backend, &token()).await.unwrap();
    let names: Vec<&str> = list.agents.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, ["helper", "writer"]);
    assert_eq!(list.agents[0].file_count, 1);

    let view = AgentCommandService::view(&backend, &token(), "helper")
        .await
        .unwrap();
    assert_eq!(view.agent.files[0].filename, "a.pdf");
    assert_eq!(view.agent.created_on, "14-Nov-23");

    AgentCommandService::delete(&backend, &token(), "writer")
        .await
        .unwrap();
    assert_eq!(backend.deleted(), ["writer"]);
    let err = AgentCommandService::delete(&backend, &token(), "writer")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::ServerRejected { status: 404, .. }));
}

#[tokio::test]
async fn chat_history_accumulates_user_prompts() {
    let backend = FakeBackend::default();
    let mut session = ChatSession::new("helper");

    let first = session.send(&backend, "hello").await.unwrap();
    assert_eq!(first.content, "helper heard: hello");
    session.send(&backend, " and again ").await.unwrap();

    let chats = backend.chats();
    assert_eq!(chats.len(), 2);
    assert_eq!(chats[1].prompt, "and again");
    let history: Vec<&str> = chats[1].messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(history, ["hello", "and again"]);
    assert!(chats[1].messages.iter().all(|m| m.role == "user"));
}

#[tokio::test]
async fn password_changes_check_the_repeat_before_calling_the_server() {
    let backend = FakeBackend::default();
    let temp = tempfile::tempdir().unwrap();
    let tokens = TokenStore::at(temp.path().join(".access_token"));
    tokens.save(TOKEN).unwrap();

    let err = AuthService::set_admin_password(&backend, "secret1", "secret2")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Configuration error: Passwords do not match.");
    AuthService::set_admin_password(&backend, "secret1", "secret1")
        .await
        .unwrap();

    AuthService::change_admin_password(&backend, &tokens, PASSWORD, "secret1", "secret1")
        .await
        .unwrap();
    let err = AuthService::change_admin_password(&backend, &tokens, "wrong", "secret1", "secret1")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::ServerRejected { status: 400, .. }));
}

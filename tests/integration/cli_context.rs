//! End-to-end command execution through `CliContext` with an in-memory backend.

use super::support::{agent, parse_parts, FakeBackend, PASSWORD};
use sia::api::{PushAction, TokenStore};
use sia::config::SiaConfig;
use sia::definition::read_definition;
use sia::error::ApiError;
use sia::tooling::cli::{AgentCommands, CliContext, Commands};
use std::path::Path;
use std::sync::Arc;

fn config(server_url: &str) -> SiaConfig {
    SiaConfig {
        server_url: Some(server_url.to_string()),
        api_key: Some("key".to_string()),
        ..Default::default()
    }
}

fn context(dir: &Path, backend: Arc<FakeBackend>) -> CliContext {
    CliContext::with_backend(
        config("http://localhost:8080"),
        backend,
        TokenStore::at(dir.join(".sia").join(".access_token")),
        dir.to_path_buf(),
    )
    .unwrap()
}

fn agent_cmd(command: AgentCommands) -> Commands {
    Commands::Agent { command }
}

fn login(ctx: &CliContext) {
    let output = ctx
        .execute(&Commands::Login {
            password: Some(PASSWORD.to_string()),
        })
        .unwrap();
    assert_eq!(output, "You are logged in.");
}

#[test]
fn commands_require_login() {
    let temp = tempfile::tempdir().unwrap();
    let ctx = context(temp.path(), Arc::new(FakeBackend::default()));

    let err = ctx.execute(&agent_cmd(AgentCommands::List)).unwrap_err();
    assert!(matches!(err, ApiError::LoginRequired));
    assert_eq!(err.to_string(), "Login required. Use 'sia login'");
    assert!(matches!(
        ctx.execute(&Commands::Logout),
        Err(ApiError::LoginRequired)
    ));
}

#[test]
fn login_list_logout() {
    let temp = tempfile::tempdir().unwrap();
    let backend = Arc::new(FakeBackend::with_agents(vec![agent("helper", &["a.pdf"])]));
    let ctx = context(temp.path(), backend);

    login(&ctx);
    let listing = ctx.execute(&agent_cmd(AgentCommands::List)).unwrap();
    assert!(listing.contains("helper"));
    assert!(listing.contains("# FILES"));

    assert_eq!(
        ctx.execute(&Commands::Logout).unwrap(),
        "Successfully logged out"
    );
    assert!(!temp.path().join(".sia").join(".access_token").exists());
}

#[test]
fn wrong_password_stores_no_token() {
    let temp = tempfile::tempdir().unwrap();
    let ctx = context(temp.path(), Arc::new(FakeBackend::default()));

    let err = ctx
        .execute(&Commands::Login {
            password: Some("nope".to_string()),
        })
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid password");
    assert!(!temp.path().join(".sia").exists());
}

#[test]
fn create_writes_template_into_work_dir() {
    let temp = tempfile::tempdir().unwrap();
    let ctx = context(temp.path(), Arc::new(FakeBackend::default()));
    login(&ctx);

    ctx.execute(&agent_cmd(AgentCommands::Create)).unwrap();
    let text = std::fs::read_to_string(temp.path().join("create-agent.yaml")).unwrap();
    assert_eq!(read_definition(&text).unwrap().name, "agent-name");
}

#[test]
fn pull_edit_push_update() {
    let temp = tempfile::tempdir().unwrap();
    let backend = Arc::new(FakeBackend::with_agents(vec![agent("helper", &["a.pdf"])]));
    let ctx = context(temp.path(), backend.clone());
    login(&ctx);

    ctx.execute(&agent_cmd(AgentCommands::Pull {
        name: "helper".to_string(),
        output: None,
    }))
    .unwrap();
    let document = temp.path().join("helper.yaml");

    let push = agent_cmd(AgentCommands::Push {
        name: "helper".to_string(),
        file: "helper.yaml".into(),
        action: "update".to_string(),
    });

    // The sample new-file entries point at files that do not exist.
    let err = ctx.execute(&push).unwrap_err();
    assert!(matches!(err, ApiError::FileNotFound { .. }));
    assert!(document.exists());

    // Opt into deleting a.pdf and drop the sample entries, editing the text
    // the way an operator would.
    let text = std::fs::read_to_string(&document).unwrap();
    let head = &text[..text.find("\nnew_files:").unwrap()];
    let edited = format!("{}\nnew_files: []\n", head.replace("  # - a.pdf", "  - a.pdf"));
    assert_eq!(read_definition(&edited).unwrap().deleted_files, vec!["a.pdf"]);
    std::fs::write(&document, edited).unwrap();

    let output = ctx.execute(&push).unwrap();
    assert!(output.contains("Agent has been updated"));
    assert!(output.contains("has been deleted"));
    assert!(!document.exists());

    let pushes = backend.pushes();
    assert_eq!(pushes.len(), 1);
    assert_eq!(
        pushes[0].0,
        PushAction::Update {
            name: "helper".to_string()
        }
    );
    let parts = parse_parts(&pushes[0].1);
    let deleted: Vec<String> = parts
        .iter()
        .filter(|p| p.name == "deleted_files")
        .map(|p| p.text())
        .collect();
    assert_eq!(deleted, vec!["a.pdf"]);
    assert!(parts.iter().all(|p| p.name != "new_files"));
}

#[test]
fn push_rejects_unknown_action() {
    let temp = tempfile::tempdir().unwrap();
    let ctx = context(temp.path(), Arc::new(FakeBackend::default()));
    login(&ctx);

    let err = ctx
        .execute(&agent_cmd(AgentCommands::Push {
            name: "helper".to_string(),
            file: "helper.yaml".into(),
            action: "upsert".to_string(),
        }))
        .unwrap_err();
    assert!(err
        .to_string()
        .contains("Action must be either 'create' or 'update'."));
}

#[test]
fn password_commands_refuse_remote_servers() {
    let temp = tempfile::tempdir().unwrap();
    let ctx = CliContext::with_backend(
        config("https://sia.example.com"),
        Arc::new(FakeBackend::default()),
        TokenStore::at(temp.path().join("token")),
        temp.path().to_path_buf(),
    )
    .unwrap();

    for command in [Commands::Setpwd, Commands::Changepwd] {
        let err = ctx.execute(&command).unwrap_err();
        assert!(err
            .to_string()
            .contains("Access is permitted only from server console"));
    }
}

//! Pull -> edit -> push round trips through the document form.

use super::support::{agent, parse_parts};
use sia::agent::AgentCommandService;
use sia::definition::{annotate_definition, read_definition, SampleNewFiles};
use sia::push::{build_push_payload, AgentPushRequest};

const SERVER_FILES: [&str; 3] = ["handbook.pdf", "faq.txt", "notes v2.md"];

fn pulled_document() -> String {
    AgentCommandService::prepare_pull(&agent("helper", &SERVER_FILES), &SampleNewFiles::empty())
        .unwrap()
        .document
}

fn commented_candidates(document: &str) -> Vec<String> {
    document
        .lines()
        .filter_map(|line| line.strip_prefix("  # - "))
        .map(|item| serde_yaml::from_str::<String>(item).unwrap())
        .collect()
}

fn uncomment(document: &str, filename: &str) -> String {
    document.replace(&format!("  # - {}\n", filename), &format!("  - {}\n", filename))
}

#[test]
fn unedited_pull_offers_every_server_file_and_deletes_nothing() {
    let document = pulled_document();
    assert_eq!(commented_candidates(&document), SERVER_FILES);

    let definition = read_definition(&document).unwrap();
    let payload = build_push_payload(&definition).unwrap();
    assert!(payload.request.deleted_files.is_empty());
    assert!(payload.request.files.is_empty());
}

#[test]
fn opting_into_every_candidate_deletes_exactly_the_server_files() {
    let mut document = pulled_document();
    for filename in SERVER_FILES {
        document = uncomment(&document, filename);
    }

    let definition = read_definition(&document).unwrap();
    let payload = build_push_payload(&definition).unwrap();
    assert_eq!(payload.request.deleted_files, SERVER_FILES);
    assert!(payload.request.files.is_empty());

    let parts = parse_parts(&payload);
    let deleted: Vec<String> = parts
        .iter()
        .filter(|p| p.name == "deleted_files")
        .map(|p| p.text())
        .collect();
    assert_eq!(deleted, SERVER_FILES);
    let files_field = parts.iter().find(|p| p.name == "files").unwrap();
    assert_eq!(files_field.text(), "[]");
    assert!(parts.iter().all(|p| p.name != "new_files"));
}

#[test]
fn uncommenting_one_candidate_deletes_only_that_file() {
    let document = uncomment(&pulled_document(), "faq.txt");
    let definition = read_definition(&document).unwrap();
    assert_eq!(definition.deleted_files, vec!["faq.txt"]);
}

#[test]
fn reannotating_a_pulled_document_keeps_it_stable() {
    let document = pulled_document();
    let reannotated = annotate_definition(&read_definition(&document).unwrap()).unwrap();

    let outside = |text: &str| -> Vec<String> {
        text.lines()
            .filter(|line| !line.starts_with("  # - "))
            .map(|line| {
                if line.starts_with("deleted_files:") {
                    "deleted_files:".to_string()
                } else {
                    line.to_string()
                }
            })
            .collect()
    };
    assert_eq!(outside(&document), outside(&reannotated));
    assert_eq!(
        reannotated.matches("# this cannot be changed").count(),
        1,
        "comment duplicated:\n{}",
        reannotated
    );
}

#[test]
fn pulled_descriptive_fields_survive_into_the_push_request() {
    let definition = read_definition(&pulled_document()).unwrap();
    let request = AgentPushRequest::from_definition(&definition);
    let server = agent("helper", &SERVER_FILES);
    assert_eq!(request.name, server.name);
    assert_eq!(request.instructions, server.instructions);
    assert_eq!(request.welcome_message, server.welcome_message);
    assert_eq!(request.suggested_prompts, server.suggested_prompts);
}

//! Agent workflows
//!
//! Pull, push, list, view, delete, template creation and chat, each expressed
//! over an [`AgentBackend`](crate::api::AgentBackend) so they can run against
//! any server implementation.

pub mod chat;
pub mod commands;
pub mod display;

pub use chat::ChatSession;
pub use commands::{
    AgentCommandService, AgentCreateResult, AgentDeleteResult, AgentListResult, AgentPullResult,
    AgentPushResult, AgentViewResult, PreparedPull,
};
pub use display::{
    format_agent_details, format_agent_table, format_section_heading, format_timestamp,
    AgentDisplay, AgentSummary,
};

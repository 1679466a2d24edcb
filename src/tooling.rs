//! Tooling & Integration Layer
//!
//! The `sia` command line surface.

pub mod cli;

pub use cli::{AgentCommands, Cli, CliContext, Commands};

//! SIA: command line management of agents on SIA servers.
//!
//! Agents are exchanged as human-editable YAML documents: a pull renders the
//! server's agent with guidance comments, a push turns the edited document into
//! a multipart upload whose file parts stay aligned with their metadata.

pub mod agent;
pub mod api;
pub mod auth;
pub mod config;
pub mod definition;
pub mod error;
pub mod logging;
pub mod paths;
pub mod push;
pub mod tooling;

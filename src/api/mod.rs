//! SIA server API: wire types, the backend port, its HTTP adapter, and the
//! local session token.

pub mod backend;
pub mod http;
pub mod session;
pub mod types;

pub use backend::{AgentBackend, PushAction};
pub use http::HttpBackend;
pub use session::{AccessToken, TokenStore};
pub use types::{AgentResponse, ChatMessage, ChatRequest, ChatResponse};

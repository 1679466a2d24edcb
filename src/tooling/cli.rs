//! CLI Tooling
//!
//! Command-line interface for managing agents on a SIA server. Parses
//! arguments, dispatches one service call per command, and formats output.

use crate::agent::{
    format_agent_details, format_agent_table, format_section_heading, AgentCommandService,
    AgentPushResult, ChatSession,
};
use crate::api::{AgentBackend, HttpBackend, PushAction, TokenStore};
use crate::auth::{ensure_localhost, AuthService};
use crate::config::{ConfigLoader, SiaConfig};
use crate::error::ApiError;
use crate::logging::{LoggingConfig, LoggingOverrides};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// sia - manage intelligent agents on your SIA servers
#[derive(Parser)]
#[command(name = "sia", version)]
#[command(about = "Command line tool for managing agents on SIA servers")]
#[command(
    long_about = "Command line tool for managing agents on SIA servers.\n\n\
SIA_SERVER_URL and SIA_API_KEY must be set (or given in a config file) before use, e.g.\n  \
export SIA_SERVER_URL=http://localhost:8080\n  export SIA_API_KEY=the-access-key"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn logging_overrides(&self) -> LoggingOverrides {
        LoggingOverrides {
            level: self.log_level.clone(),
            format: self.log_format.clone(),
            output: self.log_output.clone(),
            file: self.log_file.clone(),
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Log into the SIA server as admin
    Login {
        /// Admin password; prompted for when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Log out, clearing the stored access token
    Logout,
    /// Set the admin password (server console only)
    #[command(visible_alias = "spw")]
    Setpwd,
    /// Change the admin password (server console only)
    #[command(visible_alias = "cpw")]
    Changepwd,
    /// Manage agents
    Agent {
        #[command(subcommand)]
        command: AgentCommands,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum AgentCommands {
    /// List all agents
    #[command(visible_alias = "ls")]
    List,
    /// View information about an agent
    #[command(visible_alias = "vi")]
    View {
        #[arg(short, long)]
        name: String,
    },
    /// Delete an existing agent
    #[command(visible_alias = "del")]
    Delete {
        #[arg(short, long)]
        name: String,
    },
    /// Write a template for a new agent to the working directory
    Create,
    /// Download an agent as an editable YAML document
    Pull {
        #[arg(short, long)]
        name: String,
        /// Directory to write <name>.yaml into (default: working directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Push a YAML document to create or update an agent
    Push {
        #[arg(short, long)]
        name: String,
        /// Path to the YAML document
        #[arg(short, long)]
        file: PathBuf,
        /// create or update
        #[arg(short, long)]
        action: String,
    },
    /// Chat with an agent; type 'q' to quit
    Chat {
        #[arg(short, long)]
        name: String,
    },
}

/// CLI context for executing commands
pub struct CliContext {
    config: SiaConfig,
    backend: Arc<dyn AgentBackend>,
    tokens: TokenStore,
    runtime: Runtime,
    work_dir: PathBuf,
}

impl CliContext {
    /// Create a CLI context talking to the configured server.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = ConfigLoader::load_with(config_path.as_deref())?;
        let backend = Arc::new(HttpBackend::from_config(&config)?);
        let work_dir = std::env::current_dir().map_err(|e| ApiError::PathResolution {
            path: ".".to_string(),
            reason: e.to_string(),
        })?;
        Self::with_backend(config, backend, TokenStore::new()?, work_dir)
    }

    /// Create a context over an explicit backend and token store.
    pub fn with_backend(
        config: SiaConfig,
        backend: Arc<dyn AgentBackend>,
        tokens: TokenStore,
        work_dir: PathBuf,
    ) -> Result<Self, ApiError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ApiError::ConfigError(format!("Failed to start async runtime: {}", e)))?;
        Ok(Self {
            config,
            backend,
            tokens,
            runtime,
            work_dir,
        })
    }

    pub fn config(&self) -> &SiaConfig {
        &self.config
    }

    /// Logging settings from config with CLI flags applied.
    pub fn logging_config(&self, overrides: &LoggingOverrides) -> LoggingConfig {
        self.config.logging.clone().with_overrides(overrides)
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        tracing::debug!(command = ?command, "Executing command");
        match command {
            Commands::Login { password } => self.handle_login(password.as_deref()),
            Commands::Logout => {
                AuthService::logout(&self.tokens)?;
                Ok("Successfully logged out".to_string())
            }
            Commands::Setpwd => self.handle_setpwd(),
            Commands::Changepwd => self.handle_changepwd(),
            Commands::Agent { command } => self.handle_agent_command(command),
        }
    }

    fn handle_agent_command(&self, command: &AgentCommands) -> Result<String, ApiError> {
        let backend = self.backend.as_ref();
        match command {
            AgentCommands::List => {
                let token = self.tokens.load()?;
                let result = self
                    .runtime
                    .block_on(AgentCommandService::list(backend, &token))?;
                Ok(format!(
                    "{}\n\n{}",
                    format_section_heading("Agents"),
                    format_agent_table(&result.agents)
                ))
            }
            AgentCommands::View { name } => {
                let token = self.tokens.load()?;
                let result = self
                    .runtime
                    .block_on(AgentCommandService::view(backend, &token, name))?;
                Ok(format!(
                    "{}\n\n{}",
                    format_section_heading(&format!("Agent: {}", name)),
                    format_agent_details(&result.agent)?
                ))
            }
            AgentCommands::Delete { name } => {
                let token = self.tokens.load()?;
                let result = self
                    .runtime
                    .block_on(AgentCommandService::delete(backend, &token, name))?;
                Ok(format!("Agent '{}' successfully deleted", result.name))
            }
            AgentCommands::Create => {
                self.tokens.load()?;
                let result = AgentCommandService::create_template(&self.work_dir)?;
                Ok(format!(
                    "Template YAML file for new agent has been written to {}",
                    result.path.display()
                ))
            }
            AgentCommands::Pull { name, output } => {
                let token = self.tokens.load()?;
                let dir = output.clone().unwrap_or_else(|| self.work_dir.clone());
                let result = self
                    .runtime
                    .block_on(AgentCommandService::pull(backend, &token, name, &dir))?;
                Ok(format!(
                    "Agent data has been downloaded as {}",
                    result.path.display()
                ))
            }
            AgentCommands::Push { name, file, action } => {
                let token = self.tokens.load()?;
                let action = PushAction::parse(action, name)?;
                let file = self.work_dir.join(file);
                let result = self
                    .runtime
                    .block_on(AgentCommandService::push(backend, &token, &file, action))?;
                format_push_result(&result)
            }
            AgentCommands::Chat { name } => self.handle_chat(name),
        }
    }

    fn handle_login(&self, password: Option<&str>) -> Result<String, ApiError> {
        let password = match password {
            Some(p) if !p.is_empty() => p.to_string(),
            _ => read_hidden("Enter Admin Password")?,
        };
        self.runtime.block_on(AuthService::login(
            self.backend.as_ref(),
            &self.tokens,
            &password,
        ))?;
        Ok("You are logged in.".to_string())
    }

    fn handle_setpwd(&self) -> Result<String, ApiError> {
        self.ensure_console()?;
        let password = read_hidden("Enter a strong password (min 6 chars)")?;
        let repeat = read_hidden("Repeat above password")?;
        self.runtime.block_on(AuthService::set_admin_password(
            self.backend.as_ref(),
            &password,
            &repeat,
        ))?;
        Ok("Admin password successfully set. Login to proceed.".to_string())
    }

    fn handle_changepwd(&self) -> Result<String, ApiError> {
        self.ensure_console()?;
        let current = read_hidden("Enter the current admin password")?;
        let password = read_hidden("Enter a new strong password (min 6 chars)")?;
        let repeat = read_hidden("Repeat above password")?;
        self.runtime.block_on(AuthService::change_admin_password(
            self.backend.as_ref(),
            &self.tokens,
            &current,
            &password,
            &repeat,
        ))?;
        Ok("Admin password successfully changed.".to_string())
    }

    /// Password administration is refused before any prompt when the
    /// server is not local.
    fn ensure_console(&self) -> Result<(), ApiError> {
        let (server_url, _) = self.config.require_server()?;
        ensure_localhost(server_url)
    }

    /// Interactive chat loop; replies are printed as they arrive.
    fn handle_chat(&self, name: &str) -> Result<String, ApiError> {
        use dialoguer::Input;

        let mut session = ChatSession::new(name);
        println!("\nStarting chat session. Type 'q' to quit.\n");
        loop {
            let input: String = Input::new()
                .with_prompt("You  ")
                .allow_empty(true)
                .interact_text()
                .map_err(|e| ApiError::ConfigError(format!("Failed to get user input: {}", e)))?;
            if ChatSession::is_quit(&input) {
                break;
            }
            let reply = self
                .runtime
                .block_on(session.send(self.backend.as_ref(), &input))?;
            println!("Agent : {}", reply.content);
        }
        Ok("Exiting chat session.".to_string())
    }
}

fn read_hidden(prompt: &str) -> Result<String, ApiError> {
    dialoguer::Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| ApiError::ConfigError(format!("Failed to get user input: {}", e)))
}

fn format_push_result(result: &AgentPushResult) -> Result<String, ApiError> {
    let heading = match result.action {
        PushAction::Create => "Agent has been created",
        PushAction::Update { .. } => "Agent has been updated",
    };
    let removal = if result.source_removed {
        format!("{} has been deleted", result.source.display())
    } else {
        format!("{} could not be deleted", result.source.display())
    };
    Ok(format!(
        "{}\n\n{}\n{}",
        format_section_heading(heading),
        format_agent_details(&result.agent)?,
        removal
    ))
}

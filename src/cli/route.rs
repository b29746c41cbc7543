//! CLI route: single route table and run context.

use crate::cli::parse::{Commands, ConfigCommands};
use crate::cli::presentation::{format_config_toml, format_report, OutputFormat};
use crate::cli::session::run_session;
use crate::config::{AgentFlowConfig, ConfigLoader};
use crate::error::ApiError;
use crate::orchestrator::{GenerationOrchestrator, OperationReport, OperationStatus};
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing::info;

/// Runtime context for CLI execution: workspace and loaded configuration.
pub struct RunContext {
    config: AgentFlowConfig,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match config_path {
            Some(ref cfg_path) => ConfigLoader::load_from_file(cfg_path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        Ok(Self { config })
    }

    pub fn config(&self) -> &AgentFlowConfig {
        &self.config
    }

    /// Execute a command and return its stdout text.
    pub async fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Generate { text, format } => {
                let format = OutputFormat::parse(format)?;
                let orchestrator = self.orchestrator()?;
                let report = orchestrator.generate_all(text).await;
                self.finish(report, format)
            }
            Commands::Regenerate {
                field,
                text,
                format,
            } => {
                let format = OutputFormat::parse(format)?;
                let orchestrator = self.orchestrator()?;
                let report = orchestrator.regenerate_field(text, *field).await;
                self.finish(report, format)
            }
            Commands::Session => {
                let orchestrator = self.orchestrator()?;
                let stdin = BufReader::new(tokio::io::stdin());
                run_session(&orchestrator, stdin, tokio::io::stdout(), self.config.logging.color)
                    .await?;
                Ok("Session ended.".to_string())
            }
            Commands::Config { command } => match command {
                ConfigCommands::Show => format_config_toml(&self.config),
                ConfigCommands::Path => ConfigLoader::global_config_path()
                    .map(|path| path.display().to_string())
                    .ok_or_else(|| {
                        ApiError::ConfigError("No home directory to locate config in".to_string())
                    }),
            },
        }
    }

    fn orchestrator(&self) -> Result<GenerationOrchestrator, ApiError> {
        let orchestrator = GenerationOrchestrator::from_config(&self.config.service)?;
        info!(
            service = orchestrator.service().service_name(),
            endpoint = orchestrator.service().endpoint(),
            "Generation service ready"
        );
        Ok(orchestrator)
    }

    fn finish(&self, report: OperationReport, format: OutputFormat) -> Result<String, ApiError> {
        match report.status {
            OperationStatus::Applied => format_report(&report, format, self.config.logging.color),
            OperationStatus::Failed(kind) => Err(ApiError::Generation {
                kind,
                message: report.snapshot.error.unwrap_or_else(|| kind.to_string()),
            }),
            OperationStatus::SkippedEmptyInput => Err(ApiError::Validation(
                "input text is empty; describe the property first".to_string(),
            )),
            OperationStatus::RejectedBusy => Err(ApiError::Validation(
                "a generation request is already in flight".to_string(),
            )),
        }
    }
}

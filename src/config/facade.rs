//! Config loading facade: assembles sources and deserializes the result.

use super::merge::merge_policy;
use super::sources::{environment, global_file, workspace_file};
use super::AgentFlowConfig;
use crate::error::ApiError;
use config::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads [`AgentFlowConfig`] from layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load defaults, the global file, workspace files and environment overrides.
    pub fn load(workspace_root: &Path) -> Result<AgentFlowConfig, ApiError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder);

        let config: AgentFlowConfig = builder.build()?.try_deserialize()?;
        debug!(
            workspace_root = %workspace_root.display(),
            service_kind = ?config.service.kind,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Load from an explicit file. Replaces the global and workspace files;
    /// environment overrides still apply.
    pub fn load_from_file(path: &Path) -> Result<AgentFlowConfig, ApiError> {
        if !path.exists() {
            return Err(ApiError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()).required(true));
        let builder = environment::add_to_builder(builder);

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Location of the user-level config file, if a home directory is known.
    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }
}

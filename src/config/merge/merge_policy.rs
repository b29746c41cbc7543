//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("service.kind", "relay")?
        .set_default("service.model", "gpt-4o-mini")?
        .set_default("service.api_key_env", "OPENAI_API_KEY")?
        .set_default("service.require_api_key", false)?
        .set_default("service.system_instruction", true)?
        .set_default("service.connect_timeout_secs", 10)?
        .set_default("service.request_timeout_secs", 120)?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stderr")
}

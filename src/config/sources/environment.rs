//! Environment source: AGENTFLOW_SERVICE__ENDPOINT maps to `service.endpoint`.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("AGENTFLOW")
            .prefix_separator("_")
            .separator("__"),
    )
}

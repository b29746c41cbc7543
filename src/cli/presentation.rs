//! CLI presentation: render snapshots, reports and configuration.

use crate::config::AgentFlowConfig;
use crate::error::ApiError;
use crate::orchestrator::OperationReport;
use crate::output::OutputState;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use owo_colors::OwoColorize;

/// Output format for one-shot commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(format: &str) -> Result<Self, ApiError> {
        match format {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(ApiError::Validation(format!(
                "Invalid output format: {} (must be 'text' or 'json')",
                other
            ))),
        }
    }
}

/// Format the three fields as a table. Empty fields show as "-".
pub fn format_outputs_text(outputs: &OutputState) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Field", "Content"]);
    for (field, value) in outputs.iter() {
        let shown = if value.is_empty() { "-" } else { value };
        table.add_row(vec![field.label(), shown]);
    }
    table.to_string()
}

/// Format an operation report: the snapshot as JSON, or the table plus any error line.
pub fn format_report(
    report: &OperationReport,
    format: OutputFormat,
    color: bool,
) -> Result<String, ApiError> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|e| ApiError::Validation(format!("Failed to serialize report: {}", e))),
        OutputFormat::Text => {
            let mut out = format_outputs_text(&report.snapshot.outputs);
            if let Some(message) = &report.snapshot.error {
                out.push('\n');
                if color {
                    out.push_str(&format!("{}", message.red()));
                } else {
                    out.push_str(message);
                }
            }
            Ok(out)
        }
    }
}

/// Format the effective configuration as TOML.
pub fn format_config_toml(config: &AgentFlowConfig) -> Result<String, ApiError> {
    toml::to_string_pretty(config)
        .map_err(|e| ApiError::ConfigError(format!("Failed to serialize config: {}", e)))
}

//! CLI domain: parse, route, output, presentation and the interactive session.
//! No generation logic; commands dispatch to the orchestrator.

mod output;
mod parse;
mod presentation;
mod route;
mod session;

pub use output::map_error;
pub use parse::{Cli, Commands, ConfigCommands};
pub use presentation::{format_config_toml, format_outputs_text, format_report, OutputFormat};
pub use route::RunContext;
pub use session::run_session;

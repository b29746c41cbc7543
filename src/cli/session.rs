//! Interactive session: a line-oriented loop over one orchestrator.
//!
//! The description typed with `describe` is kept between commands, so `generate` and
//! `regen` work from the same text the way the form keeps it.

use crate::cli::presentation::format_outputs_text;
use crate::error::ApiError;
use crate::orchestrator::{GenerationOrchestrator, OperationReport, OperationStatus};
use crate::types::Field;
use owo_colors::OwoColorize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

const HELP: &str = "\
Commands:
  describe <text>       set the property description
  generate [text]       generate all fields (optionally replacing the description)
  regen <field>         regenerate one field (listing, caption, subject)
  edit <field> <text>   overwrite one field by hand
  show                  print the current fields
  help                  show this help
  quit                  leave the session
";

enum SessionCommand {
    Describe(String),
    Generate(Option<String>),
    Regen(Field),
    Edit(Field, String),
    Show,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Option<SessionCommand>, ApiError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    let command = match head {
        "describe" => SessionCommand::Describe(rest.to_string()),
        "generate" => SessionCommand::Generate((!rest.is_empty()).then(|| rest.to_string())),
        "regen" | "regenerate" => SessionCommand::Regen(rest.parse()?),
        "edit" => {
            let (field, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            SessionCommand::Edit(field.parse()?, text.trim().to_string())
        }
        "show" => SessionCommand::Show,
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" => SessionCommand::Quit,
        other => {
            return Err(ApiError::Validation(format!(
                "Unknown command '{}' (type 'help')",
                other
            )))
        }
    };
    Ok(Some(command))
}

fn render_report(report: &OperationReport, color: bool) -> String {
    match report.status {
        OperationStatus::Applied => format_outputs_text(&report.snapshot.outputs),
        OperationStatus::Failed(_) => {
            let message = report.snapshot.error.clone().unwrap_or_default();
            if color {
                format!("{}", message.red())
            } else {
                message
            }
        }
        OperationStatus::SkippedEmptyInput => "Describe the property first.".to_string(),
        OperationStatus::RejectedBusy => "A request is already in flight.".to_string(),
    }
}

/// Run the session until `quit` or end of input.
pub async fn run_session<R, W>(
    orchestrator: &GenerationOrchestrator,
    reader: R,
    mut writer: W,
    color: bool,
) -> Result<(), ApiError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut description = String::new();
    let mut lines = reader.lines();

    writer
        .write_all(b"AgentFlow session. Type 'help' for commands.\n> ")
        .await?;
    writer.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let reply = match parse_command(&line) {
            Ok(None) => None,
            Ok(Some(SessionCommand::Quit)) => break,
            Ok(Some(SessionCommand::Help)) => Some(HELP.trim_end().to_string()),
            Ok(Some(SessionCommand::Show)) => {
                let snapshot = orchestrator.snapshot();
                let mut out = format_outputs_text(&snapshot.outputs);
                if let Some(message) = snapshot.error {
                    out.push('\n');
                    out.push_str(&message);
                }
                Some(out)
            }
            Ok(Some(SessionCommand::Describe(text))) => {
                description = text;
                Some("Description saved.".to_string())
            }
            Ok(Some(SessionCommand::Generate(text))) => {
                if let Some(text) = text {
                    description = text;
                }
                let report = orchestrator.generate_all(&description).await;
                Some(render_report(&report, color))
            }
            Ok(Some(SessionCommand::Regen(field))) => {
                let report = orchestrator.regenerate_field(&description, field).await;
                Some(render_report(&report, color))
            }
            Ok(Some(SessionCommand::Edit(field, text))) => {
                let report = orchestrator.edit_field(field, &text);
                Some(render_report(&report, color))
            }
            Err(err) => {
                debug!(error = %err, "Session command rejected");
                Some(err.to_string())
            }
        };

        if let Some(reply) = reply {
            writer.write_all(reply.as_bytes()).await?;
            writer.write_all(b"\n").await?;
        }
        writer.write_all(b"> ").await?;
        writer.flush().await?;
    }

    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

pub mod event;
pub mod links;
pub mod rename;
pub mod save;

use crate::cli::Command;
use crate::workspace::Workspace;
use link_keeper_core::Edit;

/// Run one CLI command against a loaded workspace and render its output.
pub fn run(workspace: &mut Workspace, command: Command) -> anyhow::Result<String> {
    match command {
        Command::Rename { from, to, apply } => rename::execute(workspace, &from, &to, apply),
        Command::Save { path, before, apply } => save::execute(workspace, &path, &before, apply),
        Command::Event { file, apply } => event::execute(workspace, &file, apply),
        Command::Links { path } => links::execute(workspace, &path),
    }
}

/// Print the edits as JSON, or write them to the workspace and summarize.
fn finish(workspace: &mut Workspace, edits: Vec<Edit>, apply: bool) -> anyhow::Result<String> {
    if !apply {
        return Ok(serde_json::to_string_pretty(&edits)?);
    }

    let report = workspace.apply(&edits)?;
    Ok(format!(
        "Applied {} edits to {} documents ({} skipped)",
        report.applied, report.documents, report.skipped
    ))
}

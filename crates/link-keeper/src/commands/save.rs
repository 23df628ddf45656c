use super::finish;
use crate::workspace::Workspace;
use anyhow::{anyhow, Context};
use link_keeper_core::{compute_edits, ChangeEvent};
use std::path::Path;

/// Execute `save`: compare `before_file` with the document's current text
/// and repair anchor links to renamed headings.
pub fn execute(workspace: &mut Workspace, path: &str, before_file: &Path, apply: bool) -> anyhow::Result<String> {
    let path = workspace.relative_path(path);
    let content_after = workspace
        .document(&path)
        .map(|d| d.content.clone())
        .ok_or_else(|| anyhow!("Document not found: {}", path))?;
    let content_before = std::fs::read_to_string(before_file)
        .with_context(|| format!("Failed to read {}", before_file.display()))?;

    let event = ChangeEvent::save(&path, content_before, content_after);
    let edits = compute_edits(&event, workspace.documents(), &workspace.options());
    tracing::info!("Save {}: {} edits", path, edits.len());

    finish(workspace, edits, apply)
}

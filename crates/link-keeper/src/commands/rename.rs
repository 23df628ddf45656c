use super::finish;
use crate::workspace::Workspace;
use anyhow::bail;
use link_keeper_core::{compute_edits, ChangeEvent};

/// Execute `rename`: move a document or folder and repair references to it.
///
/// If `to` is already present and `from` is gone, the move is taken as done
/// and only the edits are computed. Otherwise the move is simulated in memory,
/// and with `apply` also performed on disk before the edits are written.
pub fn execute(workspace: &mut Workspace, from: &str, to: &str, apply: bool) -> anyhow::Result<String> {
    let from = workspace.relative_path(from);
    let to = workspace.relative_path(to);

    if from == to {
        bail!("Source and destination are the same: {}", from);
    }

    let already_moved = !workspace.contains(&from) && workspace.contains(&to);
    if !already_moved {
        if !workspace.contains(&from) {
            bail!("Document not found: {}", from);
        }
        if workspace.contains(&to) {
            bail!("Path '{}' already exists", to);
        }
        if apply {
            workspace.move_on_disk(&from, &to)?;
        }
        workspace.relocate(&from, &to);
    }

    let event = ChangeEvent::rename(&from, &to);
    let edits = compute_edits(&event, workspace.documents(), &workspace.options());
    tracing::info!("Rename {} -> {}: {} edits", from, to, edits.len());

    finish(workspace, edits, apply)
}

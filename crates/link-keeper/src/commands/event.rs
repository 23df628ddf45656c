use super::finish;
use crate::workspace::Workspace;
use anyhow::Context;
use link_keeper_core::{compute_edits, ChangeEvent};
use std::io::Read;

/// Execute `event`: read a change event as JSON from `file` (or stdin for
/// `-`) and process it.
pub fn execute(workspace: &mut Workspace, file: &str, apply: bool) -> anyhow::Result<String> {
    let json = if file == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read event from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file))?
    };

    match ChangeEvent::from_json(&json)? {
        ChangeEvent::Rename(payload) => {
            super::rename::execute(workspace, &payload.path_before, &payload.path_after, apply)
        }
        ChangeEvent::Save(mut payload) => {
            payload.path = workspace.relative_path(&payload.path);
            let edits = compute_edits(&ChangeEvent::Save(payload), workspace.documents(), &workspace.options());
            finish(workspace, edits, apply)
        }
    }
}

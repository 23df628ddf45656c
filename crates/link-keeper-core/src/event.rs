use crate::anchor::compute_anchor_edits;
use crate::edit::Edit;
use crate::error::Result;
use crate::glob_filter::Options;
use crate::heading::detect_heading_renames;
use crate::rename::compute_rename_edits;
use serde::{Deserialize, Serialize};

/// A tracked document as the host currently sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub path: String,
    pub content: String,
}

impl Document {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenamePayload {
    pub path_before: String,
    pub path_after: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePayload {
    pub path: String,
    pub content_before: String,
    pub content_after: String,
}

/// A change reported by the host.
///
/// JSON form: `{"type": "rename", "payload": {"pathBefore": ..., "pathAfter": ...}}`
/// or `{"type": "save", "payload": {"path": ..., "contentBefore": ..., "contentAfter": ...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum ChangeEvent {
    Rename(RenamePayload),
    Save(SavePayload),
}

impl ChangeEvent {
    pub fn rename(path_before: impl Into<String>, path_after: impl Into<String>) -> Self {
        ChangeEvent::Rename(RenamePayload {
            path_before: path_before.into(),
            path_after: path_after.into(),
        })
    }

    pub fn save(
        path: impl Into<String>,
        content_before: impl Into<String>,
        content_after: impl Into<String>,
    ) -> Self {
        ChangeEvent::Save(SavePayload {
            path: path.into(),
            content_before: content_before.into(),
            content_after: content_after.into(),
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Compute the edits that repair references after `event`.
///
/// Renames are propagated across `documents`; saves only touch the saved
/// document and ignore `documents` and `options`. Never fails: anything that
/// cannot be resolved simply contributes no edit.
pub fn compute_edits(event: &ChangeEvent, documents: &[Document], options: &Options) -> Vec<Edit> {
    match event {
        ChangeEvent::Rename(payload) => {
            compute_rename_edits(&payload.path_before, &payload.path_after, documents, options)
        }
        ChangeEvent::Save(payload) => {
            let renames = detect_heading_renames(&payload.content_before, &payload.content_after);
            compute_anchor_edits(&payload.path, &payload.content_after, &renames)
        }
    }
}

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Zero-based line / character coordinate. `character` counts Unicode scalar
/// values from the start of the line, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

/// Half-open span `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Range covering `len` characters on a single line.
    pub fn on_line(line: usize, character: usize, len: usize) -> Self {
        Self {
            start: Position::new(line, character),
            end: Position::new(line, character + len),
        }
    }
}

/// A replacement of `range` in the document at `path` with `new_text`.
///
/// When `requires_path_to_exist` is set, the host should only apply the edit
/// if that corpus path names an existing document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edit {
    pub path: String,
    pub range: Range,
    pub new_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_path_to_exist: Option<String>,
}

/// Byte offsets of every line start, used to turn match offsets into
/// line / character positions and back.
#[derive(Debug)]
pub struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(idx, _)| idx + 1));
        Self { text, line_starts }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Position of a byte offset. The offset must lie on a char boundary.
    pub fn position(&self, offset: usize) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let character = self.text[self.line_starts[line]..offset].chars().count();
        Position::new(line, character)
    }

    /// Text of one line without its terminating `\n`.
    pub fn line(&self, line: usize) -> Option<&'a str> {
        let start = *self.line_starts.get(line)?;
        let end = self
            .line_starts
            .get(line + 1)
            .map(|next| next - 1)
            .unwrap_or(self.text.len());
        Some(&self.text[start..end])
    }

    /// Byte offset of a position, or `None` when it falls outside the text.
    pub fn offset(&self, position: Position) -> Option<usize> {
        let line_text = self.line(position.line)?;
        let line_start = self.line_starts[position.line];
        if position.character == 0 {
            return Some(line_start);
        }
        let mut chars = line_text.char_indices().map(|(idx, _)| idx).chain([line_text.len()]);
        chars.nth(position.character).map(|idx| line_start + idx)
    }
}

/// Apply the edits that target one document to its text.
///
/// Edits are applied from the end of the text backwards so earlier ranges stay
/// valid. An edit overlapping one that was already applied is dropped.
pub fn apply_edits(text: &str, edits: &[Edit]) -> Result<String> {
    let index = LineIndex::new(text);
    let mut spans = Vec::with_capacity(edits.len());

    for edit in edits {
        let out_of_range = |position: Position| Error::EditOutOfRange {
            line: position.line,
            character: position.character,
            line_count: index.line_count(),
        };
        let start = index
            .offset(edit.range.start)
            .ok_or_else(|| out_of_range(edit.range.start))?;
        let end = index
            .offset(edit.range.end)
            .ok_or_else(|| out_of_range(edit.range.end))?;
        spans.push((start, end.max(start), edit.new_text.as_str()));
    }

    // Reverse offset order for safe sequential application
    spans.sort_by(|a, b| b.0.cmp(&a.0));

    let mut result = text.to_string();
    let mut limit = usize::MAX;
    for (start, end, new_text) in spans {
        if end > limit {
            tracing::debug!("Skipping overlapping edit at byte {}", start);
            continue;
        }
        result.replace_range(start..end, new_text);
        limit = start;
    }

    Ok(result)
}

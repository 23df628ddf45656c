use regex::Regex;
use similar::{DiffOp, TextDiff};
use std::sync::LazyLock;

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(#+ )(.*)$").unwrap()
});

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+").unwrap()
});

/// A heading whose text changed while its level stayed the same.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingRename {
    pub old_header: String,
    pub new_header: String,
}

/// Split a line into its `#... ` prefix and heading text.
fn parse_heading(line: &str) -> Option<(&str, &str)> {
    let line = line.trim_end_matches(['\n', '\r']);
    let cap = HEADING_RE.captures(line)?;
    let prefix = cap.get(1)?.as_str();
    let text = cap.get(2)?.as_str();
    Some((prefix, text.trim()))
}

/// Find headings renamed between two versions of a document.
///
/// Diffs the texts line by line. Wherever removed lines are directly followed
/// by added lines, the last removed line and the first added line are
/// compared; if both are headings with the same `#` prefix, that is a rename.
/// Pairs are reported in document order and never merged.
pub fn detect_heading_renames(before: &str, after: &str) -> Vec<HeadingRename> {
    let diff = TextDiff::from_lines(before, after);
    let old_lines = diff.old_slices();
    let new_lines = diff.new_slices();
    let ops = diff.ops();

    let mut renames = Vec::new();
    for (i, op) in ops.iter().enumerate() {
        let (last_removed, first_added) = match op {
            DiffOp::Replace {
                old_index,
                old_len,
                new_index,
                ..
            } => (old_index + old_len - 1, *new_index),
            DiffOp::Delete {
                old_index, old_len, ..
            } => match ops.get(i + 1) {
                Some(DiffOp::Insert { new_index, .. }) => (old_index + old_len - 1, *new_index),
                _ => continue,
            },
            _ => continue,
        };

        let (Some((old_prefix, old_text)), Some((new_prefix, new_text))) = (
            parse_heading(old_lines[last_removed]),
            parse_heading(new_lines[first_added]),
        ) else {
            continue;
        };
        if old_prefix != new_prefix {
            continue;
        }

        renames.push(HeadingRename {
            old_header: old_text.to_string(),
            new_header: new_text.to_string(),
        });
    }

    tracing::trace!("Detected {} heading renames", renames.len());
    renames
}

/// Slug a heading the way it appears as a `#fragment`.
///
/// Lowercases, drops everything outside `[a-z0-9- ]`, and turns each run of
/// whitespace into a single `-`.
///
/// Example: `heading_to_anchor("Getting Started!")` → `"getting-started"`
pub fn heading_to_anchor(heading: &str) -> String {
    let kept: String = heading
        .to_lowercase()
        .chars()
        .filter(|c| matches!(c, 'a'..='z' | '0'..='9' | '-' | ' '))
        .collect();
    WHITESPACE_RE.replace_all(&kept, "-").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rename(old: &str, new: &str) -> HeadingRename {
        HeadingRename {
            old_header: old.into(),
            new_header: new.into(),
        }
    }

    // === detect_heading_renames ===

    #[test]
    fn detects_same_level_rename() {
        let renames = detect_heading_renames("# Old Title\nbody", "# New Title\nbody");
        assert_eq!(renames, vec![rename("Old Title", "New Title")]);
    }

    #[test]
    fn detects_nested_heading_rename() {
        let before = "# Doc\n\n## Setup\ntext\n\n## Usage\nmore\n";
        let after = "# Doc\n\n## Installation\ntext\n\n## Usage\nmore\n";
        assert_eq!(detect_heading_renames(before, after), vec![rename("Setup", "Installation")]);
    }

    #[test]
    fn level_change_is_not_a_rename() {
        assert!(detect_heading_renames("## Title\nbody", "# Title\nbody").is_empty());
        assert!(detect_heading_renames("## Title\nbody", "# Other\nbody").is_empty());
    }

    #[test]
    fn non_heading_substitution_is_ignored() {
        assert!(detect_heading_renames("# Title\nold body\n", "# Title\nnew body\n").is_empty());
        assert!(detect_heading_renames("plain\n", "# Heading\n").is_empty());
    }

    #[test]
    fn pure_insertions_and_deletions_are_ignored() {
        assert!(detect_heading_renames("# A\n", "# A\n# B\n").is_empty());
        assert!(detect_heading_renames("# A\n# B\n", "# A\n").is_empty());
    }

    #[test]
    fn reports_every_renamed_heading() {
        let before = "# A\nx\n# B\ny\n";
        let after = "# A2\nx\n# B2\ny\n";
        assert_eq!(
            detect_heading_renames(before, after),
            vec![rename("A", "A2"), rename("B", "B2")]
        );
    }

    #[test]
    fn handles_crlf_line_endings() {
        let renames = detect_heading_renames("# Old\r\nbody\r\n", "# New\r\nbody\r\n");
        assert_eq!(renames, vec![rename("Old", "New")]);
    }

    #[test]
    fn empty_inputs_yield_nothing() {
        assert!(detect_heading_renames("", "").is_empty());
        assert!(detect_heading_renames("", "# New\n").is_empty());
    }

    // === heading_to_anchor ===

    #[test]
    fn anchor_lowercases_and_hyphenates() {
        assert_eq!(heading_to_anchor("Old Title"), "old-title");
    }

    #[test]
    fn anchor_strips_punctuation() {
        assert_eq!(heading_to_anchor("Getting Started!"), "getting-started");
        assert_eq!(heading_to_anchor("What's new in v2.0?"), "whats-new-in-v20");
    }

    #[test]
    fn anchor_collapses_whitespace_runs() {
        assert_eq!(heading_to_anchor("C++ & Rust"), "c-rust");
        assert_eq!(heading_to_anchor("pre-existing  hyphen"), "pre-existing-hyphen");
    }
}

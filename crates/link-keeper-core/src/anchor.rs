use crate::edit::{Edit, Range};
use crate::heading::{heading_to_anchor, HeadingRename};
use regex::Regex;
use std::sync::LazyLock;

static LOCAL_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]*)\]\(([^)]*)\)").unwrap()
});

/// Rewrite same-document anchor links that point at a renamed heading.
///
/// Only the first `[label](link)` on each line is considered. When its link
/// is exactly `#` plus the old heading's anchor, the whole link is replaced by
/// `[label](#new-anchor)`. The edit covers that link only, so any other text
/// on the line is left as it was. Each matching rename yields its own edit, so
/// two renames sharing an old anchor produce two edits for the same line.
pub fn compute_anchor_edits(path: &str, content: &str, renames: &[HeadingRename]) -> Vec<Edit> {
    if renames.is_empty() {
        return Vec::new();
    }

    let anchors: Vec<(String, String)> = renames
        .iter()
        .map(|r| (heading_to_anchor(&r.old_header), heading_to_anchor(&r.new_header)))
        .filter(|(old, new)| old != new)
        .collect();

    let mut edits = Vec::new();
    for (line_number, line) in content.split('\n').enumerate() {
        let Some(cap) = LOCAL_LINK_RE.captures(line) else {
            continue;
        };
        let (Some(whole), Some(label), Some(link)) = (cap.get(0), cap.get(1), cap.get(2)) else {
            continue;
        };
        let Some(fragment) = link.as_str().strip_prefix('#') else {
            continue;
        };

        for (old_anchor, new_anchor) in &anchors {
            if fragment != old_anchor {
                continue;
            }
            let start = line[..whole.start()].chars().count();
            edits.push(Edit {
                path: path.to_string(),
                range: Range::on_line(line_number, start, whole.as_str().chars().count()),
                new_text: format!("[{}](#{})", label.as_str(), new_anchor),
                requires_path_to_exist: None,
            });
        }
    }

    tracing::debug!("{}: {} anchor edits", path, edits.len());
    edits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::apply_edits;
    use crate::heading::detect_heading_renames;

    fn rename(old: &str, new: &str) -> HeadingRename {
        HeadingRename {
            old_header: old.into(),
            new_header: new.into(),
        }
    }

    #[test]
    fn rewrites_link_to_renamed_heading() {
        let content = "# New Title\nbody\n[see](#old-title)";
        let edits = compute_anchor_edits("a.md", content, &[rename("Old Title", "New Title")]);
        assert_eq!(
            edits,
            vec![Edit {
                path: "a.md".into(),
                range: Range::on_line(2, 0, 17),
                new_text: "[see](#new-title)".into(),
                requires_path_to_exist: None,
            }]
        );
    }

    #[test]
    fn keeps_surrounding_text_on_the_line() {
        let content = "Read ñ [the intro](#intro) first.";
        let edits = compute_anchor_edits("a.md", content, &[rename("Intro", "Overview")]);
        assert_eq!(edits[0].range, Range::on_line(0, 7, 19));
        assert_eq!(
            apply_edits(content, &edits).unwrap(),
            "Read ñ [the intro](#overview) first."
        );
    }

    #[test]
    fn only_first_link_on_a_line_is_checked() {
        let content = "[a](other.md) then [b](#old)";
        assert!(compute_anchor_edits("a.md", content, &[rename("Old", "New")]).is_empty());
    }

    #[test]
    fn links_to_other_documents_are_ignored() {
        let content = "[x](b.md#old)";
        assert!(compute_anchor_edits("a.md", content, &[rename("Old", "New")]).is_empty());
    }

    #[test]
    fn unchanged_anchor_is_not_rewritten() {
        let content = "[x](#old-title)";
        assert!(compute_anchor_edits("a.md", content, &[rename("Old Title", "Old title!")]).is_empty());
    }

    #[test]
    fn each_matching_rename_produces_an_edit() {
        let content = "[x](#a)";
        let edits = compute_anchor_edits("a.md", content, &[rename("A", "B"), rename("A", "C")]);
        assert_eq!(edits.len(), 2);
        assert_eq!(edits[0].new_text, "[x](#b)");
        assert_eq!(edits[1].new_text, "[x](#c)");
    }

    #[test]
    fn level_change_produces_no_edits() {
        let before = "## Title\n[t](#title)";
        let after = "# Renamed\n[t](#title)";
        let renames = detect_heading_renames(before, after);
        assert!(renames.is_empty());
        assert!(compute_anchor_edits("a.md", after, &renames).is_empty());
    }
}

use crate::edit::LineIndex;
use crate::path::{is_external, to_posix};
use regex::{CaptureMatches, Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

// Compile regex once, reuse across calls
static INLINE_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\[[^\]\n]*\]\(\s*([^)#"\n]*?)(#[^)\s]*)?(?:\s+"[^"\n]*")?\s*\)"#).unwrap()
});

static IMG_SRC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r##"<img\b[^>]*?\ssrc\s*=\s*(?:"([^"#\n]*)(#[^"\n]*)?"|'([^'#\n]*)(#[^'\n]*)?')"##)
        .unwrap()
});

static WIKILINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[([^\]\n]*)\]\]").unwrap()
});

static FENCED_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[^\n]*\n.*?```|~~~[^\n]*\n.*?~~~").unwrap()
});

static INLINE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"`[^`\n]*`").unwrap()
});

/// A reference found in a document.
///
/// `line` and `col` locate the first character of `target`; `col` counts
/// characters, not bytes. A trailing `#fragment` (and a wikilink `|alias`) is
/// never part of `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkOccurrence {
    /// Referenced path with backslashes turned into forward slashes
    pub target: String,
    pub line: usize,
    pub col: usize,
    /// Set for `[[wikilinks]]`, which conventionally leave out `.md`
    pub replace_file_extension: bool,
}

impl LinkOccurrence {
    /// Length of `target` in characters, i.e. the width of its edit range.
    pub fn len(&self) -> usize {
        self.target.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }

    /// False for bare `#fragment` links and external URLs, which do not name
    /// another document of the corpus.
    pub fn points_into_corpus(&self) -> bool {
        !self.is_empty() && !is_external(&self.target)
    }
}

/// The reference syntaxes, in scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkKind {
    /// `[label](target#fragment)`
    Inline,
    /// `<img src="target#fragment">`
    Image,
    /// `[[target#fragment|alias]]`
    Wiki,
}

impl LinkKind {
    fn regex(self) -> &'static Regex {
        match self {
            LinkKind::Inline => &INLINE_LINK_RE,
            LinkKind::Image => &IMG_SRC_RE,
            LinkKind::Wiki => &WIKILINK_RE,
        }
    }

    fn next(self) -> Option<LinkKind> {
        match self {
            LinkKind::Inline => Some(LinkKind::Image),
            LinkKind::Image => Some(LinkKind::Wiki),
            LinkKind::Wiki => None,
        }
    }

    /// Byte offset and raw text of the target portion of a match.
    fn target<'h>(self, cap: &Captures<'h>) -> Option<(usize, &'h str)> {
        match self {
            LinkKind::Inline => cap.get(1).map(|m| (m.start(), m.as_str())),
            LinkKind::Image => cap.get(1).or_else(|| cap.get(3)).map(|m| (m.start(), m.as_str())),
            LinkKind::Wiki => {
                let content = cap.get(1)?;
                let raw = content.as_str();
                // The page name is the part before any '#' or '|'
                let name_end = raw
                    .find('#')
                    .unwrap_or(raw.len())
                    .min(raw.find('|').unwrap_or(raw.len()));
                let name = &raw[..name_end];
                let leading = name.len() - name.trim_start().len();
                Some((content.start() + leading, name.trim()))
            }
        }
    }
}

/// Build a set of byte ranges that are inside code blocks or inline code.
fn build_excluded_ranges(markdown: &str) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    for m in FENCED_CODE_RE.find_iter(markdown) {
        ranges.push((m.start(), m.end()));
    }
    for m in INLINE_CODE_RE.find_iter(markdown) {
        ranges.push((m.start(), m.end()));
    }
    ranges
}

/// Returns true if the byte offset falls within any excluded range.
fn is_excluded(offset: usize, excluded: &[(usize, usize)]) -> bool {
    excluded.iter().any(|&(start, end)| offset >= start && offset < end)
}

/// Lazy scan over every reference in a document. See [`get_all_links`].
pub struct Links<'a> {
    content: &'a str,
    index: LineIndex<'a>,
    excluded: Vec<(usize, usize)>,
    kind: LinkKind,
    matches: CaptureMatches<'static, 'a>,
}

impl<'a> Iterator for Links<'a> {
    type Item = LinkOccurrence;

    fn next(&mut self) -> Option<LinkOccurrence> {
        loop {
            let Some(cap) = self.matches.next() else {
                self.kind = self.kind.next()?;
                self.matches = self.kind.regex().captures_iter(self.content);
                continue;
            };

            // Skip if this match starts inside an excluded range
            let match_start = cap.get(0).map_or(0, |m| m.start());
            if is_excluded(match_start, &self.excluded) {
                continue;
            }

            let Some((offset, raw)) = self.kind.target(&cap) else {
                continue;
            };
            let position = self.index.position(offset);

            return Some(LinkOccurrence {
                target: to_posix(raw),
                line: position.line,
                col: position.character,
                replace_file_extension: self.kind == LinkKind::Wiki,
            });
        }
    }
}

/// Scan `content` for inline links, `<img>` sources and wikilinks, in that
/// order. Each call starts a fresh scan. References inside fenced code blocks
/// and inline code are skipped; empty targets are still yielded.
pub fn get_all_links(content: &str) -> Links<'_> {
    Links {
        content,
        index: LineIndex::new(content),
        excluded: build_excluded_ranges(content),
        kind: LinkKind::Inline,
        matches: LinkKind::Inline.regex().captures_iter(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(content: &str) -> Vec<String> {
        get_all_links(content).map(|l| l.target).collect()
    }

    // === inline links ===

    #[test]
    fn extracts_inline_link() {
        let links: Vec<_> = get_all_links("See [x](notes/foo.md) here").collect();
        assert_eq!(
            links,
            vec![LinkOccurrence {
                target: "notes/foo.md".into(),
                line: 0,
                col: 8,
                replace_file_extension: false,
            }]
        );
    }

    #[test]
    fn inline_fragment_is_not_part_of_target() {
        let links: Vec<_> = get_all_links("[x](a.md#section)").collect();
        assert_eq!(links[0].target, "a.md");
        assert_eq!(links[0].len(), 4);
    }

    #[test]
    fn inline_title_is_not_part_of_target() {
        assert_eq!(targets(r#"[x](a.md "A title")"#), vec!["a.md"]);
    }

    #[test]
    fn fragment_only_link_yields_empty_target() {
        let links: Vec<_> = get_all_links("[see](#old-title)").collect();
        assert_eq!(links.len(), 1);
        assert!(links[0].is_empty());
    }

    #[test]
    fn urls_and_fragments_do_not_point_into_corpus() {
        let links: Vec<_> = get_all_links("[a](#x) [b](https://e.com/a.md) [c](c.md)").collect();
        let flags: Vec<bool> = links.iter().map(LinkOccurrence::points_into_corpus).collect();
        assert_eq!(flags, vec![false, false, true]);
    }

    #[test]
    fn inline_target_may_contain_spaces() {
        let links: Vec<_> = get_all_links("[x](my notes/a.md#top) [y]( b.md \"B\" )").collect();
        let found: Vec<(&str, usize)> = links.iter().map(|l| (l.target.as_str(), l.col)).collect();
        assert_eq!(found, vec![("my notes/a.md", 4), ("b.md", 28)]);
        assert_eq!(links[0].len(), 13);
    }

    #[test]
    fn image_markdown_counts_as_inline() {
        assert_eq!(targets("![alt](img/a.png)"), vec!["img/a.png"]);
    }

    // === <img> tags ===

    #[test]
    fn extracts_img_src() {
        let links: Vec<_> = get_all_links(r#"<img width="3" src="pics/a.png#x" alt="a">"#).collect();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target, "pics/a.png");
        assert_eq!(links[0].col, 20);
        assert!(!links[0].replace_file_extension);
    }

    #[test]
    fn data_src_attribute_is_not_the_source() {
        let links: Vec<_> = get_all_links(r#"<img data-src="lazy.png" src="real.png">"#).collect();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target, "real.png");
        assert_eq!(links[0].col, 30);
    }

    #[test]
    fn extracts_single_quoted_img_src() {
        assert_eq!(targets("<img src='pics/b.png'>"), vec!["pics/b.png"]);
    }

    // === wikilinks ===

    #[test]
    fn extracts_wikilink_with_anchor_and_alias() {
        let links: Vec<_> = get_all_links("[[Foo#Sec|Display]]").collect();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target, "Foo");
        assert_eq!(links[0].col, 2);
        assert!(links[0].replace_file_extension);
    }

    #[test]
    fn wikilink_whitespace_is_outside_range() {
        let links: Vec<_> = get_all_links("[[ Foo ]]").collect();
        assert_eq!(links[0].target, "Foo");
        assert_eq!(links[0].col, 3);
    }

    #[test]
    fn preserves_relative_parent_segments() {
        assert_eq!(targets("[[../Ideas]]"), vec!["../Ideas"]);
    }

    // === positions and ordering ===

    #[test]
    fn families_are_scanned_in_order() {
        let content = "[[wiki]]\n<img src=\"i.png\">\n[a](b.md)";
        assert_eq!(targets(content), vec!["b.md", "i.png", "wiki"]);
    }

    #[test]
    fn positions_are_line_and_character() {
        let content = "# Title\n\nÄ [[Foo]] and [x](dir/y.md)";
        let links: Vec<_> = get_all_links(content).collect();
        assert_eq!((links[0].target.as_str(), links[0].line, links[0].col), ("dir/y.md", 2, 18));
        assert_eq!((links[1].target.as_str(), links[1].line, links[1].col), ("Foo", 2, 4));
    }

    #[test]
    fn normalizes_backslashes() {
        let links: Vec<_> = get_all_links(r"[x](notes\sub\a.md)").collect();
        assert_eq!(links[0].target, "notes/sub/a.md");
        assert_eq!(links[0].len(), 14);
    }

    #[test]
    fn scan_is_restartable() {
        let content = "[[A]] then [[B]]";
        assert_eq!(targets(content), targets(content));
        assert_eq!(targets(content), vec!["A", "B"]);
    }

    // === exclusions ===

    #[test]
    fn skips_links_inside_fenced_code() {
        assert_eq!(targets("```\n[[Foo]]\n[x](a.md)\n```\n[[Bar]]"), vec!["Bar"]);
    }

    #[test]
    fn skips_links_inside_inline_code() {
        assert_eq!(targets("`[[Foo]]` and [[Bar]]"), vec!["Bar"]);
    }

    #[test]
    fn empty_content_yields_nothing() {
        assert_eq!(get_all_links("").count(), 0);
        assert_eq!(get_all_links("plain text").count(), 0);
    }
}

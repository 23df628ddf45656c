//! Posix-style path arithmetic on plain strings.
//!
//! Every function accepts either separator convention and works on the
//! forward-slash form, so results never depend on the host platform.

/// Extension assumed for references that omit one.
pub const MARKDOWN_EXTENSION: &str = "md";

const MARKDOWN_SUFFIX: &str = ".md";

/// Replace backslash separators with forward slashes.
pub fn to_posix(path: &str) -> String {
    path.replace('\\', "/")
}

/// Resolve `.` and `..` segments and collapse duplicate separators.
///
/// A leading `/` is preserved. `..` segments that climb past the start of a
/// relative path are kept; past the root of an absolute path they are dropped.
/// The empty path normalizes to `"."`.
///
/// Example: `normalize("a//b/./c/../d.md")` → `"a/b/d.md"`
pub fn normalize(path: &str) -> String {
    let path = to_posix(path);
    let absolute = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if absolute => {}
                _ => segments.push(".."),
            },
            _ => segments.push(part),
        }
    }

    let joined = segments.join("/");
    if absolute {
        format!("/{}", joined)
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Everything before the last separator. `"."` for a bare file name.
pub fn dirname(path: &str) -> String {
    let path = normalize(path);
    match path.rfind('/') {
        Some(0) => "/".to_string(),
        Some(idx) => path[..idx].to_string(),
        None => ".".to_string(),
    }
}

/// Join two paths and normalize the result.
pub fn join(base: &str, path: &str) -> String {
    if base.is_empty() {
        return normalize(path);
    }
    normalize(&format!("{}/{}", base, path))
}

fn segments(path: &str) -> Vec<String> {
    let normalized = normalize(path);
    normalized
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .map(str::to_string)
        .collect()
}

/// Shortest relative path from directory `from` to `to`.
///
/// Returns the empty string when both name the same location.
///
/// Examples:
/// - `relative("docs", "docs/a/b.md")` → `"a/b.md"`
/// - `relative("docs/notes", "archive/b.md")` → `"../../archive/b.md"`
pub fn relative(from: &str, to: &str) -> String {
    let from_segments = segments(from);
    let to_segments = segments(to);

    let common_len = from_segments
        .iter()
        .zip(to_segments.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let ups = from_segments.len() - common_len;
    let mut parts: Vec<&str> = Vec::with_capacity(ups + to_segments.len() - common_len);
    for _ in 0..ups {
        parts.push("..");
    }
    parts.extend(to_segments[common_len..].iter().map(String::as_str));

    parts.join("/")
}

/// True iff `path` is `folder/` followed by at least one more character.
pub fn is_under(path: &str, folder: &str) -> bool {
    path.strip_prefix(folder)
        .and_then(|rest| rest.strip_prefix('/'))
        .is_some_and(|rest| !rest.is_empty())
}

/// True when the final segment carries a `.ext` suffix.
pub fn has_extension(path: &str) -> bool {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    match file_name.rfind('.') {
        Some(idx) => idx > 0 && idx + 1 < file_name.len(),
        None => false,
    }
}

/// Append `.md` to a path whose last segment has no extension.
pub fn with_markdown_extension(path: &str) -> String {
    if has_extension(path) {
        path.to_string()
    } else {
        format!("{}{}", path, MARKDOWN_SUFFIX)
    }
}

/// Drop a trailing `.md`, leaving other extensions alone.
pub fn strip_markdown_extension(path: &str) -> &str {
    path.strip_suffix(MARKDOWN_SUFFIX).unwrap_or(path)
}

/// Corpus path that a reference written in `document_dir` points at. A target
/// without an extension is taken to name a markdown file.
///
/// Example: `resolve_link_target("docs/notes", "../Ideas")` → `"docs/Ideas.md"`
pub fn resolve_link_target(document_dir: &str, target: &str) -> String {
    with_markdown_extension(&join(document_dir, target))
}

/// True for targets that carry a URI scheme such as `https:` or `mailto:`.
///
/// A single letter before the colon is treated as a drive letter, not a scheme.
pub fn is_external(target: &str) -> bool {
    match target.find(':') {
        Some(idx) if idx > 1 => target[..idx]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')),
        _ => false,
    }
}

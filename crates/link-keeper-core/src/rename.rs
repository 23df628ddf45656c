use crate::edit::{Edit, Range};
use crate::event::Document;
use crate::glob_filter::Options;
use crate::link_parser::{get_all_links, LinkOccurrence};
use crate::path::{
    dirname, has_extension, is_under, join, normalize, relative,
    resolve_link_target, strip_markdown_extension, with_markdown_extension,
};

/// Compute the edits that keep references intact after `path_before` was
/// renamed or moved to `path_after` (a file or a whole folder).
///
/// The documents must already reflect the move: the moved file sits at
/// `path_after` with its content unchanged.
///
/// Edits come out in two groups:
/// 1. the moved document's own relative references, rebased on its new location
/// 2. references from every included document to the moved path, or to a
///    path under a moved folder
///
/// Within a group, edits follow document order, then scan order.
pub fn compute_rename_edits(
    path_before: &str,
    path_after: &str,
    documents: &[Document],
    options: &Options,
) -> Vec<Edit> {
    let path_before = normalize(path_before);
    let path_after = normalize(path_after);

    let mut edits = rebase_moved_document(&path_before, &path_after, documents);
    let rebased = edits.len();
    edits.extend(repair_references(&path_before, &path_after, documents, options));

    tracing::debug!(
        "Rename {} -> {}: {} rebased, {} repaired",
        path_before,
        path_after,
        rebased,
        edits.len() - rebased
    );

    edits
}

fn link_edit(document: &Document, link: &LinkOccurrence, new_text: String, requires: Option<String>) -> Edit {
    Edit {
        path: document.path.clone(),
        range: Range::on_line(link.line, link.col, link.len()),
        new_text,
        requires_path_to_exist: requires,
    }
}

// ---------------------------------------------------------------------------
// Moved document: rebase its outgoing references
// ---------------------------------------------------------------------------

/// Relative references inside the moved document were written against its
/// old directory. Resolve each one from there and re-express it from the new
/// directory. The referenced file is not known to exist, so every edit asks
/// the host to check.
fn rebase_moved_document(path_before: &str, path_after: &str, documents: &[Document]) -> Vec<Edit> {
    let Some(document) = documents.iter().find(|d| normalize(&d.path) == path_after) else {
        return Vec::new();
    };

    let old_dir = dirname(path_before);
    let new_dir = dirname(path_after);
    let mut edits = Vec::new();

    for link in get_all_links(&document.content) {
        if !link.points_into_corpus() {
            continue;
        }

        let absolute_target = join(&old_dir, &link.target);
        let new_link = normalize(&relative(&new_dir, &absolute_target));
        if normalize(&link.target) == new_link {
            continue;
        }

        // Wikilinks name a markdown file without its extension
        let requires = if link.replace_file_extension {
            with_markdown_extension(&absolute_target)
        } else {
            absolute_target
        };
        edits.push(link_edit(document, &link, new_link, Some(requires)));
    }

    edits
}

// ---------------------------------------------------------------------------
// Other documents: repair references to the moved path
// ---------------------------------------------------------------------------

fn repair_references(
    path_before: &str,
    path_after: &str,
    documents: &[Document],
    options: &Options,
) -> Vec<Edit> {
    let filter = options.glob_filter();
    if !filter.should_include_path(path_before) {
        tracing::debug!("{} is excluded, skipping reference repair", path_before);
        return Vec::new();
    }

    let mut edits = Vec::new();
    for document in documents.iter().filter(|d| filter.should_include_path(&d.path)) {
        let document_dir = dirname(&document.path);
        for link in get_all_links(&document.content) {
            if !link.points_into_corpus() {
                continue;
            }
            if let Some(edit) = repair_link(document, &document_dir, &link, path_before, path_after) {
                edits.push(edit);
            }
        }
    }

    edits
}

/// Rewrite one reference if it points at `path_before` or into it.
///
/// A target without an extension is compared as a markdown file, and the
/// rewritten target drops `.md` again so the reference keeps its style.
fn repair_link(
    document: &Document,
    document_dir: &str,
    link: &LinkOccurrence,
    path_before: &str,
    path_after: &str,
) -> Option<Edit> {
    let absolute_target = resolve_link_target(document_dir, &link.target);

    let (new_absolute_target, requires) = if absolute_target == path_before {
        // The destination is the moved file itself
        (path_after.to_string(), None)
    } else if is_under(&absolute_target, path_before) {
        let rest = &absolute_target[path_before.len() + 1..];
        let moved = format!("{}/{}", path_after, rest);
        (moved.clone(), Some(moved))
    } else {
        return None;
    };

    let mut new_link = relative(document_dir, &new_absolute_target);
    if !has_extension(&link.target) {
        new_link = strip_markdown_extension(&new_link).to_string();
    }
    if normalize(&new_link) == normalize(&link.target) {
        return None;
    }

    Some(link_edit(document, link, new_link, requires))
}

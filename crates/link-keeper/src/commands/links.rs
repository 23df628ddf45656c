use crate::workspace::Workspace;
use anyhow::anyhow;
use link_keeper_core::path::{dirname, resolve_link_target};
use link_keeper_core::{get_all_links, Document};

/// Execute `links`: list backlinks and forward links for a document.
pub fn execute(workspace: &Workspace, path: &str) -> anyhow::Result<String> {
    let path = workspace.relative_path(path);
    let document = workspace
        .document(&path)
        .ok_or_else(|| anyhow!("Document not found: {}", path))?;

    let backlink_paths = read_backlinks(workspace, &path);
    let forward_link_paths = read_forward_links(workspace, document);

    // Format output
    let mut output = String::new();
    output.push_str("Backlinks (documents linking to this):\n");
    if backlink_paths.is_empty() {
        output.push_str("- (none)\n");
    } else {
        for path in &backlink_paths {
            output.push_str(&format!("- {}\n", path));
        }
    }

    output.push_str("\nForward links (documents this links to):\n");
    if forward_link_paths.is_empty() {
        output.push_str("- (none)\n");
    } else {
        for path in &forward_link_paths {
            output.push_str(&format!("- {}\n", path));
        }
    }

    Ok(output)
}

/// Corpus paths the document's references resolve to.
fn resolved_targets(document: &Document) -> impl Iterator<Item = String> + '_ {
    let document_dir = dirname(&document.path);
    get_all_links(&document.content)
        .filter(|link| link.points_into_corpus())
        .map(move |link| resolve_link_target(&document_dir, &link.target))
}

/// Documents other than `path` with a reference that resolves to it.
fn read_backlinks(workspace: &Workspace, path: &str) -> Vec<String> {
    workspace
        .documents()
        .iter()
        .filter(|d| d.path != path)
        .filter(|d| resolved_targets(d).any(|target| target == path))
        .map(|d| d.path.clone())
        .collect()
}

/// Resolvable references, deduplicated. Unresolvable ones are skipped.
fn read_forward_links(workspace: &Workspace, document: &Document) -> Vec<String> {
    let mut forward_links: Vec<String> = resolved_targets(document)
        .filter(|target| workspace.document(target).is_some())
        .collect();
    forward_links.sort();
    forward_links.dedup();
    forward_links
}

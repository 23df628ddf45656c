use crate::config::Config;
use anyhow::{bail, Context};
use link_keeper_core::path::{is_under, normalize, to_posix};
use link_keeper_core::{apply_edits, Document, Edit, Options};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Documents loaded from a directory tree, with workspace-relative
/// forward-slash paths.
pub struct Workspace {
    root: PathBuf,
    config: Config,
    documents: Vec<Document>,
}

/// Outcome of writing edits back to disk.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub applied: usize,
    pub skipped: usize,
    pub documents: usize,
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

impl Workspace {
    /// Walk `root` and read every file whose extension the config lists.
    /// Hidden files and directories are skipped. Documents are sorted by path.
    pub fn load(root: &Path, config: Config) -> anyhow::Result<Self> {
        let root = root
            .canonicalize()
            .with_context(|| format!("Failed to resolve workspace root {}", root.display()))?;
        let mut documents = Vec::new();

        for entry in WalkDir::new(&root).into_iter().filter_entry(|e| !is_hidden(e)) {
            let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
            if !entry.file_type().is_file() || !config.is_document(entry.path()) {
                continue;
            }
            let relative = entry.path().strip_prefix(&root).unwrap_or(entry.path());
            let content = match std::fs::read_to_string(entry.path()) {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!("Skipping unreadable {}: {}", entry.path().display(), e);
                    continue;
                }
            };
            documents.push(Document::new(to_posix(&relative.to_string_lossy()), content));
        }

        documents.sort_by(|a, b| a.path.cmp(&b.path));
        tracing::info!("Loaded {} documents from {}", documents.len(), root.display());

        Ok(Self {
            root,
            config,
            documents,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn options(&self) -> Options {
        self.config.options()
    }

    pub fn document(&self, path: &str) -> Option<&Document> {
        let path = normalize(path);
        self.documents.iter().find(|d| d.path == path)
    }

    /// Turn a user-supplied path (absolute, or relative to the root) into the
    /// workspace-relative form documents use.
    pub fn relative_path(&self, path: &str) -> String {
        let as_path = Path::new(path);
        let relative = self.strip_root(as_path).unwrap_or_else(|| as_path.to_path_buf());
        normalize(&to_posix(&relative.to_string_lossy()))
    }

    /// Strip the canonical root from an absolute path. The path itself may not
    /// exist yet (a rename destination), so only its parent is canonicalized.
    fn strip_root(&self, path: &Path) -> Option<PathBuf> {
        if !path.is_absolute() {
            return None;
        }
        if let Ok(rest) = path.strip_prefix(&self.root) {
            return Some(rest.to_path_buf());
        }
        let canonical = path.parent()?.canonicalize().ok()?.join(path.file_name()?);
        canonical.strip_prefix(&self.root).ok().map(Path::to_path_buf)
    }

    /// True if `path` is a document or the folder of one.
    pub fn contains(&self, path: &str) -> bool {
        self.documents
            .iter()
            .any(|d| d.path == path || is_under(&d.path, path))
    }

    fn exists(&self, path: &str) -> bool {
        self.contains(path) || self.root.join(path).exists()
    }

    /// In-memory view of the move `from` -> `to`, for a file or a folder.
    pub fn relocate(&mut self, from: &str, to: &str) {
        for document in &mut self.documents {
            if document.path == from {
                document.path = to.to_string();
            } else if is_under(&document.path, from) {
                document.path = format!("{}/{}", to, &document.path[from.len() + 1..]);
            }
        }
        self.documents.sort_by(|a, b| a.path.cmp(&b.path));
    }

    /// Move `from` to `to` on disk, creating parent directories.
    pub fn move_on_disk(&self, from: &str, to: &str) -> anyhow::Result<()> {
        let source = self.root.join(from);
        let target = self.root.join(to);
        if target.exists() {
            bail!("Path '{}' already exists", to);
        }
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::rename(&source, &target)
            .with_context(|| format!("Failed to move {} to {}", source.display(), target.display()))?;
        tracing::info!("Moved {} -> {}", from, to);
        Ok(())
    }

    /// Write edits back to their documents.
    ///
    /// Edits whose `requires_path_to_exist` names nothing in the workspace are
    /// skipped. All remaining edits for one document are applied together.
    pub fn apply(&mut self, edits: &[Edit]) -> anyhow::Result<ApplyReport> {
        let mut report = ApplyReport::default();
        let mut by_document: BTreeMap<&str, Vec<Edit>> = BTreeMap::new();

        for edit in edits {
            if let Some(required) = &edit.requires_path_to_exist {
                if !self.exists(required) {
                    tracing::warn!(
                        "Skipping edit in {}: {} does not exist",
                        edit.path,
                        required
                    );
                    report.skipped += 1;
                    continue;
                }
            }
            by_document.entry(edit.path.as_str()).or_default().push(edit.clone());
        }

        for (path, document_edits) in by_document {
            let Some(document) = self.documents.iter_mut().find(|d| d.path == path) else {
                tracing::warn!("Skipping {} edits for unknown document {}", document_edits.len(), path);
                report.skipped += document_edits.len();
                continue;
            };

            let updated = apply_edits(&document.content, &document_edits)
                .with_context(|| format!("Failed to apply edits to {}", path))?;
            let file = self.root.join(path);
            std::fs::write(&file, &updated)
                .with_context(|| format!("Failed to write {}", file.display()))?;
            document.content = updated;

            tracing::debug!("Applied {} edits to {}", document_edits.len(), path);
            report.applied += document_edits.len();
            report.documents += 1;
        }

        Ok(report)
    }
}

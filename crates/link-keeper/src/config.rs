use anyhow::Context;
use link_keeper_core::path::MARKDOWN_EXTENSION;
use link_keeper_core::Options;
use serde::Deserialize;
use std::path::Path;

/// File looked up at the workspace root when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "link-keeper.toml";

/// Contents of `link-keeper.toml`.
///
/// ```toml
/// include = ["docs/**"]
/// exclude = ["docs/drafts/**"]
/// extensions = ["md", "markdown"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    /// File extensions loaded as documents
    pub extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            exclude: Vec::new(),
            extensions: vec![MARKDOWN_EXTENSION.to_string()],
        }
    }
}

impl Config {
    /// Read the config from `explicit`, or from `root/link-keeper.toml` if it
    /// exists. A missing default file means default settings; a missing
    /// explicit file is an error.
    pub fn load(root: &Path, explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default_path = root.join(CONFIG_FILE_NAME);
                if !default_path.exists() {
                    tracing::debug!("No {} in {}, using defaults", CONFIG_FILE_NAME, root.display());
                    return Ok(Self::default());
                }
                default_path
            }
        };

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::parse(&text)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Engine options. Document paths are already workspace-relative, so no
    /// workspace path is set.
    pub fn options(&self) -> Options {
        Options {
            include: self.include.clone(),
            exclude: self.exclude.clone(),
            workspace_path: None,
        }
    }

    pub fn is_document(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}

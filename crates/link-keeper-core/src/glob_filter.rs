use crate::path::{relative, to_posix};
use glob_match::glob_match;
use serde::{Deserialize, Serialize};

/// Glob configuration for rename propagation.
///
/// An empty `include` list means "everything not excluded".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    pub exclude: Vec<String>,
    pub include: Vec<String>,
    pub workspace_path: Option<String>,
}

impl Options {
    pub fn glob_filter(&self) -> GlobFilter<'_> {
        GlobFilter::new(&self.include, &self.exclude, self.workspace_path.as_deref())
    }
}

/// Include / exclude glob matching against workspace-relative paths.
///
/// A non-empty include list is exhaustive: a path it does not match is out,
/// whatever the exclude list says.
#[derive(Debug, Clone, Copy)]
pub struct GlobFilter<'a> {
    include: &'a [String],
    exclude: &'a [String],
    workspace_path: Option<&'a str>,
}

impl<'a> GlobFilter<'a> {
    pub fn new(include: &'a [String], exclude: &'a [String], workspace_path: Option<&'a str>) -> Self {
        Self {
            include,
            exclude,
            workspace_path,
        }
    }

    pub fn should_include_path(&self, file_path: &str) -> bool {
        let relative_path = relative(self.workspace_path.unwrap_or(""), &to_posix(file_path));

        if matches_any(self.include, &relative_path) {
            return true;
        }
        if !self.include.is_empty() {
            return false;
        }
        !matches_any(self.exclude, &relative_path)
    }
}

fn matches_any(patterns: &[String], value: &str) -> bool {
    patterns.iter().any(|pattern| glob_match(pattern, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(patterns: &[&str]) -> Vec<String> {
        patterns.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn empty_lists_include_everything() {
        let filter = GlobFilter::new(&[], &[], None);
        assert!(filter.should_include_path("any/where.md"));
    }

    #[test]
    fn exclude_pattern_rejects_match() {
        let exclude = strings(&["folder/**"]);
        let filter = GlobFilter::new(&[], &exclude, None);
        assert!(!filter.should_include_path("folder/a.md"));
        assert!(!filter.should_include_path("folder/deep/b.md"));
        assert!(filter.should_include_path("other/a.md"));
    }

    #[test]
    fn non_empty_include_is_exhaustive() {
        let include = strings(&["docs/**/*.md"]);
        let filter = GlobFilter::new(&include, &[], None);
        assert!(filter.should_include_path("docs/a/b.md"));
        assert!(!filter.should_include_path("notes/b.md"));
    }

    #[test]
    fn include_wins_over_exclude() {
        let include = strings(&["docs/*.md"]);
        let exclude = strings(&["docs/**"]);
        let filter = GlobFilter::new(&include, &exclude, None);
        assert!(filter.should_include_path("docs/a.md"));
    }

    #[test]
    fn paths_are_relative_to_workspace() {
        let options = Options {
            exclude: strings(&["drafts/*"]),
            workspace_path: Some("/home/me/vault".into()),
            ..Options::default()
        };
        let filter = options.glob_filter();
        assert!(!filter.should_include_path("/home/me/vault/drafts/a.md"));
        assert!(filter.should_include_path("/home/me/vault/notes/a.md"));
    }

    #[test]
    fn backslash_paths_are_matched_in_posix_form() {
        let exclude = strings(&["drafts/?.md", "{tmp,cache}/**"]);
        let filter = GlobFilter::new(&[], &exclude, None);
        assert!(!filter.should_include_path(r"drafts\a.md"));
        assert!(!filter.should_include_path("cache/x/y.md"));
        assert!(filter.should_include_path("drafts/ab.md"));
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: Options = serde_json::from_str(r#"{"exclude": ["a/**"]}"#).unwrap();
        assert_eq!(options.exclude, vec!["a/**"]);
        assert!(options.include.is_empty());
        assert_eq!(options.workspace_path, None);
    }
}

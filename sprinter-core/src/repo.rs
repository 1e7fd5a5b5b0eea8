//! Repository identifiers and repository set resolution

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// An `owner/name` pair identifying one repository
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RepoId {
    owner: String,
    name: String,
}

impl RepoId {
    /// Create a repository identifier from its parts
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse an `owner/name` slug.
    ///
    /// The slug must contain exactly one `/` with a non-empty value on each
    /// side.
    pub fn parse(slug: &str) -> Result<Self> {
        let slug = slug.trim();
        match slug.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self::new(owner, name))
            }
            _ => Err(Error::config(format!(
                "Incorrect repo slug format \"{}\". Use \"org/repo\"",
                slug
            ))),
        }
    }

    /// Organization or user owning the repository
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The `owner/name` slug
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl AsRef<RepoId> for RepoId {
    fn as_ref(&self) -> &RepoId {
        self
    }
}

/// Turn an ordered list of slugs into repository identifiers.
///
/// Order and duplicates are preserved. An empty list or any malformed slug is
/// a configuration error.
pub fn resolve<S: AsRef<str>>(slugs: &[S]) -> Result<Vec<RepoId>> {
    if slugs.is_empty() {
        return Err(Error::config(
            "Missing repositories. Provide at least one \"org/repo\" slug",
        ));
    }
    slugs.iter().map(|s| RepoId::parse(s.as_ref())).collect()
}

/// Read a repository file: one slug per line, blank lines and `#` comments
/// ignored.
pub fn read_repo_file(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(parse_repo_lines(&contents))
}

fn parse_repo_lines(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Interpret a `--repos` style value.
///
/// If the value names an existing file it is read with [`read_repo_file`],
/// otherwise it is treated as a comma-separated list of slugs.
pub fn repo_list_from_arg(value: &str) -> Result<Vec<String>> {
    let path = Path::new(value);
    if path.is_file() {
        return read_repo_file(path);
    }
    Ok(value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_slug() {
        let repo = RepoId::parse("numenta/nupic").unwrap();
        assert_eq!(repo.owner(), "numenta");
        assert_eq!(repo.name(), "nupic");
        assert_eq!(repo.slug(), "numenta/nupic");
        assert_eq!(repo.to_string(), "numenta/nupic");
    }

    #[test]
    fn test_parse_slug_without_separator() {
        let err = RepoId::parse("nupic").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("org/repo"));
    }

    #[test]
    fn test_parse_slug_rejects_extra_separator() {
        assert!(RepoId::parse("a/b/c").is_err());
        assert!(RepoId::parse("/b").is_err());
        assert!(RepoId::parse("a/").is_err());
    }

    #[test]
    fn test_resolve_preserves_order_and_duplicates() {
        let repos = resolve(&["b/two", "a/one", "b/two"]).unwrap();
        let slugs: Vec<String> = repos.iter().map(RepoId::slug).collect();
        assert_eq!(slugs, vec!["b/two", "a/one", "b/two"]);
    }

    #[test]
    fn test_resolve_empty() {
        let empty: [&str; 0] = [];
        assert!(matches!(resolve(&empty), Err(Error::Config(_))));
    }

    #[test]
    fn test_resolve_rejects_any_malformed_slug() {
        assert!(resolve(&["a/one", "two"]).is_err());
    }

    #[test]
    fn test_read_repo_file_skips_comments() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# monitored repos\nnumenta/nupic\n\n  rhyolight/sprinter.js  \n#old/repo").unwrap();

        let slugs = read_repo_file(file.path()).unwrap();
        assert_eq!(slugs, vec!["numenta/nupic", "rhyolight/sprinter.js"]);
    }

    #[test]
    fn test_repo_list_from_comma_separated() {
        let slugs = repo_list_from_arg("a/one, b/two,,").unwrap();
        assert_eq!(slugs, vec!["a/one", "b/two"]);
    }

    #[test]
    fn test_repo_list_from_file_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "a/one\nb/two").unwrap();

        let slugs = repo_list_from_arg(file.path().to_str().unwrap()).unwrap();
        assert_eq!(slugs, vec!["a/one", "b/two"]);
    }
}

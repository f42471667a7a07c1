// src/github/types.rs
// =============================================================================
// Data types shared by the GitHub modules.
//
// Two groups live here:
// - Domain types the rest of the app works with (Repository, TreeEntry)
// - Wire types mirroring the JSON the REST API sends back
//
// The wire types are deliberately forgiving: every field is optional, so an
// empty object `{}` parses cleanly and the caller decides what "missing"
// means (e.g. "no branch information received").
//
// Rust concepts:
// - FromStr: "owner/name".parse::<Repository>()
// - serde rename/default: Mapping GitHub field names onto Rust ones
// =============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// An `owner/name` pair identifying a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid repository '{0}': expected OWNER/NAME")]
pub struct InvalidRepository(String);

impl Repository {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Repository {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl FromStr for Repository {
    type Err = InvalidRepository;

    // Accepts "owner/name" and tolerates a trailing ".git"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches('/');
        let (owner, name) = trimmed
            .split_once('/')
            .ok_or_else(|| InvalidRepository(s.to_string()))?;
        let name = name.trim_end_matches(".git");

        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(InvalidRepository(s.to_string()));
        }

        Ok(Repository::new(owner, name))
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Whether a tree entry is a file or a directory.
///
/// `Other` covers entry types we never list, such as submodule commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Other,
}

impl EntryKind {
    fn from_wire(kind: Option<&str>) -> Self {
        match kind {
            Some("blob") => EntryKind::File,
            Some("tree") => EntryKind::Directory,
            _ => EntryKind::Other,
        }
    }
}

/// One entry of a recursively expanded tree listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub path: String,
    pub kind: EntryKind,
    /// Blob SHA for files, used to download the contents.
    pub sha: String,
}

#[cfg(test)]
impl TreeEntry {
    pub fn file(path: impl Into<String>, sha: impl Into<String>) -> Self {
        TreeEntry {
            path: path.into(),
            kind: EntryKind::File,
            sha: sha.into(),
        }
    }

    pub fn directory(path: impl Into<String>, sha: impl Into<String>) -> Self {
        TreeEntry {
            path: path.into(),
            kind: EntryKind::Directory,
            sha: sha.into(),
        }
    }
}

/// What the branch endpoint told us, reduced to the part we use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchInfo {
    pub name: Option<String>,
    pub commit_sha: Option<String>,
    /// SHA of the root tree of the branch head commit, if present.
    pub tree_sha: Option<String>,
}

// ---- Wire types ------------------------------------------------------------

// GET /repos/{owner}/{repo}/branches/{branch}
//
// {"name": "master", "commit": {"sha": "...", "commit": {"tree": {"sha": "..."}}}}
#[derive(Debug, Default, Deserialize)]
pub(crate) struct BranchResponse {
    pub name: Option<String>,
    pub commit: Option<BranchCommit>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct BranchCommit {
    pub sha: Option<String>,
    pub commit: Option<CommitDetail>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CommitDetail {
    pub tree: Option<ShaRef>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ShaRef {
    pub sha: Option<String>,
}

impl From<BranchResponse> for BranchInfo {
    fn from(response: BranchResponse) -> Self {
        let (commit_sha, detail) = match response.commit {
            Some(commit) => (commit.sha, commit.commit),
            None => (None, None),
        };
        let tree_sha = detail
            .and_then(|c| c.tree)
            .and_then(|t| t.sha)
            .filter(|sha| !sha.is_empty());

        BranchInfo {
            name: response.name,
            commit_sha,
            tree_sha,
        }
    }
}

// GET /repos/{owner}/{repo}/git/trees/{sha}?recursive=1
#[derive(Debug, Default, Deserialize)]
pub(crate) struct TreeResponse {
    #[serde(default)]
    pub tree: Vec<WireTreeEntry>,
    // Large trees come back truncated; one listing is all we act on
    #[serde(default)]
    pub truncated: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireTreeEntry {
    pub path: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub sha: Option<String>,
}

impl TreeResponse {
    pub fn into_entries(self) -> Vec<TreeEntry> {
        self.tree
            .into_iter()
            .filter_map(|entry| {
                let path = entry.path?;
                Some(TreeEntry {
                    kind: EntryKind::from_wire(entry.kind.as_deref()),
                    sha: entry.sha.unwrap_or_default(),
                    path,
                })
            })
            .collect()
    }
}

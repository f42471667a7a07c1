// src/github/resolver.rs
// =============================================================================
// Turning a branch name into the list of template files on it.
//
// Steps:
// 1. Ask the branch endpoint which tree the branch head points at
// 2. Fetch that tree once, recursively expanded by the server
// 3. Keep only files whose path ends with the configured suffix
//
// The listing keeps the order GitHub returned it in.
//
// Rust concepts:
// - Arc<dyn Trait>: Shared, swappable transport
// - map_err: Wrapping a low-level error in one with more context
// =============================================================================

use std::sync::Arc;

use tracing::debug;

use super::api::{call, GitHubApi};
use super::error::{GetterError, LookupError};
use super::matcher::is_listed;
use super::types::{Repository, TreeEntry};
use crate::context::Context;

// Resolves branches to filtered file listings.
#[derive(Clone)]
pub struct TreeResolver {
    api: Arc<dyn GitHubApi>,
    suffix: String,
}

impl TreeResolver {
    pub fn new(api: Arc<dyn GitHubApi>, suffix: impl Into<String>) -> Self {
        TreeResolver {
            api,
            suffix: suffix.into(),
        }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn api(&self) -> &dyn GitHubApi {
        self.api.as_ref()
    }

    // The SHA of the root tree `branch` currently points at.
    pub async fn resolve_tree(
        &self,
        ctx: &Context,
        repo: &Repository,
        branch: &str,
    ) -> Result<String, LookupError> {
        let info = call(ctx, self.api.branch(repo, branch))
            .await
            .map_err(LookupError::BranchLookupFailed)?;

        let tree_sha = info.tree_sha.ok_or(LookupError::NoBranchInformation)?;
        debug!(
            repository = %repo,
            branch = info.name.as_deref().unwrap_or(branch),
            commit = info.commit_sha.as_deref().unwrap_or("unknown"),
            tree = %tree_sha,
            "resolved branch"
        );
        Ok(tree_sha)
    }

    // File entries of the tree whose path ends with the suffix.
    pub async fn list_files(
        &self,
        ctx: &Context,
        repo: &Repository,
        tree_sha: &str,
    ) -> Result<Vec<TreeEntry>, LookupError> {
        let entries = call(ctx, self.api.tree(repo, tree_sha))
            .await
            .map_err(LookupError::TreeLookupFailed)?;

        let total = entries.len();
        let files: Vec<TreeEntry> = entries
            .into_iter()
            .filter(|entry| is_listed(entry, &self.suffix))
            .collect();
        debug!(tree = tree_sha, total, kept = files.len(), "filtered tree");
        Ok(files)
    }

    // `resolve_tree` followed by `list_files`, stopping at the first error.
    pub async fn lookup(
        &self,
        ctx: &Context,
        repo: &Repository,
        branch: &str,
    ) -> Result<Vec<TreeEntry>, LookupError> {
        let tree_sha = self.resolve_tree(ctx, repo, branch).await?;
        self.list_files(ctx, repo, &tree_sha).await
    }

    // Paths of every template file on `branch`.
    pub async fn list(
        &self,
        ctx: &Context,
        repo: &Repository,
        branch: &str,
    ) -> Result<Vec<String>, GetterError> {
        let entries = self
            .lookup(ctx, repo, branch)
            .await
            .map_err(|cause| GetterError::Listing {
                repository: repo.clone(),
                branch: branch.to_string(),
                cause,
            })?;

        Ok(entries.into_iter().map(|entry| entry.path).collect())
    }
}

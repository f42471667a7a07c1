// src/github/fake.rs
// =============================================================================
// An in-memory GitHubApi for tests.
//
// Branches, trees and blobs are registered up front. Blobs can be given a
// delay (to force a particular completion order) or a failing status.
// Every call is recorded, and the fake tracks how many blob downloads were
// in flight at once so tests can check downloads really overlap.
// =============================================================================

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use super::api::{ApiError, ApiResult, GitHubApi};
use super::types::{BranchInfo, Repository, TreeEntry};

#[derive(Debug, Clone)]
enum Reply<T> {
    Ok(T),
    Fail(u16),
}

impl<T: Clone> Reply<T> {
    fn get(&self) -> ApiResult<T> {
        match self {
            Reply::Ok(value) => Ok(value.clone()),
            Reply::Fail(status) => Err(status_error(*status)),
        }
    }
}

fn status_error(status: u16) -> ApiError {
    ApiError::Status {
        status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        message: "something went wrong".to_string(),
    }
}

#[derive(Debug, Clone)]
struct BlobReply {
    delay: Duration,
    reply: Reply<String>,
}

#[derive(Debug, Default)]
pub struct FakeApi {
    branches: HashMap<String, Reply<BranchInfo>>,
    trees: HashMap<String, Reply<Vec<TreeEntry>>>,
    blobs: HashMap<String, BlobReply>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl FakeApi {
    pub fn new() -> Self {
        FakeApi::default()
    }

    pub fn with_branch(mut self, branch: &str, tree_sha: &str) -> Self {
        let info = BranchInfo {
            name: Some(branch.to_string()),
            commit_sha: Some("b0012e4930d0a8c350254a3caeedf7441ea286a3".to_string()),
            tree_sha: Some(tree_sha.to_string()),
        };
        self.branches.insert(branch.to_string(), Reply::Ok(info));
        self
    }

    // The `{}` response: well-formed, but nothing in it
    pub fn with_empty_branch(mut self, branch: &str) -> Self {
        let info = BranchInfo {
            name: None,
            commit_sha: None,
            tree_sha: None,
        };
        self.branches.insert(branch.to_string(), Reply::Ok(info));
        self
    }

    pub fn with_branch_error(mut self, branch: &str, status: u16) -> Self {
        self.branches.insert(branch.to_string(), Reply::Fail(status));
        self
    }

    pub fn with_tree(mut self, sha: &str, entries: Vec<TreeEntry>) -> Self {
        self.trees.insert(sha.to_string(), Reply::Ok(entries));
        self
    }

    pub fn with_tree_error(mut self, sha: &str, status: u16) -> Self {
        self.trees.insert(sha.to_string(), Reply::Fail(status));
        self
    }

    pub fn with_blob(self, sha: &str, contents: &str) -> Self {
        self.with_slow_blob(sha, contents, Duration::ZERO)
    }

    pub fn with_slow_blob(mut self, sha: &str, contents: &str, delay: Duration) -> Self {
        let reply = BlobReply {
            delay,
            reply: Reply::Ok(contents.to_string()),
        };
        self.blobs.insert(sha.to_string(), reply);
        self
    }

    pub fn with_blob_error(mut self, sha: &str, status: u16) -> Self {
        let reply = BlobReply {
            delay: Duration::ZERO,
            reply: Reply::Fail(status),
        };
        self.blobs.insert(sha.to_string(), reply);
        self
    }

    /// Every call made so far, as "branch:NAME", "tree:SHA" or "blob:SHA".
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn blob_calls(&self) -> usize {
        self.calls().iter().filter(|c| c.starts_with("blob:")).count()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

// Decrements the in-flight counter even when the download future is dropped
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl GitHubApi for FakeApi {
    async fn branch(&self, _repo: &Repository, branch: &str) -> ApiResult<BranchInfo> {
        self.record(format!("branch:{}", branch));
        match self.branches.get(branch) {
            Some(reply) => reply.get(),
            None => Err(status_error(404)),
        }
    }

    async fn tree(&self, _repo: &Repository, sha: &str) -> ApiResult<Vec<TreeEntry>> {
        self.record(format!("tree:{}", sha));
        match self.trees.get(sha) {
            Some(reply) => reply.get(),
            None => Err(status_error(404)),
        }
    }

    async fn blob(&self, _repo: &Repository, sha: &str) -> ApiResult<String> {
        self.record(format!("blob:{}", sha));
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        let Some(blob) = self.blobs.get(sha) else {
            return Err(status_error(404));
        };
        // Always yield once so every download is started before any finishes
        tokio::task::yield_now().await;
        if !blob.delay.is_zero() {
            tokio::time::sleep(blob.delay).await;
        }
        blob.reply.get()
    }
}

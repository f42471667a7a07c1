// src/github/api.rs
// =============================================================================
// The transport seam between the retrieval engine and GitHub.
//
// The engine only needs three remote calls:
// - branch info  -> which tree does this branch point at?
// - tree         -> the recursive listing of that tree
// - blob         -> the raw contents of one file
//
// Putting them behind a trait lets the engine run against the real HTTP
// client (see http.rs) or against an in-memory fake in tests.
//
// Rust concepts:
// - async_trait: Async methods on a trait object (dyn GitHubApi)
// - thiserror: Error enums with #[from] conversions for `?`
// =============================================================================

use std::future::Future;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use super::types::{BranchInfo, Repository, TreeEntry};
use crate::context::{Context, Interrupted};

/// Errors from a single remote call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("access token is not a valid header value: {0}")]
    InvalidToken(#[from] reqwest::header::InvalidHeaderValue),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("request cancelled")]
    Cancelled,

    #[error("request deadline exceeded")]
    DeadlineExceeded,
}

impl ApiError {
    /// True when the call was stopped by its context rather than failing.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, ApiError::Cancelled | ApiError::DeadlineExceeded)
    }
}

impl From<Interrupted> for ApiError {
    fn from(interrupted: Interrupted) -> Self {
        match interrupted {
            Interrupted::Cancelled => ApiError::Cancelled,
            Interrupted::DeadlineExceeded => ApiError::DeadlineExceeded,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Read-only access to a repository's branches, trees and blobs.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    async fn branch(&self, repo: &Repository, branch: &str) -> ApiResult<BranchInfo>;

    /// The tree with `sha`, expanded recursively by the server.
    async fn tree(&self, repo: &Repository, sha: &str) -> ApiResult<Vec<TreeEntry>>;

    /// Raw text contents of the blob with `sha`.
    async fn blob(&self, repo: &Repository, sha: &str) -> ApiResult<String>;
}

/// Runs one remote call under `ctx`, turning an interruption into an
/// `ApiError` like any other failure.
pub async fn call<T, F>(ctx: &Context, fut: F) -> ApiResult<T>
where
    F: Future<Output = ApiResult<T>>,
{
    ctx.run(fut).await?
}

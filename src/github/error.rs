// src/github/error.rs
// =============================================================================
// Errors surfaced by the retrieval engine.
//
// Two families:
// - Lookup errors (branch / tree) are fatal: nothing is downloaded, and the
//   error is wrapped with the repository and branch it happened on.
// - Per-file failures (not in the tree, download failed) are collected into
//   one BatchError, returned next to whatever did download.
//
// The Display text of these errors is what users see and what tests check,
// so the wording here is fixed.
//
// Rust concepts:
// - Display: The error text users see is built by hand here
// - Option<Self> constructor: No failures means no error
// =============================================================================

use std::fmt;

use thiserror::Error;

use super::api::ApiError;
use super::types::Repository;

/// Failure to turn a branch into a file listing.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("unable to get branch information: {0}")]
    BranchLookupFailed(ApiError),

    #[error("no branch information received")]
    NoBranchInformation,

    #[error("unable to get tree information: {0}")]
    TreeLookupFailed(ApiError),
}

/// A fatal error from `Getter::list` or `Getter::get`.
#[derive(Debug, Error)]
pub enum GetterError {
    #[error("error listing contents of {repository} at {branch}: {cause}")]
    Listing {
        repository: Repository,
        branch: String,
        cause: LookupError,
    },

    #[error("error getting files from {repository} at {branch}: {cause}")]
    Getting {
        repository: Repository,
        branch: String,
        cause: LookupError,
    },
}

/// Why a single requested name did not make it into the results.
#[derive(Debug)]
pub enum FailureReason {
    NotFound,
    DownloadFailed(ApiError),
}

/// One requested name that failed, with its reason.
#[derive(Debug)]
pub struct Failure {
    /// The name as the caller requested it.
    pub name: String,
    pub reason: FailureReason,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            FailureReason::NotFound => write!(f, "{}: not present in file tree", self.name),
            FailureReason::DownloadFailed(err) if err.is_interrupted() => {
                write!(f, "{}: download cancelled", self.name)
            }
            FailureReason::DownloadFailed(_) => write!(f, "{}: failed to download", self.name),
        }
    }
}

/// Every name a batch could not deliver, sorted by name.
#[derive(Debug)]
pub struct BatchError {
    repository: Repository,
    branch: String,
    failures: Vec<Failure>,
}

impl BatchError {
    /// Returns `None` for an empty failure list.
    pub fn new(repository: Repository, branch: String, mut failures: Vec<Failure>) -> Option<Self> {
        if failures.is_empty() {
            return None;
        }
        failures.sort_by(|a, b| a.name.cmp(&b.name));
        Some(BatchError {
            repository,
            branch,
            failures,
        })
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    pub fn failed_names(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.name.as_str()).collect()
    }
}

// error getting files from github/gitignore at master: failed to get the following files: A, B
// A: not present in file tree
// B: failed to download
impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "error getting files from {} at {}: failed to get the following files: {}",
            self.repository,
            self.branch,
            self.failed_names().join(", ")
        )?;
        for failure in &self.failures {
            writeln!(f, "{}", failure)?;
        }
        Ok(())
    }
}

impl std::error::Error for BatchError {}

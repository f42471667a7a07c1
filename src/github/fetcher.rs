// src/github/fetcher.rs
// =============================================================================
// Downloading a batch of named files concurrently.
//
// How it works:
// 1. Get a fresh file listing for the branch (no caching between calls)
// 2. Match every requested name against the listing; names that land on a
//    file already matched by an earlier name are dropped
// 3. Start one download per matched file, all at once
// 4. Wait for every download, then build the result
//
// Ordering:
// - Each download carries the index of its name in the request, and writes
//   its outcome into that slot. Results are read back slot by slot, so the
//   output follows the request order no matter which download finishes first.
// - Failures are reported sorted by name (see BatchError).
//
// A name that is not in the listing never causes a network call, and one
// failed download never stops the others.
//
// Rust concepts:
// - FuturesUnordered: Polls many futures, yields them as they finish
// - HashSet: Dropping repeated names and files
// =============================================================================

use std::collections::HashSet;

use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, warn};

use super::api::{call, ApiError};
use super::error::{BatchError, Failure, FailureReason, GetterError};
use super::matcher::{is_listed, match_name};
use super::resolver::TreeResolver;
use super::types::{Repository, TreeEntry};
use crate::contents::NamedContents;
use crate::context::Context;

// What a batch delivered: the contents that downloaded, in request order,
// and one error describing every name that did not.
#[derive(Debug)]
pub struct BatchResult {
    pub contents: Vec<NamedContents>,
    pub err: Option<BatchError>,
}

// The fate of one requested name
#[derive(Debug)]
enum Outcome {
    Success(NamedContents),
    NotFound,
    DownloadFailed(ApiError),
}

// Fetches the contents of requested names from one listing.
#[derive(Clone)]
pub struct BatchFetcher {
    resolver: TreeResolver,
}

impl BatchFetcher {
    pub fn new(resolver: TreeResolver) -> Self {
        BatchFetcher { resolver }
    }

    // Lists `branch` and downloads `names` from it
    //
    // Returns: Result<BatchResult, GetterError>
    //   Success: Whatever downloaded, plus one error for the names that didn't
    //   Error: Only when the listing itself fails
    pub async fn get<S: AsRef<str>>(
        &self,
        ctx: &Context,
        repo: &Repository,
        branch: &str,
        names: &[S],
    ) -> Result<BatchResult, GetterError> {
        let entries = self
            .resolver
            .lookup(ctx, repo, branch)
            .await
            .map_err(|cause| GetterError::Getting {
                repository: repo.clone(),
                branch: branch.to_string(),
                cause,
            })?;

        Ok(self.fetch(ctx, repo, branch, &entries, names).await)
    }

    // Downloads `names` using an already fetched listing.
    pub async fn fetch<S: AsRef<str>>(
        &self,
        ctx: &Context,
        repo: &Repository,
        branch: &str,
        entries: &[TreeEntry],
        names: &[S],
    ) -> BatchResult {
        // A supplied listing gets the same filter `list` applies
        let suffix = self.resolver.suffix();
        let entries: Vec<TreeEntry> = entries
            .iter()
            .filter(|entry| is_listed(entry, suffix))
            .cloned()
            .collect();

        // One slot per distinct request. "Go" and "Go.gitignore" name the
        // same file, so only the first spelling gets a slot and a download.
        let mut seen_names = HashSet::new();
        let mut claimed_paths = HashSet::new();
        let mut requested: Vec<&str> = Vec::new();
        let mut slots: Vec<Option<Outcome>> = Vec::new();
        let mut downloads = FuturesUnordered::new();

        for name in names.iter().map(|name| name.as_ref()) {
            if !seen_names.insert(name) {
                continue;
            }
            let matched = match_name(name, &entries, suffix);
            if let Some(entry) = matched {
                if !claimed_paths.insert(entry.path.as_str()) {
                    debug!(
                        name = %name,
                        path = %entry.path,
                        "already requested under another name"
                    );
                    continue;
                }
            }

            let index = requested.len();
            requested.push(name);
            match matched {
                None => slots.push(Some(Outcome::NotFound)),
                Some(entry) => {
                    slots.push(None);
                    downloads.push(self.download(ctx, repo, index, entry));
                }
            }
        }

        debug!(
            requested = requested.len(),
            downloading = downloads.len(),
            "starting batch"
        );

        while let Some((index, outcome)) = downloads.next().await {
            slots[index] = Some(outcome);
        }

        aggregate(repo, branch, &requested, slots)
    }

    async fn download(
        &self,
        ctx: &Context,
        repo: &Repository,
        index: usize,
        entry: &TreeEntry,
    ) -> (usize, Outcome) {
        let outcome = match call(ctx, self.resolver.api().blob(repo, &entry.sha)).await {
            Ok(contents) => {
                debug!(path = %entry.path, bytes = contents.len(), "downloaded");
                Outcome::Success(NamedContents::new(entry.path.clone(), contents))
            }
            Err(err) => Outcome::DownloadFailed(err),
        };
        (index, outcome)
    }
}

// Reads the slots back in request order
fn aggregate(
    repo: &Repository,
    branch: &str,
    names: &[&str],
    slots: Vec<Option<Outcome>>,
) -> BatchResult {
    let mut contents = Vec::new();
    let mut failures = Vec::new();

    for (name, slot) in names.iter().zip(slots) {
        let reason = match slot {
            Some(Outcome::Success(named)) => {
                contents.push(named);
                continue;
            }
            Some(Outcome::NotFound) => FailureReason::NotFound,
            Some(Outcome::DownloadFailed(err)) => {
                warn!(name = %name, error = %err, "download failed");
                FailureReason::DownloadFailed(err)
            }
            // Every dispatched download fills its slot before we get here
            None => continue,
        };
        failures.push(Failure {
            name: name.to_string(),
            reason,
        });
    }

    BatchResult {
        contents,
        err: BatchError::new(repo.clone(), branch.to_string(), failures),
    }
}

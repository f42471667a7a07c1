// src/github/mod.rs
// =============================================================================
// This module fetches template files from a GitHub repository.
//
// Submodules:
// - types:    Repository, TreeEntry and the JSON wire types
// - api:      The GitHubApi trait, the seam to the network
// - http:     GitHubApi over reqwest
// - matcher:  Matching requested names to tree entries
// - resolver: Branch -> tree -> filtered file listing
// - fetcher:  Concurrent batch downloads with partial failure
// - getter:   The list/get surface used by main.rs
// - error:    Lookup, getter and batch errors
//
// Rust concepts:
// - Module privacy: Only what main.rs needs is re-exported
// - #[cfg(test)]: The fake API only exists in test builds
// =============================================================================

mod api;
mod error;
mod fetcher;
mod getter;
mod http;
mod matcher;
mod resolver;
mod types;

#[cfg(test)]
mod fake;

pub use getter::Getter;
pub use http::HttpApi;
pub use types::Repository;

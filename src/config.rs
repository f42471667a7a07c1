// src/config.rs
// =============================================================================
// Configuration for talking to GitHub and for choosing what to fetch.
//
// ClientConfig is built once (from CLI flags and the environment) and
// moved into the HTTP client. Nothing mutates it afterwards, so the client
// identity and API headers are the same for every request.
//
// SourceConfig says where the templates live: repository, branch, and the
// file suffix that marks a template.
//
// Rust concepts:
// - Builder methods taking `self`: Each call returns the updated value
// - Default trait: The stock github/gitignore@master setup
// =============================================================================

use anyhow::{Context as _, Result};
use url::Url;

use crate::github::Repository;

pub const DEFAULT_API_URL: &str = "https://api.github.com/";
pub const DEFAULT_REPOSITORY: &str = "github/gitignore";
pub const DEFAULT_BRANCH: &str = "master";
pub const DEFAULT_SUFFIX: &str = ".gitignore";

/// Environment variable consulted when no token is given on the command line.
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

/// The User-Agent every request is sent with, e.g. `getignore/0.1.0`.
pub fn default_user_agent() -> String {
    format!("getignore/{}", env!("CARGO_PKG_VERSION"))
}

/// Transport settings handed to `HttpApi::new`.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Always ends with '/', so relative joins keep any path prefix
    /// (e.g. `https://ghe.example.com/api/v3/`).
    pub base_url: Url,
    pub user_agent: String,
    pub token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            user_agent: default_user_agent(),
            token: None,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Url::parse(&normalized).with_context(|| format!("invalid API URL '{}'", raw))
}

/// Which repository, branch and suffix the engine works against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub repository: Repository,
    pub branch: String,
    pub suffix: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            repository: Repository::new("github", "gitignore"),
            branch: DEFAULT_BRANCH.to_string(),
            suffix: DEFAULT_SUFFIX.to_string(),
        }
    }
}

impl SourceConfig {
    pub fn new(repository: &str, branch: &str, suffix: &str) -> Result<Self> {
        let repository = repository.parse::<Repository>()?;
        Ok(SourceConfig {
            repository,
            branch: branch.to_string(),
            suffix: suffix.to_string(),
        })
    }
}

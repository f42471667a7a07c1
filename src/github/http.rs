// src/github/http.rs
// =============================================================================
// GitHubApi over HTTP, using reqwest.
//
// Endpoints (relative to the configured base URL):
//   repos/{owner}/{repo}/branches/{branch}
//   repos/{owner}/{repo}/git/trees/{sha}?recursive=1
//   repos/{owner}/{repo}/git/blobs/{sha}        (raw media type)
//
// Every request carries the configured User-Agent and an explicit Accept
// header. JSON endpoints ask for `application/vnd.github.v3+json`; blobs ask
// for `application/vnd.github.v3.raw` so GitHub sends the file itself
// instead of a base64 envelope.
//
// Rust concepts:
// - Default headers: The token is set once on the Client
// - StreamDeserializer: Reads one JSON value and stops
// =============================================================================

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use super::api::{ApiError, ApiResult, GitHubApi};
use super::types::{BranchInfo, BranchResponse, Repository, TreeEntry, TreeResponse};
use crate::config::ClientConfig;

const JSON_MEDIA_TYPE: &str = "application/vnd.github.v3+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.v3.raw";

/// The reqwest-backed GitHub client.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: Url,
}

// GitHub error bodies look like {"message": "Not Found", ...}
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl HttpApi {
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("token {}", token))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .user_agent(config.user_agent)
            .default_headers(headers)
            .build()?;

        Ok(HttpApi {
            client,
            base_url: config.base_url,
        })
    }

    // Joins path segments onto the base URL, percent-encoding each one
    fn endpoint(&self, repo: &Repository, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.push("repos").push(&repo.owner).push(&repo.name);
            path.extend(segments);
        }
        url
    }

    async fn send(&self, url: Url, accept: &'static str) -> ApiResult<Response> {
        debug!(%url, accept, "GET");
        let response = self
            .client
            .get(url)
            .header(ACCEPT, accept)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string()
            });
        Err(ApiError::Status { status, message })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> ApiResult<T> {
        let response = self.send(url, JSON_MEDIA_TYPE).await?;
        let bytes = response.bytes().await?;
        decode_first(&bytes)
    }
}

// Decodes the first JSON value in the body and ignores anything after it,
// the way a streaming decoder would
fn decode_first<T: DeserializeOwned>(bytes: &[u8]) -> ApiResult<T> {
    let mut values = serde_json::Deserializer::from_slice(bytes).into_iter::<T>();
    match values.next() {
        Some(value) => Ok(value?),
        None => Err(ApiError::Decode(serde_json::Error::io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "empty response body",
        )))),
    }
}

#[async_trait]
impl GitHubApi for HttpApi {
    async fn branch(&self, repo: &Repository, branch: &str) -> ApiResult<BranchInfo> {
        let url = self.endpoint(repo, &["branches", branch]);
        let response: BranchResponse = self.get_json(url).await?;
        Ok(response.into())
    }

    async fn tree(&self, repo: &Repository, sha: &str) -> ApiResult<Vec<TreeEntry>> {
        let mut url = self.endpoint(repo, &["git", "trees", sha]);
        url.query_pairs_mut().append_pair("recursive", "1");
        let response: TreeResponse = self.get_json(url).await?;
        if response.truncated {
            warn!(repository = %repo, tree = sha, "tree listing was truncated by the server");
        }
        Ok(response.into_entries())
    }

    async fn blob(&self, repo: &Repository, sha: &str) -> ApiResult<String> {
        let url = self.endpoint(repo, &["git", "blobs", sha]);
        let response = self.send(url, RAW_MEDIA_TYPE).await?;
        Ok(response.text().await?)
    }
}

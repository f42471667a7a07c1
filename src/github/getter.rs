// src/github/getter.rs
// =============================================================================
// The two operations the rest of the app uses:
// - list: every template file available on the branch
// - get:  the contents of specific templates
//
// A Getter is bound to one repository, branch and suffix when it is built.
// Both operations hit the network fresh each time; nothing is cached.
// =============================================================================

use std::sync::Arc;

use super::api::GitHubApi;
use super::error::GetterError;
use super::fetcher::{BatchFetcher, BatchResult};
use super::resolver::TreeResolver;
use crate::config::SourceConfig;
use crate::context::Context;

pub struct Getter {
    source: SourceConfig,
    resolver: TreeResolver,
    fetcher: BatchFetcher,
}

impl Getter {
    pub fn new(api: Arc<dyn GitHubApi>, source: SourceConfig) -> Self {
        let resolver = TreeResolver::new(api, source.suffix.clone());
        let fetcher = BatchFetcher::new(resolver.clone());
        Getter {
            source,
            resolver,
            fetcher,
        }
    }

    pub fn source(&self) -> &SourceConfig {
        &self.source
    }

    /// Paths of the template files on the branch, in listing order.
    pub async fn list(&self, ctx: &Context) -> Result<Vec<String>, GetterError> {
        self.resolver
            .list(ctx, &self.source.repository, &self.source.branch)
            .await
    }

    /// Contents of `names`, in the order requested.
    pub async fn get<S: AsRef<str>>(
        &self,
        ctx: &Context,
        names: &[S],
    ) -> Result<BatchResult, GetterError> {
        self.fetcher
            .get(ctx, &self.source.repository, &self.source.branch, names)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::contents::NamedContents;
    use crate::github::http::stub::StubServer;
    use crate::github::http::HttpApi;

    const BRANCH_PATH: &str = "/api/v3/repos/github/gitignore/branches/master";
    const TREE_PATH: &str =
        "/api/v3/repos/github/gitignore/git/trees/5adf061bdde4dd26889be1e74028b2f54aabc346";
    const GO_BLOB_PATH: &str =
        "/api/v3/repos/github/gitignore/git/blobs/66fd13c903cac02eb9657cd53fb227823484401d";

    const BRANCH_BODY: &str = r#"{
  "name": "master",
  "commit": {
    "sha": "b0012e4930d0a8c350254a3caeedf7441ea286a3",
    "commit": {
      "tree": {
        "sha": "5adf061bdde4dd26889be1e74028b2f54aabc346"
      }
    }
  }
}"#;

    const TREE_BODY: &str = r#"{
  "sha": "5adf061bdde4dd26889be1e74028b2f54aabc346",
  "tree": [
    {"path": ".github", "mode": "040000", "type": "tree", "sha": "45f58ef9211cc06f3ef86585c7ecb1b3d52fd4f9"},
    {"path": ".travis.yml", "mode": "100644", "type": "blob", "sha": "4009e0bc8b07582c19fa761810c9f3741ab76597", "size": 103},
    {"path": "Actionscript.gitignore", "mode": "100644", "type": "blob", "sha": "5d947ca8879f8a9072fe485c566204e3c2929e80", "size": 350},
    {"path": "Global/Anjuta.gitignore", "mode": "100644", "type": "blob", "sha": "20dd42c53e6f0df8233fee457b664d443ee729f4", "size": 78},
    {"path": "Go.gitignore", "mode": "100644", "type": "blob", "sha": "66fd13c903cac02eb9657cd53fb227823484401d", "size": 269},
    {"path": "community/AWS/SAM.gitignore", "mode": "100644", "type": "blob", "sha": "dc9d020aee1ebc1a23c02d80a1c33c0cb35ebaeb", "size": 167},
    {"path": "foo.gitignore", "mode": "040000", "type": "tree", "sha": "a1f9ba2be789d9d7a3559967c42f22cbea9bf8dc"}
  ],
  "truncated": false
}"#;

    fn getter_for(server: &StubServer) -> Getter {
        let config = ClientConfig::default()
            .with_base_url(&server.base_url)
            .unwrap();
        let api = HttpApi::new(config).unwrap();
        Getter::new(Arc::new(api), SourceConfig::default())
    }

    #[tokio::test]
    async fn test_list_over_http() {
        let server = StubServer::start(vec![(BRANCH_PATH, 200, BRANCH_BODY), (TREE_PATH, 200, TREE_BODY)]).await;
        let files = getter_for(&server)
            .list(&Context::background())
            .await
            .unwrap();
        assert_eq!(
            files,
            vec![
                "Actionscript.gitignore",
                "Global/Anjuta.gitignore",
                "Go.gitignore",
                "community/AWS/SAM.gitignore",
            ]
        );

        let requests = server.requests();
        assert_eq!(requests.len(), 2);
        for request in &requests {
            assert_eq!(
                request.headers.get("accept").map(String::as_str),
                Some("application/vnd.github.v3+json")
            );
        }
    }

    #[tokio::test]
    async fn test_list_empty_tree_over_http() {
        let server = StubServer::start(vec![(BRANCH_PATH, 200, BRANCH_BODY), (TREE_PATH, 200, "{}")]).await;
        let files = getter_for(&server)
            .list(&Context::background())
            .await
            .unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn test_list_empty_branch_over_http() {
        let server = StubServer::start(vec![(BRANCH_PATH, 200, "{}")]).await;
        let err = getter_for(&server)
            .list(&Context::background())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "error listing contents of github/gitignore at master: no branch information received"
        );
    }

    #[tokio::test]
    async fn test_list_branch_error_over_http() {
        let server = StubServer::start(vec![(
            BRANCH_PATH,
            500,
            r#"{"message": "something went wrong"}"#,
        )])
        .await;
        let err = getter_for(&server)
            .list(&Context::background())
            .await
            .unwrap_err();
        let text = err.to_string();
        assert!(text.starts_with("error listing contents of github/gitignore at master:"));
        assert!(text.contains("unable to get branch information"));
    }

    #[tokio::test]
    async fn test_get_over_http() {
        let server = StubServer::start(vec![
            (BRANCH_PATH, 200, BRANCH_BODY),
            (TREE_PATH, 200, TREE_BODY),
            (GO_BLOB_PATH, 200, "*.o\n*.a\n*.so\n"),
        ])
        .await;
        let result = getter_for(&server)
            .get(&Context::background(), &["Go"])
            .await
            .unwrap();
        assert_eq!(
            result.contents,
            vec![NamedContents::new("Go.gitignore", "*.o\n*.a\n*.so\n")]
        );
        assert!(result.err.is_none());

        let blob_request = server
            .requests()
            .into_iter()
            .find(|r| r.target == GO_BLOB_PATH)
            .unwrap();
        assert_eq!(
            blob_request.headers.get("accept").map(String::as_str),
            Some("application/vnd.github.v3.raw")
        );
    }

    #[tokio::test]
    async fn test_get_blob_error_over_http() {
        let server = StubServer::start(vec![
            (BRANCH_PATH, 200, BRANCH_BODY),
            (TREE_PATH, 200, TREE_BODY),
            (GO_BLOB_PATH, 500, r#"{"message": "something went wrong"}"#),
        ])
        .await;
        let result = getter_for(&server)
            .get(&Context::background(), &["Go.gitignore"])
            .await
            .unwrap();
        assert!(result.contents.is_empty());
        assert_eq!(
            result.err.unwrap().to_string(),
            "error getting files from github/gitignore at master: failed to get the following files: Go.gitignore\nGo.gitignore: failed to download\n"
        );
    }

    #[tokio::test]
    async fn test_get_tree_error_over_http() {
        let server = StubServer::start(vec![
            (BRANCH_PATH, 200, BRANCH_BODY),
            (TREE_PATH, 500, r#"{"message": "something went wrong"}"#),
        ])
        .await;
        let err = getter_for(&server)
            .get(&Context::background(), &["Go.gitignore"])
            .await
            .unwrap_err();
        let text = err.to_string();
        assert!(text.starts_with("error getting files from github/gitignore at master:"));
        assert!(text.contains("unable to get tree information"));
    }
}

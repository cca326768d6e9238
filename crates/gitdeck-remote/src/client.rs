//! HTTP gateway to the workspace Git service.

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use crate::auth::Auth;
use crate::error::{Error, Result};
use crate::traits::GitGateway;
use crate::types::{
    AddTagRequest, ApplyStashRequest, BranchList, CheckoutResponse, CheckoutStashRequest,
    CommitDiffEntry, CommitInfo, CommitRequest, CommitResponse, ConflictContent, CurrentBranch,
    FileContent, FileDiff, MergeResponse, PushResponse, RebaseOperateRequest, RebaseRequest,
    RebaseResponse, RebaseTodoLine, ResetRequest, ResolveConflictRequest, StashList,
    StatusResponse,
};

/// Error body returned by the backend on failure.
#[derive(serde::Deserialize)]
struct ApiError {
    msg: Option<String>,
    message: Option<String>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutBody<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_point: Option<&'a str>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct BranchBody<'a> {
    branch_name: &'a str,
}

#[derive(serde::Serialize)]
struct StashBody<'a> {
    message: &'a str,
}

#[derive(serde::Serialize)]
struct MergeBody<'a> {
    name: &'a str,
}

/// HTTP client for one workspace on the Git service.
pub struct HttpGateway {
    client: Client,
    base_url: String,
    workspace: String,
    /// Token stored as `SecretString` for automatic zeroization on drop.
    token: Option<SecretString>,
}

impl HttpGateway {
    /// Create a gateway for `workspace` on the backend at `base_url`.
    ///
    /// # Errors
    /// Returns error if authentication cannot be resolved or the HTTP
    /// client fails to build.
    pub fn new(
        auth: &Auth,
        base_url: impl Into<String>,
        workspace: impl Into<String>,
    ) -> Result<Self> {
        let token = auth.resolve()?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("gitdeck"));

        let client = Client::builder().default_headers(headers).build()?;

        let base_url: String = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            workspace: workspace.into(),
            token,
        })
    }

    /// URL of a Git endpoint for this workspace.
    fn git_url(&self, path: &str) -> String {
        format!("{}/workspaces/{}/git{path}", self.base_url, self.workspace)
    }

    /// URL of a non-Git workspace endpoint.
    fn workspace_url(&self, path: &str) -> String {
        format!("{}/workspaces/{}{path}", self.base_url, self.workspace)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.header(
                AUTHORIZATION,
                format!("Bearer {}", token.expose_secret()),
            ),
            None => request,
        }
    }

    /// Make a GET request.
    async fn get<T: DeserializeOwned>(&self, url: String, query: &[(&str, &str)]) -> Result<T> {
        tracing::debug!(%url, "GET");
        let response = self
            .authorize(self.client.get(&url).query(query))
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Make a POST request.
    async fn post<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        url: String,
        body: &B,
    ) -> Result<T> {
        tracing::debug!(%url, "POST");
        let response = self
            .authorize(self.client.post(&url).json(body))
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Make a POST request whose response body carries nothing of interest.
    async fn post_unit<B: serde::Serialize + Sync>(&self, url: String, body: &B) -> Result<()> {
        tracing::debug!(%url, "POST");
        let response = self
            .authorize(self.client.post(&url).json(body))
            .send()
            .await?;

        Self::handle_empty(response).await
    }

    /// Make a PUT request.
    async fn put<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        url: String,
        body: &B,
    ) -> Result<T> {
        tracing::debug!(%url, "PUT");
        let response = self
            .authorize(self.client.put(&url).json(body))
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Make a DELETE request.
    async fn delete(&self, url: String, query: &[(&str, &str)]) -> Result<()> {
        tracing::debug!(%url, "DELETE");
        let response = self
            .authorize(self.client.delete(&url).query(query))
            .send()
            .await?;

        Self::handle_empty(response).await
    }

    /// Handle a response with a JSON body.
    async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T> {
        if response.status().is_success() {
            let bytes = response.bytes().await?;
            return Ok(serde_json::from_slice(&bytes)?);
        }

        Err(Self::error_for(response).await)
    }

    /// Handle a response whose body is ignored on success.
    async fn handle_empty(response: Response) -> Result<()> {
        if response.status().is_success() {
            return Ok(());
        }

        Err(Self::error_for(response).await)
    }

    async fn error_for(response: Response) -> Error {
        let status = response.status().as_u16();
        if status == 401 {
            return Error::AuthenticationFailed;
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiError>(&text)
            .ok()
            .and_then(|body| body.msg.or(body.message))
            .unwrap_or(text);

        tracing::debug!(status, %message, "backend error");
        Error::Remote { status, message }
    }
}

impl std::fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGateway")
            .field("base_url", &self.base_url)
            .field("workspace", &self.workspace)
            .field("token", &self.token.as_ref().map(|_| "[redacted]"))
            .finish_non_exhaustive()
    }
}

// === Trait Implementation ===

impl GitGateway for HttpGateway {
    async fn status(&self) -> Result<StatusResponse> {
        self.get(self.git_url("/status"), &[]).await
    }

    async fn commit(&self, request: CommitRequest) -> Result<CommitResponse> {
        self.post(self.git_url("/commits"), &request).await
    }

    async fn reset_head(&self, request: ResetRequest) -> Result<()> {
        self.post_unit(self.git_url("/reset"), &request).await
    }

    async fn fetch(&self) -> Result<()> {
        self.post_unit(self.git_url("/fetch"), &()).await
    }

    async fn pull(&self) -> Result<()> {
        self.post_unit(self.git_url("/pull"), &()).await
    }

    async fn push_all(&self) -> Result<PushResponse> {
        self.post(self.git_url("/push"), &()).await
    }

    async fn checkout(
        &self,
        branch: &str,
        remote_branch: Option<&str>,
    ) -> Result<CheckoutResponse> {
        let body = CheckoutBody {
            name: branch,
            start_point: remote_branch,
        };
        self.post(self.git_url("/checkout"), &body).await
    }

    async fn list_branches(&self) -> Result<BranchList> {
        self.get(self.git_url("/branches"), &[]).await
    }

    async fn current_branch(&self) -> Result<CurrentBranch> {
        self.get(self.git_url("/branch"), &[]).await
    }

    async fn new_branch(&self, name: &str) -> Result<()> {
        self.post_unit(self.git_url("/branches"), &BranchBody { branch_name: name })
            .await
    }

    async fn delete_branch(&self, name: &str) -> Result<()> {
        self.delete(self.git_url("/branches"), &[("branchName", name)])
            .await
    }

    async fn list_tags(&self) -> Result<Vec<String>> {
        self.get(self.git_url("/tags"), &[]).await
    }

    async fn add_tag(&self, request: AddTagRequest) -> Result<()> {
        self.post_unit(self.git_url("/tags"), &request).await
    }

    async fn create_stash(&self, message: &str) -> Result<()> {
        self.post_unit(self.git_url("/stash"), &StashBody { message })
            .await
    }

    async fn list_stashes(&self) -> Result<StashList> {
        self.get(self.git_url("/stash"), &[]).await
    }

    async fn drop_stash(&self, stash_ref: &str, all: bool) -> Result<()> {
        let all = if all { "true" } else { "false" };
        self.delete(
            self.git_url("/stash"),
            &[("stashRef", stash_ref), ("all", all)],
        )
        .await
    }

    async fn apply_stash(&self, request: ApplyStashRequest) -> Result<()> {
        self.post_unit(self.git_url("/stash/apply"), &request).await
    }

    async fn checkout_stash(&self, request: CheckoutStashRequest) -> Result<()> {
        self.post_unit(self.git_url("/stash/checkout"), &request)
            .await
    }

    async fn merge(&self, branch: &str) -> Result<MergeResponse> {
        self.post(self.git_url("/merge"), &MergeBody { name: branch })
            .await
    }

    async fn rebase(&self, request: RebaseRequest) -> Result<RebaseResponse> {
        self.post(self.git_url("/rebase"), &request).await
    }

    async fn rebase_state(&self) -> Result<String> {
        self.get(self.git_url("/rebase"), &[]).await
    }

    async fn rebase_operate(&self, request: RebaseOperateRequest) -> Result<RebaseResponse> {
        self.post(self.git_url("/rebase/operate"), &request).await
    }

    async fn rebase_update(&self, lines: Vec<RebaseTodoLine>) -> Result<RebaseResponse> {
        self.put(self.git_url("/rebase/update"), &lines).await
    }

    async fn conflicts(&self, path: &str) -> Result<ConflictContent> {
        self.get(self.git_url("/conflicts"), &[("path", path)]).await
    }

    async fn resolve_conflict(&self, request: ResolveConflictRequest) -> Result<()> {
        self.post_unit(self.git_url("/conflicts"), &request).await
    }

    async fn cancel_conflict(&self, path: &str) -> Result<()> {
        self.delete(self.git_url("/conflicts"), &[("path", path)])
            .await
    }

    async fn file_diff(
        &self,
        path: &str,
        new_ref: &str,
        old_ref: Option<&str>,
    ) -> Result<FileDiff> {
        let mut query = vec![("path", path), ("newRef", new_ref)];
        if let Some(old_ref) = old_ref {
            query.push(("oldRef", old_ref));
        }
        self.get(self.git_url("/diff"), &query).await
    }

    async fn read_file(&self, path: &str) -> Result<FileContent> {
        self.get(self.workspace_url("/file/read"), &[("path", path)])
            .await
    }

    async fn read_file_at(&self, git_ref: &str, path: &str) -> Result<FileContent> {
        self.get(self.git_url("/read"), &[("ref", git_ref), ("path", path)])
            .await
    }

    async fn commit_diff(&self, rev: &str) -> Result<Vec<CommitDiffEntry>> {
        self.get(self.git_url("/commits/diff"), &[("rev", rev)]).await
    }

    async fn history(&self, path: Option<&str>, page: u32, size: u32) -> Result<Vec<CommitInfo>> {
        let page = page.to_string();
        let size = size.to_string();
        let mut query = vec![("page", page.as_str()), ("size", size.as_str())];
        if let Some(path) = path {
            query.push(("path", path));
        }
        self.get(self.git_url("/logs"), &query).await
    }
}

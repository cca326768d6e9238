//! Trait abstraction for the remote Git service.
//!
//! This module defines the `GitGateway` trait which abstracts every Git
//! action the editor can request, enabling dependency injection and
//! testability.

use std::future::Future;

use crate::{
    AddTagRequest, ApplyStashRequest, BranchList, CheckoutResponse, CheckoutStashRequest,
    CommitDiffEntry, CommitInfo, CommitRequest, CommitResponse, ConflictContent, CurrentBranch,
    FileContent, FileDiff, MergeResponse, PushResponse, RebaseOperateRequest, RebaseRequest,
    RebaseResponse, RebaseTodoLine, ResetRequest, ResolveConflictRequest, Result, StashList,
    StatusResponse,
};

/// Trait for the workspace Git service.
///
/// This trait abstracts backend calls, allowing for:
/// - Dependency injection into the workflow orchestrator
/// - Mock implementations for testing
/// - Alternative transports (e.g. a websocket RPC channel)
///
/// Every method issues exactly one logical request. A `Remote` error means
/// the backend refused the request; Git-level failures that arrive with a
/// success status are returned as payloads for the caller to classify.
#[allow(clippy::missing_errors_doc)]
pub trait GitGateway: Send + Sync {
    // === Working Tree ===

    /// Query the working tree status.
    fn status(&self) -> impl Future<Output = Result<StatusResponse>> + Send;

    /// Commit the given files.
    fn commit(&self, request: CommitRequest) -> impl Future<Output = Result<CommitResponse>> + Send;

    /// Reset HEAD to a ref.
    fn reset_head(&self, request: ResetRequest) -> impl Future<Output = Result<()>> + Send;

    // === Remote Sync ===

    /// Fetch from all remotes.
    fn fetch(&self) -> impl Future<Output = Result<()>> + Send;

    /// Pull the current branch.
    fn pull(&self) -> impl Future<Output = Result<()>> + Send;

    /// Push all branches.
    fn push_all(&self) -> impl Future<Output = Result<PushResponse>> + Send;

    // === Branches & Tags ===

    /// Checkout a branch, optionally creating it from a remote branch.
    fn checkout(
        &self,
        branch: &str,
        remote_branch: Option<&str>,
    ) -> impl Future<Output = Result<CheckoutResponse>> + Send;

    /// List local and remote branches.
    fn list_branches(&self) -> impl Future<Output = Result<BranchList>> + Send;

    /// Get the checked-out branch.
    fn current_branch(&self) -> impl Future<Output = Result<CurrentBranch>> + Send;

    /// Create a branch at HEAD.
    fn new_branch(&self, name: &str) -> impl Future<Output = Result<()>> + Send;

    /// Delete a local branch.
    fn delete_branch(&self, name: &str) -> impl Future<Output = Result<()>> + Send;

    /// List tag names.
    fn list_tags(&self) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Create a tag.
    fn add_tag(&self, request: AddTagRequest) -> impl Future<Output = Result<()>> + Send;

    // === Stash ===

    /// Stash uncommitted changes.
    fn create_stash(&self, message: &str) -> impl Future<Output = Result<()>> + Send;

    /// List stashes, newest first.
    fn list_stashes(&self) -> impl Future<Output = Result<StashList>> + Send;

    /// Drop one stash, or every stash when `all` is set.
    fn drop_stash(&self, stash_ref: &str, all: bool) -> impl Future<Output = Result<()>> + Send;

    /// Apply or pop a stash.
    fn apply_stash(&self, request: ApplyStashRequest) -> impl Future<Output = Result<()>> + Send;

    /// Create a branch from a stash and check it out.
    fn checkout_stash(
        &self,
        request: CheckoutStashRequest,
    ) -> impl Future<Output = Result<()>> + Send;

    // === Merge & Rebase ===

    /// Merge a branch into the current one.
    fn merge(&self, branch: &str) -> impl Future<Output = Result<MergeResponse>> + Send;

    /// Start a rebase.
    fn rebase(&self, request: RebaseRequest) -> impl Future<Output = Result<RebaseResponse>> + Send;

    /// Get the raw repository state (e.g. `SAFE`, `REBASING_INTERACTIVE`).
    fn rebase_state(&self) -> impl Future<Output = Result<String>> + Send;

    /// Continue, skip or abort an in-progress rebase.
    fn rebase_operate(
        &self,
        request: RebaseOperateRequest,
    ) -> impl Future<Output = Result<RebaseResponse>> + Send;

    /// Submit an edited interactive rebase plan.
    fn rebase_update(
        &self,
        lines: Vec<RebaseTodoLine>,
    ) -> impl Future<Output = Result<RebaseResponse>> + Send;

    // === Conflicts ===

    /// Get the three sides of a conflicted file.
    fn conflicts(&self, path: &str) -> impl Future<Output = Result<ConflictContent>> + Send;

    /// Write resolved content and mark the file resolved.
    fn resolve_conflict(
        &self,
        request: ResolveConflictRequest,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Discard a pending resolution.
    fn cancel_conflict(&self, path: &str) -> impl Future<Output = Result<()>> + Send;

    // === Content, Diff & History ===

    /// Diff one file between two refs (`old_ref` defaults to the parent).
    fn file_diff(
        &self,
        path: &str,
        new_ref: &str,
        old_ref: Option<&str>,
    ) -> impl Future<Output = Result<FileDiff>> + Send;

    /// Read a file from the working tree.
    fn read_file(&self, path: &str) -> impl Future<Output = Result<FileContent>> + Send;

    /// Read a file as of a ref.
    fn read_file_at(
        &self,
        git_ref: &str,
        path: &str,
    ) -> impl Future<Output = Result<FileContent>> + Send;

    /// List the paths changed by a commit.
    fn commit_diff(&self, rev: &str) -> impl Future<Output = Result<Vec<CommitDiffEntry>>> + Send;

    /// One page of commit history, optionally restricted to a path.
    fn history(
        &self,
        path: Option<&str>,
        page: u32,
        size: u32,
    ) -> impl Future<Output = Result<Vec<CommitInfo>>> + Send;
}

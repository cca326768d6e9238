//! Mock implementations for testing the orchestrator.
//!
//! `MockGateway` answers from scripted queues and records every call;
//! `RecordingSurface` records every modal and notification command.

#![allow(clippy::unwrap_used)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use gitdeck_remote::{
    AddTagRequest, ApplyStashRequest, BranchList, CheckoutResponse, CheckoutStashRequest,
    CommitDiffEntry, CommitInfo, CommitRequest, CommitResponse, ConflictContent, CurrentBranch,
    Error as RemoteError, FileContent, FileDiff, GitGateway, MergeResponse, PushResponse,
    RebaseOperateRequest, RebaseRequest, RebaseResponse, RebaseTodoLine, ResetRequest,
    ResolveConflictRequest, Result as RemoteResult, StashList, StatusResponse,
};
use tokio::sync::Notify;

use crate::surface::{InteractionSurface, Level, Modal, ModalPatch, Notification};

type Script<T> = Mutex<VecDeque<Result<T, String>>>;

fn remote_error(message: String) -> RemoteError {
    RemoteError::Remote {
        status: 500,
        message,
    }
}

fn next<T>(script: &Script<T>, fallback: impl FnOnce() -> RemoteResult<T>) -> RemoteResult<T> {
    match script.lock().unwrap().pop_front() {
        Some(Ok(value)) => Ok(value),
        Some(Err(message)) => Err(remote_error(message)),
        None => fallback(),
    }
}

fn unscripted<T>(method: &str) -> RemoteResult<T> {
    Err(remote_error(format!("no response scripted for {method}")))
}

/// Scripted implementation of `GitGateway`.
#[derive(Default)]
pub struct MockGateway {
    calls: Mutex<Vec<String>>,
    status: Script<StatusResponse>,
    commit: Script<CommitResponse>,
    push: Script<PushResponse>,
    checkout: Script<CheckoutResponse>,
    merge: Script<MergeResponse>,
    rebase: Script<RebaseResponse>,
    branches: Script<BranchList>,
    current_branch: Script<CurrentBranch>,
    stashes: Script<StashList>,
    tags: Script<Vec<String>>,
    rebase_state: Script<String>,
    commit_diff: Script<Vec<CommitDiffEntry>>,
    history: Script<Vec<CommitInfo>>,
    conflicts: Script<ConflictContent>,
    file_diff: Script<FileDiff>,
    content: Script<FileContent>,
    /// Methods returning `()` that should fail, by method name.
    failures: Mutex<HashMap<&'static str, String>>,
    push_gate: Option<Arc<Notify>>,
    status_gate: Mutex<Option<Arc<Notify>>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(self, response: StatusResponse) -> Self {
        self.status.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn with_status_error(self, message: &str) -> Self {
        self.status.lock().unwrap().push_back(Err(message.to_string()));
        self
    }

    pub fn with_commit(self, response: CommitResponse) -> Self {
        self.commit.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn with_push(self, response: PushResponse) -> Self {
        self.push.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn with_push_error(self, message: &str) -> Self {
        self.push.lock().unwrap().push_back(Err(message.to_string()));
        self
    }

    pub fn with_checkout(self, response: CheckoutResponse) -> Self {
        self.checkout.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn with_merge(self, response: MergeResponse) -> Self {
        self.merge.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn with_merge_error(self, message: &str) -> Self {
        self.merge.lock().unwrap().push_back(Err(message.to_string()));
        self
    }

    pub fn with_rebase(self, response: RebaseResponse) -> Self {
        self.rebase.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn with_branches(self, response: BranchList) -> Self {
        self.branches.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn with_current_branch(self, name: &str) -> Self {
        self.current_branch.lock().unwrap().push_back(Ok(CurrentBranch {
            name: name.to_string(),
        }));
        self
    }

    pub fn with_stashes(self, response: StashList) -> Self {
        self.stashes.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn with_tags(self, tags: &[&str]) -> Self {
        self.tags
            .lock()
            .unwrap()
            .push_back(Ok(tags.iter().map(ToString::to_string).collect()));
        self
    }

    pub fn with_rebase_state(self, state: &str) -> Self {
        self.rebase_state.lock().unwrap().push_back(Ok(state.to_string()));
        self
    }

    pub fn with_commit_diff(self, entries: Vec<CommitDiffEntry>) -> Self {
        self.commit_diff.lock().unwrap().push_back(Ok(entries));
        self
    }

    pub fn with_history(self, page: Vec<CommitInfo>) -> Self {
        self.history.lock().unwrap().push_back(Ok(page));
        self
    }

    pub fn with_conflicts(self, content: ConflictContent) -> Self {
        self.conflicts.lock().unwrap().push_back(Ok(content));
        self
    }

    pub fn with_file_diff(self, diff: &str) -> Self {
        self.file_diff.lock().unwrap().push_back(Ok(FileDiff {
            diff: diff.to_string(),
        }));
        self
    }

    pub fn with_content(self, content: &str) -> Self {
        self.content.lock().unwrap().push_back(Ok(FileContent {
            content: content.to_string(),
        }));
        self
    }

    /// Make the unit-returning method `method` fail with `message`.
    pub fn with_failure(self, method: &'static str, message: &str) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert(method, message.to_string());
        self
    }

    /// Hold every push until `gate` is notified.
    pub fn with_push_gate(mut self, gate: Arc<Notify>) -> Self {
        self.push_gate = Some(gate);
        self
    }

    /// Hold the next status query until `gate` is notified.
    ///
    /// The held query takes its scripted response before waiting, so later
    /// queries answer with the responses queued after it.
    pub fn with_status_gate(self, gate: Arc<Notify>) -> Self {
        *self.status_gate.lock().unwrap() = Some(gate);
        self
    }

    /// Every call so far, as `method` or `method arg`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls to `method`.
    pub fn count(&self, method: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.split(' ').next() == Some(method))
            .count()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn unit(&self, method: &'static str) -> RemoteResult<()> {
        match self.failures.lock().unwrap().get(method) {
            Some(message) => Err(remote_error(message.clone())),
            None => Ok(()),
        }
    }
}

impl GitGateway for MockGateway {
    async fn status(&self) -> RemoteResult<StatusResponse> {
        self.record("status");
        let response = next(&self.status, || Ok(StatusResponse::default()));
        let gate = self.status_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        response
    }

    async fn commit(&self, request: CommitRequest) -> RemoteResult<CommitResponse> {
        self.record(format!("commit {}|{}", request.files.join(","), request.message));
        next(&self.commit, || Ok(CommitResponse::default()))
    }

    async fn reset_head(&self, request: ResetRequest) -> RemoteResult<()> {
        self.record(format!("reset_head {}", request.git_ref));
        self.unit("reset_head")
    }

    async fn fetch(&self) -> RemoteResult<()> {
        self.record("fetch");
        self.unit("fetch")
    }

    async fn pull(&self) -> RemoteResult<()> {
        self.record("pull");
        self.unit("pull")
    }

    async fn push_all(&self) -> RemoteResult<PushResponse> {
        self.record("push_all");
        if let Some(gate) = &self.push_gate {
            gate.notified().await;
        }
        next(&self.push, || {
            Ok(PushResponse {
                ok: true,
                ..PushResponse::default()
            })
        })
    }

    async fn checkout(
        &self,
        branch: &str,
        remote_branch: Option<&str>,
    ) -> RemoteResult<CheckoutResponse> {
        match remote_branch {
            Some(remote) => self.record(format!("checkout {branch} {remote}")),
            None => self.record(format!("checkout {branch}")),
        }
        next(&self.checkout, || {
            Ok(CheckoutResponse {
                status: "OK".to_string(),
                conflict_list: Vec::new(),
                undeleted_list: Vec::new(),
            })
        })
    }

    async fn list_branches(&self) -> RemoteResult<BranchList> {
        self.record("list_branches");
        next(&self.branches, || Ok(BranchList::default()))
    }

    async fn current_branch(&self) -> RemoteResult<CurrentBranch> {
        self.record("current_branch");
        next(&self.current_branch, || unscripted("current_branch"))
    }

    async fn new_branch(&self, name: &str) -> RemoteResult<()> {
        self.record(format!("new_branch {name}"));
        self.unit("new_branch")
    }

    async fn delete_branch(&self, name: &str) -> RemoteResult<()> {
        self.record(format!("delete_branch {name}"));
        self.unit("delete_branch")
    }

    async fn list_tags(&self) -> RemoteResult<Vec<String>> {
        self.record("list_tags");
        next(&self.tags, || Ok(Vec::new()))
    }

    async fn add_tag(&self, request: AddTagRequest) -> RemoteResult<()> {
        self.record(format!("add_tag {}", request.tag_name));
        self.unit("add_tag")
    }

    async fn create_stash(&self, message: &str) -> RemoteResult<()> {
        self.record(format!("create_stash {message}"));
        self.unit("create_stash")
    }

    async fn list_stashes(&self) -> RemoteResult<StashList> {
        self.record("list_stashes");
        next(&self.stashes, || Ok(StashList::default()))
    }

    async fn drop_stash(&self, stash_ref: &str, all: bool) -> RemoteResult<()> {
        self.record(format!("drop_stash {stash_ref} {all}"));
        self.unit("drop_stash")
    }

    async fn apply_stash(&self, request: ApplyStashRequest) -> RemoteResult<()> {
        self.record(format!("apply_stash {}", request.stash_ref));
        self.unit("apply_stash")
    }

    async fn checkout_stash(&self, request: CheckoutStashRequest) -> RemoteResult<()> {
        self.record(format!("checkout_stash {} {}", request.stash_ref, request.branch));
        self.unit("checkout_stash")
    }

    async fn merge(&self, branch: &str) -> RemoteResult<MergeResponse> {
        self.record(format!("merge {branch}"));
        next(&self.merge, || unscripted("merge"))
    }

    async fn rebase(&self, request: RebaseRequest) -> RemoteResult<RebaseResponse> {
        self.record(format!("rebase {}", request.upstream));
        next(&self.rebase, || unscripted("rebase"))
    }

    async fn rebase_state(&self) -> RemoteResult<String> {
        self.record("rebase_state");
        next(&self.rebase_state, || Ok("SAFE".to_string()))
    }

    async fn rebase_operate(&self, request: RebaseOperateRequest) -> RemoteResult<RebaseResponse> {
        self.record(format!("rebase_operate {:?}", request.operation));
        next(&self.rebase, || unscripted("rebase_operate"))
    }

    async fn rebase_update(&self, lines: Vec<RebaseTodoLine>) -> RemoteResult<RebaseResponse> {
        self.record(format!("rebase_update {}", lines.len()));
        next(&self.rebase, || unscripted("rebase_update"))
    }

    async fn conflicts(&self, path: &str) -> RemoteResult<ConflictContent> {
        self.record(format!("conflicts {path}"));
        next(&self.conflicts, || Ok(ConflictContent::default()))
    }

    async fn resolve_conflict(&self, request: ResolveConflictRequest) -> RemoteResult<()> {
        self.record(format!("resolve_conflict {}", request.path));
        self.unit("resolve_conflict")
    }

    async fn cancel_conflict(&self, path: &str) -> RemoteResult<()> {
        self.record(format!("cancel_conflict {path}"));
        self.unit("cancel_conflict")
    }

    async fn file_diff(
        &self,
        path: &str,
        new_ref: &str,
        _old_ref: Option<&str>,
    ) -> RemoteResult<FileDiff> {
        self.record(format!("file_diff {path} {new_ref}"));
        next(&self.file_diff, || Ok(FileDiff::default()))
    }

    async fn read_file(&self, path: &str) -> RemoteResult<FileContent> {
        self.record(format!("read_file {path}"));
        next(&self.content, || Ok(FileContent::default()))
    }

    async fn read_file_at(&self, git_ref: &str, path: &str) -> RemoteResult<FileContent> {
        self.record(format!("read_file_at {git_ref} {path}"));
        next(&self.content, || Ok(FileContent::default()))
    }

    async fn commit_diff(&self, rev: &str) -> RemoteResult<Vec<CommitDiffEntry>> {
        self.record(format!("commit_diff {rev}"));
        next(&self.commit_diff, || Ok(Vec::new()))
    }

    async fn history(
        &self,
        path: Option<&str>,
        page: u32,
        size: u32,
    ) -> RemoteResult<Vec<CommitInfo>> {
        self.record(format!("history {} {page} {size}", path.unwrap_or("-")));
        next(&self.history, || Ok(Vec::new()))
    }
}

/// One command received by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    Open(Modal),
    Dismiss,
    Update(ModalPatch),
    Notify(Notification),
}

/// Surface that records every command in order.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    calls: Mutex<Vec<SurfaceCall>>,
}

impl RecordingSurface {
    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SurfaceCall::Notify(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    /// Messages of notifications at `level`.
    pub fn at_level(&self, level: Level) -> Vec<String> {
        self.notifications()
            .into_iter()
            .filter(|n| n.level == level)
            .map(|n| n.message)
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.at_level(Level::Error)
    }

    /// Modals opened, in order.
    pub fn opened(&self) -> Vec<Modal> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SurfaceCall::Open(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn dismissals(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, SurfaceCall::Dismiss))
            .count()
    }
}

impl InteractionSurface for RecordingSurface {
    fn open_modal(&self, modal: &Modal) {
        self.calls.lock().unwrap().push(SurfaceCall::Open(modal.clone()));
    }

    fn dismiss_modal(&self) {
        self.calls.lock().unwrap().push(SurfaceCall::Dismiss);
    }

    fn update_modal(&self, patch: ModalPatch) {
        self.calls.lock().unwrap().push(SurfaceCall::Update(patch));
    }

    fn notify(&self, notification: &Notification) {
        self.calls
            .lock()
            .unwrap()
            .push(SurfaceCall::Notify(notification.clone()));
    }
}

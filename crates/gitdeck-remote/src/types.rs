//! Wire types exchanged with the workspace Git service.
//!
//! Status tags are kept as the strings the backend sent. Classifying them
//! is the caller's job; this crate never decides whether an operation
//! succeeded beyond the HTTP layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A file as reported by the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Path relative to the workspace root.
    pub name: String,

    /// Raw file state (e.g. `MODIFIED`, `CONFLICTION`).
    pub status: String,
}

/// Working tree status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub files: Vec<FileEntry>,

    #[serde(default)]
    pub clean: bool,
}

/// Request to commit staged files.
#[derive(Debug, Clone, Serialize)]
pub struct CommitRequest {
    /// Paths to commit, without a leading slash.
    pub files: Vec<String>,

    /// Commit message.
    pub message: String,
}

/// Commit result. A present `code` means the commit was refused.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommitResponse {
    #[serde(default)]
    pub code: Option<i64>,

    #[serde(default)]
    pub msg: Option<String>,
}

/// Checkout result.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    /// `OK`, `CONFLICTS`, `NONDELETED`, or something the backend added later.
    pub status: String,

    /// Files blocking the checkout (for `CONFLICTS`).
    #[serde(default)]
    pub conflict_list: Vec<String>,

    /// Files the backend could not remove (for `NONDELETED`).
    #[serde(default)]
    pub undeleted_list: Vec<String>,
}

/// Local and remote branch names. May include `HEAD`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BranchList {
    #[serde(default)]
    pub local: Vec<String>,

    #[serde(default)]
    pub remote: Vec<String>,
}

/// Name of the checked-out branch.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentBranch {
    pub name: String,
}

/// Request to create a tag.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTagRequest {
    pub tag_name: String,

    /// Commit-ish to tag.
    #[serde(rename = "ref")]
    pub git_ref: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Replace an existing tag of the same name.
    pub force: bool,
}

/// A stash entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StashEntry {
    /// Stash ref (e.g. `stash@{0}`).
    #[serde(rename = "ref")]
    pub stash_ref: String,

    pub message: String,

    pub index: u32,
}

/// Stash list response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StashList {
    #[serde(default)]
    pub stashes: Vec<StashEntry>,
}

/// Request to apply (or pop) a stash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyStashRequest {
    pub stash_ref: String,

    /// Drop the stash after applying it.
    pub pop: bool,

    /// Also restore the index state.
    pub apply_index: bool,
}

/// Request to create a branch from a stash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutStashRequest {
    pub stash_ref: String,
    pub branch: String,
}

/// How far `reset` rewinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResetMode {
    /// Move HEAD only.
    Soft,
    /// Move HEAD and reset the index.
    Mixed,
    /// Move HEAD, reset index and working tree.
    Hard,
}

/// Request to reset HEAD.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetRequest {
    #[serde(rename = "ref")]
    pub git_ref: String,

    pub reset_type: ResetMode,
}

/// Merge result. `success: false` still arrives with HTTP 200.
#[derive(Debug, Clone, Deserialize)]
pub struct MergeResponse {
    pub success: bool,

    #[serde(default)]
    pub status: Option<String>,
}

/// Request to start a rebase.
#[derive(Debug, Clone, Serialize)]
pub struct RebaseRequest {
    /// Branch to rebase; the current branch when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    pub upstream: String,

    pub interactive: bool,

    /// Preserve merge commits.
    pub preserve: bool,
}

/// One step of an interactive rebase plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebaseTodoLine {
    /// `PICK`, `REWORD`, `EDIT`, `SQUASH`, `FIXUP`, ...
    pub action: String,

    /// Abbreviated commit id.
    pub commit: String,

    #[serde(default)]
    pub short_message: String,
}

/// Result shared by `rebase`, `rebase/operate` and `rebase/update`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebaseResponse {
    pub success: bool,

    #[serde(default)]
    pub status: Option<String>,

    /// Commit message awaiting edit (`INTERACTIVE_EDIT`).
    #[serde(default)]
    pub message: Option<String>,

    /// Plan awaiting confirmation (`INTERACTIVE_PREPARED`).
    #[serde(default)]
    pub rebase_todo_lines: Vec<RebaseTodoLine>,
}

/// Step to perform on an in-progress rebase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RebaseOperation {
    Continue,
    Skip,
    Abort,
    ProcessSteps,
}

/// Request to drive an in-progress rebase.
#[derive(Debug, Clone, Serialize)]
pub struct RebaseOperateRequest {
    pub operation: RebaseOperation,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Per-ref result of a push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefUpdate {
    /// Raw update status (e.g. `OK`, `UP_TO_DATE`, `REJECTED_NONFASTFORWARD`).
    pub status: String,

    #[serde(default)]
    pub remote_name: Option<String>,

    #[serde(default)]
    pub message: Option<String>,
}

/// Push result.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushResponse {
    #[serde(default)]
    pub nothing_to_push: bool,

    #[serde(default)]
    pub ok: bool,

    #[serde(default)]
    pub updates: Vec<RefUpdate>,
}

/// One changed path in a commit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitDiffEntry {
    /// `ADD`, `MODIFY`, `DELETE`, `RENAME` or `COPY`.
    pub change_type: String,

    pub new_path: String,

    #[serde(default)]
    pub old_path: Option<String>,
}

/// Textual diff of one file between two refs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FileDiff {
    #[serde(default)]
    pub diff: String,
}

/// The three sides of a conflicted file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConflictContent {
    #[serde(default)]
    pub base: String,

    #[serde(default)]
    pub local: String,

    #[serde(default)]
    pub remote: String,
}

/// Request to write the resolved content of a conflicted file.
#[derive(Debug, Clone, Serialize)]
pub struct ResolveConflictRequest {
    pub path: String,
    pub content: String,
}

/// File content at a ref or in the working tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FileContent {
    #[serde(default)]
    pub content: String,
}

/// Author or committer of a commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: String,
}

/// One commit in a history page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitInfo {
    /// Full commit id.
    pub name: String,

    #[serde(default)]
    pub short_message: String,

    #[serde(default)]
    pub author: Person,

    /// Commit time (milliseconds since the epoch on the wire).
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub commit_time: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_response_lists_default_to_empty() {
        let resp: CheckoutResponse = serde_json::from_str(r#"{"status":"OK"}"#).unwrap();
        assert_eq!(resp.status, "OK");
        assert!(resp.conflict_list.is_empty());
        assert!(resp.undeleted_list.is_empty());
    }

    #[test]
    fn test_push_response_camel_case() {
        let resp: PushResponse = serde_json::from_str(
            r#"{"nothingToPush":false,"ok":false,"updates":[{"status":"REJECTED","remoteName":"refs/heads/main"}]}"#,
        )
        .unwrap();
        assert!(!resp.ok);
        assert_eq!(resp.updates[0].status, "REJECTED");
        assert_eq!(resp.updates[0].remote_name.as_deref(), Some("refs/heads/main"));
    }

    #[test]
    fn test_rebase_response_todo_lines() {
        let resp: RebaseResponse = serde_json::from_str(
            r#"{"success":false,"status":"INTERACTIVE_PREPARED","rebaseTodoLines":[{"action":"PICK","commit":"a1b2c3d","shortMessage":"init"}]}"#,
        )
        .unwrap();
        assert_eq!(resp.rebase_todo_lines.len(), 1);
        assert_eq!(resp.rebase_todo_lines[0].short_message, "init");
    }

    #[test]
    fn test_stash_entry_ref_field() {
        let entry: StashEntry =
            serde_json::from_str(r#"{"ref":"stash@{0}","message":"wip","index":0}"#).unwrap();
        assert_eq!(entry.stash_ref, "stash@{0}");
    }

    #[test]
    fn test_add_tag_request_serialization() {
        let req = AddTagRequest {
            tag_name: "v1".into(),
            git_ref: "HEAD".into(),
            message: None,
            force: false,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["tagName"], "v1");
        assert_eq!(json["ref"], "HEAD");
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_commit_info_millisecond_time() {
        let info: CommitInfo = serde_json::from_str(
            r#"{"name":"abc","shortMessage":"fix","author":{"name":"a","email":"a@x"},"commitTime":1700000000000}"#,
        )
        .unwrap();
        assert_eq!(info.commit_time.timestamp(), 1_700_000_000);
    }
}

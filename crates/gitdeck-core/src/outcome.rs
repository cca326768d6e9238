//! Classification of backend responses into closed outcome sets.
//!
//! The backend reports Git-level results as string tags inside successful
//! HTTP responses. Every function here maps one response shape to an enum
//! and rejects tags outside the documented set with
//! [`Error::UnknownStatus`], so a new backend tag fails loudly instead of
//! falling through to a default branch.

use gitdeck_remote::{CheckoutResponse, CommitResponse, MergeResponse, PushResponse, RebaseResponse, RebaseTodoLine};

use crate::error::{Error, Result};

/// Per-ref push status counted as success when `ok` is false.
pub const UP_TO_DATE: &str = "UP_TO_DATE";

// === Checkout ===

/// Result of a checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Branch switched. State follows through the live event channel.
    Switched,

    /// Local changes would be overwritten by these files.
    Conflicts(Vec<String>),

    /// The backend could not remove these files while switching.
    NonDeleted(Vec<String>),
}

/// Classify a checkout response.
///
/// # Errors
/// Returns error if the status tag is not `OK`, `CONFLICTS` or `NONDELETED`.
pub fn checkout(response: CheckoutResponse) -> Result<CheckoutOutcome> {
    match response.status.as_str() {
        "OK" => Ok(CheckoutOutcome::Switched),
        "CONFLICTS" => Ok(CheckoutOutcome::Conflicts(response.conflict_list)),
        "NONDELETED" => Ok(CheckoutOutcome::NonDeleted(response.undeleted_list)),
        _ => Err(Error::UnknownStatus {
            operation: "checkout",
            status: response.status,
        }),
    }
}

// === Merge ===

/// Terminal result of the first merge phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeCompletion {
    /// Nothing to merge.
    UpToDate,
    Merged,
}

/// Payload carried from the first merge phase into the second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeFailure {
    status: Option<String>,
}

/// Result of the first merge phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergePhase {
    Done(MergeCompletion),
    /// The merge did not complete; classify with [`merge_failure`].
    Continue(MergeFailure),
}

/// Result of the second merge phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeFailureOutcome {
    /// The merge failed outright; nothing to resolve.
    Failed,
    /// The working tree now holds conflicted files.
    Conflicting,
}

const MERGE_FAILED: &str = "FAILED";
const MERGE_CONFLICTING: &str = "CONFLICTING";

/// First merge phase.
///
/// A merge that failed at the Git level still arrives as a successful
/// response. A payload whose status is a failure tag is passed through
/// regardless of the `success` flag.
#[must_use]
pub fn merge_phase(response: MergeResponse) -> MergePhase {
    let failure_tag = matches!(
        response.status.as_deref(),
        Some(MERGE_FAILED | MERGE_CONFLICTING)
    );

    if !response.success || failure_tag {
        return MergePhase::Continue(MergeFailure {
            status: response.status,
        });
    }

    match response.status.as_deref() {
        Some("ALREADY_UP_TO_DATE") => MergePhase::Done(MergeCompletion::UpToDate),
        _ => MergePhase::Done(MergeCompletion::Merged),
    }
}

/// Second merge phase.
///
/// # Errors
/// Returns error if the payload has no status or a tag other than
/// `FAILED`/`CONFLICTING`.
pub fn merge_failure(failure: MergeFailure) -> Result<MergeFailureOutcome> {
    let Some(status) = failure.status else {
        return Err(Error::MissingStatus { operation: "merge" });
    };

    match status.as_str() {
        MERGE_FAILED => Ok(MergeFailureOutcome::Failed),
        MERGE_CONFLICTING => Ok(MergeFailureOutcome::Conflicting),
        _ => Err(Error::UnknownStatus {
            operation: "merge",
            status,
        }),
    }
}

// === Rebase ===

/// Result of `rebase`, `rebase_operate` or `rebase_update`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebaseOutcome {
    Completed,

    /// Stopped on conflicts.
    Stopped,

    /// Waiting for a reworded commit message.
    InteractiveEdit {
        /// Message to pre-fill.
        message: String,
    },

    Aborted,

    /// Waiting for the user to confirm or edit the plan.
    InteractivePrepared {
        /// Pending steps, in order.
        lines: Vec<RebaseTodoLine>,
    },

    /// Refused: the index has uncommitted changes.
    UncommittedChanges,

    /// Paused on an `edit` step.
    Edit,
}

impl RebaseOutcome {
    /// Whether the outcome is a precondition the user resolves outside
    /// this flow.
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        matches!(self, Self::UncommittedChanges | Self::Edit)
    }
}

/// Classify a rebase response.
///
/// # Errors
/// Returns error if a failed response carries no status or an unknown one.
pub fn rebase(response: RebaseResponse) -> Result<RebaseOutcome> {
    if response.success {
        return Ok(RebaseOutcome::Completed);
    }
    rebase_failure(response)
}

/// Classify a failed rebase response, ignoring the `success` flag.
///
/// # Errors
/// Returns error if the response carries no status or an unknown one.
pub fn rebase_failure(response: RebaseResponse) -> Result<RebaseOutcome> {
    let Some(status) = response.status else {
        return Err(Error::MissingStatus { operation: "rebase" });
    };

    match status.as_str() {
        "STOPPED" => Ok(RebaseOutcome::Stopped),
        "INTERACTIVE_EDIT" => Ok(RebaseOutcome::InteractiveEdit {
            message: response.message.unwrap_or_default(),
        }),
        "ABORTED" => Ok(RebaseOutcome::Aborted),
        "INTERACTIVE_PREPARED" => Ok(RebaseOutcome::InteractivePrepared {
            lines: response.rebase_todo_lines,
        }),
        "UNCOMMITTED_CHANGES" => Ok(RebaseOutcome::UncommittedChanges),
        "EDIT" => Ok(RebaseOutcome::Edit),
        _ => Err(Error::UnknownStatus {
            operation: "rebase",
            status,
        }),
    }
}

// === Push ===

/// Result of pushing all branches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    NothingToPush,
    Pushed,
    /// At least one ref was not accepted.
    Rejected {
        /// First status that was not up to date; `None` if the backend
        /// reported no per-ref updates at all.
        status: Option<String>,
    },
}

/// Classify a push response.
///
/// When `ok` is false the per-ref list decides: the push counts as
/// successful only if the list is non-empty and every status is exactly
/// [`UP_TO_DATE`].
#[must_use]
pub fn push(response: &PushResponse) -> PushOutcome {
    if response.nothing_to_push {
        return PushOutcome::NothingToPush;
    }
    if response.ok {
        return PushOutcome::Pushed;
    }

    match response.updates.iter().find(|u| u.status != UP_TO_DATE) {
        None if !response.updates.is_empty() => PushOutcome::Pushed,
        None => PushOutcome::Rejected { status: None },
        Some(update) => PushOutcome::Rejected {
            status: Some(update.status.clone()),
        },
    }
}

// === Commit ===

/// Result of a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed,
    Rejected { code: i64, message: String },
}

/// Classify a commit response. A present `code` means refusal.
#[must_use]
pub fn commit(response: CommitResponse) -> CommitOutcome {
    match response.code {
        Some(code) => CommitOutcome::Rejected {
            code,
            message: response.msg.unwrap_or_else(|| format!("commit refused ({code})")),
        },
        None => CommitOutcome::Committed,
    }
}

// === Repository state ===

/// State of the repository as reported by the rebase state endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryState {
    Bare,
    Safe,
    Merging,
    MergingResolved,
    CherryPicking,
    CherryPickingResolved,
    Reverting,
    RevertingResolved,
    Rebasing,
    RebasingRebasing,
    Apply,
    RebasingMerge,
    RebasingInteractive,
    Bisecting,
}

impl RepositoryState {
    const ALL: [(&'static str, Self); 14] = [
        ("BARE", Self::Bare),
        ("SAFE", Self::Safe),
        ("MERGING", Self::Merging),
        ("MERGING_RESOLVED", Self::MergingResolved),
        ("CHERRY_PICKING", Self::CherryPicking),
        ("CHERRY_PICKING_RESOLVED", Self::CherryPickingResolved),
        ("REVERTING", Self::Reverting),
        ("REVERTING_RESOLVED", Self::RevertingResolved),
        ("REBASING", Self::Rebasing),
        ("REBASING_REBASING", Self::RebasingRebasing),
        ("APPLY", Self::Apply),
        ("REBASING_MERGE", Self::RebasingMerge),
        ("REBASING_INTERACTIVE", Self::RebasingInteractive),
        ("BISECTING", Self::Bisecting),
    ];

    /// Wire name of this state.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        Self::ALL
            .iter()
            .find(|(_, state)| *state == self)
            .map_or("", |(name, _)| name)
    }

    /// Whether a rebase is in progress.
    #[must_use]
    pub const fn is_rebasing(self) -> bool {
        matches!(
            self,
            Self::Rebasing
                | Self::RebasingRebasing
                | Self::Apply
                | Self::RebasingMerge
                | Self::RebasingInteractive
        )
    }
}

/// Parse a repository state string.
///
/// # Errors
/// Returns error if the string is not a known state.
pub fn repository_state(raw: &str) -> Result<RepositoryState> {
    let trimmed = raw.trim().trim_matches('"');
    RepositoryState::ALL
        .iter()
        .find(|(name, _)| *name == trimmed)
        .map(|(_, state)| *state)
        .ok_or_else(|| Error::UnknownStatus {
            operation: "repository state",
            status: raw.to_string(),
        })
}

// === Commit diff ===

/// How a commit changed one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    Add,
    Modify,
    Delete,
    Rename,
    Copy,
}

impl ChangeType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Modify => "MODIFY",
            Self::Delete => "DELETE",
            Self::Rename => "RENAME",
            Self::Copy => "COPY",
        }
    }
}

/// Parse a commit diff change type.
///
/// # Errors
/// Returns error if the tag is not a known change type.
pub fn change_type(raw: &str) -> Result<ChangeType> {
    match raw {
        "ADD" => Ok(ChangeType::Add),
        "MODIFY" => Ok(ChangeType::Modify),
        "DELETE" => Ok(ChangeType::Delete),
        "RENAME" => Ok(ChangeType::Rename),
        "COPY" => Ok(ChangeType::Copy),
        _ => Err(Error::UnknownStatus {
            operation: "commit diff",
            status: raw.to_string(),
        }),
    }
}

//! Process-wide panel state.
//!
//! A single [`PanelState`] value is owned by the workflow orchestrator and
//! published to readers through a `tokio::sync::watch` channel. Readers get
//! shared borrows only; every mutator here is crate-private.

use std::collections::{BTreeSet, HashSet};

use gitdeck_remote::{BranchList, CommitInfo, StashEntry};

use crate::outcome::{ChangeType, RepositoryState};
use crate::status::StatusModel;
use crate::surface::{Modal, ModalPatch};
use crate::workflow::OperationKind;

/// Local and remote branches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchInfo {
    local: BTreeSet<String>,
    remote: BTreeSet<String>,
    failed: Option<String>,
}

impl BranchInfo {
    #[must_use]
    pub const fn local(&self) -> &BTreeSet<String> {
        &self.local
    }

    #[must_use]
    pub const fn remote(&self) -> &BTreeSet<String> {
        &self.remote
    }

    /// Branch whose checkout was blocked by conflicts, pending a stash.
    #[must_use]
    pub fn failed(&self) -> Option<&str> {
        self.failed.as_deref()
    }

    /// Replace both lists, dropping `HEAD`. The failed marker survives.
    pub(crate) fn replace(&mut self, list: BranchList) {
        let keep = |name: &String| name != "HEAD";
        self.local = list.local.into_iter().filter(keep).collect();
        self.remote = list.remote.into_iter().filter(keep).collect();
    }

    pub(crate) fn mark_failed(&mut self, branch: &str) {
        self.failed = Some(branch.to_string());
    }

    pub(crate) const fn take_failed(&mut self) -> Option<String> {
        self.failed.take()
    }

    /// Clear the marker if it names `branch`.
    pub(crate) fn clear_failed_if(&mut self, branch: &str) -> bool {
        if self.failed.as_deref() == Some(branch) {
            self.failed = None;
            return true;
        }
        false
    }
}

/// One path changed by a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedFile {
    pub change: ChangeType,
    pub path: String,
    /// Path before the commit (differs from `path` for renames and copies).
    pub old_path: String,
}

/// The commit shown in the commit diff modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitDiffView {
    pub rev: String,
    pub title: String,
    /// Ref to diff against; the commit's parent when absent.
    pub old_ref: Option<String>,
    pub files: Vec<ChangedFile>,
}

/// A modal in the stack with its presentation flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenModal {
    pub modal: Modal,
    pub is_invalid: bool,
}

/// Everything the Git panel shows.
#[derive(Debug, Clone, Default)]
pub struct PanelState {
    pub status: StatusModel,
    pub branches: BranchInfo,
    pub current_branch: Option<String>,
    pub tags: Vec<String>,
    pub stashes: Vec<StashEntry>,
    pub repository_state: Option<RepositoryState>,
    pub commit_diff: Option<CommitDiffView>,
    pub history: Vec<CommitInfo>,
    /// Commit message draft.
    pub commit_message: String,
    modals: Vec<OpenModal>,
    in_flight: HashSet<OperationKind>,
    busy: usize,
}

impl PanelState {
    /// Whether any operation is awaiting the backend.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.busy > 0
    }

    /// Whether an operation of `kind` is awaiting the backend.
    #[must_use]
    pub fn is_running(&self, kind: OperationKind) -> bool {
        self.in_flight.contains(&kind)
    }

    /// Open modals, bottom first.
    #[must_use]
    pub fn modals(&self) -> &[OpenModal] {
        &self.modals
    }

    /// The topmost modal.
    #[must_use]
    pub fn active_modal(&self) -> Option<&OpenModal> {
        self.modals.last()
    }

    pub(crate) const fn acquire_busy(&mut self) {
        self.busy += 1;
    }

    pub(crate) const fn release_busy(&mut self) {
        self.busy = self.busy.saturating_sub(1);
    }

    /// Claim the in-flight slot for `kind`. Returns false if it is taken.
    pub(crate) fn admit(&mut self, kind: OperationKind) -> bool {
        if !self.in_flight.insert(kind) {
            return false;
        }
        self.acquire_busy();
        true
    }

    pub(crate) fn release(&mut self, kind: OperationKind) {
        if self.in_flight.remove(&kind) {
            self.release_busy();
        }
    }

    pub(crate) fn push_modal(&mut self, modal: Modal) {
        self.modals.push(OpenModal {
            modal,
            is_invalid: false,
        });
    }

    pub(crate) fn pop_modal(&mut self) -> Option<Modal> {
        self.modals.pop().map(|open| open.modal)
    }

    /// Close every modal. Returns how many were open.
    pub(crate) fn clear_modals(&mut self) -> usize {
        let open = self.modals.len();
        self.modals.clear();
        open
    }

    /// Apply a patch to the topmost modal. Returns false when none is open.
    pub(crate) fn patch_modal(&mut self, patch: ModalPatch) -> bool {
        let Some(top) = self.modals.last_mut() else {
            return false;
        };
        if let Some(invalid) = patch.is_invalid {
            top.is_invalid = invalid;
        }
        true
    }

    /// Replace or extend the history list with one page.
    pub(crate) fn update_history(&mut self, page: Vec<CommitInfo>, reset: bool) {
        if reset {
            self.history = page;
        } else {
            self.history.extend(page);
        }
    }
}

//! Admission guards for running operations.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

use crate::panel::PanelState;

/// Operation families serialized by the orchestrator.
///
/// At most one operation of each kind is in flight at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Status,
    Commit,
    Fetch,
    Pull,
    Push,
    Checkout,
    ListBranches,
    NewBranch,
    DeleteBranch,
    CurrentBranch,
    ListTags,
    AddTag,
    ResetHead,
    CreateStash,
    ListStashes,
    DropStash,
    ApplyStash,
    CheckoutStash,
    Merge,
    Rebase,
    RebaseOperate,
    RebaseUpdate,
    RebaseState,
    ResolveConflict,
    CancelConflict,
    CommitDiff,
    History,
}

impl OperationKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Commit => "commit",
            Self::Fetch => "fetch",
            Self::Pull => "pull",
            Self::Push => "push",
            Self::Checkout => "checkout",
            Self::ListBranches => "list branches",
            Self::NewBranch => "new branch",
            Self::DeleteBranch => "delete branch",
            Self::CurrentBranch => "current branch",
            Self::ListTags => "list tags",
            Self::AddTag => "add tag",
            Self::ResetHead => "reset",
            Self::CreateStash => "stash",
            Self::ListStashes => "list stashes",
            Self::DropStash => "drop stash",
            Self::ApplyStash => "apply stash",
            Self::CheckoutStash => "checkout stash",
            Self::Merge => "merge",
            Self::Rebase => "rebase",
            Self::RebaseOperate => "rebase operation",
            Self::RebaseUpdate => "rebase update",
            Self::RebaseState => "rebase state",
            Self::ResolveConflict => "resolve conflict",
            Self::CancelConflict => "cancel conflict",
            Self::CommitDiff => "commit diff",
            Self::History => "history",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Holds the busy flag, and the in-flight slot for one operation kind,
/// until dropped.
pub(crate) struct OperationGuard {
    state: Arc<watch::Sender<PanelState>>,
    kind: Option<OperationKind>,
}

impl OperationGuard {
    /// Claim the slot for `kind`. Returns `None` if one is already held.
    pub(crate) fn acquire(
        state: &Arc<watch::Sender<PanelState>>,
        kind: OperationKind,
    ) -> Option<Self> {
        let admitted = state.send_if_modified(|panel| panel.admit(kind));
        admitted.then(|| Self {
            state: Arc::clone(state),
            kind: Some(kind),
        })
    }

    /// Mark the panel busy without claiming a slot.
    pub(crate) fn busy(state: &Arc<watch::Sender<PanelState>>) -> Self {
        state.send_modify(PanelState::acquire_busy);
        Self {
            state: Arc::clone(state),
            kind: None,
        }
    }
}

impl Drop for OperationGuard {
    fn drop(&mut self) {
        let kind = self.kind;
        self.state.send_modify(|panel| match kind {
            Some(kind) => panel.release(kind),
            None => panel.release_busy(),
        });
    }
}

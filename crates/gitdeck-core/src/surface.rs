//! Interaction surface contract.
//!
//! The orchestrator decides which modal is open and which notifications are
//! shown; an [`InteractionSurface`] only presents them.

use std::fmt;

use gitdeck_remote::RebaseTodoLine;
use serde::Serialize;

/// A modal dialog the orchestrator can open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Modal {
    /// Offer to stash local changes so a blocked checkout can proceed.
    CheckoutStash { title: String },

    /// List conflicted files for resolution.
    ResolveConflicts {
        title: Option<String>,
        /// Whether a click outside the dialog dismisses it.
        dismiss_on_outside_click: bool,
    },

    /// Edit a commit message during an interactive rebase.
    RebaseInput { message: String },

    /// Confirm or edit an interactive rebase plan.
    RebasePrepare { lines: Vec<RebaseTodoLine> },

    /// Create a stash.
    Stash,

    /// Files changed by the commit held in panel state.
    CommitDiff,

    /// Diff of one file between two refs.
    DiffFile {
        path: String,
        new_ref: String,
        old_ref: Option<String>,
    },

    /// Three-way merge editor for one conflicted file.
    MergeFile { path: String },
}

impl Modal {
    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CheckoutStash { .. } => "checkout_stash",
            Self::ResolveConflicts { .. } => "resolve_conflicts",
            Self::RebaseInput { .. } => "rebase_input",
            Self::RebasePrepare { .. } => "rebase_prepare",
            Self::Stash => "stash",
            Self::CommitDiff => "commit_diff",
            Self::DiffFile { .. } => "diff_file",
            Self::MergeFile { .. } => "merge_file",
        }
    }

    /// Whether the modal waits on user input to continue a workflow.
    #[must_use]
    pub const fn awaits_user(&self) -> bool {
        matches!(
            self,
            Self::CheckoutStash { .. }
                | Self::ResolveConflicts { .. }
                | Self::RebaseInput { .. }
                | Self::RebasePrepare { .. }
        )
    }
}

/// Partial update to the active modal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ModalPatch {
    /// The modal's data is out of date and should be reloaded.
    pub is_invalid: Option<bool>,
}

impl ModalPatch {
    #[must_use]
    pub const fn invalid(is_invalid: bool) -> Self {
        Self {
            is_invalid: Some(is_invalid),
        }
    }
}

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Success,
    Info,
    Warning,
    Error,
}

/// A terminal notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Level::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Level::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Level::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Level::Error, message)
    }

    fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Presentation side of modals and notifications.
///
/// Calls arrive in the order the orchestrator decided them; an
/// implementation must not reorder or drop them.
pub trait InteractionSurface: Send + Sync {
    /// Present a modal on top of whatever is open.
    fn open_modal(&self, modal: &Modal);

    /// Close the topmost modal.
    fn dismiss_modal(&self);

    /// Patch the topmost modal.
    fn update_modal(&self, patch: ModalPatch);

    /// Show a notification.
    fn notify(&self, notification: &Notification);
}

//! Workflow orchestrator.
//!
//! Every public operation follows the same template:
//!
//! 1. Claim the in-flight slot for its [`OperationKind`] and mark the panel
//!    busy. Both are released when the operation settles, on every path.
//! 2. Issue one gateway request.
//! 3. On transport failure, notify and return without touching state.
//! 4. Classify the response.
//! 5. Patch panel state, open or dismiss modals, and emit a terminal
//!    notification.
//!
//! Operations never return errors. The caller gets a [`Settlement`]
//! describing how the operation ended; details went to the
//! [`InteractionSurface`].

mod branch;
mod conflict;
mod events;
mod guard;
mod merge;
mod rebase;
mod stash;
mod sync;

use std::sync::Arc;

use gitdeck_remote::GitGateway;
use tokio::sync::watch;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::panel::PanelState;
use crate::status::{FileState, RefreshTicket};
use crate::surface::{InteractionSurface, Level, Modal, ModalPatch, Notification};

pub use events::LiveEvent;
pub use guard::OperationKind;
use guard::OperationGuard;

/// How an operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The operation did what was asked.
    Succeeded,
    /// Nothing to do (already up to date, nothing to push, aborted).
    Informed,
    /// A precondition must be fixed outside this flow.
    Blocked,
    /// A follow-up modal is waiting for the user.
    AwaitingUser,
    /// Transport or Git-level failure, already notified.
    Failed,
    /// Refused because the same operation is still running.
    Duplicate,
}

impl Settlement {
    /// Whether the operation ended in failure.
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Failed)
    }
}

/// Values the orchestrator needs from configuration.
#[derive(Debug, Clone)]
pub struct WorkflowSettings {
    /// Commit message used when the draft is empty.
    pub default_commit_message: String,
    /// History page size.
    pub history_page_size: u32,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for WorkflowSettings {
    fn from(config: &Config) -> Self {
        Self {
            default_commit_message: config.commit.default_message.clone(),
            history_page_size: config.history.page_size,
        }
    }
}

/// Drives Git operations against a gateway and presents results on a
/// surface.
pub struct Workflow<G, S> {
    gateway: Arc<G>,
    surface: Arc<S>,
    state: Arc<watch::Sender<PanelState>>,
    settings: WorkflowSettings,
}

impl<G, S> Clone for Workflow<G, S> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            surface: Arc::clone(&self.surface),
            state: Arc::clone(&self.state),
            settings: self.settings.clone(),
        }
    }
}

impl<G: GitGateway, S: InteractionSurface> Workflow<G, S> {
    /// Create an orchestrator with empty panel state.
    pub fn new(gateway: G, surface: S, settings: WorkflowSettings) -> Self {
        let (state, _) = watch::channel(PanelState::default());
        Self {
            gateway: Arc::new(gateway),
            surface: Arc::new(surface),
            state: Arc::new(state),
            settings,
        }
    }

    /// Subscribe to panel state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PanelState> {
        self.state.subscribe()
    }

    /// Read the current panel state.
    ///
    /// The returned guard blocks writers; do not hold it across an await.
    #[must_use]
    pub fn state(&self) -> watch::Ref<'_, PanelState> {
        self.state.borrow()
    }

    #[must_use]
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[must_use]
    pub const fn settings(&self) -> &WorkflowSettings {
        &self.settings
    }

    // === Status ===

    /// Refresh the working tree status, optionally narrowed to one state.
    ///
    /// Clears the invalid flag of the active modal before querying.
    pub async fn refresh(&self, filter: Option<FileState>) -> Settlement {
        let Some(_guard) = self.admit(OperationKind::Status) else {
            return Settlement::Duplicate;
        };

        self.update_modal(ModalPatch::invalid(false));
        match self.refresh_status(filter).await {
            Ok(()) => Settlement::Succeeded,
            Err(err) => self.fail("Failed to load status", &err),
        }
    }

    /// Stage one file. Returns false if it is not in the snapshot.
    pub fn stage(&self, path: &str) -> bool {
        self.update(|state| state.status.stage(path))
    }

    /// Unstage one file. Returns false if it is not in the snapshot.
    pub fn unstage(&self, path: &str) -> bool {
        self.update(|state| state.status.unstage(path))
    }

    pub fn stage_all(&self) {
        self.update(|state| state.status.stage_all());
    }

    pub fn unstage_all(&self) {
        self.update(|state| state.status.unstage_all());
    }

    /// Replace the commit message draft.
    pub fn set_commit_message(&self, message: impl Into<String>) {
        let message = message.into();
        self.update(|state| state.commit_message = message);
    }

    // === Internal helpers ===

    /// Mutate panel state and notify subscribers.
    fn update<R>(&self, f: impl FnOnce(&mut PanelState) -> R) -> R {
        let mut result = None;
        self.state.send_modify(|state| result = Some(f(state)));
        result.unwrap_or_else(|| unreachable!("send_modify runs its closure once"))
    }

    /// Admit an operation of `kind`, or notify that one is already running.
    fn admit(&self, kind: OperationKind) -> Option<OperationGuard> {
        let guard = OperationGuard::acquire(&self.state, kind);
        if guard.is_some() {
            tracing::debug!(operation = %kind, "dispatching");
        } else {
            tracing::debug!(operation = %kind, "rejected duplicate");
            self.notify(Notification::info(format!("Another {kind} is still running.")));
        }
        guard
    }

    /// Mark the panel busy for an operation that is not serialized.
    fn busy(&self) -> OperationGuard {
        OperationGuard::busy(&self.state)
    }

    /// Query status and apply it, unless a newer refresh was issued in the
    /// meantime.
    async fn refresh_status(&self, filter: Option<FileState>) -> Result<()> {
        let ticket = self.update(|state| state.status.begin_refresh());
        self.apply_status(ticket, filter).await
    }

    async fn apply_status(&self, ticket: RefreshTicket, filter: Option<FileState>) -> Result<()> {
        let response = match self.gateway.status().await {
            Ok(response) => response,
            Err(err) => {
                self.update(|state| state.status.abandon(ticket));
                return Err(err.into());
            }
        };
        let applied = self.update(|state| {
            state
                .status
                .apply(ticket, &response, filter)
                .map(|snapshot| snapshot.is_some())
        })?;
        if applied {
            tracing::debug!(files = response.files.len(), ?filter, "status applied");
        }
        Ok(())
    }

    /// Report a failure and settle.
    fn fail(&self, context: &str, err: &Error) -> Settlement {
        tracing::warn!(error = %err, "{context}");
        self.notify(Notification::error(format!("{context}: {err}")));
        Settlement::Failed
    }

    fn notify(&self, notification: Notification) {
        match notification.level {
            Level::Error | Level::Warning => {
                tracing::info!(level = ?notification.level, "{}", notification.message);
            }
            Level::Success | Level::Info => {
                tracing::debug!(level = ?notification.level, "{}", notification.message);
            }
        }
        self.surface.notify(&notification);
    }

    /// Close every open modal, then open `modal`.
    fn show(&self, modal: Modal) {
        let closed = self.update(PanelState::clear_modals);
        for _ in 0..closed {
            self.surface.dismiss_modal();
        }
        self.layer(modal);
    }

    /// Open `modal` above the active one.
    fn layer(&self, modal: Modal) {
        tracing::debug!(modal = modal.name(), "opening modal");
        self.surface.open_modal(&modal);
        self.update(|state| state.push_modal(modal));
    }

    /// Close the topmost modal, if any.
    fn dismiss(&self) {
        if self.update(PanelState::pop_modal).is_some() {
            self.surface.dismiss_modal();
        }
    }

    fn update_modal(&self, patch: ModalPatch) {
        if self.update(|state| state.patch_modal(patch)) {
            self.surface.update_modal(patch);
        }
    }
}

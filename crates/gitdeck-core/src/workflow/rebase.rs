//! Rebase family.
//!
//! `rebase`, `rebase_operate` and `rebase_update` share one failure
//! handler. Each outcome routes to exactly one follow-up.

use gitdeck_remote::{
    GitGateway, RebaseOperateRequest, RebaseOperation, RebaseRequest, RebaseResponse,
    RebaseTodoLine,
};

use super::{OperationKind, Settlement, Workflow};
use crate::outcome::{self, RebaseOutcome};
use crate::surface::{InteractionSurface, Modal, Notification};

/// What to do around a rebase response.
#[derive(Clone, Copy)]
struct Entry {
    success: &'static str,
    /// Close the active modal before settling.
    dismiss: bool,
}

const REBASE: Entry = Entry {
    success: "Rebase finished.",
    dismiss: true,
};

const OPERATE: Entry = Entry {
    success: "Rebase step applied.",
    dismiss: false,
};

impl<G: GitGateway, S: InteractionSurface> Workflow<G, S> {
    /// Rebase `branch` (the current branch when `None`) onto `upstream`.
    pub async fn rebase(
        &self,
        branch: Option<&str>,
        upstream: &str,
        interactive: bool,
        preserve: bool,
    ) -> Settlement {
        let Some(_guard) = self.admit(OperationKind::Rebase) else {
            return Settlement::Duplicate;
        };

        let request = RebaseRequest {
            branch: branch.map(ToString::to_string),
            upstream: upstream.to_string(),
            interactive,
            preserve,
        };
        match self.gateway.rebase(request).await {
            Ok(response) => self.settle_rebase_response(response, REBASE).await,
            Err(err) => self.fail("Rebase failed", &err.into()),
        }
    }

    /// Continue, skip or abort the rebase in progress.
    pub async fn rebase_operate(
        &self,
        operation: RebaseOperation,
        message: Option<&str>,
    ) -> Settlement {
        let Some(_guard) = self.admit(OperationKind::RebaseOperate) else {
            return Settlement::Duplicate;
        };

        let request = RebaseOperateRequest {
            operation,
            message: message.map(ToString::to_string),
        };
        match self.gateway.rebase_operate(request).await {
            Ok(response) => self.settle_rebase_response(response, OPERATE).await,
            Err(err) => self.fail("Rebase operation failed", &err.into()),
        }
    }

    /// Submit an edited interactive rebase plan.
    pub async fn rebase_update(&self, lines: Vec<RebaseTodoLine>) -> Settlement {
        let Some(_guard) = self.admit(OperationKind::RebaseUpdate) else {
            return Settlement::Duplicate;
        };

        match self.gateway.rebase_update(lines).await {
            Ok(response) => self.settle_rebase_response(response, REBASE).await,
            Err(err) => self.fail("Rebase failed", &err.into()),
        }
    }

    /// Load the repository state.
    pub async fn rebase_state(&self) -> Settlement {
        let Some(_guard) = self.admit(OperationKind::RebaseState) else {
            return Settlement::Duplicate;
        };

        let raw = match self.gateway.rebase_state().await {
            Ok(raw) => raw,
            Err(err) => return self.fail("Failed to read repository state", &err.into()),
        };
        match outcome::repository_state(&raw) {
            Ok(repository_state) => {
                self.update(|state| state.repository_state = Some(repository_state));
                Settlement::Succeeded
            }
            Err(err) => self.fail("Failed to read repository state", &err),
        }
    }

    async fn settle_rebase_response(&self, response: RebaseResponse, entry: Entry) -> Settlement {
        match outcome::rebase(response) {
            Ok(RebaseOutcome::Completed) => {
                self.notify(Notification::success(entry.success));
                if entry.dismiss {
                    self.dismiss();
                }
                match self.refresh_status(None).await {
                    Ok(()) => Settlement::Succeeded,
                    Err(err) => self.fail("Failed to load status", &err),
                }
            }
            Ok(outcome) => {
                if entry.dismiss {
                    self.dismiss();
                }
                self.settle_rebase_failure(outcome).await
            }
            Err(err) => self.fail("Rebase failed", &err),
        }
    }

    /// Settle a rebase that did not complete.
    async fn settle_rebase_failure(&self, outcome: RebaseOutcome) -> Settlement {
        tracing::debug!(?outcome, "rebase did not complete");
        match outcome {
            RebaseOutcome::Stopped => {
                self.notify(Notification::error("Rebase stopped on conflicts."));
                if let Err(err) = self.refresh_status(None).await {
                    return self.fail("Failed to load status", &err);
                }
                self.show(Modal::ResolveConflicts {
                    title: None,
                    dismiss_on_outside_click: true,
                });
                Settlement::AwaitingUser
            }
            RebaseOutcome::InteractiveEdit { message } => {
                self.show(Modal::RebaseInput { message });
                Settlement::AwaitingUser
            }
            RebaseOutcome::Aborted => {
                self.notify(Notification::info("Rebase aborted."));
                Settlement::Informed
            }
            RebaseOutcome::InteractivePrepared { lines } => {
                self.show(Modal::RebasePrepare { lines });
                Settlement::AwaitingUser
            }
            RebaseOutcome::UncommittedChanges => {
                self.notify(Notification::info(
                    "Cannot rebase: the index contains uncommitted changes. Commit or stash them first.",
                ));
                Settlement::Blocked
            }
            RebaseOutcome::Edit => {
                self.notify(Notification::info(
                    "Rebase paused for editing. Edit the files, then continue the rebase.",
                ));
                Settlement::Blocked
            }
            RebaseOutcome::Completed => {
                unreachable!("completed rebases are settled by settle_rebase_response")
            }
        }
    }
}

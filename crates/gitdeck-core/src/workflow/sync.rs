//! Commit and remote synchronization.

use gitdeck_remote::{CommitRequest, GitGateway};

use super::{OperationKind, Settlement, Workflow};
use crate::outcome::{self, CommitOutcome, PushOutcome};
use crate::surface::{InteractionSurface, Notification};

impl<G: GitGateway, S: InteractionSurface> Workflow<G, S> {
    /// Commit the staged files with the drafted message.
    ///
    /// An empty draft commits with the configured default message. The
    /// draft is cleared only when the backend accepts the commit.
    pub async fn commit(&self) -> Settlement {
        let Some(_guard) = self.admit(OperationKind::Commit) else {
            return Settlement::Duplicate;
        };

        let request = {
            let state = self.state.borrow();
            let message = if state.commit_message.trim().is_empty() {
                self.settings.default_commit_message.clone()
            } else {
                state.commit_message.clone()
            };
            CommitRequest {
                files: state.status.staged_paths(),
                message,
            }
        };

        let response = match self.gateway.commit(request).await {
            Ok(response) => response,
            Err(err) => return self.fail("Commit failed", &err.into()),
        };

        match outcome::commit(response) {
            CommitOutcome::Committed => {
                self.update(|state| state.commit_message.clear());
                self.notify(Notification::success("Committed."));
                self.dismiss();
                Settlement::Succeeded
            }
            CommitOutcome::Rejected { code, message } => {
                tracing::warn!(code, "commit rejected");
                self.notify(Notification::error(message));
                Settlement::Failed
            }
        }
    }

    /// Fetch from all remotes.
    pub async fn fetch(&self) -> Settlement {
        let Some(_guard) = self.admit(OperationKind::Fetch) else {
            return Settlement::Duplicate;
        };

        match self.gateway.fetch().await {
            Ok(()) => {
                self.notify(Notification::success("Fetched from all remotes."));
                Settlement::Succeeded
            }
            Err(err) => self.fail("Fetch failed", &err.into()),
        }
    }

    /// Pull the current branch, then refresh status.
    pub async fn pull(&self) -> Settlement {
        let Some(_guard) = self.admit(OperationKind::Pull) else {
            return Settlement::Duplicate;
        };

        if let Err(err) = self.gateway.pull().await {
            return self.fail("Pull failed", &err.into());
        }

        self.notify(Notification::success("Pulled."));
        match self.refresh_status(None).await {
            Ok(()) => Settlement::Succeeded,
            Err(err) => self.fail("Failed to load status", &err),
        }
    }

    /// Push all branches.
    pub async fn push(&self) -> Settlement {
        let Some(_guard) = self.admit(OperationKind::Push) else {
            return Settlement::Duplicate;
        };

        let response = match self.gateway.push_all().await {
            Ok(response) => response,
            Err(err) => return self.fail("Push failed", &err.into()),
        };

        match outcome::push(&response) {
            PushOutcome::NothingToPush => {
                self.notify(Notification::info("Nothing to push."));
                Settlement::Informed
            }
            PushOutcome::Pushed => {
                self.notify(Notification::success("Pushed."));
                Settlement::Succeeded
            }
            PushOutcome::Rejected { status } => {
                let message = status.map_or_else(
                    || "Push failed: no refs were updated.".to_string(),
                    |status| format!("Push failed: {status}"),
                );
                tracing::warn!(updates = response.updates.len(), "push rejected");
                self.notify(Notification::error(message));
                Settlement::Failed
            }
        }
    }
}

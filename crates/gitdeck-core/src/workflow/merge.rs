//! Two-phase merge.

use gitdeck_remote::GitGateway;

use super::{OperationKind, Settlement, Workflow};
use crate::outcome::{self, MergeCompletion, MergeFailure, MergeFailureOutcome, MergePhase};
use crate::status::FileState;
use crate::surface::{InteractionSurface, Modal, Notification};

impl<G: GitGateway, S: InteractionSurface> Workflow<G, S> {
    /// Merge `branch` into the current branch.
    ///
    /// The first phase settles a completed merge. A merge that failed at
    /// the Git level is handed to the second phase, which either reports
    /// the failure or loads the conflicted files for resolution.
    pub async fn merge(&self, branch: &str) -> Settlement {
        let Some(_guard) = self.admit(OperationKind::Merge) else {
            return Settlement::Duplicate;
        };

        let response = match self.gateway.merge(branch).await {
            Ok(response) => response,
            Err(err) => return self.fail("Merge failed", &err.into()),
        };

        match outcome::merge_phase(response) {
            MergePhase::Done(completion) => self.settle_merge(branch, completion).await,
            MergePhase::Continue(failure) => self.settle_merge_failure(branch, failure).await,
        }
    }

    async fn settle_merge(&self, branch: &str, completion: MergeCompletion) -> Settlement {
        match completion {
            MergeCompletion::UpToDate => {
                self.notify(Notification::info("Already up to date."));
                self.dismiss();
                Settlement::Informed
            }
            MergeCompletion::Merged => {
                self.notify(Notification::success(format!("Merged {branch}.")));
                self.dismiss();
                match self.refresh_status(None).await {
                    Ok(()) => Settlement::Succeeded,
                    Err(err) => self.fail("Failed to load status", &err),
                }
            }
        }
    }

    async fn settle_merge_failure(&self, branch: &str, failure: MergeFailure) -> Settlement {
        match outcome::merge_failure(failure) {
            Ok(MergeFailureOutcome::Failed) => {
                tracing::warn!(branch, "merge failed");
                self.notify(Notification::error(format!("Merging {branch} failed.")));
                Settlement::Failed
            }
            Ok(MergeFailureOutcome::Conflicting) => {
                tracing::warn!(branch, "merge left conflicts");
                self.notify(Notification::warning(format!(
                    "Merging {branch} produced conflicts."
                )));
                self.dismiss();
                if let Err(err) = self.refresh_status(Some(FileState::Confliction)).await {
                    return self.fail("Failed to load status", &err);
                }
                self.show(Modal::ResolveConflicts {
                    title: None,
                    dismiss_on_outside_click: true,
                });
                Settlement::AwaitingUser
            }
            Err(err) => self.fail("Merge failed", &err),
        }
    }
}

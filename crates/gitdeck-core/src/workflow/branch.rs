//! Branches, tags and reset.

use gitdeck_remote::{AddTagRequest, GitGateway, ResetMode, ResetRequest};

use super::{OperationKind, Settlement, Workflow};
use crate::error::Result;
use crate::outcome::{self, CheckoutOutcome};
use crate::surface::{InteractionSurface, Modal, Notification};

impl<G: GitGateway, S: InteractionSurface> Workflow<G, S> {
    /// Check out `branch`, creating it from `remote_branch` when given.
    ///
    /// A successful switch changes no local state; the backend announces it
    /// on the live event channel. A checkout blocked by local changes marks
    /// the branch failed and offers to stash.
    pub async fn checkout(&self, branch: &str, remote_branch: Option<&str>) -> Settlement {
        let Some(_guard) = self.admit(OperationKind::Checkout) else {
            return Settlement::Duplicate;
        };

        let response = match self.gateway.checkout(branch, remote_branch).await {
            Ok(response) => response,
            Err(err) => return self.fail("Checkout failed", &err.into()),
        };

        match outcome::checkout(response) {
            Ok(CheckoutOutcome::Switched) => {
                self.notify(Notification::success(format!("Switched to {branch}.")));
                Settlement::Succeeded
            }
            Ok(CheckoutOutcome::Conflicts(files)) => {
                tracing::warn!(branch, conflicts = files.len(), "checkout blocked");
                self.notify(Notification::error(format!(
                    "Cannot check out {branch}: local changes would be overwritten."
                )));
                let ticket = self.update(|state| {
                    state.branches.mark_failed(branch);
                    state.status.begin_conflict_refresh(&files)
                });
                if let Err(err) = self.apply_status(ticket, None).await {
                    return self.fail("Failed to load status", &err);
                }
                self.show(Modal::CheckoutStash {
                    title: "Checkout failed".to_string(),
                });
                Settlement::AwaitingUser
            }
            Ok(CheckoutOutcome::NonDeleted(files)) => {
                tracing::warn!(branch, undeleted = files.len(), "checkout left files behind");
                self.notify(Notification::error(
                    "Checkout finished, but some files could not be deleted.",
                ));
                self.update(|state| state.status.replace_with_added(files));
                self.show(Modal::ResolveConflicts {
                    title: Some("Files not deleted".to_string()),
                    dismiss_on_outside_click: false,
                });
                Settlement::AwaitingUser
            }
            Err(err) => self.fail("Checkout failed", &err),
        }
    }

    /// Load local and remote branches.
    pub async fn list_branches(&self) -> Settlement {
        let Some(_guard) = self.admit(OperationKind::ListBranches) else {
            return Settlement::Duplicate;
        };

        match self.reload_branches().await {
            Ok(()) => Settlement::Succeeded,
            Err(err) => self.fail("Failed to load branches", &err),
        }
    }

    /// Create a branch at HEAD.
    pub async fn new_branch(&self, name: &str) -> Settlement {
        let Some(_guard) = self.admit(OperationKind::NewBranch) else {
            return Settlement::Duplicate;
        };

        if let Err(err) = self.gateway.new_branch(name).await {
            return self.fail("Failed to create branch", &err.into());
        }

        self.notify(Notification::success(format!("Created branch {name}.")));
        self.dismiss();
        match self.reload_branches().await {
            Ok(()) => Settlement::Succeeded,
            Err(err) => self.fail("Failed to load branches", &err),
        }
    }

    /// Delete a local branch.
    pub async fn delete_branch(&self, name: &str) -> Settlement {
        let Some(_guard) = self.admit(OperationKind::DeleteBranch) else {
            return Settlement::Duplicate;
        };

        if let Err(err) = self.gateway.delete_branch(name).await {
            return self.fail("Failed to delete branch", &err.into());
        }

        self.notify(Notification::success(format!("Deleted branch {name}.")));
        match self.reload_branches().await {
            Ok(()) => Settlement::Succeeded,
            Err(err) => self.fail("Failed to load branches", &err),
        }
    }

    /// Load the checked-out branch name.
    ///
    /// With `announce`, a success notification confirms the sync.
    pub async fn current_branch(&self, announce: bool) -> Settlement {
        let Some(_guard) = self.admit(OperationKind::CurrentBranch) else {
            return Settlement::Duplicate;
        };

        match self.gateway.current_branch().await {
            Ok(current) => {
                if announce {
                    self.notify(Notification::success(format!("On branch {}.", current.name)));
                }
                self.update(|state| state.current_branch = Some(current.name));
                Settlement::Succeeded
            }
            Err(err) => self.fail("Failed to read the current branch", &err.into()),
        }
    }

    /// Load tag names.
    pub async fn list_tags(&self) -> Settlement {
        let Some(_guard) = self.admit(OperationKind::ListTags) else {
            return Settlement::Duplicate;
        };

        match self.gateway.list_tags().await {
            Ok(tags) => {
                self.update(|state| state.tags = tags);
                Settlement::Succeeded
            }
            Err(err) => self.fail("Failed to load tags", &err.into()),
        }
    }

    /// Tag `git_ref`.
    pub async fn add_tag(
        &self,
        tag_name: &str,
        git_ref: &str,
        message: Option<&str>,
        force: bool,
    ) -> Settlement {
        let Some(_guard) = self.admit(OperationKind::AddTag) else {
            return Settlement::Duplicate;
        };

        let request = AddTagRequest {
            tag_name: tag_name.to_string(),
            git_ref: git_ref.to_string(),
            message: message.map(ToString::to_string),
            force,
        };
        match self.gateway.add_tag(request).await {
            Ok(()) => {
                self.notify(Notification::success(format!("Tagged {git_ref} as {tag_name}.")));
                self.dismiss();
                Settlement::Succeeded
            }
            Err(err) => self.fail("Failed to add tag", &err.into()),
        }
    }

    /// Reset HEAD to `git_ref`, then refresh status.
    pub async fn reset_head(&self, git_ref: &str, mode: ResetMode) -> Settlement {
        let Some(_guard) = self.admit(OperationKind::ResetHead) else {
            return Settlement::Duplicate;
        };

        let request = ResetRequest {
            git_ref: git_ref.to_string(),
            reset_type: mode,
        };
        if let Err(err) = self.gateway.reset_head(request).await {
            return self.fail("Reset failed", &err.into());
        }

        self.notify(Notification::success(format!("Reset to {git_ref}.")));
        self.dismiss();
        match self.refresh_status(None).await {
            Ok(()) => Settlement::Succeeded,
            Err(err) => self.fail("Failed to load status", &err),
        }
    }

    pub(super) async fn reload_branches(&self) -> Result<()> {
        let list = self.gateway.list_branches().await?;
        self.update(|state| state.branches.replace(list));
        Ok(())
    }
}

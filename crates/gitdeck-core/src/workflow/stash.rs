//! Stash operations.

use gitdeck_remote::{ApplyStashRequest, CheckoutStashRequest, GitGateway};

use super::{OperationKind, Settlement, Workflow};
use crate::error::{Error, Result};
use crate::surface::{InteractionSurface, Modal, Notification};

impl<G: GitGateway, S: InteractionSurface> Workflow<G, S> {
    /// Stash local changes.
    ///
    /// If a checkout was blocked by those changes, the failed marker is
    /// cleared and the checkout retried; its settlement is returned.
    pub async fn create_stash(&self, message: &str) -> Settlement {
        let Some(_guard) = self.admit(OperationKind::CreateStash) else {
            return Settlement::Duplicate;
        };

        if let Err(err) = self.gateway.create_stash(message).await {
            let err = Error::from(err);
            tracing::warn!(error = %err, "stash failed");
            self.notify(Notification::error(err.to_string()));
            self.dismiss();
            return Settlement::Failed;
        }

        self.notify(Notification::success("Stashed local changes."));
        self.dismiss();

        let blocked = self.update(|state| state.branches.take_failed());
        match blocked {
            Some(branch) => {
                tracing::debug!(%branch, "retrying blocked checkout");
                self.checkout(&branch, None).await
            }
            None => Settlement::Succeeded,
        }
    }

    /// Load the current branch, then open the stash dialog.
    pub async fn show_stash(&self) -> Settlement {
        match self.current_branch(false).await {
            Settlement::Succeeded => {
                self.show(Modal::Stash);
                Settlement::AwaitingUser
            }
            other => other,
        }
    }

    /// Load the stash list.
    pub async fn list_stashes(&self) -> Settlement {
        let Some(_guard) = self.admit(OperationKind::ListStashes) else {
            return Settlement::Duplicate;
        };

        match self.reload_stashes().await {
            Ok(()) => Settlement::Succeeded,
            Err(err) => self.fail("Failed to load stashes", &err),
        }
    }

    /// Drop one stash, or all of them.
    pub async fn drop_stash(&self, stash_ref: &str, all: bool) -> Settlement {
        let Some(_guard) = self.admit(OperationKind::DropStash) else {
            return Settlement::Duplicate;
        };

        if let Err(err) = self.gateway.drop_stash(stash_ref, all).await {
            return self.fail("Failed to drop stash", &err.into());
        }

        self.notify(Notification::success(if all {
            "Dropped all stashes.".to_string()
        } else {
            format!("Dropped {stash_ref}.")
        }));
        match self.reload_stashes().await {
            Ok(()) => Settlement::Succeeded,
            Err(err) => self.fail("Failed to load stashes", &err),
        }
    }

    /// Apply (or pop) a stash, then refresh status and the stash list.
    pub async fn apply_stash(&self, stash_ref: &str, pop: bool, apply_index: bool) -> Settlement {
        let Some(_guard) = self.admit(OperationKind::ApplyStash) else {
            return Settlement::Duplicate;
        };

        let request = ApplyStashRequest {
            stash_ref: stash_ref.to_string(),
            pop,
            apply_index,
        };
        if let Err(err) = self.gateway.apply_stash(request).await {
            return self.fail("Failed to apply stash", &err.into());
        }

        self.notify(Notification::success(format!("Applied {stash_ref}.")));
        self.dismiss();
        if let Err(err) = self.refresh_status(None).await {
            return self.fail("Failed to load status", &err);
        }
        match self.reload_stashes().await {
            Ok(()) => Settlement::Succeeded,
            Err(err) => self.fail("Failed to load stashes", &err),
        }
    }

    /// Create `branch` from a stash and check it out.
    pub async fn checkout_stash(&self, stash_ref: &str, branch: &str) -> Settlement {
        let Some(_guard) = self.admit(OperationKind::CheckoutStash) else {
            return Settlement::Duplicate;
        };

        let request = CheckoutStashRequest {
            stash_ref: stash_ref.to_string(),
            branch: branch.to_string(),
        };
        if let Err(err) = self.gateway.checkout_stash(request).await {
            return self.fail("Failed to check out stash", &err.into());
        }

        self.notify(Notification::success(format!("Checked out {stash_ref} as {branch}.")));
        self.dismiss();
        match self.refresh_status(None).await {
            Ok(()) => Settlement::Succeeded,
            Err(err) => self.fail("Failed to load status", &err),
        }
    }

    async fn reload_stashes(&self) -> Result<()> {
        let list = self.gateway.list_stashes().await?;
        self.update(|state| state.stashes = list.stashes);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use gitdeck_remote::{CheckoutResponse, StashEntry, StashList};

    use super::super::tests::{status_of, workflow};
    use super::*;
    use crate::test_mocks::MockGateway;

    fn stash(index: u32, message: &str) -> StashEntry {
        StashEntry {
            stash_ref: format!("stash@{{{index}}}"),
            message: message.to_string(),
            index,
        }
    }

    #[tokio::test]
    async fn test_create_stash_retries_blocked_checkout() {
        let gateway = MockGateway::new()
            .with_checkout(CheckoutResponse {
                status: "CONFLICTS".into(),
                conflict_list: vec!["a.txt".into()],
                undeleted_list: vec![],
            })
            .with_status(status_of(&[("a.txt", "MODIFIED")]));
        let wf = workflow(gateway);

        assert_eq!(wf.checkout("feature", None).await, Settlement::AwaitingUser);
        assert_eq!(wf.create_stash("wip").await, Settlement::Succeeded);

        assert_eq!(
            wf.gateway().calls(),
            vec!["checkout feature", "status", "create_stash wip", "checkout feature"]
        );
        let state = wf.state();
        assert_eq!(state.branches.failed(), None);
        assert!(state.modals().is_empty());
        assert!(!state.is_busy());
    }

    #[tokio::test]
    async fn test_create_stash_without_blocked_checkout() {
        let wf = workflow(MockGateway::new());

        assert_eq!(wf.create_stash("wip").await, Settlement::Succeeded);
        assert_eq!(wf.gateway().count("checkout"), 0);
    }

    #[tokio::test]
    async fn test_create_stash_failure_dismisses() {
        let wf = workflow(MockGateway::new().with_failure("create_stash", "no local changes"));
        wf.show(Modal::Stash);

        assert_eq!(wf.create_stash("wip").await, Settlement::Failed);
        assert_eq!(wf.surface().errors(), vec!["no local changes".to_string()]);
        assert!(wf.state().modals().is_empty());
    }

    #[tokio::test]
    async fn test_show_stash_loads_branch_first() {
        let wf = workflow(MockGateway::new().with_current_branch("main"));

        assert_eq!(wf.show_stash().await, Settlement::AwaitingUser);
        assert_eq!(wf.state().current_branch.as_deref(), Some("main"));
        assert_eq!(wf.surface().opened(), vec![Modal::Stash]);
    }

    #[tokio::test]
    async fn test_show_stash_stops_when_branch_unknown() {
        let wf = workflow(MockGateway::new());

        assert_eq!(wf.show_stash().await, Settlement::Failed);
        assert!(wf.surface().opened().is_empty());
    }

    #[tokio::test]
    async fn test_drop_stash_reloads_list() {
        let wf = workflow(MockGateway::new().with_stashes(StashList {
            stashes: vec![stash(0, "older")],
        }));

        assert_eq!(wf.drop_stash("stash@{0}", false).await, Settlement::Succeeded);
        assert_eq!(wf.gateway().calls(), vec!["drop_stash stash@{0} false", "list_stashes"]);
        assert_eq!(wf.state().stashes.len(), 1);
    }

    #[tokio::test]
    async fn test_apply_stash_refreshes_status_and_list() {
        let gateway = MockGateway::new()
            .with_status(status_of(&[("restored.txt", "MODIFIED")]))
            .with_stashes(StashList::default());
        let wf = workflow(gateway);
        wf.update(|state| state.stashes = vec![stash(0, "wip")]);

        assert_eq!(wf.apply_stash("stash@{0}", true, false).await, Settlement::Succeeded);
        assert_eq!(
            wf.gateway().calls(),
            vec!["apply_stash stash@{0}", "status", "list_stashes"]
        );
        assert!(wf.state().stashes.is_empty());
        assert_eq!(wf.state().status.snapshot().files().len(), 1);
    }

    #[tokio::test]
    async fn test_checkout_stash_refreshes_status() {
        let wf = workflow(MockGateway::new());

        assert_eq!(wf.checkout_stash("stash@{1}", "rescued").await, Settlement::Succeeded);
        assert_eq!(wf.gateway().calls(), vec!["checkout_stash stash@{1} rescued", "status"]);
    }
}

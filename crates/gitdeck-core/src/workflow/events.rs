//! Live events pushed by the backend.
//!
//! Some outcomes are not applied from the response that caused them: a
//! successful checkout changes the current branch only when the backend
//! announces it here.

use gitdeck_remote::GitGateway;
use tokio::sync::mpsc;

use super::Workflow;
use crate::surface::{InteractionSurface, Notification};

/// An event from the backend's live channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveEvent {
    /// HEAD moved to `branch`.
    CheckedOut { branch: String },
    /// The working tree changed outside this client.
    StatusChanged,
    /// Branches were created or deleted.
    BranchesChanged,
}

impl<G: GitGateway, S: InteractionSurface> Workflow<G, S> {
    /// Apply one live event.
    pub async fn handle_live_event(&self, event: LiveEvent) {
        tracing::debug!(?event, "live event");
        let result = match event {
            LiveEvent::CheckedOut { branch } => {
                self.update(|state| {
                    state.branches.clear_failed_if(&branch);
                    state.current_branch = Some(branch);
                });
                self.refresh_status(None).await
            }
            LiveEvent::StatusChanged => self.refresh_status(None).await,
            LiveEvent::BranchesChanged => self.reload_branches().await,
        };

        if let Err(err) = result {
            tracing::warn!(error = %err, "failed to apply live event");
            self.notify(Notification::error(format!("Failed to sync with the backend: {err}")));
        }
    }

    /// Apply events until the sender side closes.
    pub async fn listen(&self, mut events: mpsc::Receiver<LiveEvent>) {
        while let Some(event) = events.recv().await {
            self.handle_live_event(event).await;
        }
        tracing::debug!("live event channel closed");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use gitdeck_remote::{BranchList, CheckoutResponse};

    use super::super::tests::{status_of, workflow};
    use super::*;
    use crate::status::FileState;
    use crate::test_mocks::MockGateway;

    #[tokio::test]
    async fn test_checked_out_event_updates_branch_and_status() {
        let gateway = MockGateway::new()
            .with_checkout(CheckoutResponse {
                status: "CONFLICTS".into(),
                conflict_list: vec!["a".into()],
                undeleted_list: vec![],
            })
            .with_status(status_of(&[("a", "MODIFIED")]))
            .with_status(status_of(&[]));
        let wf = workflow(gateway);
        wf.checkout("feature", None).await;

        wf.handle_live_event(LiveEvent::CheckedOut {
            branch: "feature".into(),
        })
        .await;

        let state = wf.state();
        assert_eq!(state.current_branch.as_deref(), Some("feature"));
        assert_eq!(state.branches.failed(), None);
        assert!(state.status.snapshot().is_clean());
    }

    #[tokio::test]
    async fn test_listen_drains_channel() {
        let gateway = MockGateway::new()
            .with_status(status_of(&[("x", "UNTRACKED")]))
            .with_branches(BranchList {
                local: vec!["main".into()],
                remote: vec![],
            });
        let wf = workflow(gateway);
        let (tx, rx) = mpsc::channel(4);

        tx.send(LiveEvent::StatusChanged).await.unwrap();
        tx.send(LiveEvent::BranchesChanged).await.unwrap();
        drop(tx);
        wf.listen(rx).await;

        let state = wf.state();
        assert_eq!(
            state.status.snapshot().files()[0].status,
            FileState::Untracked
        );
        assert!(state.branches.local().contains("main"));
    }

    #[tokio::test]
    async fn test_event_failure_is_notified() {
        let wf = workflow(MockGateway::new().with_status_error("gone"));

        wf.handle_live_event(LiveEvent::StatusChanged).await;

        assert_eq!(wf.surface().errors().len(), 1);
    }
}

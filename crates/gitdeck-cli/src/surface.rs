//! Terminal rendition of the interaction surface.
//!
//! Notifications print through [`crate::output`]. Modals have no window to
//! live in, so opening one prints a hint and the command that triggered it
//! reads the active modal from panel state to decide on a follow-up.

use std::time::Duration;

use gitdeck_core::{InteractionSurface, Level, Modal, ModalPatch, Notification, PanelState};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;

use crate::output;

/// Prints notifications and modal hints to the terminal.
#[derive(Debug, Default)]
pub struct ConsoleSurface;

impl InteractionSurface for ConsoleSurface {
    fn open_modal(&self, modal: &Modal) {
        tracing::debug!(modal = modal.name(), "open modal");
        match modal {
            Modal::CheckoutStash { title } => output::detail(&format!("  {title}")),
            Modal::ResolveConflicts { title, .. } => {
                if let Some(title) = title {
                    output::detail(&format!("  {title}"));
                }
            }
            _ => {}
        }
    }

    fn dismiss_modal(&self) {
        tracing::debug!("dismiss modal");
    }

    fn update_modal(&self, patch: ModalPatch) {
        tracing::debug!(?patch, "update modal");
    }

    fn notify(&self, notification: &Notification) {
        match notification.level {
            Level::Success => output::success(&notification.message),
            Level::Info => output::info(&notification.message),
            Level::Warning => output::warn(&notification.message),
            Level::Error => output::error(&notification.message),
        }
    }
}

/// Spinner on stderr that follows the panel's busy flag.
pub struct Spinner {
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl Spinner {
    /// Start following `state`.
    pub fn spawn(mut state: watch::Receiver<PanelState>) -> Self {
        let (stop, mut stopped) = oneshot::channel();
        let task = tokio::spawn(async move {
            let mut spinner: Option<ProgressBar> = None;
            loop {
                let busy = state.borrow_and_update().is_busy();
                match (busy, spinner.as_ref()) {
                    (true, None) => spinner = Some(new_spinner()),
                    (false, Some(bar)) => {
                        bar.finish_and_clear();
                        spinner = None;
                    }
                    _ => {}
                }
                tokio::select! {
                    changed = state.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                    _ = &mut stopped => break,
                }
            }
            if let Some(bar) = spinner {
                bar.finish_and_clear();
            }
        });
        Self { stop, task }
    }

    /// Stop following and wait until the spinner line is cleared.
    pub async fn finish(self) {
        // The task may already have exited with the panel state.
        let _ = self.stop.send(());
        if let Err(err) = self.task.await {
            tracing::debug!(error = %err, "spinner task failed");
        }
    }
}

fn new_spinner() -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::default_spinner());
    bar.set_message("Waiting for the backend...");
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

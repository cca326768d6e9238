//! Conflict resolution, diffs, file content and history.
//!
//! Content queries (`conflicts`, `file_diff`, `read_file`, `read_file_at`)
//! hold no panel state, so they are not serialized per kind. They still
//! mark the panel busy and report transport failures.

use gitdeck_remote::{ConflictContent, GitGateway, ResolveConflictRequest};

use super::{OperationKind, Settlement, Workflow};
use crate::error::{Error, Result};
use crate::outcome;
use crate::panel::{ChangedFile, CommitDiffView};
use crate::surface::{InteractionSurface, Modal, ModalPatch, Notification};

impl<G: GitGateway, S: InteractionSurface> Workflow<G, S> {
    /// Load the base, local and remote sides of a conflicted file.
    pub async fn conflicts(&self, path: &str) -> Option<ConflictContent> {
        let _busy = self.busy();
        match self.gateway.conflicts(path).await {
            Ok(content) => Some(content),
            Err(err) => {
                self.fail("Failed to load conflict", &err.into());
                None
            }
        }
    }

    /// Write the resolved content of a conflicted file.
    ///
    /// Closes the merge editor and marks the conflict list beneath it
    /// invalid so it reloads.
    pub async fn resolve_conflict(&self, path: &str, content: &str) -> Settlement {
        let Some(_guard) = self.admit(OperationKind::ResolveConflict) else {
            return Settlement::Duplicate;
        };

        let request = ResolveConflictRequest {
            path: path.to_string(),
            content: content.to_string(),
        };
        if let Err(err) = self.gateway.resolve_conflict(request).await {
            return self.fail("Failed to resolve conflict", &err.into());
        }

        self.notify(Notification::success(format!("Resolved {path}.")));
        self.dismiss();
        self.update_modal(ModalPatch::invalid(true));
        Settlement::Succeeded
    }

    /// Discard a pending resolution and close the merge editor.
    pub async fn cancel_conflict(&self, path: &str) -> Settlement {
        let Some(_guard) = self.admit(OperationKind::CancelConflict) else {
            return Settlement::Duplicate;
        };

        match self.gateway.cancel_conflict(path).await {
            Ok(()) => {
                self.dismiss();
                Settlement::Succeeded
            }
            Err(err) => self.fail("Failed to cancel conflict", &err.into()),
        }
    }

    /// Open the merge editor for `path` above the active modal.
    pub fn merge_file(&self, path: &str) {
        self.layer(Modal::MergeFile {
            path: path.to_string(),
        });
    }

    /// Open the diff view for `path` above the active modal.
    pub fn diff_file(&self, path: &str, new_ref: &str, old_ref: Option<&str>) {
        self.layer(Modal::DiffFile {
            path: path.to_string(),
            new_ref: new_ref.to_string(),
            old_ref: old_ref.map(ToString::to_string),
        });
    }

    /// Load the diff of `path` between two refs.
    pub async fn file_diff(&self, path: &str, new_ref: &str, old_ref: Option<&str>) -> Option<String> {
        let _busy = self.busy();
        match self.gateway.file_diff(path, new_ref, old_ref).await {
            Ok(diff) => Some(diff.diff),
            Err(err) => {
                self.fail("Failed to load diff", &err.into());
                None
            }
        }
    }

    /// Read a file from the working tree.
    pub async fn read_file(&self, path: &str) -> Option<String> {
        let _busy = self.busy();
        match self.gateway.read_file(path).await {
            Ok(file) => Some(file.content),
            Err(err) => {
                self.fail("Failed to read file", &err.into());
                None
            }
        }
    }

    /// Read a file as of `git_ref`.
    pub async fn read_file_at(&self, git_ref: &str, path: &str) -> Option<String> {
        let _busy = self.busy();
        match self.gateway.read_file_at(git_ref, path).await {
            Ok(file) => Some(file.content),
            Err(err) => {
                self.fail("Failed to read file", &err.into());
                None
            }
        }
    }

    /// Load the files changed by `rev` and open the commit diff view.
    pub async fn commit_diff(&self, rev: &str, title: &str, old_ref: Option<&str>) -> Settlement {
        let Some(_guard) = self.admit(OperationKind::CommitDiff) else {
            return Settlement::Duplicate;
        };

        let entries = match self.gateway.commit_diff(rev).await {
            Ok(entries) => entries,
            Err(err) => return self.fail("Failed to load commit diff", &err.into()),
        };

        let files = entries
            .into_iter()
            .map(|entry| {
                Ok(ChangedFile {
                    change: outcome::change_type(&entry.change_type)?,
                    old_path: entry.old_path.unwrap_or_else(|| entry.new_path.clone()),
                    path: entry.new_path,
                })
            })
            .collect::<Result<Vec<_>>>();
        let files = match files {
            Ok(files) => files,
            Err(err) => return self.fail("Failed to load commit diff", &err),
        };

        let view = CommitDiffView {
            rev: rev.to_string(),
            title: title.to_string(),
            old_ref: old_ref.map(ToString::to_string),
            files,
        };
        self.update(|state| state.commit_diff = Some(view));
        self.layer(Modal::CommitDiff);
        Settlement::Succeeded
    }

    /// Load one page of history, optionally for a single path.
    ///
    /// `reset` replaces the loaded history; otherwise the page is appended.
    pub async fn history(&self, path: Option<&str>, page: u32, reset: bool) -> Settlement {
        let Some(_guard) = self.admit(OperationKind::History) else {
            return Settlement::Duplicate;
        };

        let size = self.settings.history_page_size;
        match self.gateway.history(path, page, size).await {
            Ok(commits) => {
                tracing::debug!(page, commits = commits.len(), "history loaded");
                self.update(|state| state.update_history(commits, reset));
                Settlement::Succeeded
            }
            Err(err) => self.fail("Failed to load history", &Error::from(err)),
        }
    }
}

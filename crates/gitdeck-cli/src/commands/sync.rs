//! `gitdeck commit`, `fetch`, `pull` and `push` commands.

use anyhow::{Result, bail};

use super::GlobalArgs;
use super::utils;

/// Run the commit command.
///
/// Stages `paths`, or every changed file when empty, then commits.
pub fn run_commit(global: &GlobalArgs, message: Option<String>, paths: Vec<String>) -> Result<()> {
    utils::run(global, |wf| async move {
        utils::settled(wf.refresh(None).await)?;
        if wf.state().status.snapshot().is_clean() {
            bail!("Nothing to commit - working tree clean");
        }

        if paths.is_empty() {
            wf.stage_all();
        } else {
            for path in &paths {
                if !wf.stage(path) {
                    bail!("'{path}' has no changes");
                }
            }
        }
        if let Some(message) = message {
            wf.set_commit_message(message);
        }

        utils::settled(wf.commit().await)?;
        Ok(())
    })
}

/// Run the fetch command.
pub fn run_fetch(global: &GlobalArgs) -> Result<()> {
    utils::run(global, |wf| async move {
        utils::settled(wf.fetch().await)?;
        Ok(())
    })
}

/// Run the pull command.
pub fn run_pull(global: &GlobalArgs) -> Result<()> {
    utils::run(global, |wf| async move {
        utils::settled(wf.pull().await)?;
        Ok(())
    })
}

/// Run the push command.
pub fn run_push(global: &GlobalArgs) -> Result<()> {
    utils::run(global, |wf| async move {
        utils::settled(wf.push().await)?;
        Ok(())
    })
}

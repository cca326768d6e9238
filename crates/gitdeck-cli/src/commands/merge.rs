//! `gitdeck merge` command - Merge a branch into the current branch.

use anyhow::Result;
use gitdeck_core::Settlement;

use super::{GlobalArgs, conflict, utils};

/// Run the merge command.
pub fn run(global: &GlobalArgs, branch: &str) -> Result<()> {
    utils::run(global, |wf| async move {
        if utils::settled(wf.merge(branch).await)? == Settlement::AwaitingUser {
            conflict::print_resolution_hint(&wf);
        }
        Ok(())
    })
}

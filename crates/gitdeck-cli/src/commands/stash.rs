//! `gitdeck stash` subcommands.

use anyhow::Result;
use colored::Colorize;

use super::utils;
use super::{GlobalArgs, StashCommand};
use crate::output;

/// Run a stash subcommand.
pub fn run(global: &GlobalArgs, command: StashCommand) -> Result<()> {
    utils::run(global, |wf| async move {
        match command {
            StashCommand::Create { message } => {
                utils::settled(wf.create_stash(&message).await)?;
            }
            StashCommand::List => {
                utils::settled(wf.list_stashes().await)?;
                let state = wf.state();
                if state.stashes.is_empty() {
                    output::info("No stashes");
                }
                for stash in &state.stashes {
                    output::essential(&format!("{} {}", stash.stash_ref.yellow(), stash.message));
                }
            }
            StashCommand::Drop { stash_ref, all } => {
                let stash_ref = stash_ref.unwrap_or_default();
                utils::settled(wf.drop_stash(&stash_ref, all).await)?;
            }
            StashCommand::Apply {
                stash_ref,
                pop,
                index,
            } => {
                utils::settled(wf.apply_stash(&stash_ref, pop, index).await)?;
            }
            StashCommand::Checkout { stash_ref, branch } => {
                utils::settled(wf.checkout_stash(&stash_ref, &branch).await)?;
            }
        }
        Ok(())
    })
}

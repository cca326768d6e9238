//! `gitdeck checkout`, `branches`, `branch`, `tags`, `tag` and `reset` commands.

use anyhow::{Context, Result};
use gitdeck_core::{Modal, Settlement};
use gitdeck_remote::ResetMode;
use inquire::Confirm;
use serde::Serialize;

use super::utils::{self, CliWorkflow};
use super::{BranchCommand, GlobalArgs, conflict};
use crate::output;

/// JSON output for the branches command.
#[derive(Debug, Serialize)]
struct BranchesOutput<'a> {
    current: Option<&'a str>,
    local: Vec<&'a str>,
    remote: Vec<&'a str>,
}

/// Run the checkout command.
pub fn run_checkout(global: &GlobalArgs, branch: &str, track: Option<&str>) -> Result<()> {
    let prompt = utils::can_prompt(global);
    utils::run(global, |wf| async move {
        let settlement = utils::settled(wf.checkout(branch, track).await)?;
        if settlement == Settlement::AwaitingUser {
            follow_up_checkout(&wf, branch, prompt).await?;
        }
        Ok(())
    })
}

/// Offer to stash when local changes block the checkout.
async fn follow_up_checkout(wf: &CliWorkflow, branch: &str, prompt: bool) -> Result<()> {
    let modal = wf.state().active_modal().map(|open| open.modal.clone());
    match modal {
        Some(Modal::CheckoutStash { .. }) => {
            conflict::print_conflicted(wf);
            if !prompt {
                output::detail(&format!(
                    "Run `gitdeck stash create`, then `gitdeck checkout {branch}` again."
                ));
                return Ok(());
            }

            let stash = Confirm::new("Stash local changes and retry the checkout?")
                .with_default(true)
                .prompt()
                .context("Confirmation cancelled")?;
            if stash {
                let message = format!("Stashed before checking out {branch}");
                utils::settled(wf.create_stash(&message).await)?;
            }
        }
        Some(Modal::ResolveConflicts { .. }) => {
            super::status::print_files(wf.state().status.snapshot());
            output::detail("Remove these files by hand, then refresh with `gitdeck status`.");
        }
        _ => {}
    }
    Ok(())
}

/// Run the branches command.
pub fn run_branches(global: &GlobalArgs, json: bool) -> Result<()> {
    utils::run(global, |wf| async move {
        utils::settled(wf.list_branches().await)?;
        wf.current_branch(false).await;

        let state = wf.state();
        let current = state.current_branch.as_deref();
        if json {
            let out = BranchesOutput {
                current,
                local: state.branches.local().iter().map(String::as_str).collect(),
                remote: state.branches.remote().iter().map(String::as_str).collect(),
            };
            output::essential(&serde_json::to_string_pretty(&out)?);
            return Ok(());
        }

        for name in state.branches.local() {
            output::essential(&output::branch_name(name, current == Some(name.as_str())));
        }
        if !state.branches.remote().is_empty() {
            output::hr();
            for name in state.branches.remote() {
                output::essential(&format!("  {name}"));
            }
        }
        Ok(())
    })
}

/// Run a branch subcommand.
pub fn run_branch(global: &GlobalArgs, command: BranchCommand) -> Result<()> {
    utils::run(global, |wf| async move {
        let settlement = match &command {
            BranchCommand::New { name } => wf.new_branch(name).await,
            BranchCommand::Delete { name } => wf.delete_branch(name).await,
        };
        utils::settled(settlement)?;
        Ok(())
    })
}

/// Run the tags command.
pub fn run_tags(global: &GlobalArgs) -> Result<()> {
    utils::run(global, |wf| async move {
        utils::settled(wf.list_tags().await)?;
        for tag in &wf.state().tags {
            output::essential(tag);
        }
        Ok(())
    })
}

/// Run the tag command.
pub fn run_tag(
    global: &GlobalArgs,
    name: &str,
    git_ref: &str,
    message: Option<&str>,
    force: bool,
) -> Result<()> {
    utils::run(global, |wf| async move {
        utils::settled(wf.add_tag(name, git_ref, message, force).await)?;
        Ok(())
    })
}

/// Run the reset command.
pub fn run_reset(global: &GlobalArgs, git_ref: &str, mode: ResetMode) -> Result<()> {
    utils::run(global, |wf| async move {
        utils::settled(wf.reset_head(git_ref, mode).await)?;
        Ok(())
    })
}

//! `gitdeck rebase` and `state` commands.

use anyhow::{Context, Result};
use colored::Colorize;
use gitdeck_core::{Modal, Settlement};
use gitdeck_remote::{RebaseOperation, RebaseTodoLine};
use inquire::{Confirm, Text};

use super::utils::{self, CliWorkflow};
use super::{GlobalArgs, conflict};
use crate::output;

/// What the rebase command was asked to do.
#[derive(Debug, Clone, Copy)]
pub enum RebaseAction<'a> {
    Start {
        upstream: &'a str,
        branch: Option<&'a str>,
        interactive: bool,
        preserve: bool,
    },
    Operate {
        operation: RebaseOperation,
        message: Option<&'a str>,
    },
}

/// Run the rebase command.
pub fn run(global: &GlobalArgs, action: RebaseAction<'_>) -> Result<()> {
    let prompt = utils::can_prompt(global);
    utils::run(global, |wf| async move {
        let mut settlement = match action {
            RebaseAction::Start {
                upstream,
                branch,
                interactive,
                preserve,
            } => wf.rebase(branch, upstream, interactive, preserve).await,
            RebaseAction::Operate { operation, message } => {
                wf.rebase_operate(operation, message).await
            }
        };

        // Each answered prompt can stop the rebase again.
        while utils::settled(settlement)? == Settlement::AwaitingUser {
            match follow_up(&wf, prompt).await? {
                Some(next) => settlement = next,
                None => break,
            }
        }
        Ok(())
    })
}

/// Handle the modal a stopped rebase left open.
///
/// Returns the settlement of the next step, or `None` when the user has to
/// act outside this command.
async fn follow_up(wf: &CliWorkflow, prompt: bool) -> Result<Option<Settlement>> {
    let modal = wf.state().active_modal().map(|open| open.modal.clone());
    match modal {
        Some(Modal::RebaseInput { message }) => {
            if !prompt {
                output::detail("Run `gitdeck rebase --continue -m <message>` to continue.");
                return Ok(None);
            }
            let message = Text::new("Commit message:")
                .with_initial_value(&message)
                .prompt()
                .context("Rebase message cancelled")?;
            Ok(Some(
                wf.rebase_operate(RebaseOperation::Continue, Some(&message))
                    .await,
            ))
        }
        Some(Modal::RebasePrepare { lines }) => {
            print_plan(&lines);
            if !prompt {
                output::detail("Run `gitdeck rebase --abort` to cancel this plan.");
                return Ok(None);
            }
            let start = Confirm::new("Start the rebase with this plan?")
                .with_default(true)
                .prompt()
                .context("Confirmation cancelled")?;
            let next = if start {
                wf.rebase_update(lines).await
            } else {
                wf.rebase_operate(RebaseOperation::Abort, None).await
            };
            Ok(Some(next))
        }
        Some(Modal::ResolveConflicts { .. }) => {
            conflict::print_resolution_hint(wf);
            output::detail("Then run `gitdeck rebase --continue`.");
            Ok(None)
        }
        _ => Ok(None),
    }
}

fn print_plan(lines: &[RebaseTodoLine]) {
    output::hr();
    for line in lines {
        output::essential(&format!(
            "{} {} {}",
            format!("{:<7}", line.action.to_lowercase()).cyan(),
            line.commit.yellow(),
            line.short_message
        ));
    }
    output::hr();
}

/// Run the state command.
pub fn run_state(global: &GlobalArgs) -> Result<()> {
    utils::run(global, |wf| async move {
        utils::settled(wf.rebase_state().await)?;
        if let Some(state) = wf.state().repository_state {
            output::essential(state.as_str());
            if state.is_rebasing() {
                output::detail("A rebase is in progress: `gitdeck rebase --continue|--skip|--abort`.");
            }
        }
        Ok(())
    })
}

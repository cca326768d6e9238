//! `gitdeck status` command - Display the working tree status.

use anyhow::Result;
use colored::Colorize;
use gitdeck_core::{FileState, WorkingTreeStatus};

use super::GlobalArgs;
use super::utils::{self, CliWorkflow};
use crate::output;

/// Run the status command.
pub fn run(global: &GlobalArgs, filter: Option<FileState>, json: bool) -> Result<()> {
    utils::run(global, |wf| async move {
        utils::settled(wf.refresh(filter).await)?;
        // Best effort: the header still prints without a branch name.
        wf.current_branch(false).await;
        print(&wf, json)
    })
}

fn print(wf: &CliWorkflow, json: bool) -> Result<()> {
    let state = wf.state();
    let snapshot = state.status.snapshot();

    if json {
        output::essential(&serde_json::to_string_pretty(snapshot)?);
        return Ok(());
    }

    if let Some(branch) = &state.current_branch {
        output::detail(&format!("On branch {}", branch.cyan().bold()));
    }
    print_files(snapshot);
    Ok(())
}

/// Print one line per file, conflicts first.
pub fn print_files(snapshot: &WorkingTreeStatus) {
    if snapshot.is_clean() {
        output::info("Working tree clean");
        return;
    }

    output::hr();
    let conflicts = snapshot.with_state(FileState::Confliction);
    let rest = snapshot
        .files()
        .iter()
        .filter(|file| file.status != FileState::Confliction);
    for file in conflicts.chain(rest) {
        output::essential(&format!("  {} {}", output::state_marker(file.status), file.path));
    }
}

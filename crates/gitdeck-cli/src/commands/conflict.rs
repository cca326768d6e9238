//! `gitdeck conflicts` and `resolve` commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use colored::Colorize;
use gitdeck_core::FileState;

use super::GlobalArgs;
use super::utils::{self, CliWorkflow};
use crate::output;

/// Which content resolves a conflict.
#[derive(Debug, Clone, Copy)]
pub enum Resolution<'a> {
    File(&'a Path),
    Ours,
    Theirs,
    Cancel,
}

/// Print the conflicted files of the current snapshot.
pub fn print_conflicted(wf: &CliWorkflow) {
    let state = wf.state();
    for file in state.status.snapshot().with_state(FileState::Confliction) {
        output::essential(&format!("  {} {}", output::state_marker(file.status), file.path));
    }
}

/// Print conflicted files with a hint on resolving them.
pub fn print_resolution_hint(wf: &CliWorkflow) {
    print_conflicted(wf);
    output::detail("Resolve each file with `gitdeck resolve <path> --from <file>`.");
}

/// Run the conflicts command.
pub fn run_conflicts(global: &GlobalArgs, path: Option<&str>) -> Result<()> {
    utils::run(global, |wf| async move {
        let Some(path) = path else {
            utils::settled(wf.refresh(Some(FileState::Confliction)).await)?;
            if wf.state().status.snapshot().is_clean() {
                output::info("No conflicts");
            } else {
                print_conflicted(&wf);
            }
            return Ok(());
        };

        let Some(content) = wf.conflicts(path).await else {
            bail!("");
        };
        for (label, side) in [
            ("base", &content.base),
            ("local", &content.local),
            ("remote", &content.remote),
        ] {
            output::detail(&format!("=== {label} ===").bold().to_string());
            output::essential(side);
        }
        Ok(())
    })
}

/// Run the resolve command.
pub fn run_resolve(global: &GlobalArgs, path: &str, resolution: Resolution<'_>) -> Result<()> {
    let content = match resolution {
        Resolution::File(file) => Some(
            fs::read_to_string(file)
                .with_context(|| format!("Failed to read {}", file.display()))?,
        ),
        Resolution::Ours | Resolution::Theirs | Resolution::Cancel => None,
    };

    utils::run(global, |wf| async move {
        if matches!(resolution, Resolution::Cancel) {
            utils::settled(wf.cancel_conflict(path).await)?;
            return Ok(());
        }

        wf.merge_file(path);
        let content = match (content, resolution) {
            (Some(content), _) => content,
            (None, side) => {
                let Some(sides) = wf.conflicts(path).await else {
                    bail!("");
                };
                if matches!(side, Resolution::Ours) {
                    sides.local
                } else {
                    sides.remote
                }
            }
        };
        utils::settled(wf.resolve_conflict(path, &content).await)?;
        Ok(())
    })
}

//! `gitdeck diff`, `show`, `log` and `cat` commands.

use anyhow::{Result, bail};
use chrono::Local;
use colored::Colorize;

use super::{GlobalArgs, utils};
use crate::output;

/// Run the diff command.
pub fn run_diff(global: &GlobalArgs, path: &str, new_ref: &str, old_ref: Option<&str>) -> Result<()> {
    utils::run(global, |wf| async move {
        let Some(diff) = wf.file_diff(path, new_ref, old_ref).await else {
            bail!("");
        };
        if diff.is_empty() {
            output::info(&format!("No differences in {path}"));
        } else {
            output::essential(diff.trim_end());
        }
        Ok(())
    })
}

/// Run the show command.
pub fn run_show(global: &GlobalArgs, rev: &str, old_ref: Option<&str>) -> Result<()> {
    utils::run(global, |wf| async move {
        utils::settled(wf.commit_diff(rev, rev, old_ref).await)?;

        let state = wf.state();
        let Some(view) = &state.commit_diff else {
            return Ok(());
        };
        output::detail(&format!("commit {}", view.rev.yellow()));
        for file in &view.files {
            let marker = output::change_marker(file.change);
            if file.old_path == file.path {
                output::essential(&format!("  {marker} {}", file.path));
            } else {
                output::essential(&format!("  {marker} {} -> {}", file.old_path, file.path));
            }
        }
        Ok(())
    })
}

/// Run the log command.
pub fn run_log(global: &GlobalArgs, path: Option<&str>, page: u32, json: bool) -> Result<()> {
    utils::run(global, |wf| async move {
        utils::settled(wf.history(path, page, true).await)?;

        let state = wf.state();
        if json {
            output::essential(&serde_json::to_string_pretty(&state.history)?);
            return Ok(());
        }
        if state.history.is_empty() {
            output::info("No commits");
            return Ok(());
        }
        for commit in &state.history {
            let short: String = commit.name.chars().take(7).collect();
            let when = commit.commit_time.with_timezone(&Local).format("%Y-%m-%d %H:%M");
            output::essential(&format!(
                "{} {} {} {}",
                short.yellow(),
                when.to_string().dimmed(),
                commit.short_message,
                format!("<{}>", commit.author.name).blue()
            ));
        }
        Ok(())
    })
}

/// Run the cat command.
pub fn run_cat(global: &GlobalArgs, path: &str, git_ref: Option<&str>) -> Result<()> {
    utils::run(global, |wf| async move {
        let content = match git_ref {
            Some(git_ref) => wf.read_file_at(git_ref, path).await,
            None => wf.read_file(path).await,
        };
        let Some(content) = content else {
            bail!("");
        };
        print!("{content}");
        Ok(())
    })
}

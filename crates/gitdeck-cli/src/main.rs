//! gitdeck CLI - Git for your workspace, from the terminal.

use clap::Parser;
use gitdeck_remote::RebaseOperation;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;
mod surface;

use commands::conflict::Resolution;
use commands::rebase::RebaseAction;
use commands::{Cli, Commands};

/// Log filter variable; logs go to stderr at `warn` by default.
const LOG_ENV: &str = "GITDECK_LOG";

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    output::set_quiet(cli.global.quiet);
    let global = &cli.global;

    let result = match cli.command {
        Commands::Status { filter, json } => commands::status::run(global, filter, json),
        Commands::Commit { message, paths } => commands::sync::run_commit(global, message, paths),
        Commands::Fetch => commands::sync::run_fetch(global),
        Commands::Pull => commands::sync::run_pull(global),
        Commands::Push => commands::sync::run_push(global),
        Commands::Checkout { branch, track } => {
            commands::branch::run_checkout(global, &branch, track.as_deref())
        }
        Commands::Branches { json } => commands::branch::run_branches(global, json),
        Commands::Branch(command) => commands::branch::run_branch(global, command),
        Commands::Tags => commands::branch::run_tags(global),
        Commands::Tag {
            name,
            git_ref,
            message,
            force,
        } => commands::branch::run_tag(global, &name, &git_ref, message.as_deref(), force),
        Commands::Reset { git_ref, mode } => {
            commands::branch::run_reset(global, &git_ref, mode.into())
        }
        Commands::Stash(command) => commands::stash::run(global, command),
        Commands::Merge { branch } => commands::merge::run(global, &branch),
        Commands::Rebase {
            upstream,
            branch,
            interactive,
            preserve_merges,
            continue_,
            skip,
            abort,
            message,
        } => {
            let action = if continue_ {
                RebaseAction::Operate {
                    operation: RebaseOperation::Continue,
                    message: message.as_deref(),
                }
            } else if skip {
                RebaseAction::Operate {
                    operation: RebaseOperation::Skip,
                    message: None,
                }
            } else if abort {
                RebaseAction::Operate {
                    operation: RebaseOperation::Abort,
                    message: None,
                }
            } else {
                RebaseAction::Start {
                    upstream: upstream.as_deref().unwrap_or_default(),
                    branch: branch.as_deref(),
                    interactive,
                    preserve: preserve_merges,
                }
            };
            commands::rebase::run(global, action)
        }
        Commands::State => commands::rebase::run_state(global),
        Commands::Conflicts { path } => commands::conflict::run_conflicts(global, path.as_deref()),
        Commands::Resolve {
            path,
            from,
            ours,
            theirs,
            cancel,
        } => {
            let resolution = match (from.as_deref(), ours, theirs, cancel) {
                (Some(file), ..) => Resolution::File(file),
                (None, true, ..) => Resolution::Ours,
                (None, _, true, _) => Resolution::Theirs,
                (None, _, _, true) => Resolution::Cancel,
                (None, false, false, false) => {
                    output::error("Pass --from <file>, --ours, --theirs or --cancel");
                    std::process::exit(2);
                }
            };
            commands::conflict::run_resolve(global, &path, resolution)
        }
        Commands::Diff {
            path,
            new_ref,
            old_ref,
        } => commands::inspect::run_diff(global, &path, &new_ref, old_ref.as_deref()),
        Commands::Show { rev, old_ref } => {
            commands::inspect::run_show(global, &rev, old_ref.as_deref())
        }
        Commands::Log { path, page, json } => {
            commands::inspect::run_log(global, path.as_deref(), page, json)
        }
        Commands::Cat { path, git_ref } => {
            commands::inspect::run_cat(global, &path, git_ref.as_deref())
        }
        Commands::Completions { shell } => commands::completions::run(shell),
    };

    if let Err(e) = result {
        let message = e.to_string();
        // Failures reported by the workflow carry no message of their own.
        if !message.is_empty() {
            output::error(&message);
        }
        std::process::exit(1);
    }
}

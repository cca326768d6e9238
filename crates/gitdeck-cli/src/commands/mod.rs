//! CLI command definitions and handlers.

pub mod branch;
pub mod completions;
pub mod conflict;
pub mod inspect;
pub mod merge;
pub mod rebase;
pub mod stash;
pub mod status;
pub mod sync;
pub mod utils;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use gitdeck_core::FileState;
use gitdeck_remote::ResetMode;

/// gitdeck - Git for your workspace, from the terminal.
///
/// Drives the Git service of a remote workspace: status, commits,
/// branches, stashes, merges and rebases, with prompts for the
/// follow-ups that need a decision.
#[derive(Parser)]
#[command(name = "gitdeck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Backend base URL (overrides the config file).
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Workspace key on the backend (overrides the config file).
    #[arg(long, short = 'w', global = true)]
    pub workspace: Option<String>,

    /// Environment variable holding the bearer token.
    #[arg(long, global = true)]
    pub token_env: Option<String>,

    /// Path to the config file [default: ./.gitdeck.toml].
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Only print errors and essential output.
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Never prompt; print the follow-up command instead.
    #[arg(long, global = true)]
    pub no_input: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the working tree status.
    #[command(alias = "st")]
    Status {
        /// Only show files in this state (e.g. `confliction`, `modified`).
        #[arg(long)]
        filter: Option<FileState>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Commit changes.
    ///
    /// Commits the given paths, or every changed file when none are given.
    Commit {
        /// Commit message [default: from config].
        #[arg(long, short)]
        message: Option<String>,

        /// Paths to commit.
        paths: Vec<String>,
    },

    /// Fetch from the remote.
    Fetch,

    /// Pull the current branch.
    Pull,

    /// Push all branches.
    Push,

    /// Switch branches.
    #[command(alias = "co")]
    Checkout {
        /// Branch to check out.
        branch: String,

        /// Remote branch to track when creating `branch`.
        #[arg(long)]
        track: Option<String>,
    },

    /// List branches.
    Branches {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Create or delete a branch.
    #[command(subcommand)]
    Branch(BranchCommand),

    /// List tags.
    Tags,

    /// Create a tag.
    Tag {
        /// Tag name.
        name: String,

        /// Commit to tag.
        #[arg(long = "ref", default_value = "HEAD")]
        git_ref: String,

        /// Annotate the tag with a message.
        #[arg(long, short)]
        message: Option<String>,

        /// Replace an existing tag.
        #[arg(long, short)]
        force: bool,
    },

    /// Reset HEAD to a commit.
    Reset {
        /// Commit to reset to.
        #[arg(default_value = "HEAD")]
        git_ref: String,

        /// How much to reset.
        #[arg(long, value_enum, default_value_t = ResetArg::Mixed)]
        mode: ResetArg,
    },

    /// Manage stashes.
    #[command(subcommand)]
    Stash(StashCommand),

    /// Merge a branch into the current branch.
    Merge {
        /// Branch to merge.
        branch: String,
    },

    /// Rebase the current branch, or drive a rebase in progress.
    Rebase {
        /// Upstream to rebase onto.
        #[arg(required_unless_present_any = ["continue_", "skip", "abort"])]
        upstream: Option<String>,

        /// Branch to rebase [default: current branch].
        #[arg(long)]
        branch: Option<String>,

        /// Edit the plan before starting.
        #[arg(long, short)]
        interactive: bool,

        /// Preserve merge commits.
        #[arg(long)]
        preserve_merges: bool,

        /// Continue after resolving conflicts.
        #[arg(long = "continue", conflicts_with_all = ["skip", "abort"])]
        continue_: bool,

        /// Skip the current commit.
        #[arg(long, conflicts_with = "abort")]
        skip: bool,

        /// Abort and restore the original branch.
        #[arg(long)]
        abort: bool,

        /// Commit message to use when continuing.
        #[arg(long, short, requires = "continue_")]
        message: Option<String>,
    },

    /// Show the repository state (merging, rebasing, ...).
    State,

    /// List conflicted files, or show the sides of one.
    Conflicts {
        /// Conflicted file to show.
        path: Option<String>,
    },

    /// Resolve a conflicted file.
    Resolve {
        /// Conflicted file.
        path: String,

        /// File holding the resolved content.
        #[arg(long, conflicts_with_all = ["ours", "theirs", "cancel"])]
        from: Option<PathBuf>,

        /// Take the local side.
        #[arg(long, conflicts_with_all = ["theirs", "cancel"])]
        ours: bool,

        /// Take the remote side.
        #[arg(long, conflicts_with = "cancel")]
        theirs: bool,

        /// Discard the pending resolution.
        #[arg(long)]
        cancel: bool,
    },

    /// Show the diff of a file between two refs.
    Diff {
        /// File to diff.
        path: String,

        /// Newer side.
        #[arg(long = "new", default_value = "HEAD")]
        new_ref: String,

        /// Older side [default: the parent of `--new`].
        #[arg(long = "old")]
        old_ref: Option<String>,
    },

    /// Show the files changed by a commit.
    Show {
        /// Commit to show.
        rev: String,

        /// Compare against this ref instead of the parent.
        #[arg(long = "old")]
        old_ref: Option<String>,
    },

    /// Show commit history.
    Log {
        /// Only commits touching this path.
        path: Option<String>,

        /// Page to show, starting at 0.
        #[arg(long, default_value_t = 0)]
        page: u32,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print a file from the working tree or a ref.
    Cat {
        /// File to print.
        path: String,

        /// Read the file as of this ref.
        #[arg(long = "at")]
        git_ref: Option<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum BranchCommand {
    /// Create a branch at HEAD.
    New {
        /// Branch name.
        name: String,
    },

    /// Delete a branch.
    Delete {
        /// Branch name.
        name: String,
    },
}

#[derive(Subcommand)]
pub enum StashCommand {
    /// Stash local changes.
    Create {
        /// Stash message.
        #[arg(long, short, default_value = "")]
        message: String,
    },

    /// List stashes.
    List,

    /// Drop a stash.
    Drop {
        /// Stash ref (e.g. `stash@{0}`).
        #[arg(required_unless_present = "all")]
        stash_ref: Option<String>,

        /// Drop every stash.
        #[arg(long)]
        all: bool,
    },

    /// Apply a stash to the working tree.
    Apply {
        /// Stash ref (e.g. `stash@{0}`).
        stash_ref: String,

        /// Drop the stash after applying it.
        #[arg(long)]
        pop: bool,

        /// Also restore the index.
        #[arg(long)]
        index: bool,
    },

    /// Create a branch from a stash.
    Checkout {
        /// Stash ref (e.g. `stash@{0}`).
        stash_ref: String,

        /// Branch to create.
        branch: String,
    },
}

/// Reset mode as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResetArg {
    Soft,
    Mixed,
    Hard,
}

impl From<ResetArg> for ResetMode {
    fn from(arg: ResetArg) -> Self {
        match arg {
            ResetArg::Soft => Self::Soft,
            ResetArg::Mixed => Self::Mixed,
            ResetArg::Hard => Self::Hard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_status_filter_parses_file_state() {
        let cli = Cli::try_parse_from(["gitdeck", "status", "--filter", "confliction"]);
        let Ok(Cli {
            command: Commands::Status { filter, .. },
            ..
        }) = cli
        else {
            panic!("status should parse");
        };
        assert_eq!(filter, Some(FileState::Confliction));
    }

    #[test]
    fn test_rebase_requires_upstream_unless_operating() {
        assert!(Cli::try_parse_from(["gitdeck", "rebase"]).is_err());
        assert!(Cli::try_parse_from(["gitdeck", "rebase", "--continue"]).is_ok());
        assert!(Cli::try_parse_from(["gitdeck", "rebase", "main", "-i"]).is_ok());
        assert!(Cli::try_parse_from(["gitdeck", "rebase", "--skip", "--abort"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["gitdeck", "push", "--workspace", "ws1", "-q"]);
        let Ok(cli) = cli else {
            panic!("push should parse");
        };
        assert_eq!(cli.global.workspace.as_deref(), Some("ws1"));
        assert!(cli.global.quiet);
    }

    #[test]
    fn test_reset_mode_maps() {
        assert_eq!(ResetMode::from(ResetArg::Hard), ResetMode::Hard);
        assert_eq!(ResetMode::from(ResetArg::Soft), ResetMode::Soft);
    }
}

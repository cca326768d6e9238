//! Terminal output formatting utilities.

use std::sync::atomic::{AtomicBool, Ordering};

use colored::Colorize;
use gitdeck_core::FileState;
use gitdeck_core::outcome::ChangeType;

static QUIET_MODE: AtomicBool = AtomicBool::new(false);

/// Set quiet mode globally. Call once at startup.
pub fn set_quiet(quiet: bool) {
    QUIET_MODE.store(quiet, Ordering::Relaxed);
}

pub fn is_quiet() -> bool {
    QUIET_MODE.load(Ordering::Relaxed)
}

/// Print a success message (suppressed in quiet mode).
pub fn success(msg: &str) {
    if !is_quiet() {
        println!("{} {}", "✓".green(), msg);
    }
}

/// Print an error message (always prints to stderr).
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a warning message (always prints to stderr).
pub fn warn(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

/// Print an info message (suppressed in quiet mode).
pub fn info(msg: &str) {
    if !is_quiet() {
        println!("{} {}", "→".blue(), msg);
    }
}

/// Print a detail line without prefix (suppressed in quiet mode).
///
/// Use for indented detail lines that accompany info or warn messages.
pub fn detail(msg: &str) {
    if !is_quiet() {
        println!("{msg}");
    }
}

/// Print essential machine-readable output (always prints).
///
/// Use for results that should be available for piping, like file content.
pub fn essential(msg: &str) {
    println!("{msg}");
}

/// Single-letter marker for a file state, colored by severity.
#[must_use]
pub fn state_marker(state: FileState) -> String {
    match state {
        FileState::Added => "A".green().to_string(),
        FileState::Changed | FileState::Modified => "M".yellow().to_string(),
        FileState::Removed | FileState::Deleted | FileState::Missing => "D".red().to_string(),
        FileState::Untracked | FileState::UntrackedFolder => "?".dimmed().to_string(),
        FileState::Confliction => "U".red().bold().to_string(),
        FileState::Ignored => "!".dimmed().to_string(),
        FileState::Unmodified => " ".to_string(),
    }
}

/// Single-letter marker for a change in a commit.
#[must_use]
pub fn change_marker(change: ChangeType) -> String {
    match change {
        ChangeType::Add => "A".green().to_string(),
        ChangeType::Modify => "M".yellow().to_string(),
        ChangeType::Delete => "D".red().to_string(),
        ChangeType::Rename => "R".cyan().to_string(),
        ChangeType::Copy => "C".cyan().to_string(),
    }
}

/// Get a colored branch name with current indicator.
#[must_use]
pub fn branch_name(name: &str, is_current: bool) -> String {
    if is_current {
        format!("{} {}", "▶".cyan(), name.cyan().bold())
    } else {
        format!("  {name}")
    }
}

/// Print a horizontal line (suppressed in quiet mode).
pub fn hr() {
    if !is_quiet() {
        println!("{}", "─".repeat(50).dimmed());
    }
}

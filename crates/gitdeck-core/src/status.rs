//! Working tree status model.
//!
//! The snapshot is replaced wholesale on every refresh. Refreshes are
//! ticketed: only the response to the most recently issued ticket is
//! applied, so a slow refresh started by one operation cannot overwrite a
//! newer one started by another.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use gitdeck_remote::StatusResponse;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// State of one file relative to HEAD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileState {
    Unmodified,
    /// New file in the index.
    Added,
    /// Modified in the index.
    Changed,
    /// Modified in the working tree.
    Modified,
    /// Removed from the index.
    Removed,
    Deleted,
    /// Removed from the working tree but still in the index.
    Missing,
    Untracked,
    UntrackedFolder,
    Ignored,
    /// Unresolved merge/checkout conflict.
    Confliction,
}

impl FileState {
    const ALL: [Self; 11] = [
        Self::Unmodified,
        Self::Added,
        Self::Changed,
        Self::Modified,
        Self::Removed,
        Self::Deleted,
        Self::Missing,
        Self::Untracked,
        Self::UntrackedFolder,
        Self::Ignored,
        Self::Confliction,
    ];

    /// Wire name of this state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unmodified => "UNMODIFIED",
            Self::Added => "ADDED",
            Self::Changed => "CHANGED",
            Self::Modified => "MODIFIED",
            Self::Removed => "REMOVED",
            Self::Deleted => "DELETED",
            Self::Missing => "MISSING",
            Self::Untracked => "UNTRACKED",
            Self::UntrackedFolder => "UNTRACKED_FOLDER",
            Self::Ignored => "IGNORED",
            Self::Confliction => "CONFLICTION",
        }
    }

    /// Parse a wire name exactly.
    #[must_use]
    pub fn from_wire(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|state| state.as_str() == raw)
    }
}

impl fmt::Display for FileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileState {
    type Err = String;

    /// Case-insensitive, accepts `-` for `_` (for command-line input).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::from_wire(&normalized).ok_or_else(|| format!("unknown file state: {s}"))
    }
}

/// One file in the working tree snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileStatus {
    pub path: String,
    pub status: FileState,
    pub is_staged: bool,
}

impl FileStatus {
    fn new(path: impl Into<String>, status: FileState) -> Self {
        Self {
            path: path.into(),
            status,
            is_staged: false,
        }
    }
}

/// Snapshot of the working tree. `is_clean` always equals `files.is_empty()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkingTreeStatus {
    files: Vec<FileStatus>,
    is_clean: bool,
}

impl WorkingTreeStatus {
    /// Build a snapshot, deriving the clean flag.
    #[must_use]
    pub fn new(files: Vec<FileStatus>) -> Self {
        let is_clean = files.is_empty();
        Self { files, is_clean }
    }

    #[must_use]
    pub fn files(&self) -> &[FileStatus] {
        &self.files
    }

    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.is_clean
    }

    /// Find a file by path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&FileStatus> {
        self.files.iter().find(|f| f.path == path)
    }

    /// Files in the given state.
    pub fn with_state(&self, state: FileState) -> impl Iterator<Item = &FileStatus> {
        self.files.iter().filter(move |f| f.status == state)
    }
}

impl Default for WorkingTreeStatus {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Identifies one refresh request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket(u64);

/// Owner of the working tree snapshot.
#[derive(Debug, Clone, Default)]
pub struct StatusModel {
    snapshot: WorkingTreeStatus,
    issued: u64,
    pending_conflicts: Option<(RefreshTicket, BTreeSet<String>)>,
}

impl StatusModel {
    /// The current snapshot.
    #[must_use]
    pub const fn snapshot(&self) -> &WorkingTreeStatus {
        &self.snapshot
    }

    /// Issue a ticket for a refresh about to be sent.
    ///
    /// Conflict marks armed for an earlier ticket are dropped.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.issued += 1;
        self.pending_conflicts = None;
        RefreshTicket(self.issued)
    }

    /// Whether `ticket` belongs to the most recently issued refresh.
    #[must_use]
    pub const fn is_current(&self, ticket: RefreshTicket) -> bool {
        ticket.0 == self.issued
    }

    /// Issue a ticket for a refresh that marks `paths` as conflicted.
    ///
    /// The marks apply only to the response for this ticket, and only to
    /// paths that response actually reports. They are dropped if the ticket
    /// is superseded before its response lands.
    pub fn begin_conflict_refresh<I, S>(&mut self, paths: I) -> RefreshTicket
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ticket = self.begin_refresh();
        let paths = paths
            .into_iter()
            .map(|p| normalize(p.as_ref()).to_string())
            .collect();
        self.pending_conflicts = Some((ticket, paths));
        ticket
    }

    /// Drop conflict marks armed for `ticket` after its query failed.
    pub fn abandon(&mut self, ticket: RefreshTicket) {
        if matches!(self.pending_conflicts, Some((armed, _)) if armed == ticket) {
            self.pending_conflicts = None;
        }
    }

    /// Apply a status response.
    ///
    /// Returns `Ok(None)` when the ticket is stale and the response was
    /// discarded.
    ///
    /// # Errors
    /// Returns error if the response names a file state outside the known
    /// set; the snapshot is left untouched.
    pub fn apply(
        &mut self,
        ticket: RefreshTicket,
        response: &StatusResponse,
        filter: Option<FileState>,
    ) -> Result<Option<&WorkingTreeStatus>> {
        if !self.is_current(ticket) {
            tracing::debug!(ticket = ticket.0, latest = self.issued, "discarding stale status");
            return Ok(None);
        }

        let conflicts = match self.pending_conflicts.take() {
            Some((armed, paths)) if armed == ticket => paths,
            _ => BTreeSet::new(),
        };

        let mut files = response
            .files
            .iter()
            .map(|entry| {
                FileState::from_wire(&entry.status)
                    .map(|state| FileStatus::new(entry.name.clone(), state))
                    .ok_or_else(|| Error::UnknownFileState {
                        path: entry.name.clone(),
                        state: entry.status.clone(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        for file in &mut files {
            if conflicts.contains(normalize(&file.path)) {
                file.status = FileState::Confliction;
            }
        }

        if let Some(state) = filter {
            files.retain(|f| f.status == state);
        }

        self.snapshot = WorkingTreeStatus::new(files);
        Ok(Some(&self.snapshot))
    }

    /// Replace the snapshot with `ADDED` entries for `paths`, without a
    /// backend query.
    ///
    /// Advances the refresh sequence so an in-flight refresh issued before
    /// this call is discarded when it lands.
    pub fn replace_with_added<I, S>(&mut self, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.issued += 1;
        self.pending_conflicts = None;

        let mut seen = BTreeSet::new();
        let files = paths
            .into_iter()
            .map(Into::into)
            .filter(|p: &String| seen.insert(p.clone()))
            .map(|p| FileStatus::new(p, FileState::Added))
            .collect();
        self.snapshot = WorkingTreeStatus::new(files);
    }

    // === Staging ===

    /// Stage one file. Returns false if the path is not in the snapshot.
    pub fn stage(&mut self, path: &str) -> bool {
        self.set_staged(path, true)
    }

    /// Unstage one file. Returns false if the path is not in the snapshot.
    pub fn unstage(&mut self, path: &str) -> bool {
        self.set_staged(path, false)
    }

    pub fn stage_all(&mut self) {
        for file in &mut self.snapshot.files {
            file.is_staged = true;
        }
    }

    pub fn unstage_all(&mut self) {
        for file in &mut self.snapshot.files {
            file.is_staged = false;
        }
    }

    fn set_staged(&mut self, path: &str, staged: bool) -> bool {
        let target = normalize(path);
        let mut found = false;
        for file in &mut self.snapshot.files {
            if normalize(&file.path) == target {
                file.is_staged = staged;
                found = true;
            }
        }
        found
    }

    /// Staged paths as the commit endpoint expects them (no leading `/`).
    #[must_use]
    pub fn staged_paths(&self) -> Vec<String> {
        self.snapshot
            .files
            .iter()
            .filter(|f| f.is_staged)
            .map(|f| normalize(&f.path).to_string())
            .collect()
    }
}

/// Status and conflict lists disagree on a leading `/`.
fn normalize(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

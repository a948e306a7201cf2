//! Value types for the restash git abstraction layer.
//!
//! These types form the vocabulary shared between the
//! [`SnapshotStore`](crate::SnapshotStore) / [`PreviewCalculator`](crate::PreviewCalculator)
//! traits and everything above them. They intentionally contain no process or
//! parsing machinery — the git CLI backend is an implementation detail.

use std::collections::BTreeSet;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// One entry in the stash stack.
///
/// `position` is a *live index*, not a stable identity: position 0 is always
/// the most recently saved entry, every save shifts existing entries by +1,
/// and dropping the entry at position P shifts everything above P down by 1.
/// A `Snapshot` read from [`SnapshotStore::list`](crate::SnapshotStore::list)
/// is only addressable until the next stack mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Current ordinal index in the stack (0 = newest).
    pub position: usize,
    /// The label the entry was saved with (or git's generated WIP subject).
    pub label: String,
    /// The branch that was checked out when the entry was saved.
    pub origin_branch: String,
    /// Number of files the entry touches.
    pub file_count: usize,
    /// Total added lines across all touched files.
    pub additions: u64,
    /// Total deleted lines across all touched files.
    pub deletions: u64,
    /// Creation time, unix seconds.
    pub created_at: i64,
    /// Whether the entry carries an untracked-files layer.
    pub has_untracked_layer: bool,
}

// ---------------------------------------------------------------------------
// ChangeEntry / PreviewSummary
// ---------------------------------------------------------------------------

/// Per-file change statistics for one side of the working tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChangeEntry {
    /// Path relative to the repository root.
    pub path: String,
    /// Added lines. Zero for binary files.
    pub additions: u64,
    /// Deleted lines. Zero for binary files.
    pub deletions: u64,
}

/// Summary of the current uncommitted working-tree changes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PreviewSummary {
    /// Files with staged (index) changes.
    pub staged: Vec<ChangeEntry>,
    /// Files with unstaged (worktree) changes.
    pub unstaged: Vec<ChangeEntry>,
    /// Untracked file paths. Empty when untracked files were not requested.
    pub untracked: Vec<String>,
}

impl PreviewSummary {
    /// Returns `true` if nothing is staged, unstaged, or untracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.staged.is_empty() && self.unstaged.is_empty() && self.untracked.is_empty()
    }

    /// Returns `true` iff some path appears in both the staged and unstaged
    /// sets.
    ///
    /// Such a path carries two independent edits the stash tool cannot
    /// capture separately in one atomic operation, so layer-splitting save
    /// modes must be refused when this holds.
    #[must_use]
    pub fn has_mixed_changes(&self) -> bool {
        let staged: BTreeSet<&str> = self.staged.iter().map(|c| c.path.as_str()).collect();
        self.unstaged.iter().any(|c| staged.contains(c.path.as_str()))
    }

    /// Total number of changed paths, counting a path once per layer it
    /// appears in.
    #[must_use]
    pub fn change_count(&self) -> usize {
        self.staged.len() + self.unstaged.len() + self.untracked.len()
    }
}

// ---------------------------------------------------------------------------
// SaveFlags
// ---------------------------------------------------------------------------

/// Layer flags for a save operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SaveFlags {
    /// Also capture untracked files (`git stash push -u`).
    pub include_untracked: bool,
    /// Leave staged changes in the working tree after capturing them
    /// (`git stash push --keep-index`).
    pub keep_staged_in_worktree: bool,
}

impl SaveFlags {
    /// Flags capturing every layer, staged changes not retained.
    #[must_use]
    pub const fn all_layers() -> Self {
        Self {
            include_untracked: true,
            keep_staged_in_worktree: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

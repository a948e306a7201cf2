//! The [`PreviewCalculator`] trait — read-only working-tree summaries.
//!
//! Used both for user confirmation (what is about to be captured) and to
//! decide which layer flags a save should carry. Pure reads: no method here
//! mutates the repository.

use crate::error::GitError;
use crate::types::PreviewSummary;

/// Computes summaries of the current uncommitted changes.
pub trait PreviewCalculator {
    /// Summarize staged, unstaged, and (optionally) untracked changes.
    ///
    /// Replaces: `git diff --cached --numstat`, `git diff --numstat`, and
    /// `git ls-files --others --exclude-standard`.
    ///
    /// # Errors
    /// Command or parse failures from the underlying reads.
    fn compute_preview(&self, include_untracked: bool) -> Result<PreviewSummary, GitError>;

    /// Returns `true` iff some path carries both staged and unstaged edits.
    ///
    /// Layer-splitting save modes must be refused while this holds, since the
    /// backing tool cannot capture the two edits separately in one atomic
    /// operation.
    ///
    /// # Errors
    /// As [`compute_preview`](Self::compute_preview).
    fn detect_mixed_changes(&self) -> Result<bool, GitError> {
        Ok(self.compute_preview(false)?.has_mixed_changes())
    }
}

//! The [`SnapshotStore`] trait — the single abstraction boundary between the
//! reconciliation logic and the stash stack.
//!
//! All restash crates interact with the stash exclusively through this trait.
//! The trait is object-safe so callers can use `&dyn SnapshotStore`, which is
//! what the reconciliation engine holds — and what its tests replace with an
//! in-memory double.
//!
//! Every method maps to exactly one git invocation and carries **no business
//! logic**: no retries, no compensation, no position arithmetic. Composing
//! these primitives into something logically atomic is the engine's job.

use crate::error::GitError;
use crate::types::{SaveFlags, Snapshot};

/// The stash abstraction trait.
///
/// Positions follow the stack's live-index addressing: 0 is the newest entry,
/// a save shifts every existing entry by +1, a discard at P shifts everything
/// above P down by 1. None of these methods re-validate a position beyond
/// what git itself enforces.
pub trait SnapshotStore {
    /// Insert a new snapshot at position 0 capturing the requested layers of
    /// the current uncommitted changes.
    ///
    /// Replaces: `git stash push -m <label> [-u] [--keep-index]`.
    ///
    /// # Errors
    /// [`GitError::NoChanges`] if nothing matches the requested layers; the
    /// stack is untouched in that case.
    fn save(&self, label: &str, flags: SaveFlags) -> Result<(), GitError>;

    /// Additively copy a snapshot's content onto the working tree without
    /// removing it from the stack.
    ///
    /// Replaces: `git stash apply stash@{N}`.
    ///
    /// # Errors
    /// A command failure whose stderr carries git's overwrite signature when
    /// any target path has a conflicting local modification; the snapshot
    /// itself is untouched.
    fn apply(&self, position: usize) -> Result<(), GitError>;

    /// Remove a snapshot without touching the working tree.
    ///
    /// Replaces: `git stash drop stash@{N}`.
    ///
    /// # Errors
    /// A command failure if `position` is out of range.
    fn discard(&self, position: usize) -> Result<(), GitError>;

    /// Apply a snapshot and, only if the apply succeeded cleanly, remove it.
    ///
    /// Replaces: `git stash pop stash@{N}` — git's single primitive for the
    /// pair. Conflict semantics match [`apply`](Self::apply): on conflict
    /// nothing is discarded.
    ///
    /// # Errors
    /// As [`apply`](Self::apply).
    fn apply_and_discard(&self, position: usize) -> Result<(), GitError>;

    /// Read the current stack, ordered by position ascending.
    ///
    /// Always a fresh read — implementations must not cache, since any stack
    /// mutation invalidates every previously returned position.
    ///
    /// Replaces: `git stash list` plus per-entry `git stash show --numstat`
    /// and an untracked-layer probe.
    ///
    /// # Errors
    /// Command or parse failures from the underlying reads.
    fn list(&self) -> Result<Vec<Snapshot>, GitError>;
}

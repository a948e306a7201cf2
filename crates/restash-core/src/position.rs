//! Live-index arithmetic for the position-addressed stash stack.
//!
//! A position captured before a stack mutation is stale the moment the
//! mutation lands: every save shifts existing entries by +1, every discard at
//! P shifts entries above P down by 1. [`shift`] maps a captured position
//! plus the insertions that happened since to the entry's current position.
//!
//! The rule that keeps this correct: compute the shifted position
//! *immediately before* the primitive call that uses it, and never store a
//! shifted position across an operation that might itself mutate the stack.

/// Map a captured position to its current position after `insertions` saves.
///
/// Pure and total; saturates at `usize::MAX` rather than wrapping.
#[must_use]
pub const fn shift(original: usize, insertions: usize) -> usize {
    original.saturating_add(insertions)
}

//! Conflict classification for primitive-call failures.
//!
//! The stash layer returns command failures with stderr kept verbatim
//! ([`GitError::Command`]); this module decides whether such a failure is an
//! overwrite conflict the user can resolve by hand, or an unexpected failure
//! they cannot. The distinction drives the engine's terminal error kind and
//! the guidance shown to the user.

use restash_git::GitError;

/// Stderr fragments git emits when applying would clobber local state.
///
/// Matched case-insensitively. The first two are the overwrite refusal
/// (apply/pop stops before touching anything), the third is the
/// untracked-layer variant, the last is a merge that started and left
/// conflict markers.
const CONFLICT_SIGNATURES: &[&str] = &[
    "would be overwritten",
    "your local changes to the following files",
    "could not restore untracked files from stash",
    "conflict (",
];

/// How a primitive-call failure should be reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// An overwrite would occur; safe for the user to retry after resolving
    /// the conflicting paths by hand.
    Conflict,
    /// Anything else — the user cannot recover by resolving conflicts.
    Fatal,
}

/// Classify a stash-layer failure.
///
/// Only command failures can be conflicts; timeouts, I/O errors, parse
/// errors, and every other variant are fatal.
#[must_use]
pub fn classify(error: &GitError) -> FailureKind {
    let Some(stderr) = error.command_stderr() else {
        return FailureKind::Fatal;
    };
    let stderr = stderr.to_lowercase();
    if CONFLICT_SIGNATURES.iter().any(|sig| stderr.contains(sig)) {
        FailureKind::Conflict
    } else {
        FailureKind::Fatal
    }
}

//! Error taxonomy for the reconciliation saga.
//!
//! Every failure is terminal — there are no automatic retries anywhere in the
//! saga — and carries enough context (the failing step, the classified kind)
//! for the caller to decide whether a manual retry is safe. A failure whose
//! compensating action also failed is wrapped so both messages surface
//! together; that is the one state where the stack may be left inconsistent,
//! and the second error must not be swallowed.

use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// SagaStep
// ---------------------------------------------------------------------------

/// The saga steps that issue primitive calls (step 2, the position shift, is
/// pure and cannot fail).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SagaStep {
    /// Step 1: capture the working tree into the temp snapshot.
    TempSave,
    /// Step 3: apply the target snapshot onto the cleaned tree.
    ApplyTarget,
    /// Step 4: discard the target's stored copy.
    DiscardTarget,
    /// Step 5: merge the temp capture back, producing the union.
    MergeBackTemp,
    /// Step 6: save the union under the combined label.
    SaveCombined,
}

impl SagaStep {
    /// The step's number in the saga table.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::TempSave => 1,
            Self::ApplyTarget => 3,
            Self::DiscardTarget => 4,
            Self::MergeBackTemp => 5,
            Self::SaveCombined => 6,
        }
    }
}

impl fmt::Display for SagaStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TempSave => "saving the working tree",
            Self::ApplyTarget => "applying the target snapshot",
            Self::DiscardTarget => "discarding the target's stored copy",
            Self::MergeBackTemp => "merging the saved changes back",
            Self::SaveCombined => "saving the combined snapshot",
        };
        write!(f, "step {} ({name})", self.number())
    }
}

// ---------------------------------------------------------------------------
// ErrorKind
// ---------------------------------------------------------------------------

/// Machine-checkable error kind, for callers that dispatch without matching
/// the full variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Precondition violated; zero mutations attempted.
    NoChanges,
    /// An overwrite would occur; prior topology fully or best-effort
    /// restored; safe to retry after resolving by hand.
    Conflict,
    /// Unexpected primitive failure unrelated to overwrite conflicts.
    Fatal,
    /// A primary failure's compensating action also failed.
    CleanupFailed,
}

// ---------------------------------------------------------------------------
// ReconcileError
// ---------------------------------------------------------------------------

/// Errors returned by the reconciliation engine.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The working tree has no uncommitted changes (or the target position
    /// does not exist). Nothing was mutated.
    #[error("nothing to reconcile: {message}")]
    NoChanges {
        /// What the precondition check found.
        message: String,
    },

    /// An overwrite conflict stopped the saga; compensation ran and prior
    /// topology was restored (fully, or best-effort at step 5).
    #[error(
        "conflict while {step}: {message}\n  \
         Resolve the conflicting paths by hand, then retry."
    )]
    Conflict {
        /// The step that failed.
        step: SagaStep,
        /// The underlying failure, verbatim.
        message: String,
    },

    /// An unexpected primitive failure stopped the saga.
    #[error(
        "unexpected failure while {step}: {message}\n  \
         Inspect `git stash list` and `git status` before retrying."
    )]
    Fatal {
        /// The step that failed.
        step: SagaStep,
        /// The underlying failure, verbatim.
        message: String,
    },

    /// A primary failure's compensating action also failed. The stack may be
    /// left inconsistent; both messages are surfaced.
    #[error(
        "{primary}\n  \
         Compensation also failed: {cleanup}\n  \
         The snapshot stack may be inconsistent — inspect `git stash list`."
    )]
    CleanupFailed {
        /// The failure that triggered compensation.
        primary: Box<ReconcileError>,
        /// What the compensating action reported.
        cleanup: String,
    },
}

impl ReconcileError {
    /// The machine-checkable kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NoChanges { .. } => ErrorKind::NoChanges,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Fatal { .. } => ErrorKind::Fatal,
            Self::CleanupFailed { .. } => ErrorKind::CleanupFailed,
        }
    }

    /// The saga step that failed, if the saga got that far.
    ///
    /// For a wrapped cleanup failure this is the *primary* failure's step.
    #[must_use]
    pub fn step(&self) -> Option<SagaStep> {
        match self {
            Self::NoChanges { .. } => None,
            Self::Conflict { step, .. } | Self::Fatal { step, .. } => Some(*step),
            Self::CleanupFailed { primary, .. } => primary.step(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

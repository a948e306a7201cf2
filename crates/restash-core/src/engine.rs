//! The reconciliation saga: merge the current uncommitted changes into an
//! existing snapshot.
//!
//! The stash primitives are individually non-transactional and the stack's
//! addressing is positional, so "add my changes to snapshot N" is composed
//! from up to six primitive calls with an explicit compensating action per
//! step:
//!
//! | Step | Action                  | On failure                                   |
//! |------|-------------------------|----------------------------------------------|
//! | 1    | save temp capture       | abort; nothing changed                       |
//! | 2    | shift target position   | — (pure)                                     |
//! | 3    | apply shifted target    | pop temp to restore the tree; terminate      |
//! | 4    | discard shifted target  | best-effort pop temp; terminate              |
//! | 5    | pop temp (build union)  | best-effort discard temp by label; terminate |
//! | 6    | save combined snapshot  | no compensation; tree keeps the union        |
//!
//! Execution is strictly sequential — the next primitive is never issued
//! until the previous one settled — and there is no cancellation once step 1
//! has committed: the engine always drives to a terminal state, though
//! compensation itself may fail (surfaced as
//! [`ReconcileError::CleanupFailed`]).
//!
//! The stack is shared with anything else that can mutate it mid-saga; such
//! interleaving can invalidate the position arithmetic of step 2. Accepted
//! risk — the backing tool offers no lock to close it with.

use restash_git::{GitError, PreviewCalculator, SaveFlags, SnapshotStore};
use tracing::{debug, warn};

use crate::classify::{FailureKind, classify};
use crate::error::{ReconcileError, SagaStep};
use crate::position;

/// Label of the transient capture the saga parks the working tree under.
///
/// Also the key step 5's compensation uses to find the capture after a
/// failed merge-back, so it must never collide with a user label.
pub const TEMP_LABEL: &str = "restash/reconcile-temp";

/// Composes the stash primitives into the merge-into-snapshot saga.
///
/// Holds trait objects so tests (and any future backend) can substitute the
/// store wholesale.
pub struct ReconciliationEngine<'a> {
    store: &'a dyn SnapshotStore,
    preview: &'a dyn PreviewCalculator,
    on_refresh: Option<&'a dyn Fn()>,
}

impl<'a> ReconciliationEngine<'a> {
    /// Create an engine over the given store and preview calculator.
    #[must_use]
    pub const fn new(store: &'a dyn SnapshotStore, preview: &'a dyn PreviewCalculator) -> Self {
        Self {
            store,
            preview,
            on_refresh: None,
        }
    }

    /// Register a hook invoked exactly once per terminal outcome (success or
    /// any failure) — the stack topology has almost certainly changed even on
    /// failure paths that could not fully restore it.
    #[must_use]
    pub const fn with_refresh(mut self, hook: &'a dyn Fn()) -> Self {
        self.on_refresh = Some(hook);
        self
    }

    /// Merge the current uncommitted working-tree changes into the snapshot
    /// at `target_position`, storing the union under `combined_label`.
    ///
    /// On success the stack has the same size as before: the target's slot is
    /// conceptually replaced by the combined snapshot (which lands at
    /// position 0, as every save does).
    ///
    /// # Errors
    /// See [`ReconcileError`]; every failure is terminal and no retry is
    /// attempted.
    pub fn merge_working_changes_into_snapshot(
        &self,
        target_position: usize,
        combined_label: &str,
    ) -> Result<(), ReconcileError> {
        let result = self.run_saga(target_position, combined_label);
        if let Some(hook) = self.on_refresh {
            hook();
        }
        result
    }

    fn run_saga(
        &self,
        target_position: usize,
        combined_label: &str,
    ) -> Result<(), ReconcileError> {
        let combined_label = combined_label.trim();
        if combined_label.is_empty() {
            return Err(ReconcileError::Fatal {
                step: SagaStep::TempSave,
                message: "combined label must not be empty".to_owned(),
            });
        }

        // Precondition: at least one uncommitted change. Checked before any
        // store call so a clean tree costs zero stash operations.
        let preview = self
            .preview
            .compute_preview(true)
            .map_err(|e| fatal(SagaStep::TempSave, &e))?;
        if preview.is_empty() {
            return Err(ReconcileError::NoChanges {
                message: "the working tree has no uncommitted changes".to_owned(),
            });
        }

        // Read the target's metadata while its position is still valid; its
        // untracked flag feeds step 6's derived flags.
        let stack = self
            .store
            .list()
            .map_err(|e| fatal(SagaStep::TempSave, &e))?;
        let Some(target) = stack.iter().find(|s| s.position == target_position) else {
            return Err(ReconcileError::Fatal {
                step: SagaStep::TempSave,
                message: format!(
                    "no snapshot at position {target_position} (the stack has {} entries)",
                    stack.len()
                ),
            });
        };
        let target_has_untracked = target.has_untracked_layer;

        // Step 1 — park the working tree in a temp capture at position 0.
        debug!(target_position, "step 1: saving temp capture");
        let temp_flags = SaveFlags {
            include_untracked: !preview.untracked.is_empty(),
            keep_staged_in_worktree: false,
        };
        self.store.save(TEMP_LABEL, temp_flags).map_err(|e| {
            if matches!(e, GitError::NoChanges) {
                // The preview said otherwise moments ago; treat as the
                // precondition racing an external mutation, nothing changed.
                ReconcileError::NoChanges {
                    message: "the working tree had no uncommitted changes to save".to_owned(),
                }
            } else {
                fatal(SagaStep::TempSave, &e)
            }
        })?;

        // Step 2 — the temp save shifted every position by one. Recomputed
        // immediately before each use, never cached across a mutation.
        let shifted = position::shift(target_position, 1);

        // Step 3 — materialize the target's content onto the now-clean tree.
        debug!(shifted, "step 3: applying target snapshot");
        if let Err(primary) = self.store.apply(shifted) {
            warn!(%primary, "step 3 failed; restoring temp capture");
            let reported = classified(SagaStep::ApplyTarget, &primary);
            // The tree is clean (temp holds everything), so popping the temp
            // capture restores the pre-saga state exactly.
            return Err(self.compensate_with_pop(reported));
        }

        // Step 4 — the target's content now lives in the tree; its stored
        // copy is redundant. Dropping it before the merge-back avoids ever
        // duplicating the target.
        debug!(shifted = position::shift(target_position, 1), "step 4: discarding target");
        if let Err(primary) = self.store.discard(position::shift(target_position, 1)) {
            warn!(%primary, "step 4 failed; restoring temp capture (best effort)");
            let reported = fatal(SagaStep::DiscardTarget, &primary);
            return Err(self.compensate_with_pop(reported));
        }

        // Step 5 — merge the temp capture back onto the target-applied tree,
        // producing the union of both change sets.
        debug!("step 5: merging temp capture back");
        if let Err(primary) = self.store.apply_and_discard(0) {
            warn!(%primary, "step 5 failed; discarding temp capture by label");
            let reported = classified(SagaStep::MergeBackTemp, &primary);
            // The target is already gone from the stack and its content is in
            // the tree; all that can be done is to not leak the temp entry.
            return Err(match self.discard_temp_by_label() {
                Ok(()) => reported,
                Err(cleanup) => ReconcileError::CleanupFailed {
                    primary: Box::new(reported),
                    cleanup,
                },
            });
        }

        // Step 6 — store the union. The untracked flag is inherited from the
        // target OR observed in the preview, so no untracked content is
        // silently dropped from the merge.
        debug!(combined_label, "step 6: saving combined snapshot");
        let combined_flags = SaveFlags {
            include_untracked: target_has_untracked || !preview.untracked.is_empty(),
            keep_staged_in_worktree: false,
        };
        self.store
            .save(combined_label, combined_flags)
            .map_err(|e| fatal(SagaStep::SaveCombined, &e))?;

        debug!("reconciliation complete");
        Ok(())
    }

    /// Restore the temp capture by popping it from position 0, wrapping the
    /// primary error if the pop itself fails.
    fn compensate_with_pop(&self, reported: ReconcileError) -> ReconcileError {
        match self.store.apply_and_discard(0) {
            Ok(()) => reported,
            Err(cleanup) => {
                warn!(%cleanup, "compensation failed; stack may be inconsistent");
                ReconcileError::CleanupFailed {
                    primary: Box::new(reported),
                    cleanup: cleanup.to_string(),
                }
            }
        }
    }

    /// Find the temp capture by its label and discard it, for the one branch
    /// where its position can no longer be assumed (step 5's failed pop may
    /// or may not have consumed it).
    fn discard_temp_by_label(&self) -> Result<(), String> {
        let stack = self.store.list().map_err(|e| e.to_string())?;
        match stack.iter().find(|s| s.label == TEMP_LABEL) {
            Some(temp) => self.store.discard(temp.position).map_err(|e| e.to_string()),
            // Already consumed by the failed pop; nothing to clean.
            None => Ok(()),
        }
    }
}

fn fatal(step: SagaStep, error: &GitError) -> ReconcileError {
    ReconcileError::Fatal {
        step,
        message: error.to_string(),
    }
}

fn classified(step: SagaStep, error: &GitError) -> ReconcileError {
    match classify(error) {
        FailureKind::Conflict => ReconcileError::Conflict {
            step,
            message: error.to_string(),
        },
        FailureKind::Fatal => ReconcileError::Fatal {
            step,
            message: error.to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

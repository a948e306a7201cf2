//! `restash merge` — reconcile the working tree into an existing snapshot.
//!
//! Confirmation and presentation live here; the saga itself (and all of its
//! compensation) is `restash_core::ReconciliationEngine`.

use anyhow::{Result, bail};
use clap::Args;
use restash_core::ReconciliationEngine;
use restash_git::{PreviewCalculator, SnapshotStore};

use crate::prompt::confirm;
use crate::repo;

/// Merge the current uncommitted changes into an existing snapshot
///
/// Composes the stash primitives into one logically atomic operation: the
/// working tree is parked, the target snapshot is applied and retired, the
/// parked changes are merged back, and the union is saved under the given
/// label. Every step has a compensating action; on conflict the original
/// stack is restored and the conflicting paths are reported.
///
/// The stack is re-read and positions recomputed internally — the position
/// given here must be current as of the last `restash list`.
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Stack position of the target snapshot (see `restash list`)
    pub position: usize,

    /// Label for the combined snapshot
    #[arg(short = 'm', long = "label")]
    pub label: String,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

pub fn run(args: &MergeArgs) -> Result<()> {
    let (store, config) = repo::open()?;

    if args.label.trim().is_empty() {
        bail!("The combined label must not be empty.");
    }

    // Pre-checks duplicate the engine's preconditions only to give the
    // interactive user a better message than a step-1 failure would.
    let preview = store.compute_preview(true)?;
    if preview.is_empty() {
        bail!("The working tree has no uncommitted changes to merge.");
    }
    let stack = store.list()?;
    let Some(target) = stack.iter().find(|s| s.position == args.position) else {
        bail!(
            "No snapshot at position {} (the stack has {} entries).\n  \
             Check positions with: restash list",
            args.position,
            stack.len()
        );
    };

    if config.confirm && !args.yes {
        let question = format!(
            "Merge {} staged, {} unstaged, {} untracked file(s) into '{}' (position {}),\n\
             saving the result as '{}'?",
            preview.staged.len(),
            preview.unstaged.len(),
            preview.untracked.len(),
            target.label,
            target.position,
            args.label,
        );
        if !confirm(&question)? {
            println!("Aborted.");
            return Ok(());
        }
    }

    let refresh = || {
        if let Ok(stack) = store.list() {
            println!(
                "Snapshot stack now has {} entr{}.",
                stack.len(),
                plural_y(stack.len())
            );
        }
    };

    let engine = ReconciliationEngine::new(&store, &store).with_refresh(&refresh);
    engine.merge_working_changes_into_snapshot(args.position, &args.label)?;

    println!(
        "Merged the working changes into '{}' (now position 0).",
        args.label
    );
    Ok(())
}

const fn plural_y(n: usize) -> &'static str {
    if n == 1 { "y" } else { "ies" }
}

//! `restash save` — capture the working tree as a new snapshot.

use anyhow::{Result, bail};
use clap::Args;
use restash_git::{GitError, PreviewCalculator, SaveFlags, SnapshotStore};

use crate::repo;

/// Save the working tree as a new snapshot at position 0
///
/// Captures staged and unstaged changes (plus untracked files, per config or
/// -u) and resets the working tree. Existing snapshots shift down by one
/// position.
#[derive(Args, Debug)]
pub struct SaveArgs {
    /// Label for the snapshot
    #[arg(default_value = "WIP")]
    pub label: String,

    /// Also capture untracked files (overrides the config default)
    #[arg(short = 'u', long)]
    pub include_untracked: bool,

    /// Capture staged changes but leave them in the working tree
    ///
    /// Refused when any path carries both a staged and an unstaged edit —
    /// the two cannot be captured separately in one atomic operation.
    #[arg(long)]
    pub keep_staged: bool,
}

pub fn run(args: &SaveArgs) -> Result<()> {
    let (store, config) = repo::open()?;

    if args.keep_staged && store.detect_mixed_changes()? {
        bail!(
            "Cannot save with --keep-staged: some paths have both staged and unstaged edits.\n  \
             Stage or unstage those paths first (`git status` shows them), or save without \
             --keep-staged."
        );
    }

    let flags = SaveFlags {
        include_untracked: args.include_untracked || config.save.include_untracked,
        keep_staged_in_worktree: args.keep_staged,
    };

    match store.save(&args.label, flags) {
        Ok(()) => {
            println!("Saved '{}' at position 0.", args.label);
            Ok(())
        }
        Err(GitError::NoChanges) => {
            bail!("Nothing to save: the working tree has no matching changes.")
        }
        Err(e) => Err(e.into()),
    }
}

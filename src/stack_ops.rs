//! `restash apply` / `pop` / `drop` — direct stack operations.

use anyhow::{Result, bail};
use clap::Args;
use restash_core::{FailureKind, classify};
use restash_git::{GitError, Snapshot, SnapshotStore};

use crate::prompt::confirm;
use crate::repo;

/// Copy a snapshot's content onto the working tree
///
/// The snapshot stays in the stack. Fails without touching anything if a
/// local modification would be overwritten.
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Stack position of the snapshot (see `restash list`)
    pub position: usize,
}

/// Apply a snapshot and remove it from the stack
///
/// On conflict nothing is removed; resolve the conflicting paths and retry.
#[derive(Args, Debug)]
pub struct PopArgs {
    /// Stack position of the snapshot (see `restash list`)
    pub position: usize,
}

/// Remove a snapshot without touching the working tree
#[derive(Args, Debug)]
pub struct DropArgs {
    /// Stack position of the snapshot (see `restash list`)
    pub position: usize,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub force: bool,
}

pub fn run_apply(args: &ApplyArgs) -> Result<()> {
    let (store, _config) = repo::open()?;
    let snap = find_snapshot(&store, args.position)?;

    match store.apply(args.position) {
        Ok(()) => {
            println!("Applied '{}' (still stored at position {}).", snap.label, args.position);
            Ok(())
        }
        Err(e) => Err(conflict_hint(e)),
    }
}

pub fn run_pop(args: &PopArgs) -> Result<()> {
    let (store, _config) = repo::open()?;
    let snap = find_snapshot(&store, args.position)?;

    match store.apply_and_discard(args.position) {
        Ok(()) => {
            println!("Applied and removed '{}'.", snap.label);
            Ok(())
        }
        Err(e) => Err(conflict_hint(e)),
    }
}

pub fn run_drop(args: &DropArgs) -> Result<()> {
    let (store, config) = repo::open()?;
    let snap = find_snapshot(&store, args.position)?;

    if config.confirm && !args.force {
        let question = format!(
            "Drop '{}' (position {}, {} file(s))? This cannot be undone.",
            snap.label, snap.position, snap.file_count
        );
        if !confirm(&question)? {
            println!("Aborted.");
            return Ok(());
        }
    }

    store.discard(args.position)?;
    println!("Dropped '{}'.", snap.label);
    Ok(())
}

/// Resolve a position against a fresh stack read, with a listing hint when
/// it is out of range.
fn find_snapshot(store: &dyn SnapshotStore, position: usize) -> Result<Snapshot> {
    let stack = store.list()?;
    let len = stack.len();
    match stack.into_iter().find(|s| s.position == position) {
        Some(snap) => Ok(snap),
        None => bail!(
            "No snapshot at position {position} (the stack has {len} entries).\n  \
             Check positions with: restash list"
        ),
    }
}

/// Attach retry guidance to overwrite conflicts; pass everything else
/// through.
fn conflict_hint(error: GitError) -> anyhow::Error {
    match classify(&error) {
        FailureKind::Conflict => anyhow::anyhow!(
            "{error}\n  \
             Resolve or stash the conflicting local changes, then retry. Nothing was removed."
        ),
        FailureKind::Fatal => error.into(),
    }
}

//! git-CLI-backed stash operations and `stash list` parsing.
//!
//! Positions map to git's `stash@{N}` reflog addressing. Each trait method is
//! one invocation; [`list`](crate::SnapshotStore::list) additionally enriches
//! every entry with change stats and an untracked-layer probe.

use tracing::debug;

use crate::cli_repo::GitCli;
use crate::error::GitError;
use crate::store::SnapshotStore;
use crate::types::{SaveFlags, Snapshot};

/// The stdout signature git emits (with exit 0) when a save captured nothing.
const NO_CHANGES_SIGNATURE: &str = "No local changes to save";

/// Field separator for the custom `stash list` format (ASCII unit separator,
/// cannot appear in a reflog subject).
const FIELD_SEP: char = '\u{1f}';

fn stash_ref(position: usize) -> String {
    format!("stash@{{{position}}}")
}

impl SnapshotStore for GitCli {
    fn save(&self, label: &str, flags: SaveFlags) -> Result<(), GitError> {
        let mut args = vec!["stash", "push"];
        if flags.include_untracked {
            args.push("--include-untracked");
        }
        if flags.keep_staged_in_worktree {
            args.push("--keep-index");
        }
        args.push("-m");
        args.push(label);

        let out = self.run(&args)?;
        if out.stdout.contains(NO_CHANGES_SIGNATURE) {
            return Err(GitError::NoChanges);
        }
        debug!(label, "saved snapshot at position 0");
        Ok(())
    }

    fn apply(&self, position: usize) -> Result<(), GitError> {
        let spec = stash_ref(position);
        self.run(&["stash", "apply", &spec])?;
        Ok(())
    }

    fn discard(&self, position: usize) -> Result<(), GitError> {
        let spec = stash_ref(position);
        self.run(&["stash", "drop", &spec])?;
        Ok(())
    }

    fn apply_and_discard(&self, position: usize) -> Result<(), GitError> {
        let spec = stash_ref(position);
        self.run(&["stash", "pop", &spec])?;
        Ok(())
    }

    fn list(&self) -> Result<Vec<Snapshot>, GitError> {
        // %gd = stash@{N}, %ct = committer unix time, %gs = reflog subject.
        let format = format!("--format=%gd{FIELD_SEP}%ct{FIELD_SEP}%gs");
        let out = self.run(&["stash", "list", &format])?;

        let mut snapshots = Vec::new();
        for line in out.stdout.lines().filter(|l| !l.is_empty()) {
            let entry = parse_list_line(line)?;
            let spec = stash_ref(entry.position);

            let show = self.run(&["stash", "show", "--include-untracked", "--numstat", &spec])?;
            let stats = parse_numstat_totals(&show.stdout);

            // A stash commit's third parent is the untracked-files layer.
            let probe = format!("{spec}^3");
            let has_untracked_layer = self
                .run_unchecked(&["rev-parse", "--verify", "--quiet", &probe])?
                .success();

            snapshots.push(Snapshot {
                position: entry.position,
                label: entry.label,
                origin_branch: entry.branch,
                file_count: stats.files,
                additions: stats.additions,
                deletions: stats.deletions,
                created_at: entry.created_at,
                has_untracked_layer,
            });
        }
        debug!(count = snapshots.len(), "listed stash stack");
        Ok(snapshots)
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

struct ListEntry {
    position: usize,
    created_at: i64,
    branch: String,
    label: String,
}

fn parse_list_line(line: &str) -> Result<ListEntry, GitError> {
    let mut fields = line.splitn(3, FIELD_SEP);
    let (Some(refname), Some(time), Some(subject)) =
        (fields.next(), fields.next(), fields.next())
    else {
        return Err(parse_err("stash list entry", line));
    };

    let position =
        parse_stash_ref(refname).ok_or_else(|| parse_err("stash reflog ref", refname))?;
    let created_at: i64 = time
        .trim()
        .parse()
        .map_err(|_| parse_err("stash timestamp", time))?;
    let (branch, label) = parse_subject(subject);

    Ok(ListEntry {
        position,
        created_at,
        branch,
        label,
    })
}

/// `stash@{3}` → `3`.
fn parse_stash_ref(refname: &str) -> Option<usize> {
    refname
        .strip_prefix("stash@{")?
        .strip_suffix('}')?
        .parse()
        .ok()
}

/// Split a stash reflog subject into (origin branch, label).
///
/// Labeled saves read `On <branch>: <label>`; message-less saves read
/// `WIP on <branch>: <oid> <subject>` and keep the whole subject as the
/// label. Anything else (e.g. output of exotic tooling) falls back to an
/// empty branch and the subject verbatim.
fn parse_subject(subject: &str) -> (String, String) {
    if let Some(rest) = subject.strip_prefix("On ")
        && let Some((branch, label)) = rest.split_once(": ")
    {
        return (branch.to_owned(), label.to_owned());
    }
    if let Some(rest) = subject.strip_prefix("WIP on ")
        && let Some((branch, _)) = rest.split_once(": ")
    {
        return (branch.to_owned(), subject.to_owned());
    }
    (String::new(), subject.to_owned())
}

struct NumstatTotals {
    files: usize,
    additions: u64,
    deletions: u64,
}

/// Sum a `--numstat` listing. Binary files report `-` in both columns and
/// count as a file with zero line changes.
fn parse_numstat_totals(output: &str) -> NumstatTotals {
    let mut totals = NumstatTotals {
        files: 0,
        additions: 0,
        deletions: 0,
    };
    for line in output.lines().filter(|l| !l.is_empty()) {
        let mut cols = line.splitn(3, '\t');
        let (Some(adds), Some(dels), Some(_path)) = (cols.next(), cols.next(), cols.next())
        else {
            continue;
        };
        totals.files += 1;
        totals.additions += adds.trim().parse::<u64>().unwrap_or(0);
        totals.deletions += dels.trim().parse::<u64>().unwrap_or(0);
    }
    totals
}

fn parse_err(context: &str, detail: &str) -> GitError {
    GitError::Parse {
        context: context.to_owned(),
        detail: detail.to_owned(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

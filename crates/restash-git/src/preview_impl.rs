//! git-CLI-backed working-tree preview.
//!
//! Three reads, each NUL-delimited so arbitrary paths survive: staged changes
//! from `diff --cached --numstat -z`, unstaged from `diff --numstat -z`,
//! untracked from `ls-files --others --exclude-standard -z`.

use tracing::debug;

use crate::cli_repo::GitCli;
use crate::error::GitError;
use crate::preview::PreviewCalculator;
use crate::types::{ChangeEntry, PreviewSummary};

impl PreviewCalculator for GitCli {
    fn compute_preview(&self, include_untracked: bool) -> Result<PreviewSummary, GitError> {
        let staged = self.run(&["diff", "--cached", "--numstat", "-z"])?;
        let unstaged = self.run(&["diff", "--numstat", "-z"])?;

        let untracked = if include_untracked {
            let out = self.run(&["ls-files", "--others", "--exclude-standard", "-z"])?;
            out.stdout
                .split('\0')
                .filter(|p| !p.is_empty())
                .map(str::to_owned)
                .collect()
        } else {
            Vec::new()
        };

        let summary = PreviewSummary {
            staged: parse_numstat_entries(&staged.stdout),
            unstaged: parse_numstat_entries(&unstaged.stdout),
            untracked,
        };
        debug!(
            staged = summary.staged.len(),
            unstaged = summary.unstaged.len(),
            untracked = summary.untracked.len(),
            "computed working-tree preview"
        );
        Ok(summary)
    }
}

/// Parse NUL-delimited `--numstat -z` output.
///
/// A plain entry is `<adds>\t<dels>\t<path>`. A rename entry has an empty
/// path field followed by two extra NUL-terminated tokens (source, then
/// destination); the destination is the path that exists in the tree now.
/// Binary files report `-` in both count columns.
fn parse_numstat_entries(output: &str) -> Vec<ChangeEntry> {
    let mut entries = Vec::new();
    let mut tokens = output.split('\0');
    while let Some(token) = tokens.next() {
        if token.is_empty() {
            continue;
        }
        let mut cols = token.splitn(3, '\t');
        let (Some(adds), Some(dels), Some(path)) = (cols.next(), cols.next(), cols.next()) else {
            continue;
        };
        let path = if path.is_empty() {
            // Rename: skip the source token, keep the destination.
            let _source = tokens.next();
            match tokens.next() {
                Some(dest) if !dest.is_empty() => dest,
                _ => continue,
            }
        } else {
            path
        };
        entries.push(ChangeEntry {
            path: path.to_owned(),
            additions: adds.trim().parse().unwrap_or(0),
            deletions: dels.trim().parse().unwrap_or(0),
        });
    }
    entries
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

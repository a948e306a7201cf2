//! Error types for stash-store operations.
//!
//! [`GitError`] is the single error type returned by the
//! [`SnapshotStore`](crate::SnapshotStore) and
//! [`PreviewCalculator`](crate::PreviewCalculator) trait methods. Variants are
//! rich enough that callers can match on failure modes (nothing to save,
//! timeout, command failure) without parsing error messages — with the one
//! deliberate exception of [`GitError::Command`], whose stderr is kept
//! verbatim for the conflict classifier upstream.

use std::path::PathBuf;

use thiserror::Error;

/// Errors returned by stash-store and preview operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// A save found nothing matching the requested layer flags.
    ///
    /// git reports this as a successful exit with "No local changes to save"
    /// on stdout; the store surfaces it as an error because every caller
    /// treats an empty capture as a failed precondition.
    #[error("no local changes to save")]
    NoChanges,

    /// A git invocation exceeded the configured deadline and was killed.
    #[error("`{command}` did not finish within {seconds}s and was killed")]
    Timeout {
        /// The command line that timed out.
        command: String,
        /// The configured deadline in seconds.
        seconds: u64,
    },

    /// A git invocation exited non-zero.
    ///
    /// `stderr` is kept verbatim: the reconciliation layer pattern-matches it
    /// to distinguish overwrite conflicts from unexpected failures.
    #[error("`{command}` failed: {stderr}")]
    Command {
        /// The command line that failed.
        command: String,
        /// Trimmed stderr from git.
        stderr: String,
    },

    /// git output could not be parsed into the expected shape.
    #[error("could not parse {context}: {detail}")]
    Parse {
        /// What was being parsed (e.g. `"stash list entry"`).
        context: String,
        /// The offending input or a description of the mismatch.
        detail: String,
    },

    /// The given path is not inside a git repository.
    #[error("{} is not inside a git repository", path.display())]
    NotARepository {
        /// The path that was probed.
        path: PathBuf,
    },

    /// An I/O error occurred (process spawn, pipe read, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GitError {
    /// The stderr text of a command failure, if this is one.
    #[must_use]
    pub fn command_stderr(&self) -> Option<&str> {
        match self {
            Self::Command { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}

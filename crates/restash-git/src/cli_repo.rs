//! The git-CLI-backed implementation of [`SnapshotStore`](crate::SnapshotStore)
//! and [`PreviewCalculator`](crate::PreviewCalculator).
//!
//! Every operation shells out to `git` with a hard per-invocation deadline.
//! The child's stdout/stderr are drained on separate threads while the parent
//! polls for exit; a child that outlives the deadline is killed and reported
//! as [`GitError::Timeout`].

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::GitError;

/// Poll interval while waiting for a child to exit.
const WAIT_POLL: Duration = Duration::from_millis(25);

/// A stash store backed by the `git` command-line tool.
///
/// Construct via [`GitCli::discover`] (walks up from a path to the repository
/// root) or [`GitCli::open`] (exact root, no discovery). All invocations run
/// with the repository root as the working directory.
pub struct GitCli {
    pub(crate) repo_root: PathBuf,
    pub(crate) timeout: Duration,
}

/// Captured output of a finished git invocation.
pub(crate) struct GitOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

impl GitCli {
    /// Default per-invocation deadline.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// Discover the repository containing `path` and open it.
    ///
    /// # Errors
    /// [`GitError::NotARepository`] if `path` is not inside a git worktree.
    pub fn discover(path: &Path) -> Result<Self, GitError> {
        let out = run_git(path, &["rev-parse", "--show-toplevel"], Self::DEFAULT_TIMEOUT)?;
        if !out.success() {
            return Err(GitError::NotARepository {
                path: path.to_owned(),
            });
        }
        let root = PathBuf::from(out.stdout.trim());
        Ok(Self::open(root))
    }

    /// Open a repository at exactly `repo_root`, with the default deadline.
    #[must_use]
    pub fn open(repo_root: PathBuf) -> Self {
        Self {
            repo_root,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Replace the per-invocation deadline.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The repository root all invocations run in.
    #[must_use]
    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    /// Run git and require a zero exit, returning captured output.
    ///
    /// Non-zero exits become [`GitError::Command`] carrying the trimmed
    /// stderr (falling back to stdout when git wrote its diagnostic there).
    pub(crate) fn run(&self, args: &[&str]) -> Result<GitOutput, GitError> {
        let out = self.run_unchecked(args)?;
        if out.success() {
            return Ok(out);
        }
        let stderr = if out.stderr.trim().is_empty() {
            out.stdout.trim().to_owned()
        } else {
            out.stderr.trim().to_owned()
        };
        Err(GitError::Command {
            command: command_line(args),
            stderr,
        })
    }

    /// Run git and return the output regardless of exit status.
    pub(crate) fn run_unchecked(&self, args: &[&str]) -> Result<GitOutput, GitError> {
        debug!(command = %command_line(args), "running git");
        run_git(&self.repo_root, args, self.timeout)
    }
}

/// Render the invocation for error messages and logs.
pub(crate) fn command_line(args: &[&str]) -> String {
    let mut line = String::from("git");
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

/// Spawn git in `dir`, drain its output, and enforce `timeout`.
fn run_git(dir: &Path, args: &[&str], timeout: Duration) -> Result<GitOutput, GitError> {
    let mut child = Command::new("git")
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    // Drain on threads so a chatty child can't fill a pipe and deadlock the
    // deadline loop.
    let stdout_reader = spawn_drain(child.stdout.take());
    let stderr_reader = spawn_drain(child.stderr.take());

    let status = match wait_with_deadline(&mut child, timeout) {
        Ok(status) => status,
        Err(e) => {
            // The child was killed; the drain threads see EOF and finish.
            join_drain(stdout_reader);
            join_drain(stderr_reader);
            return Err(match e {
                WaitError::Timeout => GitError::Timeout {
                    command: command_line(args),
                    seconds: timeout.as_secs(),
                },
                WaitError::Io(io) => GitError::Io(io),
            });
        }
    };

    let stdout = join_drain(stdout_reader);
    let stderr = join_drain(stderr_reader);

    Ok(GitOutput {
        exit_code: status_code(status),
        stdout,
        stderr,
    })
}

enum WaitError {
    Timeout,
    Io(std::io::Error),
}

/// Poll the child until it exits or the deadline passes; kill on expiry.
fn wait_with_deadline(
    child: &mut Child,
    timeout: Duration,
) -> Result<std::process::ExitStatus, WaitError> {
    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {
                if Instant::now() >= deadline {
                    // Best effort: the process may have exited between the
                    // poll and the kill.
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(WaitError::Timeout);
                }
                thread::sleep(WAIT_POLL);
            }
            Err(e) => return Err(WaitError::Io(e)),
        }
    }
}

fn spawn_drain<R: Read + Send + 'static>(
    reader: Option<R>,
) -> Option<thread::JoinHandle<Vec<u8>>> {
    reader.map(|mut r| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = r.read_to_end(&mut buf);
            buf
        })
    })
}

fn join_drain(handle: Option<thread::JoinHandle<Vec<u8>>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

fn status_code(status: std::process::ExitStatus) -> i32 {
    // None means killed by signal; -1 keeps that distinguishable from any
    // real git exit code.
    status.code().unwrap_or(-1)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_renders_full_invocation() {
        assert_eq!(
            command_line(&["stash", "apply", "stash@{2}"]),
            "git stash apply stash@{2}"
        );
    }

    #[test]
    fn discover_rejects_non_repository() {
        let dir = tempfile::tempdir().unwrap();
        let err = GitCli::discover(dir.path()).unwrap_err();
        assert!(matches!(err, GitError::NotARepository { .. }));
    }

    #[test]
    fn discover_finds_repo_root_from_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        let out = Command::new("git")
            .args(["init"])
            .current_dir(dir.path())
            .output()
            .unwrap();
        assert!(out.status.success());
        let sub = dir.path().join("a/b");
        std::fs::create_dir_all(&sub).unwrap();

        let cli = GitCli::discover(&sub).unwrap();
        assert_eq!(
            cli.repo_root().canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn run_surfaces_stderr_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let out = Command::new("git")
            .args(["init"])
            .current_dir(dir.path())
            .output()
            .unwrap();
        assert!(out.status.success());

        let cli = GitCli::open(dir.path().to_owned());
        let err = cli.run(&["stash", "drop", "stash@{0}"]).unwrap_err();
        match err {
            GitError::Command { command, stderr } => {
                assert!(command.contains("stash drop"));
                assert!(!stderr.is_empty());
            }
            other => panic!("expected Command error, got {other:?}"),
        }
    }
}

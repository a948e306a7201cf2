//! Shared test helpers for restash integration tests.
//!
//! All tests use temp directories — no side effects on the real repo. Each
//! test gets its own git repo with a committed baseline via
//! [`TestRepo::new`].

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

/// A throwaway git repository with identity configured and one initial
/// commit, plus helpers to run git and the compiled `restash` binary in it.
pub struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    /// Create a fresh repo containing a committed `base.txt`.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let repo = Self { dir };
        repo.git(&["init", "-b", "main"]);
        repo.git(&["config", "user.name", "test"]);
        repo.git(&["config", "user.email", "test@example.com"]);
        repo.write("base.txt", "line one\nline two\n");
        repo.git(&["add", "."]);
        repo.git(&["commit", "-m", "initial commit"]);
        repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file relative to the repo root, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create parent dirs");
        }
        std::fs::write(path, content).expect("failed to write file");
    }

    /// Read a file relative to the repo root; `None` if it does not exist.
    pub fn read(&self, rel: &str) -> Option<String> {
        std::fs::read_to_string(self.dir.path().join(rel)).ok()
    }

    /// Write and commit a set of files.
    pub fn commit_files(&self, files: &[(&str, &str)], message: &str) {
        for (rel, content) in files {
            self.write(rel, content);
        }
        self.git(&["add", "."]);
        self.git(&["commit", "-m", message]);
    }

    /// Run git in the repo, asserting success; returns stdout.
    pub fn git(&self, args: &[&str]) -> String {
        let out = Command::new("git")
            .args(args)
            .current_dir(self.dir.path())
            .output()
            .expect("failed to run git");
        assert!(
            out.status.success(),
            "git {args:?} failed: {}",
            String::from_utf8_lossy(&out.stderr)
        );
        String::from_utf8_lossy(&out.stdout).into_owned()
    }

    /// Run the compiled `restash` binary in the repo, returning raw output.
    pub fn restash(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_restash"))
            .args(args)
            .current_dir(self.dir.path())
            .output()
            .expect("failed to run restash")
    }

    /// Run `restash`, asserting success; returns stdout.
    pub fn restash_ok(&self, args: &[&str]) -> String {
        let out = self.restash(args);
        assert!(
            out.status.success(),
            "restash {args:?} failed:\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&out.stdout),
            String::from_utf8_lossy(&out.stderr)
        );
        String::from_utf8_lossy(&out.stdout).into_owned()
    }
}

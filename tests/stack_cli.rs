//! Integration tests for the `restash` binary.

mod common;

use common::TestRepo;

#[test]
fn save_list_drop_round_trip() {
    let repo = TestRepo::new();
    repo.write("base.txt", "line one\nline two\nedited\n");

    let out = repo.restash_ok(&["save", "checkpoint"]);
    assert!(out.contains("Saved 'checkpoint' at position 0."));

    let json = repo.restash_ok(&["list", "--format", "json"]);
    let parsed: serde_json::Value = serde_json::from_str(&json).expect("list --format json");
    let snapshots = parsed["snapshots"].as_array().expect("snapshots array");
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0]["position"], 0);
    assert_eq!(snapshots[0]["label"], "checkpoint");
    assert_eq!(snapshots[0]["origin_branch"], "main");

    let out = repo.restash_ok(&["drop", "0", "--force"]);
    assert!(out.contains("Dropped 'checkpoint'."));

    let out = repo.restash_ok(&["list"]);
    assert!(out.contains("No snapshots in the stack."));
}

#[test]
fn save_on_clean_tree_fails_with_guidance() {
    let repo = TestRepo::new();

    let out = repo.restash(&["save", "nothing"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Nothing to save"), "stderr: {stderr}");
}

#[test]
fn status_json_shape() {
    let repo = TestRepo::new();
    repo.write("base.txt", "line one\nline two\nedited\n");
    repo.git(&["add", "base.txt"]);
    repo.write("loose.txt", "untracked\n");

    let json = repo.restash_ok(&["status", "--format", "json"]);
    let parsed: serde_json::Value = serde_json::from_str(&json).expect("status --format json");
    assert_eq!(parsed["staged"][0]["path"], "base.txt");
    assert!(parsed["unstaged"].as_array().expect("unstaged").is_empty());
    assert_eq!(parsed["untracked"][0], "loose.txt");
    assert_eq!(parsed["mixed"], false);
}

#[test]
fn apply_keeps_the_snapshot_pop_removes_it() {
    let repo = TestRepo::new();
    repo.write("base.txt", "line one\nline two\nedited\n");
    repo.restash_ok(&["save", "one"]);

    repo.restash_ok(&["apply", "0"]);
    let json = repo.restash_ok(&["list", "--format", "json"]);
    let parsed: serde_json::Value = serde_json::from_str(&json).expect("json");
    assert_eq!(parsed["snapshots"].as_array().expect("snapshots").len(), 1);

    // Undo the applied edit so pop merges cleanly.
    repo.git(&["checkout", "--", "base.txt"]);
    repo.restash_ok(&["pop", "0"]);
    let out = repo.restash_ok(&["list"]);
    assert!(out.contains("No snapshots in the stack."));
    assert_eq!(
        repo.read("base.txt").as_deref(),
        Some("line one\nline two\nedited\n")
    );
}

#[test]
fn drop_out_of_range_names_the_stack_size() {
    let repo = TestRepo::new();

    let out = repo.restash(&["drop", "4", "--force"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("No snapshot at position 4"), "stderr: {stderr}");
    assert!(stderr.contains("restash list"), "stderr: {stderr}");
}

#[test]
fn merge_end_to_end_through_the_binary() {
    let repo = TestRepo::new();

    repo.write("base.txt", "line one\nline two\nfrom A\n");
    repo.restash_ok(&["save", "A"]);

    repo.write("x.txt", "new work\n");
    repo.git(&["add", "x.txt"]);

    let out = repo.restash_ok(&["merge", "0", "-m", "A", "--yes"]);
    assert!(out.contains("Merged the working changes into 'A'"), "stdout: {out}");
    assert!(out.contains("Snapshot stack now has 1 entry."), "refresh line: {out}");

    let json = repo.restash_ok(&["list", "--format", "json"]);
    let parsed: serde_json::Value = serde_json::from_str(&json).expect("json");
    let snapshots = parsed["snapshots"].as_array().expect("snapshots");
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0]["label"], "A");
    assert_eq!(snapshots[0]["file_count"], 2);
}

#[test]
fn merge_on_clean_tree_fails_before_prompting() {
    let repo = TestRepo::new();
    repo.write("base.txt", "line one\nline two\nedited\n");
    repo.restash_ok(&["save", "A"]);

    // No --yes: the precondition check must fire before any prompt would.
    let out = repo.restash(&["merge", "0", "-m", "A"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("no uncommitted changes"), "stderr: {stderr}");
}

#[test]
fn config_timeout_is_honored() {
    let repo = TestRepo::new();
    repo.write(".restash.toml", "[git]\ntimeout_seconds = 30\n");
    repo.write("base.txt", "line one\nline two\nedited\n");

    // Just exercises the load path; a bad config must fail loudly instead.
    repo.restash_ok(&["save", "with-config"]);

    repo.write(".restash.toml", "nonsense = true\n");
    let out = repo.restash(&["list"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("unknown field"), "stderr: {stderr}");
}

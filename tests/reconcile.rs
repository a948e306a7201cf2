//! End-to-end reconciliation tests against real git repositories.
//!
//! These drive `ReconciliationEngine` through the CLI-backed store, so they
//! exercise the position arithmetic, the compensation paths, and git's
//! actual conflict behavior rather than a model of it.

mod common;

use common::TestRepo;
use restash_core::{ErrorKind, ReconciliationEngine};
use restash_git::{GitCli, SaveFlags, SnapshotStore};

fn store_for(repo: &TestRepo) -> GitCli {
    GitCli::open(repo.path().to_owned())
}

#[test]
fn merge_staged_file_into_snapshot_conserves_stack_size() {
    let repo = TestRepo::new();
    let store = store_for(&repo);

    // Snapshot "A": a modification to the committed base file.
    repo.write("base.txt", "line one\nline two\nfrom A\n");
    store.save("A", SaveFlags::all_layers()).unwrap();

    // The working tree gains one staged new file.
    repo.write("x.txt", "new work\n");
    repo.git(&["add", "x.txt"]);

    let engine = ReconciliationEngine::new(&store, &store);
    engine.merge_working_changes_into_snapshot(0, "A").unwrap();

    // One net insert, one net removal: the stack is still one entry, still
    // labeled "A", now holding the union of both change sets.
    let stack = store.list().unwrap();
    assert_eq!(stack.len(), 1);
    assert_eq!(stack[0].position, 0);
    assert_eq!(stack[0].label, "A");
    assert_eq!(stack[0].file_count, 2);

    // The tree was left clean; popping the union materializes both changes.
    assert_eq!(repo.read("base.txt").as_deref(), Some("line one\nline two\n"));
    assert!(repo.read("x.txt").is_none());
    store.apply_and_discard(0).unwrap();
    assert_eq!(
        repo.read("base.txt").as_deref(),
        Some("line one\nline two\nfrom A\n")
    );
    assert_eq!(repo.read("x.txt").as_deref(), Some("new work\n"));
}

#[test]
fn merge_targets_deep_position_and_preserves_the_rest() {
    let repo = TestRepo::new();
    let store = store_for(&repo);

    // Three snapshots; the target sits at the bottom of the stack.
    repo.write("deep.txt", "deep\n");
    store.save("deep", SaveFlags::all_layers()).unwrap();
    repo.write("mid.txt", "mid\n");
    store.save("mid", SaveFlags::all_layers()).unwrap();
    repo.write("top.txt", "top\n");
    store.save("top", SaveFlags::all_layers()).unwrap();

    repo.write("extra.txt", "extra\n");
    repo.git(&["add", "extra.txt"]);

    let engine = ReconciliationEngine::new(&store, &store);
    engine.merge_working_changes_into_snapshot(2, "deep").unwrap();

    let stack = store.list().unwrap();
    let labels: Vec<&str> = stack.iter().map(|s| s.label.as_str()).collect();
    // The combined snapshot lands at position 0; the untouched entries keep
    // their relative order below it.
    assert_eq!(labels, vec!["deep", "top", "mid"]);
    assert_eq!(stack[0].file_count, 2, "deep.txt + extra.txt");
}

#[test]
fn conflict_at_apply_restores_the_original_stack() {
    let repo = TestRepo::new();
    let store = store_for(&repo);

    // Snapshot "A" carries an untracked file...
    repo.write("notes.txt", "from A\n");
    store.save("A", SaveFlags::all_layers()).unwrap();

    // ...which later becomes a committed file with different content, so
    // restoring A's untracked layer must collide. git aborts the apply
    // before touching the tracked layer, leaving the tree untouched.
    repo.commit_files(&[("notes.txt", "committed\n")], "track notes");

    // An unrelated staged file satisfies the engine's precondition.
    repo.write("other.txt", "unrelated\n");
    repo.git(&["add", "other.txt"]);

    let engine = ReconciliationEngine::new(&store, &store);
    let err = engine
        .merge_working_changes_into_snapshot(0, "combined")
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Conflict);

    // The stack is identical by label and position: the temp capture was
    // popped back, the target was never discarded, no combined snapshot
    // exists.
    let stack = store.list().unwrap();
    assert_eq!(stack.len(), 1);
    assert_eq!(stack[0].position, 0);
    assert_eq!(stack[0].label, "A");

    // The tree is back where it started: the colliding file untouched, the
    // unrelated dirty file restored.
    assert_eq!(repo.read("notes.txt").as_deref(), Some("committed\n"));
    assert_eq!(repo.read("other.txt").as_deref(), Some("unrelated\n"));
}

#[test]
fn clean_tree_reports_no_changes_and_touches_nothing() {
    let repo = TestRepo::new();
    let store = store_for(&repo);

    repo.write("base.txt", "line one\nline two\nwip\n");
    store.save("A", SaveFlags::all_layers()).unwrap();

    let engine = ReconciliationEngine::new(&store, &store);
    let err = engine
        .merge_working_changes_into_snapshot(0, "A")
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NoChanges);
    let stack = store.list().unwrap();
    assert_eq!(stack.len(), 1);
    assert_eq!(stack[0].label, "A");
}

#[test]
fn untracked_files_survive_the_merge() {
    let repo = TestRepo::new();
    let store = store_for(&repo);

    // The target snapshot carries an untracked layer.
    repo.write("loose_a.txt", "from A\n");
    store.save("A", SaveFlags::all_layers()).unwrap();
    let stack = store.list().unwrap();
    assert!(stack[0].has_untracked_layer);

    // New untracked work in the tree.
    repo.write("loose_b.txt", "new\n");

    let engine = ReconciliationEngine::new(&store, &store);
    engine.merge_working_changes_into_snapshot(0, "A").unwrap();

    let stack = store.list().unwrap();
    assert_eq!(stack.len(), 1);
    assert!(stack[0].has_untracked_layer, "untracked layer not dropped");

    store.apply_and_discard(0).unwrap();
    assert_eq!(repo.read("loose_a.txt").as_deref(), Some("from A\n"));
    assert_eq!(repo.read("loose_b.txt").as_deref(), Some("new\n"));
}

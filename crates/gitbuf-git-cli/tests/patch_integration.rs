use gitbuf_core::domain::DiffArea;
use gitbuf_core::patch;
use gitbuf_core::services::{ApplyLocation, GitBackend};
use gitbuf_git_cli::CliBackend;
use std::fs;
use std::path::Path;
use std::process::Command;

fn run_git(repo: &Path, args: &[&str]) {
    let status = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(args)
        .status()
        .expect("git command to run");
    assert!(status.success(), "git {:?} failed", args);
}

fn init_repo(repo: &Path) {
    run_git(repo, &["init", "-b", "main"]);
    run_git(repo, &["config", "user.email", "you@example.com"]);
    run_git(repo, &["config", "user.name", "You"]);
    run_git(repo, &["config", "commit.gpgsign", "false"]);
}

#[test]
fn whole_hunk_patch_stages_and_unstages() {
    let dir = tempfile::tempdir().unwrap();
    let repo = dir.path();
    init_repo(repo);

    fs::write(repo.join("a.txt"), "one\ntwo\nthree\n").unwrap();
    run_git(repo, &["add", "a.txt"]);
    run_git(repo, &["commit", "-m", "init"]);

    fs::write(repo.join("a.txt"), "one\ntwo changed\nthree\n").unwrap();

    let backend = CliBackend::default();
    let opened = backend.open(repo).unwrap();

    let unstaged = opened.diff_files(DiffArea::Unstaged).unwrap();
    let patch_text = patch::hunk_patch(&unstaged[0], &unstaged[0].hunks[0]);

    // Stage the hunk.
    let output = opened
        .apply_patch(&patch_text, ApplyLocation::Index, false)
        .unwrap();
    assert!(output.ok(), "apply --cached failed: {}", output.stderr);
    assert!(opened.diff_files(DiffArea::Unstaged).unwrap().is_empty());
    assert_eq!(opened.diff_files(DiffArea::Staged).unwrap().len(), 1);

    // Unstage it again with the same patch text reversed at apply time.
    let output = opened
        .apply_patch(&patch_text, ApplyLocation::Index, true)
        .unwrap();
    assert!(
        output.ok(),
        "apply --cached --reverse failed: {}",
        output.stderr
    );
    assert!(opened.diff_files(DiffArea::Staged).unwrap().is_empty());
    assert_eq!(opened.diff_files(DiffArea::Unstaged).unwrap().len(), 1);
}

#[test]
fn region_patch_stages_a_single_added_line() {
    let dir = tempfile::tempdir().unwrap();
    let repo = dir.path();
    init_repo(repo);

    fs::write(repo.join("a.txt"), "one\nfour\n").unwrap();
    run_git(repo, &["add", "a.txt"]);
    run_git(repo, &["commit", "-m", "init"]);

    // Two added lines in one hunk.
    fs::write(repo.join("a.txt"), "one\ntwo\nthree\nfour\n").unwrap();

    let backend = CliBackend::default();
    let opened = backend.open(repo).unwrap();

    let unstaged = opened.diff_files(DiffArea::Unstaged).unwrap();
    let file = &unstaged[0];
    let hunk = &file.hunks[0];
    let added_ix = hunk
        .lines
        .iter()
        .position(|l| l == "+two")
        .expect("+two in hunk");

    let region = patch::region_patch(file, hunk, added_ix, added_ix, false).expect("region patch");
    let output = opened
        .apply_patch(&region, ApplyLocation::Index, false)
        .unwrap();
    assert!(output.ok(), "apply --cached failed: {}", output.stderr);

    // Only "two" is staged; "three" remains a worktree-only addition.
    let staged = opened.diff_files(DiffArea::Staged).unwrap();
    let staged_lines: Vec<&String> = staged[0].hunks.iter().flat_map(|h| &h.lines).collect();
    assert!(staged_lines.iter().any(|l| *l == "+two"));
    assert!(!staged_lines.iter().any(|l| *l == "+three"));

    let unstaged = opened.diff_files(DiffArea::Unstaged).unwrap();
    let unstaged_lines: Vec<&String> = unstaged[0].hunks.iter().flat_map(|h| &h.lines).collect();
    assert!(unstaged_lines.iter().any(|l| *l == "+three"));
}

#[test]
fn hunk_discard_reverse_applies_against_the_worktree() {
    let dir = tempfile::tempdir().unwrap();
    let repo = dir.path();
    init_repo(repo);

    fs::write(repo.join("a.txt"), "one\ntwo\n").unwrap();
    run_git(repo, &["add", "a.txt"]);
    run_git(repo, &["commit", "-m", "init"]);

    fs::write(repo.join("a.txt"), "one\ntwo edited\n").unwrap();

    let backend = CliBackend::default();
    let opened = backend.open(repo).unwrap();

    let unstaged = opened.diff_files(DiffArea::Unstaged).unwrap();
    let patch_text = patch::hunk_patch(&unstaged[0], &unstaged[0].hunks[0]);

    let output = opened
        .apply_patch(&patch_text, ApplyLocation::Worktree, true)
        .unwrap();
    assert!(output.ok(), "apply --reverse failed: {}", output.stderr);

    assert_eq!(
        fs::read_to_string(repo.join("a.txt")).unwrap(),
        "one\ntwo\n"
    );
    assert!(opened.diff_files(DiffArea::Unstaged).unwrap().is_empty());
}

//! End-to-end: a real repository, the CLI backend, and the full store
//! loop from open to rendered status.

use gitbuf_core::services::GitBackend;
use gitbuf_git_cli::CliBackend;
use gitbuf_state::{AppStore, Config, Msg, StoreEvent};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

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

fn wait_for_refresh(events: &mpsc::Receiver<StoreEvent>) -> bool {
    let start = Instant::now();
    while start.elapsed() < Duration::from_secs(15) {
        match events.recv_timeout(Duration::from_millis(100)) {
            Ok(StoreEvent::StatusRefreshed { .. }) => return true,
            Ok(_) => continue,
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(e) => panic!("event channel closed: {e:?}"),
        }
    }
    false
}

#[test]
fn open_refreshes_and_renders_the_status_buffer() {
    let dir = tempfile::tempdir().unwrap();
    let repo = dir.path();
    init_repo(repo);

    fs::write(repo.join("a.txt"), "one\n").unwrap();
    run_git(repo, &["add", "a.txt"]);
    run_git(repo, &["commit", "-m", "first commit"]);

    fs::write(repo.join("a.txt"), "one\ntwo\n").unwrap();
    fs::write(repo.join("b.txt"), "untracked\n").unwrap();

    let backend: Arc<dyn GitBackend> = Arc::new(CliBackend::default());
    let (store, events) = AppStore::new(backend, Config::default());

    store.dispatch(Msg::OpenStatusBuffer(repo.to_path_buf()));
    assert!(wait_for_refresh(&events), "no StatusRefreshed event");

    let state = store.snapshot();
    assert_eq!(state.buffers.len(), 1);
    let buffer = &state.buffers[0];
    let text = &buffer.rendered.text;

    assert!(text.starts_with("Head: main ("), "unexpected header: {text}");
    assert!(text.contains("Untracked files (1)"));
    assert!(text.contains("  b.txt"));
    assert!(text.contains("Unstaged changes (1)"));
    assert!(text.contains("  modified  a.txt"));
    assert!(text.contains("Recent commits (1)"));
    assert!(text.contains("first commit"));
    assert!(!buffer.refresh_pending);
}

#[test]
fn staging_a_file_through_the_store_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let repo = dir.path();
    init_repo(repo);

    fs::write(repo.join("a.txt"), "one\n").unwrap();
    run_git(repo, &["add", "a.txt"]);
    run_git(repo, &["commit", "-m", "first commit"]);
    fs::write(repo.join("a.txt"), "one\ntwo\n").unwrap();

    let backend: Arc<dyn GitBackend> = Arc::new(CliBackend::default());
    let (store, events) = AppStore::new(backend, Config::default());

    store.dispatch(Msg::OpenStatusBuffer(repo.to_path_buf()));
    assert!(wait_for_refresh(&events));

    let state = store.snapshot();
    let buffer = &state.buffers[0];
    let line = buffer
        .rendered
        .text
        .lines()
        .position(|l| l.contains("modified  a.txt"))
        .expect("unstaged row");

    store.dispatch(Msg::StageAtPoint {
        id: buffer.id,
        line,
    });
    // The stage completion schedules a reconciling refresh.
    assert!(wait_for_refresh(&events), "no refresh after staging");

    let state = store.snapshot();
    let text = &state.buffers[0].rendered.text;
    assert!(text.contains("Staged changes (1)"), "status: {text}");
    assert!(!text.contains("Unstaged changes"), "status: {text}");
}

#[test]
fn opening_a_non_repository_creates_no_buffer() {
    let dir = tempfile::tempdir().unwrap();

    let backend: Arc<dyn GitBackend> = Arc::new(CliBackend::default());
    let (store, events) = AppStore::new(backend, Config::default());

    store.dispatch(Msg::OpenStatusBuffer(dir.path().to_path_buf()));

    let start = Instant::now();
    let mut saw_message = false;
    while start.elapsed() < Duration::from_secs(15) && !saw_message {
        match events.recv_timeout(Duration::from_millis(100)) {
            Ok(StoreEvent::UserMessage { message }) => {
                assert!(message.contains("git repository"), "message: {message}");
                saw_message = true;
            }
            Ok(_) => continue,
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(e) => panic!("event channel closed: {e:?}"),
        }
    }

    assert!(saw_message, "expected a user message");
    assert!(store.snapshot().buffers.is_empty());
}

#[test]
fn repo_root_is_detected_from_a_subdirectory() {
    let dir = tempfile::tempdir().unwrap();
    let repo = dir.path();
    init_repo(repo);

    fs::create_dir_all(repo.join("src")).unwrap();
    fs::write(repo.join("src/lib.rs"), "fn x() {}\n").unwrap();
    run_git(repo, &["add", "."]);
    run_git(repo, &["commit", "-m", "init"]);

    let backend: Arc<dyn GitBackend> = Arc::new(CliBackend::default());
    let (store, events) = AppStore::new(backend, Config::default());

    store.dispatch(Msg::OpenStatusBuffer(repo.join("src")));
    assert!(wait_for_refresh(&events));

    let state = store.snapshot();
    let root: PathBuf = state.buffers[0].git_root.clone();
    assert_eq!(
        root.canonicalize().unwrap(),
        repo.canonicalize().unwrap()
    );
}

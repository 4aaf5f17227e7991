use crate::model::BufferId;
use crate::msg::{Effect, Msg, SnapshotData, SnapshotSlot};
use gitbuf_core::domain::DiffArea;
use gitbuf_core::services::{GitBackend, GitRepository};
use std::collections::HashMap;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;
use tracing::debug;

use super::executor::TaskExecutor;

pub(super) fn schedule_effect(
    executor: &TaskExecutor,
    backend: &Arc<dyn GitBackend>,
    repos: &HashMap<BufferId, Arc<dyn GitRepository>>,
    msg_tx: mpsc::Sender<Msg>,
    effect: Effect,
) {
    debug!(target: "gitbuf::store", ?effect, "scheduling effect");

    match effect {
        Effect::OpenRepo { id, path } => {
            let backend = Arc::clone(backend);
            executor.spawn(move || {
                let result = backend.open(&path);
                let _ = msg_tx.send(Msg::RepoOpened { id, result });
            });
        }

        Effect::ResolveUpstream { id } => {
            if let Some(repo) = repos.get(&id).cloned() {
                executor.spawn(move || {
                    let upstream = repo.upstream_ref().unwrap_or_default();
                    let push_remote = repo.push_remote_ref().unwrap_or_default();
                    let _ = msg_tx.send(Msg::UpstreamResolved {
                        id,
                        upstream,
                        push_remote,
                    });
                });
            }
        }

        Effect::LoadSnapshot {
            id,
            slot,
            range,
            limit,
        } => {
            if let Some(repo) = repos.get(&id).cloned() {
                executor.spawn(move || {
                    let result = match slot {
                        SnapshotSlot::Status => {
                            repo.status_snapshot().map(SnapshotData::Status)
                        }
                        SnapshotSlot::DiffUnstaged => {
                            repo.diff_files(DiffArea::Unstaged).map(SnapshotData::Diffs)
                        }
                        SnapshotSlot::DiffStaged => {
                            repo.diff_files(DiffArea::Staged).map(SnapshotData::Diffs)
                        }
                        SnapshotSlot::Log => {
                            repo.recent_commits(limit).map(SnapshotData::Commits)
                        }
                        SnapshotSlot::Stashes => repo.stash_list().map(SnapshotData::Stashes),
                        SnapshotSlot::Unpushed | SnapshotSlot::Unpulled => {
                            let range = range.unwrap_or_default();
                            repo.commits_in_range(&range, limit)
                                .map(SnapshotData::Commits)
                        }
                    };
                    let _ = msg_tx.send(Msg::SnapshotLoaded { id, slot, result });
                });
            }
        }

        Effect::LoadBranches { id } => {
            if let Some(repo) = repos.get(&id).cloned() {
                executor.spawn(move || {
                    let result = repo.branch_list();
                    let _ = msg_tx.send(Msg::BranchesLoaded { id, result });
                });
            }
        }

        Effect::LoadCommitDiff { id, hash } => {
            if let Some(repo) = repos.get(&id).cloned() {
                executor.spawn(move || {
                    let result = repo.commit_diff(&hash);
                    let _ = msg_tx.send(Msg::CommitDiffLoaded { id, hash, result });
                });
            }
        }

        Effect::LoadBlob {
            id,
            reference,
            path,
            title,
            line,
        } => {
            if let Some(repo) = repos.get(&id).cloned() {
                executor.spawn(move || {
                    let result = repo.show_file(&reference, &path);
                    let _ = msg_tx.send(Msg::BlobLoaded {
                        id,
                        title,
                        line,
                        result,
                    });
                });
            }
        }

        Effect::StagePaths { id, paths } => {
            if let Some(repo) = repos.get(&id).cloned() {
                executor.spawn(move || {
                    let result = repo.stage_paths(&paths);
                    let _ = msg_tx.send(Msg::CommandFinished {
                        id,
                        kind: crate::msg::CommandKind::StagePaths,
                        result,
                    });
                });
            }
        }

        Effect::UnstagePaths { id, paths } => {
            if let Some(repo) = repos.get(&id).cloned() {
                executor.spawn(move || {
                    let result = repo.unstage_paths(&paths);
                    let _ = msg_tx.send(Msg::CommandFinished {
                        id,
                        kind: crate::msg::CommandKind::UnstagePaths,
                        result,
                    });
                });
            }
        }

        Effect::CheckoutPaths { id, paths } => {
            if let Some(repo) = repos.get(&id).cloned() {
                executor.spawn(move || {
                    let result = repo.checkout_paths(&paths);
                    let _ = msg_tx.send(Msg::CommandFinished {
                        id,
                        kind: crate::msg::CommandKind::DiscardPaths,
                        result,
                    });
                });
            }
        }

        Effect::DeleteUntracked { id, paths } => {
            if let Some(repo) = repos.get(&id).cloned() {
                executor.spawn(move || {
                    let result = repo.delete_untracked(&paths);
                    let _ = msg_tx.send(Msg::CommandFinished {
                        id,
                        kind: crate::msg::CommandKind::DeleteUntracked,
                        result,
                    });
                });
            }
        }

        Effect::ApplyPatch {
            id,
            patch,
            location,
            reverse,
            kind,
        } => {
            if let Some(repo) = repos.get(&id).cloned() {
                executor.spawn(move || {
                    let result = repo.apply_patch(&patch, location, reverse);
                    let _ = msg_tx.send(Msg::CommandFinished { id, kind, result });
                });
            }
        }

        Effect::RunCommand { id, args, kind } => {
            if let Some(repo) = repos.get(&id).cloned() {
                executor.spawn(move || {
                    let result = repo.run_command(&args);
                    let _ = msg_tx.send(Msg::CommandFinished { id, kind, result });
                });
            }
        }

        Effect::Debounce {
            id,
            generation,
            delay_ms,
        } => {
            executor.spawn(move || {
                thread::sleep(Duration::from_millis(delay_ms));
                let _ = msg_tx.send(Msg::DebounceElapsed { id, generation });
            });
        }
    }
}

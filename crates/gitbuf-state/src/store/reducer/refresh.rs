use super::{push_diagnostic, rerender};
use crate::model::{AppState, BufferId, DiagnosticKind, GitData, RefreshGather};
use crate::msg::{CommandKind, Effect, SnapshotData, SnapshotSlot, StoreEvent};
use gitbuf_core::error::Error;
use gitbuf_core::services::CommandOutput;
use std::path::PathBuf;
use std::sync::Arc;

/// Start a refresh round unless one is already in flight (single-flight).
pub(super) fn begin(state: &mut AppState, id: BufferId) -> Vec<Effect> {
    let Some(buffer) = state.buffer_mut(id) else {
        return Vec::new();
    };
    if buffer.refresh_pending {
        return Vec::new();
    }
    buffer.refresh_pending = true;
    vec![Effect::ResolveUpstream { id }]
}

/// The upstream is known; fan out every snapshot command concurrently.
pub(super) fn plan(
    state: &mut AppState,
    id: BufferId,
    upstream: Option<String>,
    push_remote: Option<String>,
) -> Vec<Effect> {
    let limit = state.config.log_max_count;
    let Some(buffer) = state.buffer_mut(id) else {
        return Vec::new();
    };
    if !buffer.refresh_pending {
        return Vec::new();
    }

    let mut gather = RefreshGather::default();
    gather.data.upstream = upstream.clone();
    gather.data.push_remote = push_remote;

    let mut effects = Vec::new();
    for slot in [
        SnapshotSlot::Status,
        SnapshotSlot::DiffUnstaged,
        SnapshotSlot::DiffStaged,
        SnapshotSlot::Log,
        SnapshotSlot::Stashes,
    ] {
        gather.expected |= slot.mask();
        effects.push(Effect::LoadSnapshot {
            id,
            slot,
            range: None,
            limit,
        });
    }
    if let Some(upstream) = upstream {
        for (slot, range) in [
            (SnapshotSlot::Unpushed, format!("{upstream}..HEAD")),
            (SnapshotSlot::Unpulled, format!("HEAD..{upstream}")),
        ] {
            gather.expected |= slot.mask();
            effects.push(Effect::LoadSnapshot {
                id,
                slot,
                range: Some(range),
                limit,
            });
        }
    }

    buffer.gather = Some(gather);
    effects
}

/// Collect one completion; render only once every expected slot has
/// arrived. A failed slot degrades to empty.
pub(super) fn snapshot_loaded(
    state: &mut AppState,
    id: BufferId,
    slot: SnapshotSlot,
    result: Result<SnapshotData, Error>,
    events: &mut Vec<StoreEvent>,
) -> Vec<Effect> {
    let Some(buffer) = state.buffer_mut(id) else {
        return Vec::new();
    };
    let Some(gather) = buffer.gather.as_mut() else {
        return Vec::new();
    };
    if gather.expected & slot.mask() == 0 {
        return Vec::new();
    }

    let failure = match result {
        Ok(data) => {
            store_slot(&mut gather.data, slot, data);
            None
        }
        Err(error) => Some(format!("{} snapshot failed: {error}", slot.label())),
    };
    gather.expected &= !slot.mask();
    let done = gather.expected == 0;

    if let Some(message) = failure {
        push_diagnostic(buffer, DiagnosticKind::Warning, message);
    }
    if !done {
        return Vec::new();
    }

    let gather = buffer.gather.take().expect("gather checked above");
    buffer.git_data = Some(Arc::new(gather.data));
    rerender(buffer);
    buffer.refresh_pending = false;
    events.push(StoreEvent::StatusRefreshed { id });
    Vec::new()
}

fn store_slot(data: &mut GitData, slot: SnapshotSlot, payload: SnapshotData) {
    match (slot, payload) {
        (SnapshotSlot::Status, SnapshotData::Status(status)) => data.status = status,
        (SnapshotSlot::DiffUnstaged, SnapshotData::Diffs(diffs)) => data.unstaged = diffs,
        (SnapshotSlot::DiffStaged, SnapshotData::Diffs(diffs)) => data.staged = diffs,
        (SnapshotSlot::Log, SnapshotData::Commits(commits)) => data.log = commits,
        (SnapshotSlot::Stashes, SnapshotData::Stashes(stashes)) => data.stashes = stashes,
        (SnapshotSlot::Unpushed, SnapshotData::Commits(commits)) => data.unpushed = commits,
        (SnapshotSlot::Unpulled, SnapshotData::Commits(commits)) => data.unpulled = commits,
        _ => {}
    }
}

/// `after-save`: bump the generation and schedule a debounce tick. The
/// last save within the interval wins.
pub(super) fn file_saved(state: &mut AppState, path: PathBuf) -> Vec<Effect> {
    let delay_ms = state.config.refresh_debounce_ms;
    let Some(buffer) = state
        .buffers
        .iter_mut()
        .find(|b| path.starts_with(&b.git_root))
    else {
        return Vec::new();
    };
    buffer.refresh_generation += 1;
    vec![Effect::Debounce {
        id: buffer.id,
        generation: buffer.refresh_generation,
        delay_ms,
    }]
}

pub(super) fn debounce_elapsed(state: &mut AppState, id: BufferId, generation: u64) -> Vec<Effect> {
    let Some(buffer) = state.buffer(id) else {
        return Vec::new();
    };
    if buffer.refresh_generation != generation {
        // A newer save superseded this tick.
        return Vec::new();
    }
    begin(state, id)
}

pub(super) fn command_finished(
    state: &mut AppState,
    id: BufferId,
    kind: CommandKind,
    result: Result<CommandOutput, Error>,
    events: &mut Vec<StoreEvent>,
) -> Vec<Effect> {
    let Some(buffer) = state.buffer_mut(id) else {
        return Vec::new();
    };

    match result {
        Err(error) => {
            push_diagnostic(
                buffer,
                DiagnosticKind::Error,
                format!("{}: {error}", kind.label()),
            );
            events.push(StoreEvent::UserMessage {
                message: format!("{} failed: {error}", kind.label()),
            });
        }
        Ok(output) => {
            if output.ok() {
                if kind.is_hunk_op() {
                    buffer.selection = None;
                }
                match &kind {
                    CommandKind::Commit => events.push(StoreEvent::CommitFinished {
                        id,
                        exit: output.exit,
                    }),
                    CommandKind::ShowCommit { hash } => events.push(StoreEvent::VisitDiff {
                        title: hash.clone(),
                        text: output.stdout.clone(),
                    }),
                    CommandKind::StashShow { reference } => events.push(StoreEvent::VisitDiff {
                        title: reference.clone(),
                        text: output.stdout.clone(),
                    }),
                    CommandKind::Log | CommandKind::Diff | CommandKind::StashList => {
                        events.push(StoreEvent::VisitDiff {
                            title: kind.label().to_string(),
                            text: output.stdout.clone(),
                        })
                    }
                    _ => {}
                }
                if kind.changes_worktree() {
                    events.push(StoreEvent::RevertFileBuffers);
                }
            } else {
                let first = output.first_error_line().to_string();
                push_diagnostic(
                    buffer,
                    DiagnosticKind::Error,
                    format!("{}: {first}", kind.label()),
                );
                events.push(StoreEvent::UserMessage {
                    message: format!("{} failed: {first}", kind.label()),
                });
            }
            events.push(StoreEvent::CommandFinished {
                id,
                kind: kind.clone(),
                exit: output.exit,
            });
        }
    }

    // Mutations always reconcile the buffer with a refresh, success or
    // not.
    if kind.refreshes_status() {
        begin(state, id)
    } else {
        Vec::new()
    }
}

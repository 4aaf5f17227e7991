use crate::model::{
    AppState, BufferId, DiagnosticEntry, DiagnosticKind, LineSelection, StatusBuffer,
};
use crate::msg::{Effect, Msg, StoreEvent};
use crate::render::{render_status, ViewState};
use gitbuf_core::services::GitRepository;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

mod ops;
mod refresh;
mod view;

pub(super) fn reduce(
    repos: &mut HashMap<BufferId, Arc<dyn GitRepository>>,
    id_alloc: &AtomicU64,
    state: &mut AppState,
    msg: Msg,
    events: &mut Vec<StoreEvent>,
) -> Vec<Effect> {
    match msg {
        Msg::OpenStatusBuffer(path) => {
            // One status buffer per git root; reuse an existing one when
            // the path falls under a known repository.
            if let Some(id) = state
                .buffers
                .iter()
                .find(|b| path.starts_with(&b.git_root))
                .map(|b| b.id)
            {
                state.active = Some(id);
                return refresh::begin(state, id);
            }
            let id = BufferId(id_alloc.fetch_add(1, Ordering::Relaxed));
            vec![Effect::OpenRepo { id, path }]
        }

        Msg::RepoOpened { id, result } => match result {
            Ok(repo) => {
                let root = repo.root().to_path_buf();
                if let Some(existing) = state
                    .buffers
                    .iter()
                    .find(|b| b.git_root == root)
                    .map(|b| b.id)
                {
                    repos.insert(existing, repo);
                    state.active = Some(existing);
                    refresh::begin(state, existing)
                } else {
                    repos.insert(id, repo);
                    state.buffers.push(StatusBuffer::new(id, root));
                    state.active = Some(id);
                    refresh::begin(state, id)
                }
            }
            Err(error) => {
                events.push(StoreEvent::UserMessage {
                    message: error.to_string(),
                });
                Vec::new()
            }
        },

        Msg::Refresh { id } => refresh::begin(state, id),
        Msg::UpstreamResolved {
            id,
            upstream,
            push_remote,
        } => refresh::plan(state, id, upstream, push_remote),
        Msg::SnapshotLoaded { id, slot, result } => {
            refresh::snapshot_loaded(state, id, slot, result, events)
        }
        Msg::CommitDiffLoaded { id, hash, result } => {
            view::commit_diff_loaded(state, id, hash, result, events)
        }
        Msg::LoadBranches { id } => vec![Effect::LoadBranches { id }],
        Msg::BranchesLoaded { id, result } => {
            if let Some(buffer) = state.buffer_mut(id) {
                match result {
                    Ok(branches) => buffer.branches = Arc::new(branches),
                    Err(error) => push_diagnostic(
                        buffer,
                        DiagnosticKind::Warning,
                        format!("branch list: {error}"),
                    ),
                }
            }
            Vec::new()
        }
        Msg::BlobLoaded {
            id: _,
            title,
            line,
            result,
        } => {
            match result {
                Ok(content) => events.push(StoreEvent::VisitBlob {
                    title,
                    content,
                    line,
                }),
                Err(error) => events.push(StoreEvent::UserMessage {
                    message: error.to_string(),
                }),
            }
            Vec::new()
        }

        Msg::CursorMoved { id, byte } => {
            if let Some(buffer) = state.buffer_mut(id) {
                buffer.saved_cursor = byte;
            }
            Vec::new()
        }
        Msg::ToggleAtPoint { id, line } => view::toggle_at_point(state, id, line),
        Msg::SetVisibilityLevel { id, level } => view::set_visibility_level(state, id, level),

        Msg::SelectionStart { id, line } => {
            if let Some(buffer) = state.buffer_mut(id) {
                buffer.selection = Some(LineSelection {
                    anchor_line: line,
                    end_line: line,
                });
            }
            Vec::new()
        }
        Msg::SelectionExtend { id, line } => {
            if let Some(buffer) = state.buffer_mut(id) {
                match buffer.selection.as_mut() {
                    Some(selection) => selection.end_line = line,
                    None => {
                        buffer.selection = Some(LineSelection {
                            anchor_line: line,
                            end_line: line,
                        })
                    }
                }
            }
            Vec::new()
        }
        Msg::SelectionClear { id } => {
            if let Some(buffer) = state.buffer_mut(id) {
                buffer.selection = None;
            }
            Vec::new()
        }

        Msg::StageAtPoint { id, line } => ops::stage_at_point(state, id, line, events),
        Msg::UnstageAtPoint { id, line } => ops::unstage_at_point(state, id, line, events),
        Msg::DiscardAtPoint { id, line } => ops::discard_at_point(state, id, line, events),
        Msg::VisitAtPoint { id, line } => ops::visit_at_point(state, id, line, events),

        Msg::MenuCommand {
            id,
            category,
            key,
            switches,
            options,
            positional,
        } => ops::menu_command(state, id, category, &key, &switches, &options, positional, events),

        Msg::FileSaved { path } => refresh::file_saved(state, path),
        Msg::DebounceElapsed { id, generation } => refresh::debounce_elapsed(state, id, generation),
        Msg::CommandFinished { id, kind, result } => {
            refresh::command_finished(state, id, kind, result, events)
        }
    }
}

pub(crate) fn push_diagnostic(buffer: &mut StatusBuffer, kind: DiagnosticKind, message: String) {
    buffer.diagnostics.push(DiagnosticEntry {
        time: SystemTime::now(),
        kind,
        message,
    });
    let len = buffer.diagnostics.len();
    if len > 200 {
        buffer.diagnostics.drain(..len - 200);
    }
}

/// Re-render from the persisted snapshot without re-fetching; a no-op
/// until the first refresh lands.
pub(crate) fn rerender(buffer: &mut StatusBuffer) {
    let Some(data) = buffer.git_data.clone() else {
        return;
    };
    let view = ViewState {
        expanded_files: &buffer.expanded_files,
        expanded_commits: &buffer.expanded_commits,
        commit_diffs: &buffer.commit_diffs,
        collapsed_sections: &buffer.collapsed_sections,
        saved_cursor: buffer.saved_cursor,
    };
    let (tree, rendered) = render_status(&data, &view);
    buffer.tree = Arc::new(tree);
    buffer.rendered = Arc::new(rendered);
}

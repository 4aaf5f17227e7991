use super::{push_diagnostic, rerender};
use crate::model::{AppState, BufferId, DiagnosticKind};
use crate::msg::{Effect, StoreEvent};
use gitbuf_core::domain::{expand_key, FileDiff, StatusKey};
use gitbuf_core::error::Error;
use gitbuf_core::section::SectionData;
use std::sync::Arc;

/// Toggle the section under the cursor: a heading collapses, a file or
/// commit shows/hides its inline diff. Expanding an uncached commit
/// fetches its diff first.
pub(super) fn toggle_at_point(state: &mut AppState, id: BufferId, line: usize) -> Vec<Effect> {
    let Some(buffer) = state.buffer_mut(id) else {
        return Vec::new();
    };
    let tree = Arc::clone(&buffer.tree);
    let Some(node) = tree.section_at_line(line) else {
        return Vec::new();
    };

    match &tree.get(node).data {
        SectionData::SectionHeader { key } => {
            if !buffer.collapsed_sections.remove(key) {
                buffer.collapsed_sections.insert(*key);
            }
            rerender(buffer);
            Vec::new()
        }
        SectionData::File {
            expand_key,
            diff: Some(_),
            ..
        } => {
            if !buffer.expanded_files.remove(expand_key) {
                buffer.expanded_files.insert(expand_key.clone());
            }
            rerender(buffer);
            Vec::new()
        }
        SectionData::Commit { hash } => {
            if buffer.expanded_commits.remove(hash) {
                rerender(buffer);
                return Vec::new();
            }
            buffer.expanded_commits.insert(hash.clone());
            if buffer.commit_diffs.contains_key(hash) {
                rerender(buffer);
                Vec::new()
            } else {
                vec![Effect::LoadCommitDiff {
                    id,
                    hash: hash.clone(),
                }]
            }
        }
        _ => Vec::new(),
    }
}

pub(super) fn commit_diff_loaded(
    state: &mut AppState,
    id: BufferId,
    hash: String,
    result: Result<Vec<FileDiff>, Error>,
    events: &mut Vec<StoreEvent>,
) -> Vec<Effect> {
    let Some(buffer) = state.buffer_mut(id) else {
        return Vec::new();
    };
    match result {
        Ok(diffs) => {
            buffer.commit_diffs.insert(hash, Arc::new(diffs));
            rerender(buffer);
        }
        Err(error) => {
            buffer.expanded_commits.remove(&hash);
            push_diagnostic(
                buffer,
                DiagnosticKind::Warning,
                format!("show {hash}: {error}"),
            );
            events.push(StoreEvent::UserMessage {
                message: error.to_string(),
            });
        }
    }
    Vec::new()
}

/// Level 1 collapses all top-level headings; 2 additionally hides inline
/// diffs; 3 re-opens the headings leaving inline diffs as the user set
/// them; 4 expands every file diff.
pub(super) fn set_visibility_level(state: &mut AppState, id: BufferId, level: usize) -> Vec<Effect> {
    let level = level.clamp(1, 4);
    let Some(buffer) = state.buffer_mut(id) else {
        return Vec::new();
    };

    match level {
        1 => {
            buffer.collapsed_sections = [
                StatusKey::Untracked,
                StatusKey::Unstaged,
                StatusKey::Staged,
                StatusKey::Unpushed,
                StatusKey::Unpulled,
                StatusKey::Log,
                StatusKey::Stash,
            ]
            .into_iter()
            .collect();
        }
        2 => {
            buffer.collapsed_sections.clear();
            buffer.expanded_files.clear();
            buffer.expanded_commits.clear();
        }
        3 => {
            buffer.collapsed_sections.clear();
        }
        _ => {
            buffer.collapsed_sections.clear();
            if let Some(data) = buffer.git_data.clone() {
                for (key, diffs) in [
                    (StatusKey::Unstaged, &data.unstaged),
                    (StatusKey::Staged, &data.staged),
                ] {
                    for diff in diffs {
                        if let Some(path) = diff.new_path() {
                            buffer.expanded_files.insert(expand_key(key, path));
                        }
                    }
                }
            }
        }
    }

    rerender(buffer);
    Vec::new()
}

use crate::menu::{self, MenuCategory, Positional};
use crate::model::{AppState, BufferId, StatusBuffer};
use crate::msg::{CommandKind, Effect, StoreEvent};
use gitbuf_core::domain::{DiffHunk, FileDiff, StatusKey};
use gitbuf_core::patch;
use gitbuf_core::section::{DiffSource, SectionData, SectionId, SectionTree};
use gitbuf_core::services::ApplyLocation;
use std::path::PathBuf;
use std::sync::Arc;

fn message(events: &mut Vec<StoreEvent>, text: impl Into<String>) -> Vec<Effect> {
    events.push(StoreEvent::UserMessage {
        message: text.into(),
    });
    Vec::new()
}

/// Resolve a hunk node back to its parsed file-diff and hunk.
fn hunk_parts<'a>(
    buffer: &'a StatusBuffer,
    source: &DiffSource,
    file_ix: usize,
    hunk_ix: usize,
) -> Option<(&'a FileDiff, &'a DiffHunk)> {
    let file = match source {
        DiffSource::Unstaged => buffer.git_data.as_deref()?.unstaged.get(file_ix)?,
        DiffSource::Staged => buffer.git_data.as_deref()?.staged.get(file_ix)?,
        DiffSource::Commit(hash) => buffer.commit_diffs.get(hash)?.get(file_ix)?,
    };
    Some((file, file.hunks.get(hunk_ix)?))
}

enum Region {
    Whole,
    Range(usize, usize),
    Invalid,
}

/// Map the active selection to hunk-content offsets. Content lines begin
/// one past the hunk header line; the clamped range must stay within the
/// hunk.
fn selection_region(buffer: &StatusBuffer, hunk_start: usize, hunk_len: usize) -> Region {
    let Some(selection) = buffer.selection else {
        return Region::Whole;
    };
    let (start_line, end_line) = selection.range();
    let content_start = hunk_start + 1;
    let content_end = content_start + hunk_len.saturating_sub(1);

    let start = start_line.max(content_start);
    let end = end_line.min(content_end);
    if start > end || hunk_len == 0 {
        return Region::Invalid;
    }
    Region::Range(start - content_start, end - content_start)
}

#[allow(clippy::too_many_arguments)]
fn hunk_apply(
    buffer: &StatusBuffer,
    id: BufferId,
    hunk_start: usize,
    source: &DiffSource,
    file_ix: usize,
    hunk_ix: usize,
    location: ApplyLocation,
    apply_reverse: bool,
    region_reverse: bool,
    kind: CommandKind,
    events: &mut Vec<StoreEvent>,
) -> Vec<Effect> {
    let Some((file, hunk)) = hunk_parts(buffer, source, file_ix, hunk_ix) else {
        return message(events, "No diff behind this hunk");
    };

    let patch = match selection_region(buffer, hunk_start, hunk.lines.len()) {
        Region::Whole => Some(patch::hunk_patch(file, hunk)),
        Region::Range(start, end) => patch::region_patch(file, hunk, start, end, region_reverse),
        Region::Invalid => return message(events, "Selection is outside the hunk"),
    };
    let Some(patch) = patch else {
        return message(events, "Selection contains no changes");
    };

    vec![Effect::ApplyPatch {
        id,
        patch,
        location,
        reverse: apply_reverse,
        kind,
    }]
}

fn child_paths(tree: &SectionTree, id: SectionId) -> Vec<PathBuf> {
    tree.get(id)
        .children
        .iter()
        .filter_map(|&child| match &tree.get(child).data {
            SectionData::File { path, .. } => Some(PathBuf::from(path)),
            _ => None,
        })
        .collect()
}

pub(super) fn stage_at_point(
    state: &mut AppState,
    id: BufferId,
    line: usize,
    events: &mut Vec<StoreEvent>,
) -> Vec<Effect> {
    let Some(buffer) = state.buffer(id) else {
        return Vec::new();
    };
    let tree = Arc::clone(&buffer.tree);
    let Some(node_id) = tree.section_at_line(line) else {
        return message(events, "Nothing to stage here");
    };
    let node = tree.get(node_id);

    match &node.data {
        SectionData::File {
            key: StatusKey::Untracked | StatusKey::Unstaged,
            path,
            ..
        } => vec![Effect::StagePaths {
            id,
            paths: vec![PathBuf::from(path)],
        }],
        SectionData::Hunk {
            source: source @ DiffSource::Unstaged,
            file_ix,
            hunk_ix,
        } => hunk_apply(
            buffer,
            id,
            node.start_line,
            source,
            *file_ix,
            *hunk_ix,
            ApplyLocation::Index,
            false,
            false,
            CommandKind::StageHunk,
            events,
        ),
        SectionData::SectionHeader {
            key: StatusKey::Untracked | StatusKey::Unstaged,
        } => {
            let paths = child_paths(&tree, node_id);
            if paths.is_empty() {
                return message(events, "Nothing to stage here");
            }
            vec![Effect::StagePaths { id, paths }]
        }
        _ => message(events, "Nothing to stage here"),
    }
}

pub(super) fn unstage_at_point(
    state: &mut AppState,
    id: BufferId,
    line: usize,
    events: &mut Vec<StoreEvent>,
) -> Vec<Effect> {
    let Some(buffer) = state.buffer(id) else {
        return Vec::new();
    };
    let tree = Arc::clone(&buffer.tree);
    let Some(node_id) = tree.section_at_line(line) else {
        return message(events, "Nothing to unstage here");
    };
    let node = tree.get(node_id);

    match &node.data {
        SectionData::File {
            key: StatusKey::Staged,
            path,
            ..
        } => vec![Effect::UnstagePaths {
            id,
            paths: vec![PathBuf::from(path)],
        }],
        SectionData::Hunk {
            source: source @ DiffSource::Staged,
            file_ix,
            hunk_ix,
        } => hunk_apply(
            buffer,
            id,
            node.start_line,
            source,
            *file_ix,
            *hunk_ix,
            ApplyLocation::Index,
            true,
            true,
            CommandKind::UnstageHunk,
            events,
        ),
        SectionData::SectionHeader {
            key: StatusKey::Staged,
        } => {
            let paths = child_paths(&tree, node_id);
            if paths.is_empty() {
                return message(events, "Nothing to unstage here");
            }
            vec![Effect::UnstagePaths { id, paths }]
        }
        _ => message(events, "Nothing to unstage here"),
    }
}

pub(super) fn discard_at_point(
    state: &mut AppState,
    id: BufferId,
    line: usize,
    events: &mut Vec<StoreEvent>,
) -> Vec<Effect> {
    let Some(buffer) = state.buffer(id) else {
        return Vec::new();
    };
    let tree = Arc::clone(&buffer.tree);
    let Some(node_id) = tree.section_at_line(line) else {
        return message(events, "Nothing to discard here");
    };
    let node = tree.get(node_id);

    match &node.data {
        SectionData::File {
            key: StatusKey::Untracked,
            path,
            ..
        } => vec![Effect::DeleteUntracked {
            id,
            paths: vec![PathBuf::from(path)],
        }],
        SectionData::File {
            key: StatusKey::Unstaged,
            path,
            ..
        } => vec![Effect::CheckoutPaths {
            id,
            paths: vec![PathBuf::from(path)],
        }],
        SectionData::Hunk {
            source: source @ DiffSource::Unstaged,
            file_ix,
            hunk_ix,
        } => hunk_apply(
            buffer,
            id,
            node.start_line,
            source,
            *file_ix,
            *hunk_ix,
            ApplyLocation::Worktree,
            true,
            false,
            CommandKind::DiscardHunk,
            events,
        ),
        SectionData::SectionHeader {
            key: StatusKey::Untracked,
        } => {
            let paths = child_paths(&tree, node_id);
            if paths.is_empty() {
                return message(events, "Nothing to discard here");
            }
            vec![Effect::DeleteUntracked { id, paths }]
        }
        SectionData::SectionHeader {
            key: StatusKey::Unstaged,
        } => {
            let paths = child_paths(&tree, node_id);
            if paths.is_empty() {
                return message(events, "Nothing to discard here");
            }
            vec![Effect::CheckoutPaths { id, paths }]
        }
        _ => message(events, "Nothing to discard here"),
    }
}

pub(super) fn visit_at_point(
    state: &mut AppState,
    id: BufferId,
    line: usize,
    events: &mut Vec<StoreEvent>,
) -> Vec<Effect> {
    let Some(buffer) = state.buffer(id) else {
        return Vec::new();
    };
    let tree = Arc::clone(&buffer.tree);
    let Some(node_id) = tree.section_at_line(line) else {
        return message(events, "Nothing to visit here");
    };
    let node = tree.get(node_id);

    match &node.data {
        SectionData::File { path, .. } => {
            events.push(StoreEvent::VisitFile {
                path: buffer.git_root.join(path),
                line: 0,
            });
            Vec::new()
        }
        SectionData::Hunk {
            source,
            file_ix,
            hunk_ix,
        } => {
            let Some((file, hunk)) = hunk_parts(buffer, source, *file_ix, *hunk_ix) else {
                return message(events, "No diff behind this hunk");
            };

            if line == node.start_line {
                // On the hunk header itself.
                let path = file.new_path().unwrap_or_default();
                events.push(StoreEvent::VisitFile {
                    path: buffer.git_root.join(path),
                    line: hunk.new_start.saturating_sub(1) as usize,
                });
                return Vec::new();
            }

            let offset = line - node.start_line - 1;
            let Some(target) = hunk.lines.get(offset) else {
                return message(events, "Nothing to visit here");
            };

            if target.starts_with('-') && !matches!(source, DiffSource::Commit(_)) {
                // Removed lines exist only on the old side; show the old
                // blob at the corresponding position.
                let before = hunk.lines[..offset]
                    .iter()
                    .filter(|l| l.starts_with(' ') || l.starts_with('-'))
                    .count();
                let old_line = hunk.old_start as usize + before;
                let reference = match source {
                    DiffSource::Staged => "HEAD",
                    _ => "",
                };
                let path = file.old_path().unwrap_or_default().to_string();
                let title = format!(
                    "{path}@{}",
                    if reference.is_empty() { "index" } else { reference }
                );
                return vec![Effect::LoadBlob {
                    id,
                    reference: reference.to_string(),
                    path,
                    title,
                    line: old_line.saturating_sub(1),
                }];
            }

            let before = hunk.lines[..offset]
                .iter()
                .filter(|l| l.starts_with(' ') || l.starts_with('+'))
                .count();
            let new_line = hunk.new_start as usize + before;
            let path = file.new_path().unwrap_or_default();
            events.push(StoreEvent::VisitFile {
                path: buffer.git_root.join(path),
                line: new_line.saturating_sub(1),
            });
            Vec::new()
        }
        SectionData::Commit { hash } => vec![Effect::RunCommand {
            id,
            args: vec!["show".to_string(), hash.clone()],
            kind: CommandKind::ShowCommit { hash: hash.clone() },
        }],
        SectionData::Stash { reference } => vec![Effect::RunCommand {
            id,
            args: vec![
                "stash".to_string(),
                "show".to_string(),
                "-p".to_string(),
                reference.clone(),
            ],
            kind: CommandKind::StashShow {
                reference: reference.clone(),
            },
        }],
        _ => message(events, "Nothing to visit here"),
    }
}

#[allow(clippy::too_many_arguments)]
pub(super) fn menu_command(
    state: &mut AppState,
    id: BufferId,
    category: MenuCategory,
    key: &str,
    switches: &[char],
    options: &[(char, String)],
    positional: Option<String>,
    events: &mut Vec<StoreEvent>,
) -> Vec<Effect> {
    let Some(entry) = menu::entry(category, key) else {
        return message(events, format!("No such command: {key}"));
    };
    let Some(buffer) = state.buffer(id) else {
        return Vec::new();
    };

    let resolved: Option<String> = match entry.positional {
        Positional::Upstream => {
            match buffer.git_data.as_ref().and_then(|d| d.upstream.clone()) {
                Some(upstream) => Some(ref_args(category, &upstream)),
                None => return message(events, "No upstream configured"),
            }
        }
        Positional::PushRemote => {
            match buffer.git_data.as_ref().and_then(|d| d.push_remote.clone()) {
                Some(remote) => Some(ref_args(category, &remote)),
                None => return message(events, "No push-remote configured"),
            }
        }
        _ => positional,
    };

    let args = menu::build_args(entry, switches, options, resolved.as_deref());
    vec![Effect::RunCommand {
        id,
        args,
        kind: entry.kind.clone(),
    }]
}

/// Turn a `remote/branch` ref into the positional arguments the category
/// expects: push/pull want `remote branch`, fetch wants the remote alone.
fn ref_args(category: MenuCategory, refname: &str) -> String {
    match category {
        MenuCategory::Push | MenuCategory::Pull => refname
            .split_once('/')
            .map(|(remote, branch)| format!("{remote} {branch}"))
            .unwrap_or_else(|| refname.to_string()),
        MenuCategory::Fetch => refname
            .split_once('/')
            .map(|(remote, _)| remote.to_string())
            .unwrap_or_else(|| refname.to_string()),
        _ => refname.to_string(),
    }
}

use super::{CommandKind, SnapshotSlot};
use crate::menu::MenuCategory;
use crate::model::BufferId;
use gitbuf_core::domain::{BranchInfo, CommitInfo, FileDiff, StashInfo, StatusSnapshot};
use gitbuf_core::error::Error;
use gitbuf_core::services::{CommandOutput, GitRepository};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub enum SnapshotData {
    Status(StatusSnapshot),
    Diffs(Vec<FileDiff>),
    Commits(Vec<CommitInfo>),
    Stashes(Vec<StashInfo>),
}

pub enum Msg {
    /// `C-x g`: open (or reuse) the status buffer for the repository
    /// containing `path`.
    OpenStatusBuffer(PathBuf),
    RepoOpened {
        id: BufferId,
        result: Result<Arc<dyn GitRepository>, Error>,
    },

    Refresh {
        id: BufferId,
    },
    UpstreamResolved {
        id: BufferId,
        upstream: Option<String>,
        push_remote: Option<String>,
    },
    SnapshotLoaded {
        id: BufferId,
        slot: SnapshotSlot,
        result: Result<SnapshotData, Error>,
    },
    CommitDiffLoaded {
        id: BufferId,
        hash: String,
        result: Result<Vec<FileDiff>, Error>,
    },
    /// Load branch candidates ahead of a branch picker.
    LoadBranches {
        id: BufferId,
    },
    BranchesLoaded {
        id: BufferId,
        result: Result<Vec<BranchInfo>, Error>,
    },
    BlobLoaded {
        id: BufferId,
        title: String,
        line: usize,
        result: Result<String, Error>,
    },

    CursorMoved {
        id: BufferId,
        byte: usize,
    },
    ToggleAtPoint {
        id: BufferId,
        line: usize,
    },
    SetVisibilityLevel {
        id: BufferId,
        level: usize,
    },
    SelectionStart {
        id: BufferId,
        line: usize,
    },
    SelectionExtend {
        id: BufferId,
        line: usize,
    },
    SelectionClear {
        id: BufferId,
    },

    StageAtPoint {
        id: BufferId,
        line: usize,
    },
    UnstageAtPoint {
        id: BufferId,
        line: usize,
    },
    /// The host has already confirmed the discard with the user.
    DiscardAtPoint {
        id: BufferId,
        line: usize,
    },
    VisitAtPoint {
        id: BufferId,
        line: usize,
    },

    /// A transient suffix fired: look the command up in the matrix and
    /// run it. `positional` carries prompt/picker input and the commit
    /// message; upstream/push-remote positionals resolve from state.
    MenuCommand {
        id: BufferId,
        category: MenuCategory,
        key: String,
        switches: Vec<char>,
        options: Vec<(char, String)>,
        positional: Option<String>,
    },

    /// `after-save` fired for a file under some repository.
    FileSaved {
        path: PathBuf,
    },
    DebounceElapsed {
        id: BufferId,
        generation: u64,
    },
    CommandFinished {
        id: BufferId,
        kind: CommandKind,
        result: Result<CommandOutput, Error>,
    },
}

impl std::fmt::Debug for Msg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenStatusBuffer(path) => f.debug_tuple("OpenStatusBuffer").field(path).finish(),
            Self::RepoOpened { id, result } => f
                .debug_struct("RepoOpened")
                .field("id", id)
                .field("ok", &result.is_ok())
                .finish(),
            Self::Refresh { id } => f.debug_struct("Refresh").field("id", id).finish(),
            Self::UpstreamResolved { id, upstream, .. } => f
                .debug_struct("UpstreamResolved")
                .field("id", id)
                .field("upstream", upstream)
                .finish(),
            Self::SnapshotLoaded { id, slot, result } => f
                .debug_struct("SnapshotLoaded")
                .field("id", id)
                .field("slot", slot)
                .field("ok", &result.is_ok())
                .finish(),
            Self::CommitDiffLoaded { id, hash, .. } => f
                .debug_struct("CommitDiffLoaded")
                .field("id", id)
                .field("hash", hash)
                .finish(),
            Self::LoadBranches { id } => f.debug_struct("LoadBranches").field("id", id).finish(),
            Self::BranchesLoaded { id, result } => f
                .debug_struct("BranchesLoaded")
                .field("id", id)
                .field("ok", &result.is_ok())
                .finish(),
            Self::BlobLoaded { id, title, .. } => f
                .debug_struct("BlobLoaded")
                .field("id", id)
                .field("title", title)
                .finish(),
            Self::CursorMoved { id, byte } => f
                .debug_struct("CursorMoved")
                .field("id", id)
                .field("byte", byte)
                .finish(),
            Self::ToggleAtPoint { id, line } => f
                .debug_struct("ToggleAtPoint")
                .field("id", id)
                .field("line", line)
                .finish(),
            Self::SetVisibilityLevel { id, level } => f
                .debug_struct("SetVisibilityLevel")
                .field("id", id)
                .field("level", level)
                .finish(),
            Self::SelectionStart { id, line } => f
                .debug_struct("SelectionStart")
                .field("id", id)
                .field("line", line)
                .finish(),
            Self::SelectionExtend { id, line } => f
                .debug_struct("SelectionExtend")
                .field("id", id)
                .field("line", line)
                .finish(),
            Self::SelectionClear { id } => {
                f.debug_struct("SelectionClear").field("id", id).finish()
            }
            Self::StageAtPoint { id, line } => f
                .debug_struct("StageAtPoint")
                .field("id", id)
                .field("line", line)
                .finish(),
            Self::UnstageAtPoint { id, line } => f
                .debug_struct("UnstageAtPoint")
                .field("id", id)
                .field("line", line)
                .finish(),
            Self::DiscardAtPoint { id, line } => f
                .debug_struct("DiscardAtPoint")
                .field("id", id)
                .field("line", line)
                .finish(),
            Self::VisitAtPoint { id, line } => f
                .debug_struct("VisitAtPoint")
                .field("id", id)
                .field("line", line)
                .finish(),
            Self::MenuCommand {
                id, category, key, ..
            } => f
                .debug_struct("MenuCommand")
                .field("id", id)
                .field("category", category)
                .field("key", key)
                .finish(),
            Self::FileSaved { path } => f.debug_struct("FileSaved").field("path", path).finish(),
            Self::DebounceElapsed { id, generation } => f
                .debug_struct("DebounceElapsed")
                .field("id", id)
                .field("generation", generation)
                .finish(),
            Self::CommandFinished { id, kind, result } => f
                .debug_struct("CommandFinished")
                .field("id", id)
                .field("kind", kind)
                .field("ok", &result.is_ok())
                .finish(),
        }
    }
}

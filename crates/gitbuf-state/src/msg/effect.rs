use super::CommandKind;
use crate::model::BufferId;
use gitbuf_core::services::ApplyLocation;
use std::path::PathBuf;

/// One concurrent snapshot invocation of a refresh round. Completions are
/// keyed by slot; the render waits for the full expected set.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SnapshotSlot {
    Status,
    DiffUnstaged,
    DiffStaged,
    Log,
    Stashes,
    Unpushed,
    Unpulled,
}

impl SnapshotSlot {
    pub fn mask(self) -> u32 {
        match self {
            Self::Status => 1 << 0,
            Self::DiffUnstaged => 1 << 1,
            Self::DiffStaged => 1 << 2,
            Self::Log => 1 << 3,
            Self::Stashes => 1 << 4,
            Self::Unpushed => 1 << 5,
            Self::Unpulled => 1 << 6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::DiffUnstaged => "diff",
            Self::DiffStaged => "diff --cached",
            Self::Log => "log",
            Self::Stashes => "stash list",
            Self::Unpushed => "unpushed log",
            Self::Unpulled => "unpulled log",
        }
    }
}

#[derive(Clone, Debug)]
pub enum Effect {
    OpenRepo {
        id: BufferId,
        path: PathBuf,
    },
    ResolveUpstream {
        id: BufferId,
    },
    LoadSnapshot {
        id: BufferId,
        slot: SnapshotSlot,
        /// Rev range for the unpushed/unpulled slots.
        range: Option<String>,
        limit: usize,
    },
    LoadCommitDiff {
        id: BufferId,
        hash: String,
    },
    LoadBranches {
        id: BufferId,
    },
    LoadBlob {
        id: BufferId,
        reference: String,
        path: String,
        title: String,
        line: usize,
    },
    StagePaths {
        id: BufferId,
        paths: Vec<PathBuf>,
    },
    UnstagePaths {
        id: BufferId,
        paths: Vec<PathBuf>,
    },
    CheckoutPaths {
        id: BufferId,
        paths: Vec<PathBuf>,
    },
    DeleteUntracked {
        id: BufferId,
        paths: Vec<PathBuf>,
    },
    ApplyPatch {
        id: BufferId,
        patch: String,
        location: ApplyLocation,
        reverse: bool,
        kind: CommandKind,
    },
    RunCommand {
        id: BufferId,
        args: Vec<String>,
        kind: CommandKind,
    },
    Debounce {
        id: BufferId,
        generation: u64,
        delay_ms: u64,
    },
}

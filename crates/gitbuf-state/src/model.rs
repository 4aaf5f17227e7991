use crate::config::Config;
use gitbuf_core::domain::{
    BranchInfo, CommitInfo, Face, FileDiff, StashInfo, StatusKey, StatusSnapshot,
};
use gitbuf_core::section::SectionTree;
use rustc_hash::{FxHashMap, FxHashSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

pub type Shared<T> = Arc<T>;

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub buffers: Vec<StatusBuffer>,
    pub active: Option<BufferId>,
    pub config: Config,
}

impl AppState {
    pub fn buffer(&self, id: BufferId) -> Option<&StatusBuffer> {
        self.buffers.iter().find(|b| b.id == id)
    }

    pub fn buffer_mut(&mut self, id: BufferId) -> Option<&mut StatusBuffer> {
        self.buffers.iter_mut().find(|b| b.id == id)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct BufferId(pub u64);

/// The full parsed snapshot a render works from. Persisted on the buffer so
/// view-state changes re-render without re-fetching.
#[derive(Clone, Debug, Default)]
pub struct GitData {
    pub status: StatusSnapshot,
    pub unstaged: Vec<FileDiff>,
    pub staged: Vec<FileDiff>,
    pub log: Vec<CommitInfo>,
    pub stashes: Vec<StashInfo>,
    pub unpushed: Vec<CommitInfo>,
    pub unpulled: Vec<CommitInfo>,
    /// Resolved upstream ref, e.g. `origin/main`.
    pub upstream: Option<String>,
    /// Resolved push-remote ref.
    pub push_remote: Option<String>,
}

/// Snapshot results collected while a refresh is in flight. Rendering
/// waits until `expected` has fully drained; a failed slot stays empty.
#[derive(Clone, Debug, Default)]
pub struct RefreshGather {
    pub expected: u32,
    pub data: GitData,
}

/// An active line-wise region selection for sub-hunk operations.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LineSelection {
    pub anchor_line: usize,
    pub end_line: usize,
}

impl LineSelection {
    pub fn range(&self) -> (usize, usize) {
        (
            self.anchor_line.min(self.end_line),
            self.anchor_line.max(self.end_line),
        )
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OverlayTag {
    GitFace,
    GitDiff,
}

impl OverlayTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GitFace => "git-face",
            Self::GitDiff => "git-diff",
        }
    }
}

/// A face span for the host's overlay API.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OverlaySpan {
    pub start_byte: usize,
    pub end_byte: usize,
    pub face: Face,
    pub tag: OverlayTag,
    pub priority: u8,
}

/// What the host copies into its buffer after a render: the full text, the
/// face spans to reapply, and the clamped cursor position.
#[derive(Clone, Debug, Default)]
pub struct RenderedStatus {
    pub text: String,
    pub overlays: Vec<OverlaySpan>,
    pub cursor: usize,
}

#[derive(Clone, Debug)]
pub struct StatusBuffer {
    pub id: BufferId,
    /// Repository root; working directory for every subsequent git
    /// invocation from this buffer.
    pub git_root: PathBuf,

    /// `<status_key>:<path>` keys of files showing inline diffs.
    pub expanded_files: FxHashSet<String>,
    pub expanded_commits: FxHashSet<String>,
    /// Commit hash -> parsed diff, filled on first expansion and kept for
    /// the buffer's lifetime.
    pub commit_diffs: FxHashMap<String, Shared<Vec<FileDiff>>>,
    pub collapsed_sections: FxHashSet<StatusKey>,

    pub git_data: Option<Shared<GitData>>,
    /// Local and remote branches, loaded on demand for pickers.
    pub branches: Shared<Vec<BranchInfo>>,
    pub saved_cursor: usize,
    pub selection: Option<LineSelection>,

    pub refresh_pending: bool,
    pub gather: Option<RefreshGather>,
    pub refresh_generation: u64,

    pub tree: Shared<SectionTree>,
    pub rendered: Shared<RenderedStatus>,

    pub diagnostics: Vec<DiagnosticEntry>,
}

impl StatusBuffer {
    pub fn new(id: BufferId, git_root: PathBuf) -> Self {
        Self {
            id,
            git_root,
            expanded_files: FxHashSet::default(),
            expanded_commits: FxHashSet::default(),
            commit_diffs: FxHashMap::default(),
            collapsed_sections: FxHashSet::default(),
            git_data: None,
            branches: Arc::new(Vec::new()),
            saved_cursor: 0,
            selection: None,
            refresh_pending: false,
            gather: None,
            refresh_generation: 0,
            tree: Arc::new(SectionTree::new()),
            rendered: Arc::new(RenderedStatus::default()),
            diagnostics: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DiagnosticEntry {
    pub time: SystemTime,
    pub kind: DiagnosticKind,
    pub message: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DiagnosticKind {
    Info,
    Warning,
    Error,
}
